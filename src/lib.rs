//! littlefalls_service: river and weather conditions for the Potomac at
//! Little Falls.
//!
//! # Module structure
//!
//! ```text
//! littlefalls_service
//! ├── model       — shared data types (GaugeReading, ReadingTime, error enums, …)
//! ├── stations    — the Little Falls station and its per-source identifiers
//! ├── config      — TOML + environment configuration
//! ├── logging     — tracing setup and failure classification
//! ├── ingest
//! │   ├── http    — shared GET primitive
//! │   ├── usgs    — USGS NWIS IV API: URL, parsing, extraction, summary
//! │   ├── nwps    — NOAA NWPS stage/flow observed + forecast products
//! │   ├── owm     — OpenWeatherMap One Call current conditions + alerts
//! │   └── fixtures (test only) — representative API response payloads
//! └── view        — the four views and their refresh dispatch
//! ```

pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod stations;
pub mod view;

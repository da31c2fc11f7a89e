/// Core data types for the Little Falls river conditions service.
///
/// This module defines the shared domain model imported by the ingest
/// adapters: variable identifiers, the normalized gauge reading, and the
/// error types each data source can produce. It contains no I/O.

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Variable identifiers
// ---------------------------------------------------------------------------

/// USGS parameter code for water temperature, in degrees Celsius.
pub const PARAM_TEMPERATURE: &str = "00010";

/// USGS parameter code for discharge (streamflow), in cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";

/// USGS parameter code for gage height (stage), in feet.
pub const PARAM_STAGE: &str = "00065";

/// NWIS variable OID for water temperature.
pub const OID_TEMPERATURE: &str = "45807042";

/// NWIS variable OID for discharge.
pub const OID_DISCHARGE: &str = "45807197";

/// NWIS variable OID for gage height.
pub const OID_STAGE: &str = "45807202";

/// The physical quantity a NWIS time series measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeVariable {
    Temperature,
    Discharge,
    Stage,
    Other,
}

impl GaugeVariable {
    /// Classifies a series by its variable OID, falling back to the USGS
    /// parameter code when the OID is not one we know.
    pub fn classify(oid: &str, parameter_code: Option<&str>) -> Self {
        match oid {
            OID_TEMPERATURE => GaugeVariable::Temperature,
            OID_DISCHARGE => GaugeVariable::Discharge,
            OID_STAGE => GaugeVariable::Stage,
            _ => match parameter_code {
                Some(PARAM_TEMPERATURE) => GaugeVariable::Temperature,
                Some(PARAM_DISCHARGE) => GaugeVariable::Discharge,
                Some(PARAM_STAGE) => GaugeVariable::Stage,
                _ => GaugeVariable::Other,
            },
        }
    }

    /// Label used in the per-variable summary lines.
    pub fn label(&self) -> &'static str {
        match self {
            GaugeVariable::Temperature => "Temperature",
            GaugeVariable::Discharge => "Flow CFS",
            GaugeVariable::Stage => "Height FT",
            GaugeVariable::Other => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// The time attached to the latest NWIS reading.
///
/// USGS timestamps that fail to parse are replaced with the current time so
/// the summary still renders; `Substituted` lets callers see that happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadingTime {
    Reported(DateTime<FixedOffset>),
    Substituted(DateTime<FixedOffset>),
}

impl ReadingTime {
    pub fn instant(&self) -> DateTime<FixedOffset> {
        match self {
            ReadingTime::Reported(t) | ReadingTime::Substituted(t) => *t,
        }
    }

    pub fn is_substituted(&self) -> bool {
        matches!(self, ReadingTime::Substituted(_))
    }

    /// Current wall-clock time, flagged as a substitute.
    pub fn now() -> Self {
        ReadingTime::Substituted(Local::now().fixed_offset())
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instant().format("%Y-%m-%d %H:%M:%S %:z"))
    }
}

/// Latest temperature, discharge and stage for a gauge, aggregated across
/// the time series of one NWIS response.
///
/// Any field whose series is absent or whose value could not be parsed
/// stays at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeReading {
    pub site_id: String,
    pub time: ReadingTime,
    pub stage: f32,       // ft
    pub flow: u32,        // cfs
    pub temperature: f32, // deg C
}

impl fmt::Display for GaugeReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2}c {}cfs {:.2}ft",
            format_local(&self.time.instant()),
            self.temperature,
            self.flow,
            self.stage
        )
    }
}

/// Renders a timestamp in the system's local zone as `MM/DD HH:MM`.
pub fn format_local<Tz: TimeZone>(t: &DateTime<Tz>) -> String {
    t.with_timezone(&Local).format("%m/%d %H:%M").to_string()
}

/// Celsius to Fahrenheit.
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 1.8 + 32.0
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures of the shared HTTP GET primitive.
#[derive(Debug, Error, PartialEq)]
pub enum FetchError {
    /// The URL is not an absolute http(s) URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Connection, DNS or TLS failure before a status was received.
    #[error("GET error: {0}")]
    Transport(String),
    /// Any status other than 200.
    #[error("status error: {0}")]
    Status(u16),
    /// The body stream failed part way through.
    #[error("read body: {0}")]
    Body(String),
}

/// Errors that can arise when fetching or processing USGS NWIS data.
#[derive(Debug, Error, PartialEq)]
pub enum NwisError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The response body could not be deserialized.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The response holds fewer time series than the caller needs.
    #[error("series index {index} out of range: response has {len} series")]
    IndexOutOfRange { index: usize, len: usize },
    /// A series was present but had no observations.
    #[error("No data available for series: {0}")]
    NoDataAvailable(String),
}

/// Errors from the NOAA NWPS stage/flow service.
#[derive(Debug, Error, PartialEq)]
pub enum NwpsError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Runtime configuration
///
/// Loaded from a TOML file (default `littlefalls.toml`). Every field is
/// optional; anything missing falls back to the Little Falls entry in the
/// station registry and the production endpoints. The OpenWeatherMap key is
/// never compiled in: set `OWM_API_KEY` in the environment or a `.env` file,
/// or `weather.api_key` in the TOML file.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::ingest::{nwps, owm, usgs};
use crate::stations::LITTLE_FALLS;

pub const DEFAULT_CONFIG_PATH: &str = "littlefalls.toml";

/// Environment variable holding the One Call API key.
pub const API_KEY_VAR: &str = "OWM_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ---------------------------------------------------------------------------
// TOML Configuration Structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub nwis: NwisConfig,
    pub nwps: NwpsConfig,
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NwisConfig {
    pub site_id: String,
    pub base_url: String,
}

impl Default for NwisConfig {
    fn default() -> Self {
        Self {
            site_id: LITTLE_FALLS.usgs_site_code.to_string(),
            base_url: usgs::IV_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NwpsConfig {
    pub site_id: String,
    pub base_url: String,
}

impl Default for NwpsConfig {
    fn default() -> Self {
        Self {
            site_id: LITTLE_FALLS.nwps_lid.to_string(),
            base_url: nwps::NWPS_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// Temperature unit letter: C, F or K.
    pub units: String,
    pub language: String,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            latitude: LITTLE_FALLS.latitude,
            longitude: LITTLE_FALLS.longitude,
            units: owm::DEFAULT_UNIT.to_string(),
            language: owm::DEFAULT_LANGUAGE.to_string(),
            base_url: owm::ONE_CALL_URL.to_string(),
            api_key: None,
        }
    }
}

impl WeatherConfig {
    pub fn coordinates(&self) -> owm::Coordinates {
        owm::Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses a TOML document into a `Config`.
pub fn parse_config(text: &str, path: &str) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Toml {
        path: path.to_string(),
        source,
    })
}

/// Loads `path` if it exists, then applies `.env` and environment overrides.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let display = path.display().to_string();

    let mut config = match fs::read_to_string(path) {
        Ok(text) => parse_config(&text, &display)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Config::default(),
        Err(source) => {
            return Err(ConfigError::Io {
                path: display,
                source,
            });
        }
    };

    dotenv::dotenv().ok();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup(API_KEY_VAR).filter(|k| !k.trim().is_empty()) {
        config.weather.api_key = Some(key.trim().to_string());
    }
}

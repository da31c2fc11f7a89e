/// OpenWeatherMap One Call API client
///
/// Retrieves current conditions and active alerts for a coordinate.
///
/// API Documentation: https://openweathermap.org/api/one-call-3

use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::ingest::http;
use crate::logging::{self, DataSource};
use crate::model::FetchError;

pub const ONE_CALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

pub const DEFAULT_UNIT: &str = "F";
pub const DEFAULT_LANGUAGE: &str = "EN";

/// Languages accepted by the One Call `lang` parameter.
const LANGUAGES: &[&str] = &[
    "AF", "AL", "AR", "AZ", "BG", "CA", "CZ", "DA", "DE", "EL", "EN", "EU", "FA", "FI", "FR",
    "GL", "HE", "HI", "HR", "HU", "ID", "IT", "JA", "KR", "LA", "LT", "MK", "NO", "NL", "PL",
    "PT", "PT_BR", "RO", "RU", "SV", "SE", "SK", "SL", "SP", "ES", "SR", "TH", "TR", "UA", "UK",
    "VI", "ZH_CN", "ZH_TW", "ZU",
];

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum OwmError {
    #[error("invalid unit '{0}' (expected C, F or K)")]
    InvalidUnit(String),
    #[error("invalid language '{0}'")]
    InvalidLanguage(String),
    #[error("invalid API key")]
    InvalidApiKey,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Parse error: {0}")]
    ParseError(String),
}

// ============================================================================
// One Call Response Structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct OneCallResponse {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub timezone: String,
    pub current: CurrentWeather,
    #[serde(default)]
    pub alerts: Vec<WeatherAlert>,
}

/// Current conditions, in the units the request asked for.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub dew_point: f64,
    pub pressure: i64,  // hPa
    pub humidity: i64,  // %
    pub clouds: i64,    // %
    #[serde(default)]
    pub visibility: Option<i64>,
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_gust: f64, // absent when calm
    pub wind_deg: f64,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherAlert {
    #[serde(default)]
    pub sender_name: String,
    pub event: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub description: String,
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A validated One Call query configuration.
#[derive(Debug, Clone)]
pub struct OneCall {
    units: &'static str,
    lang: String,
    api_key: String,
    exclude: Vec<String>,
}

impl OneCall {
    /// Validates the unit letter (`C`, `F`, `K`), language code and API key.
    pub fn new(unit: &str, lang: &str, api_key: &str, exclude: &[&str]) -> Result<Self, OwmError> {
        let units = match unit.to_ascii_uppercase().as_str() {
            "C" => "metric",
            "F" => "imperial",
            "K" => "standard",
            _ => return Err(OwmError::InvalidUnit(unit.to_string())),
        };

        let lang_upper = lang.to_ascii_uppercase();
        if !LANGUAGES.contains(&lang_upper.as_str()) {
            return Err(OwmError::InvalidLanguage(lang.to_string()));
        }

        if api_key.len() != 32 || !api_key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(OwmError::InvalidApiKey);
        }

        Ok(Self {
            units,
            lang: lang_upper.to_ascii_lowercase(),
            api_key: api_key.to_string(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn build_url(&self, base_url: &str, at: Coordinates) -> String {
        let mut url = format!(
            "{}?lat={}&lon={}&appid={}&units={}&lang={}",
            base_url, at.latitude, at.longitude, self.api_key, self.units, self.lang
        );
        if !self.exclude.is_empty() {
            url.push_str("&exclude=");
            url.push_str(&self.exclude.join(","));
        }
        url
    }

    pub fn fetch(
        &self,
        client: &Client,
        base_url: &str,
        at: Coordinates,
    ) -> Result<OneCallResponse, OwmError> {
        let body = http::fetch(client, &self.build_url(base_url, at))?;
        parse_one_call_response(&body)
    }
}

pub fn parse_one_call_response(body: &[u8]) -> Result<OneCallResponse, OwmError> {
    serde_json::from_slice(body).map_err(|e| OwmError::ParseError(e.to_string()))
}

// ============================================================================
// Formatting
// ============================================================================

/// Current conditions followed, when any are active, by alert event names.
pub fn format_current_conditions(response: &OneCallResponse) -> String {
    let c = &response.current;
    let mut output = format!(
        "Temp: {:.2}  FeelsLike: {:.2} Dew Point {:.2}\n",
        c.temp, c.feels_like, c.dew_point
    );
    output += &format!(
        "Pressure: {} Humidity: {} Clouds: {}\n",
        c.pressure, c.humidity, c.clouds
    );
    output += &format!(
        "Wind Speed: {:.2} Gust {:.2} Direction {:.2}\n",
        c.wind_speed, c.wind_gust, c.wind_deg
    );

    if !response.alerts.is_empty() {
        output += "\n Alerts";
        for alert in &response.alerts {
            output = format!("{}\n{}\n", output, alert.event);
        }
    }

    output
}

/// Text for the Weather view. Never fails; errors are rendered inline.
pub fn current_conditions_report(
    client: &Client,
    base_url: &str,
    api_key: &str,
    unit: &str,
    lang: &str,
    at: Coordinates,
) -> String {
    let site = format!("{:.4},{:.4}", at.latitude, at.longitude);

    let result = OneCall::new(unit, lang, api_key, &[])
        .and_then(|query| query.fetch(client, base_url, at));

    match result {
        Ok(response) => {
            logging::debug(
                DataSource::Owm,
                Some(&site),
                &format!("{} active alerts", response.alerts.len()),
            );
            format_current_conditions(&response)
        }
        Err(e) => {
            logging::log_failure(DataSource::Owm, &site, "one call", &e);
            format!("Error getting weather: {}", e)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

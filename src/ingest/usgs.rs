/// USGS NWIS Instantaneous Values (IV) API client.
///
/// Handles URL construction, JSON response parsing, and text rendering for
/// the USGS Water Services IV endpoint:
///   https://waterservices.usgs.gov/nwis/iv/
///
/// The IV service returns WaterML rendered as JSON. Each `timeSeries` entry
/// carries one variable for one site; its `values` array holds one block per
/// measurement method, and each block holds the observations themselves.
/// See `fixtures/nwis_little_falls.json` for a complete example.

use chrono::DateTime;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::ingest::http;
use crate::logging::{self, DataSource};
use crate::model::{
    celsius_to_fahrenheit, GaugeReading, GaugeVariable, NwisError, ReadingTime, PARAM_DISCHARGE,
    PARAM_STAGE, PARAM_TEMPERATURE,
};

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

pub const IV_BASE_URL: &str = "https://waterservices.usgs.gov/nwis/iv/";

/// Builds the IV query for a single site requesting gage height, discharge
/// and water temperature, in that order.
pub fn build_iv_url(base_url: &str, site_id: &str) -> String {
    format!(
        "{}?format=json&parameterCd={},{},{}&sites={}",
        base_url, PARAM_STAGE, PARAM_DISCHARGE, PARAM_TEMPERATURE, site_id
    )
}

// ---------------------------------------------------------------------------
// Response structures
// ---------------------------------------------------------------------------

/// Top-level IV response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesResponse {
    #[serde(default)]
    pub declared_type: String,
    #[serde(default)]
    pub name: String,
    pub value: TimeSeriesCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesCollection {
    #[serde(default)]
    pub query_info: QueryInfo,
    #[serde(default)]
    pub time_series: Vec<TimeSeries>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryInfo {
    #[serde(rename = "queryURL", default)]
    pub query_url: String,
    #[serde(default)]
    pub note: Vec<Note>,
}

#[derive(Debug, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub value: String,
}

/// One variable at one site.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    #[serde(default)]
    pub name: String,
    pub source_info: SourceInfo,
    #[serde(default)]
    pub values: Vec<MethodValues>,
    pub variable: Variable,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub site_code: Vec<SiteCode>,
    #[serde(default)]
    pub geo_location: Option<GeoLocation>,
    #[serde(default)]
    pub time_zone_info: Option<TimeZoneInfo>,
    // Always empty for IV responses; kept opaque.
    #[serde(default)]
    pub note: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCode {
    pub value: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub agency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub geog_location: GeogLocation,
    #[serde(default, rename = "localSiteXY")]
    pub local_site_xy: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct GeogLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub srs: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZoneInfo {
    pub default_time_zone: ZoneOffset,
    #[serde(default)]
    pub daylight_savings_time_zone: Option<ZoneOffset>,
    #[serde(default)]
    pub site_uses_daylight_savings_time: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneOffset {
    pub zone_abbreviation: String,
    pub zone_offset: String,
}

/// Observations recorded by one measurement method.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodValues {
    #[serde(default)]
    pub value: Vec<Observation>,
    #[serde(default)]
    pub method: Vec<Method>,
    #[serde(default)]
    pub qualifier: Vec<Qualifier>,
    #[serde(default)]
    pub censor_code: Vec<serde_json::Value>,
    #[serde(default)]
    pub offset: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    #[serde(default)]
    pub method_description: String,
    #[serde(rename = "methodID", default)]
    pub method_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Qualifier {
    pub qualifier_code: String,
    #[serde(default)]
    pub qualifier_description: String,
}

/// A single reading. Values arrive as JSON strings, not numbers.
#[derive(Debug, Deserialize)]
pub struct Observation {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    pub value: String,
    #[serde(default)]
    pub qualifiers: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    #[serde(default)]
    pub oid: String,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub variable_code: Vec<VariableCode>,
    #[serde(default)]
    pub variable_name: String,
    #[serde(default)]
    pub variable_description: String,
    #[serde(default = "default_no_data_value")]
    pub no_data_value: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(default)]
    pub unit_code: String,
}

#[derive(Debug, Deserialize)]
pub struct VariableCode {
    pub value: String,
    #[serde(rename = "variableID", default)]
    pub variable_id: i64,
}

fn default_no_data_value() -> f64 {
    -999_999.0
}

// ---------------------------------------------------------------------------
// Series helpers
// ---------------------------------------------------------------------------

impl Variable {
    pub fn kind(&self) -> GaugeVariable {
        let parameter_code = self.variable_code.first().map(|c| c.value.as_str());
        GaugeVariable::classify(&self.oid, parameter_code)
    }
}

impl TimeSeries {
    /// The newest observation: last entry of the last method block.
    /// USGS sorts each block ascending.
    pub fn latest_observation(&self) -> Option<&Observation> {
        self.values.last().and_then(|block| block.value.last())
    }

    /// Parses the latest observation's value, ignoring unparsable text and
    /// the `noDataValue` sentinel.
    fn latest_value<T: std::str::FromStr + Into<f64> + Copy>(&self) -> Option<T> {
        let parsed: T = self.latest_observation()?.value.trim().parse().ok()?;
        let as_f64: f64 = parsed.into();
        if (as_f64 - self.variable.no_data_value).abs() < f64::EPSILON {
            None
        } else {
            Some(parsed)
        }
    }

    /// One summary line, e.g. `Temperature    : 24.30C : 75.74F`.
    pub fn summary_line(&self) -> String {
        let kind = self.variable.kind();
        let raw = self.latest_observation().map(|o| o.value.as_str());

        let value = match kind {
            GaugeVariable::Temperature => match self.latest_value::<f64>() {
                Some(c) => format!("{:.2}C : {:.2}F", c, celsius_to_fahrenheit(c)),
                None => "Unknown".to_string(),
            },
            GaugeVariable::Discharge | GaugeVariable::Stage => {
                raw.unwrap_or("Unknown").to_string()
            }
            GaugeVariable::Other => "Unknown".to_string(),
        };

        format!("{:<15}: {}", kind.label(), value)
    }
}

impl TimeSeriesResponse {
    pub fn series(&self) -> &[TimeSeries] {
        &self.value.time_series
    }

    fn series_at(&self, index: usize) -> Result<&TimeSeries, NwisError> {
        self.series().get(index).ok_or(NwisError::IndexOutOfRange {
            index,
            len: self.series().len(),
        })
    }

    fn series_of(&self, kind: GaugeVariable) -> Option<&TimeSeries> {
        self.series().iter().find(|ts| ts.variable.kind() == kind)
    }

    /// Name of the site the response describes.
    pub fn site_name(&self) -> Result<&str, NwisError> {
        Ok(self.series_at(0)?.source_info.site_name.as_str())
    }

    /// Site code of the first series, or an empty string if none is listed.
    pub fn site_id(&self) -> &str {
        self.series()
            .first()
            .and_then(|ts| ts.source_info.site_code.first())
            .map(|code| code.value.as_str())
            .unwrap_or_default()
    }

    /// Time of the latest observation in the series at `series_index`.
    ///
    /// An unparsable timestamp is replaced with the current time and
    /// returned as `ReadingTime::Substituted`.
    ///
    /// # Errors
    /// - `NwisError::IndexOutOfRange`: no series at `series_index`.
    /// - `NwisError::NoDataAvailable`: the series holds no observations.
    pub fn latest_reading_time(&self, series_index: usize) -> Result<ReadingTime, NwisError> {
        let series = self.series_at(series_index)?;
        let observation = series
            .latest_observation()
            .ok_or_else(|| NwisError::NoDataAvailable(series.name.clone()))?;
        Ok(parse_reading_time(&observation.date_time, self.site_id()))
    }

    /// Aggregates the latest temperature, discharge and stage into one
    /// reading, looking each series up by its variable rather than its
    /// position in the response.
    pub fn extract_gauges(&self) -> GaugeReading {
        let time = self
            .series_of(GaugeVariable::Temperature)
            .or_else(|| self.series().first())
            .and_then(|ts| ts.latest_observation())
            .map(|o| parse_reading_time(&o.date_time, self.site_id()))
            .unwrap_or_else(ReadingTime::now);

        let mut reading = GaugeReading {
            site_id: self.site_id().to_string(),
            time,
            stage: 0.0,
            flow: 0,
            temperature: 0.0,
        };

        for series in self.series() {
            match series.variable.kind() {
                GaugeVariable::Temperature => {
                    if let Some(c) = series.latest_value::<f32>() {
                        reading.temperature = c;
                    }
                }
                GaugeVariable::Discharge => {
                    if let Some(cfs) = series.latest_value::<u32>() {
                        reading.flow = cfs;
                    }
                }
                GaugeVariable::Stage => {
                    if let Some(ft) = series.latest_value::<f32>() {
                        reading.stage = ft;
                    }
                }
                GaugeVariable::Other => {}
            }
        }

        reading
    }

    /// Multi-line text summary of the response:
    ///
    /// ```text
    /// POTOMAC RIVER NEAR WASH, DC LITTLE FALLS PUMP STA
    /// Conditions AT: 2024-06-30 09:45:00 -04:00
    /// Temperature    : 29.10C : 84.38F
    /// Flow CFS       : 1570
    /// Height FT      : 2.71
    /// 06/30 09:45 29.10c 1570cfs 2.71ft
    /// ...one aggregate line per series
    /// ```
    ///
    /// # Errors
    /// `NwisError::IndexOutOfRange` when the response has fewer than three
    /// series, `NwisError::NoDataAvailable` when the first series is empty.
    pub fn format_summary(&self) -> Result<String, NwisError> {
        let site_name = self.site_name()?;
        let reading_time = self.latest_reading_time(0)?;

        let mut lines = vec![site_name.to_string(), format!("Conditions AT: {}", reading_time)];
        for index in 0..3 {
            lines.push(self.series_at(index)?.summary_line());
        }

        let aggregate = self.extract_gauges().to_string();
        lines.extend(self.series().iter().map(|_| aggregate.clone()));

        Ok(lines.join("\n"))
    }
}

fn parse_reading_time(raw: &str, site_id: &str) -> ReadingTime {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => ReadingTime::Reported(t),
        Err(e) => {
            logging::warn(
                DataSource::Usgs,
                Some(site_id),
                &format!("unparsable dateTime '{}' ({}), using current time", raw, e),
            );
            ReadingTime::now()
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch + render
// ---------------------------------------------------------------------------

/// Parses an IV response body. Either the whole envelope parses or the
/// call fails; no partial envelope is returned.
pub fn parse_iv_response(body: &[u8]) -> Result<TimeSeriesResponse, NwisError> {
    serde_json::from_slice(body).map_err(|e| NwisError::ParseError(e.to_string()))
}

/// Fetches and parses the current IV response for `site_id`.
pub fn fetch_gauge_data(
    client: &Client,
    base_url: &str,
    site_id: &str,
) -> Result<TimeSeriesResponse, NwisError> {
    let url = build_iv_url(base_url, site_id);
    let body = http::fetch(client, &url)?;
    let response = parse_iv_response(&body)?;

    logging::debug(
        DataSource::Usgs,
        Some(site_id),
        &format!("parsed {} time series", response.series().len()),
    );

    Ok(response)
}

/// Text for the USGS view. Never fails; errors are rendered inline.
pub fn site_report(client: &Client, base_url: &str, site_id: &str) -> String {
    match fetch_gauge_data(client, base_url, site_id).and_then(|ts| ts.format_summary()) {
        Ok(text) => text,
        Err(e) => {
            logging::log_failure(DataSource::Usgs, site_id, "site_report", &e);
            format!("Failed to get site: {}", e)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

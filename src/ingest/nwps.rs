/// NOAA National Water Prediction Service (NWPS) stage/flow client.
///
/// Fetches observed and forecast hydrographs for a NWS gauge from
///   https://api.water.noaa.gov/nwps/v1/gauges/{lid}/stageflow/{product}
///
/// Unlike NWIS, the product is a flat series with the units declared once
/// at the top and numeric values in each entry.

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::ingest::http;
use crate::logging::{self, DataSource};
use crate::model::{format_local, NwpsError};

pub const NWPS_BASE_URL: &str = "https://api.water.noaa.gov/nwps/v1";

/// Number of most-recent observations shown in the observed view.
pub const OBSERVED_LIMIT: usize = 11;

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    Observed,
    Forecast,
}

impl Product {
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Observed => "observed",
            Product::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn build_stageflow_url(base_url: &str, site_id: &str, product: Product) -> String {
    format!("{}/gauges/{}/stageflow/{}", base_url, site_id, product)
}

// ---------------------------------------------------------------------------
// Response structures
// ---------------------------------------------------------------------------

/// A stage/flow product as returned by NWPS.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageFlowSeries {
    #[serde(rename = "pedts", default)]
    pub pe_dts: String,
    // NWPS sends null here for gauges with no current product.
    #[serde(default)]
    pub issued_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub wfo: String,
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub primary_name: String,
    #[serde(default)]
    pub primary_units: String,
    #[serde(default)]
    pub secondary_name: String,
    #[serde(default)]
    pub secondary_units: String,
    #[serde(default)]
    pub data: Vec<StageFlowPoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageFlowPoint {
    pub valid_time: DateTime<Utc>,
    pub generated_time: DateTime<Utc>,
    // Either value may be missing or null for a single entry; treat it as zero.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub primary: f32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub secondary: f32,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or_default())
}

impl StageFlowSeries {
    fn issued_at(&self) -> String {
        self.issued_time
            .as_ref()
            .map(format_local)
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn format_point(&self, point: &StageFlowPoint) -> String {
        format!(
            "{} {}:{:.2} {}:{:.2}",
            format_local(&point.valid_time),
            self.primary_units,
            point.primary,
            self.secondary_units,
            point.secondary
        )
    }

    /// Header plus the newest `OBSERVED_LIMIT` entries, newest first.
    pub fn format_observed(&self) -> String {
        let mut output = format!("Observations issued at {}\n", self.issued_at());
        for point in self.data.iter().rev().take(OBSERVED_LIMIT) {
            output.push_str(&self.format_point(point));
            output.push('\n');
        }
        output
    }

    /// Header plus every entry in the order given.
    pub fn format_forecast(&self) -> String {
        let mut output = format!("Forecast issued at {}\n", self.issued_at());
        for point in &self.data {
            output.push_str(&self.format_point(point));
            output.push('\n');
        }
        output
    }
}

// ---------------------------------------------------------------------------
// Fetch + render
// ---------------------------------------------------------------------------

pub fn parse_stageflow_response(body: &[u8]) -> Result<StageFlowSeries, NwpsError> {
    serde_json::from_slice(body).map_err(|e| NwpsError::ParseError(e.to_string()))
}

/// Fetches one stage/flow product for `site_id`.
pub fn fetch_product(
    client: &Client,
    base_url: &str,
    site_id: &str,
    product: Product,
) -> Result<StageFlowSeries, NwpsError> {
    let url = build_stageflow_url(base_url, site_id, product);
    let body = http::fetch(client, &url)?;
    let series = parse_stageflow_response(&body)?;

    logging::debug(
        DataSource::Nwps,
        Some(site_id),
        &format!("{} product with {} entries", product, series.data.len()),
    );

    Ok(series)
}

fn report(client: &Client, base_url: &str, site_id: &str, product: Product) -> String {
    match fetch_product(client, base_url, site_id, product) {
        Ok(series) => match product {
            Product::Observed => series.format_observed(),
            Product::Forecast => series.format_forecast(),
        },
        Err(e) => {
            logging::log_failure(DataSource::Nwps, site_id, &format!("{} report", product), &e);
            format!("Failed to get Site info: {}\n", e)
        }
    }
}

/// Text for the Observed view. Never fails; errors are rendered inline.
pub fn observed_report(client: &Client, base_url: &str, site_id: &str) -> String {
    report(client, base_url, site_id, Product::Observed)
}

/// Text for the Forecast view. Never fails; errors are rendered inline.
pub fn forecast_report(client: &Client, base_url: &str, site_id: &str) -> String {
    report(client, base_url, site_id, Product::Forecast)
}

/// The four river-condition views and the report each one shows.
///
/// Each view maps to exactly one adapter call. Views hold no state: every
/// refresh fetches again and returns fresh text.

use reqwest::blocking::Client;
use std::fmt;
use std::str::FromStr;

use crate::config::Config;
use crate::ingest::{nwps, owm, usgs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Usgs,
    Observed,
    Forecast,
    Weather,
}

impl View {
    /// Views in tab order.
    pub const ALL: [View; 4] = [View::Usgs, View::Observed, View::Forecast, View::Weather];

    pub fn title(&self) -> &'static str {
        match self {
            View::Usgs => "USGS",
            View::Observed => "Observed",
            View::Forecast => "Forecast",
            View::Weather => "Weather",
        }
    }

    /// Fetches this view's data and renders it. Failures come back as text.
    pub fn refresh(&self, client: &Client, config: &Config) -> String {
        match self {
            View::Usgs => usgs::site_report(client, &config.nwis.base_url, &config.nwis.site_id),
            View::Observed => {
                nwps::observed_report(client, &config.nwps.base_url, &config.nwps.site_id)
            }
            View::Forecast => {
                nwps::forecast_report(client, &config.nwps.base_url, &config.nwps.site_id)
            }
            View::Weather => owm::current_conditions_report(
                client,
                &config.weather.base_url,
                config.weather.api_key.as_deref().unwrap_or_default(),
                &config.weather.units,
                &config.weather.language,
                config.weather.coordinates(),
            ),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.title().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown view '{}' (expected one of: usgs, observed, forecast, weather)",
                    s
                )
            })
    }
}

/// Structured logging for the river conditions service
///
/// Wraps `tracing` with data-source and site context so every adapter logs
/// the same way. Failures are classified before logging so that upstream
/// outages read differently from schema changes.

use std::fmt;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Usgs,
    Nwps,
    Owm,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Usgs => write!(f, "USGS"),
            DataSource::Nwps => write!(f, "NWPS"),
            DataSource::Owm => write!(f, "OWM"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - gauge offline or product not issued yet
    Expected,
    /// Unexpected failure - service degradation, API change or bad configuration
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `min_level` when set. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_logger(min_level: LogLevel, console_timestamps: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(min_level.as_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = if console_timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };

    if result.is_err() {
        debug(DataSource::System, None, "logger already initialized");
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(source: DataSource, site_id: Option<&str>, message: &str) {
    tracing::info!(source = %source, site = site_id.unwrap_or("-"), "{}", message);
}

/// Log a warning message
pub fn warn(source: DataSource, site_id: Option<&str>, message: &str) {
    tracing::warn!(source = %source, site = site_id.unwrap_or("-"), "{}", message);
}

/// Log an error message
pub fn error(source: DataSource, site_id: Option<&str>, message: &str) {
    tracing::error!(source = %source, site = site_id.unwrap_or("-"), "{}", message);
}

/// Log a debug message
pub fn debug(source: DataSource, site_id: Option<&str>, message: &str) {
    tracing::debug!(source = %source, site = site_id.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a data source failure from its rendered error message.
pub fn classify_failure(source: DataSource, error_message: &str) -> FailureType {
    // A 404 from NWPS means the product has not been issued for this gauge.
    if source == DataSource::Nwps && error_message.contains("status error: 404") {
        FailureType::Expected
    }
    // Bad key or bad request parameters never fix themselves
    else if error_message.contains("status error: 401")
        || error_message.contains("invalid API key")
        || error_message.contains("invalid URL")
    {
        FailureType::Unexpected
    }
    // Parse errors and short responses suggest API changes
    else if error_message.contains("Parse error") || error_message.contains("out of range") {
        FailureType::Unexpected
    }
    else if error_message.contains("No data available") {
        FailureType::Unknown
    }
    else if error_message.contains("status error: 5") || error_message.contains("GET error") {
        FailureType::Unexpected
    }
    else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a data source failure with automatic classification
pub fn log_failure(
    source: DataSource,
    site_id: &str,
    operation: &str,
    err: &dyn std::error::Error,
) -> FailureType {
    let error_msg = err.to_string();
    let failure_type = classify_failure(source, &error_msg);

    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(source, Some(site_id), &message),
        FailureType::Unexpected => error(source, Some(site_id), &message),
        FailureType::Unknown => warn(source, Some(site_id), &message),
    }

    failure_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FetchError, NwisError};

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_init_logger_twice_is_harmless() {
        init_logger(LogLevel::Info, true);
        init_logger(LogLevel::Debug, false);
        info(DataSource::System, Some("01646500"), "logger ready");
    }

    #[test]
    fn test_failure_classification() {
        let server_error = FetchError::Status(503).to_string();
        assert_eq!(
            classify_failure(DataSource::Usgs, &server_error),
            FailureType::Unexpected
        );

        let not_issued = FetchError::Status(404).to_string();
        assert_eq!(classify_failure(DataSource::Nwps, &not_issued), FailureType::Expected);
        assert_eq!(classify_failure(DataSource::Usgs, &not_issued), FailureType::Unknown);

        let short = NwisError::IndexOutOfRange { index: 2, len: 1 }.to_string();
        assert_eq!(classify_failure(DataSource::Usgs, &short), FailureType::Unexpected);
    }

    #[test]
    fn test_log_failure_returns_classification() {
        let err = NwisError::ParseError("expected value".to_string());
        assert_eq!(
            log_failure(DataSource::Usgs, "01646500", "fetch_gauge_data", &err),
            FailureType::Unexpected
        );
    }
}

//! littlefalls: print Potomac River conditions at Little Falls.
//!
//! Terminal stand-in for the tabbed viewer: each requested view is fetched
//! once, in order, and printed under its title.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use littlefalls_service::config::{self, DEFAULT_CONFIG_PATH};
use littlefalls_service::ingest::http;
use littlefalls_service::logging::{self, DataSource, LogLevel};
use littlefalls_service::stations;
use littlefalls_service::view::View;

/// River gauge and weather conditions for Little Falls, Potomac River
#[derive(Parser)]
#[command(name = "littlefalls", version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Prefix log lines with timestamps.
    #[arg(long)]
    timestamps: bool,

    /// Views to show (usgs, observed, forecast, weather). Defaults to all.
    views: Vec<View>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warning };
    logging::init_logger(level, cli.timestamps);

    let cfg = match config::load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            logging::error(DataSource::System, None, &format!("Configuration error: {}", e));
            return ExitCode::FAILURE;
        }
    };

    match stations::find_station(&cfg.nwis.site_id) {
        Some(station) => logging::info(
            DataSource::System,
            Some(station.usgs_site_code),
            &format!("showing {} (NWPS {})", station.name, cfg.nwps.site_id),
        ),
        None => logging::warn(
            DataSource::System,
            Some(&cfg.nwis.site_id),
            "site is not in the station registry; using configured identifiers as-is",
        ),
    }

    let client = match http::build_client() {
        Ok(c) => c,
        Err(e) => {
            logging::error(DataSource::System, None, &format!("HTTP client error: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let views = if cli.views.is_empty() {
        View::ALL.to_vec()
    } else {
        cli.views
    };

    for view in views {
        println!("== {} ==", view.title());
        println!("{}", view.refresh(&client, &cfg).trim_end());
        println!();
    }

    ExitCode::SUCCESS
}

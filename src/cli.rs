//! Command-line interface parsing for Hello Weather
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `StartupConfig`. Validation happens before the terminal enters
//! raw mode so errors print normally.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::{Location, LookupTarget};
use crate::series::FORECAST_DAYS;
use crate::settings::Units;
use crate::worker::RefreshConfig;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// Only one of --lat / --lon was given
    #[error("--lat and --lon must be given together")]
    IncompleteCoordinates,

    /// Coordinates outside the valid range
    #[error("Invalid coordinates: {0}, {1}. Latitude must be within -90..90 and longitude within -180..180")]
    InvalidCoordinates(f64, f64),

    /// Selected day outside the forecast
    #[error("Invalid day: {0}. Valid days: 0-6 (0 is today)")]
    InvalidDay(usize),
}

/// Hello Weather - hourly charts, a 7-day forecast and a map in your terminal
#[derive(Parser, Debug)]
#[command(name = "helloweather")]
#[command(about = "Weather forecast dashboard for any place on earth")]
#[command(version)]
pub struct Cli {
    /// Place to look up, e.g. "Berlin" or "Main St, Springfield"
    ///
    /// Examples:
    ///   helloweather                    # Resume the last location
    ///   helloweather Hamburg            # Look up Hamburg
    ///   helloweather --lat 48.2 --lon 16.37
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,

    /// Latitude to start at (requires --lon)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude to start at (requires --lat)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Initially selected forecast day, 0 (today) to 6
    #[arg(long, value_name = "N")]
    pub day: Option<usize>,

    /// Use the dark theme
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Use the light theme
    #[arg(long)]
    pub light: bool,

    /// Show temperatures in °F
    #[arg(long)]
    pub fahrenheit: bool,

    /// Minutes between automatic refreshes (0 disables)
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub refresh_minutes: u64,

    /// Always ask the timezone service instead of the weather API's zone
    #[arg(long)]
    pub timezone_lookup: bool,

    /// Write logs to this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// Location to load right away; `None` falls back to the saved location
    pub initial_target: Option<LookupTarget>,
    /// Selected forecast day
    pub initial_day: usize,
    /// Theme override; `None` keeps the saved theme
    pub dark_mode: Option<bool>,
    /// Unit override; `None` keeps the saved unit
    pub units: Option<Units>,
    pub refresh: RefreshConfig,
    pub timezone_lookup: bool,
    pub log_file: Option<PathBuf>,
}

/// Validates a --lat / --lon pair
///
/// # Returns
/// * `Ok(None)` if neither was given
/// * `Ok(Some(Location))` if both were given and are in range
/// * `Err(CliError)` otherwise
pub fn parse_coordinates(lat: Option<f64>, lon: Option<f64>) -> Result<Option<Location>, CliError> {
    match (lat, lon) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => Location::new(lat, lon)
            .map(Some)
            .ok_or(CliError::InvalidCoordinates(lat, lon)),
        _ => Err(CliError::IncompleteCoordinates),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// A query takes precedence over coordinates.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let coordinates = parse_coordinates(cli.lat, cli.lon)?;

        let initial_day = cli.day.unwrap_or(0);
        if initial_day >= FORECAST_DAYS {
            return Err(CliError::InvalidDay(initial_day));
        }

        let query = cli.query.join(" ");
        let initial_target = if !query.trim().is_empty() {
            Some(LookupTarget::Query(query.trim().to_string()))
        } else {
            coordinates.map(LookupTarget::at)
        };

        let dark_mode = match (cli.dark, cli.light) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        Ok(StartupConfig {
            initial_target,
            initial_day,
            dark_mode,
            units: cli.fahrenheit.then_some(Units::Fahrenheit),
            refresh: RefreshConfig::from_minutes(cli.refresh_minutes),
            timezone_lookup: cli.timezone_lookup,
            log_file: cli.log_file.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinates_both_or_neither() {
        assert_eq!(parse_coordinates(None, None), Ok(None));
        assert_eq!(
            parse_coordinates(Some(52.5), Some(13.4)),
            Ok(Location::new(52.5, 13.4))
        );
        assert_eq!(
            parse_coordinates(Some(52.5), None),
            Err(CliError::IncompleteCoordinates)
        );
        assert_eq!(
            parse_coordinates(None, Some(13.4)),
            Err(CliError::IncompleteCoordinates)
        );
    }

    #[test]
    fn test_parse_coordinates_out_of_range() {
        let err = parse_coordinates(Some(91.0), Some(0.0)).unwrap_err();
        assert_eq!(err, CliError::InvalidCoordinates(91.0, 0.0));
        assert!(err.to_string().contains("Invalid coordinates"));
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert!(config.initial_target.is_none());
        assert_eq!(config.initial_day, 0);
        assert!(config.dark_mode.is_none());
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["helloweather"]);
        assert!(cli.query.is_empty());
        assert_eq!(cli.refresh_minutes, 10);
        assert!(!cli.timezone_lookup);
    }

    #[test]
    fn test_cli_multi_word_query() {
        let cli = Cli::parse_from(["helloweather", "New", "York"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.initial_target,
            Some(LookupTarget::Query("New York".to_string()))
        );
    }

    #[test]
    fn test_cli_negative_coordinates() {
        let cli = Cli::parse_from(["helloweather", "--lat", "-33.87", "--lon", "-151.2"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.initial_target,
            Some(LookupTarget::at(Location::new(-33.87, -151.2).unwrap()))
        );
    }

    #[test]
    fn test_query_wins_over_coordinates() {
        let cli = Cli::parse_from(["helloweather", "Oslo", "--lat", "1", "--lon", "2"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.initial_target,
            Some(LookupTarget::Query("Oslo".to_string()))
        );
    }

    #[test]
    fn test_invalid_day_rejected() {
        let cli = Cli::parse_from(["helloweather", "--day", "7"]);
        assert_eq!(
            StartupConfig::from_cli(&cli).unwrap_err(),
            CliError::InvalidDay(7)
        );

        let cli = Cli::parse_from(["helloweather", "--day", "6"]);
        assert_eq!(StartupConfig::from_cli(&cli).unwrap().initial_day, 6);
    }

    #[test]
    fn test_theme_and_units_overrides() {
        let cli = Cli::parse_from(["helloweather", "--dark", "--fahrenheit"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.dark_mode, Some(true));
        assert_eq!(config.units, Some(Units::Fahrenheit));

        let cli = Cli::parse_from(["helloweather", "--light"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.dark_mode, Some(false));
        assert_eq!(config.units, None);
    }

    #[test]
    fn test_dark_conflicts_with_light() {
        assert!(Cli::try_parse_from(["helloweather", "--dark", "--light"]).is_err());
    }

    #[test]
    fn test_refresh_minutes_zero_disables() {
        let cli = Cli::parse_from(["helloweather", "--refresh-minutes", "0"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(!config.refresh.enabled);
    }

    #[test]
    fn test_log_file_and_timezone_flags() {
        let cli = Cli::parse_from([
            "helloweather",
            "--timezone-lookup",
            "--log-file",
            "/tmp/hw.log",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(config.timezone_lookup);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/hw.log")));
    }
}

//! Integration tests for CLI argument handling
//!
//! Runs the binary with arguments that fail validation or print help, so no
//! terminal is needed.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_helloweather"))
        .args(args)
        .output()
        .expect("Failed to execute helloweather")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("helloweather"), "Help should mention helloweather");
    assert!(stdout.contains("--lat"), "Help should mention --lat");
    assert!(stdout.contains("--fahrenheit"), "Help should mention --fahrenheit");
}

#[test]
fn test_invalid_day_prints_error_and_exits() {
    let output = run_cli(&["--day", "9"]);
    assert!(!output.status.success(), "Expected invalid day to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid day"),
        "Should print error message about the day: {}",
        stderr
    );
}

#[test]
fn test_lat_without_lon_fails() {
    let output = run_cli(&["--lat", "52.5"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("--lat and --lon"),
        "Should explain the missing coordinate: {}",
        stderr
    );
}

#[test]
fn test_out_of_range_coordinates_fail() {
    let output = run_cli(&["--lat", "95", "--lon", "10"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid coordinates"), "{}", stderr);
}

#[test]
fn test_dark_and_light_conflict() {
    let output = run_cli(&["--dark", "--light"]);
    assert!(!output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use helloweather::cli::{Cli, CliError, StartupConfig};
    use helloweather::data::{Location, LookupTarget};
    use helloweather::settings::Units;

    #[test]
    fn test_cli_no_args_has_no_target() {
        let cli = Cli::parse_from(["helloweather"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(config.initial_target.is_none());
        assert!(config.refresh.enabled);
    }

    #[test]
    fn test_cli_coordinates_become_target() {
        let cli = Cli::parse_from(["helloweather", "--lat", "48.2", "--lon", "16.37"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.initial_target,
            Some(LookupTarget::at(Location::new(48.2, 16.37).unwrap()))
        );
    }

    #[test]
    fn test_cli_query_and_units() {
        let cli = Cli::parse_from(["helloweather", "Rio", "de", "Janeiro", "--fahrenheit"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(
            config.initial_target,
            Some(LookupTarget::Query("Rio de Janeiro".to_string()))
        );
        assert_eq!(config.units, Some(Units::Fahrenheit));
    }

    #[test]
    fn test_cli_rejects_day_past_forecast() {
        let cli = Cli::parse_from(["helloweather", "--day", "7"]);
        assert_eq!(
            StartupConfig::from_cli(&cli).unwrap_err(),
            CliError::InvalidDay(7)
        );
    }
}

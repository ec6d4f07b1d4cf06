// Configuration and validation tests
// Author: Gabriel Demetrios Lafis

use std::io::Write;

use taxi_trip_analytics::utils::{validate_finite, validate_non_negative, AppError, Config};

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.server.port, 8080);
    assert!(!config.server.enable_cors);
    assert_eq!(config.dataset.delimiter, ',');
    assert_eq!(config.log_level_filter(), log::LevelFilter::Info);

    let options = config.query_options();
    assert_eq!(options.row_limit, 100);
    assert_eq!(options.preview_limit, 10);
    assert_eq!(options.sample_seed, None);
}

#[test]
fn test_yaml_config() {
    let file = write_temp(
        ".yaml",
        "server:\n  port: 9000\ndataset:\n  path: trips.csv\nquery:\n  row_limit: 25\n  sample_seed: 7\nlogging:\n  level: DEBUG\n",
    );

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.server.port, 9000);
    // Sections and fields left out keep their defaults
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.dataset.path.as_deref(), Some("trips.csv"));
    assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);

    let options = config.query_options();
    assert_eq!(options.row_limit, 25);
    assert_eq!(options.preview_limit, 10);
    assert_eq!(options.sample_seed, Some(7));
}

#[test]
fn test_json_config() {
    let file = write_temp(".json", r#"{"dataset": {"delimiter": ";"}, "server": {"enable_cors": true}}"#);

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.dataset.delimiter, ';');
    assert!(config.server.enable_cors);
}

#[test]
fn test_invalid_config() {
    let file = write_temp(".toml", "port = 1");
    assert!(matches!(Config::from_file(file.path()), Err(AppError::Config(_))));

    let file = write_temp(".json", "{not json");
    assert!(matches!(Config::from_file(file.path()), Err(AppError::Config(_))));

    assert!(matches!(Config::from_file("/nonexistent/config.yaml"), Err(AppError::Io(_))));
}

#[test]
fn test_validation() {
    assert_eq!(validate_non_negative(5, "n"), Ok(5));
    assert!(validate_non_negative(-1, "n").is_err());

    assert_eq!(validate_finite(2.5, "min_tip"), Ok(2.5));
    assert!(validate_finite(f64::NAN, "min_tip").is_err());
    assert!(validate_finite(f64::INFINITY, "min_tip").is_err());
}

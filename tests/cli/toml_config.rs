//! CLI TOML configuration tests

use boundbuf::app::cli::args::*;
use boundbuf::app::cli::FileConfig;
use boundbuf::app::error::AppError;
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_config_file_fills_unset_values() {
    let file = write_config(
        r#"
        capacity = 3
        consumers = 6
        drain-delay-ms = 10
        color = false
        log-level = "WARN"
        "#,
    );
    let path = file.path().to_str().unwrap();
    let mut args = Args::try_parse_from(["boundbuf", "--config-file", path, "-n", "2"]).unwrap();

    let config = args.load_config_file().await.unwrap().unwrap();
    args.apply_file_config(&config).unwrap();
    let settings = args.run_settings().unwrap();

    assert_eq!(settings.capacity, 3);
    assert_eq!(settings.consumers, 2, "command line wins over the file");
    assert_eq!(settings.producers, DEFAULT_PRODUCERS);
    assert_eq!(settings.drain_delay, Duration::from_millis(10));
    assert_eq!(args.color_preference(), Some(false));
    assert_eq!(args.log_level.as_deref(), Some("warn"));
}

#[tokio::test]
async fn test_cli_color_flag_beats_config_color() {
    let file = write_config("color = false\n");
    let path = file.path().to_str().unwrap();
    let mut args = Args::try_parse_from(["boundbuf", "-C", path, "--color"]).unwrap();

    let config = args.load_config_file().await.unwrap().unwrap();
    args.apply_file_config(&config).unwrap();

    assert_eq!(args.color_preference(), Some(true));
}

#[tokio::test]
async fn test_missing_explicit_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let args = Args::try_parse_from(["boundbuf", "-C", missing.to_str().unwrap()]).unwrap();

    let err = args.load_config_file().await.unwrap_err();
    assert!(matches!(err, AppError::Config { .. }));
    assert!(err.to_string().contains("does not exist"), "got: {}", err);
}

#[tokio::test]
async fn test_malformed_config_file_is_an_error() {
    let file = write_config("capacity = \"lots\"\n");
    let path = file.path().to_str().unwrap();
    let args = Args::try_parse_from(["boundbuf", "-C", path]).unwrap();

    let err = args.load_config_file().await.unwrap_err();
    assert!(err.to_string().contains("Error parsing configuration file"), "got: {}", err);
}

#[test]
fn test_negative_count_in_config_is_rejected() {
    let config = FileConfig::from_toml_str("items = -5").unwrap();
    let mut args = Args::new();

    let err = args.apply_file_config(&config).unwrap_err();
    assert!(err.message().contains("'items'"), "got: {}", err.message());
}

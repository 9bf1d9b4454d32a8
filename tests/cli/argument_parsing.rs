//! CLI argument parsing tests

use boundbuf::app::cli::args::*;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_no_arguments_gives_reference_workload() {
    let args = Args::try_parse_from(["boundbuf"]).unwrap();
    let settings = args.run_settings().unwrap();

    assert_eq!(settings.capacity, DEFAULT_CAPACITY);
    assert_eq!(settings.producers, DEFAULT_PRODUCERS);
    assert_eq!(settings.consumers, DEFAULT_CONSUMERS);
    assert_eq!(settings.items_per_producer, DEFAULT_ITEMS_PER_PRODUCER);
    assert_eq!(settings.total_items(), Some(32));
}

#[test]
fn test_workload_flags_short_and_long() {
    let args = Args::try_parse_from([
        "boundbuf", "-c", "4", "--producers", "3", "-n", "7", "--items=100", "-d", "25",
    ])
    .unwrap();
    let settings = args.run_settings().unwrap();

    assert_eq!(settings.capacity, 4);
    assert_eq!(settings.producers, 3);
    assert_eq!(settings.consumers, 7);
    assert_eq!(settings.items_per_producer, 100);
    assert_eq!(settings.drain_delay, Duration::from_millis(25));
    assert_eq!(settings.total_items(), Some(300));
}

#[test]
fn test_zero_counts_are_rejected_at_parse_time() {
    for flag in ["--capacity", "--producers", "--consumers", "--items"] {
        let result = Args::try_parse_from(["boundbuf", flag, "0"]);
        assert!(result.is_err(), "{} 0 should be rejected", flag);
    }
}

#[test]
fn test_non_numeric_count_is_rejected() {
    assert!(Args::try_parse_from(["boundbuf", "--capacity", "ten"]).is_err());
    assert!(Args::try_parse_from(["boundbuf", "--capacity", "-3"]).is_err());
}

#[test]
fn test_color_flags_conflict() {
    assert!(Args::try_parse_from(["boundbuf", "--color", "--no-color"]).is_err());

    let args = Args::try_parse_from(["boundbuf", "--no-color"]).unwrap();
    assert_eq!(args.color_preference(), Some(false));
    assert!(!args.use_color());

    let args = Args::try_parse_from(["boundbuf", "-g"]).unwrap();
    assert!(args.use_color());
}

#[test]
fn test_log_options() {
    let args = Args::try_parse_from([
        "boundbuf",
        "--log-level",
        "debug",
        "-o",
        "json",
        "--log-file",
        "/tmp/boundbuf.log",
    ])
    .unwrap();

    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("json"));
    assert_eq!(
        args.effective_log_file(),
        Some(&PathBuf::from("/tmp/boundbuf.log"))
    );

    assert!(Args::try_parse_from(["boundbuf", "--log-level", "verbose"]).is_err());
    assert!(Args::try_parse_from(["boundbuf", "--log-format", "xml"]).is_err());
}

#[test]
fn test_log_file_none_disables_file_logging() {
    for value in ["none", "NONE", "-"] {
        let args = Args::try_parse_from(["boundbuf", "--log-file", value]).unwrap();
        assert_eq!(args.effective_log_file(), None, "value {:?}", value);
    }
}

#[test]
fn test_workload_too_large_for_value_range() {
    let items = usize::MAX.to_string();
    let args = Args::try_parse_from(["boundbuf", "-p", "2", "-i", items.as_str()]).unwrap();
    assert!(args.run_settings().is_err());
}

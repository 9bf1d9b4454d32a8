//! Core CLI arguments structure
//!
//! Every workload option is optional at parse time so that values from the
//! configuration file can fill the gaps; `run_settings()` applies the
//! built-in defaults last.

use crate::app::runner::RunSettings;
use crate::core::validation::{validate_positive_int, ValidationError};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CAPACITY: usize = 10;
pub const DEFAULT_PRODUCERS: usize = 1;
pub const DEFAULT_CONSUMERS: usize = 32;
pub const DEFAULT_ITEMS_PER_PRODUCER: usize = 32;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "boundbuf")]
#[command(about = "Run producers and consumers over a shared bounded buffer")]
#[command(version)]
pub struct Args {
    /// Maximum number of queued slots
    #[arg(short = 'c', long = "capacity", value_name = "SLOTS", value_parser = validate_positive_int)]
    pub capacity: Option<usize>,

    /// Number of producer tasks
    #[arg(short = 'p', long = "producers", value_name = "COUNT", value_parser = validate_positive_int)]
    pub producers: Option<usize>,

    /// Number of consumer tasks
    #[arg(short = 'n', long = "consumers", value_name = "COUNT", value_parser = validate_positive_int)]
    pub consumers: Option<usize>,

    /// Integers pushed by each producer
    #[arg(short = 'i', long = "items", value_name = "COUNT", value_parser = validate_positive_int)]
    pub items: Option<usize>,

    /// Pause between the last producer finishing and the end-of-stream markers
    #[arg(short = 'd', long = "drain-delay-ms", value_name = "MILLIS")]
    pub drain_delay_ms: Option<u64>,

    /// Configuration file path
    #[arg(short = 'C', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Force colored output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Color preference from a configuration file, used when neither flag is given
    #[arg(skip)]
    pub config_color: Option<bool>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit color choice: flags first, then config file, otherwise None (auto)
    pub fn color_preference(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => self.config_color,
        }
    }

    /// Resolve color against the terminal when no explicit choice was made
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;

        self.color_preference()
            .unwrap_or_else(|| std::io::stdout().is_terminal())
    }

    /// Log file path, honouring the "none" and "-" magic values
    pub fn effective_log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref().filter(|path| {
            let raw = path.to_string_lossy();
            !(raw.eq_ignore_ascii_case("none") || raw == "-")
        })
    }

    /// Workload settings with built-in defaults for anything left unset
    ///
    /// Fails when producers times items does not fit the value range.
    pub fn run_settings(&self) -> Result<RunSettings, ValidationError> {
        let settings = RunSettings {
            capacity: self.capacity.unwrap_or(DEFAULT_CAPACITY),
            producers: self.producers.unwrap_or(DEFAULT_PRODUCERS),
            consumers: self.consumers.unwrap_or(DEFAULT_CONSUMERS),
            items_per_producer: self.items.unwrap_or(DEFAULT_ITEMS_PER_PRODUCER),
            drain_delay: Duration::from_millis(self.drain_delay_ms.unwrap_or(0)),
        };
        settings.validate()?;
        Ok(settings)
    }
}

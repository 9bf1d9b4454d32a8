//! Logging setup on top of flexi_logger
//!
//! Formats:
//! - `text`: `YYYY-MM-DD HH:mm:ss.fff INF message`
//! - `ext`: text plus the source location, `(buffer/internal.rs:142)`
//! - `json`: one compact object per line

use flexi_logger::{DeferredNow, FileSpec, Logger, LoggerHandle};
use std::sync::{Mutex, OnceLock};

// Dropping the handle shuts the logger down, so it lives for the process
static LOGGER_HANDLE: OnceLock<Mutex<LoggerHandle>> = OnceLock::new();

pub fn init_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&str>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level_str = log_level.unwrap_or("info");
    let mut logger = Logger::try_with_str(level_str)?;

    logger = match (log_format.unwrap_or("text"), color_enabled) {
        ("json", _) => logger.format(json_format),
        ("ext", true) => logger.format(extended_color_format),
        ("ext", false) => logger.format(extended_format),
        (_, true) => logger.format(simple_color_format),
        (_, false) => logger.format(simple_format),
    };

    if let Some(file_path) = log_file {
        let file_spec = FileSpec::try_from(std::path::Path::new(file_path))?;
        logger = logger.log_to_file(file_spec);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(Mutex::new(handle));

    Ok(())
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn level_colored(level: log::Level) -> colored::ColoredString {
    use colored::Colorize;

    match level {
        log::Level::Error => "ERR".red().bold(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Info => "INF".green(),
        log::Level::Debug => "DBG".blue(),
        log::Level::Trace => "TRC".magenta(),
    }
}

fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args()
    )
}

fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args()
    )
}

fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line())
    )
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line()).dimmed()
    )
}

fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    let json_obj = serde_json::json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_abbr(record.level()),
        "message": record.args().to_string(),
        "target": format_target_as_path(record.target(), record.line()),
    });

    match serde_json::to_string(&json_obj) {
        Ok(json_string) => w.write_all(json_string.as_bytes()),
        Err(_) => w.write_all(b"{\"error\":\"Failed to serialize log message\"}"),
    }
}

// boundbuf::buffer::internal -> buffer/internal.rs:LINE
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = match target.strip_prefix("boundbuf::") {
        Some(without_prefix) => without_prefix.replace("::", "/") + ".rs",
        None => target.replace("::", "/"),
    };

    match line {
        Some(line_num) => format!("{}:{}", path_like, line_num),
        None => path_like,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn render(
        format: fn(&mut dyn std::io::Write, &mut DeferredNow, &log::Record) -> Result<(), std::io::Error>,
        record: &log::Record,
    ) -> String {
        let mut buffer = Vec::new();
        let mut now = DeferredNow::new();
        format(&mut buffer, &mut now, record).expect("Format function should succeed");
        String::from_utf8(buffer).expect("Output should be valid UTF-8")
    }

    #[test]
    fn test_simple_format_structure() {
        let record = log::Record::builder()
            .level(log::Level::Info)
            .target("boundbuf::app::runner")
            .args(format_args!("consumer 3 consumed 17"))
            .build();

        let output = render(simple_format, &record);
        assert!(
            output.contains("INF consumer 3 consumed 17"),
            "got: {}",
            output
        );
        assert!(!output.contains("runner"), "text format omits the target");
    }

    #[test]
    fn test_extended_format_includes_location() {
        let record = log::Record::builder()
            .level(log::Level::Warn)
            .target("boundbuf::buffer::internal")
            .line(Some(42))
            .args(format_args!("Recovering poisoned lock"))
            .build();

        let output = render(extended_format, &record);
        assert!(output.contains("WRN Recovering poisoned lock"));
        assert!(output.ends_with("(buffer/internal.rs:42)"), "got: {}", output);
    }

    #[test]
    fn test_json_format_is_valid_json() {
        let record = log::Record::builder()
            .level(log::Level::Debug)
            .target("external::crate")
            .args(format_args!("quoted \"value\""))
            .build();

        let output = render(json_format, &record);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["level"], "DBG");
        assert_eq!(parsed["message"], "quoted \"value\"");
        assert_eq!(parsed["target"], "external/crate");
    }

    #[test]
    fn test_format_target_as_path() {
        assert_eq!(
            format_target_as_path("boundbuf::app::startup", Some(7)),
            "app/startup.rs:7"
        );
        assert_eq!(format_target_as_path("tokio::runtime", None), "tokio/runtime");
    }

    #[test]
    #[serial]
    fn test_init_logging_rejects_bad_level_spec() {
        let result = init_logging(Some("boundbuf=info=debug"), None, None, false);
        assert!(result.is_err());
        assert!(LOGGER_HANDLE.get().is_none());
    }
}

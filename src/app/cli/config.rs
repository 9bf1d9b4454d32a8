//! TOML configuration file parsing and loading
//!
//! Keys mirror the long command-line flags:
//!
//! ```toml
//! capacity = 10
//! producers = 1
//! consumers = 32
//! items = 32
//! drain-delay-ms = 0
//! color = true
//! log-level = "info"
//! log-format = "text"
//! log-file = "none"
//! ```
//!
//! Values given on the command line always win over the file.

use crate::app::error::{AppError, AppResult};
use crate::core::validation::{validate_config_count, ValidationError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::args::Args;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];
const LOG_FORMATS: &[&str] = &["text", "ext", "json"];

/// Contents of a configuration file
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub capacity: Option<i64>,
    pub producers: Option<i64>,
    pub consumers: Option<i64>,
    pub items: Option<i64>,
    pub drain_delay_ms: Option<u64>,
    pub color: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<String>,
}

impl FileConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Default configuration file location, `<config_dir>/Boundbuf/boundbuf.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Boundbuf").join("boundbuf.toml"))
}

impl Args {
    /// Load the configuration file named on the command line, or the default
    /// one if it exists
    ///
    /// An explicitly named file must exist; a missing default file is not an
    /// error.
    pub async fn load_config_file(&self) -> AppResult<Option<FileConfig>> {
        let config_path = match &self.config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config {
                        message: format!(
                            "The specified configuration file does not exist: {}",
                            path.display()
                        ),
                    });
                }
                path.clone()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(None),
            },
        };

        read_config_file(&config_path).await.map(Some)
    }

    /// Fill unset arguments from a configuration file
    pub fn apply_file_config(&mut self, config: &FileConfig) -> Result<(), ValidationError> {
        apply_count(&mut self.capacity, "capacity", config.capacity)?;
        apply_count(&mut self.producers, "producers", config.producers)?;
        apply_count(&mut self.consumers, "consumers", config.consumers)?;
        apply_count(&mut self.items, "items", config.items)?;

        if self.drain_delay_ms.is_none() {
            self.drain_delay_ms = config.drain_delay_ms;
        }
        if self.config_color.is_none() {
            self.config_color = config.color;
        }

        if let Some(level) = &config.log_level {
            let level = level.to_lowercase();
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(ValidationError::new(&format!(
                    "'log-level' must be one of {} (got '{}')",
                    LOG_LEVELS.join(", "),
                    level
                )));
            }
            if self.log_level.is_none() {
                self.log_level = Some(level);
            }
        }
        if let Some(format) = &config.log_format {
            if !LOG_FORMATS.contains(&format.as_str()) {
                return Err(ValidationError::new(&format!(
                    "'log-format' must be one of {} (got '{}')",
                    LOG_FORMATS.join(", "),
                    format
                )));
            }
            if self.log_format.is_none() {
                self.log_format = Some(format.clone());
            }
        }
        if let Some(log_file) = &config.log_file {
            if self.log_file.is_none() {
                self.log_file = Some(PathBuf::from(log_file));
            }
        }

        Ok(())
    }
}

async fn read_config_file(path: &Path) -> AppResult<FileConfig> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Config {
            message: format!("Error reading configuration file {}: {}", path.display(), e),
        })?;

    FileConfig::from_toml_str(&contents).map_err(|e| AppError::Config {
        message: format!("Error parsing configuration file {}: {}", path.display(), e),
    })
}

fn apply_count(
    target: &mut Option<usize>,
    key: &str,
    value: Option<i64>,
) -> Result<(), ValidationError> {
    if let Some(raw) = value {
        let count = validate_config_count(key, raw)?;
        if target.is_none() {
            *target = Some(count);
        }
    }
    Ok(())
}

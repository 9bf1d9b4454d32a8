//! Validation utilities for CLI arguments and configuration values

use crate::core::error_handling::ContextualError;

/// A user-correctable problem with an argument or configuration value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

/// Validate positive integer value
///
/// Signature matches clap's `value_parser` so it can be used directly on
/// count arguments.
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a positive count read from a configuration file
pub fn validate_config_count(key: &str, value: i64) -> Result<usize, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(&format!(
            "'{}' must be greater than 0 (got {})",
            key, value
        )));
    }
    usize::try_from(value).map_err(|_| {
        ValidationError::new(&format!("'{}' is too large (got {})", key, value))
    })
}

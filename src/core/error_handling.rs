//! Generic error handling utilities
//!
//! Lets fatal errors from different layers be reported the same way: a user
//! correctable problem is shown as-is, anything else gets a short context
//! line with the details pushed to debug level.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on
    /// directly (bad argument, invalid config value)
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Examples
/// ```rust,no_run
/// # use boundbuf::core::error_handling::log_error_with_context;
/// # use boundbuf::core::validation::ValidationError;
/// let err = ValidationError::new("'capacity' must be greater than 0 (got 0)");
/// log_error_with_context(&err, "Loading configuration");
/// // Logs: "FATAL: 'capacity' must be greater than 0 (got 0)"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_message(error, operation_context));
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

// User-actionable errors speak for themselves; others are prefixed with the operation
fn fatal_message<E: ContextualError + std::fmt::Display>(error: &E, operation_context: &str) -> String {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => user_msg.to_string(),
        _ => format!("{}: {}", operation_context, error),
    }
}

//! Application Error Types

use crate::buffer::BufferError;
use crate::core::error_handling::ContextualError;
use crate::core::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("Worker task failed: {message}")]
    Worker { message: String },

    #[error("Verification failed: {message}")]
    Verification { message: String },

    #[error("Logging setup failed: {message}")]
    Logging { message: String },
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::Config { .. }
                | AppError::Buffer(BufferError::ZeroCapacity)
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Validation(err) => Some(err.message()),
            AppError::Config { message } => Some(message),
            AppError::Buffer(BufferError::ZeroCapacity) => {
                Some("Buffer capacity must be greater than zero")
            }
            _ => None,
        }
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

//! Buffer Error Types

use crate::buffer::slot::Slot;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Buffer capacity must be greater than zero")]
    ZeroCapacity,

    #[error("Buffer is full (capacity: {capacity})")]
    Full { capacity: usize },

    #[error("Buffer is empty")]
    Empty,

    #[error("Timed out after {waited:?} waiting on the buffer")]
    Timeout { waited: Duration },
}

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// A slot that could not be pushed, handed back to the caller with the reason
///
/// Returned by [`try_push`](crate::buffer::BoundedBuffer::try_push) and
/// [`push_timeout`](crate::buffer::BoundedBuffer::push_timeout) so that a
/// rejected value is never silently dropped.
#[derive(Debug, PartialEq, Eq)]
pub struct Rejected<T> {
    pub slot: Slot<T>,
    pub reason: BufferError,
}

impl<T> Rejected<T> {
    pub fn reason(&self) -> &BufferError {
        &self.reason
    }

    /// Recover the slot that failed to be enqueued
    pub fn into_slot(self) -> Slot<T> {
        self.slot
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "push rejected: {}", self.reason)
    }
}

impl<T: fmt::Debug> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

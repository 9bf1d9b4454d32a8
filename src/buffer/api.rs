//! Public API for the bounded buffer
//!
//! External modules should import from here rather than directly from
//! internal modules. See the module documentation for usage and architecture.

// Core buffer and handles
pub use crate::buffer::consumer::{Consumer, StreamState};
pub use crate::buffer::internal::BoundedBuffer;
pub use crate::buffer::producer::Producer;

// Queued values
pub use crate::buffer::slot::Slot;

// Error handling
pub use crate::buffer::error::{BufferError, BufferResult, Rejected};

// Statistics
pub use crate::buffer::types::BufferStats;

//! Type definitions for the buffer
//!
//! Statistics snapshots reported by [`BoundedBuffer::stats`](crate::buffer::BoundedBuffer::stats).

/// Point-in-time counters for a buffer
///
/// All fields are read under the buffer lock, so a single snapshot is
/// internally consistent. Like `size()`, it may be stale as soon as it is
/// returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferStats {
    /// Fixed capacity of the buffer
    pub capacity: usize,
    /// Slots occupied at the time of the snapshot
    pub occupied: usize,
    /// Highest occupancy observed since construction
    pub peak_occupied: usize,
    /// Real items pushed
    pub items_pushed: u64,
    /// Real items popped
    pub items_popped: u64,
    /// End-of-stream markers pushed
    pub end_markers_pushed: u64,
    /// End-of-stream markers popped
    pub end_markers_popped: u64,
}

impl BufferStats {
    /// Items pushed but not yet popped
    pub fn items_in_flight(&self) -> u64 {
        self.items_pushed.saturating_sub(self.items_popped)
    }
}

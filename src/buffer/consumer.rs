//! Consumer handle and the per-consumer termination protocol
//!
//! Each consumer walks its own small state machine:
//!
//! ```text
//! Flowing ──(end-of-stream popped)──▶ Draining ──▶ Closed
//! ```
//!
//! `Draining` lasts only for the call that popped the marker. Once `Closed`,
//! the handle never touches the buffer again, so a stray `recv` after
//! termination returns `None` instead of blocking or stealing a marker meant
//! for another consumer.

use crate::buffer::internal::BoundedBuffer;
use crate::buffer::slot::Slot;
use std::sync::Arc;

/// Position of one consumer in the termination protocol
///
/// [`Consumer::state`] only ever reports `Flowing` or `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Popping and yielding items
    Flowing,
    /// Marker taken, handle shutting down; held only inside the `recv` call
    /// that popped the marker and never visible to callers
    Draining,
    /// Terminal; no further pops
    Closed,
}

/// Handle for receiving items from a [`BoundedBuffer`]
///
/// Implements `Iterator`, yielding items until this consumer's end-of-stream
/// marker arrives.
///
/// # Example
///
/// ```rust
/// # use boundbuf::buffer::{BoundedBuffer, StreamState};
/// # use std::sync::Arc;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let buffer = Arc::new(BoundedBuffer::new(8)?);
/// buffer.push_item(1);
/// buffer.push_item(2);
/// buffer.push_end();
///
/// let mut consumer = buffer.consumer(0);
/// let items: Vec<i32> = consumer.by_ref().collect();
/// assert_eq!(items, vec![1, 2]);
/// assert_eq!(consumer.state(), StreamState::Closed);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct Consumer<T> {
    consumer_id: usize,
    buffer: Arc<BoundedBuffer<T>>,
    state: StreamState,
    received: u64,
}

impl<T> Consumer<T> {
    pub(crate) fn new(consumer_id: usize, buffer: Arc<BoundedBuffer<T>>) -> Self {
        log::debug!("Consumer {} attached to buffer", consumer_id);
        Self {
            consumer_id,
            buffer,
            state: StreamState::Flowing,
            received: 0,
        }
    }

    pub fn consumer_id(&self) -> usize {
        self.consumer_id
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == StreamState::Closed
    }

    /// Number of real items received so far
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Receive the next item, blocking while the buffer is empty
    ///
    /// Returns `None` once this consumer has taken its end-of-stream marker,
    /// and on every call after that.
    pub fn recv(&mut self) -> Option<T> {
        if self.state != StreamState::Flowing {
            self.state = StreamState::Closed;
            return None;
        }
        let slot = self.buffer.pop();
        self.advance(slot)
    }

    fn advance(&mut self, slot: Slot<T>) -> Option<T> {
        match slot {
            Slot::Item(item) => {
                self.received += 1;
                Some(item)
            }
            Slot::EndOfStream => {
                self.state = StreamState::Draining;
                log::debug!(
                    "Consumer {} received end-of-stream after {} items",
                    self.consumer_id,
                    self.received
                );
                self.state = StreamState::Closed;
                None
            }
        }
    }
}

impl<T> Iterator for Consumer<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.recv()
    }
}

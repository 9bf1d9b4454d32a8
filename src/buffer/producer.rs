//! Producer handle for pushing items into a shared buffer
//!
//! Producers hold a reference-counted handle to the buffer and never see its
//! storage. Each producer carries an id for logging and a running count of
//! what it has sent.

use crate::buffer::error::Rejected;
use crate::buffer::internal::BoundedBuffer;
use crate::buffer::slot::Slot;
use std::sync::Arc;
use std::time::Duration;

/// Handle for sending items into a [`BoundedBuffer`]
///
/// # Example
///
/// ```rust
/// # use boundbuf::buffer::BoundedBuffer;
/// # use std::sync::Arc;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let buffer = Arc::new(BoundedBuffer::new(4)?);
/// let mut producer = buffer.producer(0);
///
/// producer.send(10);
/// producer.send(20);
/// assert_eq!(producer.sent(), 2);
/// assert_eq!(buffer.size(), 2);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct Producer<T> {
    producer_id: usize,
    buffer: Arc<BoundedBuffer<T>>,
    sent: u64,
}

impl<T> Producer<T> {
    pub(crate) fn new(producer_id: usize, buffer: Arc<BoundedBuffer<T>>) -> Self {
        log::debug!("Producer {} attached to buffer", producer_id);
        Self {
            producer_id,
            buffer,
            sent: 0,
        }
    }

    pub fn producer_id(&self) -> usize {
        self.producer_id
    }

    /// Number of items this producer has pushed
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn buffer(&self) -> &Arc<BoundedBuffer<T>> {
        &self.buffer
    }

    /// Push an item, blocking while the buffer is full
    pub fn send(&mut self, item: T) {
        self.buffer.push_item(item);
        self.sent += 1;
    }

    /// Push an item, giving up after `timeout`
    ///
    /// On expiry the item comes back inside the rejection.
    pub fn send_timeout(&mut self, item: T, timeout: Duration) -> Result<(), Rejected<T>> {
        self.buffer.push_timeout(Slot::Item(item), timeout)?;
        self.sent += 1;
        Ok(())
    }

    /// Queue one end-of-stream marker, stopping one consumer
    pub fn signal_end(&self) {
        log::debug!("Producer {} sent end-of-stream", self.producer_id);
        self.buffer.push_end();
    }
}

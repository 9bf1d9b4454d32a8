//! Internal BoundedBuffer implementation
//!
//! One mutex guards the storage and its counters. Two condition variables
//! hang off it:
//! - `space_available`: waited on by pushers, notified by poppers
//! - `item_available`: waited on by poppers, notified by pushers
//!
//! Every wait sits in a loop that re-checks its predicate after waking, so
//! spurious wakeups and broadcast races cannot push past capacity or pop from
//! an empty buffer. Notifications go out after the guard is released.

use crate::buffer::consumer::Consumer;
use crate::buffer::error::{BufferError, BufferResult, Rejected};
use crate::buffer::producer::Producer;
use crate::buffer::slot::Slot;
use crate::buffer::types::BufferStats;
use crate::core::sync::recover_poison;
use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Upper bound on slots allocated up front; storage grows on demand past it
const INITIAL_STORAGE: usize = 1024;

#[derive(Debug, Default)]
struct Counters {
    items_pushed: u64,
    items_popped: u64,
    end_markers_pushed: u64,
    end_markers_popped: u64,
    peak_occupied: usize,
}

/// State protected by the buffer lock
struct Inner<T> {
    storage: VecDeque<Slot<T>>,
    counters: Counters,
}

impl<T> Inner<T> {
    fn append(&mut self, slot: Slot<T>) {
        match slot {
            Slot::Item(_) => self.counters.items_pushed += 1,
            Slot::EndOfStream => self.counters.end_markers_pushed += 1,
        }
        self.storage.push_back(slot);
        self.counters.peak_occupied = self.counters.peak_occupied.max(self.storage.len());
    }

    fn take_head(&mut self) -> Option<Slot<T>> {
        let slot = self.storage.pop_front()?;
        match slot {
            Slot::Item(_) => self.counters.items_popped += 1,
            Slot::EndOfStream => self.counters.end_markers_popped += 1,
        }
        Some(slot)
    }
}

/// Fixed-capacity blocking FIFO shared by producers and consumers
///
/// Share it between tasks behind an `Arc`. `push` blocks while the buffer is
/// full and `pop` blocks while it is empty; neither returns an error.
///
/// # Example
///
/// ```rust
/// use boundbuf::buffer::{BoundedBuffer, Slot};
/// use std::sync::Arc;
/// use std::thread;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let buffer = Arc::new(BoundedBuffer::new(2)?);
///
/// let producer = {
///     let buffer = Arc::clone(&buffer);
///     thread::spawn(move || {
///         for i in 0..5 {
///             buffer.push_item(i);
///         }
///         buffer.push_end();
///     })
/// };
///
/// let mut received = Vec::new();
/// while let Slot::Item(value) = buffer.pop() {
///     received.push(value);
/// }
/// producer.join().unwrap();
/// assert_eq!(received, vec![0, 1, 2, 3, 4]);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct BoundedBuffer<T> {
    inner: Mutex<Inner<T>>,
    space_available: Condvar,
    item_available: Condvar,
    capacity: NonZeroUsize,
}

impl<T> BoundedBuffer<T> {
    /// Create a buffer holding at most `capacity` slots
    ///
    /// A zero capacity could never accept a push, so it is rejected with
    /// [`BufferError::ZeroCapacity`].
    pub fn new(capacity: usize) -> BufferResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(BufferError::ZeroCapacity)?;
        Ok(Self::with_capacity(capacity))
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        log::debug!("Creating bounded buffer with capacity {}", capacity);
        Self {
            inner: Mutex::new(Inner {
                storage: VecDeque::with_capacity(capacity.get().min(INITIAL_STORAGE)),
                counters: Counters::default(),
            }),
            space_available: Condvar::new(),
            item_available: Condvar::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of occupied slots at the instant of the read
    ///
    /// Other tasks may change it immediately afterwards; do not use it to
    /// decide whether `pop` would block.
    pub fn size(&self) -> usize {
        self.lock("size").storage.len()
    }

    /// Append a slot, blocking while the buffer is full
    pub fn push(&self, slot: Slot<T>) {
        let mut inner = self.lock("push");
        while inner.storage.len() >= self.capacity.get() {
            inner = recover_poison(self.space_available.wait(inner), "push");
        }
        self.commit_push(inner, slot);
    }

    pub fn push_item(&self, item: T) {
        self.push(Slot::Item(item));
    }

    /// Queue one end-of-stream marker; it stops exactly one consumer
    pub fn push_end(&self) {
        self.push(Slot::EndOfStream);
    }

    /// Queue `count` end-of-stream markers, one per consumer to stop
    pub fn push_end_markers(&self, count: usize) {
        log::debug!("Sending {} end-of-stream markers", count);
        for _ in 0..count {
            self.push_end();
        }
    }

    /// Remove the head slot, blocking while the buffer is empty
    pub fn pop(&self) -> Slot<T> {
        let mut inner = self.lock("pop");
        loop {
            if let Some(slot) = inner.take_head() {
                return self.commit_pop(inner, slot);
            }
            inner = recover_poison(self.item_available.wait(inner), "pop");
        }
    }

    /// Append without blocking; a full buffer hands the slot back
    pub fn try_push(&self, slot: Slot<T>) -> Result<(), Rejected<T>> {
        let inner = self.lock("try_push");
        if inner.storage.len() >= self.capacity.get() {
            return Err(Rejected {
                slot,
                reason: BufferError::Full {
                    capacity: self.capacity.get(),
                },
            });
        }
        self.commit_push(inner, slot);
        Ok(())
    }

    /// Append, waiting at most `timeout` for space
    pub fn push_timeout(&self, slot: Slot<T>, timeout: Duration) -> Result<(), Rejected<T>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.push(slot);
            return Ok(());
        };

        let mut inner = self.lock("push_timeout");
        while inner.storage.len() >= self.capacity.get() {
            let now = Instant::now();
            if now >= deadline {
                return Err(Rejected {
                    slot,
                    reason: BufferError::Timeout { waited: timeout },
                });
            }
            let (guard, _) = recover_poison(
                self.space_available.wait_timeout(inner, deadline - now),
                "push_timeout",
            );
            inner = guard;
        }
        self.commit_push(inner, slot);
        Ok(())
    }

    pub fn try_pop(&self) -> BufferResult<Slot<T>> {
        let mut inner = self.lock("try_pop");
        match inner.take_head() {
            Some(slot) => Ok(self.commit_pop(inner, slot)),
            None => Err(BufferError::Empty),
        }
    }

    /// Remove the head slot, waiting at most `timeout` for one to arrive
    pub fn pop_timeout(&self, timeout: Duration) -> BufferResult<Slot<T>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Ok(self.pop());
        };

        let mut inner = self.lock("pop_timeout");
        loop {
            if let Some(slot) = inner.take_head() {
                return Ok(self.commit_pop(inner, slot));
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(BufferError::Timeout { waited: timeout });
            }
            let (guard, _) = recover_poison(
                self.item_available.wait_timeout(inner, deadline - now),
                "pop_timeout",
            );
            inner = guard;
        }
    }

    pub fn stats(&self) -> BufferStats {
        let inner = self.lock("stats");
        BufferStats {
            capacity: self.capacity.get(),
            occupied: inner.storage.len(),
            peak_occupied: inner.counters.peak_occupied,
            items_pushed: inner.counters.items_pushed,
            items_popped: inner.counters.items_popped,
            end_markers_pushed: inner.counters.end_markers_pushed,
            end_markers_popped: inner.counters.end_markers_popped,
        }
    }

    /// Create a producer handle sharing this buffer
    pub fn producer(self: &Arc<Self>, producer_id: usize) -> Producer<T> {
        Producer::new(producer_id, Arc::clone(self))
    }

    /// Create a consumer handle sharing this buffer
    pub fn consumer(self: &Arc<Self>, consumer_id: usize) -> Consumer<T> {
        Consumer::new(consumer_id, Arc::clone(self))
    }

    fn lock(&self, context: &str) -> MutexGuard<'_, Inner<T>> {
        recover_poison(self.inner.lock(), context)
    }

    fn commit_push(&self, mut inner: MutexGuard<'_, Inner<T>>, slot: Slot<T>) {
        let is_end = slot.is_end();
        inner.append(slot);
        let occupied = inner.storage.len();
        drop(inner);

        log::trace!(
            "Pushed {} ({}/{})",
            if is_end { "end-of-stream" } else { "item" },
            occupied,
            self.capacity
        );
        self.item_available.notify_all();
    }

    fn commit_pop(&self, inner: MutexGuard<'_, Inner<T>>, slot: Slot<T>) -> Slot<T> {
        let occupied = inner.storage.len();
        drop(inner);

        log::trace!(
            "Popped {} ({}/{})",
            if slot.is_end() { "end-of-stream" } else { "item" },
            occupied,
            self.capacity
        );
        self.space_available.notify_all();
        slot
    }
}

impl<T> fmt::Debug for BoundedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuffer")
            .field("capacity", &self.capacity)
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

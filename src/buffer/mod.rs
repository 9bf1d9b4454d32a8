//! Bounded Buffer Component
//!
//! A fixed-capacity blocking FIFO that coordinates any number of producer and
//! consumer tasks over one shared backing store.
//!
//! # Overview
//!
//! - **Bounded memory**: at most `capacity` slots are ever occupied
//! - **Blocking push/pop**: producers wait while full, consumers wait while empty
//! - **FIFO delivery**: values leave in the order they were queued, across producers
//! - **Exactly-once delivery**: every queued value goes to exactly one consumer
//! - **In-band termination**: end-of-stream markers are queued like data and
//!   each one stops a single consumer
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  ┌────────────┐          ┌────────────┐  ┌────────────┐
//! │ Producer 0 │  │ Producer 1 │          │ Consumer 0 │  │ Consumer 1 │
//! └─────┬──────┘  └─────┬──────┘          └─────▲──────┘  └─────▲──────┘
//!       │ push          │ push                  │ pop           │ pop
//!       ▼               ▼                       │               │
//! ┌───────────────────────────────────────────────────────────────────┐
//! │ BoundedBuffer (Mutex + space_available / item_available Condvars) │
//! │   ┌────┬────┬────┬─────┬────┬────┐                               │
//! │   │ 7  │ 8  │ 9  │ EOS │    │    │   capacity = 6                 │
//! │   └────┴────┴────┴─────┴────┴────┘                               │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use boundbuf::buffer::BoundedBuffer;
//! use std::sync::Arc;
//! use std::thread;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let buffer = Arc::new(BoundedBuffer::new(10)?);
//!
//! let consumers: Vec<_> = (0..4)
//!     .map(|id| {
//!         let consumer = buffer.consumer(id);
//!         thread::spawn(move || consumer.collect::<Vec<u32>>())
//!     })
//!     .collect();
//!
//! let mut producer = buffer.producer(0);
//! for i in 0..32 {
//!     producer.send(i);
//! }
//! buffer.push_end_markers(consumers.len());
//!
//! let mut all: Vec<u32> = consumers
//!     .into_iter()
//!     .flat_map(|handle| handle.join().unwrap())
//!     .collect();
//! all.sort_unstable();
//! assert_eq!(all, (0..32).collect::<Vec<_>>());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod api;
mod consumer;
mod error;
mod internal;
mod producer;
mod slot;
mod types;

pub use consumer::{Consumer, StreamState};
pub use error::{BufferError, BufferResult, Rejected};
pub use internal::BoundedBuffer;
pub use producer::Producer;
pub use slot::Slot;
pub use types::BufferStats;

#[cfg(test)]
mod tests;

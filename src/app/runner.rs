//! Producer/consumer workload over a shared bounded buffer
//!
//! Producers and consumers block on the buffer, so each one gets its own OS
//! thread rather than a slot on tokio's bounded blocking pool. The runner
//! stays async: it joins worker threads from a single `spawn_blocking` call
//! per group and can `select!` on shutdown while it waits to drain.
//! The runner owns the termination protocol: once producers are done it
//! queues one end-of-stream marker per consumer, then joins every consumer.

use crate::app::error::{AppError, AppResult};
use crate::buffer::{BoundedBuffer, BufferStats, Consumer, Producer};
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::validation::ValidationError;
use std::any::Any;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a producer blocked on a full buffer re-checks for shutdown
const PRODUCER_POLL: Duration = Duration::from_millis(50);

/// Resolved workload settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub items_per_producer: usize,
    pub drain_delay: Duration,
}

impl RunSettings {
    /// Total values across all producers, `None` if it does not fit in a `u64`
    pub fn total_items(&self) -> Option<u64> {
        u64::try_from(self.producers)
            .ok()?
            .checked_mul(u64::try_from(self.items_per_producer).ok()?)
    }

    /// Reject workloads whose value range cannot be represented
    pub fn validate(&self) -> Result<u64, ValidationError> {
        self.total_items().ok_or_else(|| {
            ValidationError::new(&format!(
                "{} producers x {} items exceeds the largest representable value",
                self.producers, self.items_per_producer
            ))
        })
    }
}

/// Values received by one consumer, in the order it received them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerReport {
    pub consumer_id: usize,
    pub values: Vec<u64>,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub settings: RunSettings,
    pub produced: u64,
    pub consumers: Vec<ConsumerReport>,
    pub stats: BufferStats,
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn total_consumed(&self) -> usize {
        self.consumers.iter().map(|c| c.values.len()).sum()
    }

    pub fn consumed_sorted(&self) -> Vec<u64> {
        let mut all: Vec<u64> = self
            .consumers
            .iter()
            .flat_map(|c| c.values.iter().copied())
            .collect();
        all.sort_unstable();
        all
    }

    /// Check that every produced value was consumed exactly once and every
    /// consumer terminated
    pub fn verify(&self) -> AppResult<()> {
        let consumed = self.consumed_sorted();

        if let Some(pair) = consumed.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(AppError::Verification {
                message: format!("value {} was delivered more than once", pair[0]),
            });
        }
        if consumed.len() as u64 != self.produced {
            return Err(AppError::Verification {
                message: format!(
                    "consumed {} values but {} were produced",
                    consumed.len(),
                    self.produced
                ),
            });
        }
        let total = self.settings.validate()?;
        if !self.interrupted && !consumed.iter().copied().eq(0..total) {
            return Err(AppError::Verification {
                message: format!("consumed values do not match 0..{}", total),
            });
        }

        let terminated = self.stats.end_markers_popped;
        if terminated != self.settings.consumers as u64 {
            return Err(AppError::Verification {
                message: format!(
                    "{} of {} consumers received an end-of-stream marker",
                    terminated, self.settings.consumers
                ),
            });
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Consumed {} of {} produced values with {} consumer(s) in {:.1?}{}",
            self.total_consumed(),
            self.produced,
            self.consumers.len(),
            self.elapsed,
            if self.interrupted { " (interrupted)" } else { "" }
        );
        let _ = writeln!(
            out,
            "Buffer capacity {}, peak occupancy {}, end markers {}/{}",
            self.stats.capacity,
            self.stats.peak_occupied,
            self.stats.end_markers_popped,
            self.stats.end_markers_pushed
        );
        for report in &self.consumers {
            let _ = writeln!(
                out,
                "  consumer {:>3}: {} value(s)",
                report.consumer_id,
                report.values.len()
            );
        }
        out
    }
}

/// Run the workload to completion
///
/// Every worker thread is joined before this returns, including on error
/// paths, so no worker outlives the buffer's owner.
pub async fn run(settings: RunSettings, shutdown: &ShutdownCoordinator) -> AppResult<RunReport> {
    settings.validate()?;
    let buffer = Arc::new(BoundedBuffer::<u64>::new(settings.capacity)?);
    let mut shutdown_rx = shutdown.subscribe();
    let start = Instant::now();

    log::info!(
        "Starting {} producer(s) and {} consumer(s) over a buffer of capacity {}",
        settings.producers,
        settings.consumers,
        settings.capacity
    );

    let mut first_error = None;

    let mut consumers = Vec::with_capacity(settings.consumers);
    for id in 0..settings.consumers {
        let consumer = buffer.consumer(id);
        match spawn_worker(format!("consumer-{}", id), move || consume(consumer)) {
            Ok(handle) => consumers.push(handle),
            Err(e) => {
                first_error = Some(e);
                break;
            }
        }
    }

    // Producers start only once every consumer is running
    let mut producers = Vec::with_capacity(settings.producers);
    if first_error.is_none() {
        for id in 0..settings.producers {
            let producer = buffer.producer(id);
            let stop = shutdown.flag();
            let items = settings.items_per_producer;
            match spawn_worker(format!("producer-{}", id), move || {
                produce(producer, items, stop)
            }) {
                Ok(handle) => producers.push(handle),
                Err(e) => {
                    first_error = Some(e);
                    break;
                }
            }
        }
    }

    let (sent, producer_error) = join_workers("producer", producers).await;
    let produced: u64 = sent.iter().sum();
    first_error = first_error.or(producer_error);
    log::debug!("All producers finished after sending {} values", produced);

    if first_error.is_none() && !settings.drain_delay.is_zero() && !shutdown.is_shutdown_requested() {
        tokio::select! {
            _ = tokio::time::sleep(settings.drain_delay) => {}
            _ = shutdown_rx.recv() => {}
        }
    }

    // One marker per consumer that actually started
    let marker_buffer = Arc::clone(&buffer);
    let marker_count = consumers.len();
    if let Err(e) =
        tokio::task::spawn_blocking(move || marker_buffer.push_end_markers(marker_count)).await
    {
        first_error = first_error.or_else(|| Some(worker_error("end-of-stream sender", e)));
    }

    let (mut reports, consumer_error) = join_workers("consumer", consumers).await;
    first_error = first_error.or(consumer_error);

    if let Some(error) = first_error {
        return Err(error);
    }

    reports.sort_by_key(|report| report.consumer_id);
    Ok(RunReport {
        interrupted: shutdown.is_shutdown_requested(),
        settings,
        produced,
        consumers: reports,
        stats: buffer.stats(),
        elapsed: start.elapsed(),
    })
}

fn spawn_worker<R, F>(name: String, work: F) -> AppResult<JoinHandle<R>>
where
    R: Send + 'static,
    F: FnOnce() -> R + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(work)
        .map_err(|e| AppError::Worker {
            message: format!("could not start {}: {}", name, e),
        })
}

/// Join a group of worker threads off the async executor
///
/// Returns the results of the workers that finished and the first failure.
async fn join_workers<R: Send + 'static>(
    role: &str,
    handles: Vec<JoinHandle<R>>,
) -> (Vec<R>, Option<AppError>) {
    let joined = tokio::task::spawn_blocking(move || {
        handles
            .into_iter()
            .map(JoinHandle::join)
            .collect::<Vec<_>>()
    })
    .await;

    let results = match joined {
        Ok(results) => results,
        Err(e) => return (Vec::new(), Some(worker_error(role, e))),
    };

    let mut values = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(payload) => {
                first_error = first_error.or_else(|| Some(worker_error(role, panic_message(payload))))
            }
        }
    }
    (values, first_error)
}

fn produce(mut producer: Producer<u64>, count: usize, stop: Arc<AtomicBool>) -> u64 {
    // run() has already checked that producers * count fits in a u64
    let count = count as u64;
    let first = producer.producer_id() as u64 * count;

    for value in first..first + count {
        loop {
            if stop.load(Ordering::Acquire) {
                log::info!(
                    "Producer {} stopping early after {} values",
                    producer.producer_id(),
                    producer.sent()
                );
                return producer.sent();
            }
            if producer.send_timeout(value, PRODUCER_POLL).is_ok() {
                break;
            }
        }
    }

    log::debug!(
        "Producer {} sent {} values",
        producer.producer_id(),
        producer.sent()
    );
    producer.sent()
}

fn consume(mut consumer: Consumer<u64>) -> ConsumerReport {
    let mut values = Vec::new();
    while let Some(value) = consumer.recv() {
        log::info!("consumer {} consumed {}", consumer.consumer_id(), value);
        values.push(value);
    }

    ConsumerReport {
        consumer_id: consumer.consumer_id(),
        values,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => message.to_string(),
            Err(_) => "panicked".to_string(),
        },
    }
}

fn worker_error(role: &str, error: impl std::fmt::Display) -> AppError {
    AppError::Worker {
        message: format!("{} task failed: {}", role, error),
    }
}

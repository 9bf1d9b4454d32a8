//! Tests for concurrent producer/consumer access

#[cfg(test)]
mod tests {
    use crate::buffer::api::{BoundedBuffer, Slot};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tokio::task::JoinSet;
    use tokio::time::timeout;

    #[test]
    fn test_many_producers_many_consumers_no_loss_no_duplication() {
        let producer_count = 4;
        let consumer_count = 6;
        let per_producer = 250u64;
        let buffer = Arc::new(BoundedBuffer::new(7).unwrap());

        let consumers: Vec<_> = (0..consumer_count)
            .map(|id| {
                let consumer = buffer.consumer(id);
                thread::spawn(move || consumer.collect::<Vec<u64>>())
            })
            .collect();

        let producers: Vec<_> = (0..producer_count)
            .map(|id| {
                let mut producer = buffer.producer(id);
                thread::spawn(move || {
                    let base = id as u64 * per_producer;
                    for value in base..base + per_producer {
                        producer.send(value);
                    }
                })
            })
            .collect();

        for handle in producers {
            handle.join().unwrap();
        }
        buffer.push_end_markers(consumer_count);

        let mut counts: HashMap<u64, usize> = HashMap::new();
        for handle in consumers {
            for value in handle.join().unwrap() {
                *counts.entry(value).or_default() += 1;
            }
        }

        let expected_total = producer_count as u64 * per_producer;
        assert_eq!(counts.len() as u64, expected_total, "no value may be lost");
        assert!(
            counts.values().all(|&n| n == 1),
            "no value may be delivered twice"
        );
        assert_eq!(buffer.size(), 0);
    }

    #[test]
    fn test_per_producer_order_preserved_with_single_consumer() {
        let buffer = Arc::new(BoundedBuffer::new(4).unwrap());

        let producers: Vec<_> = (0..3usize)
            .map(|id| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for seq in 0..200usize {
                        buffer.push_item((id, seq));
                    }
                })
            })
            .collect();

        let mut last_seen: HashMap<usize, usize> = HashMap::new();
        for _ in 0..600 {
            let (id, seq) = buffer.pop().into_item().unwrap();
            if let Some(previous) = last_seen.insert(id, seq) {
                assert!(seq > previous, "producer {} out of order", id);
            }
        }

        for handle in producers {
            handle.join().unwrap();
        }
        assert_eq!(last_seen.len(), 3);
        assert!(last_seen.values().all(|&seq| seq == 199));
    }

    #[test]
    fn test_size_never_exceeds_capacity_under_contention() {
        let capacity = 3;
        let buffer = Arc::new(BoundedBuffer::new(capacity).unwrap());
        let done = Arc::new(AtomicBool::new(false));

        let monitor = {
            let buffer = Arc::clone(&buffer);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut max_seen = 0;
                while !done.load(Ordering::Acquire) {
                    max_seen = max_seen.max(buffer.size());
                }
                max_seen
            })
        };

        let producers: Vec<_> = (0..4)
            .map(|_| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for i in 0..500 {
                        buffer.push_item(i);
                    }
                })
            })
            .collect();
        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        buffer.pop();
                    }
                })
            })
            .collect();

        for handle in producers.into_iter().chain(consumers) {
            handle.join().unwrap();
        }
        done.store(true, Ordering::Release);

        let max_seen = monitor.join().unwrap();
        assert!(max_seen <= capacity, "observed size {}", max_seen);
        assert!(buffer.stats().peak_occupied <= capacity);
        assert_eq!(buffer.size(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_blocking_tasks_in_join_set_all_complete() {
        let buffer = Arc::new(BoundedBuffer::new(2).unwrap());
        let consumer_count = 8;
        let mut tasks = JoinSet::new();

        for id in 0..consumer_count {
            let consumer = buffer.consumer(id);
            tasks.spawn_blocking(move || consumer.count());
        }

        let feeder = {
            let buffer = Arc::clone(&buffer);
            tokio::task::spawn_blocking(move || {
                for i in 0..64 {
                    buffer.push_item(i);
                }
                buffer.push_end_markers(consumer_count);
            })
        };

        timeout(Duration::from_secs(10), feeder)
            .await
            .expect("feeder should not deadlock")
            .unwrap();

        let mut total = 0;
        while let Some(result) = timeout(Duration::from_secs(10), tasks.join_next())
            .await
            .expect("consumers should terminate")
        {
            total += result.unwrap();
        }

        assert_eq!(total, 64);
        assert_eq!(buffer.stats().end_markers_popped, consumer_count as u64);
    }

    #[test]
    fn test_blocked_pushers_all_wake_as_space_frees() {
        let buffer = Arc::new(BoundedBuffer::new(1).unwrap());
        buffer.push_item(0);

        let pushers: Vec<_> = (1..=5)
            .map(|i| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || buffer.push_item(i))
            })
            .collect();

        let mut seen = Vec::new();
        for _ in 0..6 {
            match buffer.pop_timeout(Duration::from_secs(5)) {
                Ok(Slot::Item(value)) => seen.push(value),
                other => panic!("Expected an item, got {:?}", other),
            }
        }
        for handle in pushers {
            handle.join().unwrap();
        }

        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
    }
}

//! Property-based tests for the queue using proptest
//!
//! Single-threaded properties are checked against a `VecDeque` model; the
//! concurrent properties check for lost or duplicated items.

use crate::queue::ConcurrentQueue;
use crate::Error;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;

/// One step of a random workload
#[derive(Debug, Clone)]
enum Op {
    Put(u8),
    Grab,
    Get,
    RemoveAtIndex(usize),
    Remove(u8),
    GetAtIndex(usize),
    Contains(u8),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Small value and index ranges so duplicates and valid indices are common
    prop_oneof![
        4 => any::<u8>().prop_map(|v| Op::Put(v % 8)),
        2 => Just(Op::Grab),
        2 => Just(Op::Get),
        1 => (0usize..12).prop_map(Op::RemoveAtIndex),
        1 => any::<u8>().prop_map(|v| Op::Remove(v % 8)),
        1 => (0usize..12).prop_map(Op::GetAtIndex),
        1 => any::<u8>().prop_map(|v| Op::Contains(v % 8)),
        1 => Just(Op::Clear),
    ]
}

#[cfg(test)]
mod sequential_properties {
    use super::*;

    proptest! {
        #[test]
        fn test_put_preserves_order_and_size(values in prop::collection::vec(any::<i32>(), 0..100)) {
            let queue = ConcurrentQueue::new();
            for &value in &values {
                queue.put(value);
            }

            prop_assert_eq!(queue.size(), values.len());
            prop_assert_eq!(queue.show(), values);
        }

        #[test]
        fn test_fifo_law(values in prop::collection::vec(any::<i32>(), 0..100)) {
            let queue = ConcurrentQueue::new();
            for &value in &values {
                queue.put(value);
            }

            for expected in values {
                prop_assert_eq!(queue.grab(), Ok(expected));
            }
            prop_assert!(queue.is_empty());
            prop_assert_eq!(queue.grab(), Err(Error::EmptyQueue));
        }

        #[test]
        fn test_rotation_law(values in prop::collection::vec(any::<i32>(), 1..50)) {
            let queue = ConcurrentQueue::from(values.clone());

            let front = queue.get();
            prop_assert_eq!(front, Ok(values[0]));

            let mut expected = values.clone();
            expected.rotate_left(1);
            prop_assert_eq!(queue.show(), expected);
            prop_assert_eq!(queue.size(), values.len());
        }

        #[test]
        fn test_remove_at_index(
            values in prop::collection::vec(any::<i32>(), 0..50),
            index in 0usize..60
        ) {
            let queue = ConcurrentQueue::from(values.clone());
            let result = queue.remove_at_index(index);

            if index < values.len() {
                let mut expected = values.clone();
                let removed = expected.remove(index);
                prop_assert_eq!(result, Ok(removed));
                prop_assert_eq!(queue.show(), expected);
            } else {
                prop_assert_eq!(result, Err(Error::IndexOutOfRange { index, len: values.len() }));
                prop_assert_eq!(queue.show(), values);
            }
        }

        #[test]
        fn test_remove_first_occurrence_only(
            values in prop::collection::vec(0u8..5, 0..40),
            target in 0u8..5
        ) {
            let queue = ConcurrentQueue::from(values.clone());
            let mut expected = values.clone();
            let position = expected.iter().position(|v| *v == target);
            if let Some(position) = position {
                expected.remove(position);
            }

            prop_assert_eq!(queue.remove(&target), position.is_some());
            prop_assert_eq!(queue.show(), expected);
        }

        #[test]
        fn test_contains_matches_snapshot(
            values in prop::collection::vec(0u8..10, 0..30),
            probe in 0u8..10
        ) {
            let queue = ConcurrentQueue::from(values);
            prop_assert_eq!(queue.contains(&probe), queue.show().contains(&probe));
        }

        #[test]
        fn test_grab_batch_takes_front(
            values in prop::collection::vec(any::<i32>(), 0..50),
            max in 0usize..60
        ) {
            let queue = ConcurrentQueue::from(values.clone());
            let taken = queue.grab_batch(max);
            let split = max.min(values.len());

            prop_assert_eq!(&taken[..], &values[..split]);
            prop_assert_eq!(queue.show(), values[split..].to_vec());
        }

        #[test]
        fn test_matches_model(ops in prop::collection::vec(op_strategy(), 1..200)) {
            let queue = ConcurrentQueue::new();
            let mut model: VecDeque<u8> = VecDeque::new();

            for op in ops {
                match op {
                    Op::Put(value) => {
                        queue.put(value);
                        model.push_back(value);
                    }
                    Op::Grab => {
                        prop_assert_eq!(queue.grab(), model.pop_front().ok_or(Error::EmptyQueue));
                    }
                    Op::Get => {
                        let expected = model.front().copied().ok_or(Error::EmptyQueue);
                        if !model.is_empty() {
                            model.rotate_left(1);
                        }
                        prop_assert_eq!(queue.get(), expected);
                    }
                    Op::RemoveAtIndex(index) => {
                        let len = model.len();
                        let expected = model.remove(index).ok_or(Error::IndexOutOfRange { index, len });
                        prop_assert_eq!(queue.remove_at_index(index), expected);
                    }
                    Op::Remove(value) => {
                        let expected = match model.iter().position(|v| *v == value) {
                            Some(position) => model.remove(position).is_some(),
                            None => false,
                        };
                        prop_assert_eq!(queue.remove(&value), expected);
                    }
                    Op::GetAtIndex(index) => {
                        let expected = model
                            .get(index)
                            .copied()
                            .ok_or(Error::IndexOutOfRange { index, len: model.len() });
                        prop_assert_eq!(queue.get_at_index(index), expected);
                    }
                    Op::Contains(value) => {
                        prop_assert_eq!(queue.contains(&value), model.contains(&value));
                    }
                    Op::Clear => {
                        queue.clear();
                        model.clear();
                        prop_assert!(queue.is_empty());
                        prop_assert!(!queue.is_not_empty());
                    }
                }

                prop_assert_eq!(queue.size(), model.len());
            }

            prop_assert_eq!(queue.show(), model.into_iter().collect::<Vec<_>>());
        }
    }
}

#[cfg(test)]
mod concurrent_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_concurrent_puts_lose_nothing(
            num_threads in 1usize..16,
            items_per_thread in 1usize..50
        ) {
            let queue = Arc::new(ConcurrentQueue::new());

            let handles: Vec<_> = (0..num_threads)
                .map(|thread_id| {
                    let queue = Arc::clone(&queue);
                    thread::spawn(move || {
                        for i in 0..items_per_thread {
                            queue.put(thread_id * items_per_thread + i);
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            let mut items = queue.show();
            prop_assert_eq!(items.len(), num_threads * items_per_thread);
            items.sort_unstable();
            prop_assert_eq!(items, (0..num_threads * items_per_thread).collect::<Vec<_>>());
        }

        #[test]
        fn test_per_producer_order_is_kept(
            num_threads in 2usize..8,
            items_per_thread in 1usize..50
        ) {
            let queue = Arc::new(ConcurrentQueue::new());

            let handles: Vec<_> = (0..num_threads)
                .map(|thread_id| {
                    let queue = Arc::clone(&queue);
                    thread::spawn(move || {
                        for i in 0..items_per_thread {
                            queue.put((thread_id, i));
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            // Items from one producer come out in the order that producer put them
            let mut next = vec![0usize; num_threads];
            while let Ok((thread_id, i)) = queue.grab() {
                prop_assert_eq!(i, next[thread_id]);
                next[thread_id] += 1;
            }
            prop_assert!(next.iter().all(|&count| count == items_per_thread));
        }
    }
}

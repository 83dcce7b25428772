//! Basic usage example for rwqueue
//!
//! Walks through every queue operation, shares one queue between producer and
//! consumer threads, and shows how failures come back as values.
//!
//! ```text
//! RUST_LOG=rwqueue=debug cargo run --example basic_usage
//! ```

use rwqueue::{ConcurrentQueue, Error, MetricsCollector};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Items of different kinds living in one queue
#[derive(Debug, Clone, PartialEq)]
enum Item {
    Float(f64),
    Int(i64),
    Text(String),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("rwqueue Usage Example");
    println!("=====================");

    // 1. Single-threaded walk through the API
    println!("\n1. Basic Operations:");
    let queue = ConcurrentQueue::new();
    for item in [
        Item::Float(1.1),
        Item::Int(1),
        Item::Text("String".to_string()),
    ] {
        queue.put(item);
    }
    println!("   Contents: {:?}", queue.show());

    let front = queue.get()?;
    println!("   get() -> {:?}, now {:?}", front, queue.show());

    let grabbed = queue.grab()?;
    println!("   grab() -> {:?}, now {:?}", grabbed, queue.show());

    println!("   contains(Text) -> {}", queue.contains(&Item::Text("String".into())));
    println!("   get_at_index(1) -> {:?}", queue.get_at_index(1)?);

    queue.remove(&Item::Float(1.1));
    println!("   after remove(Float(1.1)): {:?}", queue.show());

    // 2. Producers and consumers sharing one queue
    println!("\n2. Multi-Producer / Multi-Consumer:");
    let shared: Arc<ConcurrentQueue<u32>> = Arc::new(ConcurrentQueue::new());

    let producers: Vec<_> = (0..4)
        .map(|id| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for j in 0..25 {
                    shared.put(id * 25 + j);
                }
                println!("   Producer {} finished", id);
            })
        })
        .collect();

    let consumers: Vec<_> = (0..2)
        .map(|id| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let mut consumed = 0u32;
                let mut sum = 0u32;
                while consumed < 50 {
                    match shared.grab() {
                        Ok(value) => {
                            consumed += 1;
                            sum += value;
                        }
                        // Nothing to take yet; the queue never blocks for items
                        Err(Error::EmptyQueue) => thread::sleep(Duration::from_micros(50)),
                        Err(err) => {
                            println!("   Consumer {}: unexpected error: {}", id, err);
                            break;
                        }
                    }
                }
                println!("   Consumer {} finished: {} items, sum {}", id, consumed, sum);
                sum
            })
        })
        .collect();

    for handle in producers {
        handle.join().expect("producer panicked");
    }
    let total: u32 = consumers
        .into_iter()
        .map(|handle| handle.join().expect("consumer panicked"))
        .sum();

    println!("   Sum of all consumed items: {} (expected {})", total, (0..100).sum::<u32>());
    println!("   Queue size afterwards: {}", shared.size());

    // 3. Failures are ordinary values
    println!("\n3. Error Handling:");
    let empty: ConcurrentQueue<u32> = ConcurrentQueue::new();
    match empty.grab() {
        Err(Error::EmptyQueue) => println!("   grab() on empty queue -> EmptyQueue"),
        other => println!("   unexpected: {:?}", other),
    }
    match empty.remove_at_index(3) {
        Err(err @ Error::IndexOutOfRange { .. }) => println!("   remove_at_index(3) -> {}", err),
        other => println!("   unexpected: {:?}", other),
    }

    // 4. Metrics
    let metrics = shared.metrics();
    println!("\n4. Metrics for the shared queue:");
    println!("   operations: {}", metrics.total_operations);
    println!("   failures:   {} ({:.1}%)", metrics.failed_operations, metrics.failure_rate());
    println!("   contended:  {} ({:.1}%)", metrics.contended_operations, metrics.contention_rate());
    println!("   avg time:   {:?}", metrics.avg_operation_time());

    Ok(())
}

//! Round-robin scheduling with `get`
//!
//! `get` hands out the front item and rotates it to the back, so a pool of
//! workers calling it in a loop cycles fairly through a set of shared targets.
//! Targets can be added and retired while the workers run.
//!
//! ```text
//! RUST_LOG=rwqueue=trace cargo run --example round_robin
//! ```

use rwqueue::{ConcurrentQueue, Error};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const WORKERS: usize = 3;
const ROUNDS: usize = 12;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let backends: Arc<ConcurrentQueue<&'static str>> =
        Arc::new(vec!["alpha", "beta", "gamma"].into());

    let workers: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let backends = Arc::clone(&backends);
            thread::spawn(move || {
                let mut hits: HashMap<&'static str, usize> = HashMap::new();
                for _ in 0..ROUNDS {
                    match backends.get() {
                        Ok(backend) => *hits.entry(backend).or_default() += 1,
                        Err(Error::EmptyQueue) => break,
                        Err(err) => panic!("unexpected error: {}", err),
                    }
                    thread::sleep(Duration::from_millis(1));
                }
                info!(worker, ?hits, "worker done");
                hits
            })
        })
        .collect();

    // Membership changes while the workers are cycling
    thread::sleep(Duration::from_millis(3));
    backends.put("delta");
    if backends.contains(&"beta") {
        backends.remove(&"beta");
    }

    let mut totals: HashMap<&'static str, usize> = HashMap::new();
    for handle in workers {
        for (backend, count) in handle.join().expect("worker panicked") {
            *totals.entry(backend).or_default() += count;
        }
    }

    let mut totals: Vec<_> = totals.into_iter().collect();
    totals.sort();
    println!("Dispatch counts:");
    for (backend, count) in totals {
        println!("  {:<6} {}", backend, count);
    }
    println!("Final rotation: {:?}", backends.show());
}

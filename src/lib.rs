//! # rwqueue
//!
//! A generic, ordered queue that can be shared freely between threads.
//!
//! ## Features
//!
//! - **Reader-writer locking**: read-only operations (`contains`, `show`, `size`, ...)
//!   run in parallel; mutations are exclusive
//! - **Owned results**: every accessor copies or moves data out before the lock is
//!   released, so no caller can hold a reference into the protected sequence
//! - **Per-instance synchronization**: each queue owns its lock, unrelated queues never
//!   contend with each other
//! - **Explicit failures**: empty queues and bad indices are reported as [`Error`]
//!   values, never as panics
//!
//! ## Quick Start
//!
//! ```rust
//! use rwqueue::ConcurrentQueue;
//!
//! let queue = ConcurrentQueue::new();
//! queue.put(1);
//! queue.put(2);
//! queue.put(3);
//!
//! // `get` hands out the front item and rotates it to the back
//! assert_eq!(queue.get(), Ok(1));
//! assert_eq!(queue.show(), vec![2, 3, 1]);
//!
//! // `grab` is a plain dequeue
//! assert_eq!(queue.grab(), Ok(2));
//! assert_eq!(queue.show(), vec![3, 1]);
//! assert_eq!(queue.size(), 2);
//! ```
//!
//! ## Thread Safety
//!
//! [`ConcurrentQueue`] is `Send + Sync` whenever its items are. Wrap it in an
//! `Arc` to share it across threads. Each individual operation is atomic;
//! sequences of operations (for example `contains` followed by `remove`) are not.
//!
//! ## Cargo features
//!
//! - `metrics` (default): record per-operation latency alongside the operation
//!   counters exposed through [`MetricsCollector`]

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod metrics;
pub mod queue;
mod sync;

pub use crate::metrics::{MetricsCollector, PerformanceMetrics};
pub use crate::queue::ConcurrentQueue;

/// Error types for queue operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The queue held no items when one was requested
    #[error("queue is empty")]
    EmptyQueue,
    /// An index was outside `0..len`
    #[error("index {index} is out of range for a queue of length {len}")]
    IndexOutOfRange {
        /// The index that was requested
        index: usize,
        /// The queue length at the time of the request
        len: usize,
    },
    /// A bounded-wait operation could not acquire the lock in time
    #[error("timed out waiting for the queue lock")]
    Timeout,
}

/// Result type for queue operations
pub type Result<T> = core::result::Result<T, Error>;

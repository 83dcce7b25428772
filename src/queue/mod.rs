//! Queue implementations
//!
//! ## Available Queues
//!
//! - [`ConcurrentQueue`]: unbounded ordered queue guarded by a per-instance
//!   reader-writer lock
//!
//! ## Operations at a Glance
//!
//! | Operation | Lock | Effect | Failure |
//! |-----------|------|--------|---------|
//! | `put` | exclusive | append to the back | - |
//! | `grab` | exclusive | remove the front | `EmptyQueue` |
//! | `get` | exclusive | copy the front, rotate it to the back | `EmptyQueue` |
//! | `remove_at_index` | exclusive | remove at a position | `IndexOutOfRange` |
//! | `remove` | exclusive | remove first equal item | - |
//! | `clear` | exclusive | remove everything | - |
//! | `get_at_index` | shared | copy at a position | `IndexOutOfRange` |
//! | `contains` | shared | membership by equality | - |
//! | `show` | shared | snapshot copy | - |
//! | `size` / `is_empty` / `is_not_empty` | shared | length queries | - |
//!
//! ## Examples
//!
//! ```rust
//! use rwqueue::queue::ConcurrentQueue;
//!
//! let queue = ConcurrentQueue::new();
//! queue.put("first");
//! queue.put("second");
//!
//! assert_eq!(queue.grab()?, "first");
//! assert!(queue.is_not_empty());
//!
//! # Ok::<(), rwqueue::Error>(())
//! ```
pub mod concurrent;

pub use concurrent::ConcurrentQueue;


#[cfg(all(test, not(loom)))]
mod proptests;

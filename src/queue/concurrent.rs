//! Reader-Writer Locked Queue
//!
//! [`ConcurrentQueue`] is an ordered sequence guarded by a single reader-writer lock
//! owned by the queue itself.
//!
//! ## Locking
//!
//! | Exclusive (writer) | Shared (reader) |
//! |--------------------|-----------------|
//! | `put`, `put_batch`, `grab`, `grab_batch`, `get`, `remove_at_index`, `remove`, `clear` | `get_at_index`, `contains`, `show`, `size`, `is_empty`, `is_not_empty` |
//!
//! Every operation holds its guard for its whole duration and drops it on every exit
//! path. Accessors clone or move items out while the guard is held; nothing returned
//! by the queue borrows from the locked sequence.
//!
//! ## Example
//!
//! ```rust
//! use rwqueue::ConcurrentQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(ConcurrentQueue::new());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         let queue = Arc::clone(&queue);
//!         thread::spawn(move || queue.put(i))
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! let mut items = queue.show();
//! items.sort();
//! assert_eq!(items, vec![0, 1, 2, 3]);
//! ```

use crate::metrics::{AtomicMetrics, MetricsCollector, OpTimer, PerformanceMetrics};
use crate::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::{Error, Result};
use core::fmt;
use core::mem;
use core::sync::atomic::{AtomicBool, Ordering};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, trace};

/// A thread-safe ordered queue with reader-writer locking
///
/// # Type Parameters
///
/// * `T` - The item type. Operations that hand out copies (`get`, `get_at_index`,
///   `show`) need `T: Clone`; lookups by value (`remove`, `contains`) need
///   `T: PartialEq`.
///
/// # Examples
///
/// ```rust
/// use rwqueue::{ConcurrentQueue, Error};
///
/// let queue: ConcurrentQueue<&str> = ConcurrentQueue::new();
/// assert_eq!(queue.grab(), Err(Error::EmptyQueue));
///
/// queue.put("a");
/// queue.put("b");
/// assert!(queue.contains(&"b"));
/// assert_eq!(queue.remove_at_index(1), Ok("b"));
/// assert_eq!(queue.get_at_index(1), Err(Error::IndexOutOfRange { index: 1, len: 1 }));
/// ```
pub struct ConcurrentQueue<T> {
    items: RwLock<VecDeque<T>>,
    metrics: AtomicMetrics,
    metrics_enabled: AtomicBool,
}

impl<T> ConcurrentQueue<T> {
    /// Create a new, empty queue
    pub fn new() -> Self {
        Self::from_deque(VecDeque::new())
    }

    fn from_deque(items: VecDeque<T>) -> Self {
        let len = items.len();
        let queue = Self {
            items: RwLock::new(items),
            metrics: AtomicMetrics::default(),
            metrics_enabled: AtomicBool::new(true),
        };
        queue.record_len(len);
        queue
    }

    /// Append an item to the back of the queue
    pub fn put(&self, item: T) {
        let timer = OpTimer::start();
        let len = {
            let mut items = self.write_items();
            items.push_back(item);
            items.len()
        };
        self.succeed(timer, len);
    }

    /// Append every item of `values` to the back of the queue in one atomic step
    ///
    /// Items from one batch stay contiguous even while other threads are putting.
    /// Returns the number of items appended.
    ///
    /// ```rust
    /// use rwqueue::ConcurrentQueue;
    ///
    /// let queue = ConcurrentQueue::new();
    /// assert_eq!(queue.put_batch(vec![1, 2, 3]), 3);
    /// assert_eq!(queue.show(), vec![1, 2, 3]);
    /// ```
    pub fn put_batch<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        // Drain the iterator before locking, it may call back into this queue.
        let values: Vec<T> = values.into_iter().collect();
        let count = values.len();

        let timer = OpTimer::start();
        let len = {
            let mut items = self.write_items();
            items.extend(values);
            items.len()
        };
        trace!(count, len, "batch appended");
        self.succeed(timer, len);
        count
    }

    /// Remove and return the front item
    ///
    /// # Errors
    ///
    /// [`Error::EmptyQueue`] if the queue holds no items.
    pub fn grab(&self) -> Result<T> {
        let timer = OpTimer::start();
        let mut items = self.write_items();
        let outcome = Self::take_front(&mut items);
        let len = items.len();
        drop(items);
        self.finish(timer, outcome, len)
    }

    /// Like [`grab`](Self::grab), but gives up if the lock is not acquired within `timeout`
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if the lock stayed busy, [`Error::EmptyQueue`] if the queue
    /// holds no items.
    pub fn try_grab_for(&self, timeout: Duration) -> Result<T> {
        let timer = OpTimer::start();
        let mut items = match self.write_items_for(timeout) {
            Ok(items) => items,
            Err(err) => return self.finish(timer, Err(err), 0),
        };
        let outcome = Self::take_front(&mut items);
        let len = items.len();
        drop(items);
        self.finish(timer, outcome, len)
    }

    /// Remove up to `max` items from the front of the queue in one atomic step
    ///
    /// The items are returned in queue order. An empty queue yields an empty `Vec`.
    pub fn grab_batch(&self, max: usize) -> Vec<T> {
        let timer = OpTimer::start();
        let (taken, len) = {
            let mut items = self.write_items();
            let count = max.min(items.len());
            let taken: Vec<T> = items.drain(..count).collect();
            (taken, items.len())
        };
        trace!(count = taken.len(), len, "batch grabbed");
        self.succeed(timer, len);
        taken
    }

    /// Remove and return the item at `index`
    ///
    /// Items after `index` shift one position toward the front.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= size()`; the queue is left unchanged.
    pub fn remove_at_index(&self, index: usize) -> Result<T> {
        let timer = OpTimer::start();
        let mut items = self.write_items();
        let len = items.len();
        let outcome = items
            .remove(index)
            .ok_or(Error::IndexOutOfRange { index, len });
        let len = items.len();
        drop(items);
        self.finish(timer, outcome, len)
    }

    /// Remove every item
    pub fn clear(&self) {
        let timer = OpTimer::start();
        let removed = {
            let mut items = self.write_items();
            let removed = items.len();
            items.clear();
            removed
        };
        trace!(removed, "queue cleared");
        self.succeed(timer, 0);
    }

    /// Current number of items
    pub fn size(&self) -> usize {
        let timer = OpTimer::start();
        let len = self.read_items().len();
        self.succeed(timer, len);
        len
    }

    /// Like [`size`](Self::size), but gives up if the lock is not acquired within `timeout`
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if a writer held the lock for the whole wait.
    pub fn try_size_for(&self, timeout: Duration) -> Result<usize> {
        let timer = OpTimer::start();
        let outcome = self.read_items_for(timeout).map(|items| items.len());
        let len = *outcome.as_ref().unwrap_or(&0);
        self.finish(timer, outcome, len)
    }

    /// Alias for [`size`](Self::size)
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Whether the queue holds no items
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Whether the queue holds at least one item
    pub fn is_not_empty(&self) -> bool {
        self.size() > 0
    }

    /// Consume the queue, returning its items in order
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_inner().into()
    }

    fn take_front(items: &mut VecDeque<T>) -> Result<T> {
        items.pop_front().ok_or(Error::EmptyQueue)
    }

    fn read_items(&self) -> RwLockReadGuard<'_, VecDeque<T>> {
        match self.items.try_read() {
            Some(items) => items,
            None => {
                self.record_contention();
                self.items.read()
            }
        }
    }

    fn write_items(&self) -> RwLockWriteGuard<'_, VecDeque<T>> {
        match self.items.try_write() {
            Some(items) => items,
            None => {
                self.record_contention();
                self.items.write()
            }
        }
    }

    fn read_items_for(&self, timeout: Duration) -> Result<RwLockReadGuard<'_, VecDeque<T>>> {
        if let Some(items) = self.items.try_read() {
            return Ok(items);
        }
        self.record_contention();
        self.items.try_read_for(timeout).ok_or(Error::Timeout)
    }

    fn write_items_for(&self, timeout: Duration) -> Result<RwLockWriteGuard<'_, VecDeque<T>>> {
        if let Some(items) = self.items.try_write() {
            return Ok(items);
        }
        self.record_contention();
        self.items.try_write_for(timeout).ok_or(Error::Timeout)
    }

    /// Book-keeping once the guard is gone: counters, memory estimate, failure log.
    fn finish<R>(&self, timer: OpTimer, outcome: Result<R>, len: usize) -> Result<R> {
        match &outcome {
            Ok(_) => self.succeed(timer, len),
            Err(err) => {
                debug!(error = %err, len, "queue operation failed");
                if self.is_metrics_enabled() {
                    self.metrics.record_failure();
                }
            }
        }
        outcome
    }

    fn succeed(&self, timer: OpTimer, len: usize) {
        if self.is_metrics_enabled() {
            self.metrics.record_success(timer.elapsed());
            self.record_len(len);
        }
    }

    fn record_len(&self, len: usize) {
        self.metrics
            .update_memory_usage(len.saturating_mul(mem::size_of::<T>()));
    }

    fn record_contention(&self) {
        if self.is_metrics_enabled() {
            self.metrics.record_contention();
        }
    }
}

impl<T: Clone> ConcurrentQueue<T> {
    /// Return a copy of the front item and rotate that item to the back
    ///
    /// **This is not a pure peek.** The queue `[a, b, c]` becomes `[b, c, a]` and `a`
    /// is returned; the size is unchanged. Repeated calls cycle through the items
    /// round-robin. Use [`get_at_index(0)`](Self::get_at_index) to look at the front
    /// without reordering, or [`grab`](Self::grab) to dequeue it.
    ///
    /// ```rust
    /// use rwqueue::ConcurrentQueue;
    ///
    /// let queue: ConcurrentQueue<char> = "abc".chars().collect();
    /// assert_eq!(queue.get(), Ok('a'));
    /// assert_eq!(queue.show(), vec!['b', 'c', 'a']);
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::EmptyQueue`] if the queue holds no items.
    pub fn get(&self) -> Result<T> {
        let timer = OpTimer::start();
        let mut items = self.write_items();
        let outcome = Self::rotate_front(&mut items);
        let len = items.len();
        drop(items);
        self.finish(timer, outcome, len)
    }

    /// Like [`get`](Self::get), but gives up if the lock is not acquired within `timeout`
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if the lock stayed busy, [`Error::EmptyQueue`] if the queue
    /// holds no items.
    pub fn try_get_for(&self, timeout: Duration) -> Result<T> {
        let timer = OpTimer::start();
        let mut items = match self.write_items_for(timeout) {
            Ok(items) => items,
            Err(err) => return self.finish(timer, Err(err), 0),
        };
        let outcome = Self::rotate_front(&mut items);
        let len = items.len();
        drop(items);
        self.finish(timer, outcome, len)
    }

    /// Return a copy of the item at `index`
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= size()`.
    pub fn get_at_index(&self, index: usize) -> Result<T> {
        let timer = OpTimer::start();
        let items = self.read_items();
        let len = items.len();
        let outcome = items
            .get(index)
            .cloned()
            .ok_or(Error::IndexOutOfRange { index, len });
        drop(items);
        self.finish(timer, outcome, len)
    }

    /// Return an independent copy of every item, front to back
    ///
    /// The snapshot does not track later changes to the queue.
    pub fn show(&self) -> Vec<T> {
        let timer = OpTimer::start();
        let snapshot: Vec<T> = self.read_items().iter().cloned().collect();
        self.succeed(timer, snapshot.len());
        snapshot
    }

    /// Like [`show`](Self::show), but gives up if the lock is not acquired within `timeout`
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if a writer held the lock for the whole wait.
    pub fn try_show_for(&self, timeout: Duration) -> Result<Vec<T>> {
        let timer = OpTimer::start();
        let outcome = self
            .read_items_for(timeout)
            .map(|items| items.iter().cloned().collect::<Vec<T>>());
        let len = outcome.as_ref().map_or(0, Vec::len);
        self.finish(timer, outcome, len)
    }

    // Clone before rotating so a panicking `Clone` leaves the order untouched.
    fn rotate_front(items: &mut VecDeque<T>) -> Result<T> {
        let front = items.front().cloned().ok_or(Error::EmptyQueue)?;
        items.rotate_left(1);
        Ok(front)
    }
}

impl<T: PartialEq> ConcurrentQueue<T> {
    /// Remove the first item equal to `value`, scanning front to back
    ///
    /// Later duplicates are left in place. Returns whether an item was removed; a
    /// missing value is not an error.
    pub fn remove(&self, value: &T) -> bool {
        let timer = OpTimer::start();
        let (removed, len) = {
            let mut items = self.write_items();
            let removed = match items.iter().position(|item| item == value) {
                Some(index) => items.remove(index).is_some(),
                None => false,
            };
            (removed, items.len())
        };
        self.succeed(timer, len);
        removed
    }

    /// Whether any item equals `value`
    pub fn contains(&self, value: &T) -> bool {
        let timer = OpTimer::start();
        let (found, len) = {
            let items = self.read_items();
            (items.contains(value), items.len())
        };
        self.succeed(timer, len);
        found
    }
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ConcurrentQueue<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_deque(items.into())
    }
}

impl<T> FromIterator<T> for ConcurrentQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_deque(iter.into_iter().collect())
    }
}

impl<T> Extend<T> for ConcurrentQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.put_batch(iter);
    }
}

/// Cloning snapshots the items into a new queue with its own lock and fresh metrics.
impl<T: Clone> Clone for ConcurrentQueue<T> {
    fn clone(&self) -> Self {
        let queue = Self::from(self.show());
        queue.set_metrics_enabled(self.is_metrics_enabled());
        queue
    }
}

impl<T: fmt::Debug> fmt::Debug for ConcurrentQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.items.read();
        f.debug_struct("ConcurrentQueue")
            .field("items", &*items)
            .field("metrics_enabled", &self.is_metrics_enabled())
            .finish()
    }
}

impl<T> MetricsCollector for ConcurrentQueue<T> {
    fn metrics(&self) -> PerformanceMetrics {
        self.metrics.snapshot()
    }

    fn reset_metrics(&self) {
        self.metrics.reset();
    }

    fn set_metrics_enabled(&self, enabled: bool) {
        self.metrics_enabled.store(enabled, Ordering::Relaxed);
    }

    fn is_metrics_enabled(&self) -> bool {
        self.metrics_enabled.load(Ordering::Relaxed)
    }
}

//! Operation Metrics Module
//!
//! Every queue carries an [`AtomicMetrics`] block of relaxed counters describing how
//! it has been used: how many operations ran, how many failed, how often a caller had
//! to wait for the lock, and how long operations took. Counters are updated after the
//! queue lock is released, so a snapshot may trail in-flight operations slightly.

use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Snapshot of a queue's operation metrics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PerformanceMetrics {
    /// Total number of operations performed
    pub total_operations: u64,
    /// Number of successful operations
    pub successful_operations: u64,
    /// Number of failed operations (empty queue, bad index, lock timeout)
    pub failed_operations: u64,
    /// Number of lock acquisitions that had to wait for another thread
    pub contended_operations: u64,
    /// Average successful operation time in nanoseconds
    pub avg_operation_time_ns: u64,
    /// Maximum operation time in nanoseconds
    pub max_operation_time_ns: u64,
    /// Approximate bytes held by queued items
    pub memory_usage_bytes: usize,
    /// Peak of `memory_usage_bytes`
    pub peak_memory_usage_bytes: usize,
}

impl PerformanceMetrics {
    /// Calculate success rate as percentage
    pub fn success_rate(&self) -> f64 {
        Self::percentage(self.successful_operations, self.total_operations)
    }

    /// Calculate contention rate as percentage
    pub fn contention_rate(&self) -> f64 {
        Self::percentage(self.contended_operations, self.total_operations)
    }

    /// Calculate failure rate as percentage
    pub fn failure_rate(&self) -> f64 {
        Self::percentage(self.failed_operations, self.total_operations)
    }

    /// Get average operation time as Duration
    pub fn avg_operation_time(&self) -> Duration {
        Duration::from_nanos(self.avg_operation_time_ns)
    }

    /// Get maximum operation time as Duration
    pub fn max_operation_time(&self) -> Duration {
        Duration::from_nanos(self.max_operation_time_ns)
    }

    fn percentage(part: u64, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }
}

/// Lock-free metrics accumulator owned by a single queue
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    total_operations: AtomicU64,
    successful_operations: AtomicU64,
    failed_operations: AtomicU64,
    contended_operations: AtomicU64,
    total_time_ns: AtomicU64,
    max_time_ns: AtomicU64,
    memory_usage: AtomicUsize,
    peak_memory_usage: AtomicUsize,
}

impl AtomicMetrics {
    /// Record a successful operation with its duration
    pub fn record_success(&self, duration: Duration) {
        let duration_ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        self.total_operations.fetch_add(1, Ordering::Relaxed);
        self.successful_operations.fetch_add(1, Ordering::Relaxed);
        self.total_time_ns.fetch_add(duration_ns, Ordering::Relaxed);
        self.max_time_ns.fetch_max(duration_ns, Ordering::Relaxed);
    }

    /// Record a failed operation
    pub fn record_failure(&self) {
        self.total_operations.fetch_add(1, Ordering::Relaxed);
        self.failed_operations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lock acquisition that could not proceed immediately
    pub fn record_contention(&self) {
        self.contended_operations.fetch_add(1, Ordering::Relaxed);
    }

    /// Update memory usage, raising the peak if needed
    pub fn update_memory_usage(&self, usage: usize) {
        self.memory_usage.store(usage, Ordering::Relaxed);
        self.peak_memory_usage.fetch_max(usage, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> PerformanceMetrics {
        let total_ops = self.total_operations.load(Ordering::Relaxed);
        let successful_ops = self.successful_operations.load(Ordering::Relaxed);
        let total_time = self.total_time_ns.load(Ordering::Relaxed);

        PerformanceMetrics {
            total_operations: total_ops,
            successful_operations: successful_ops,
            failed_operations: self.failed_operations.load(Ordering::Relaxed),
            contended_operations: self.contended_operations.load(Ordering::Relaxed),
            avg_operation_time_ns: if successful_ops > 0 {
                total_time / successful_ops
            } else {
                0
            },
            max_operation_time_ns: self.max_time_ns.load(Ordering::Relaxed),
            memory_usage_bytes: self.memory_usage.load(Ordering::Relaxed),
            peak_memory_usage_bytes: self.peak_memory_usage.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.total_operations.store(0, Ordering::Relaxed);
        self.successful_operations.store(0, Ordering::Relaxed);
        self.failed_operations.store(0, Ordering::Relaxed);
        self.contended_operations.store(0, Ordering::Relaxed);
        self.total_time_ns.store(0, Ordering::Relaxed);
        self.max_time_ns.store(0, Ordering::Relaxed);
        // Memory usage reflects current contents, restart the peak from there
        let current = self.memory_usage.load(Ordering::Relaxed);
        self.peak_memory_usage.store(current, Ordering::Relaxed);
    }
}

/// Trait for data structures that support performance metrics
pub trait MetricsCollector {
    /// Get current performance metrics
    fn metrics(&self) -> PerformanceMetrics;

    /// Reset all metrics
    fn reset_metrics(&self);

    /// Enable or disable metrics collection
    fn set_metrics_enabled(&self, enabled: bool);

    /// Check if metrics collection is enabled
    fn is_metrics_enabled(&self) -> bool;
}

/// Measures a single operation; a no-op without the `metrics` feature
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpTimer {
    #[cfg(feature = "metrics")]
    start: std::time::Instant,
}

impl OpTimer {
    #[inline]
    pub(crate) fn start() -> Self {
        Self {
            #[cfg(feature = "metrics")]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(feature = "metrics")]
    #[inline]
    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[cfg(not(feature = "metrics"))]
    #[inline]
    pub(crate) fn elapsed(&self) -> Duration {
        Duration::ZERO
    }
}

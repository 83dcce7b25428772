//! Lock primitive used by the queues.
//!
//! Regular builds use `parking_lot`. Building with `--cfg loom` swaps in loom's
//! model-checked `RwLock` behind the same method names, so the loom suite
//! exercises the real queue code.

#[cfg(not(loom))]
pub(crate) use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(loom)]
pub(crate) use self::loom_shim::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(loom)]
mod loom_shim {
    use core::time::Duration;
    use std::sync::PoisonError;

    pub(crate) use loom::sync::{RwLockReadGuard, RwLockWriteGuard};

    pub(crate) struct RwLock<T> {
        inner: loom::sync::RwLock<T>,
    }

    impl<T> RwLock<T> {
        pub(crate) fn new(value: T) -> Self {
            Self {
                inner: loom::sync::RwLock::new(value),
            }
        }

        pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
            self.inner.read().unwrap_or_else(PoisonError::into_inner)
        }

        pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
            self.inner.write().unwrap_or_else(PoisonError::into_inner)
        }

        pub(crate) fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
            self.inner.try_read().ok()
        }

        pub(crate) fn try_write(&self) -> Option<RwLockWriteGuard<'_, T>> {
            self.inner.try_write().ok()
        }

        // Loom has no notion of wall-clock time; a bounded wait degrades to a
        // single attempt.
        pub(crate) fn try_read_for(&self, _timeout: Duration) -> Option<RwLockReadGuard<'_, T>> {
            self.try_read()
        }

        pub(crate) fn try_write_for(&self, _timeout: Duration) -> Option<RwLockWriteGuard<'_, T>> {
            self.try_write()
        }

        pub(crate) fn into_inner(self) -> T {
            self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

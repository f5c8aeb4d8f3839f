//! Delivery gate shared by subscriptions and the bandwidth estimator

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::Cell;

/// Open/closed flag checked under a lock for every delivery.
///
/// A delivery holds the lock for the duration of its callback, so `close`
/// from another thread waits for it. The lock is reentrant so a callback can
/// close its own gate.
pub(crate) struct Gate {
    open: ReentrantMutex<Cell<bool>>,
}

impl Gate {
    pub(crate) fn new() -> Self {
        Self {
            open: ReentrantMutex::new(Cell::new(true)),
        }
    }

    /// Hold the gate while delivering. Check `get()` on the guard first.
    pub(crate) fn enter(&self) -> ReentrantMutexGuard<'_, Cell<bool>> {
        self.open.lock()
    }

    pub(crate) fn close(&self) {
        self.open.lock().set(false);
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.lock().get()
    }
}

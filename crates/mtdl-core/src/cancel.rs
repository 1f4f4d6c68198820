//! Fail-fast signal and write serialization shared by all workers of one run.
//!
//! The coordinator creates one `CancelContext` per run and hands every worker
//! an `Arc` to it. The first failure sets the flag; the flag is read under the
//! write lock right before each write, so no block lands in the file once a
//! failure has been observed by the writer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct CancelContext {
    failed: AtomicBool,
    write_lock: Mutex<()>,
}

impl CancelContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signal. Returns true only for the call that set it first.
    pub fn signal(&self) -> bool {
        !self.failed.swap(true, Ordering::SeqCst)
    }

    pub fn is_signaled(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    /// Runs `write` while holding the run's write lock, unless the signal is
    /// already set, in which case nothing runs and `None` is returned.
    pub fn write_guarded<T>(&self, write: impl FnOnce() -> T) -> Option<T> {
        // A worker that panicked mid-write leaves nothing to repair: the run fails anyway.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.failed.load(Ordering::SeqCst) {
            return None;
        }
        Some(write())
    }
}

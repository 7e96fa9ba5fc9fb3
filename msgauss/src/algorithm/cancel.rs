use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Caller-owned cancellation flag for long-running reconstructions.
///
/// Clones share the same underlying flag, so one handle can be kept by the
/// caller while others are polled from worker threads.
///
/// # Example
///
/// ```rust
/// # use msgauss::algorithm::cancel::AbortFlag;
/// let flag = AbortFlag::new();
/// let worker_handle = flag.clone();
/// assert!(!worker_handle.is_set());
/// flag.set();
/// assert!(worker_handle.is_set());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AbortFlag {
    inner: Arc<AtomicBool>,
}

impl AbortFlag {
    pub fn new() -> Self {
        AbortFlag { inner: Arc::new(AtomicBool::new(false)) }
    }

    /// Request that running reconstructions stop at their next poll.
    pub fn set(&self) {
        self.inner.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.inner.store(false, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.inner.load(Ordering::Relaxed)
    }

    /// A poll closure suitable for [`crate::algorithm::reconstruction::reconstruct`].
    pub fn poller(&self) -> impl FnMut() -> bool + '_ {
        move || self.is_set()
    }
}

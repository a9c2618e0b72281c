//! Coalescing cross-thread wake flag
//!
//! Application handles signal through this; the run loop consumes it.
//! The flag is latched, so a signal sent before `run` installs the
//! backend waker is still observed by the first queue check - there is
//! no lost-wakeup window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::Waker;

pub(crate) struct WakeState {
    pending: AtomicBool,
    waker: Mutex<Option<Arc<dyn Waker>>>,
}

impl WakeState {
    pub(crate) fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            waker: Mutex::new(None),
        }
    }

    /// Request a prompt queue re-check. Any thread, any number of
    /// times; calls while already pending coalesce.
    pub(crate) fn signal(&self) {
        self.pending.store(true, Ordering::Release);
        if let Some(waker) = self.waker.lock().as_ref() {
            waker.wake();
        }
    }

    /// Route future signals to the running backend's waker.
    pub(crate) fn install(&self, waker: Arc<dyn Waker>) {
        *self.waker.lock() = Some(waker.clone());
        // A signal may have raced ahead of installation; make sure the
        // backend sees it.
        if self.pending.load(Ordering::Acquire) {
            waker.wake();
        }
    }

    /// Consume the pending flag.
    pub(crate) fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct CountingWaker(AtomicUsize);

    impl Waker for CountingWaker {
        fn wake(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_signal_latches_before_install() {
        let wake = WakeState::new();
        wake.signal();
        wake.signal();
        assert!(wake.take_pending());
        assert!(!wake.take_pending());
    }

    #[test]
    fn test_install_forwards_raced_signal() {
        let wake = WakeState::new();
        wake.signal();
        let waker = Arc::new(CountingWaker(AtomicUsize::new(0)));
        wake.install(waker.clone());
        assert_eq!(waker.0.load(Ordering::SeqCst), 1);
        wake.signal();
        assert_eq!(waker.0.load(Ordering::SeqCst), 2);
    }
}

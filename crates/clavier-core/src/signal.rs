//! Sleep/wake handshake between producers and the queue thread.
//!
//! The mutex guards only the "signalled" flag, never queue contents.

use parking_lot::{Condvar, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct QueueSignal {
    signalled: Mutex<bool>,
    cond: Condvar,
}

impl QueueSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake the waiter. May block briefly on the lock;
    /// not for real-time callers.
    pub fn signal(&self) {
        let mut signalled = self.signalled.lock();
        *signalled = true;
        self.cond.notify_one();
    }

    /// Signal only if the lock is free right now. Returns whether it did.
    ///
    /// A missed signal is picked up on the waiter's next timeout.
    #[inline]
    pub fn try_signal(&self) -> bool {
        match self.signalled.try_lock() {
            Some(mut signalled) => {
                *signalled = true;
                self.cond.notify_one();
                true
            }
            None => false,
        }
    }

    /// Sleep until signalled or `timeout` elapses, then clear the flag.
    ///
    /// Returns true if woken by a signal. A signal raised before the call
    /// returns immediately.
    pub fn wait(&self, timeout: Duration) -> bool {
        let mut signalled = self.signalled.lock();
        if !*signalled {
            // Spurious wakeups just end this cycle early.
            self.cond.wait_for(&mut signalled, timeout);
        }
        std::mem::replace(&mut *signalled, false)
    }

    pub fn is_signalled(&self) -> bool {
        *self.signalled.lock()
    }
}

//! Hand-off from the queue thread to the application's own thread.
//!
//! The queue thread never runs application handlers itself; it posts
//! [`AppMessage`]s and moves on. The application drains them from its event
//! loop with [`AppReceiver::dispatch_pending`].
//!
//! The channel is bounded. While the application is not draining it, new
//! messages are dropped rather than queued.

use clavier_midi::MidiEvent;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppMessage {
    /// An event read from a device.
    MidiInput(MidiEvent),
    /// The playback position changed.
    PlaybackTime(f64),
}

/// Create a connected sender/receiver pair holding at most `capacity`
/// undispatched messages.
pub fn app_channel(capacity: usize) -> (AppSender, AppReceiver) {
    let (tx, rx) = bounded(capacity);
    (AppSender { tx }, AppReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct AppSender {
    tx: Sender<AppMessage>,
}

/// Why a message was not posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostError {
    /// The application has not drained the channel; the message was dropped.
    Full,
    /// Every receiver is gone.
    Disconnected,
}

impl AppSender {
    /// Post without waiting. A full channel drops the message.
    #[inline]
    pub fn post(&self, message: AppMessage) -> Result<(), PostError> {
        self.tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => PostError::Full,
            TrySendError::Disconnected(_) => PostError::Disconnected,
        })
    }

    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(usize::MAX)
    }
}

#[derive(Debug, Clone)]
pub struct AppReceiver {
    rx: Receiver<AppMessage>,
}

impl AppReceiver {
    pub fn try_recv(&self) -> Option<AppMessage> {
        self.rx.try_recv().ok()
    }

    /// Block up to `timeout` for the next message. `None` on timeout or once
    /// every sender has been dropped.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<AppMessage> {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Run `handler` on every message already queued. Returns how many ran.
    pub fn dispatch_pending(&self, mut handler: impl FnMut(AppMessage)) -> usize {
        let mut count = 0;
        for message in self.rx.try_iter() {
            handler(message);
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

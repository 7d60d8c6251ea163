//! What a running backend is allowed to touch.
//!
//! A backend gets a [`BackendIo`] at initialization and keeps a clone on its
//! render or polling thread. Every method is lock-free and never blocks, so
//! it may be called from a real-time callback.

use clavier_core::{QueueSet, QueueSignal, TimebaseArbiter, TimebasePriority};
use clavier_midi::{BackendClass, ImmediateEvent};
use std::sync::Arc;

#[derive(Clone)]
pub struct BackendIo {
    queues: Arc<QueueSet>,
    timebase: Arc<TimebaseArbiter>,
    signal: Arc<QueueSignal>,
}

impl BackendIo {
    pub fn new(
        queues: Arc<QueueSet>,
        timebase: Arc<TimebaseArbiter>,
        signal: Arc<QueueSignal>,
    ) -> Self {
        Self {
            queues,
            timebase,
            signal,
        }
    }

    /// Next immediate event queued for `class`.
    #[inline]
    pub fn read_event_from_queue(
        &self,
        class: BackendClass,
        until_time: f64,
    ) -> Option<ImmediateEvent> {
        self.queues.read_event_from_queue(class, until_time)
    }

    /// Queue an event received from a device and nudge the queue thread.
    ///
    /// Returns false if the input queue was full or absent; the event is
    /// dropped.
    #[inline]
    pub fn input_midi_event(&self, class: BackendClass, port: u16, buffer: &[u8]) -> bool {
        let queued = self.queues.input_midi_event(class, port, buffer);
        if queued {
            self.signal.try_signal();
        }
        queued
    }

    /// Offer a playback position. See [`TimebaseArbiter::update`].
    #[inline]
    pub fn update_playback_time(&self, priority: TimebasePriority, time: f64) -> bool {
        self.timebase.update(priority, time)
    }

    #[inline]
    pub fn playback_time(&self) -> f64 {
        self.timebase.get_time()
    }

    pub fn reset_playback_time(&self, time: f64) {
        self.timebase.reset(time);
    }

    pub fn queues(&self) -> &Arc<QueueSet> {
        &self.queues
    }

    pub fn timebase(&self) -> &Arc<TimebaseArbiter> {
        &self.timebase
    }

    pub fn signal(&self) -> &Arc<QueueSignal> {
        &self.signal
    }
}

impl std::fmt::Debug for BackendIo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendIo")
            .field("playback_time", &self.playback_time())
            .finish_non_exhaustive()
    }
}

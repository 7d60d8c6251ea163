//! Playback-time arbitration between competing clock sources.
//!
//! Several backends may report a playback position at once. The arbiter keeps
//! one value and accepts an update only from the best source currently bound:
//!
//! | Priority    | Accepted when                              |
//! |-------------|--------------------------------------------|
//! | `AudioClock`| always                                     |
//! | `MidiClock` | the audio class is bound to the dummy      |
//! | `DummyClock`| both classes are bound to the dummy        |
//!
//! Every operation is lock-free and safe from a render callback.

use crate::lockfree::{AtomicDouble, AtomicFlag};
use crate::signal::QueueSignal;
use clavier_midi::BackendClass;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Authority of a playback-time source. Higher wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TimebasePriority {
    /// No timing relevance.
    DummyClock = 1,
    /// A backend with no external clock.
    MidiClock = 2,
    /// A backend synchronized to an external sample clock.
    AudioClock = 3,
}

impl TimebasePriority {
    fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::DummyClock),
            2 => Some(Self::MidiClock),
            3 => Some(Self::AudioClock),
            _ => None,
        }
    }
}

/// Whether an update at `priority` may replace the current time, given which
/// classes are bound to the dummy backend.
#[inline]
pub const fn accepts(priority: TimebasePriority, audio_dummy: bool, midi_dummy: bool) -> bool {
    match priority {
        TimebasePriority::AudioClock => true,
        TimebasePriority::MidiClock => audio_dummy,
        TimebasePriority::DummyClock => audio_dummy && midi_dummy,
    }
}

#[derive(Debug)]
pub struct TimebaseArbiter {
    time: AtomicDouble,
    reset_pending: AtomicFlag,
    audio_dummy: AtomicFlag,
    midi_dummy: AtomicFlag,
    /// Priority of the last accepted update, 0 before any.
    last_priority: AtomicU8,
    signal: Arc<QueueSignal>,
}

impl TimebaseArbiter {
    /// Both classes start out bound to the dummy.
    pub fn new(signal: Arc<QueueSignal>) -> Self {
        Self {
            time: AtomicDouble::new(0.0),
            reset_pending: AtomicFlag::new(false),
            audio_dummy: AtomicFlag::new(true),
            midi_dummy: AtomicFlag::new(true),
            last_priority: AtomicU8::new(0),
            signal,
        }
    }

    /// Offer a new playback time.
    ///
    /// Returns true if the update was accepted. The first update after
    /// [`reset`](Self::reset) is swallowed. When an accepted value differs
    /// from the previous one the queue thread is nudged with
    /// [`QueueSignal::try_signal`]; a missed nudge is not retried.
    #[inline]
    pub fn update(&self, priority: TimebasePriority, time: f64) -> bool {
        if !accepts(priority, self.audio_dummy.get(), self.midi_dummy.get()) {
            return false;
        }
        if self.reset_pending.swap(false) {
            return false;
        }
        self.last_priority.store(priority as u8, Ordering::Release);
        let previous = self.time.swap(time);
        if previous != time {
            self.signal.try_signal();
        }
        true
    }

    /// Jump to `time` and ignore the next update, which may still carry a
    /// position computed before the jump.
    pub fn reset(&self, time: f64) {
        self.time.set(time);
        self.reset_pending.set(true);
        self.signal.try_signal();
    }

    /// Current playback time in seconds.
    #[inline]
    pub fn get_time(&self) -> f64 {
        self.time.get()
    }

    /// Priority of the last accepted update.
    pub fn last_priority(&self) -> Option<TimebasePriority> {
        TimebasePriority::from_u8(self.last_priority.load(Ordering::Acquire))
    }

    /// Record whether `class` is currently bound to the dummy backend.
    pub fn set_bound_dummy(&self, class: BackendClass, dummy: bool) {
        match class.resolve() {
            BackendClass::Midi => self.midi_dummy.set(dummy),
            _ => self.audio_dummy.set(dummy),
        }
    }

    pub fn is_bound_dummy(&self, class: BackendClass) -> bool {
        match class.resolve() {
            BackendClass::Midi => self.midi_dummy.get(),
            _ => self.audio_dummy.get(),
        }
    }
}

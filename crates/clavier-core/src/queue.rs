//! Per-class event queues.
//!
//! Each backend class owns one [`EventQueue`]: an immediate ring of
//! length-prefixed byte frames flowing from the application to the backend's
//! render callback, and an input ring of [`MidiEvent`] records flowing from
//! the backend's device thread to the queue thread.
//!
//! [`QueueSet`] holds both classes' queues behind [`ArcSwap`] so the render
//! callback can load its queue without locking while the control thread
//! replaces it on init, reconfigure and teardown.

use crate::config::QueueCapacity;
use crate::ring::SpscRing;
use arc_swap::ArcSwap;
use clavier_midi::{
    frame_message, BackendClass, ImmediateEvent, MidiEvent, RawMessage, MAX_MESSAGE_LEN,
    NUM_CLASSES,
};
use std::sync::Arc;

/// Bytes reserved per immediate slot: one length prefix plus the largest
/// payload.
pub const IMMEDIATE_FRAME_BYTES: usize = 1 + MAX_MESSAGE_LEN;

pub struct EventQueue {
    immediate: Option<SpscRing<u8>>,
    input: Option<SpscRing<MidiEvent>>,
}

impl EventQueue {
    /// Allocate the rings described by `capacity`. A zero slot count leaves
    /// that ring absent.
    pub fn with_capacity(capacity: QueueCapacity) -> Self {
        Self {
            immediate: SpscRing::new(capacity.immediate_slots * IMMEDIATE_FRAME_BYTES),
            input: SpscRing::new(capacity.input_slots),
        }
    }

    /// A queue with both rings absent.
    pub fn disabled() -> Self {
        Self {
            immediate: None,
            input: None,
        }
    }

    #[inline]
    pub fn has_immediate(&self) -> bool {
        self.immediate.is_some()
    }

    #[inline]
    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    /// Write one length-prefixed frame to the immediate ring.
    ///
    /// Fails without writing anything if the ring is absent, the payload is
    /// longer than [`MAX_MESSAGE_LEN`], or fewer than `1 + bytes.len()` bytes
    /// are free. Never blocks.
    pub fn write_immediate(&self, bytes: &[u8]) -> bool {
        let Some(ring) = &self.immediate else {
            return false;
        };
        if bytes.len() > MAX_MESSAGE_LEN {
            return false;
        }
        let mut frame = [0u8; IMMEDIATE_FRAME_BYTES];
        frame[0] = bytes.len() as u8;
        frame[1..=bytes.len()].copy_from_slice(bytes);
        ring.push_all(&frame[..=bytes.len()])
    }

    /// Pop the next immediate frame.
    ///
    /// `until_time` is accepted for the caller's benefit; immediate events are
    /// always due, so the returned event is stamped `0.0`.
    pub fn read_output(&self, _until_time: f64) -> Option<ImmediateEvent> {
        let ring = self.immediate.as_ref()?;
        let mut payload = [0u8; MAX_MESSAGE_LEN];
        let len = ring.pop_frame(&mut payload, |prefix| prefix as usize)?;
        let message = RawMessage::from_slice(&payload[..len])?;
        Some(ImmediateEvent { message, time: 0.0 })
    }

    /// Copy one record into the input ring. Fails if the ring is absent or full.
    #[inline]
    pub fn write_input(&self, event: MidiEvent) -> bool {
        match &self.input {
            Some(ring) => ring.try_push(event),
            None => false,
        }
    }

    #[inline]
    pub fn read_input(&self) -> Option<MidiEvent> {
        self.input.as_ref()?.try_pop()
    }

    /// Bytes currently waiting in the immediate ring; zero when the ring is
    /// absent. `None` while the consumer is mid-read.
    pub fn immediate_len(&self) -> Option<usize> {
        self.immediate.as_ref().map_or(Some(0), SpscRing::occupied_len)
    }

    /// Records currently waiting in the input ring; zero when the ring is
    /// absent. `None` while the queue thread is mid-read.
    pub fn input_len(&self) -> Option<usize> {
        self.input.as_ref().map_or(Some(0), SpscRing::occupied_len)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field(
                "immediate_capacity",
                &self.immediate.as_ref().map(SpscRing::capacity),
            )
            .field("input_capacity", &self.input.as_ref().map(SpscRing::capacity))
            .finish()
    }
}

/// The queues of both backend classes.
pub struct QueueSet {
    queues: [ArcSwap<EventQueue>; NUM_CLASSES],
}

impl QueueSet {
    /// Both classes start with disabled queues.
    pub fn new() -> Self {
        Self {
            queues: std::array::from_fn(|_| ArcSwap::from_pointee(EventQueue::disabled())),
        }
    }

    /// Replace `class`'s queue with a freshly allocated one.
    pub fn create(&self, class: BackendClass, capacity: QueueCapacity) {
        tracing::debug!(
            %class,
            immediate_slots = capacity.immediate_slots,
            input_slots = capacity.input_slots,
            "creating event queue"
        );
        self.queues[class.index()].store(Arc::new(EventQueue::with_capacity(capacity)));
    }

    /// Release `class`'s rings. Safe on an already disabled queue.
    pub fn free(&self, class: BackendClass) {
        self.queues[class.index()].store(Arc::new(EventQueue::disabled()));
    }

    /// Current queue of `class`. Lock-free.
    #[inline]
    pub fn get(&self, class: BackendClass) -> Arc<EventQueue> {
        self.queues[class.index()].load_full()
    }

    /// Normalize `buffer` and write it to `class`'s immediate ring.
    ///
    /// Returns false if the message is malformed (empty, or SysEx with no
    /// terminator in range) or the ring has no room.
    pub fn play_midi_event(&self, class: BackendClass, _port: u16, buffer: &[u8]) -> bool {
        match frame_message(buffer) {
            Some(message) => self.queues[class.index()]
                .load()
                .write_immediate(message.as_bytes()),
            None => false,
        }
    }

    /// Normalize a three-byte channel message and write it to `class`'s input
    /// ring. Returns false if it was dropped.
    pub fn input_midi_event(&self, class: BackendClass, port: u16, buffer: &[u8]) -> bool {
        match clavier_midi::channel_message(buffer) {
            Some(data) => {
                let event = MidiEvent::channel_message(class.resolve(), port, data);
                self.queues[class.index()].load().write_input(event)
            }
            None => false,
        }
    }

    /// Next immediate event of `class` due by `until_time`.
    #[inline]
    pub fn read_event_from_queue(
        &self,
        class: BackendClass,
        until_time: f64,
    ) -> Option<ImmediateEvent> {
        self.queues[class.index()].load().read_output(until_time)
    }

    #[inline]
    pub fn read_input(&self, class: BackendClass) -> Option<MidiEvent> {
        self.queues[class.index()].load().read_input()
    }
}

impl Default for QueueSet {
    fn default() -> Self {
        Self::new()
    }
}

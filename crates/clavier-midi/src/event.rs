//! RT-safe event records. Everything here is `Copy` and heap-free so it can
//! move through a ring buffer by value.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Longest message a single record can hold: one SysEx block including its
/// terminator, small enough for a one-byte length prefix.
pub const MAX_MESSAGE_LEN: usize = 255;

/// Number of concrete backend classes (audio and MIDI).
pub const NUM_CLASSES: usize = 2;

/// Backend role an event or driver is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendClass {
    /// Alias for [`BackendClass::Audio`].
    Default,
    Audio,
    Midi,
}

impl BackendClass {
    /// Both concrete classes, in slot order.
    pub const ALL: [BackendClass; NUM_CLASSES] = [BackendClass::Audio, BackendClass::Midi];

    /// Resolve the `Default` alias to the class it stands for.
    #[inline]
    pub const fn resolve(self) -> Self {
        match self {
            BackendClass::Default | BackendClass::Audio => BackendClass::Audio,
            BackendClass::Midi => BackendClass::Midi,
        }
    }

    /// Slot index of the resolved class.
    #[inline]
    pub const fn index(self) -> usize {
        match self.resolve() {
            BackendClass::Midi => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for BackendClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolve() {
            BackendClass::Midi => f.write_str("MIDI"),
            _ => f.write_str("audio"),
        }
    }
}

/// One MIDI message stored inline.
#[derive(Clone, Copy)]
pub struct RawMessage {
    len: u8,
    bytes: [u8; MAX_MESSAGE_LEN],
}

impl RawMessage {
    pub const fn empty() -> Self {
        Self {
            len: 0,
            bytes: [0; MAX_MESSAGE_LEN],
        }
    }

    /// Copy `bytes` into a new message. Returns `None` if it does not fit.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_MESSAGE_LEN {
            return None;
        }
        let mut message = Self::empty();
        message.bytes[..bytes.len()].copy_from_slice(bytes);
        message.len = bytes.len() as u8;
        Some(message)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Status byte, if any.
    #[inline]
    pub fn status(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }
}

impl Default for RawMessage {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for RawMessage {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for RawMessage {}

impl fmt::Debug for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawMessage({:02X?})", self.as_bytes())
    }
}

impl AsRef<[u8]> for RawMessage {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Inbound device event, as written to and read from the input queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiEvent {
    /// Class of the backend that received the event.
    pub class: BackendClass,
    /// Receiving port (zero when the backend has only one).
    pub port: u16,
    pub message: RawMessage,
}

impl MidiEvent {
    #[inline]
    pub fn new(class: BackendClass, port: u16, message: RawMessage) -> Self {
        Self {
            class,
            port,
            message,
        }
    }

    /// Three-byte channel message.
    #[inline]
    pub fn channel_message(class: BackendClass, port: u16, data: [u8; 3]) -> Self {
        let mut message = RawMessage::empty();
        message.bytes[..3].copy_from_slice(&data);
        message.len = 3;
        Self::new(class, port, message)
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.message.as_bytes()
    }

    /// Upper nibble of the status byte.
    #[inline]
    pub fn status(&self) -> u8 {
        self.message.status().unwrap_or(0) & 0xF0
    }

    /// Lower nibble of the status byte.
    #[inline]
    pub fn channel(&self) -> u8 {
        self.message.status().unwrap_or(0) & 0x0F
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        self.status() == crate::status::NOTE_ON
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        self.status() == crate::status::NOTE_OFF
    }
}

/// Outbound event popped from an immediate queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImmediateEvent {
    pub message: RawMessage,
    /// Seconds from the start of the piece. Immediate events are always `0.0`.
    pub time: f64,
}

impl ImmediateEvent {
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.message.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.message.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }
}

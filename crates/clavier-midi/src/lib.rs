//! MIDI event records for the clavier event queues.
//!
//! Pure data types shared by the queues, the backends and the application:
//!
//! - [`BackendClass`]: which backend role (audio or MIDI) an event belongs to
//! - [`RawMessage`]: fixed-size byte buffer holding one framed MIDI message
//! - [`MidiEvent`]: an inbound device event as stored in the input queue
//! - [`ImmediateEvent`]: an outbound event popped from the immediate queue
//!
//! The [`normalize`] module canonicalizes raw bytes before they are queued.

mod event;
pub use event::{BackendClass, ImmediateEvent, MidiEvent, RawMessage, MAX_MESSAGE_LEN, NUM_CLASSES};

pub mod normalize;
pub use normalize::{
    channel_message, frame_message, normalize_channel_message, sysex_len, CHANNEL_MESSAGE_LEN,
};

/// MIDI status bytes used by the normalizer.
pub mod status {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const KEY_PRESSURE: u8 = 0xA0;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    pub const PITCH_BEND: u8 = 0xE0;
    pub const SYSEX_START: u8 = 0xF0;
    pub const SYSEX_END: u8 = 0xF7;
}

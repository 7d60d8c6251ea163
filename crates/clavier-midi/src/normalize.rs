//! Canonicalization of raw MIDI bytes before they enter a queue.
//!
//! Two wire forms of "note released" exist (Note-Off, and Note-On with
//! velocity zero); everything downstream only ever sees Note-Off. SysEx
//! blocks are delimited by scanning for the terminator, bounded by
//! [`MAX_MESSAGE_LEN`].

use crate::event::{RawMessage, MAX_MESSAGE_LEN};
use crate::status::{NOTE_OFF, NOTE_ON, SYSEX_END, SYSEX_START};

/// Non-SysEx messages are always framed as exactly this many bytes.
pub const CHANNEL_MESSAGE_LEN: usize = 3;

/// Rewrite a Note-On with velocity zero into a Note-Off on the same channel.
#[inline]
pub fn normalize_channel_message(data: &mut [u8; CHANNEL_MESSAGE_LEN]) {
    if data[0] & 0xF0 == NOTE_ON && data[2] == 0 {
        data[0] = (data[0] & 0x0F) | NOTE_OFF;
    }
}

/// Length of the SysEx block at the start of `buffer`, terminator included.
///
/// Only the first [`MAX_MESSAGE_LEN`] bytes are scanned; `None` if no
/// terminator is found there.
#[inline]
pub fn sysex_len(buffer: &[u8]) -> Option<usize> {
    buffer
        .iter()
        .take(MAX_MESSAGE_LEN)
        .position(|&b| b == SYSEX_END)
        .map(|i| i + 1)
}

/// Copy the first three bytes of `buffer` and normalize them.
///
/// Shorter buffers are zero-padded. `None` for an empty buffer.
#[inline]
pub fn channel_message(buffer: &[u8]) -> Option<[u8; CHANNEL_MESSAGE_LEN]> {
    if buffer.is_empty() {
        return None;
    }
    let mut data = [0u8; CHANNEL_MESSAGE_LEN];
    let len = buffer.len().min(CHANNEL_MESSAGE_LEN);
    data[..len].copy_from_slice(&buffer[..len]);
    normalize_channel_message(&mut data);
    Some(data)
}

/// Frame an outbound message for the immediate queue.
///
/// A buffer starting with `0xF0` becomes one SysEx frame up to and including
/// `0xF7`; anything else becomes a normalized three-byte channel message.
/// `None` means the message must be rejected.
pub fn frame_message(buffer: &[u8]) -> Option<RawMessage> {
    match buffer.first() {
        None => None,
        Some(&SYSEX_START) => {
            let len = sysex_len(buffer)?;
            RawMessage::from_slice(&buffer[..len])
        }
        Some(_) => {
            let data = channel_message(buffer)?;
            RawMessage::from_slice(&data)
        }
    }
}

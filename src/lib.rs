//! # Clavier - Audio Backend Subsystem
//!
//! Binds one audio and one MIDI driver, moves events between the application
//! and the drivers' real-time threads, and arbitrates the playback clock.
//!
//! ## Architecture
//!
//! Clavier is an umbrella crate that coordinates:
//! - **clavier-midi** - Event records and the MIDI normalizer
//! - **clavier-core** - Lock-free queues, timebase arbiter, queue thread, config
//! - **clavier-backend** - Driver interface, dummy driver, registry with failover
//!
//! ## Quick Start
//!
//! ```ignore
//! use clavier::prelude::*;
//!
//! let mut audio = AudioSubsystem::new();
//! audio.initialize(&AudioConfig::default())?;
//!
//! // Application thread: queue a note for the audio driver
//! audio.play_midi_event(BackendClass::Audio, 0, &[0x90, 60, 100]);
//!
//! // Render callback: pull it back out
//! let io = audio.io();
//! while let Some(event) = io.read_event_from_queue(BackendClass::Audio, 0.0) {
//!     // render event.bytes()
//! }
//!
//! // Application event loop: handle device input and clock changes
//! audio.dispatch_pending(|message| match message {
//!     AppMessage::MidiInput(event) => println!("input {event:?}"),
//!     AppMessage::PlaybackTime(t) => println!("now at {t:.3}s"),
//! });
//!
//! audio.shutdown()?;
//! ```

/// Re-export of clavier-core for direct access
pub use clavier_core as core;

/// Re-export of clavier-backend for driver authors
pub use clavier_backend as backend;

/// Re-export of clavier-midi
pub use clavier_midi as midi;

pub use clavier_core::{
    AppMessage, AppReceiver, AudioConfig, QueueCapacity, TimebasePriority,
};

pub use clavier_backend::{Backend, BackendError, BackendIo, BackendResult, DriverTable};

pub use clavier_midi::{BackendClass, ImmediateEvent, MidiEvent, RawMessage};

mod error;
pub use error::{Error, Result};

mod builder;
mod subsystem;

pub use builder::AudioSubsystemBuilder;
pub use subsystem::AudioSubsystem;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{AudioSubsystem, AudioSubsystemBuilder, Error, Result};

    pub use crate::{AppMessage, AudioConfig, QueueCapacity, TimebasePriority};

    pub use crate::{Backend, BackendError, BackendIo, BackendResult};

    pub use crate::{BackendClass, ImmediateEvent, MidiEvent};
}

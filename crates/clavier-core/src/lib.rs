//! Real-time plumbing for the clavier audio subsystem.
//!
//! # Primary API
//!
//! - [`QueueSet`] / [`EventQueue`]: per-class SPSC queues between the
//!   application, backend render callbacks and device threads
//! - [`TimebaseArbiter`]: picks the authoritative playback clock
//! - [`QueueThread`]: drains device input and posts it to the application
//!   through an [`AppSender`]/[`AppReceiver`] pair
//! - [`AudioConfig`]: driver selection and tuning
//!
//! Nothing reachable from a render callback blocks, allocates or logs.

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::{AudioConfig, QueueCapacity};

mod lockfree;
pub use lockfree::{AtomicDouble, AtomicFlag};

mod ring;
pub use ring::SpscRing;

mod queue;
pub use queue::{EventQueue, QueueSet, IMMEDIATE_FRAME_BYTES};

mod signal;
pub use signal::QueueSignal;

mod timebase;
pub use timebase::{accepts, TimebaseArbiter, TimebasePriority};

mod dispatch;
pub use dispatch::{app_channel, AppMessage, AppReceiver, AppSender, PostError};

mod queue_thread;
pub use queue_thread::{QueueThread, QueueThreadState};

pub use clavier_midi::{BackendClass, ImmediateEvent, MidiEvent, RawMessage};

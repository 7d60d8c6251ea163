//! Audio subsystem configuration.

use crate::{Error, Result};
use clavier_midi::BackendClass;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ring sizes of one class's event queue. Zero disables that ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCapacity {
    /// Immediate frames (each up to one SysEx block).
    pub immediate_slots: usize,
    /// Input event records.
    pub input_slots: usize,
}

impl QueueCapacity {
    pub const fn new(immediate_slots: usize, input_slots: usize) -> Self {
        Self {
            immediate_slots,
            input_slots,
        }
    }
}

impl Default for QueueCapacity {
    fn default() -> Self {
        Self::new(32, 256)
    }
}

/// Configuration for the audio subsystem.
///
/// Driver names select a registered driver per class; `"dummy"` is always
/// available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub audio_driver: String,
    pub midi_driver: String,
    pub audio_device: String,
    pub sample_rate: f64,
    pub period_size: u32,
    pub midi_input_device: String,
    pub midi_output_device: String,
    pub audio_queue: QueueCapacity,
    pub midi_queue: QueueCapacity,
    pub queue_timeout_ms: u64,
    /// Messages the queue thread may hold for the application before it
    /// starts dropping them.
    pub app_channel_capacity: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            audio_driver: "dummy".into(),
            midi_driver: "dummy".into(),
            audio_device: "default".into(),
            sample_rate: 44100.0,
            period_size: 256,
            midi_input_device: "default".into(),
            midi_output_device: "default".into(),
            audio_queue: QueueCapacity::new(32, 0),
            midi_queue: QueueCapacity::new(32, 256),
            queue_timeout_ms: 100,
            app_channel_capacity: 1024,
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate < 8000.0 || self.sample_rate > 384000.0 {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if self.period_size == 0 {
            return Err(Error::InvalidConfig("period_size must be non-zero".into()));
        }
        if self.queue_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "queue_timeout_ms must be non-zero".into(),
            ));
        }
        if self.app_channel_capacity == 0 {
            return Err(Error::InvalidConfig(
                "app_channel_capacity must be non-zero".into(),
            ));
        }
        for class in BackendClass::ALL {
            if self.driver(class).trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{class} driver name is empty")));
            }
        }
        Ok(())
    }

    /// Driver name configured for `class`.
    pub fn driver(&self, class: BackendClass) -> &str {
        match class.resolve() {
            BackendClass::Midi => &self.midi_driver,
            _ => &self.audio_driver,
        }
    }

    pub fn set_driver(&mut self, class: BackendClass, name: impl Into<String>) {
        match class.resolve() {
            BackendClass::Midi => self.midi_driver = name.into(),
            _ => self.audio_driver = name.into(),
        }
    }

    /// Queue capacity configured for `class`.
    pub fn queue_capacity(&self, class: BackendClass) -> QueueCapacity {
        match class.resolve() {
            BackendClass::Midi => self.midi_queue,
            _ => self.audio_queue,
        }
    }

    /// Queue thread wake interval.
    pub fn queue_timeout(&self) -> Duration {
        Duration::from_millis(self.queue_timeout_ms)
    }

    /// Length of one period in seconds.
    pub fn period_duration(&self) -> f64 {
        self.period_size as f64 / self.sample_rate
    }
}

//! Builder for configuring and constructing an `AudioSubsystem`.

use crate::{AudioSubsystem, Result};
use clavier_backend::{Backend, DriverTable};
use clavier_core::AudioConfig;
use clavier_midi::BackendClass;

/// Registers the drivers the subsystem may select by name. `"dummy"` is
/// always available and needs no registration.
///
/// # Example
///
/// ```ignore
/// use clavier::prelude::*;
///
/// let mut audio = AudioSubsystem::builder()
///     .driver(BackendClass::Midi, "virtual", |class| Box::new(VirtualPort::new(class)))
///     .initialize(&AudioConfig {
///         midi_driver: "virtual".into(),
///         ..Default::default()
///     })?;
/// ```
#[derive(Default)]
pub struct AudioSubsystemBuilder {
    drivers: DriverTable,
}

impl AudioSubsystemBuilder {
    /// Make `name` selectable for `class`. A later registration under the
    /// same name replaces the earlier one.
    pub fn driver<F>(mut self, class: BackendClass, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(BackendClass) -> Box<dyn Backend> + Send + Sync + 'static,
    {
        self.drivers.register(class, name, factory);
        self
    }

    /// Replace every registration with `drivers`.
    pub fn drivers(mut self, drivers: DriverTable) -> Self {
        self.drivers = drivers;
        self
    }

    /// Build a stopped subsystem.
    pub fn build(self) -> AudioSubsystem {
        AudioSubsystem::with_drivers(self.drivers)
    }

    /// Build and initialize with `config` in one step.
    pub fn initialize(self, config: &AudioConfig) -> Result<AudioSubsystem> {
        let mut subsystem = self.build();
        subsystem.initialize(config)?;
        Ok(subsystem)
    }
}

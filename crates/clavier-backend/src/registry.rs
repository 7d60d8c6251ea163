//! Driver selection, failover and class-based lookup.
//!
//! Drivers are registered by name per class in a [`DriverTable`]. The
//! [`BackendRegistry`] binds exactly one backend per class; when the
//! requested driver is unknown, disabled, or fails to initialize, the class
//! falls back to a [`DummyBackend`] and the failure is reported to the
//! caller.

use crate::backend::Backend;
use crate::dummy::{self, DummyBackend, DUMMY_DRIVER};
use crate::error::{Error, Result};
use crate::io::BackendIo;
use clavier_core::AudioConfig;
use clavier_midi::{BackendClass, NUM_CLASSES};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a fresh backend for the class it is bound to.
pub type DriverFactory = Arc<dyn Fn(BackendClass) -> Box<dyn Backend> + Send + Sync>;

/// Well-known audio driver names this build does not ship.
pub const DISABLED_AUDIO_DRIVERS: &[&str] = &["portaudio", "jack"];

/// Well-known MIDI driver names this build does not ship.
pub const DISABLED_MIDI_DRIVERS: &[&str] = &["portmidi", "alsa"];

enum Selection {
    Driver(DriverFactory),
    Dummy,
    NotEnabled,
    Unknown,
}

/// Registered drivers, keyed by class and exact name.
#[derive(Clone, Default)]
pub struct DriverTable {
    drivers: HashMap<(BackendClass, String), DriverFactory>,
}

impl DriverTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name` for `class`, replacing any previous
    /// registration.
    pub fn register<F>(&mut self, class: BackendClass, name: impl Into<String>, factory: F)
    where
        F: Fn(BackendClass) -> Box<dyn Backend> + Send + Sync + 'static,
    {
        self.drivers
            .insert((class.resolve(), name.into()), Arc::new(factory));
    }

    pub fn contains(&self, class: BackendClass, name: &str) -> bool {
        self.drivers.contains_key(&(class.resolve(), name.to_string()))
    }

    /// Every selectable name for `class`, `"dummy"` included, sorted.
    pub fn names(&self, class: BackendClass) -> Vec<String> {
        let class = class.resolve();
        let mut names: Vec<String> = self
            .drivers
            .keys()
            .filter(|(c, _)| *c == class)
            .map(|(_, name)| name.clone())
            .collect();
        if !names.iter().any(|n| n == DUMMY_DRIVER) {
            names.push(DUMMY_DRIVER.to_string());
        }
        names.sort();
        names
    }

    fn select(&self, class: BackendClass, name: &str) -> Selection {
        if name == DUMMY_DRIVER {
            return Selection::Dummy;
        }
        if let Some(factory) = self.drivers.get(&(class, name.to_string())) {
            return Selection::Driver(Arc::clone(factory));
        }
        let disabled = match class {
            BackendClass::Midi => DISABLED_MIDI_DRIVERS,
            _ => DISABLED_AUDIO_DRIVERS,
        };
        if disabled.contains(&name) {
            Selection::NotEnabled
        } else {
            Selection::Unknown
        }
    }
}

impl std::fmt::Debug for DriverTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.drivers.keys()).finish()
    }
}

fn dummy_backend(class: BackendClass) -> Box<dyn Backend> {
    Box::new(DummyBackend::new(class))
}

struct Binding {
    driver: String,
    backend: Box<dyn Backend>,
}

pub struct BackendRegistry {
    slots: [Option<Binding>; NUM_CLASSES],
    drivers: DriverTable,
    io: BackendIo,
}

impl BackendRegistry {
    pub fn new(drivers: DriverTable, io: BackendIo) -> Self {
        Self {
            slots: [None, None],
            drivers,
            io,
        }
    }

    pub fn drivers(&self) -> &DriverTable {
        &self.drivers
    }

    pub fn io(&self) -> &BackendIo {
        &self.io
    }

    /// Pick the driver `config` names for `class`, bind it and initialize it.
    ///
    /// Initialization is attempted at most twice: once with the requested
    /// driver and, if that fails, once with the dummy. The class is always
    /// bound afterwards. An unknown or disabled name binds the dummy and
    /// still returns an error.
    pub fn select_and_initialize(&mut self, class: BackendClass, config: &AudioConfig) -> Result<()> {
        let class = class.resolve();
        let name = config.driver(class).to_string();
        tracing::info!(%class, driver = %name, "initializing backend");

        let (driver, backend, rejected): (String, Box<dyn Backend>, Option<Error>) =
            match self.drivers.select(class, &name) {
                Selection::Driver(factory) => (name.clone(), factory(class), None),
                Selection::Dummy => (DUMMY_DRIVER.into(), dummy_backend(class), None),
                Selection::NotEnabled => {
                    tracing::warn!(%class, driver = %name, "driver is not enabled, using dummy");
                    (
                        DUMMY_DRIVER.into(),
                        dummy_backend(class),
                        Some(Error::DriverNotEnabled {
                            class,
                            name: name.clone(),
                        }),
                    )
                }
                Selection::Unknown => {
                    tracing::warn!(%class, driver = %name, "unknown driver, using dummy");
                    (
                        DUMMY_DRIVER.into(),
                        dummy_backend(class),
                        Some(Error::UnknownDriver {
                            class,
                            name: name.clone(),
                        }),
                    )
                }
            };

        let _ = self.unbind(class);
        self.bind(class, driver.clone(), backend);

        match self.initialize_bound(class, config) {
            Ok(()) => rejected.map_or(Ok(()), Err),
            Err(source) => {
                tracing::warn!(%class, driver = %driver, error = %source, "backend failed to initialize, falling back to dummy");
                self.bind(
                    class,
                    DUMMY_DRIVER.into(),
                    dummy_backend(class),
                );
                if let Err(e) = self.initialize_bound(class, config) {
                    tracing::error!(%class, error = %e, "dummy backend failed to initialize");
                }
                Err(Error::Initialize {
                    class,
                    driver,
                    source,
                })
            }
        }
    }

    /// Backend bound to `class`, or the shared dummy if none is.
    pub fn get(&self, class: BackendClass) -> &dyn Backend {
        match &self.slots[class.index()] {
            Some(binding) => binding.backend.as_ref(),
            None => dummy::unbound(class),
        }
    }

    /// Registered name of the driver bound to `class`.
    pub fn driver_name(&self, class: BackendClass) -> &str {
        self.slots[class.index()]
            .as_ref()
            .map_or(DUMMY_DRIVER, |binding| binding.driver.as_str())
    }

    pub fn is_bound(&self, class: BackendClass) -> bool {
        self.slots[class.index()].is_some()
    }

    /// Destroy and unbind `class`'s backend and free its event queue.
    ///
    /// Always completes; a failing `destroy` is logged and returned.
    pub fn teardown(&mut self, class: BackendClass) -> Result<()> {
        let class = class.resolve();
        let result = self.unbind(class);
        self.io.queues().free(class);
        result
    }

    /// Apply `config` to `class`.
    ///
    /// If the configured driver is the one already bound it is reconfigured in
    /// place; a failure there rebinds the dummy. A different driver tears the
    /// class down, recreates its queue and selects again.
    pub fn reconfigure(&mut self, class: BackendClass, config: &AudioConfig) -> Result<()> {
        let class = class.resolve();
        let name = config.driver(class);

        let Some(binding) = self.slots[class.index()]
            .as_mut()
            .filter(|binding| binding.driver == name)
        else {
            tracing::info!(%class, driver = %name, "switching driver");
            let _ = self.teardown(class);
            self.io
                .queues()
                .create(class, config.queue_capacity(class));
            return self.select_and_initialize(class, config);
        };

        match binding.backend.reconfigure(config) {
            Ok(()) => Ok(()),
            Err(source) => {
                tracing::warn!(%class, error = %source, "reconfigure failed, falling back to dummy");
                let _ = self.unbind(class);
                self.bind(
                    class,
                    DUMMY_DRIVER.into(),
                    dummy_backend(class),
                );
                if let Err(e) = self.initialize_bound(class, config) {
                    tracing::error!(%class, error = %e, "dummy backend failed to initialize");
                }
                Err(Error::Backend { class, source })
            }
        }
    }

    pub fn start_playing(&mut self, class: BackendClass) -> Result<()> {
        self.forward(class, |backend| backend.start_playing())
    }

    pub fn stop_playing(&mut self, class: BackendClass) -> Result<()> {
        self.forward(class, |backend| backend.stop_playing())
    }

    pub fn panic(&mut self, class: BackendClass) -> Result<()> {
        self.forward(class, |backend| backend.panic())
    }

    fn forward(
        &mut self,
        class: BackendClass,
        op: impl FnOnce(&mut dyn Backend) -> crate::backend::BackendResult,
    ) -> Result<()> {
        let class = class.resolve();
        match self.slots[class.index()].as_mut() {
            Some(binding) => {
                op(binding.backend.as_mut()).map_err(|source| Error::Backend { class, source })
            }
            None => Ok(()),
        }
    }

    fn bind(&mut self, class: BackendClass, driver: String, backend: Box<dyn Backend>) {
        self.io
            .timebase()
            .set_bound_dummy(class, backend.is_dummy());
        self.slots[class.index()] = Some(Binding { driver, backend });
    }

    fn unbind(&mut self, class: BackendClass) -> Result<()> {
        self.io.timebase().set_bound_dummy(class, true);
        let Some(mut binding) = self.slots[class.index()].take() else {
            return Ok(());
        };
        binding.backend.destroy().map_err(|source| {
            tracing::error!(%class, driver = %binding.driver, error = %source, "backend failed to destroy");
            Error::Backend { class, source }
        })
    }

    fn initialize_bound(
        &mut self,
        class: BackendClass,
        config: &AudioConfig,
    ) -> crate::backend::BackendResult {
        let io = self.io.clone();
        match self.slots[class.index()].as_mut() {
            Some(binding) => binding.backend.initialize(config, io),
            None => Ok(()),
        }
    }
}

impl Drop for BackendRegistry {
    fn drop(&mut self) {
        for class in BackendClass::ALL {
            let _ = self.unbind(class);
        }
    }
}

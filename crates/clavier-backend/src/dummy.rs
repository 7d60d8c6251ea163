//! No-op backend bound whenever nothing better is available.

use crate::backend::{Backend, BackendResult};
use crate::io::BackendIo;
use clavier_core::AudioConfig;
use clavier_midi::BackendClass;

/// Driver name that always selects [`DummyBackend`].
pub const DUMMY_DRIVER: &str = "dummy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyBackend {
    class: BackendClass,
}

impl DummyBackend {
    pub const fn new(class: BackendClass) -> Self {
        Self {
            class: class.resolve(),
        }
    }

    pub fn class(&self) -> BackendClass {
        self.class
    }
}

static UNBOUND_AUDIO: DummyBackend = DummyBackend::new(BackendClass::Audio);
static UNBOUND_MIDI: DummyBackend = DummyBackend::new(BackendClass::Midi);

/// Shared dummy returned for a class with no binding.
pub(crate) fn unbound(class: BackendClass) -> &'static DummyBackend {
    match class.resolve() {
        BackendClass::Midi => &UNBOUND_MIDI,
        _ => &UNBOUND_AUDIO,
    }
}

impl Backend for DummyBackend {
    fn name(&self) -> &str {
        DUMMY_DRIVER
    }

    fn is_dummy(&self) -> bool {
        true
    }

    fn initialize(&mut self, _config: &AudioConfig, _io: BackendIo) -> BackendResult {
        tracing::debug!(class = %self.class, "dummy backend initialized");
        Ok(())
    }

    fn destroy(&mut self) -> BackendResult {
        Ok(())
    }

    fn reconfigure(&mut self, _config: &AudioConfig) -> BackendResult {
        Ok(())
    }

    fn start_playing(&mut self) -> BackendResult {
        Ok(())
    }

    fn stop_playing(&mut self) -> BackendResult {
        Ok(())
    }

    fn panic(&mut self) -> BackendResult {
        Ok(())
    }
}

//! The capability table every driver implements.

use crate::error::BackendError;
use crate::io::BackendIo;
use clavier_core::AudioConfig;

pub type BackendResult = Result<(), BackendError>;

/// A driver bound to one backend class.
///
/// The registry calls these only from the controlling thread. A driver that
/// runs its own render or polling thread talks to the rest of the system
/// exclusively through the [`BackendIo`] handed to
/// [`initialize`](Backend::initialize).
pub trait Backend: Send {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Whether this is the built-in no-op backend. Affects timebase
    /// arbitration.
    fn is_dummy(&self) -> bool {
        false
    }

    fn initialize(&mut self, config: &AudioConfig, io: BackendIo) -> BackendResult;

    fn destroy(&mut self) -> BackendResult;

    /// Apply a changed configuration without rebinding.
    fn reconfigure(&mut self, config: &AudioConfig) -> BackendResult;

    fn start_playing(&mut self) -> BackendResult;

    fn stop_playing(&mut self) -> BackendResult;

    /// Silence stuck notes and reset engine state.
    fn panic(&mut self) -> BackendResult;
}

//! Backend drivers for the clavier audio subsystem.
//!
//! - [`Backend`]: the six-operation capability table a driver implements
//! - [`DummyBackend`]: no-op driver bound whenever nothing better works
//! - [`DriverTable`]: drivers registered by class and name
//! - [`BackendRegistry`]: one binding per class, with dummy failover
//! - [`BackendIo`]: the lock-free surface a running driver talks to

pub mod error;
pub use error::{BackendError, Error, Result};

mod backend;
pub use backend::{Backend, BackendResult};

mod dummy;
pub use dummy::{DummyBackend, DUMMY_DRIVER};

mod io;
pub use io::BackendIo;

mod registry;
pub use registry::{
    BackendRegistry, DriverFactory, DriverTable, DISABLED_AUDIO_DRIVERS, DISABLED_MIDI_DRIVERS,
};

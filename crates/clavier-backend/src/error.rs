//! Error types for clavier-backend.

use clavier_midi::BackendClass;
use thiserror::Error;

/// Failure reported by a backend operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Device error: {0}")]
    Device(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Failed(String),
}

/// Error type for registry operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown {class} driver '{name}'")]
    UnknownDriver { class: BackendClass, name: String },

    #[error("{class} driver '{name}' is not enabled in this build")]
    DriverNotEnabled { class: BackendClass, name: String },

    #[error("{class} driver '{driver}' failed to initialize: {source}")]
    Initialize {
        class: BackendClass,
        driver: String,
        #[source]
        source: BackendError,
    },

    #[error("{class} backend: {source}")]
    Backend {
        class: BackendClass,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Core(#[from] clavier_core::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

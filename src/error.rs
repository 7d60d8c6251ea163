//! Centralized error type for the clavier umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] clavier_core::Error),

    #[error(transparent)]
    Backend(#[from] clavier_backend::Error),

    #[error("Audio subsystem is already initialized")]
    AlreadyInitialized,
}

impl Error {
    /// Whether the error came from a driver that could not be used, leaving
    /// the dummy bound in its place.
    pub fn is_driver_failure(&self) -> bool {
        matches!(
            self,
            Error::Backend(
                clavier_backend::Error::UnknownDriver { .. }
                    | clavier_backend::Error::DriverNotEnabled { .. }
                    | clavier_backend::Error::Initialize { .. }
            )
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

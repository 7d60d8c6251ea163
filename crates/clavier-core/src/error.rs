//! Error types for clavier-core.

use thiserror::Error;

/// Error type for clavier-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to spawn queue thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

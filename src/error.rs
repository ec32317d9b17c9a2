//! Error types for the kvadmin facade.
//!
//! Operations never fail at this level; they return
//! [`OperationReport`](crate::OperationReport)s. These errors cover setup:
//! loading configuration and building the pool.

use thiserror::Error;

/// Setup errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is missing or out of range
    #[error("configuration error: {0}")]
    Config(String),

    /// Config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML or has unknown fields
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Pool or transport rejected the configuration
    #[error(transparent)]
    Client(#[from] kvadmin_core::Error),
}

/// Result type for kvadmin setup.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error came from configuration values.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::Toml(_) | Error::Client(kvadmin_core::Error::Config(_))
        )
    }
}

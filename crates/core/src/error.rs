//! Error types for kvadmin.
//!
//! Every store-facing call returns [`Result`]. Nothing below the report
//! boundary swallows an error; the executor turns them into
//! [`OperationReport`](crate::OperationReport)s with status `Error`.

use std::time::Duration;

use thiserror::Error;

/// All errors a store interaction can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Connection refused, timed out, dropped, or TLS failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Command rejected by the store (wrong type, syntax error, ...)
    #[error("store error: {0}")]
    Store(String),

    /// Pool is at `max_total` and configured to fail fast
    #[error("connection pool exhausted ({max_total} connections in use)")]
    PoolExhausted {
        /// Configured pool capacity
        max_total: usize,
    },

    /// Waited `max_wait` for a connection without one becoming free
    #[error("timed out after {0:?} waiting for a pooled connection")]
    PoolTimeout(Duration),

    /// Pool has been closed
    #[error("connection pool is closed")]
    PoolClosed,

    /// Health check failed on a freshly created connection
    #[error("connection failed validation: {0}")]
    Validation(String),

    /// Scan guard tripped before the store returned the terminal cursor
    #[error("scan aborted after {iterations} page requests without reaching the terminal cursor")]
    ScanLimitExceeded {
        /// Number of page requests issued
        iterations: u64,
    },

    /// Caller supplied an argument the store would reject
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for kvadmin operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error came from the network layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Check if the store rejected a command.
    pub fn is_store(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// Check if this error came from the connection pool.
    pub fn is_pool(&self) -> bool {
        matches!(
            self,
            Error::PoolExhausted { .. } | Error::PoolTimeout(_) | Error::PoolClosed
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

use crate::driver::DriverError;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for `dbsession` operations
#[derive(Error, Debug)]
pub enum SessionError {
    /// Required connection field is empty
    #[error("missing required connection field: {field}")]
    Configuration {
        /// Name of the empty field
        field: &'static str,
    },

    /// An operation requiring a live connection ran while disconnected
    #[error("no active connection to {operation}")]
    NotConnected {
        /// The operation that was attempted
        operation: &'static str,
    },

    /// Failure surfaced by the underlying database driver
    #[error("{0}")]
    Driver(#[from] DriverError),

    /// File read failure in the auxiliary passthrough
    #[error("failed to read file {}: {source}", .path.display())]
    Io {
        /// The path that could not be read
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A result row did not match the caller's record type
    #[error("row decoding error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for `dbsession` operations
pub type Result<T> = std::result::Result<T, SessionError>;

//! Error types for miniresp
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RespError
pub type Result<T> = std::result::Result<T, RespError>;

/// Unified error type for miniresp operations
#[derive(Debug, Error)]
pub enum RespError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Connection error: {0}")]
    Connection(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    /// The server answered with an error frame (`-ERR ...`). The wire
    /// exchange itself completed; only the requested operation failed, so
    /// the connection stays usable.
    #[error("Server error: {0}")]
    Server(String),
}

impl RespError {
    /// Whether this error invalidates the connection it occurred on.
    ///
    /// Server error frames are well-formed replies; everything else means
    /// the stream can no longer be trusted and must be torn down.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RespError::Server(_))
    }
}

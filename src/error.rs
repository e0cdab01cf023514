//! Error types for cinema-db.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Main error type for connection lifecycle operations.
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection errors (host unreachable, auth failed, malformed target, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The process-wide handle was installed twice.
    #[error("Shared connection handle is already installed")]
    AlreadyInitialized,

    /// Internal errors (missing runtime, aborted task, unexpected states).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the bare failure description, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(msg) | Self::Internal(msg) => msg,
            Self::AlreadyInitialized => "shared connection handle is already installed",
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::AlreadyInitialized => "Initialization Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using DbError.
pub type Result<T> = std::result::Result<T, DbError>;

//! Error types for the workflow library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all workflow operations.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Catalog misconfiguration (unsupported phase/booking-kind combination)
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// Operation called on a sequencer in the wrong lifecycle state
    #[error("Invalid sequencer state: {reason}")]
    InvalidState { reason: String },
    /// Step transition that the state machine does not permit
    #[error("Invalid transition for step '{step}': {from} -> {to}")]
    InvalidTransition {
        step: String,
        from: &'static str,
        to: &'static str,
    },
    /// Step ID not present in the seeded catalog
    #[error("Unknown step '{id}'")]
    UnknownStep { id: String },
    /// The run already failed; no further transitions are allowed
    #[error("Run is terminal: step '{failed_step}' is in error")]
    TerminalState { failed_step: String },
    /// Intent-resolution service unreachable, timed out, or non-2xx
    #[error("Network error: {message}")]
    Network { message: String },
    /// Record store read or write failure
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Booking record not found for the given ID
    #[error("Booking '{id}' not found")]
    BookingNotFound { id: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Caller-requested cancellation, observed before a step activation
    #[error("cancelled")]
    Cancelled,
}

impl WorkflowError {
    /// Creates a configuration error with a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a network error with a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a persistence error with a message and source.
    pub fn persistence(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Persistence {
            message: message.into(),
            source,
        }
    }
}

/// Extension trait for record-store Results to attach a message while
/// converting into [`WorkflowError`].
pub trait StoreResultExt<T> {
    /// Map rusqlite errors with a message.
    fn store_context(self, message: &str) -> Result<T>;
}

impl<T> StoreResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn store_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WorkflowError::persistence(message, e))
    }
}

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

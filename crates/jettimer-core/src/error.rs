//! Core error types for jettimer-core.
//!
//! This module defines the error hierarchy using thiserror. Timer operations
//! report [`TimerError`]; storage and configuration report their own enums,
//! and [`CoreError`] aggregates everything for callers that don't care.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::RunState;

/// Core error type for jettimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer state machine errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the countdown/blink engines and the coordinator.
///
/// Every variant leaves the timer exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// There is nothing to count down from.
    #[error("Invalid duration: {millis} ms")]
    InvalidDuration { millis: u64 },

    /// An engine was started while its previous activation was still live.
    #[error("{engine} engine is already active")]
    DoubleActivation { engine: &'static str },

    /// The clock could not register a periodic callback.
    #[error("Failed to schedule periodic callback: {0}")]
    Scheduling(String),

    /// The operation is not defined for the current run state.
    #[error("Cannot {operation} while {state:?}")]
    InvalidState {
        operation: &'static str,
        state: RunState,
    },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Entry contains something other than ASCII digits
    #[error("Invalid duration entry '{input}': only digits are allowed")]
    NonDigit { input: String },

    /// Entry is longer than HHMMSS
    #[error("Invalid duration entry '{input}': at most {max} digits")]
    TooLong { input: String, max: usize },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseLocked => {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

//! Core error types for aurore-core.
//!
//! Storage failures are split into read and write variants because the
//! progress gate treats the two differently: a failed read means "flag
//! unmet", a failed write is reported back to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for aurore-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Form definition errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Sleep tracking errors
    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    /// A record looked up by id does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Reading a key failed
    #[error("Failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Writing a key failed
    #[error("Failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// A stored record could not be decoded
    #[error("Malformed record under '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded
    #[error("Failed to encode record for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Store is locked by another connection
    #[error("Store is locked")]
    Locked,

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
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

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Form definition errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A form needs at least one section
    #[error("Form has no sections")]
    EmptyForm,

    /// Question id repeated inside one section
    #[error("Duplicate question id '{id}' in section '{section}'")]
    DuplicateQuestion { section: String, id: String },

    /// Choice questions need options
    #[error("Question '{id}' is a choice question but has no options")]
    MissingOptions { id: String },

    /// Question id is blank
    #[error("Question in section '{section}' has an empty id")]
    EmptyQuestionId { section: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Sleep tracking errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingError {
    #[error("Sleep tracking already started at {since}")]
    AlreadyTracking { since: chrono::NaiveDateTime },

    #[error("Sleep tracking is not running")]
    NotTracking,

    #[error("Stop time {stop} is before start time {start}")]
    StopBeforeStart {
        start: chrono::NaiveDateTime,
        stop: chrono::NaiveDateTime,
    },
}

impl StorageError {
    pub(crate) fn read(key: &str, err: rusqlite::Error) -> Self {
        if is_locked(&err) {
            return StorageError::Locked;
        }
        StorageError::ReadFailed {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(key: &str, err: rusqlite::Error) -> Self {
        if is_locked(&err) {
            return StorageError::Locked;
        }
        StorageError::WriteFailed {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

fn is_locked(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => matches!(
            e.code,
            rusqlite::ErrorCode::DatabaseLocked | rusqlite::ErrorCode::DatabaseBusy
        ),
        _ => false,
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

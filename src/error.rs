//! Error types for persisted values
//!
//! Nothing here is recovered internally: every error reaches the caller of the
//! operation that triggered it (construction or a cycle).

use thiserror::Error;

/// Failure converting a value to or from its stored text
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

impl CodecError {
    pub fn custom(msg: impl Into<String>) -> Self {
        CodecError::Custom(msg.into())
    }
}

/// Failure reported by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage quota exceeded while writing key '{key}'")]
    QuotaExceeded { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store contents are corrupt: {0}")]
    Corrupt(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by a binding
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to decode stored value for key '{key}': {source}")]
    Deserialize {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("Failed to encode value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = PersistError> = std::result::Result<T, E>;

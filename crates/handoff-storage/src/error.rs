//! Error types for memory storage

use std::fmt;

use crate::types::Capability;

/// One rung of the degradation ladder that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub capability: Capability,
    pub reason: String,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.capability, self.reason)
    }
}

/// Errors produced by storage construction and writes
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend's engine could not be initialized
    #[error("{capability} backend unavailable: {reason}")]
    Construction {
        capability: Capability,
        reason: String,
    },

    #[error(
        "no storage backend available ({}); check that the full backend location is writable \
         and SQLite has FTS5, or point basic.location at a writable directory",
        format_failures(.failures)
    )]
    AllBackendsFailed { failures: Vec<BackendFailure> },

    #[error("failed to store memory {id}: {reason}")]
    Write { id: String, reason: String },

    #[error("invalid storage config: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn construction(capability: Capability, reason: impl fmt::Display) -> Self {
        StorageError::Construction {
            capability,
            reason: reason.to_string(),
        }
    }

    pub fn write(id: &str, reason: impl fmt::Display) -> Self {
        StorageError::Write {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn format_failures(failures: &[BackendFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

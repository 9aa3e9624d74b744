//! Error types for the handoff pipeline

use handoff_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    /// The memory could not be written; a handoff is never silently dropped
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type HandoffResult<T> = std::result::Result<T, HandoffError>;

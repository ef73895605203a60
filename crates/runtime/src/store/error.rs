//! Error types raised by document store implementations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("write to {collection}/{id} lost a concurrent update")]
    Conflict { collection: String, id: String },

    #[error("document store lock was poisoned")]
    LockPoisoned,

    #[error("invalid document id {0:?}")]
    InvalidId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

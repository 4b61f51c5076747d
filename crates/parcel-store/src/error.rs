use crate::entity::EntityType;

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record was decoded as the wrong entity type.
    #[error("entity mismatch: expected {expected}, found {actual}")]
    EntityMismatch {
        expected: EntityType,
        actual: EntityType,
    },

    /// A record with an empty id was offered for storage.
    #[error("cannot store {0} record with empty id")]
    EmptyId(EntityType),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record on disk could not be decoded.
    #[error("corrupt record at {path}: {reason}")]
    CorruptRecord { path: String, reason: String },

    /// Another thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

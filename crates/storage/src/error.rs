use uuid::Uuid;

/// All errors that can be returned by a TextStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No record with the given id.
    #[error("text not found: {id}")]
    NotFound { id: Uuid },

    /// A uniqueness constraint on `field` was violated.
    #[error("duplicate value for {field}")]
    Duplicate { field: String },

    /// A backend-specific storage error (connection, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}

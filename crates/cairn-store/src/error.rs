use cairn_types::Etag;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(Etag),

    /// The body supplied with a write does not hash to its key, or data
    /// read back does not hash to the key it was stored under.
    #[error("content hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch { expected: Etag, computed: Etag },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote backend failure (network, permission, service error).
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

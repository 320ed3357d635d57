use cairn_types::Etag;

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A chunk exceeded the configured maximum size. Detected before any
    /// store I/O; the caller should surface this as an invalid argument.
    #[error("chunk size {actual} bytes exceeds configured maximum {limit} bytes")]
    ChunkTooLarge { limit: usize, actual: usize },

    /// The requested identifier is absent from the backing store.
    #[error("object not found: {0}")]
    NotFound(Etag),

    /// Backing store failure. Surfaced to callers as an internal error.
    #[error("store error: {0}")]
    Store(#[from] cairn_store::StoreError),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

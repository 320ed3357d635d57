use bytes::Bytes;
use cairn_types::Etag;

use crate::error::StoreResult;

/// Durable key-value blob store keyed by content identifier.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. Content-addressing guarantees this:
///   the key fully determines the content.
/// - A write verifies the body against the key before persisting, so
///   transport corruption between engine and store cannot go unnoticed.
/// - Concurrent reads are always safe (objects are immutable).
/// - All I/O errors are propagated, never silently ignored.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Check whether an object exists under the given identifier.
    async fn exists(&self, etag: &Etag) -> StoreResult<bool>;

    /// Read an object by identifier.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or detected corruption.
    async fn get(&self, etag: &Etag) -> StoreResult<Option<Bytes>>;

    /// Write an object under the given identifier.
    ///
    /// The identifier is the content hash of `data`; implementations verify
    /// this before persisting. Writing an already-present object is a no-op.
    async fn put(&self, etag: &Etag, data: Bytes) -> StoreResult<()>;
}

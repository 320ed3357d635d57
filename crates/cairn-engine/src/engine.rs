use std::sync::Arc;

use bytes::Bytes;
use cairn_store::ObjectStore;
use cairn_types::Etag;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::manifest::{manifest_etag, ManifestIndex};

/// The chunked store engine.
///
/// Owns the manifest index and fronts the backing object store. One engine
/// instance serves all sessions; per-session state (the accumulated chunk
/// etag sequence of an in-flight put) lives with the caller.
///
/// Chunk writes are dispatched synchronously within the scope of handling
/// one chunk; the engine performs no retries and no compensating deletes
/// when a put session is aborted mid-sequence. Orphaned chunks are harmless:
/// the store is content-addressed, so a later object with identical content
/// reuses them.
pub struct ChunkEngine {
    store: Arc<dyn ObjectStore>,
    manifests: ManifestIndex,
    chunk_size_bytes: usize,
}

impl ChunkEngine {
    /// Create an engine over the given backing store.
    pub fn new(store: Arc<dyn ObjectStore>, chunk_size_bytes: usize) -> Self {
        Self {
            store,
            manifests: ManifestIndex::new(),
            chunk_size_bytes,
        }
    }

    /// The configured per-chunk size limit in bytes.
    pub fn chunk_size_bytes(&self) -> usize {
        self.chunk_size_bytes
    }

    /// Store one chunk of an in-flight put and return its etag.
    ///
    /// The size limit is enforced before any store access, so a misbehaving
    /// client cannot push oversized data into the backing store. If a chunk
    /// with identical content is already present, the upload is skipped and
    /// the existing etag returned.
    pub async fn put_chunk(&self, data: Bytes) -> EngineResult<Etag> {
        if data.len() > self.chunk_size_bytes {
            return Err(EngineError::ChunkTooLarge {
                limit: self.chunk_size_bytes,
                actual: data.len(),
            });
        }

        let etag = Etag::from_content(&data);
        if self.store.exists(&etag).await? {
            debug!(%etag, size = data.len(), "chunk already present, skipping upload");
            return Ok(etag);
        }
        self.store.put(&etag, data).await?;
        Ok(etag)
    }

    /// Complete a put session and return the manifest etag.
    ///
    /// `chunks` must be in arrival order, which equals original byte order;
    /// callers must not reorder. Idempotent: re-submitting an identical
    /// sequence yields the identical etag and overwrites the index entry
    /// with an identical value. An empty sequence is valid and addresses an
    /// empty object.
    pub fn finish_put(&self, chunks: Vec<Etag>) -> Etag {
        let manifest = manifest_etag(&chunks);
        debug!(%manifest, chunk_count = chunks.len(), "manifest recorded");
        self.manifests.insert(manifest, chunks);
        manifest
    }

    /// Resolve a manifest etag to its ordered chunk etag sequence.
    ///
    /// An unknown manifest yields an empty sequence; callers that must
    /// distinguish "unknown" from "empty object" check
    /// [`manifest_exists`](Self::manifest_exists) first.
    pub fn start_get(&self, manifest: &Etag) -> Vec<Etag> {
        self.manifests.get(manifest).unwrap_or_default()
    }

    /// Whether a manifest is known to the index.
    pub fn manifest_exists(&self, manifest: &Etag) -> bool {
        self.manifests.contains(manifest)
    }

    /// Read one chunk's bytes from the backing store.
    pub async fn get_chunk(&self, etag: &Etag) -> EngineResult<Bytes> {
        match self.store.get(etag).await? {
            Some(data) => Ok(data),
            None => Err(EngineError::NotFound(*etag)),
        }
    }

    /// Store a complete object in one call, without manifest indirection.
    ///
    /// Uses the same content addresser and the same exists-then-write dedup
    /// as the chunked path. No size limit applies here; bounding transfers
    /// is what the chunked path is for.
    pub async fn put_object(&self, data: Bytes) -> EngineResult<Etag> {
        let etag = Etag::from_content(&data);
        if self.store.exists(&etag).await? {
            debug!(%etag, size = data.len(), "object already present, skipping upload");
            return Ok(etag);
        }
        self.store.put(&etag, data).await?;
        Ok(etag)
    }

    /// Read a complete object by etag.
    pub async fn get_object(&self, etag: &Etag) -> EngineResult<Bytes> {
        self.get_chunk(etag).await
    }
}

impl std::fmt::Debug for ChunkEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkEngine")
            .field("chunk_size_bytes", &self.chunk_size_bytes)
            .field("manifests", &self.manifests)
            .finish()
    }
}

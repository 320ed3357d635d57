//! Manifest addressing and the manifest index.

use std::collections::HashMap;
use std::sync::RwLock;

use cairn_types::Etag;

/// Compute the identifier of a manifest from its ordered chunk sequence.
///
/// The canonical serialization is the newline-joined hex rendering of the
/// chunk etags, in arrival order. Deterministic: the same sequence always
/// yields the same manifest etag. An empty sequence is valid and addresses
/// the empty object.
pub fn manifest_etag(chunks: &[Etag]) -> Etag {
    let joined = chunks
        .iter()
        .map(Etag::to_hex)
        .collect::<Vec<_>>()
        .join("\n");
    Etag::from_content(joined.as_bytes())
}

/// In-memory mapping from manifest etag to its ordered chunk etag sequence.
///
/// Mutated only when a put completes, read when a get starts. Entries are
/// idempotent: re-inserting a manifest overwrites it with an identical
/// value. Lifetime is process-wide; chunk blobs outlive the index across
/// restarts.
pub struct ManifestIndex {
    entries: RwLock<HashMap<Etag, Vec<Etag>>>,
}

impl ManifestIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a manifest entry. Idempotent overwrite.
    pub fn insert(&self, manifest: Etag, chunks: Vec<Etag>) {
        let mut map = self.entries.write().expect("lock poisoned");
        map.insert(manifest, chunks);
    }

    /// Look up the chunk sequence for a manifest.
    pub fn get(&self, manifest: &Etag) -> Option<Vec<Etag>> {
        let map = self.entries.read().expect("lock poisoned");
        map.get(manifest).cloned()
    }

    /// Whether the index holds an entry for this manifest.
    pub fn contains(&self, manifest: &Etag) -> bool {
        let map = self.entries.read().expect("lock poisoned");
        map.contains_key(manifest)
    }

    /// Number of manifests currently indexed.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no manifests are indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }
}

impl Default for ManifestIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ManifestIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestIndex")
            .field("manifest_count", &self.len())
            .finish()
    }
}

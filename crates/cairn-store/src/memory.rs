use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use bytes::Bytes;
use cairn_types::Etag;

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind a
/// `RwLock` for safe concurrent access. The store counts accepted writes so
/// callers can observe deduplication behavior.
pub struct MemoryStore {
    objects: RwLock<HashMap<Etag, Bytes>>,
    puts: AtomicUsize,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            puts: AtomicUsize::new(0),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Number of `put` calls accepted since creation.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::Relaxed)
    }

    /// Remove all objects from the store.
    pub fn clear(&self) {
        self.objects.write().expect("lock poisoned").clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    async fn exists(&self, etag: &Etag) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(etag))
    }

    async fn get(&self, etag: &Etag) -> StoreResult<Option<Bytes>> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.get(etag).cloned())
    }

    async fn put(&self, etag: &Etag, data: Bytes) -> StoreResult<()> {
        let computed = Etag::from_content(&data);
        if computed != *etag {
            return Err(StoreError::HashMismatch {
                expected: *etag,
                computed,
            });
        }
        self.puts.fetch_add(1, Ordering::Relaxed);
        let mut map = self.objects.write().expect("lock poisoned");
        // Idempotent: an existing entry already holds the identical content.
        map.entry(*etag).or_insert(data);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("object_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_and_get() {
        let store = MemoryStore::new();
        let data = Bytes::from_static(b"hello world");
        let etag = Etag::from_content(&data);

        store.put(&etag, data.clone()).await.unwrap();
        let read_back = store.get(&etag).await.unwrap().expect("should exist");
        assert_eq!(read_back, data);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = MemoryStore::new();
        let etag = Etag::from_content(b"missing");
        assert!(store.get(&etag).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn exists_true_false() {
        let store = MemoryStore::new();
        let data = Bytes::from_static(b"present");
        let etag = Etag::from_content(&data);

        assert!(!store.exists(&etag).await.unwrap());
        store.put(&etag, data).await.unwrap();
        assert!(store.exists(&etag).await.unwrap());
    }

    #[tokio::test]
    async fn put_rejects_mismatched_body() {
        let store = MemoryStore::new();
        let etag = Etag::from_content(b"expected content");
        let err = store
            .put(&etag, Bytes::from_static(b"other content"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn put_is_idempotent() {
        let store = MemoryStore::new();
        let data = Bytes::from_static(b"idempotent");
        let etag = Etag::from_content(&data);

        store.put(&etag, data.clone()).await.unwrap();
        store.put(&etag, data).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.put_count(), 2);
    }

    #[tokio::test]
    async fn len_and_total_bytes() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        let a = Bytes::from_static(b"12345");
        let b = Bytes::from_static(b"123456789");
        store.put(&Etag::from_content(&a), a).await.unwrap();
        store.put(&Etag::from_content(&b), b).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_bytes(), 14);
    }

    #[tokio::test]
    async fn clear_removes_all() {
        let store = MemoryStore::new();
        let data = Bytes::from_static(b"a");
        store.put(&Etag::from_content(&data), data).await.unwrap();
        store.clear();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn concurrent_reads_are_safe() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let data = Bytes::from_static(b"shared data");
        let etag = Etag::from_content(&data);
        store.put(&etag, data).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let result = store.get(&etag).await.unwrap();
                    assert!(result.is_some());
                })
            })
            .collect();

        for h in handles {
            h.await.expect("task should not panic");
        }
    }

    #[tokio::test]
    async fn debug_format() {
        let store = MemoryStore::new();
        let debug = format!("{store:?}");
        assert!(debug.contains("MemoryStore"));
        assert!(debug.contains("object_count"));
    }
}

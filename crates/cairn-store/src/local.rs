//! Local filesystem object store.
//!
//! Stores one file per object with a 2-level fan-out directory structure:
//! `{root}/{hex[0..2]}/{hex[2..4]}/{hex}`.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use cairn_types::Etag;
use tracing::{debug, error};

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// File-backed object store with a 2-level fan-out directory layout.
///
/// Each object is stored as a file at
/// `{root}/{hex(etag)[0..2]}/{hex(etag)[2..4]}/{hex(etag)}`.
///
/// Writes are atomic: data is written to a temporary file first, then
/// renamed into place, so a crashed write never leaves a partial object
/// under its final name.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, etag: &Etag) -> PathBuf {
        let hex = etag.to_hex();
        self.root.join(&hex[0..2]).join(&hex[2..4]).join(&hex)
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalStore {
    async fn exists(&self, etag: &Etag) -> StoreResult<bool> {
        let path = self.object_path(etag);
        match tokio::fs::metadata(&path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn get(&self, etag: &Etag) -> StoreResult<Option<Bytes>> {
        let path = self.object_path(etag);
        match tokio::fs::read(&path).await {
            Ok(data) => {
                // Verify-on-read: re-hash and compare to the key. A corrupt
                // object is surfaced as an error, not returned to the caller.
                let computed = Etag::from_content(&data);
                if computed != *etag {
                    error!(expected = %etag, computed = %computed, "object corruption detected on read");
                    return Err(StoreError::HashMismatch {
                        expected: *etag,
                        computed,
                    });
                }
                Ok(Some(Bytes::from(data)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn put(&self, etag: &Etag, data: Bytes) -> StoreResult<()> {
        let computed = Etag::from_content(&data);
        if computed != *etag {
            return Err(StoreError::HashMismatch {
                expected: *etag,
                computed,
            });
        }

        let path = self.object_path(etag);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Atomic write: temp file in the same directory, then rename.
        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, &data).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        debug!(%etag, path = %path.display(), size = data.len(), "stored object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_store() -> (LocalStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn put_get_roundtrip() {
        let (store, _dir) = make_store();
        let data = Bytes::from_static(b"hello local object");
        let etag = Etag::from_content(&data);

        store.put(&etag, data.clone()).await.unwrap();
        let result = store.get(&etag).await.unwrap();
        assert_eq!(result, Some(data));
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let (store, _dir) = make_store();
        let etag = Etag::from_content(b"not stored");
        assert_eq!(store.get(&etag).await.unwrap(), None);
    }

    #[tokio::test]
    async fn exists_true_false() {
        let (store, _dir) = make_store();
        let data = Bytes::from_static(b"exists on disk");
        let etag = Etag::from_content(&data);

        assert!(!store.exists(&etag).await.unwrap());
        store.put(&etag, data).await.unwrap();
        assert!(store.exists(&etag).await.unwrap());
    }

    #[tokio::test]
    async fn put_rejects_mismatched_body() {
        let (store, _dir) = make_store();
        let etag = Etag::from_content(b"expected");
        let err = store
            .put(&etag, Bytes::from_static(b"actual"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { .. }));
        assert!(!store.exists(&etag).await.unwrap());
    }

    #[tokio::test]
    async fn fanout_directory_structure() {
        let (store, dir) = make_store();
        let data = Bytes::from_static(b"fanout test data");
        let etag = Etag::from_content(&data);

        store.put(&etag, data.clone()).await.unwrap();

        let hex = etag.to_hex();
        let expected_path = dir.path().join(&hex[0..2]).join(&hex[2..4]).join(&hex);
        assert!(
            expected_path.exists(),
            "object file should exist at fan-out path: {}",
            expected_path.display()
        );
        assert_eq!(std::fs::read(&expected_path).unwrap(), data.as_ref());
    }

    #[tokio::test]
    async fn get_corrupted_object_returns_error() {
        let (store, _dir) = make_store();
        let data = Bytes::from_static(b"data to corrupt on disk");
        let etag = Etag::from_content(&data);

        store.put(&etag, data).await.unwrap();

        let path = store.object_path(&etag);
        tokio::fs::write(&path, b"corrupted!").await.unwrap();

        let result = store.get(&etag).await;
        assert!(
            matches!(result, Err(StoreError::HashMismatch { .. })),
            "expected HashMismatch error, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn atomic_write_leaves_no_tmp_file() {
        let (store, dir) = make_store();
        let data = Bytes::from_static(b"atomic write test");
        let etag = Etag::from_content(&data);

        store.put(&etag, data).await.unwrap();

        let hex = etag.to_hex();
        let tmp_path = dir
            .path()
            .join(&hex[0..2])
            .join(&hex[2..4])
            .join(format!("{hex}.tmp"));
        assert!(
            !tmp_path.exists(),
            "temp file should not remain after write: {}",
            tmp_path.display()
        );
    }

    #[tokio::test]
    async fn rewrite_of_existing_object_is_ok() {
        let (store, _dir) = make_store();
        let data = Bytes::from_static(b"written twice");
        let etag = Etag::from_content(&data);

        store.put(&etag, data.clone()).await.unwrap();
        store.put(&etag, data.clone()).await.unwrap();
        assert_eq!(store.get(&etag).await.unwrap(), Some(data));
    }
}

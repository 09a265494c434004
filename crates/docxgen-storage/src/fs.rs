//! Local filesystem blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::store::{BlobStore, StorageError, StoredBlob, join_url, validate_key};

/// Writes documents below a root directory.
///
/// URLs use `public_base_url` when set (e.g. a static file server in front
/// of the directory), otherwise a `file://` URL of the written file.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl FsBlobStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base_url: None,
        }
    }

    /// Serve stored objects from `base_url` instead of `file://` URLs.
    #[must_use]
    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = Some(base_url.into());
        self
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_for(&self, key: &str, path: &Path) -> String {
        match &self.public_base_url {
            Some(base) => join_url(base, key),
            None => format!("file://{}", path.display()),
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredBlob, StorageError> {
        validate_key(key)?;

        let path = self.root.join(key);
        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&path, body).await.map_err(io_err)?;

        tracing::debug!(path = %path.display(), "Stored");

        Ok(StoredBlob {
            key: key.to_owned(),
            url: self.url_for(key, &path),
        })
    }

    fn backend(&self) -> &'static str {
        "fs"
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_put_writes_file() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        let blob = store
            .put("docs/id/a.docx", b"PK".to_vec(), "application/octet-stream")
            .await
            .unwrap();

        let path = dir.path().join("docs/id/a.docx");
        assert_eq!(std::fs::read(&path).unwrap(), b"PK");
        assert_eq!(blob.key, "docs/id/a.docx");
        assert_eq!(blob.url, format!("file://{}", path.display()));
    }

    #[tokio::test]
    async fn test_put_uses_public_base_url() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path()).with_public_base_url("http://localhost:8080/files");

        let blob = store
            .put("id/my doc.docx", Vec::new(), "application/octet-stream")
            .await
            .unwrap();

        assert_eq!(blob.url, "http://localhost:8080/files/id/my%20doc.docx");
    }

    #[tokio::test]
    async fn test_put_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        let result = store.put("../escape.docx", Vec::new(), "x").await;

        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}

//! In-memory blob store for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::store::{BlobStore, StorageError, StoredBlob, join_url, validate_key};

/// Object held by [`MemoryBlobStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Blob store that keeps objects in memory.
///
/// Can be configured to fail every upload to exercise error paths.
#[derive(Debug)]
pub struct MemoryBlobStore {
    base_url: String,
    objects: RwLock<HashMap<String, MemoryObject>>,
    failure: Option<String>,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self {
            base_url: "https://blob.test".to_owned(),
            objects: RwLock::new(HashMap::new()),
            failure: None,
        }
    }
}

impl MemoryBlobStore {
    /// Create an empty store serving from `https://blob.test`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `put` fail with an S3 error carrying `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Fetch a stored object.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<MemoryObject> {
        self.objects.read().unwrap().get(key).cloned()
    }

    /// Keys of all stored objects, sorted.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredBlob, StorageError> {
        if let Some(message) = &self.failure {
            return Err(StorageError::S3(message.clone()));
        }
        validate_key(key)?;

        self.objects.write().unwrap().insert(
            key.to_owned(),
            MemoryObject {
                body,
                content_type: content_type.to_owned(),
            },
        );

        Ok(StoredBlob {
            key: key.to_owned(),
            url: join_url(&self.base_url, key),
        })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

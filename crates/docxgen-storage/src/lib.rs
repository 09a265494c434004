//! Blob storage for generated documents.
//!
//! This crate provides a [`BlobStore`] trait with a single `put` operation
//! that stores a payload under a key and returns a URL for it. Object
//! retention, versioning and deletion are left to the backend.
//!
//! # Backends
//!
//! - [`S3BlobStore`]: AWS S3 or any S3-compatible service
//! - [`FsBlobStore`]: local directory, for running without cloud credentials
//! - [`MemoryBlobStore`]: in-memory, for tests (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use docxgen_storage::{BlobStore, FsBlobStore, object_key};
//!
//! let store = FsBlobStore::new("blobs");
//! let key = object_key(Some("documents"), &[&id, "report.docx"]);
//! let blob = store.put(&key, bytes, "application/octet-stream").await?;
//! println!("{}", blob.url);
//! ```

mod fs;
#[cfg(any(test, feature = "mock"))]
mod memory;
mod s3;
mod store;

pub use fs::FsBlobStore;
#[cfg(any(test, feature = "mock"))]
pub use memory::{MemoryBlobStore, MemoryObject};
pub use s3::{S3BlobStore, S3Config};
pub use store::{BlobStore, StorageError, StoredBlob, join_url, object_key};

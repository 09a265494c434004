//! Blob store trait and error types.
//!
//! Keys are `/`-separated object names (e.g. `documents/<id>/report.docx`).
//! Backends map them to their own addressing and return a URL under which
//! the stored object can be fetched.

use std::error::Error;
use std::path::PathBuf;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped in a URL path segment (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Result of a successful upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredBlob {
    /// Object key as stored.
    pub key: String,
    /// URL for retrieving the object.
    pub url: String,
}

/// Storage error.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Key is empty or escapes the store root.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    /// Filesystem error.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// S3 request failed.
    #[error("S3 error: {0}")]
    S3(String),
}

/// Write-only object storage for generated documents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `body` under `key` and return its URL.
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredBlob, StorageError>;

    /// Backend identifier for logging (e.g. "s3", "fs").
    fn backend(&self) -> &'static str;
}

/// Build an object key from an optional prefix and path segments.
///
/// Empty segments and surrounding slashes are dropped.
///
/// # Examples
///
/// ```
/// use docxgen_storage::object_key;
///
/// assert_eq!(object_key(Some("docs/"), &["abc", "a.docx"]), "docs/abc/a.docx");
/// assert_eq!(object_key(None, &["abc", "a.docx"]), "abc/a.docx");
/// ```
pub fn object_key(prefix: Option<&str>, segments: &[&str]) -> String {
    prefix
        .into_iter()
        .chain(segments.iter().copied())
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a base URL and an object key, percent-encoding each key segment.
pub fn join_url(base: &str, key: &str) -> String {
    let encoded = key
        .split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{encoded}", base.trim_end_matches('/'))
}

/// Reject empty keys and keys with `.`/`..` segments.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(StorageError::InvalidKey(key.to_owned()));
    }
    Ok(())
}

/// Walk the error source chain and join all messages.
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut msgs = vec![err.to_string()];
    let mut source = err.source();
    while let Some(s) = source {
        msgs.push(s.to_string());
        source = s.source();
    }
    msgs.join(": ")
}

//! Generated document file and its delivery to blob storage.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use docxgen_convert::DOCX_MIME_TYPE;
use docxgen_storage::{BlobStore, StorageError, object_key};
use regex::Regex;
use uuid::Uuid;

/// Trailing extension of a requested filename.
static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[^/\\.]+$").expect("invalid extension regex"));

/// A serialized document awaiting upload.
#[derive(Debug)]
pub(crate) struct OutputFile {
    /// Generated identifier.
    pub(crate) id: Uuid,
    /// Derived `.docx` filename.
    pub(crate) filename: String,
    /// DOCX payload.
    pub(crate) bytes: Vec<u8>,
    /// Creation time.
    pub(crate) created_at: DateTime<Utc>,
}

/// A document after upload.
#[derive(Debug)]
pub(crate) struct UploadedFile {
    pub(crate) id: Uuid,
    pub(crate) filename: String,
    pub(crate) size: usize,
    pub(crate) created_at: DateTime<Utc>,
    /// URL assigned by the blob store.
    pub(crate) url: String,
}

impl OutputFile {
    /// Wrap `bytes` with a fresh id and a filename derived from `requested`.
    pub(crate) fn new(requested: Option<&str>, bytes: Vec<u8>) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            filename: derive_filename(requested, id),
            bytes,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Object key: `[prefix/]<id>/<filename>`.
    pub(crate) fn storage_key(&self, prefix: Option<&str>) -> String {
        object_key(prefix, &[&self.id.to_string(), &self.filename])
    }

    /// Upload the payload and return the file with its URL.
    pub(crate) async fn upload(
        self,
        store: &dyn BlobStore,
        prefix: Option<&str>,
    ) -> Result<UploadedFile, StorageError> {
        let key = self.storage_key(prefix);
        let size = self.size();
        let blob = store.put(&key, self.bytes, DOCX_MIME_TYPE).await?;
        Ok(UploadedFile {
            id: self.id,
            filename: self.filename,
            size,
            created_at: self.created_at,
            url: blob.url,
        })
    }
}

/// Derive the output filename.
///
/// The requested name is trimmed, the extension of its last path segment is
/// dropped, path separators become `_` and `.docx` is appended. Without a usable name the
/// result is `document-<id>.docx`.
pub(crate) fn derive_filename(requested: Option<&str>, id: Uuid) -> String {
    let stem = requested
        .map(|name| EXTENSION.replace(name.trim(), "").replace(['/', '\\'], "_"))
        .filter(|stem| !stem.trim().is_empty());

    match stem {
        Some(stem) => format!("{stem}.docx"),
        None => format!("document-{id}.docx"),
    }
}

#[cfg(test)]
mod tests {
    use docxgen_storage::MemoryBlobStore;

    use super::*;

    fn id() -> Uuid {
        Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
    }

    #[test]
    fn test_derive_filename_strips_extension() {
        assert_eq!(derive_filename(Some("report.txt"), id()), "report.docx");
        assert_eq!(derive_filename(Some("report.docx"), id()), "report.docx");
        assert_eq!(derive_filename(Some("v1.2.final.md"), id()), "v1.2.final.docx");
    }

    #[test]
    fn test_derive_filename_without_extension() {
        assert_eq!(derive_filename(Some("notes"), id()), "notes.docx");
    }

    #[test]
    fn test_derive_filename_default() {
        let expected = "document-67e55044-10b1-426f-9247-bb680e5fe0c8.docx";
        assert_eq!(derive_filename(None, id()), expected);
        assert_eq!(derive_filename(Some(""), id()), expected);
        assert_eq!(derive_filename(Some("   "), id()), expected);
        assert_eq!(derive_filename(Some(".docx"), id()), expected);
    }

    #[test]
    fn test_derive_filename_replaces_separators() {
        assert_eq!(derive_filename(Some("dir/report.md"), id()), "dir_report.docx");
        assert_eq!(derive_filename(Some("a\\b.txt"), id()), "a_b.docx");
    }

    #[test]
    fn test_derive_filename_keeps_dotted_directories() {
        assert_eq!(
            derive_filename(Some("reports.2024/summary"), id()),
            "reports.2024_summary.docx"
        );
        assert_eq!(
            derive_filename(Some("reports.2024\\summary.md"), id()),
            "reports.2024_summary.docx"
        );
    }

    #[test]
    fn test_storage_key() {
        let mut file = OutputFile::new(Some("report"), vec![1, 2, 3]);
        file.id = id();
        assert_eq!(
            file.storage_key(Some("documents")),
            "documents/67e55044-10b1-426f-9247-bb680e5fe0c8/report.docx"
        );
        assert_eq!(file.size(), 3);
    }

    #[tokio::test]
    async fn test_upload_assigns_url() {
        let store = MemoryBlobStore::new();
        let file = OutputFile::new(Some("report"), vec![1, 2, 3]);
        let key = file.storage_key(None);

        let uploaded = file.upload(&store, None).await.unwrap();

        assert_eq!(uploaded.url, format!("https://blob.test/{key}"));
        assert_eq!(uploaded.size, 3);
        assert_eq!(uploaded.filename, "report.docx");
        let object = store.get(&key).unwrap();
        assert_eq!(object.content_type, DOCX_MIME_TYPE);
    }
}

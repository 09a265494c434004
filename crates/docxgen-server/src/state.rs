//! Application state.
//!
//! Shared, read-only state for all request handlers.

use std::sync::Arc;

use docxgen_storage::BlobStore;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Destination for generated documents.
    pub(crate) store: Arc<dyn BlobStore>,
    /// Key prefix for uploaded documents.
    pub(crate) key_prefix: Option<String>,
    /// Include error details in 500 responses (development only).
    pub(crate) expose_error_details: bool,
}

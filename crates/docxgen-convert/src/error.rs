//! Conversion error type.

/// Error produced while serializing a document.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The document package could not be written.
    #[error("Failed to pack DOCX: {0}")]
    Pack(String),
}

//! Markdown and plain text to DOCX conversion.
//!
//! The pipeline is linear and stateless:
//!
//! ```text
//! text ──► tokenize ──► build ──► to_docx ──► bytes
//!            │            │
//!            │            └─► split (inline spans)
//!            └─► pulldown-cmark
//! ```
//!
//! Plain input skips tokenization and goes through [`build_plain`].
//!
//! # Example
//!
//! ```
//! use docxgen_convert::{InputFormat, convert};
//!
//! let doc = convert("# Hello\n\n**Bold** text", InputFormat::Markdown);
//! assert_eq!(doc.paragraphs()[0].text(), "Hello");
//! let bytes = docxgen_convert::to_docx(&doc).unwrap();
//! assert!(bytes.starts_with(b"PK"));
//! ```

mod builder;
mod docx;
mod error;
mod inline;
mod model;
mod token;
mod util;

use std::fmt;
use std::str::FromStr;

pub use builder::{BULLET, RULE_LINE, build, build_plain};
pub use docx::{DOCX_MIME_TYPE, to_docx};
pub use error::ConvertError;
pub use inline::{InlineSpan, split};
pub use model::{BodyParagraph, DocumentModel, MAX_HEADING_LEVEL, ParagraphNode, ParagraphStyle};
pub use token::{BlockToken, tokenize};

/// How input text is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// Markdown blocks and inline spans.
    #[default]
    Markdown,
    /// One paragraph per line with heading heuristics.
    Plain,
}

impl FromStr for InputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(Self::Markdown),
            "plain" => Ok(Self::Plain),
            other => Err(UnknownFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => f.write_str("markdown"),
            Self::Plain => f.write_str("plain"),
        }
    }
}

/// Input format name that is neither `markdown` nor `plain`.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown format \"{0}\", expected \"markdown\" or \"plain\"")]
pub struct UnknownFormat(pub String);

/// Build the document model for `text` in the given format.
pub fn convert(text: &str, format: InputFormat) -> DocumentModel {
    match format {
        InputFormat::Markdown => build(&tokenize(text)),
        InputFormat::Plain => build_plain(text),
    }
}

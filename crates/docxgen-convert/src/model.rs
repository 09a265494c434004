//! Document model shared by the builders and the DOCX serializer.
//!
//! The model is a flat, ordered list of paragraphs. Sequence order is
//! reading order and is preserved end-to-end.

use crate::inline::InlineSpan;

/// Deepest heading level supported by the document styles.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Visual flags applied to a whole body paragraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParagraphStyle {
    /// Indentation level (each level is one tab stop).
    pub indent: u8,
    /// Render every run in italics (blockquotes).
    pub italic: bool,
    /// Render every run in a monospace font.
    pub monospace: bool,
    /// Shade the paragraph background.
    pub shaded: bool,
}

impl ParagraphStyle {
    /// Style for one line of a code block.
    #[must_use]
    pub fn code() -> Self {
        Self {
            monospace: true,
            shaded: true,
            ..Self::default()
        }
    }

    /// Style for a blockquote paragraph.
    #[must_use]
    pub fn quote() -> Self {
        Self {
            indent: 1,
            italic: true,
            ..Self::default()
        }
    }

    /// Style for a list item paragraph.
    #[must_use]
    pub fn list_item() -> Self {
        Self {
            indent: 1,
            ..Self::default()
        }
    }
}

/// A body paragraph: styled runs plus paragraph-wide flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodyParagraph {
    /// Ordered text runs.
    pub runs: Vec<InlineSpan>,
    /// Paragraph-wide style flags.
    pub style: ParagraphStyle,
}

impl BodyParagraph {
    /// Paragraph with a single plain run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![InlineSpan::Plain(text.into())],
            style: ParagraphStyle::default(),
        }
    }

    /// Paragraph with no runs, used as vertical spacing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_style(mut self, style: ParagraphStyle) -> Self {
        self.style = style;
        self
    }

    /// Concatenated run text without formatting.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(InlineSpan::text).collect()
    }
}

/// One paragraph of the output document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParagraphNode {
    /// Heading paragraph with plain text.
    Heading {
        /// Heading level (1-6).
        level: u8,
        /// Heading text.
        text: String,
    },
    /// Body paragraph.
    Body(BodyParagraph),
}

impl ParagraphNode {
    /// Heading at `level`, falling back to level 1 outside 1-6.
    #[must_use]
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        let level = if (1..=MAX_HEADING_LEVEL).contains(&level) {
            level
        } else {
            1
        };
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    /// Plain text content of the paragraph.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Heading { text, .. } => text.clone(),
            Self::Body(body) => body.text(),
        }
    }
}

impl From<BodyParagraph> for ParagraphNode {
    fn from(body: BodyParagraph) -> Self {
        Self::Body(body)
    }
}

/// Ordered paragraphs making up a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentModel {
    paragraphs: Vec<ParagraphNode>,
}

impl DocumentModel {
    #[must_use]
    pub fn new(paragraphs: Vec<ParagraphNode>) -> Self {
        Self { paragraphs }
    }

    #[must_use]
    pub fn paragraphs(&self) -> &[ParagraphNode] {
        &self.paragraphs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub(crate) fn push(&mut self, paragraph: impl Into<ParagraphNode>) {
        self.paragraphs.push(paragraph.into());
    }
}

impl IntoIterator for DocumentModel {
    type Item = ParagraphNode;
    type IntoIter = std::vec::IntoIter<ParagraphNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.paragraphs.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocumentModel {
    type Item = &'a ParagraphNode;
    type IntoIter = std::slice::Iter<'a, ParagraphNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.paragraphs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_keeps_supported_level() {
        assert_eq!(
            ParagraphNode::heading(3, "Title"),
            ParagraphNode::Heading {
                level: 3,
                text: "Title".to_owned()
            }
        );
    }

    #[test]
    fn test_heading_out_of_range_falls_back_to_level_one() {
        for level in [0, 7, 42] {
            let ParagraphNode::Heading { level, .. } = ParagraphNode::heading(level, "x") else {
                panic!("expected heading");
            };
            assert_eq!(level, 1);
        }
    }

    #[test]
    fn test_body_text_concatenates_runs() {
        let body = BodyParagraph {
            runs: vec![
                InlineSpan::Plain("a ".to_owned()),
                InlineSpan::Bold("b".to_owned()),
            ],
            style: ParagraphStyle::default(),
        };
        assert_eq!(body.text(), "a b");
    }
}

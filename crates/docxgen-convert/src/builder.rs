//! Document model builders.
//!
//! [`build`] maps Markdown block tokens to paragraphs. [`build_plain`] is the
//! line-based mode that predates Markdown support.

use std::sync::LazyLock;

use regex::Regex;

use crate::inline::{InlineSpan, split};
use crate::model::{BodyParagraph, DocumentModel, ParagraphNode, ParagraphStyle};
use crate::token::BlockToken;
use crate::util::utf16_len;

/// Bullet glyph prefixed to every list item.
pub const BULLET: &str = "• ";

/// Literal separator line emitted for thematic breaks.
pub static RULE_LINE: LazyLock<String> = LazyLock::new(|| "─".repeat(RULE_WIDTH));

const RULE_WIDTH: usize = 50;

/// Upper bound (exclusive) on the length of an all-caps plain-mode heading.
const CAPS_HEADING_MAX_LEN: usize = 50;

/// Leading `#` markers of a plain-mode heading.
static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+\s*").expect("invalid heading marker regex"));

/// Build a document model from block tokens.
///
/// Each token yields zero or more paragraphs; output order follows input order.
pub fn build(tokens: &[BlockToken]) -> DocumentModel {
    let mut doc = DocumentModel::default();
    for token in tokens {
        build_block(token, &mut doc);
    }
    doc
}

fn build_block(token: &BlockToken, doc: &mut DocumentModel) {
    match token {
        BlockToken::Heading { depth, text } => {
            let text: String = split(text).iter().map(InlineSpan::text).collect();
            doc.push(ParagraphNode::heading(*depth, text));
        }
        BlockToken::Paragraph(text) => doc.push(BodyParagraph {
            runs: split(text),
            style: ParagraphStyle::default(),
        }),
        BlockToken::List(items) => {
            for item in items {
                let mut runs = vec![InlineSpan::Plain(BULLET.to_owned())];
                runs.extend(split(item));
                doc.push(BodyParagraph {
                    runs,
                    style: ParagraphStyle::list_item(),
                });
            }
        }
        BlockToken::Blockquote(text) => {
            let text = text.split('\n').collect::<Vec<_>>().join(" ");
            doc.push(BodyParagraph::plain(text).with_style(ParagraphStyle::quote()));
        }
        BlockToken::Code(lines) => {
            for line in lines {
                doc.push(BodyParagraph::plain(line.as_str()).with_style(ParagraphStyle::code()));
            }
        }
        BlockToken::Rule => doc.push(BodyParagraph::plain(RULE_LINE.as_str())),
        BlockToken::Blank => doc.push(BodyParagraph::empty()),
        BlockToken::Other(text) if text.is_empty() => {}
        BlockToken::Other(text) => doc.push(BodyParagraph::plain(text.as_str())),
    }
}

/// Build a document model from plain text, one paragraph per non-blank line.
///
/// A line becomes a level-1 heading when it starts with `#`, or when it is
/// entirely upper case and shorter than 50 UTF-16 code units. Lines without any
/// letters satisfy the upper-case test too.
pub fn build_plain(text: &str) -> DocumentModel {
    let mut doc = DocumentModel::default();
    for line in text.split('\n').filter(|line| !line.trim().is_empty()) {
        if is_plain_heading(line) {
            doc.push(ParagraphNode::heading(
                1,
                HEADING_MARKER.replace(line, "").into_owned(),
            ));
        } else {
            doc.push(BodyParagraph::plain(line));
        }
    }
    doc
}

fn is_plain_heading(line: &str) -> bool {
    line.starts_with('#')
        || (line == line.to_uppercase() && utf16_len(line) < CAPS_HEADING_MAX_LEN)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::token::tokenize;

    fn heading(level: u8, text: &str) -> ParagraphNode {
        ParagraphNode::Heading {
            level,
            text: text.to_owned(),
        }
    }

    fn body(text: &str) -> ParagraphNode {
        ParagraphNode::Body(BodyParagraph::plain(text))
    }

    #[test]
    fn test_build_heading() {
        let doc = build(&[BlockToken::Heading {
            depth: 2,
            text: "Title".to_owned(),
        }]);
        assert_eq!(doc.paragraphs(), &[heading(2, "Title")]);
    }

    #[test]
    fn test_build_heading_strips_inline_markers() {
        let doc = build(&[BlockToken::Heading {
            depth: 1,
            text: "The **big** one".to_owned(),
        }]);
        assert_eq!(doc.paragraphs(), &[heading(1, "The big one")]);
    }

    #[test]
    fn test_build_heading_unsupported_depth() {
        let doc = build(&[BlockToken::Heading {
            depth: 9,
            text: "Deep".to_owned(),
        }]);
        assert_eq!(doc.paragraphs(), &[heading(1, "Deep")]);
    }

    #[test]
    fn test_build_paragraph_uses_inline_spans() {
        let doc = build(&[BlockToken::Paragraph("a **b**".to_owned())]);
        assert_eq!(
            doc.paragraphs(),
            &[ParagraphNode::Body(BodyParagraph {
                runs: vec![
                    InlineSpan::Plain("a ".to_owned()),
                    InlineSpan::Bold("b".to_owned()),
                ],
                style: ParagraphStyle::default(),
            })]
        );
    }

    #[test]
    fn test_build_list_items_get_bullet_and_indent() {
        let doc = build(&[BlockToken::List(vec![
            "one".to_owned(),
            "*two*".to_owned(),
        ])]);
        assert_eq!(
            doc.paragraphs(),
            &[
                ParagraphNode::Body(BodyParagraph {
                    runs: vec![
                        InlineSpan::Plain(BULLET.to_owned()),
                        InlineSpan::Plain("one".to_owned()),
                    ],
                    style: ParagraphStyle::list_item(),
                }),
                ParagraphNode::Body(BodyParagraph {
                    runs: vec![
                        InlineSpan::Plain(BULLET.to_owned()),
                        InlineSpan::Italic("two".to_owned()),
                    ],
                    style: ParagraphStyle::list_item(),
                }),
            ]
        );
    }

    #[test]
    fn test_build_blockquote_collapses_newlines() {
        let doc = build(&[BlockToken::Blockquote("first\nsecond **x**".to_owned())]);
        assert_eq!(
            doc.paragraphs(),
            &[ParagraphNode::Body(
                BodyParagraph::plain("first second **x**").with_style(ParagraphStyle::quote())
            )]
        );
    }

    #[test]
    fn test_build_code_lines_verbatim() {
        let doc = build(&[BlockToken::Code(vec![
            "fn main() {".to_owned(),
            "    run();".to_owned(),
        ])]);
        assert_eq!(doc.len(), 2);
        for (node, expected) in doc.paragraphs().iter().zip(["fn main() {", "    run();"]) {
            let ParagraphNode::Body(body) = node else {
                panic!("expected body paragraph");
            };
            assert!(body.style.monospace);
            assert!(body.style.shaded);
            assert_eq!(body.runs, vec![InlineSpan::Plain(expected.to_owned())]);
        }
    }

    #[test]
    fn test_build_code_keeps_empty_lines() {
        let doc = build(&[BlockToken::Code(vec![
            "a".to_owned(),
            String::new(),
            "b".to_owned(),
        ])]);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.paragraphs()[1].text(), "");
    }

    #[test]
    fn test_build_rule_and_blank() {
        let doc = build(&[BlockToken::Rule, BlockToken::Blank]);
        assert_eq!(
            doc.paragraphs(),
            &[
                body(&RULE_LINE),
                ParagraphNode::Body(BodyParagraph::empty())
            ]
        );
    }

    #[test]
    fn test_build_other_drops_empty() {
        let doc = build(&[
            BlockToken::Other(String::new()),
            BlockToken::Other("<br>".to_owned()),
        ]);
        assert_eq!(doc.paragraphs(), &[body("<br>")]);
    }

    #[test]
    fn test_build_markdown_document() {
        let doc = build(&tokenize("# Hi\n\nSome *text*\n\n- a\n- b"));
        let texts: Vec<String> = doc.paragraphs().iter().map(ParagraphNode::text).collect();
        assert_eq!(texts, vec!["Hi", "", "Some text", "", "• a", "• b"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let source = "# T\n\n**a** `b`\n\n> q\n\n```\nx\n```";
        assert_eq!(build(&tokenize(source)), build(&tokenize(source)));
    }

    #[test]
    fn test_build_plain_caps_heading() {
        let doc = build_plain("ALL CAPS SHORT\nnormal line");
        assert_eq!(
            doc.paragraphs(),
            &[heading(1, "ALL CAPS SHORT"), body("normal line")]
        );
    }

    #[test]
    fn test_build_plain_hash_heading_and_blank_lines() {
        let doc = build_plain("## Intro\n\n   \nbody text");
        assert_eq!(doc.paragraphs(), &[heading(1, "Intro"), body("body text")]);
    }

    #[test]
    fn test_build_plain_long_caps_line_is_body() {
        let line = "A".repeat(50);
        let doc = build_plain(&line);
        assert_eq!(doc.paragraphs(), &[body(&line)]);
    }

    #[test]
    fn test_build_plain_caps_limit_counts_utf16_units() {
        let line = "😀".repeat(25);
        let doc = build_plain(&line);
        assert_eq!(doc.paragraphs(), &[body(&line)]);

        let line = "😀".repeat(24);
        let doc = build_plain(&line);
        assert_eq!(doc.paragraphs(), &[heading(1, &line)]);
    }

    #[test]
    fn test_build_plain_letterless_line_is_heading() {
        let doc = build_plain("12345\nok");
        assert_eq!(doc.paragraphs(), &[heading(1, "12345"), body("ok")]);
    }

    #[test]
    fn test_build_plain_keeps_markdown_literal() {
        let doc = build_plain("some **bold** text");
        assert_eq!(doc.paragraphs(), &[body("some **bold** text")]);
    }
}

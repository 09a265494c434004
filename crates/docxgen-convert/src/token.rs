//! Block tokenizer.
//!
//! Drives `pulldown-cmark` over the input and collapses its event stream
//! into a flat sequence of top-level [`BlockToken`]s. Inline text is kept as
//! raw source so the span splitter sees the original markers.

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::util::heading_level_to_num;

/// Leading list marker (`-`, `*`, `+`, `1.` or `1)`) of a list item.
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[-+*]|\d{1,9}[.)])[ \t]?").expect("invalid list marker regex")
});

/// Leading `>` markers of a blockquote line.
static QUOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:>[ \t]?)+").expect("invalid quote marker regex"));

/// Closing `#` sequence of an ATX heading.
static ATX_CLOSING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+#+[ \t]*$").expect("invalid closing sequence regex"));

/// A top-level block of a Markdown document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockToken {
    /// Heading with its `#` depth and raw inline text.
    Heading { depth: u8, text: String },
    /// Paragraph with raw inline text.
    Paragraph(String),
    /// List items in document order, nested items flattened.
    List(Vec<String>),
    /// Blockquote text with `>` markers removed.
    Blockquote(String),
    /// Literal lines of a fenced or indented code block.
    Code(Vec<String>),
    /// Thematic break.
    Rule,
    /// Blank line(s) between two blocks.
    Blank,
    /// Any other block (e.g. raw HTML), verbatim.
    Other(String),
}

/// Block currently being collected.
enum Pending {
    Heading { depth: u8, range: Range<usize> },
    Paragraph(Range<usize>),
    List(ListState),
    Blockquote(Range<usize>),
    Code(String),
    Other(Range<usize>),
}

/// Byte span of one list item, cut before any nested list.
struct ItemSpan {
    start: usize,
    end: usize,
    cut: Option<usize>,
}

#[derive(Default)]
struct ListState {
    items: Vec<ItemSpan>,
    open: Vec<usize>,
}

impl ListState {
    fn start_item(&mut self, range: &Range<usize>) {
        self.open.push(self.items.len());
        self.items.push(ItemSpan {
            start: range.start,
            end: range.end,
            cut: None,
        });
    }

    fn end_item(&mut self, range: &Range<usize>) {
        if let Some(index) = self.open.pop() {
            self.items[index].end = range.end;
        }
    }

    fn start_nested_list(&mut self, at: usize) {
        if let Some(&index) = self.open.last() {
            self.items[index].cut.get_or_insert(at);
        }
    }
}

impl Pending {
    fn open(tag: &Tag<'_>, range: Range<usize>) -> Self {
        match tag {
            Tag::Heading { level, .. } => Self::Heading {
                depth: heading_level_to_num(*level),
                range,
            },
            Tag::Paragraph => Self::Paragraph(range),
            Tag::List(_) => Self::List(ListState::default()),
            Tag::BlockQuote(_) => Self::Blockquote(range),
            Tag::CodeBlock(_) => Self::Code(String::new()),
            _ => Self::Other(range),
        }
    }

    fn finish(self, source: &str) -> BlockToken {
        match self {
            Self::Heading { depth, range } => BlockToken::Heading {
                depth,
                text: heading_text(&source[range]),
            },
            Self::Paragraph(range) => BlockToken::Paragraph(join_lines(&source[range])),
            Self::List(list) => BlockToken::List(
                list.items
                    .iter()
                    .map(|item| item_text(&source[item.start..item.cut.unwrap_or(item.end)]))
                    .collect(),
            ),
            Self::Blockquote(range) => BlockToken::Blockquote(quote_text(&source[range])),
            Self::Code(code) => BlockToken::Code(code.lines().map(str::to_owned).collect()),
            Self::Other(range) => BlockToken::Other(source[range].trim().to_owned()),
        }
    }
}

/// Parser options: strikethrough is the only extension the splitter needs.
fn parser_options() -> Options {
    Options::ENABLE_STRIKETHROUGH
}

/// Tokenize Markdown into top-level block tokens.
///
/// Never fails: syntax the lexer does not recognise degrades to paragraphs
/// or [`BlockToken::Other`].
pub fn tokenize(source: &str) -> Vec<BlockToken> {
    let mut tokens = Vec::new();
    let mut pending: Option<Pending> = None;
    let mut depth = 0usize;
    let mut last_end: Option<usize> = None;

    for (event, range) in Parser::new_ext(source, parser_options()).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    push_blank_if_separated(source, last_end, range.start, &mut tokens);
                    pending = Some(Pending::open(&tag, range.clone()));
                } else if let Some(Pending::List(list)) = pending.as_mut() {
                    match tag {
                        Tag::Item => list.start_item(&range),
                        Tag::List(_) => list.start_nested_list(range.start),
                        _ => {}
                    }
                }
                depth += 1;
            }
            Event::End(tag_end) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(block) = pending.take() {
                        tokens.push(block.finish(source));
                    }
                    last_end = Some(range.end);
                } else if tag_end == TagEnd::Item
                    && let Some(Pending::List(list)) = pending.as_mut()
                {
                    list.end_item(&range);
                }
            }
            Event::Text(text) => {
                if let Some(Pending::Code(code)) = pending.as_mut() {
                    code.push_str(&text);
                }
            }
            Event::Rule if depth == 0 => {
                push_blank_if_separated(source, last_end, range.start, &mut tokens);
                tokens.push(BlockToken::Rule);
                last_end = Some(range.end);
            }
            _ => {}
        }
    }

    tokens
}

/// Emit [`BlockToken::Blank`] when a blank line separates two blocks.
fn push_blank_if_separated(
    source: &str,
    last_end: Option<usize>,
    start: usize,
    tokens: &mut Vec<BlockToken>,
) {
    let Some(end) = last_end else {
        return;
    };
    let content_end = source[..end].trim_end_matches(['\n', '\r']).len();
    if content_end >= start {
        return;
    }
    let gap = &source[content_end..start];
    if gap.matches('\n').count() >= 2 {
        tokens.push(BlockToken::Blank);
    }
}

/// Trim each line and rejoin with `\n`.
fn join_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Heading text without ATX markers or setext underline.
fn heading_text(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix('#') {
        let rest = rest.trim_start_matches('#');
        let rest = ATX_CLOSING.replace(rest, "");
        return rest.trim().to_owned();
    }
    let mut lines: Vec<&str> = raw.lines().collect();
    if lines.len() > 1 && lines.last().is_some_and(|line| is_setext_underline(line)) {
        lines.pop();
    }
    join_lines(&lines.join("\n"))
}

fn is_setext_underline(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && (line.chars().all(|c| c == '=') || line.chars().all(|c| c == '-'))
}

fn item_text(raw: &str) -> String {
    join_lines(&LIST_MARKER.replace(raw, ""))
}

fn quote_text(raw: &str) -> String {
    raw.lines()
        .map(|line| QUOTE_MARKER.replace(line, "").trim().to_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

//! Inline span splitter.
//!
//! A flat lexical classifier over bold, italic, code and strikethrough
//! markers. Spans never nest: markers inside a matched span stay literal.

use std::sync::LazyLock;

use regex::Regex;

/// Alternatives are tried leftmost-first, so `**` wins over `*`.
static SPAN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(?<bold>.+?)\*\*|\*(?<italic>.+?)\*|`(?<code>.+?)`|~~(?<strike>.+?)~~|[^*`~]+")
        .expect("invalid inline span regex")
});

/// A run of text sharing one formatting style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineSpan {
    Bold(String),
    Italic(String),
    Code(String),
    Strikethrough(String),
    Plain(String),
}

impl InlineSpan {
    /// Span text with delimiters stripped.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Bold(text)
            | Self::Italic(text)
            | Self::Code(text)
            | Self::Strikethrough(text)
            | Self::Plain(text) => text,
        }
    }
}

/// Split inline text into styled spans.
///
/// Unmatched `*`, `` ` `` and `~` characters are kept as plain text and
/// merged with neighbouring plain spans. Empty input yields no spans.
///
/// # Examples
///
/// ```
/// use docxgen_convert::{InlineSpan, split};
///
/// assert_eq!(
///     split("a *b* c"),
///     vec![
///         InlineSpan::Plain("a ".to_owned()),
///         InlineSpan::Italic("b".to_owned()),
///         InlineSpan::Plain(" c".to_owned()),
///     ]
/// );
/// ```
pub fn split(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in SPAN_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > cursor {
            push_plain(&mut spans, &text[cursor..whole.start()]);
        }
        cursor = whole.end();

        let span = if let Some(m) = caps.name("bold") {
            InlineSpan::Bold(m.as_str().to_owned())
        } else if let Some(m) = caps.name("italic") {
            InlineSpan::Italic(m.as_str().to_owned())
        } else if let Some(m) = caps.name("code") {
            InlineSpan::Code(m.as_str().to_owned())
        } else if let Some(m) = caps.name("strike") {
            InlineSpan::Strikethrough(m.as_str().to_owned())
        } else {
            push_plain(&mut spans, whole.as_str());
            continue;
        };
        spans.push(span);
    }

    if cursor < text.len() {
        push_plain(&mut spans, &text[cursor..]);
    }

    spans
}

/// Append plain text, extending the previous span when it is plain too.
fn push_plain(spans: &mut Vec<InlineSpan>, text: &str) {
    if let Some(InlineSpan::Plain(last)) = spans.last_mut() {
        last.push_str(text);
    } else {
        spans.push(InlineSpan::Plain(text.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn plain(s: &str) -> InlineSpan {
        InlineSpan::Plain(s.to_owned())
    }

    #[test]
    fn test_split_bold() {
        assert_eq!(split("**bold**"), vec![InlineSpan::Bold("bold".to_owned())]);
    }

    #[test]
    fn test_split_plain() {
        assert_eq!(split("plain"), vec![plain("plain")]);
    }

    #[test]
    fn test_split_italic_between_plain() {
        assert_eq!(
            split("a *b* c"),
            vec![plain("a "), InlineSpan::Italic("b".to_owned()), plain(" c")]
        );
    }

    #[test]
    fn test_split_code_and_strikethrough() {
        assert_eq!(
            split("run `cargo` not ~~make~~"),
            vec![
                plain("run "),
                InlineSpan::Code("cargo".to_owned()),
                plain(" not "),
                InlineSpan::Strikethrough("make".to_owned()),
            ]
        );
    }

    #[test]
    fn test_split_empty() {
        assert!(split("").is_empty());
    }

    #[test]
    fn test_split_bold_keeps_inner_markers_literal() {
        assert_eq!(
            split("**a *b* c**"),
            vec![InlineSpan::Bold("a *b* c".to_owned())]
        );
    }

    #[test]
    fn test_split_non_greedy() {
        assert_eq!(
            split("**a** and **b**"),
            vec![
                InlineSpan::Bold("a".to_owned()),
                plain(" and "),
                InlineSpan::Bold("b".to_owned()),
            ]
        );
    }

    #[test]
    fn test_split_unmatched_markers_are_plain() {
        assert_eq!(split("2 * 3 = 6"), vec![plain("2 * 3 = 6")]);
        assert_eq!(split("~ approx"), vec![plain("~ approx")]);
        assert_eq!(split("trailing `"), vec![plain("trailing `")]);
    }

    #[test]
    fn test_split_preserves_content_without_markers() {
        let inputs = [
            "hello **big** *wide* `code` ~~gone~~ world",
            "no markers at all",
            "x * y ~ z ` w",
        ];
        for input in inputs {
            let joined: String = split(input).iter().map(InlineSpan::text).collect();
            let stripped = input
                .replace("**big**", "big")
                .replace("*wide*", "wide")
                .replace("`code`", "code")
                .replace("~~gone~~", "gone");
            assert_eq!(joined, stripped);
        }
    }

    #[test]
    fn test_split_is_deterministic() {
        let input = "**a** *b* `c` ~~d~~ e";
        assert_eq!(split(input), split(input));
    }
}

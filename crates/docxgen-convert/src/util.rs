//! Shared helpers for the converters.

use std::borrow::Cow;

use pulldown_cmark::HeadingLevel;

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Length in UTF-16 code units, as counted for the short-heading heuristic.
///
/// Characters outside the Basic Multilingual Plane (most emoji) count twice.
#[must_use]
pub(crate) fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Drop characters that XML 1.0 does not allow in text content.
///
/// Tab, line feed and carriage return are the only permitted C0 controls.
pub(crate) fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{FFFE}' | '\u{FFFF}' => false,
        c => c >= ' ',
    }
}

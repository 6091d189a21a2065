//! Word classification.
//!
//! Pure predicates over single words (and single characters, for the
//! scanner). All pattern tables are process-wide constants.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static OPENING_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<[^>]+>\s*$").unwrap());

static CLOSING_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*</[^>]+>\s*$").unwrap());

static TAG_WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^\s>]+").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[ \t\n\r\x0B\x0C]|&nbsp;)+$").unwrap());

static FORMATTING_OPENING_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(strong|b|i|em|big|small|u|sub|sup|strike|s)[>\s]+").unwrap()
});

/// Tags that carry visible content and therefore diff like ordinary words.
const SPECIAL_CASE_WORD_TAGS: &[&str] = &["<img"];

/// Inline formatting elements whose addition or removal is annotated as a
/// single `<ins class="mod">` instead of per-tag wrapping.
pub const FORMATTING_TAGS: &[&str] = &[
    "strong", "em", "b", "i", "big", "small", "u", "sub", "sup", "strike", "s",
];

/// Canonical key for any whitespace word when whitespace differences are ignored.
pub(crate) const WHITESPACE_KEY: &str = " ";

/// Returns true if `word` is a structural tag (opening or closing).
///
/// Tags listed in [`SPECIAL_CASE_WORD_TAGS`] (images) are content, not structure.
pub fn is_tag(word: &str) -> bool {
    if SPECIAL_CASE_WORD_TAGS
        .iter()
        .any(|prefix| word.starts_with(prefix))
    {
        return false;
    }

    is_opening_tag(word) || is_closing_tag(word)
}

fn is_opening_tag(word: &str) -> bool {
    OPENING_TAG_REGEX.is_match(word)
}

fn is_closing_tag(word: &str) -> bool {
    CLOSING_TAG_REGEX.is_match(word)
}

/// Returns true if `word` is made only of whitespace and `&nbsp;` entities.
pub fn is_whitespace(word: &str) -> bool {
    WHITESPACE_REGEX.is_match(word)
}

/// Returns true if `text` contains at least one identifier-like character.
pub fn is_word(text: &str) -> bool {
    text.chars().any(is_word_char)
}

/// Identifier-like characters: ASCII alphanumerics, `_`, `#` and `@`.
///
/// Non-ASCII characters never qualify, so ideographic text splits into one
/// word per character.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '#' | '@')
}

pub fn is_whitespace_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

pub fn is_start_of_tag(c: char) -> bool {
    c == '<'
}

pub fn is_end_of_tag(c: char) -> bool {
    c == '>'
}

pub fn is_start_of_entity(c: char) -> bool {
    c == '&'
}

pub fn is_end_of_entity(c: char) -> bool {
    c == ';'
}

/// Reduces a tag to its name, dropping every attribute.
///
/// `<p class="x">` becomes `<p>`, `<br clear="all"/>` becomes `<br/>`.
pub fn strip_tag_attributes(word: &str) -> String {
    let tag = TAG_WORD_REGEX
        .find(word)
        .map(|m| m.as_str())
        .unwrap_or_default();
    let needs_closing = word.ends_with("/>") && !tag.ends_with('/');

    let mut stripped = String::with_capacity(tag.len() + 2);
    stripped.push_str(tag);
    stripped.push_str(if needs_closing { "/>" } else { ">" });
    stripped
}

/// Normalizes a word for comparison: tags lose their attributes.
pub fn strip_any_attributes(word: &str) -> Cow<'_, str> {
    if is_tag(word) {
        Cow::Owned(strip_tag_attributes(word))
    } else {
        Cow::Borrowed(word)
    }
}

/// If `word` opens a formatting element, returns the element name.
pub fn formatting_opening_tag(word: &str) -> Option<&'static str> {
    let captures = FORMATTING_OPENING_TAG_REGEX.captures(word)?;
    let name = captures.get(1)?.as_str();
    FORMATTING_TAGS
        .iter()
        .copied()
        .find(|tag| tag.eq_ignore_ascii_case(name))
}

/// If `word` is exactly a formatting element's closing tag, returns the element name.
pub fn formatting_closing_tag(word: &str) -> Option<&'static str> {
    let name = word.strip_prefix("</")?.strip_suffix('>')?;
    FORMATTING_TAGS
        .iter()
        .copied()
        .find(|tag| tag.eq_ignore_ascii_case(name))
}

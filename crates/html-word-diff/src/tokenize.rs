//! HTML tokenizer.
//!
//! Splits HTML text into words: text runs, whitespace runs, tags and
//! entities. Every word is a slice of the input and the words are
//! contiguous, so joining them gives back the input exactly.

use std::collections::BTreeMap;

use regex::Regex;

use crate::classify::{
    is_end_of_entity, is_end_of_tag, is_start_of_entity, is_start_of_tag, is_whitespace,
    is_whitespace_char, is_word_char,
};
use crate::{Error, Result};

/// Compiled block expressions, in the order they were added.
///
/// A span of text matched by one of these expressions is never split into
/// several words, so changes inside it are reported for the span as a whole.
#[derive(Debug, Clone, Default)]
pub struct BlockExpressions {
    expressions: Vec<Regex>,
}

impl BlockExpressions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every pattern, failing on the first invalid one.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut blocks = Self::new();
        for pattern in patterns {
            blocks.add(pattern.as_ref())?;
        }
        Ok(blocks)
    }

    /// Compile and append one pattern.
    pub fn add(&mut self, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidBlockExpression {
            expression: pattern.to_string(),
            source,
        })?;
        self.expressions.push(regex);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Regex> {
        self.expressions.iter()
    }
}

/// Locate every grouped span of `text`, keyed by start byte offset.
///
/// Values are exclusive end offsets. Empty matches are ignored. Spans from
/// different expressions must not overlap.
pub fn find_blocks(text: &str, blocks: &BlockExpressions) -> Result<BTreeMap<usize, usize>> {
    let mut locations: BTreeMap<usize, usize> = BTreeMap::new();

    for expression in blocks.iter() {
        for m in expression.find_iter(text) {
            if m.is_empty() {
                continue;
            }

            let overlaps_previous = locations
                .range(..=m.start())
                .next_back()
                .is_some_and(|(_, &end)| end > m.start());
            let overlaps_next = locations
                .range(m.start()..m.end())
                .next()
                .is_some();

            if overlaps_previous || overlaps_next {
                return Err(Error::OverlappingBlocks {
                    expression: expression.as_str().to_string(),
                    offset: m.start(),
                });
            }

            locations.insert(m.start(), m.end());
        }
    }

    Ok(locations)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    Tag,
    Whitespace,
    Entity,
}

/// Word accumulator over a borrowed input.
struct Scanner<'a> {
    text: &'a str,
    words: Vec<&'a str>,
    /// Byte offset where the current word starts
    start: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            words: Vec::new(),
            start: 0,
        }
    }

    /// Emit the current word (if any) ending at `at`; the next word starts there.
    fn flush(&mut self, at: usize) {
        if at > self.start {
            self.words.push(&self.text[self.start..at]);
        }
        self.start = at;
    }

    fn current(&self, at: usize) -> &'a str {
        &self.text[self.start..at]
    }

    /// Close an entity ending at `end`. Returns true when it was merged into
    /// the preceding whitespace word, which then stays open.
    ///
    /// A whitespace entity merges with any preceding whitespace word,
    /// including one that opens the text.
    fn close_entity(&mut self, end: usize) -> bool {
        let entity = &self.text[self.start..end];
        let merge = is_whitespace(entity)
            && self
                .words
                .last()
                .is_some_and(|previous| is_whitespace(previous));

        if merge {
            if let Some(previous) = self.words.pop() {
                self.start -= previous.len();
            }
            return true;
        }

        self.flush(end);
        false
    }
}

/// Split `text` into words.
///
/// Text matched by `blocks` is never split. Fails only when block
/// expressions overlap.
pub fn tokenize<'a>(text: &'a str, blocks: &BlockExpressions) -> Result<Vec<&'a str>> {
    let block_locations = find_blocks(text, blocks)?;
    Ok(split_words(text, &block_locations))
}

/// Split `text` into words, keeping each span of `block_locations` whole.
///
/// A span is appended to the word being built when it starts, and scanning
/// resumes in text mode after it with that word still open. So the space in
/// front of a span belongs to the span's word, and adjacent spans form one
/// word.
pub(crate) fn split_words<'a>(
    text: &'a str,
    block_locations: &BTreeMap<usize, usize>,
) -> Vec<&'a str> {
    let mut scanner = Scanner::new(text);
    let mut mode = Mode::Text;
    let mut grouping_until: Option<usize> = None;

    for (index, character) in text.char_indices() {
        if !block_locations.is_empty() {
            if grouping_until == Some(index) {
                grouping_until = None;
            }

            if let Some(&until) = block_locations.get(&index) {
                grouping_until = Some(until);
            }

            if grouping_until.is_some() {
                mode = Mode::Text;
                continue;
            }
        }

        match mode {
            Mode::Text => {
                if is_start_of_tag(character) {
                    scanner.flush(index);
                    mode = Mode::Tag;
                } else if is_start_of_entity(character) {
                    scanner.flush(index);
                    mode = Mode::Entity;
                } else if is_whitespace_char(character) {
                    scanner.flush(index);
                    mode = Mode::Whitespace;
                } else {
                    // identifier-like runs absorb the next character
                    let joins = scanner
                        .current(index)
                        .chars()
                        .next_back()
                        .is_none_or(is_word_char);
                    if !joins {
                        scanner.flush(index);
                    }
                }
            }
            Mode::Tag => {
                if is_end_of_tag(character) {
                    scanner.flush(index + character.len_utf8());
                    mode = Mode::Text;
                }
            }
            Mode::Whitespace => {
                if is_start_of_tag(character) {
                    scanner.flush(index);
                    mode = Mode::Tag;
                } else if is_start_of_entity(character) {
                    scanner.flush(index);
                    mode = Mode::Entity;
                } else if !is_whitespace_char(character) {
                    scanner.flush(index);
                    mode = Mode::Text;
                }
            }
            Mode::Entity => {
                if is_start_of_tag(character) {
                    scanner.flush(index);
                    mode = Mode::Tag;
                } else if is_whitespace_char(character) {
                    scanner.flush(index);
                    mode = Mode::Whitespace;
                } else if is_end_of_entity(character) {
                    let merged = scanner.close_entity(index + character.len_utf8());
                    mode = if merged { Mode::Whitespace } else { Mode::Text };
                } else if !is_word_char(character) {
                    scanner.flush(index);
                    mode = Mode::Text;
                }
            }
        }
    }

    scanner.flush(text.len());
    trace!(bytes = text.len(), words = scanner.words.len(), "tokenized");
    scanner.words
}

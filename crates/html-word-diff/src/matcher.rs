//! Longest-match search.
//!
//! Matching works on blocks: windows of `block_size` consecutive normalized
//! words. The new range is indexed by block, then the old range is swept with
//! the same window while a single rolling row tracks run lengths. Large block
//! sizes are tried first and the search falls back to smaller ones.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::classify::{WHITESPACE_KEY, is_whitespace, strip_any_attributes};

/// `size` consecutive words starting at `start_in_old` in the old list equal
/// `size` consecutive words starting at `start_in_new` in the new list.
///
/// A zero-size match marks the end of both lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Match {
    pub start_in_old: usize,
    pub start_in_new: usize,
    pub size: usize,
}

impl Match {
    pub fn new(start_in_old: usize, start_in_new: usize, size: usize) -> Self {
        Self {
            start_in_old,
            start_in_new,
            size,
        }
    }

    /// The zero-size match positioned after the last word of both lists.
    pub fn sentinel(old_len: usize, new_len: usize) -> Self {
        Self::new(old_len, new_len, 0)
    }

    pub fn end_in_old(&self) -> usize {
        self.start_in_old + self.size
    }

    pub fn end_in_new(&self) -> usize {
        self.start_in_new + self.size
    }

    /// Words covered by this match in the old list.
    pub fn old_words<'w>(&self, old: &'w [&'w str]) -> &'w [&'w str] {
        &old[self.start_in_old..self.end_in_old()]
    }

    /// Words covered by this match in the new list.
    pub fn new_words<'w>(&self, new: &'w [&'w str]) -> &'w [&'w str] {
        &new[self.start_in_new..self.end_in_new()]
    }
}

/// Half-open index ranges into the old and new word lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub start_in_old: usize,
    pub end_in_old: usize,
    pub start_in_new: usize,
    pub end_in_new: usize,
}

impl MatchRange {
    pub fn new(start_in_old: usize, end_in_old: usize, start_in_new: usize, end_in_new: usize) -> Self {
        Self {
            start_in_old,
            end_in_old,
            start_in_new,
            end_in_new,
        }
    }

    /// Part of the range strictly before `m`, if it is non-empty on both sides.
    fn before(&self, m: &Match) -> Option<Self> {
        (self.start_in_old < m.start_in_old && self.start_in_new < m.start_in_new).then(|| {
            Self::new(
                self.start_in_old,
                m.start_in_old,
                self.start_in_new,
                m.start_in_new,
            )
        })
    }

    /// Part of the range strictly after `m`, if it is non-empty on both sides.
    fn after(&self, m: &Match) -> Option<Self> {
        (m.end_in_old() < self.end_in_old && m.end_in_new() < self.end_in_new).then(|| {
            Self::new(
                m.end_in_old(),
                self.end_in_old,
                m.end_in_new(),
                self.end_in_new,
            )
        })
    }
}

/// Settings for a single matching attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// How many words are joined into one block
    pub block_size: usize,
    /// Blocks occurring more than `new_len * repeating_words_accuracy` times are not indexed
    pub repeating_words_accuracy: f64,
    /// Compare every whitespace word as a single space
    pub ignore_whitespace_differences: bool,
}

/// Finds the longest match at one fixed block size.
struct MatchFinder<'m, 'a> {
    old: &'m [Cow<'a, str>],
    new: &'m [Cow<'a, str>],
    range: MatchRange,
    options: MatchOptions,
}

impl<'m, 'a> MatchFinder<'m, 'a> {
    /// Every block of the new range, mapped to the positions of its last word.
    fn index_new_words(&self) -> HashMap<&'m [Cow<'a, str>], Vec<usize>> {
        let mut word_indices: HashMap<&'m [Cow<'a, str>], Vec<usize>> = HashMap::new();
        let block_size = self.options.block_size;

        for i in self.range.start_in_new..self.range.end_in_new {
            let Some(key) = block_ending_at(self.new, self.range.start_in_new, i, block_size)
            else {
                continue;
            };
            word_indices.entry(key).or_default().push(i);
        }

        word_indices
    }

    /// Drop blocks that repeat too often to be worth comparing.
    ///
    /// This trades accuracy for speed: repeated boilerplate may then show up
    /// as a difference.
    fn remove_repeating_words(&self, word_indices: &mut HashMap<&'m [Cow<'a, str>], Vec<usize>>) {
        let threshold = self.new.len() as f64 * self.options.repeating_words_accuracy;
        word_indices.retain(|_, positions| positions.len() as f64 <= threshold);
    }

    fn find_match(&self) -> Option<Match> {
        let mut word_indices = self.index_new_words();
        self.remove_repeating_words(&mut word_indices);

        if word_indices.is_empty() {
            return None;
        }

        let block_size = self.options.block_size;
        let mut best_in_old = self.range.start_in_old;
        let mut best_in_new = self.range.start_in_new;
        let mut best_size = 0;

        // run length of blocks ending at each new position, for the previous old position
        let mut match_length_at: HashMap<usize, usize> = HashMap::new();

        for index_in_old in self.range.start_in_old..self.range.end_in_old {
            let Some(key) =
                block_ending_at(self.old, self.range.start_in_old, index_in_old, block_size)
            else {
                continue;
            };

            let mut new_match_length_at = HashMap::new();

            if let Some(positions) = word_indices.get(key) {
                for &index_in_new in positions {
                    let previous = index_in_new
                        .checked_sub(1)
                        .and_then(|p| match_length_at.get(&p))
                        .copied()
                        .unwrap_or(0);
                    let length = previous + 1;
                    new_match_length_at.insert(index_in_new, length);

                    if length > best_size {
                        best_in_old = index_in_old + 2 - length - block_size;
                        best_in_new = index_in_new + 2 - length - block_size;
                        best_size = length;
                    }
                }
            }

            match_length_at = new_match_length_at;
        }

        (best_size != 0).then(|| Match::new(best_in_old, best_in_new, best_size + block_size - 1))
    }
}

/// The block of `block_size` words ending at `end`, if it fits after `start`.
fn block_ending_at<'m, 'a>(
    words: &'m [Cow<'a, str>],
    start: usize,
    end: usize,
    block_size: usize,
) -> Option<&'m [Cow<'a, str>]> {
    let first = (end + 1).checked_sub(block_size)?;
    (first >= start).then(|| &words[first..=end])
}

/// Match search over one pair of word lists.
///
/// Words are normalized once up front; every search reuses them.
pub struct Matcher<'a> {
    old: Vec<Cow<'a, str>>,
    new: Vec<Cow<'a, str>>,
    granularity: usize,
    repeating_words_accuracy: f64,
    ignore_whitespace_differences: bool,
}

impl<'a> Matcher<'a> {
    /// `match_granularity_maximum` is the largest block size tried; it is
    /// capped by the length of the shorter list.
    pub fn new(
        old_words: &[&'a str],
        new_words: &[&'a str],
        match_granularity_maximum: usize,
        repeating_words_accuracy: f64,
        ignore_whitespace_differences: bool,
    ) -> Self {
        let granularity = match_granularity_maximum
            .min(old_words.len())
            .min(new_words.len());

        trace!(granularity, "matcher ready");

        Self {
            old: old_words
                .iter()
                .map(|&word| normalize_for_index(word, ignore_whitespace_differences))
                .collect(),
            new: new_words
                .iter()
                .map(|&word| normalize_for_index(word, ignore_whitespace_differences))
                .collect(),
            granularity,
            repeating_words_accuracy,
            ignore_whitespace_differences,
        }
    }

    /// Block size the search starts from.
    pub fn granularity(&self) -> usize {
        self.granularity
    }

    /// Range covering both lists entirely.
    pub fn full_range(&self) -> MatchRange {
        MatchRange::new(0, self.old.len(), 0, self.new.len())
    }

    /// The longest match in `range`, trying block sizes from the granularity down to 1.
    pub fn find_match(&self, range: MatchRange) -> Option<Match> {
        (1..=self.granularity).rev().find_map(|block_size| {
            MatchFinder {
                old: &self.old,
                new: &self.new,
                range,
                options: MatchOptions {
                    block_size,
                    repeating_words_accuracy: self.repeating_words_accuracy,
                    ignore_whitespace_differences: self.ignore_whitespace_differences,
                },
            }
            .find_match()
        })
    }

    /// All matches over both lists, ordered and non-overlapping.
    ///
    /// Each found match splits its range in two; the parts before and after
    /// it are searched in turn. A work stack replaces recursion.
    pub fn find_matching_blocks(&self) -> Vec<Match> {
        let mut matching_blocks = Vec::new();
        let mut pending = vec![self.full_range()];

        while let Some(range) = pending.pop() {
            let Some(m) = self.find_match(range) else {
                continue;
            };

            pending.extend(range.before(&m));
            pending.extend(range.after(&m));
            matching_blocks.push(m);
        }

        matching_blocks.sort_unstable_by_key(|m| m.start_in_old);
        matching_blocks
    }
}

fn normalize_for_index(word: &str, ignore_whitespace_differences: bool) -> Cow<'_, str> {
    let word = strip_any_attributes(word);
    if ignore_whitespace_differences && is_whitespace(&word) {
        return Cow::Borrowed(WHITESPACE_KEY);
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::{BlockExpressions, tokenize};

    fn words(text: &str) -> Vec<&str> {
        tokenize(text, &BlockExpressions::new()).unwrap()
    }

    fn matcher<'a>(old: &[&'a str], new: &[&'a str]) -> Matcher<'a> {
        Matcher::new(old, new, 4, 1.0, true)
    }

    #[test]
    fn test_match_ends() {
        let m = Match::new(2, 5, 3);
        assert_eq!(m.end_in_old(), 5);
        assert_eq!(m.end_in_new(), 8);
        assert_eq!(Match::sentinel(7, 9).size, 0);
    }

    #[test]
    fn test_granularity_is_capped() {
        let old = words("a b");
        let new = words("a b c d e");
        assert_eq!(matcher(&old, &new).granularity(), 3);
        assert_eq!(matcher(&[], &new).granularity(), 0);
    }

    #[test]
    fn test_finds_longest_run() {
        let old = words("one a word is somewhere");
        let new = words("two a nother word is somewhere");
        let m = matcher(&old, &new);
        let found = m.find_match(m.full_range()).unwrap();
        assert_eq!(found, Match::new(3, 5, 6));
        assert_eq!(found.new_words(&new).concat(), " word is somewhere");
        assert_eq!(found.old_words(&old).concat(), " word is somewhere");
    }

    #[test]
    fn test_falls_back_to_smaller_blocks() {
        let old = words("x y");
        let new = words("y");
        let m = matcher(&old, &new);
        assert_eq!(m.find_match(m.full_range()), Some(Match::new(2, 0, 1)));
    }

    #[test]
    fn test_no_match() {
        let old = words("alpha");
        let new = words("beta");
        let m = matcher(&old, &new);
        assert_eq!(m.find_match(m.full_range()), None);
        assert!(m.find_matching_blocks().is_empty());
    }

    #[test]
    fn test_ties_keep_first_run() {
        let old = words("a b");
        let new = words("b a");
        let m = matcher(&old, &new);
        assert_eq!(m.find_match(m.full_range()), Some(Match::new(0, 2, 1)));
    }

    #[test]
    fn test_matching_blocks_are_ordered() {
        let old = words("one a word is somewhere");
        let new = words("two a nother word is somewhere");
        let blocks = matcher(&old, &new).find_matching_blocks();
        assert_eq!(blocks, vec![Match::new(1, 1, 2), Match::new(3, 5, 6)]);
    }

    #[test]
    fn test_attributes_are_ignored() {
        let old = words(r#"<p class="a">text</p>"#);
        let new = words(r#"<p class="b">text</p>"#);
        let blocks = matcher(&old, &new).find_matching_blocks();
        assert_eq!(blocks, vec![Match::new(0, 0, 3)]);
    }

    #[test]
    fn test_whitespace_sensitivity() {
        let old = words("tom jerry");
        let new = words("tom&nbsp;jerry");

        let blocks = Matcher::new(&old, &new, 4, 1.0, true).find_matching_blocks();
        assert_eq!(blocks, vec![Match::new(0, 0, 3)]);

        let blocks = Matcher::new(&old, &new, 4, 1.0, false).find_matching_blocks();
        assert_eq!(blocks, vec![Match::new(0, 0, 1), Match::new(2, 2, 1)]);
    }

    #[test]
    fn test_blocks_compare_word_by_word() {
        // "ab" + "c" and "a" + "bc" spell the same text but are different words
        let old = ["ab", "c"];
        let new = ["a", "bc"];
        let blocks = matcher(&old, &new).find_matching_blocks();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_repeating_words_are_pruned() {
        let old = words("x x x x");
        let new = words("x x x x");

        let blocks = Matcher::new(&old, &new, 1, 1.0, true).find_matching_blocks();
        assert_eq!(blocks, vec![Match::new(0, 0, 7)]);

        // every block repeats more than 0 times: nothing is comparable
        let blocks = Matcher::new(&old, &new, 1, 0.0, true).find_matching_blocks();
        assert!(blocks.is_empty());
    }
}

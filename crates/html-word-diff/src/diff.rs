//! The diff pipeline: tokenize, match, drop orphans, plan, render.

use std::collections::BTreeMap;

use crate::config::DiffOptions;
use crate::matcher::{Match, Matcher};
use crate::orphans::remove_orphans;
use crate::plan::{Operation, plan_operations};
use crate::render::render;
use crate::tokenize::{BlockExpressions, find_blocks, split_words};
use crate::Result;

/// Diff two HTML fragments with default options.
///
/// Returns `new_text` annotated with `<ins>`/`<del>` markup.
pub fn diff_html(old_text: &str, new_text: &str) -> String {
    if old_text == new_text {
        return new_text.to_string();
    }

    let no_blocks = BTreeMap::new();
    let old_words = split_words(old_text, &no_blocks);
    let new_words = split_words(new_text, &no_blocks);
    let operations = plan_words(&old_words, &new_words, &DiffOptions::default());
    render(&old_words, &new_words, &operations)
}

/// A configurable diff between two HTML fragments.
///
/// ```
/// use html_word_diff::HtmlDiff;
///
/// let html = HtmlDiff::new("tom jerry", "tom&nbsp;jerry")
///     .ignore_whitespace_differences(false)
///     .build()?;
/// assert_eq!(
///     html,
///     r#"tom<del class="diffmod">&nbsp;</del><ins class="diffmod">&nbsp;</ins>jerry"#
/// );
/// # Ok::<(), html_word_diff::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct HtmlDiff<'a> {
    old_text: &'a str,
    new_text: &'a str,
    options: DiffOptions,
}

impl<'a> HtmlDiff<'a> {
    pub fn new(old_text: &'a str, new_text: &'a str) -> Self {
        Self {
            old_text,
            new_text,
            options: DiffOptions::default(),
        }
    }

    /// Replace all options at once.
    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    pub fn match_granularity_maximum(mut self, value: usize) -> Self {
        self.options.match_granularity_maximum = value;
        self
    }

    pub fn repeating_words_accuracy(mut self, value: f64) -> Self {
        self.options.repeating_words_accuracy = value;
        self
    }

    pub fn ignore_whitespace_differences(mut self, value: bool) -> Self {
        self.options.ignore_whitespace_differences = value;
        self
    }

    pub fn orphan_match_threshold(mut self, value: f64) -> Self {
        self.options.orphan_match_threshold = value;
        self
    }

    /// Diff every match of `expression` as one word.
    ///
    /// The expression is compiled when the diff runs; an invalid one makes
    /// [`HtmlDiff::build`] fail.
    pub fn add_block_expression(mut self, expression: impl Into<String>) -> Self {
        self.options.block_expressions.push(expression.into());
        self
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Run the diff and render the annotated HTML.
    ///
    /// Identical inputs are returned unchanged without being tokenized.
    pub fn build(&self) -> Result<String> {
        self.options.validate()?;

        if self.old_text == self.new_text {
            trace!("inputs are identical");
            return Ok(self.new_text.to_string());
        }

        let (old_words, new_words) = self.words()?;
        let operations = plan_words(&old_words, &new_words, &self.options);
        Ok(render(&old_words, &new_words, &operations))
    }

    /// The planned edit script, as ranges over the word lists of both inputs.
    pub fn operations(&self) -> Result<Vec<Operation>> {
        self.options.validate()?;
        let (old_words, new_words) = self.words()?;
        Ok(plan_words(&old_words, &new_words, &self.options))
    }

    fn words(&self) -> Result<(Vec<&'a str>, Vec<&'a str>)> {
        let blocks = BlockExpressions::compile(&self.options.block_expressions)?;
        let old_blocks = find_blocks(self.old_text, &blocks)?;
        let new_blocks = find_blocks(self.new_text, &blocks)?;
        Ok((
            split_words(self.old_text, &old_blocks),
            split_words(self.new_text, &new_blocks),
        ))
    }
}

fn plan_words(old_words: &[&str], new_words: &[&str], options: &DiffOptions) -> Vec<Operation> {
    debug!(
        old_words = old_words.len(),
        new_words = new_words.len(),
        "diffing"
    );

    let matcher = Matcher::new(
        old_words,
        new_words,
        options.match_granularity_maximum,
        options.repeating_words_accuracy,
        options.ignore_whitespace_differences,
    );
    let mut matches = matcher.find_matching_blocks();
    debug!(
        matches = matches.len(),
        granularity = matcher.granularity(),
        "found matching blocks"
    );

    matches.push(Match::sentinel(old_words.len(), new_words.len()));

    if options.orphan_match_threshold > 0.0 {
        matches = remove_orphans(
            &matches,
            old_words,
            new_words,
            options.orphan_match_threshold,
        );
        debug!(kept = matches.len() - 1, "removed orphan matches");
    }

    let operations = plan_operations(&matches);
    debug!(operations = operations.len(), "planned edit script");
    operations
}

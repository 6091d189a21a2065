//! # html-word-diff
//!
//! Word-level diffing of HTML fragments.
//!
//! Both inputs are split into words (text runs, whitespace runs, tags and
//! entities), matched with a block-indexed longest-run search, and the
//! resulting edit script is rendered back to HTML:
//! - **Insertions**: `<ins class="diffins">…</ins>`
//! - **Deletions**: `<del class="diffdel">…</del>`
//! - **Replacements**: `<del class="diffmod">…</del><ins class="diffmod">…</ins>`
//! - **Formatting-only changes**: `<ins class="mod">…</ins>` inside the new
//!   formatting tags
//!
//! Existing tags are never wrapped, so the output keeps the structure of the
//! inputs wherever it can.
//!
//! ## Example
//!
//! ```
//! use html_word_diff::diff_html;
//!
//! let html = diff_html("a b c", "a d c");
//! assert_eq!(
//!     html,
//!     r#"a <del class="diffmod">b</del><ins class="diffmod">d</ins> c"#
//! );
//! ```
//!
//! Options and block expressions go through [`HtmlDiff`]:
//!
//! ```
//! use html_word_diff::HtmlDiff;
//!
//! let html = HtmlDiff::new("released 1 Jan 2016", "released 22 Feb 2017")
//!     .add_block_expression(r"\d{1,2}\s*(Jan|Feb)\s*\d{4}")
//!     .build()?;
//! assert_eq!(
//!     html,
//!     r#"released<del class="diffmod"> 1 Jan 2016</del><ins class="diffmod"> 22 Feb 2017</ins>"#
//! );
//! # Ok::<(), html_word_diff::Error>(())
//! ```

#[macro_use]
mod macros;

pub mod classify;
mod config;
mod diff;
mod matcher;
mod orphans;
mod plan;
mod render;
mod tokenize;

pub use config::{DiffConfig, DiffOptions};
pub use diff::{HtmlDiff, diff_html};
pub use matcher::{Match, MatchOptions, MatchRange, Matcher};
pub use orphans::remove_orphans;
pub use plan::{Action, Operation, plan_operations};
pub use render::{
    DEL_CLASS, FORMATTING_CLOSE, FORMATTING_OPEN, INS_CLASS, MOD_CLASS, render,
};
pub use tokenize::{BlockExpressions, find_blocks, tokenize};

/// Error type for html-word-diff operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two block expressions matched overlapping spans of the same input
    #[error(
        "block expression `{expression}` matches text at byte {offset} that is already grouped by another expression"
    )]
    OverlappingBlocks { expression: String, offset: usize },

    /// A block expression is not a valid regular expression
    #[error("invalid block expression `{expression}`: {source}")]
    InvalidBlockExpression {
        expression: String,
        #[source]
        source: regex::Error,
    },

    /// An option is outside of its allowed domain
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// Configuration document failed to parse
    #[error("config parse error: {0}")]
    Config(String),

    /// Configuration file could not be read
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for html-word-diff operations.
pub type Result<T> = std::result::Result<T, Error>;

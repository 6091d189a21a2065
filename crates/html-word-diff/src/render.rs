//! Rendering of an edit script back to HTML.
//!
//! Changed words are wrapped in `<ins>`/`<del>`, but tags are never put
//! inside the wrappers: a changed range is cut into runs of text (wrapped)
//! and runs of tags (emitted as they are). Formatting tags added or removed
//! around unchanged text get a single `<ins class="mod">` annotation.

use crate::classify::{formatting_closing_tag, formatting_opening_tag, is_tag};
use crate::plan::{Action, Operation};

/// Class of pure insertions.
pub const INS_CLASS: &str = "diffins";
/// Class of pure deletions.
pub const DEL_CLASS: &str = "diffdel";
/// Class of both halves of a replacement.
pub const MOD_CLASS: &str = "diffmod";

/// Opens the annotation around text whose formatting changed.
pub const FORMATTING_OPEN: &str = r#"<ins class="mod">"#;
/// Closes the annotation around text whose formatting changed.
pub const FORMATTING_CLOSE: &str = "</ins>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    Ins,
    Del,
}

impl Wrapper {
    fn tag(self) -> &'static str {
        match self {
            Wrapper::Ins => "ins",
            Wrapper::Del => "del",
        }
    }
}

/// Render `operations` over the two word lists into annotated HTML.
pub fn render(old: &[&str], new: &[&str], operations: &[Operation]) -> String {
    let capacity = new.iter().map(|word| word.len()).sum::<usize>();
    let mut renderer = Renderer {
        old,
        new,
        content: String::with_capacity(capacity),
        formatting_stack: Vec::new(),
    };

    for operation in operations {
        renderer.perform_operation(operation);
    }

    renderer.finish()
}

struct Renderer<'r, 'a> {
    old: &'r [&'a str],
    new: &'r [&'a str],
    content: String,
    /// Formatting elements opened by a changed range and not closed yet
    formatting_stack: Vec<&'static str>,
}

impl<'r, 'a> Renderer<'r, 'a> {
    fn perform_operation(&mut self, operation: &Operation) {
        match operation.action {
            Action::Equal => self.process_equal(operation),
            Action::Delete => self.process_delete(operation, DEL_CLASS),
            Action::Insert => self.process_insert(operation, INS_CLASS),
            Action::Replace => self.process_replace(operation),
            Action::None => {}
        }
    }

    fn process_replace(&mut self, operation: &Operation) {
        self.process_delete(operation, MOD_CLASS);
        self.process_insert(operation, MOD_CLASS);
    }

    fn process_insert(&mut self, operation: &Operation, css_class: &str) {
        let new = self.new;
        self.insert_tag(Wrapper::Ins, css_class, operation.new_words(new));
    }

    fn process_delete(&mut self, operation: &Operation, css_class: &str) {
        let old = self.old;
        self.insert_tag(Wrapper::Del, css_class, operation.old_words(old));
    }

    fn process_equal(&mut self, operation: &Operation) {
        let new = self.new;
        for word in operation.new_words(new) {
            self.content.push_str(word);
        }
    }

    /// Wrap `words` in `wrapper` without putting any tag inside a wrapper.
    ///
    /// This still doesn't guarantee valid HTML (think of diffing text that
    /// itself contains ins or del tags) but handles most real content.
    fn insert_tag(&mut self, wrapper: Wrapper, css_class: &str, mut words: &[&str]) {
        while !words.is_empty() {
            let non_tags = extract_consecutive_words(&mut words, |word| !is_tag(word));

            let mut injection: Option<&'static str> = None;
            let mut injection_is_before = false;

            if !non_tags.is_empty() {
                self.wrap_text(wrapper, css_class, non_tags);
            } else if let Some(name) = formatting_opening_tag(words[0]) {
                // element names only, so openers with attributes still pair
                self.formatting_stack.push(name);
                injection = Some(FORMATTING_OPEN);

                if wrapper == Wrapper::Del {
                    // the insert side renders these; following openers go too
                    words = &words[1..];
                    skip_while(&mut words, |word| formatting_opening_tag(word).is_some());
                }
            } else if formatting_closing_tag(words[0]).is_some() {
                let opening = self.formatting_stack.pop();
                let outermost = words.last().and_then(|word| formatting_closing_tag(word));

                if opening.is_some() && opening == outermost {
                    injection = Some(FORMATTING_CLOSE);
                    injection_is_before = true;
                } else {
                    trace!(?opening, ?outermost, "unpaired formatting close");
                }

                if wrapper == Wrapper::Del {
                    words = &words[1..];
                    skip_while(&mut words, |word| formatting_closing_tag(word).is_some());
                }
            }

            if words.is_empty() && injection.is_none() {
                break;
            }

            let tags = extract_consecutive_words(&mut words, is_tag);
            let injection = injection.unwrap_or_default();
            if injection_is_before {
                self.content.push_str(injection);
                self.push_words(tags);
            } else {
                self.push_words(tags);
                self.content.push_str(injection);
            }
        }
    }

    fn wrap_text(&mut self, wrapper: Wrapper, css_class: &str, words: &[&str]) {
        let tag = wrapper.tag();
        self.content.push('<');
        self.content.push_str(tag);
        self.content.push_str(" class=\"");
        self.content.push_str(css_class);
        self.content.push_str("\">");
        self.push_words(words);
        self.content.push_str("</");
        self.content.push_str(tag);
        self.content.push('>');
    }

    /// Append a run of words. A single leading space becomes `&nbsp;` so it
    /// survives HTML whitespace collapsing.
    fn push_words(&mut self, words: &[&str]) {
        for (i, word) in words.iter().enumerate() {
            if i == 0 && *word == " " {
                self.content.push_str("&nbsp;");
            } else {
                self.content.push_str(word);
            }
        }
    }

    fn finish(self) -> String {
        if !self.formatting_stack.is_empty() {
            debug!(
                unclosed = ?self.formatting_stack,
                "formatting tags left open after rendering"
            );
        }
        self.content
    }
}

/// Split off the leading run of words satisfying `condition`.
fn extract_consecutive_words<'w, 'a>(
    words: &mut &'w [&'a str],
    condition: impl Fn(&str) -> bool,
) -> &'w [&'a str] {
    let end = words
        .iter()
        .position(|word| !condition(*word))
        .unwrap_or(words.len());
    let (run, rest) = words.split_at(end);
    *words = rest;
    run
}

fn skip_while(words: &mut &[&str], condition: impl Fn(&str) -> bool) {
    extract_consecutive_words(words, condition);
}

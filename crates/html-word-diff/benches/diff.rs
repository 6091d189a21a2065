//! Benchmarks for HTML word diffing
//!
//! Run with: cargo bench -p html-word-diff --bench diff

use divan::{Bencher, black_box};
use html_word_diff::{BlockExpressions, HtmlDiff, diff_html, tokenize};

fn main() {
    divan::main();
}

// ============================================================================
// Document generators
// ============================================================================

/// A documentation-like page with `sections` sections of `paragraphs` paragraphs.
///
/// `revision` changes a few words in every section so that two revisions
/// share most of their text.
fn generate_page(sections: usize, paragraphs: usize, revision: usize) -> String {
    let mut html = String::from("<article>\n");
    for section in 0..sections {
        html.push_str(&format!("<h2 id=\"section-{section}\">Section {section}</h2>\n"));
        for paragraph in 0..paragraphs {
            let verb = if (section + paragraph + revision) % 7 == 0 {
                "rewrites"
            } else {
                "renders"
            };
            html.push_str(&format!(
                "<p>The engine {verb} paragraph {paragraph} of section {section} with <strong>bold</strong> \
                 and <em>emphasis</em>, plus an entity &amp; a link <a href=\"/docs/{section}\">here</a>.</p>\n"
            ));
        }
    }
    html.push_str("</article>\n");
    html
}

fn large_attribute(extra: &str) -> String {
    let payload = "cattestingstring".repeat(10_000);
    format!(r#"<p data-test="{payload}{extra}">contnent{extra}</p>"#)
}

// ============================================================================
// Tokenization
// ============================================================================

#[divan::bench(args = [10, 50])]
fn tokenize_page(bencher: Bencher, sections: usize) {
    let page = generate_page(sections, 10, 0);
    let blocks = BlockExpressions::new();
    bencher.bench(|| black_box(tokenize(&page, &blocks)));
}

// ============================================================================
// Full diff
// ============================================================================

#[divan::bench]
fn diff_large_attribute(bencher: Bencher) {
    let old = large_attribute("");
    let new = large_attribute("cat");
    bencher.bench(|| black_box(diff_html(&old, &new)));
}

#[divan::bench(args = [5, 20, 50])]
fn diff_revised_page(bencher: Bencher, sections: usize) {
    let old = generate_page(sections, 10, 0);
    let new = generate_page(sections, 10, 3);
    bencher.bench(|| black_box(diff_html(&old, &new)));
}

#[divan::bench]
fn diff_revised_page_word_by_word(bencher: Bencher) {
    let old = generate_page(5, 10, 0);
    let new = generate_page(5, 10, 3);
    bencher.bench(|| {
        black_box(
            HtmlDiff::new(&old, &new)
                .match_granularity_maximum(1)
                .build(),
        )
    });
}

#[divan::bench]
fn diff_with_orphan_removal(bencher: Bencher) {
    let old = generate_page(20, 10, 0);
    let new = generate_page(20, 10, 3);
    bencher.bench(|| {
        black_box(
            HtmlDiff::new(&old, &new)
                .orphan_match_threshold(0.2)
                .build(),
        )
    });
}

#[divan::bench]
fn diff_identical_page(bencher: Bencher) {
    let page = generate_page(50, 10, 0);
    bencher.bench(|| black_box(diff_html(&page, &page)));
}

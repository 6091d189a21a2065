//! Orphan match removal.
//!
//! A short match far from its neighbours is more likely coincidence than a
//! real correspondence ("the", a lone space). Dropping it merges the gaps on
//! both sides into one larger change.

use crate::matcher::Match;

/// Drop matches whose length is small relative to the gap around them.
///
/// `matches` must be ordered and end with the zero-size sentinel. A match
/// touching either neighbour in both lists is always kept, as is the final
/// match. Otherwise it survives only if its character length in `new` exceeds
/// `threshold` times the larger of the old and new gaps between its
/// neighbours.
pub fn remove_orphans(matches: &[Match], old: &[&str], new: &[&str], threshold: f64) -> Vec<Match> {
    let Some((&first, rest)) = matches.split_first() else {
        return Vec::new();
    };

    let mut kept = Vec::with_capacity(matches.len());
    let mut prev = Match::default();
    let mut curr = first;

    for &next in rest {
        let touches_prev =
            prev.end_in_old() == curr.start_in_old && prev.end_in_new() == curr.start_in_new;
        let touches_next =
            curr.end_in_old() == next.start_in_old && curr.end_in_new() == next.start_in_new;

        if touches_prev || touches_next {
            kept.push(curr);
        } else {
            let old_distance = chars_in(&old[prev.end_in_old()..next.start_in_old]);
            let new_distance = chars_in(&new[prev.end_in_new()..next.start_in_new]);
            let curr_length = chars_in(curr.new_words(new));

            if curr_length as f64 > old_distance.max(new_distance) as f64 * threshold {
                kept.push(curr);
            } else {
                trace!(?curr, curr_length, old_distance, new_distance, "dropping orphan match");
            }
        }

        prev = curr;
        curr = next;
    }

    // the last match is the end sentinel
    kept.push(curr);
    kept
}

fn chars_in(words: &[&str]) -> usize {
    words.iter().map(|word| word.chars().count()).sum()
}

//! Edit script planning.

use crate::matcher::Match;

/// What an [`Operation`] does with its ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Both ranges hold the same words
    Equal,
    /// Words only present in the new range
    Insert,
    /// Words only present in the old range
    Delete,
    /// The old range was replaced by the new range
    Replace,
    /// Nothing to report
    None,
}

/// One edit instruction over half-open ranges of both word lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    pub action: Action,
    pub start_in_old: usize,
    pub end_in_old: usize,
    pub start_in_new: usize,
    pub end_in_new: usize,
}

impl Operation {
    pub fn new(
        action: Action,
        start_in_old: usize,
        end_in_old: usize,
        start_in_new: usize,
        end_in_new: usize,
    ) -> Self {
        Self {
            action,
            start_in_old,
            end_in_old,
            start_in_new,
            end_in_new,
        }
    }

    pub fn old_words<'w>(&self, old: &'w [&'w str]) -> &'w [&'w str] {
        &old[self.start_in_old..self.end_in_old]
    }

    pub fn new_words<'w>(&self, new: &'w [&'w str]) -> &'w [&'w str] {
        &new[self.start_in_new..self.end_in_new]
    }
}

/// Turn ordered matches into an edit script.
///
/// The gap before each match becomes an insert, delete or replace depending
/// on which side it is non-empty; the match itself becomes an equal
/// operation. With the end sentinel as the last match, the operations tile
/// both word lists completely.
pub fn plan_operations(matches: &[Match]) -> Vec<Operation> {
    let mut position_in_old = 0;
    let mut position_in_new = 0;
    let mut operations = Vec::with_capacity(matches.len() * 2);

    for m in matches {
        let starts_at_old = position_in_old == m.start_in_old;
        let starts_at_new = position_in_new == m.start_in_new;

        let action = match (starts_at_old, starts_at_new) {
            (false, false) => Action::Replace,
            (true, false) => Action::Insert,
            (false, true) => Action::Delete,
            (true, true) => Action::None,
        };

        if action != Action::None {
            let gap = Operation::new(
                action,
                position_in_old,
                m.start_in_old,
                position_in_new,
                m.start_in_new,
            );
            trace!(?gap, "planned change");
            operations.push(gap);
        }

        if m.size != 0 {
            operations.push(Operation::new(
                Action::Equal,
                m.start_in_old,
                m.end_in_old(),
                m.start_in_new,
                m.end_in_new(),
            ));
        }

        position_in_old = m.end_in_old();
        position_in_new = m.end_in_new();
    }

    operations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_lists() {
        let ops = plan_operations(&[Match::new(0, 0, 3), Match::sentinel(3, 3)]);
        assert_eq!(ops, vec![Operation::new(Action::Equal, 0, 3, 0, 3)]);
    }

    #[test]
    fn test_both_empty() {
        assert!(plan_operations(&[Match::sentinel(0, 0)]).is_empty());
    }

    #[test]
    fn test_no_matches_is_one_replace() {
        let ops = plan_operations(&[Match::sentinel(2, 5)]);
        assert_eq!(ops, vec![Operation::new(Action::Replace, 0, 2, 0, 5)]);
    }

    #[test]
    fn test_pure_insert_and_delete() {
        assert_eq!(
            plan_operations(&[Match::sentinel(0, 4)]),
            vec![Operation::new(Action::Insert, 0, 0, 0, 4)]
        );
        assert_eq!(
            plan_operations(&[Match::sentinel(4, 0)]),
            vec![Operation::new(Action::Delete, 0, 4, 0, 0)]
        );
    }

    #[test]
    fn test_gaps_between_matches() {
        // a c -> a b c
        let ops = plan_operations(&[Match::new(0, 0, 2), Match::new(2, 4, 1), Match::sentinel(3, 5)]);
        assert_eq!(
            ops,
            vec![
                Operation::new(Action::Equal, 0, 2, 0, 2),
                Operation::new(Action::Insert, 2, 2, 2, 4),
                Operation::new(Action::Equal, 2, 3, 4, 5),
            ]
        );
    }

    #[test]
    fn test_operation_words() {
        let old = ["a", " ", "b"];
        let new = ["a", " ", "c"];
        let op = Operation::new(Action::Replace, 2, 3, 2, 3);
        assert_eq!(op.old_words(&old), ["b"]);
        assert_eq!(op.new_words(&new), ["c"]);
    }
}

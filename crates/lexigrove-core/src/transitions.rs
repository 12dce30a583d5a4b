//! Word status transition table.
//!
//! Every `(status, event)` pair maps either to a next status or to a
//! rejection. The table is total; callers never guess.
//!
//! | status   | `Known`  | `Forgot` | `Cycle`  |
//! |----------|----------|----------|----------|
//! | new      | learning | learning | learning |
//! | learning | mastered | review   | mastered |
//! | review   | mastered | —        | mastered |
//! | mastered | —        | review   | review   |
//!
//! `Known`/`Forgot` come from a flashcard session, `Cycle` from clicking a
//! word's status badge in the word list.

use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;
use crate::models::WordStatus;

/// Something the learner did to a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEvent {
    Known,
    Forgot,
    Cycle,
}

impl fmt::Display for ReviewEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReviewEvent::Known => "known",
            ReviewEvent::Forgot => "forgot",
            ReviewEvent::Cycle => "cycle",
        })
    }
}

impl FromStr for ReviewEvent {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "known" => Ok(ReviewEvent::Known),
            "forgot" => Ok(ReviewEvent::Forgot),
            "cycle" => Ok(ReviewEvent::Cycle),
            _ => Err(StoreError::InvalidValue {
                field: "event".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Next status for `event`, or `None` when the pair is rejected.
pub fn next_status(current: WordStatus, event: ReviewEvent) -> Option<WordStatus> {
    use ReviewEvent::*;
    use WordStatus::*;

    match (current, event) {
        (New, Known | Forgot | Cycle) => Some(Learning),
        (Learning, Known | Cycle) => Some(Mastered),
        (Learning, Forgot) => Some(Review),
        (Review, Known | Cycle) => Some(Mastered),
        (Review, Forgot) => None,
        (Mastered, Known) => None,
        (Mastered, Forgot | Cycle) => Some(Review),
    }
}

/// Result of applying a [`ReviewEvent`] to a stored word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Moved { from: WordStatus, to: WordStatus },
    /// The table has no edge for this pair; the word was left alone.
    Rejected { status: WordStatus },
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReviewEvent::*;
    use WordStatus::*;

    #[test]
    fn test_every_cell_matches_table() {
        let table = [
            (New, Known, Some(Learning)),
            (New, Forgot, Some(Learning)),
            (New, Cycle, Some(Learning)),
            (Learning, Known, Some(Mastered)),
            (Learning, Forgot, Some(Review)),
            (Learning, Cycle, Some(Mastered)),
            (Review, Known, Some(Mastered)),
            (Review, Forgot, None),
            (Review, Cycle, Some(Mastered)),
            (Mastered, Known, None),
            (Mastered, Forgot, Some(Review)),
            (Mastered, Cycle, Some(Review)),
        ];
        assert_eq!(table.len(), WordStatus::ALL.len() * 3);
        for (status, event, expected) in table {
            assert_eq!(
                next_status(status, event),
                expected,
                "{status} --{event}-->"
            );
        }
    }

    #[test]
    fn test_forward_path() {
        assert_eq!(next_status(New, Known), Some(Learning));
        assert_eq!(next_status(Learning, Known), Some(Mastered));
    }

    #[test]
    fn test_review_reachable_from_mastered_and_learning() {
        assert_eq!(next_status(Mastered, Forgot), Some(Review));
        assert_eq!(next_status(Learning, Forgot), Some(Review));
        assert_eq!(next_status(Review, Known), Some(Mastered));
    }

    #[test]
    fn test_rejected_pairs() {
        assert_eq!(next_status(Mastered, Known), None);
        assert_eq!(next_status(Review, Forgot), None);
    }

    #[test]
    fn test_cycle_loops_mastered_and_review() {
        assert_eq!(next_status(Mastered, Cycle), Some(Review));
        assert_eq!(next_status(Review, Cycle), Some(Mastered));
    }

    #[test]
    fn test_event_parse() {
        assert_eq!("Known".parse::<ReviewEvent>().unwrap(), Known);
        assert!("maybe".parse::<ReviewEvent>().is_err());
    }
}

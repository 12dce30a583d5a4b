//! Flashcard deck selection and status counts.

use serde::Serialize;

use crate::models::{WordItem, WordStatus};

pub const DEFAULT_DECK_SIZE: usize = 10;

/// Words never studied, in the order they were added.
pub fn new_deck(words: &[WordItem], limit: usize) -> Vec<&WordItem> {
    words
        .iter()
        .filter(|w| w.status == WordStatus::New)
        .take(limit)
        .collect()
}

/// `learning` and `review` words, least recently reviewed first. Words
/// never reviewed sort as oldest. Mastered words are excluded.
pub fn review_deck(words: &[WordItem], limit: usize) -> Vec<&WordItem> {
    let mut due: Vec<&WordItem> = words
        .iter()
        .filter(|w| matches!(w.status, WordStatus::Learning | WordStatus::Review))
        .collect();
    due.sort_by_key(|w| w.last_reviewed_at.unwrap_or(0));
    due.truncate(limit);
    due
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStats {
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub review: usize,
    pub mastered: usize,
}

impl WordStats {
    pub fn from_words(words: &[WordItem]) -> Self {
        let mut stats = WordStats {
            total: words.len(),
            ..Default::default()
        };
        for w in words {
            match w.status {
                WordStatus::New => stats.new += 1,
                WordStatus::Learning => stats.learning += 1,
                WordStatus::Review => stats.review += 1,
                WordStatus::Mastered => stats.mastered += 1,
            }
        }
        stats
    }

    /// Size of the pool [`review_deck`] draws from.
    pub fn due_for_review(&self) -> usize {
        self.learning + self.review
    }
}

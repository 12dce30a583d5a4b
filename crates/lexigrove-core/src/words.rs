//! Word repository operations.
//!
//! The repository is an ordered `Vec<WordItem>` with one invariant: no two
//! items share the same lowercase word text. Every function here keeps it.
//!
//! Mutations that have nothing to do (empty text, duplicate, unknown id)
//! return `None`/`false` instead of an error.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{Millis, WordEnrichment, WordItem, WordStatus};

/// Create a fresh `new` item for already-trimmed text.
pub fn new_word_item(text: &str, now: Millis) -> WordItem {
    WordItem {
        id: Uuid::new_v4().to_string(),
        word: text.to_string(),
        status: WordStatus::New,
        added_at: now,
        last_reviewed_at: None,
        mastered_at: None,
        learning_count: 0,
        enrichment: WordEnrichment::default(),
    }
}

/// Case-insensitive lookup by word text.
pub fn find_by_text<'a>(words: &'a [WordItem], text: &str) -> Option<&'a WordItem> {
    let key = text.trim().to_lowercase();
    words.iter().find(|w| w.key() == key)
}

pub fn find_by_id<'a>(words: &'a [WordItem], id: &str) -> Option<&'a WordItem> {
    words.iter().find(|w| w.id == id)
}

/// Append a word. Returns the new id, or `None` if the trimmed text is
/// empty or already present (ignoring case).
pub fn add_word(words: &mut Vec<WordItem>, text: &str, now: Millis) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || find_by_text(words, trimmed).is_some() {
        return None;
    }
    let item = new_word_item(trimmed, now);
    let id = item.id.clone();
    words.push(item);
    Some(id)
}

/// Append many words in input order. Duplicates are checked against the
/// repository and against earlier entries of the same batch.
pub fn add_words_bulk<S: AsRef<str>>(
    words: &mut Vec<WordItem>,
    texts: &[S],
    now: Millis,
) -> Vec<String> {
    let mut seen: HashSet<String> = words.iter().map(WordItem::key).collect();
    let mut added = Vec::new();
    for text in texts {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() || !seen.insert(trimmed.to_lowercase()) {
            continue;
        }
        let item = new_word_item(trimmed, now);
        added.push(item.id.clone());
        words.push(item);
    }
    added
}

/// Set a status. Always stamps `last_reviewed_at` and bumps
/// `learning_count`; stamps `mastered_at` only when moving to `mastered`
/// and never clears it.
pub fn update_word_status(
    words: &mut [WordItem],
    id: &str,
    status: WordStatus,
    now: Millis,
) -> bool {
    let Some(item) = words.iter_mut().find(|w| w.id == id) else {
        return false;
    };
    item.status = status;
    item.last_reviewed_at = Some(now);
    item.learning_count += 1;
    if status == WordStatus::Mastered {
        item.mastered_at = Some(now);
    }
    true
}

/// Shallow-merge generated content onto a word.
pub fn update_word_content(words: &mut [WordItem], id: &str, content: &WordEnrichment) -> bool {
    match words.iter_mut().find(|w| w.id == id) {
        Some(item) => {
            item.enrichment.merge_from(content);
            true
        }
        None => false,
    }
}

pub fn delete_word(words: &mut Vec<WordItem>, id: &str) -> bool {
    let before = words.len();
    words.retain(|w| w.id != id);
    words.len() != before
}

/// Words that still lack a sentence, meaning, or pronunciation.
pub fn words_needing_enrichment(words: &[WordItem]) -> Vec<&WordItem> {
    words.iter().filter(|w| !w.enrichment.is_complete()).collect()
}

/// Split pasted text on newlines and commas, dropping blanks.
pub fn split_bulk_input(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

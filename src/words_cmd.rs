//! `grove word …` commands.
//!
//! Words are addressed by id or by their text (case-insensitive), so
//! `grove word answer Serendipity known` works without looking up the id.

use std::path::Path;

use anyhow::{bail, Context, Result};
use lexigrove_core::models::{WordItem, WordStatus};
use lexigrove_core::transitions::{ReviewEvent, TransitionOutcome};
use lexigrove_core::words::split_bulk_input;
use lexigrove_core::LearningStore;

/// Resolve an id-or-text argument to a stored word id.
pub fn resolve_id(store: &LearningStore, key: &str) -> Result<String> {
    match store.find_word(key) {
        Some(item) => Ok(item.id.clone()),
        None => bail!("word not found: {}", key),
    }
}

pub fn run_add(store: &mut LearningStore, text: &str) -> Result<()> {
    match store.add_word(text)? {
        Some(id) => println!("Added '{}' ({})", text.trim(), id),
        None => println!("Skipped '{}': blank or already in the list", text.trim()),
    }
    Ok(())
}

/// Add many words from inline text and/or a file (comma or newline separated).
pub fn run_bulk(store: &mut LearningStore, text: Option<&str>, file: Option<&Path>) -> Result<()> {
    let mut input = String::new();
    if let Some(text) = text {
        input.push_str(text);
        input.push('\n');
    }
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list: {}", path.display()))?;
        input.push_str(&content);
    }
    if input.trim().is_empty() {
        bail!("no words given (pass them inline or with --file)");
    }

    let parts = split_bulk_input(&input);
    let added = store.add_words_bulk(&parts)?;
    println!(
        "Added {} of {} words ({} skipped)",
        added.len(),
        parts.len(),
        parts.len() - added.len()
    );
    Ok(())
}

pub fn run_list(store: &LearningStore, status: Option<WordStatus>) -> Result<()> {
    let words: Vec<&WordItem> = store
        .words()
        .iter()
        .filter(|w| status.map_or(true, |s| w.status == s))
        .collect();

    if words.is_empty() {
        println!("No words.");
        return Ok(());
    }
    for item in words {
        print_word_line(item);
    }
    Ok(())
}

pub(crate) fn print_word_line(item: &WordItem) {
    let meaning = item.enrichment.meaning.as_deref().unwrap_or("");
    println!(
        "{}  {:<9} {:>3}  {}  {}",
        item.id, item.status.as_str(), item.learning_count, item.word, meaning
    );
}

pub fn run_status(store: &mut LearningStore, key: &str, status: WordStatus) -> Result<()> {
    let id = resolve_id(store, key)?;
    store.update_word_status(&id, status)?;
    println!("'{}' is now {}", key, status);
    Ok(())
}

pub fn run_answer(store: &mut LearningStore, key: &str, event: ReviewEvent) -> Result<()> {
    let id = resolve_id(store, key)?;
    match store.apply_review_event(&id, event)? {
        TransitionOutcome::Moved { from, to } => println!("'{}': {} -> {}", key, from, to),
        TransitionOutcome::Rejected { status } => {
            println!("'{}' stays {} ({} does not apply)", key, status, event)
        }
        TransitionOutcome::NotFound => bail!("word not found: {}", key),
    }
    Ok(())
}

pub fn run_delete(store: &mut LearningStore, key: &str) -> Result<()> {
    let id = resolve_id(store, key)?;
    store.delete_word(&id)?;
    println!("Deleted '{}'", key);
    Ok(())
}

/// Words still waiting for a generated sentence.
pub fn run_pending(store: &LearningStore) -> Result<()> {
    let pending = store.words_needing_enrichment();
    if pending.is_empty() {
        println!("Every word has a sentence.");
        return Ok(());
    }
    for item in pending {
        println!("{}", item.word);
    }
    Ok(())
}

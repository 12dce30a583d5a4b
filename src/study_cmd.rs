//! `grove study …`: flashcard decks and status counts.

use anyhow::Result;
use lexigrove_core::models::WordItem;
use lexigrove_core::LearningStore;

use crate::words_cmd::print_word_line;

fn print_deck(title: &str, deck: &[&WordItem]) {
    if deck.is_empty() {
        println!("{}: nothing to study.", title);
        return;
    }
    println!("{} ({} words)", title, deck.len());
    for item in deck {
        print_word_line(item);
    }
}

pub fn run_new(store: &LearningStore, limit: usize) -> Result<()> {
    print_deck("New words", &store.new_deck(limit));
    Ok(())
}

pub fn run_review(store: &LearningStore, limit: usize) -> Result<()> {
    print_deck("Review", &store.review_deck(limit));
    Ok(())
}

pub fn run_stats(store: &LearningStore, json: bool) -> Result<()> {
    let stats = store.word_stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    println!("  Total:     {}", stats.total);
    println!("  New:       {}", stats.new);
    println!("  Learning:  {}", stats.learning);
    println!("  Review:    {}", stats.review);
    println!("  Mastered:  {}", stats.mastered);
    println!("  Due:       {}", stats.due_for_review());
    Ok(())
}

//! Learning-state overview.
//!
//! A quick summary of the store: word counts per status, script count, the
//! growth tree, and the busiest topic fields. Used by `grove stats`.

use anyhow::Result;
use lexigrove_core::growth::{richness, GrowthPhase, MAX_STAGE};
use lexigrove_core::models::Millis;
use lexigrove_core::LearningStore;

use crate::config::Config;

/// Run the stats command: summarize the store and print it.
pub fn run_stats(config: &Config, store: &LearningStore, now: Millis) -> Result<()> {
    let stats = store.word_stats();
    let growth = store.growth();
    let file_size = std::fs::metadata(&config.storage.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Lexigrove — Learning Stats");
    println!("==========================");
    println!();
    println!("  State file:  {}", config.storage.path.display());
    println!("  Size:        {}", format_bytes(file_size));
    println!();
    println!("  Words:       {}", stats.total);
    println!(
        "    new {} · learning {} · review {} · mastered {}",
        stats.new, stats.learning, stats.review, stats.mastered
    );
    println!("  Scripts:     {}", store.scripts().len());
    println!();
    println!(
        "  Tree:        {} (stage {}/{}), {} grown, richness {}",
        GrowthPhase::of_stage(growth.current_stage).name(),
        growth.current_stage,
        MAX_STAGE,
        growth.total_trees,
        richness(growth)
    );
    let last = if growth.last_activity_date > 0 {
        format_relative_days(now - growth.last_activity_date)
    } else {
        "never".to_string()
    };
    println!("  Last active: {}", last);

    let mut ledger: Vec<(&String, &u64)> = store.topic_usage().iter().collect();
    if !ledger.is_empty() {
        ledger.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        println!();
        println!("  Topic usage:");
        println!("  {:<20} {:>6}", "FIELD", "USES");
        println!("  {}", "-".repeat(27));
        for (field, count) in ledger {
            println!("  {:<20} {:>6}", field, count);
        }
    }

    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Format an elapsed span in milliseconds as "today", "1 day ago", …
fn format_relative_days(elapsed: Millis) -> String {
    let days = chrono::Duration::milliseconds(elapsed).num_days();
    match days {
        d if d <= 0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        d => format!("{} days ago", d),
    }
}

//! `grove topics …`: the topic usage ledger and what to focus on next.

use anyhow::Result;
use lexigrove_core::topics::{usage_of, SCRIPT_FIELDS, SENTENCE_FIELDS};
use lexigrove_core::LearningStore;

/// Usage count of every known profile field, then any other recorded keys.
pub fn run_show(store: &LearningStore) -> Result<()> {
    let ledger = store.topic_usage();
    let mut known: Vec<&str> = SENTENCE_FIELDS.to_vec();
    for field in SCRIPT_FIELDS {
        if !known.contains(&field) {
            known.push(field);
        }
    }
    for field in &known {
        println!("  {:<18} {}", field, usage_of(ledger, field));
    }
    for (field, count) in ledger {
        if !known.contains(&field.as_str()) {
            println!("  {:<18} {}", field, count);
        }
    }
    Ok(())
}

/// Fields the next sentence batch and script should lean on.
pub fn run_focus(store: &LearningStore) -> Result<()> {
    let focus = store.sentence_focus();
    let avoid = store.sentence_avoid();
    let script = store.script_focus();

    println!("Sentences");
    println!("  focus:  {}", focus.join(", "));
    if avoid.is_empty() {
        println!("  avoid:  (none)");
    } else {
        println!("  avoid:  {}", avoid.join(", "));
    }
    println!("Script");
    println!("  primary:    {}", script.primary);
    println!("  secondary:  {}", script.secondary);
    Ok(())
}

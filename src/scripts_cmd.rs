//! `grove script …`: list, inspect, and delete shadowing scripts.

use anyhow::{bail, Result};
use lexigrove_core::scripts::split_sentences;
use lexigrove_core::LearningStore;

pub fn run_list(store: &LearningStore, full: bool) -> Result<()> {
    let scripts = store.scripts();
    if scripts.is_empty() {
        println!("No scripts.");
        return Ok(());
    }
    let calendar = store.options().calendar;
    for script in scripts {
        println!(
            "{}  {}  [{}] {}",
            script.id,
            calendar.date_of(script.created_at),
            script.topic,
            script.title
        );
        if full {
            println!();
            println!("{}", script.content);
            println!();
            println!("{}", script.translation);
            println!("---");
        }
    }
    Ok(())
}

/// Print one script. With `step`, the content is numbered sentence by
/// sentence for listen-and-repeat practice.
pub fn run_show(store: &LearningStore, id: &str, step: bool) -> Result<()> {
    let Some(script) = store.find_script(id) else {
        bail!("script not found: {}", id);
    };
    println!("{}  [{}]", script.title, script.topic);
    println!();
    if step {
        for (i, sentence) in split_sentences(&script.content).iter().enumerate() {
            println!("{:>3}. {}", i + 1, sentence);
        }
    } else {
        println!("{}", script.content);
    }
    println!();
    println!("{}", script.translation);
    Ok(())
}

pub fn run_delete(store: &mut LearningStore, id: &str) -> Result<()> {
    if !store.delete_script(id)? {
        bail!("script not found: {}", id);
    }
    println!("Deleted script {}", id);
    Ok(())
}

/// Topics of the newest scripts, newest first.
pub fn run_topics(store: &LearningStore, count: usize) -> Result<()> {
    for topic in store.recent_topics(count) {
        println!("{}", topic);
    }
    Ok(())
}

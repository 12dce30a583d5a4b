//! `grove generate …`: apply content produced by the AI collaborator.
//!
//! The collaborator's raw JSON answer (fenced or not) is read from a file or
//! from stdin, parsed, and merged into the store in one commit.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use lexigrove_core::generation::{parse_generated_script, parse_generated_sentences};
use lexigrove_core::LearningStore;

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read generated content: {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read generated content from stdin")?;
            Ok(buf)
        }
    }
}

pub fn run_sentences(store: &mut LearningStore, file: Option<&Path>) -> Result<()> {
    let text = read_input(file)?;
    let results = parse_generated_sentences(&text)?;
    let enriched = store.apply_generated_sentences(&results)?;
    println!(
        "Enriched {} word(s) from {} generated sentence(s)",
        enriched,
        results.len()
    );
    Ok(())
}

pub fn run_script(store: &mut LearningStore, file: Option<&Path>) -> Result<()> {
    let text = read_input(file)?;
    let generated = parse_generated_script(&text)?;
    let script = store.apply_generated_script(generated)?;
    println!("Saved script '{}' ({})", script.title, script.id);
    Ok(())
}

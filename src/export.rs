//! Backup export and import.
//!
//! `grove export` writes a versioned JSON backup of the profile, words,
//! topic ledger and growth (scripts are not included). With no `--output`
//! it prints to stdout for piping; given a directory, the file is named
//! `lexigrove_backup_YYYY-MM-DD.json`.
//!
//! `grove import <file>` merges such a backup into the current state. See
//! [`lexigrove_core::backup`] for the merge rules.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use lexigrove_core::LearningStore;

/// Export the store as a backup.
///
/// If `output` is `Some`, writes to that path (or into it, when it is an
/// existing directory). Otherwise writes to stdout.
pub fn run_export(store: &LearningStore, output: Option<&Path>) -> Result<()> {
    let json = store.export_data()?;

    match output {
        Some(path) => {
            let target: PathBuf = if path.is_dir() {
                path.join(store.backup_file_name())
            } else {
                path.to_path_buf()
            };
            if let Some(parent) = target.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&target, &json)
                .with_context(|| format!("Failed to write backup: {}", target.display()))?;
            eprintln!(
                "Exported {} words to {}",
                store.words().len(),
                target.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }
    Ok(())
}

/// Merge a backup file into the store. A rejected backup is an error exit.
pub fn run_import(store: &mut LearningStore, input: &Path) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read backup: {}", input.display()))?;

    let outcome = store.import_data(&text)?;
    if !outcome.success {
        bail!("{}", outcome.message);
    }
    println!("{}", outcome.message);
    Ok(())
}

//! File-backed persistence for the learning state.
//!
//! The whole [`AppState`] lives in one JSON file. [`FileSink`] rewrites it
//! after every committed mutation: the new contents go to a temp file in
//! the same directory, which is then renamed over the old one, so a crash
//! mid-write leaves the previous state intact.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lexigrove_core::clock::SystemClock;
use lexigrove_core::models::AppState;
use lexigrove_core::{LearningStore, StateSink, StoreError};
use tempfile::NamedTempFile;

use crate::config::Config;

/// [`StateSink`] writing the state file atomically.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateSink for FileSink {
    fn persist(&self, state: &AppState) -> Result<(), StoreError> {
        write_state(&self.path, state).map_err(|e| StoreError::Persistence(format!("{:#}", e)))
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Atomically replace `path` with the JSON form of `state`.
pub fn write_state(path: &Path, state: &AppState) -> Result<()> {
    let dir = parent_dir(path);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer(&mut writer, state)?;
        writer.flush()?;
    }
    temp.persist(path)
        .with_context(|| format!("Failed to replace state file: {}", path.display()))?;
    Ok(())
}

/// Read the state file. A missing file is a fresh, empty state.
pub fn load_state(path: &Path) -> Result<AppState> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no state file yet, starting empty");
        return Ok(AppState::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("State file is not valid learning state: {}", path.display()))
}

/// Load the configured state file and wrap it in a write-through store.
pub fn open_store(config: &Config) -> Result<LearningStore> {
    let path = &config.storage.path;
    let state = load_state(path)?;
    Ok(LearningStore::new(
        state,
        Box::new(FileSink::new(path)),
        Box::new(SystemClock),
        config.store_options(),
    ))
}

//! In-memory [`StateSink`] for tests and hosts without a disk.
//!
//! Keeps every persisted snapshot behind an `Arc<RwLock<_>>`, so a clone
//! handed to a [`LearningStore`](super::LearningStore) can still be inspected
//! by the caller.

use std::sync::{Arc, RwLock};

use crate::error::StoreError;
use crate::models::AppState;

use super::StateSink;

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    snapshots: Arc<RwLock<Vec<AppState>>>,
    fail: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every write fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.snapshots.read().map(|s| s.len()).unwrap_or(0)
    }

    /// The most recently persisted state.
    pub fn last(&self) -> Option<AppState> {
        self.snapshots
            .read()
            .ok()
            .and_then(|s| s.last().cloned())
    }
}

impl StateSink for MemorySink {
    fn persist(&self, state: &AppState) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Persistence("memory sink set to fail".into()));
        }
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| StoreError::Persistence("memory sink lock poisoned".into()))?;
        snapshots.push(state.clone());
        Ok(())
    }
}

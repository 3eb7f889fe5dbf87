// src/state/memory.rs

use std::path::PathBuf;

use tracing::debug;

use crate::errors::{StateLoadError, StateSaveError};
use crate::types::DigestState;

use super::StateStore;

/// Keeps the digest state in memory only.
///
/// Useful for embedding the engine without touching disk, and in tests. A
/// store created with [`MemoryStateStore::new`] behaves like a missing file
/// until the first save.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    state: Option<DigestState>,
    saves: usize,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: DigestState) -> Self {
        Self {
            state: Some(state),
            saves: 0,
        }
    }

    /// The last saved (or seeded) state.
    pub fn state(&self) -> Option<&DigestState> {
        self.state.as_ref()
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<DigestState, StateLoadError> {
        self.state.clone().ok_or_else(|| StateLoadError::Missing {
            path: PathBuf::from("<memory>"),
        })
    }

    fn save(&mut self, state: &DigestState) -> Result<(), StateSaveError> {
        self.state = Some(state.clone());
        self.saves += 1;
        debug!(tracked = state.len(), "stored digest state (memory)");
        Ok(())
    }
}

// src/state/mod.rs

//! Persisted digest state.
//!
//! A [`StateStore`] owns the url -> digest mapping between runs. The engine
//! only ever reads a loaded copy and hands a complete replacement back to
//! [`StateStore::save`]; nothing else writes the persisted form.

pub mod json;
pub mod memory;

use tracing::{debug, info};

use crate::errors::{Result, StateLoadError, StateSaveError};
use crate::types::DigestState;

pub use json::{JsonStateStore, DEFAULT_STATE_FILE};
pub use memory::MemoryStateStore;

/// Abstract storage for the tracked resource set and its digests.
pub trait StateStore: Send {
    /// Read the persisted mapping.
    ///
    /// A missing source is reported as [`StateLoadError::Missing`]; the store
    /// never substitutes an empty state on its own.
    fn load(&self) -> std::result::Result<DigestState, StateLoadError>;

    /// Overwrite the persisted mapping with `state`.
    fn save(&mut self, state: &DigestState) -> std::result::Result<(), StateSaveError>;

    /// Like [`load`](StateStore::load), but a missing source yields an empty
    /// state. A source that exists but cannot be parsed is still an error.
    fn load_or_empty(&self) -> std::result::Result<DigestState, StateLoadError> {
        match self.load() {
            Err(StateLoadError::Missing { path }) => {
                info!(?path, "no state found; starting with an empty tracked set");
                Ok(DigestState::new())
            }
            other => other,
        }
    }

    /// Start tracking `id` with an empty placeholder digest.
    ///
    /// Returns `false` (and leaves the stored digest alone) if `id` is
    /// already tracked.
    fn add_resource(&mut self, id: &str) -> Result<bool> {
        let mut state = self.load()?;
        if state.contains_key(id) {
            debug!(url = %id, "resource already tracked");
            return Ok(false);
        }
        state.insert(id.to_string(), String::new());
        self.save(&state)?;
        info!(url = %id, "added resource");
        Ok(true)
    }

    /// Stop tracking `id`. Returns `false` if it was not tracked.
    fn remove_resource(&mut self, id: &str) -> Result<bool> {
        let mut state = self.load()?;
        if state.remove(id).is_none() {
            info!(url = %id, "resource to remove not found");
            return Ok(false);
        }
        self.save(&state)?;
        info!(url = %id, "removed resource");
        Ok(true)
    }
}

/// What [`edit_tracked`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSummary {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl EditSummary {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Apply a batch of additions and removals with a single load and save.
///
/// Additions are applied before removals, so an id named in both ends up
/// untracked. With `allow_missing`, a missing state source starts empty.
pub fn edit_tracked<S>(
    store: &mut S,
    add: &[String],
    remove: &[String],
    allow_missing: bool,
) -> Result<EditSummary>
where
    S: StateStore + ?Sized,
{
    let mut state = if allow_missing {
        store.load_or_empty()?
    } else {
        store.load()?
    };

    let mut summary = EditSummary::default();

    for id in add {
        if state.contains_key(id) {
            debug!(url = %id, "resource already tracked");
            continue;
        }
        state.insert(id.clone(), String::new());
        summary.added.push(id.clone());
        info!(url = %id, "added resource");
    }

    for id in remove {
        if state.remove(id).is_some() {
            summary.added.retain(|a| a != id);
            summary.removed.push(id.clone());
            info!(url = %id, "removed resource");
        } else {
            info!(url = %id, "resource to remove not found");
        }
    }

    store.save(&state)?;
    Ok(summary)
}

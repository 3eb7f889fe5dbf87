// src/state/json.rs

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{StateLoadError, StateSaveError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::DigestState;

use super::StateStore;

/// Default state file, relative to the current working directory.
pub const DEFAULT_STATE_FILE: &str = "checklist.json";

/// Stores the digest state as a JSON object:
///
/// ```json
/// {
///   "http://a.example": "",
///   "http://b.example": "9b71d224bd62f378..."
/// }
/// ```
///
/// Keys are written in sorted order with two-space indentation. Every save
/// goes through [`FileSystem::write_atomic`].
#[derive(Debug, Clone)]
pub struct JsonStateStore<F: FileSystem = RealFileSystem> {
    path: PathBuf,
    fs: F,
}

impl JsonStateStore<RealFileSystem> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fs(path, RealFileSystem)
    }
}

impl<F: FileSystem> JsonStateStore<F> {
    pub fn with_fs(path: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            path: path.into(),
            fs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<F: FileSystem> StateStore for JsonStateStore<F> {
    fn load(&self) -> Result<DigestState, StateLoadError> {
        if !self.fs.exists(&self.path) {
            return Err(StateLoadError::Missing {
                path: self.path.clone(),
            });
        }

        debug!(path = ?self.path, "reading state file");
        let contents = self
            .fs
            .read_to_string(&self.path)
            .map_err(|source| StateLoadError::Io {
                path: self.path.clone(),
                source,
            })?;

        let state: DigestState =
            serde_json::from_str(&contents).map_err(|e| StateLoadError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = ?self.path, tracked = state.len(), "loaded digest state");
        Ok(state)
    }

    fn save(&mut self, state: &DigestState) -> Result<(), StateSaveError> {
        let mut encoded = serde_json::to_string_pretty(state)?;
        encoded.push('\n');

        self.fs
            .write_atomic(&self.path, encoded.as_bytes())
            .map_err(|source| StateSaveError::Write {
                path: self.path.clone(),
                source,
            })?;

        info!(path = ?self.path, tracked = state.len(), "saved digest state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn empty_digests_round_trip_as_empty_strings() {
        let fs = MockFileSystem::new();
        let mut store = JsonStateStore::with_fs("checklist.json", fs.clone());

        let mut state = DigestState::new();
        state.insert("http://a.example".into(), String::new());
        state.insert("http://b.example".into(), "deadbeef".into());
        store.save(&state).unwrap();

        let raw = fs.contents("checklist.json").unwrap();
        assert!(raw.contains("\"http://a.example\": \"\""));
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn non_string_digest_is_corrupt() {
        let fs = MockFileSystem::new();
        fs.add_file("checklist.json", r#"{"http://a.example": 42}"#);
        let store = JsonStateStore::with_fs("checklist.json", fs);

        assert!(matches!(store.load(), Err(StateLoadError::Corrupt { .. })));
    }

    #[test]
    fn missing_file_is_reported_not_invented() {
        let store = JsonStateStore::with_fs("nope.json", MockFileSystem::new());

        assert!(matches!(store.load(), Err(StateLoadError::Missing { .. })));
        assert!(store.load_or_empty().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_not_replaced_by_empty_state() {
        let fs = MockFileSystem::new();
        fs.add_file("checklist.json", "{ not json");
        let store = JsonStateStore::with_fs("checklist.json", fs);

        assert!(matches!(
            store.load_or_empty(),
            Err(StateLoadError::Corrupt { .. })
        ));
    }
}

// src/engine/mod.rs

//! Change-detection engine.
//!
//! One run walks through these phases:
//!
//! ```text
//! Idle -> Fetching -> Hashing -> Diffing -> Notifying? -> Persisting -> Done
//! ```
//!
//! Fetching and hashing happen per resource inside the worker tasks; every
//! task is joined before diffing starts. The pure comparison logic lives in
//! [`diff`]; [`check`] owns the fan-out and the run sequence.

pub mod check;
pub mod diff;

use std::fmt;
use std::time::Duration;

use crate::errors::{NotifyError, ResourceError};
use crate::types::{ChangeSet, DigestRecord, ResourceId};

pub use check::CheckEngine;
pub use diff::{apply_record, diff_digests};

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Phase of a single check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPhase {
    Idle,
    Fetching,
    Hashing,
    Diffing,
    Notifying,
    Persisting,
    Done,
}

impl fmt::Display for CheckPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckPhase::Idle => "idle",
            CheckPhase::Fetching => "fetching",
            CheckPhase::Hashing => "hashing",
            CheckPhase::Diffing => "diffing",
            CheckPhase::Notifying => "notifying",
            CheckPhase::Persisting => "persisting",
            CheckPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Engine options, passed in at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Maximum number of concurrent fetch+hash tasks.
    ///
    /// `0` and `1` both mean strictly sequential execution.
    pub workers: usize,

    /// Upper bound for a single fetch, so one hung server cannot stall the
    /// join before diffing.
    pub fetch_timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// A resource that was left out of this run's digest record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFailure {
    pub id: ResourceId,
    pub error: ResourceError,
}

/// Result of fetching, hashing and comparing, before any side effects.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub record: DigestRecord,
    pub changes: ChangeSet,
    pub failures: Vec<ResourceFailure>,
}

/// Caller-facing summary of a run.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Changed resources mapped to their new digest.
    pub changes: ChangeSet,
    /// Resources that could not be fetched or hashed this run.
    pub failures: Vec<ResourceFailure>,
    /// Set when the notifier was invoked and failed.
    pub notify_error: Option<NotifyError>,
    /// Number of tracked resources this run looked at.
    pub checked: usize,
    /// Whether the digest state was written back.
    pub persisted: bool,
}

impl CheckReport {
    pub fn changed_count(&self) -> usize {
        self.changes.len()
    }
}

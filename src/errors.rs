// src/errors.rs

//! Crate-wide error types.
//!
//! Per-resource failures ([`FetchError`], [`HashError`]) never leave the
//! engine; they are folded into the check report. Run-level failures
//! ([`StateLoadError`], [`StateSaveError`]) propagate through
//! [`PagecheckError`].

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::HashAlgorithm;

#[derive(Error, Debug)]
pub enum PagecheckError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    StateLoad(#[from] StateLoadError),

    #[error(transparent)]
    StateSave(#[from] StateSaveError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The persisted digest state could not be read.
#[derive(Error, Debug)]
pub enum StateLoadError {
    #[error("state file {path:?} does not exist")]
    Missing { path: PathBuf },

    #[error("state file {path:?} is not a valid url -> digest mapping: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("reading state file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// The digest state could not be written back.
#[derive(Error, Debug)]
pub enum StateSaveError {
    #[error("encoding digest state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("writing state file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Retrieving a resource failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("server answered with HTTP {code}")]
    Status { code: u16 },

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{algorithm} digest failed: {reason}")]
pub struct HashError {
    pub algorithm: HashAlgorithm,
    pub reason: String,
}

/// Why a single resource was left out of a run's digest record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("hash failed: {0}")]
    Hash(#[from] HashError),

    #[error("check task aborted before reporting a result")]
    TaskAborted,
}

/// A notifier could not deliver the change set.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid notifier settings: {0}")]
    Config(String),

    #[error("building notification: {0}")]
    Message(String),

    #[error("delivering notification: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PagecheckError>;

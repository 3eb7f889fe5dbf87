// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::EngineOptions;
use crate::fetch::DEFAULT_USER_AGENT;
use crate::notify::{MailSettings, DEFAULT_SUBJECT};
use crate::state::DEFAULT_STATE_FILE;
use crate::types::{HashAlgorithm, NotifierKind};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [check]
/// state_file = "checklist.json"
/// workers = 8
/// timeout = "20s"
/// algorithm = "sha512"
/// notify = "mail"
///
/// [mail]
/// server = "smtp.example.com:587"
/// user = "me@example.com"
/// password = "secret"
/// target = "you@example.com"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub check: CheckSection,

    #[serde(default)]
    pub mail: Option<MailSection>,
}

/// `[check]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckSection {
    /// JSON file holding the url -> digest mapping.
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Concurrent fetch+hash tasks; 1 means sequential.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-fetch timeout as a duration string (`"500ms"`, `"30s"`, `"2m"`).
    #[serde(default = "default_timeout")]
    pub timeout: String,

    #[serde(default)]
    pub algorithm: HashAlgorithm,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Left unset, mail is used when a `[mail]` section exists and nothing
    /// otherwise.
    #[serde(default)]
    pub notify: Option<NotifierKind>,
}

fn default_state_file() -> String {
    DEFAULT_STATE_FILE.to_string()
}

fn default_workers() -> usize {
    EngineOptions::default().workers
}

fn default_timeout() -> String {
    format!("{}s", EngineOptions::default().fetch_timeout.as_secs())
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for CheckSection {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            workers: default_workers(),
            timeout: default_timeout(),
            algorithm: HashAlgorithm::default(),
            user_agent: default_user_agent(),
            notify: None,
        }
    }
}

/// `[mail]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MailSection {
    #[serde(default)]
    pub server: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub subject: Option<String>,
}

/// Validated configuration.
///
/// Build one with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub state_file: PathBuf,
    pub engine: EngineOptions,
    pub algorithm: HashAlgorithm,
    pub user_agent: String,
    pub notify: NotifierKind,
    pub mail: Option<MailSettings>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        check: CheckSection,
        fetch_timeout: Duration,
        notify: NotifierKind,
        mail: Option<MailSettings>,
    ) -> Self {
        Self {
            state_file: PathBuf::from(check.state_file),
            engine: EngineOptions {
                workers: check.workers,
                fetch_timeout,
            },
            algorithm: check.algorithm,
            user_agent: check.user_agent,
            notify,
            mail,
        }
    }
}

impl MailSection {
    pub(crate) fn into_settings(self) -> MailSettings {
        MailSettings {
            server: self.server,
            user: self.user,
            password: self.password,
            target: self.target,
            subject: self
                .subject
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        }
    }
}

// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pagecheck`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pagecheck",
    version,
    about = "Check websites for changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Output messages to explain the script's actions as it runs.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a line at the end with the number of changes, independent of --verbose.
    #[arg(short = 'e', long)]
    pub exit_message: bool,

    /// The file containing pages to check.
    ///
    /// Default: `[check].state_file` from the config, else `checklist.json`.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<String>,

    /// Add the given website to the file and exit without checking.
    ///
    /// May be repeated.
    #[arg(short, long, value_name = "URL")]
    pub add: Vec<String>,

    /// Remove the given website from the file and exit without checking.
    ///
    /// May be repeated. A URL given to both --add and --remove ends up removed.
    #[arg(short, long, value_name = "URL")]
    pub remove: Vec<String>,

    /// SMTP server in the form `example.com:587`; enables mail notifications.
    #[arg(short, long, value_name = "HOST[:PORT]")]
    pub mail: Option<String>,

    /// User mail address to use while connecting to SMTP.
    #[arg(short, long, value_name = "ADDRESS")]
    pub user: Option<String>,

    /// Password to use while connecting to SMTP.
    #[arg(short, long, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Mail address to send the notification to (defaults to --user).
    #[arg(short, long, value_name = "ADDRESS")]
    pub target: Option<String>,

    /// Subject to use while sending mail notifications.
    #[arg(short, long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Path to a TOML config file.
    ///
    /// Default: `pagecheck.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Number of pages fetched and hashed concurrently (1 = sequential).
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Per-page fetch timeout, e.g. `30s` or `500ms`.
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Digest algorithm (sha512, sha256, blake3).
    #[arg(long, value_name = "NAME")]
    pub algorithm: Option<String>,

    /// Where to report changes (none, print, log, mail).
    #[arg(long, value_name = "KIND")]
    pub notify: Option<String>,

    /// Treat a missing state file as an empty tracked set.
    ///
    /// A state file that exists but cannot be parsed is always an error.
    #[arg(long)]
    pub init: bool,

    /// Print tracked pages and their stored digests, then exit.
    #[arg(long)]
    pub list: bool,

    /// Fetch, hash and compare, but neither notify nor save.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Overrides --verbose. If both are omitted, `PAGECHECK_LOG` or a default
    /// level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// Whether this invocation edits the tracked set instead of checking.
    pub fn is_edit(&self) -> bool {
        !self.add.is_empty() || !self.remove.is_empty()
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

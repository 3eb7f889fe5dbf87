// src/lib.rs

pub mod cli;
pub mod config;
pub mod digest;
pub mod engine;
pub mod errors;
pub mod fetch;
pub mod fs;
pub mod logging;
pub mod notify;
pub mod state;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, MailSection, RawConfigFile, load_raw_or_default};
use crate::digest::Hasher;
use crate::engine::{CheckEngine, CheckReport};
use crate::errors::{PagecheckError, Result};
use crate::fetch::HttpFetcher;
use crate::notify::build_notifier;
use crate::state::{JsonStateStore, StateStore, edit_tracked};
use crate::types::{HashAlgorithm, NotifierKind};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the JSON state store
/// - tracked-set edits (`--add` / `--remove`), which skip the check
/// - fetcher, digest strategy, notifier and the check engine
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;
    debug!(state_file = ?cfg.state_file, engine = ?cfg.engine, algorithm = %cfg.algorithm, "resolved config");

    let mut store = JsonStateStore::new(cfg.state_file.clone());

    if args.is_edit() {
        let summary = edit_tracked(&mut store, &args.add, &args.remove, args.init)?;
        if summary.is_empty() {
            info!("tracked set unchanged");
        } else {
            info!(
                added = summary.added.len(),
                removed = summary.removed.len(),
                "tracked set updated"
            );
        }
        return Ok(());
    }

    let prior = if args.init {
        store.load_or_empty()?
    } else {
        store.load()?
    };

    if args.list {
        for (url, digest) in &prior {
            let shown = if digest.is_empty() { "-" } else { digest.as_str() };
            println!("{url} {shown}");
        }
        return Ok(());
    }

    let engine = build_engine(&cfg)?;
    info!(
        pages = prior.len(),
        workers = engine.options().workers,
        "checking pages"
    );

    let report = if args.dry_run {
        let evaluation = engine.evaluate(&prior).await;
        CheckReport {
            checked: prior.len(),
            changes: evaluation.changes,
            failures: evaluation.failures,
            notify_error: None,
            persisted: false,
        }
    } else {
        engine.run_with_state(prior, &mut store).await?
    };

    log_report(&report);

    if args.exit_message {
        println!("{} changes found.", report.changed_count());
    }

    Ok(())
}

/// Build a check engine from validated config.
pub fn build_engine(cfg: &ConfigFile) -> Result<CheckEngine> {
    let fetcher = Arc::new(HttpFetcher::new(cfg.engine.fetch_timeout, &cfg.user_agent)?);
    let digest = Arc::new(Hasher::new(cfg.algorithm));

    let mut engine = CheckEngine::new(fetcher, digest, cfg.engine);
    if let Some(notifier) = build_notifier(cfg.notify, cfg.mail.as_ref())? {
        engine = engine.with_notifier(notifier);
    }
    Ok(engine)
}

/// Load the config file (if any), apply CLI overrides, then validate.
pub fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = load_raw_or_default(args.config.as_deref().map(Path::new))?;
    apply_cli_overrides(&mut raw, args)?;
    ConfigFile::try_from(raw)
}

fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) -> Result<()> {
    if let Some(file) = &args.file {
        raw.check.state_file = file.clone();
    }
    if let Some(workers) = args.workers {
        raw.check.workers = workers;
    }
    if let Some(timeout) = &args.timeout {
        raw.check.timeout = timeout.clone();
    }
    if let Some(algorithm) = &args.algorithm {
        raw.check.algorithm = algorithm.parse::<HashAlgorithm>().map_err(PagecheckError::ConfigError)?;
    }
    if let Some(notify) = &args.notify {
        raw.check.notify = Some(notify.parse::<NotifierKind>().map_err(PagecheckError::ConfigError)?);
    } else if args.mail.is_some() {
        // --mail on the command line beats a `notify` from the file.
        raw.check.notify = Some(NotifierKind::Mail);
    }

    // Mail flags only take effect together with a server, from --mail or
    // an existing [mail] section.
    if args.mail.is_none() && raw.mail.is_none() {
        let ignored = ignored_mail_flags(args);
        if !ignored.is_empty() {
            warn!(
                flags = %ignored.join(", "),
                "mail flags given without -m/--mail or a [mail] section; no mail will be sent"
            );
        }
    } else {
        let mail = raw.mail.get_or_insert_with(MailSection::default);
        if let Some(server) = &args.mail {
            mail.server = server.clone();
        }
        if let Some(user) = &args.user {
            mail.user = user.clone();
        }
        if let Some(password) = &args.password {
            mail.password = password.clone();
        }
        if let Some(target) = &args.target {
            mail.target = Some(target.clone());
        }
        if let Some(subject) = &args.subject {
            mail.subject = Some(subject.clone());
        }
    }

    Ok(())
}

/// Mail flags that only mean something once a server is known.
fn ignored_mail_flags(args: &CliArgs) -> Vec<&'static str> {
    [
        ("--user", args.user.is_some()),
        ("--password", args.password.is_some()),
        ("--target", args.target.is_some()),
        ("--subject", args.subject.is_some()),
    ]
    .into_iter()
    .filter_map(|(flag, set)| set.then_some(flag))
    .collect()
}

fn log_report(report: &CheckReport) {
    info!(
        checked = report.checked,
        changed = report.changed_count(),
        failed = report.failures.len(),
        persisted = report.persisted,
        notify_failed = report.notify_error.is_some(),
        "{} differences found",
        report.changed_count()
    );
}

// src/notify/mod.rs

//! Change notification.
//!
//! The engine hands a non-empty [`ChangeSet`] to whatever [`Notifier`] it
//! was built with. A notifier failure is reported but never stops the
//! digest state from being persisted.

pub mod smtp;

use std::io::Write;

use tracing::info;

use crate::errors::{NotifyError, PagecheckError, Result};
use crate::fetch::BoxFuture;
use crate::types::{ChangeSet, NotifierKind};

pub use smtp::{MailSettings, SmtpNotifier, DEFAULT_SUBJECT};

/// Capability that performs an external side effect for a change set.
pub trait Notifier: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    fn notify<'a>(
        &'a self,
        changes: &'a ChangeSet,
    ) -> BoxFuture<'a, std::result::Result<(), NotifyError>>;
}

/// Render changed URLs one per line, in stable order.
pub fn render_change_list(changes: &ChangeSet) -> String {
    changes.keys().map(String::as_str).collect::<Vec<_>>().join("\n")
}

/// Writes changed URLs to stdout.
#[derive(Debug, Clone, Default)]
pub struct PrintNotifier;

impl Notifier for PrintNotifier {
    fn name(&self) -> &'static str {
        "print"
    }

    fn notify<'a>(
        &'a self,
        changes: &'a ChangeSet,
    ) -> BoxFuture<'a, std::result::Result<(), NotifyError>> {
        Box::pin(async move {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", render_change_list(changes))?;
            out.flush()?;
            Ok(())
        })
    }
}

/// Emits one log event per changed resource.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    fn notify<'a>(
        &'a self,
        changes: &'a ChangeSet,
    ) -> BoxFuture<'a, std::result::Result<(), NotifyError>> {
        Box::pin(async move {
            for (url, digest) in changes {
                info!(url = %url, digest = %digest, "page changed");
            }
            Ok(())
        })
    }
}

/// Build the notifier selected by `kind`, or `None` for [`NotifierKind::None`].
pub fn build_notifier(
    kind: NotifierKind,
    mail: Option<&MailSettings>,
) -> Result<Option<Box<dyn Notifier>>> {
    let notifier: Option<Box<dyn Notifier>> = match kind {
        NotifierKind::None => None,
        NotifierKind::Print => Some(Box::new(PrintNotifier)),
        NotifierKind::Log => Some(Box::new(LogNotifier)),
        NotifierKind::Mail => {
            let settings = mail.ok_or_else(|| {
                PagecheckError::ConfigError(
                    "mail notifications need a [mail] section or --mail".to_string(),
                )
            })?;
            Some(Box::new(SmtpNotifier::new(settings.clone())))
        }
    };
    Ok(notifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_list_is_one_url_per_line_sorted() {
        let mut changes = ChangeSet::new();
        changes.insert("http://b.example".into(), "2".into());
        changes.insert("http://a.example".into(), "1".into());

        assert_eq!(render_change_list(&changes), "http://a.example\nhttp://b.example");
    }

    #[test]
    fn mail_notifier_requires_settings() {
        assert!(build_notifier(NotifierKind::Mail, None).is_err());
        assert!(build_notifier(NotifierKind::None, None).unwrap().is_none());

        let log = build_notifier(NotifierKind::Log, None).unwrap().unwrap();
        assert_eq!(log.name(), "log");
    }

    #[tokio::test]
    async fn log_notifier_never_fails() {
        let mut changes = ChangeSet::new();
        changes.insert("http://a.example".into(), "1".into());

        LogNotifier.notify(&changes).await.unwrap();
    }
}

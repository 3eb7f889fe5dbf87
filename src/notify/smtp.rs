// src/notify/smtp.rs

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::errors::NotifyError;
use crate::fetch::BoxFuture;
use crate::types::ChangeSet;

use super::{render_change_list, Notifier};

pub const DEFAULT_SUBJECT: &str = "Updated Websites";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Connection and addressing for mail notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    /// `host` or `host:port`; the port defaults to 587.
    pub server: String,
    pub user: String,
    pub password: String,
    /// Recipient; falls back to `user` when unset.
    pub target: Option<String>,
    pub subject: String,
}

impl MailSettings {
    pub fn effective_target(&self) -> &str {
        self.target
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.user)
    }
}

/// Split `host[:port]` into its parts.
pub fn split_server(server: &str) -> Result<(&str, u16), NotifyError> {
    let server = server.trim();
    match server.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|e| NotifyError::Config(format!("invalid SMTP port '{port}': {e}")))?;
            if host.is_empty() {
                return Err(NotifyError::Config(format!("missing SMTP host in '{server}'")));
            }
            Ok((host, port))
        }
        None if server.is_empty() => Err(NotifyError::Config("empty SMTP server".to_string())),
        None => Ok((server, DEFAULT_SMTP_PORT)),
    }
}

/// Mails the list of changed URLs over SMTP with STARTTLS.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    settings: MailSettings,
}

impl SmtpNotifier {
    pub fn new(settings: MailSettings) -> Self {
        Self { settings }
    }

    pub fn build_message(&self, changes: &ChangeSet) -> Result<Message, NotifyError> {
        let from = self.settings.user.parse::<Mailbox>().map_err(|e| {
            NotifyError::Message(format!("invalid sender '{}': {e}", self.settings.user))
        })?;
        let target = self.settings.effective_target();
        let to = target
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Message(format!("invalid recipient '{target}': {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.settings.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(render_change_list(changes))
            .map_err(|e| NotifyError::Message(e.to_string()))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let (host, port) = split_server(&self.settings.server)?;
        let credentials = Credentials::new(
            self.settings.user.clone(),
            self.settings.password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| NotifyError::Config(format!("SMTP relay '{host}': {e}")))?
            .port(port)
            .credentials(credentials)
            .build();
        Ok(transport)
    }
}

impl Notifier for SmtpNotifier {
    fn name(&self) -> &'static str {
        "mail"
    }

    fn notify<'a>(&'a self, changes: &'a ChangeSet) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            debug!(changes = changes.len(), "preparing message");
            let message = self.build_message(changes)?;

            debug!(server = %self.settings.server, "connecting to mail server");
            let mailer = self.transport()?;

            mailer
                .send(message)
                .await
                .map_err(|e| NotifyError::Transport(e.to_string()))?;

            info!(to = %self.settings.effective_target(), "mail sent");
            Ok(())
        })
    }
}

/// Outbound email
///
/// Taskhive sends exactly two kinds of mail: account confirmation codes and
/// password reset codes. Handlers compose a [`Mail`] via [`templates`] and
/// hand it to an `Arc<dyn Mailer>`; which transport sits behind the trait is
/// a deployment decision.
///
/// # Implementations
///
/// - [`SmtpMailer`]: real delivery over SMTP (lettre); the actual network
///   send happens on a spawned task, so it never holds a response open
/// - [`LogMailer`]: logs the mail instead of sending it; the default when no
///   SMTP settings are configured
/// - [`MemoryMailer`]: records every mail in memory for tests to inspect
///
/// Delivery is best-effort everywhere: a failed send is logged and the
/// triggering request still succeeds.
pub mod smtp;
pub mod templates;

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

pub use smtp::{SmtpConfig, SmtpMailer};

/// Errors surfaced by mail transports.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The message itself could not be built (bad address, bad body)
    #[error("failed to compose message: {0}")]
    Compose(String),

    /// The transport could not be set up or refused the message
    #[error("mail transport error: {0}")]
    Transport(String),
}

/// A composed outbound message.
#[derive(Debug, Clone)]
pub struct Mail {
    /// Recipient address
    pub to: String,

    /// Recipient display name
    pub to_name: String,

    /// Subject line
    pub subject: String,

    /// HTML body
    pub html: String,
}

/// Outbound mail seam.
///
/// `send` returns once the message is accepted for delivery; implementations
/// must not block the caller on the network.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<(), MailError>;
}

/// Mailer that logs instead of delivering.
///
/// The development default: every "sent" mail shows up in the server log,
/// code included, so local flows can be exercised without an SMTP server.
#[derive(Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        info!(
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.html,
            "Email dispatch (log transport)"
        );
        Ok(())
    }
}

/// Mailer that records every message for later inspection.
///
/// Used by the integration tests to assert on dispatch counts and to fish
/// confirmation codes out of message bodies.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<Mail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }

    /// Number of messages sent so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer lock poisoned").len()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        self.sent.lock().expect("mailer lock poisoned").push(mail);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(subject: &str) -> Mail {
        Mail {
            to: "user@example.com".to_string(),
            to_name: "User".to_string(),
            subject: subject.to_string(),
            html: "<p>hello</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_mailer_records_in_order() {
        let mailer = MemoryMailer::new();
        mailer.send(mail("first")).await.unwrap();
        mailer.send(mail("second")).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "first");
        assert_eq!(sent[1].subject, "second");
        assert_eq!(mailer.sent_count(), 2);
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let mailer = LogMailer::new();
        assert!(mailer.send(mail("anything")).await.is_ok());
    }
}

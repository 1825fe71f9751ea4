/// SMTP mail transport
///
/// Real delivery over lettre's async SMTP transport (STARTTLS via rustls).
/// [`SmtpMailer::send`] builds the message, hands it to a spawned task, and
/// returns immediately: delivery failures are logged, never reported back,
/// because no Taskhive flow gates a response on email reaching an inbox.
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, warn};

use super::{Mail, MailError, Mailer};

/// Settings for the SMTP transport.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay host
    pub host: String,

    /// SMTP port (usually 587 for STARTTLS)
    pub port: u16,

    /// Relay username
    pub username: String,

    /// Relay password
    pub password: String,

    /// Address mail is sent from
    pub from_address: String,

    /// Display name mail is sent from
    pub from_name: String,
}

/// lettre-backed [`Mailer`] implementation.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport and validates the sender address.
    ///
    /// No connection is opened here; lettre dials lazily on first send.
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        let address = config
            .from_address
            .parse::<Address>()
            .map_err(|e| MailError::Compose(format!("invalid sender address: {e}")))?;
        let from = Mailbox::new(Some(config.from_name), address);

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        let to_address = mail
            .to
            .parse::<Address>()
            .map_err(|e| MailError::Compose(format!("invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(Some(mail.to_name), to_address))
            .subject(&mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)
            .map_err(|e| MailError::Compose(e.to_string()))?;

        // Delivery happens off the request path.
        let transport = self.transport.clone();
        let to = mail.to;
        tokio::spawn(async move {
            match transport.send(message).await {
                Ok(_) => debug!(to = %to, "Email delivered"),
                Err(e) => warn!(to = %to, error = %e, "Email delivery failed"),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "mailer".to_string(),
            password: "secret".to_string(),
            from_address: "no-reply@taskhive.dev".to_string(),
            from_name: "Taskhive".to_string(),
        }
    }

    #[test]
    fn test_valid_config_builds() {
        assert!(SmtpMailer::new(config()).is_ok());
    }

    #[test]
    fn test_bad_sender_address_is_rejected() {
        let result = SmtpMailer::new(SmtpConfig {
            from_address: "not an address".to_string(),
            ..config()
        });
        assert!(matches!(result, Err(MailError::Compose(_))));
    }
}

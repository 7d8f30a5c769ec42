use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use tracing::instrument;

use super::{MailError, Mailer, RideNotification};
use crate::configuration::{SmtpSettings, SmtpTls};

/// Mailer backed by an SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport without connecting; the first send opens the
    /// connection.
    pub fn from_settings(settings: &SmtpSettings) -> Result<Self, MailError> {
        let from: Mailbox = settings
            .sender
            .parse()
            .map_err(|_| MailError::InvalidAddress(settings.sender.clone()))?;

        let mut builder = match settings.tls {
            SmtpTls::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            SmtpTls::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
        };

        builder = builder.port(settings.port).timeout(Some(settings.timeout()));

        let password = settings.password.expose_secret();
        if !password.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username().to_string(),
                password.to_string(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, notification: &RideNotification) -> Result<Message, MailError> {
        let to: Mailbox = notification
            .to
            .as_ref()
            .parse()
            .map_err(|_| MailError::InvalidAddress(notification.to.to_string()))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(notification.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(notification.text_body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(name = "Send ride notification over SMTP", skip_all, fields(rider_email = %notification.to))]
    async fn send(&self, notification: &RideNotification) -> Result<String, MailError> {
        let message = self.build_message(notification)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        let lines: Vec<String> = response.message().map(|line| line.to_string()).collect();
        Ok(format!("{} {}", response.code(), lines.join(" ")))
    }
}

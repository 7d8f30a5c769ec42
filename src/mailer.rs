//! Delivery of ride notifications by email.

mod notification;
mod smtp;

pub use notification::RideNotification;
pub use smtp::SmtpMailer;

use async_trait::async_trait;

/// Sends a composed notification and returns the transport's reply text.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, notification: &RideNotification) -> Result<String, MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

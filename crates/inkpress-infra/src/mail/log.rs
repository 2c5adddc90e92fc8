//! Mailer that writes messages to the log instead of delivering them.

use async_trait::async_trait;

use inkpress_core::error::MailError;
use inkpress_core::ports::{MailMessage, Mailer};

use super::{mask_email, redact_emails};

/// Development mailer - every message becomes an `info` event.
pub struct LogMailer {
    default_from: String,
}

impl LogMailer {
    pub fn new(default_from: impl Into<String>) -> Self {
        Self {
            default_from: default_from.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::InvalidMessage("no recipients".to_string()));
        }

        let recipients: Vec<String> = message.to.iter().map(|r| mask_email(r)).collect();
        tracing::info!(
            from = %message.sender_or(&self.default_from),
            to = ?recipients,
            subject = %redact_emails(&message.subject),
            body_chars = message.body.chars().count(),
            "Mail sent (log backend)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_accepts_and_rejects() {
        let mailer = LogMailer::new("webmaster@localhost");
        let message = MailMessage {
            subject: "Ana (ana@example.com) recommends you read Rust".into(),
            body: "Read Rust at http://blog.test/\n\nAna's comments: ana@example.com".into(),
            from: None,
            to: vec!["bo@example.com".into()],
        };
        assert!(mailer.send(message.clone()).await.is_ok());

        let mut empty = message;
        empty.to.clear();
        assert!(matches!(
            mailer.send(empty).await,
            Err(MailError::InvalidMessage(_))
        ));
    }
}

//! Mailer that hands messages to an HTTP mail relay.

use async_trait::async_trait;

use inkpress_core::error::MailError;
use inkpress_core::ports::{MailMessage, Mailer};

use super::mask_email;

/// Posts each message as JSON to a relay URL (transactional mail APIs,
/// internal mail gateways).
pub struct WebhookMailer {
    url: String,
    default_from: String,
    client: reqwest::Client,
}

impl WebhookMailer {
    pub fn new(url: impl Into<String>, default_from: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            default_from: default_from.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for WebhookMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::InvalidMessage("no recipients".to_string()));
        }

        let payload = serde_json::json!({
            "from": message.sender_or(&self.default_from),
            "to": message.to,
            "subject": message.subject,
            "text": message.body,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailError::Send(format!(
                "relay responded with {}",
                response.status()
            )));
        }

        let recipients: Vec<String> = message.to.iter().map(|r| mask_email(r)).collect();
        tracing::info!(to = ?recipients, "Mail handed to relay");
        Ok(())
    }
}

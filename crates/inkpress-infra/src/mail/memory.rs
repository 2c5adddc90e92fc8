//! Outbox mailer - keeps sent messages in memory.

use async_trait::async_trait;
use tokio::sync::RwLock;

use inkpress_core::error::MailError;
use inkpress_core::ports::{MailMessage, Mailer};

/// Records every message with its sender resolved. Used in tests.
pub struct InMemoryMailer {
    default_from: String,
    outbox: RwLock<Vec<MailMessage>>,
}

impl InMemoryMailer {
    pub fn new(default_from: impl Into<String>) -> Self {
        Self {
            default_from: default_from.into(),
            outbox: RwLock::new(Vec::new()),
        }
    }

    /// Messages sent so far, oldest first.
    pub async fn outbox(&self) -> Vec<MailMessage> {
        self.outbox.read().await.clone()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new(super::DEFAULT_FROM_EMAIL)
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, mut message: MailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::InvalidMessage("no recipients".to_string()));
        }
        message.from = Some(message.sender_or(&self.default_from).to_string());
        self.outbox.write().await.push(message);
        Ok(())
    }
}

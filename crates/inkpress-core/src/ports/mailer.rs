//! Mail sender port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MailError;

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub subject: String,
    pub body: String,
    /// `None` means "use the sender's configured default".
    pub from: Option<String>,
    pub to: Vec<String>,
}

impl MailMessage {
    /// The explicit sender, or `default` when none was set.
    pub fn sender_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.from.as_deref().unwrap_or(default)
    }
}

/// Mail sender trait - abstraction over delivery backends.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

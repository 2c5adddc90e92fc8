//! Mailer implementations - log, in-memory outbox, and webhook relay.

mod log;
mod memory;
mod webhook;

pub use log::LogMailer;
pub use memory::InMemoryMailer;
pub use webhook::WebhookMailer;

/// Sender used when neither the message nor the configuration names one.
pub const DEFAULT_FROM_EMAIL: &str = "webmaster@localhost";

/// Mask an address for logging to avoid PII in logs.
pub(crate) fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = match local.chars().next() {
            Some(first) if local.len() > 1 => format!("{}***", first),
            _ => "***".to_string(),
        };
        format!("{}{}", masked_local, domain)
    } else {
        "***".to_string()
    }
}

/// Mask every address inside free text such as a subject line.
pub(crate) fn redact_emails(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let address = word.trim_matches(|c: char| !c.is_alphanumeric());
            if address.contains('@') {
                word.replacen(address, &mask_email(address), 1)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

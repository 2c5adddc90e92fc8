//! Application configuration loaded from environment variables.

use std::env;

use inkpress_infra::DatabaseConfig;
use inkpress_infra::mail::DEFAULT_FROM_EMAIL;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Scheme and host used to build absolute post URLs in emails.
    pub site_url: String,
    pub default_from_email: String,
    /// Mail relay endpoint; mail is only logged when unset.
    pub mail_webhook_url: Option<String>,
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("PORT").unwrap_or(8080);
        let site_url = env::var("SITE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Self {
            host,
            port,
            site_url,
            default_from_email: env::var("DEFAULT_FROM_EMAIL")
                .unwrap_or_else(|_| DEFAULT_FROM_EMAIL.to_string()),
            mail_webhook_url: env::var("MAIL_WEBHOOK_URL").ok().filter(|u| !u.is_empty()),
            database,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

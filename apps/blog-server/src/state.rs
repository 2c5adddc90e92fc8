//! Application state - shared across all handlers.

use std::sync::Arc;

use inkpress_core::BlogService;
use inkpress_core::ports::{CommentRepository, Mailer, PostRepository, TagRepository};
use inkpress_infra::{InMemoryBlogStore, LogMailer, WebhookMailer};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    /// Prefix for absolute post URLs.
    pub site_url: String,
}

type Stores = (
    Arc<dyn PostRepository>,
    Arc<dyn TagRepository>,
    Arc<dyn CommentRepository>,
);

fn in_memory_stores() -> Stores {
    let store = Arc::new(InMemoryBlogStore::new());
    (store.clone(), store.clone(), store)
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (posts, tags, comments): Stores = {
            use inkpress_infra::database::connect;
            use inkpress_infra::{
                PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
            };

            if let Some(db_config) = &config.database {
                match connect(db_config).await {
                    Ok(conn) => (
                        Arc::new(PostgresPostRepository::new(conn.clone())),
                        Arc::new(PostgresTagRepository::new(conn.clone())),
                        Arc::new(PostgresCommentRepository::new(conn)),
                    ),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        in_memory_stores()
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory_stores()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (posts, tags, comments): Stores = {
            tracing::info!("Running without postgres feature - using in-memory store");
            in_memory_stores()
        };

        let mailer: Arc<dyn Mailer> = match &config.mail_webhook_url {
            Some(url) => {
                tracing::info!("Mail relay configured");
                Arc::new(WebhookMailer::new(url.clone(), config.default_from_email.clone()))
            }
            None => {
                tracing::warn!("MAIL_WEBHOOK_URL not set. Outgoing mail is only logged.");
                Arc::new(LogMailer::new(config.default_from_email.clone()))
            }
        };

        tracing::info!("Application state initialized");

        Self {
            blog: BlogService::new(posts, tags, comments, mailer),
            site_url: config.site_url.clone(),
        }
    }
}

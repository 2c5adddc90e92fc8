//! # Inkpress Infrastructure
//!
//! Concrete implementations of the ports defined in `inkpress-core`:
//! content stores and mail senders.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL content store via SeaORM
//! - `minimal` - No external database, in-memory store only

pub mod database;
pub mod mail;

pub use database::{DatabaseConfig, InMemoryBlogStore};
pub use mail::{InMemoryMailer, LogMailer, WebhookMailer};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

#[cfg(test)]
mod service_tests;

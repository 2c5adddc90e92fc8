//! # Inkpress Core
//!
//! The domain layer of the Inkpress blog.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod recommendation;
pub mod services;

pub use error::{DomainError, FieldErrors};
pub use services::BlogService;

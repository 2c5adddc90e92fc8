//! # Inkpress Shared
//!
//! Request/response types of the blog HTTP API.
//! Kept free of domain dependencies so clients can reuse them.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;

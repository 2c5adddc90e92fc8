//! SeaORM entities - the relational schema of the blog.

pub mod comment;
pub mod post;
pub mod post_tag;
pub mod tag;
pub mod user;

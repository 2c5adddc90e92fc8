//! Use cases - the operations the blog exposes to its readers.

mod blog;
mod share;

pub use blog::{BlogService, PostDetail, PostListing};
pub use share::share_message;

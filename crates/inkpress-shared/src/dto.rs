//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to share a post by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePostRequest {
    pub name: String,
    pub email: String,
    pub to: String,
    #[serde(default)]
    pub comments: String,
}

/// Request to comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub name: String,
    pub email: String,
    pub body: String,
}

/// Query string of the listing pages. `page` is kept raw; bad values fall back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// A post as shown to readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub author_id: String,
    pub publish: String,
    pub sticked_post: bool,
    pub tags: Vec<TagResponse>,
    /// Site-relative URL of the detail page.
    pub url: String,
}

/// A comment as shown to readers. The commenter's email is not exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub name: String,
    pub body: String,
    pub created: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarPostResponse {
    pub post: PostResponse,
    pub same_tags: u32,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// GET /blog/ and /blog/tag/{slug}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: PageResponse<PostResponse>,
    pub tag: Option<TagResponse>,
}

/// GET /blog/{year}/{month}/{day}/{slug}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub similar_posts: Vec<SimilarPostResponse>,
}

/// GET/POST /blog/{id}/share/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePostResponse {
    pub post: PostResponse,
    pub sent: bool,
}

/// POST /blog/{id}/comment/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreatedResponse {
    pub post: PostResponse,
    pub comment: CommentResponse,
}

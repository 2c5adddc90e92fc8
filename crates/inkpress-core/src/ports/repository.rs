use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag, User};
use crate::error::RepoError;
use crate::pagination::{Page, Paginator};
use crate::recommendation::SimilarPost;

/// Generic repository trait for entities stored as a single row.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;
}

/// Author storage.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Tag storage.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;
}

/// Comment storage.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Active comments on a post, oldest first.
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Show or hide a comment. Fails with `NotFound` for unknown ids.
    async fn set_active(&self, comment_id: Uuid, active: bool) -> Result<(), RepoError>;
}

/// Post storage, including the post/tag association.
///
/// Every `*_published` query filters on `PostStatus::Published`.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert or update a post and replace its tag associations.
    ///
    /// Fails with `Constraint` when another post already uses the same slug
    /// on the same publish day.
    async fn save(&self, post: Post) -> Result<Post, RepoError>;

    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    async fn find_published_by_date_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Published posts, optionally only those tagged `tag_id`.
    ///
    /// Sticked posts come first, then newest `publish` first.
    async fn list_published(&self, tag_id: Option<Uuid>) -> Result<Vec<Post>, RepoError>;

    /// One page of [`list_published`](Self::list_published), selected by the
    /// raw `page_token` as [`Paginator::resolve`] does.
    async fn list_published_page(
        &self,
        tag_id: Option<Uuid>,
        paginator: Paginator,
        page_token: Option<&str>,
    ) -> Result<Page<Post>, RepoError>;

    /// Published posts sharing tags with `post`, best matches first.
    async fn find_similar(&self, post: &Post, limit: usize) -> Result<Vec<SimilarPost>, RepoError>;
}

//! In-memory content store - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkpress_core::domain::{Comment, Post, Tag, User};
use inkpress_core::error::RepoError;
use inkpress_core::pagination::{Page, Paginator};
use inkpress_core::ports::{
    BaseRepository, CommentRepository, PostRepository, TagRepository, UserRepository,
};
use inkpress_core::recommendation::{SimilarPost, rank_similar};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    tags: HashMap<Uuid, Tag>,
    /// Posts are stored without tags; `post_tags` is the association.
    posts: HashMap<Uuid, Post>,
    post_tags: Vec<(Uuid, Uuid)>,
    /// Insertion order is creation order.
    comments: Vec<Comment>,
}

impl Tables {
    fn hydrate(&self, post: &Post) -> Post {
        let mut post = post.clone();
        post.tags = self
            .post_tags
            .iter()
            .filter(|(post_id, _)| *post_id == post.id)
            .filter_map(|(_, tag_id)| self.tags.get(tag_id).cloned())
            .collect();
        post
    }

    fn published(&self) -> impl Iterator<Item = Post> + '_ {
        self.posts
            .values()
            .filter(|p| p.is_published())
            .map(|p| self.hydrate(p))
    }
}

/// Content store backed by process memory.
///
/// Tables live behind one async `RwLock`, so readers never block each other.
/// Data is lost on process restart.
pub struct InMemoryBlogStore {
    tables: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint(format!(
                "username '{}' already taken",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .tags
            .values()
            .any(|t| t.slug == tag.slug && t.id != tag.id)
        {
            return Err(RepoError::Constraint(format!(
                "tag slug '{}' already exists",
                tag.slug
            )));
        }
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.values().find(|t| t.slug == slug).cloned())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }
        match tables.comments.iter_mut().find(|c| c.id == comment.id) {
            Some(existing) => *existing = comment.clone(),
            None => tables.comments.push(comment.clone()),
        }
        Ok(comment)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && c.active)
            .cloned()
            .collect())
    }

    async fn set_active(&self, comment_id: Uuid, active: bool) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or(RepoError::NotFound)?;
        comment.active = active;
        comment.updated_at = chrono::Utc::now();
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        let date = post.publish_date();
        if tables
            .posts
            .values()
            .any(|p| p.id != post.id && p.slug == post.slug && p.publish_date() == date)
        {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already used on {}",
                post.slug, date
            )));
        }
        if let Some(tag) = post.tags.iter().find(|t| !tables.tags.contains_key(&t.id)) {
            return Err(RepoError::Constraint(format!("tag {} does not exist", tag.id)));
        }

        tables.post_tags.retain(|(post_id, _)| *post_id != post.id);
        for tag in &post.tags {
            // The association is a set, like the composite key in SQL.
            if !tables.post_tags.contains(&(post.id, tag.id)) {
                tables.post_tags.push((post.id, tag.id));
            }
        }

        let mut row = post;
        row.tags = Vec::new();
        tables.posts.insert(row.id, row.clone());

        Ok(tables.hydrate(&row))
    }

    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .get(&id)
            .filter(|p| p.is_published())
            .map(|p| tables.hydrate(p)))
    }

    async fn find_published_by_date_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .published()
            .find(|p| p.slug == slug && p.publish_date() == date))
    }

    async fn list_published(&self, tag_id: Option<Uuid>) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .published()
            .filter(|p| tag_id.is_none_or(|id| p.has_tag(id)))
            .collect();

        posts.sort_by(|a, b| {
            b.sticked_post
                .cmp(&a.sticked_post)
                .then_with(|| b.publish.cmp(&a.publish))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(posts)
    }

    async fn list_published_page(
        &self,
        tag_id: Option<Uuid>,
        paginator: Paginator,
        page_token: Option<&str>,
    ) -> Result<Page<Post>, RepoError> {
        let posts = self.list_published(tag_id).await?;
        Ok(paginator.page(posts, page_token))
    }

    async fn find_similar(&self, post: &Post, limit: usize) -> Result<Vec<SimilarPost>, RepoError> {
        let tables = self.tables.read().await;
        // Rank against the stored associations, not the caller's copy.
        let reference = tables
            .posts
            .get(&post.id)
            .map(|p| tables.hydrate(p))
            .unwrap_or_else(|| post.clone());
        let candidates: Vec<Post> = tables.published().collect();

        Ok(rank_similar(&reference, &candidates, limit))
    }
}

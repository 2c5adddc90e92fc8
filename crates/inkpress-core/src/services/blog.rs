use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::share_message;
use crate::domain::{Comment, Post, Tag};
use crate::error::{DomainError, RepoError};
use crate::forms::{CommentForm, ShareForm};
use crate::pagination::{Page, Paginator};
use crate::ports::{CommentRepository, Mailer, PostRepository, TagRepository};
use crate::recommendation::{SIMILAR_POSTS_LIMIT, SimilarPost};

/// A page of the post listing, optionally narrowed to one tag.
#[derive(Debug, Clone, Serialize)]
pub struct PostListing {
    pub posts: Page<Post>,
    pub tag: Option<Tag>,
}

/// Everything shown on a post's detail page.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub similar_posts: Vec<SimilarPost>,
}

/// Reader-facing blog operations over the content store.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
    mailer: Arc<dyn Mailer>,
    paginator: Paginator,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            posts,
            tags,
            comments,
            mailer,
            paginator: Paginator::default(),
        }
    }

    async fn find_tag(&self, tag_slug: Option<&str>) -> Result<Option<Tag>, DomainError> {
        match tag_slug {
            Some(slug) => Ok(Some(
                self.tags
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Tag", slug))?,
            )),
            None => Ok(None),
        }
    }

    /// Published posts, optionally only those tagged `tag_slug`.
    pub async fn list_published(
        &self,
        tag_slug: Option<&str>,
    ) -> Result<(Vec<Post>, Option<Tag>), DomainError> {
        let tag = self.find_tag(tag_slug).await?;
        let posts = self.posts.list_published(tag.as_ref().map(|t| t.id)).await?;
        Ok((posts, tag))
    }

    /// One page of the listing; see [`Paginator::resolve`] for token handling.
    pub async fn post_list(
        &self,
        tag_slug: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<PostListing, DomainError> {
        let tag = self.find_tag(tag_slug).await?;
        let posts = self
            .posts
            .list_published_page(tag.as_ref().map(|t| t.id), self.paginator, page_token)
            .await?;

        tracing::debug!(
            tag = tag_slug.unwrap_or("-"),
            page = posts.number,
            num_pages = posts.num_pages,
            "Listing published posts"
        );

        Ok(PostListing { posts, tag })
    }

    pub async fn get_published_by_id(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_published_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Exact lookup of a published post by its URL components.
    pub async fn get_published_by_date_slug(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
    ) -> Result<Post, DomainError> {
        let key = || format!("{}/{}/{}/{}", year, month, day, slug);
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DomainError::not_found("Post", key()))?;

        self.posts
            .find_published_by_date_slug(date, slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", key()))
    }

    pub async fn list_active_comments(&self, post: &Post) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.find_active_by_post(post.id).await?)
    }

    /// Up to four published posts sharing tags with `post`.
    pub async fn similar_posts(&self, post: &Post) -> Result<Vec<SimilarPost>, DomainError> {
        if post.tags.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.posts.find_similar(post, SIMILAR_POSTS_LIMIT).await?)
    }

    pub async fn post_detail(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
    ) -> Result<PostDetail, DomainError> {
        let post = self.get_published_by_date_slug(year, month, day, slug).await?;
        let comments = self.list_active_comments(&post).await?;
        let similar_posts = self.similar_posts(&post).await?;

        Ok(PostDetail {
            post,
            comments,
            similar_posts,
        })
    }

    /// Validate and persist a new active comment on `post`.
    pub async fn create_comment(
        &self,
        post: &Post,
        form: CommentForm,
    ) -> Result<Comment, DomainError> {
        let form = form.clean()?;

        let comment = Comment::new(post.id, form.name, form.email, form.body);
        let saved = self.comments.save(comment).await?;

        tracing::info!(post_id = %post.id, comment_id = %saved.id, "Comment created");
        Ok(saved)
    }

    /// Comment on the published post `post_id`.
    pub async fn comment_on_post(
        &self,
        post_id: Uuid,
        form: CommentForm,
    ) -> Result<(Post, Comment), DomainError> {
        let post = self.get_published_by_id(post_id).await?;
        let comment = self.create_comment(&post, form).await?;
        Ok((post, comment))
    }

    /// Hide or re-show a comment.
    pub async fn set_comment_active(
        &self,
        comment_id: Uuid,
        active: bool,
    ) -> Result<(), DomainError> {
        self.comments
            .set_active(comment_id, active)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found("Comment", comment_id),
                other => other.into(),
            })
    }

    /// Email a link to the published post `post_id`.
    ///
    /// `site_url` is the scheme and host prefixed to the post's path.
    pub async fn share_post(
        &self,
        post_id: Uuid,
        form: ShareForm,
        site_url: &str,
    ) -> Result<Post, DomainError> {
        let post = self.get_published_by_id(post_id).await?;
        let form = form.clean()?;

        let post_url = format!("{}{}", site_url.trim_end_matches('/'), post.absolute_url());
        let message = share_message(&post, &post_url, &form);
        self.mailer.send(message).await?;

        tracing::info!(post_id = %post.id, "Post shared by email");
        Ok(post)
    }
}

//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::{Expr, Order};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbConn, EntityTrait, FromQueryResult, JoinType, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait,
};
use uuid::Uuid;

use inkpress_core::domain::{Comment, Post, Tag, User};
use inkpress_core::error::RepoError;
use inkpress_core::pagination::{Page, Paginator};
use inkpress_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};
use inkpress_core::recommendation::SimilarPost;

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity, Status};
use super::entity::post_tag;
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err, upsert_on_primary_key};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn set_active(&self, comment_id: Uuid, active: bool) -> Result<(), RepoError> {
        let result = CommentEntity::update_many()
            .col_expr(comment::Column::Active, Expr::value(active))
            .col_expr(comment::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(comment::Column::Id.eq(comment_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::info!(%comment_id, active, "Comment visibility changed");
        Ok(())
    }
}

/// A candidate post and its shared-tag count, as returned by the ranking query.
#[derive(Debug, FromQueryResult)]
struct SimilarRow {
    id: Uuid,
    same_tags: i64,
}

/// PostgreSQL post repository.
///
/// Posts are loaded together with their tags through the `post_tags` join table.
pub struct PostgresPostRepository {
    pub(crate) db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// `[start, end)` of a UTC calendar day.
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Published posts in listing order, optionally only those tagged `tag_id`.
fn published_listing(tag_id: Option<Uuid>) -> Select<PostEntity> {
    let mut query = PostEntity::find().filter(post::Column::Status.eq(Status::Published));
    if let Some(tag_id) = tag_id {
        query = query
            .join(JoinType::InnerJoin, post::Relation::PostTag.def())
            .filter(post_tag::Column::TagId.eq(tag_id));
    }

    query
        .order_by_desc(post::Column::StickedPost)
        .order_by_desc(post::Column::Publish)
        .order_by_asc(post::Column::Id)
}

async fn with_tags<C>(db: &C, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError>
where
    C: ConnectionTrait,
{
    let tags = models
        .load_many_to_many(TagEntity, post_tag::Entity, db)
        .await
        .map_err(map_db_err)?;

    Ok(models
        .into_iter()
        .zip(tags)
        .map(|(model, tags)| model.into_domain(tags))
        .collect())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let (start, end) = day_bounds(post.publish_date());
        let clash = PostEntity::find()
            .filter(post::Column::Slug.eq(post.slug.as_str()))
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end))
            .filter(post::Column::Id.ne(post.id))
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if clash.is_some() {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already used on {}",
                post.slug,
                post.publish_date()
            )));
        }

        let mut tags: Vec<Tag> = Vec::with_capacity(post.tags.len());
        for tag in &post.tags {
            if !tags.iter().any(|t| t.id == tag.id) {
                tags.push(tag.clone());
            }
        }

        let model = PostEntity::insert(post::ActiveModel::from(post))
            .on_conflict(upsert_on_primary_key::<PostEntity>())
            .exec_with_returning(&txn)
            .await
            .map_err(map_db_err)?;

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(model.id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if !tags.is_empty() {
            let rows = tags.iter().map(|tag| post_tag::ActiveModel {
                post_id: Set(model.id),
                tag_id: Set(tag.id),
            });
            post_tag::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(post_id = %model.id, tags = tags.len(), "Post saved");

        let mut saved = model.into_domain(Vec::new());
        saved.tags = tags;
        Ok(saved)
    }

    async fn find_published_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .filter(post::Column::Status.eq(Status::Published))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match model {
            Some(model) => Ok(with_tags(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_published_by_date_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let (start, end) = day_bounds(date);
        let model = PostEntity::find()
            .filter(post::Column::Status.eq(Status::Published))
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match model {
            Some(model) => Ok(with_tags(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_published(&self, tag_id: Option<Uuid>) -> Result<Vec<Post>, RepoError> {
        let models = published_listing(tag_id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        with_tags(&self.db, models).await
    }

    async fn list_published_page(
        &self,
        tag_id: Option<Uuid>,
        paginator: Paginator,
        page_token: Option<&str>,
    ) -> Result<Page<Post>, RepoError> {
        let pages = published_listing(tag_id).paginate(&self.db, paginator.per_page() as u64);

        let count = pages.num_items().await.map_err(map_db_err)? as usize;
        let number = paginator.resolve(page_token, count);
        let models = pages
            .fetch_page((number - 1) as u64)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: with_tags(&self.db, models).await?,
            number,
            num_pages: paginator.num_pages(count),
            count,
        })
    }

    async fn find_similar(&self, post: &Post, limit: usize) -> Result<Vec<SimilarPost>, RepoError> {
        let reference_tags: Vec<Uuid> = post_tag::Entity::find()
            .select_only()
            .column(post_tag::Column::TagId)
            .filter(post_tag::Column::PostId.eq(post.id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        if reference_tags.is_empty() {
            return Ok(Vec::new());
        }

        // One row per candidate; COUNT counts the joined tag rows.
        let rows = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .column_as(
                Expr::col((post_tag::Entity, post_tag::Column::TagId)).count(),
                "same_tags",
            )
            .join(JoinType::InnerJoin, post::Relation::PostTag.def())
            .filter(post_tag::Column::TagId.is_in(reference_tags))
            .filter(post::Column::Status.eq(Status::Published))
            .filter(post::Column::Id.ne(post.id))
            .group_by(post::Column::Id)
            .order_by(Expr::cust("same_tags"), Order::Desc)
            .order_by_desc(post::Column::Publish)
            .order_by_asc(post::Column::Id)
            .limit(limit as u64)
            .into_model::<SimilarRow>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let models = PostEntity::find()
            .filter(post::Column::Id.is_in(rows.iter().map(|r| r.id)))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        let mut posts: HashMap<Uuid, Post> = with_tags(&self.db, models)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                posts.remove(&row.id).map(|post| SimilarPost {
                    post,
                    same_tags: row.same_tags as u32,
                })
            })
            .collect())
    }
}

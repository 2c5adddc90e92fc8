//! Blog use cases exercised end to end over the in-memory adapters.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Duration, TimeZone, Utc};
use uuid::Uuid;

use inkpress_core::domain::{Post, Tag, User};
use inkpress_core::error::MailError;
use inkpress_core::forms::{CommentForm, ShareForm};
use inkpress_core::ports::{BaseRepository, MailMessage, Mailer, PostRepository};
use inkpress_core::{BlogService, DomainError};

use crate::{InMemoryBlogStore, InMemoryMailer};

struct Fixture {
    store: Arc<InMemoryBlogStore>,
    mailer: Arc<InMemoryMailer>,
    blog: BlogService,
    author: User,
}

async fn fixture() -> Fixture {
    let store = Arc::new(InMemoryBlogStore::new());
    let mailer = Arc::new(InMemoryMailer::new("blog@example.com"));
    let blog = BlogService::new(store.clone(), store.clone(), store.clone(), mailer.clone());
    let author = User::new("admin", "admin@example.com");
    let author = BaseRepository::<User, Uuid>::save(store.as_ref(), author)
        .await
        .unwrap();

    Fixture {
        store,
        mailer,
        blog,
        author,
    }
}

impl Fixture {
    async fn tag(&self, name: &str) -> Tag {
        BaseRepository::<Tag, Uuid>::save(self.store.as_ref(), Tag::new(name))
            .await
            .unwrap()
    }

    async fn post(&self, title: &str, tags: &[&Tag], day: i64, published: bool) -> Post {
        let base = Utc.with_ymd_and_hms(2024, 2, 1, 10, 30, 0).unwrap();
        let mut post = Post::new(self.author.id, title, format!("{} body", title))
            .with_publish(base + Duration::days(day))
            .with_tags(tags.iter().map(|t| (*t).clone()).collect());
        if published {
            post = post.publish();
        }
        PostRepository::save(self.store.as_ref(), post).await.unwrap()
    }
}

fn comment_form(name: &str) -> CommentForm {
    CommentForm {
        name: name.into(),
        email: "reader@example.com".into(),
        body: "Thanks for writing this".into(),
    }
}

#[tokio::test]
async fn test_detail_page_combines_post_comments_and_similar_posts() {
    let fx = fixture().await;
    let (x, y, z) = (fx.tag("x").await, fx.tag("y").await, fx.tag("z").await);
    let a = fx.post("A", &[&x, &y], 0, true).await;
    fx.post("B", &[&x], 1, true).await;
    fx.post("C", &[&x, &y, &z], 2, true).await;
    fx.post("D", &[&z], 3, true).await;
    fx.blog.create_comment(&a, comment_form("Ana")).await.unwrap();

    let detail = fx
        .blog
        .post_detail(a.publish.year(), a.publish.month(), a.publish.day(), "a")
        .await
        .unwrap();

    assert_eq!(detail.post.id, a.id);
    assert_eq!(detail.comments.len(), 1);
    let similar: Vec<_> = detail
        .similar_posts
        .iter()
        .map(|s| (s.post.title.as_str(), s.same_tags))
        .collect();
    assert_eq!(similar, vec![("C", 2), ("B", 1)]);
}

#[tokio::test]
async fn test_similar_posts_never_exceed_four() {
    let fx = fixture().await;
    let x = fx.tag("x").await;
    let reference = fx.post("Reference", &[&x], 0, true).await;
    for day in 1..=6 {
        fx.post(&format!("Other {}", day), &[&x], day, true).await;
    }

    let similar = fx.blog.similar_posts(&reference).await.unwrap();
    assert_eq!(similar.len(), 4);
    assert!(similar.iter().all(|s| s.post.id != reference.id));
    assert_eq!(similar[0].post.title, "Other 6");
}

#[tokio::test]
async fn test_draft_is_not_found_by_date_and_slug() {
    let fx = fixture().await;
    let draft = fx.post("Work in progress", &[], 0, false).await;

    let err = fx
        .blog
        .get_published_by_date_slug(
            draft.publish.year(),
            draft.publish.month(),
            draft.publish.day(),
            &draft.slug,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = fx
        .blog
        .get_published_by_date_slug(2024, 2, 30, &draft.slug)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_listing_by_unknown_tag_is_not_found() {
    let fx = fixture().await;
    fx.post("Visible", &[], 0, true).await;

    let err = fx.blog.post_list(Some("missing"), None).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Tag", .. }));
}

#[tokio::test]
async fn test_listing_paginates_published_posts_only() {
    let fx = fixture().await;
    let rust = fx.tag("rust").await;
    for day in 0..4 {
        fx.post(&format!("Post {}", day), &[&rust], day, true).await;
    }
    fx.post("Draft", &[&rust], 10, false).await;

    let first = fx.blog.post_list(None, None).await.unwrap();
    assert_eq!(first.posts.count, 4);
    assert_eq!(first.posts.num_pages, 2);
    assert_eq!(first.posts.items[0].title, "Post 3");
    assert!(first.tag.is_none());

    let last = fx.blog.post_list(Some("rust"), Some("7")).await.unwrap();
    assert_eq!(last.posts.number, 2);
    assert_eq!(last.posts.items.len(), 1);
    assert_eq!(last.tag.map(|t| t.slug), Some("rust".to_string()));
}

#[tokio::test]
async fn test_invalid_comment_is_rejected_and_not_stored() {
    let fx = fixture().await;
    let post = fx.post("Post", &[], 0, true).await;

    let err = fx
        .blog
        .comment_on_post(post.id, comment_form(""))
        .await
        .unwrap_err();

    match err {
        DomainError::Validation(errors) => assert!(errors.contains("name")),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(fx.blog.list_active_comments(&post).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_created_comment_round_trips_once() {
    let fx = fixture().await;
    let post = fx.post("Post", &[], 0, true).await;
    let form = comment_form("Ana");

    let (_, created) = fx.blog.comment_on_post(post.id, form.clone()).await.unwrap();
    let comments = fx.blog.list_active_comments(&post).await.unwrap();

    assert_eq!(comments, vec![created.clone()]);
    assert_eq!(created.name, form.name);
    assert_eq!(created.email, form.email);
    assert_eq!(created.body, form.body);
    assert!(created.active);
}

#[tokio::test]
async fn test_deactivated_comment_disappears() {
    let fx = fixture().await;
    let post = fx.post("Post", &[], 0, true).await;
    let comment = fx.blog.create_comment(&post, comment_form("Ana")).await.unwrap();
    assert_eq!(fx.blog.list_active_comments(&post).await.unwrap().len(), 1);

    fx.blog.set_comment_active(comment.id, false).await.unwrap();

    assert!(fx.blog.list_active_comments(&post).await.unwrap().is_empty());
    let err = fx
        .blog
        .set_comment_active(Uuid::new_v4(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Comment", .. }));
}

#[tokio::test]
async fn test_cannot_comment_on_draft() {
    let fx = fixture().await;
    let draft = fx.post("Draft", &[], 0, false).await;

    let err = fx
        .blog
        .comment_on_post(draft.id, comment_form("Ana"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn test_share_sends_mail_with_absolute_url() {
    let fx = fixture().await;
    let post = fx.post("Shared", &[], 0, true).await;
    let form = ShareForm {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        to: "bo@example.com".into(),
        comments: "Worth it".into(),
    };

    fx.blog
        .share_post(post.id, form, "https://blog.example.com/")
        .await
        .unwrap();

    let outbox = fx.mailer.outbox().await;
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].to, vec!["bo@example.com".to_string()]);
    assert_eq!(outbox[0].from.as_deref(), Some("blog@example.com"));
    assert_eq!(
        outbox[0].body,
        "Read Shared at https://blog.example.com/blog/2024/2/1/shared/\n\nAna's comments: Worth it"
    );
}

#[tokio::test]
async fn test_invalid_share_sends_nothing() {
    let fx = fixture().await;
    let post = fx.post("Shared", &[], 0, true).await;
    let form = ShareForm {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        to: "not-an-address".into(),
        comments: String::new(),
    };

    let err = fx
        .blog
        .share_post(post.id, form, "https://blog.example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(ref e) if e.contains("to")));
    assert!(fx.mailer.outbox().await.is_empty());
}

#[tokio::test]
async fn test_comment_fields_are_stored_trimmed() {
    let fx = fixture().await;
    let post = fx.post("Post", &[], 0, true).await;
    let form = CommentForm {
        name: format!("Ana{}", " ".repeat(100)),
        email: "  ana@example.com".into(),
        body: "  Thanks  ".into(),
    };

    let (_, created) = fx.blog.comment_on_post(post.id, form).await.unwrap();

    assert_eq!(created.name, "Ana");
    assert_eq!(created.email, "ana@example.com");
    assert_eq!(created.body, "Thanks");
    assert_eq!(fx.blog.list_active_comments(&post).await.unwrap(), vec![created]);
}

/// Relay that is always down.
struct UnreachableMailer;

#[async_trait]
impl Mailer for UnreachableMailer {
    async fn send(&self, _message: MailMessage) -> Result<(), MailError> {
        Err(MailError::Send("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_mail_failure_surfaces_as_infrastructure_error() {
    let fx = fixture().await;
    let post = fx.post("Shared", &[], 0, true).await;
    let blog = BlogService::new(
        fx.store.clone(),
        fx.store.clone(),
        fx.store.clone(),
        Arc::new(UnreachableMailer),
    );
    let form = ShareForm {
        name: "Ana".into(),
        email: "ana@example.com".into(),
        to: "bo@example.com".into(),
        comments: String::new(),
    };

    let err = blog
        .share_post(post.id, form, "https://blog.example.com")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::Infrastructure(ref msg) if msg.contains("connection refused")
    ));
}

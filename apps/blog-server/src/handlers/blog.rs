//! Blog handlers - listing, detail, share and comment.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkpress_core::forms::{CommentForm, ShareForm};
use inkpress_shared::dto::{
    CommentCreatedResponse, CreateCommentRequest, PageQuery, SharePostRequest, SharePostResponse,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

/// GET /blog/?page=N
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state.blog.post_list(None, query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(views::listing(listing)))
}

/// GET /blog/tag/{tag_slug}/?page=N
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let tag_slug = path.into_inner();
    let listing = state
        .blog
        .post_list(Some(&tag_slug), query.page.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(views::listing(listing)))
}

/// GET /blog/{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let detail = state.blog.post_detail(year, month, day, &slug).await?;
    Ok(HttpResponse::Ok().json(views::detail(detail)))
}

/// GET /blog/{post_id}/share/
pub async fn share_form(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.blog.get_published_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SharePostResponse {
        post: views::post(&post),
        sent: false,
    }))
}

/// POST /blog/{post_id}/share/
pub async fn share_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SharePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let form = ShareForm {
        name: req.name,
        email: req.email,
        to: req.to,
        comments: req.comments,
    };

    let post = state
        .blog
        .share_post(path.into_inner(), form, &state.site_url)
        .await?;

    Ok(HttpResponse::Ok().json(SharePostResponse {
        post: views::post(&post),
        sent: true,
    }))
}

/// POST /blog/{post_id}/comment/
pub async fn post_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let form = CommentForm {
        name: req.name,
        email: req.email,
        body: req.body,
    };

    let (post, comment) = state.blog.comment_on_post(path.into_inner(), form).await?;

    Ok(HttpResponse::Created().json(CommentCreatedResponse {
        post: views::post(&post),
        comment: views::comment(&comment),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::{Value, json};

    use inkpress_core::BlogService;
    use inkpress_core::domain::{Post, Tag};
    use inkpress_core::ports::{BaseRepository, PostRepository};
    use inkpress_infra::{InMemoryBlogStore, InMemoryMailer};

    use super::*;
    use crate::handlers::configure_routes;

    struct Seeded {
        state: AppState,
        mailer: Arc<InMemoryMailer>,
        published: Vec<Post>,
        draft: Post,
    }

    async fn seeded() -> Seeded {
        let store = Arc::new(InMemoryBlogStore::new());
        let mailer = Arc::new(InMemoryMailer::new("blog@example.com"));
        let rust = BaseRepository::<Tag, Uuid>::save(store.as_ref(), Tag::new("Rust"))
            .await
            .unwrap();

        let base = Utc.with_ymd_and_hms(2024, 4, 10, 9, 0, 0).unwrap();
        let mut published = Vec::new();
        for day in 0..4 {
            let post = Post::new(Uuid::new_v4(), format!("Post {}", day), "body")
                .with_publish(base + Duration::days(day))
                .with_tags(vec![rust.clone()])
                .publish();
            published.push(PostRepository::save(store.as_ref(), post).await.unwrap());
        }
        let draft = Post::new(Uuid::new_v4(), "Draft", "body").with_publish(base);
        let draft = PostRepository::save(store.as_ref(), draft).await.unwrap();

        let blog = BlogService::new(store.clone(), store.clone(), store, mailer.clone());
        let state = AppState {
            blog,
            site_url: "https://blog.example.com".to_string(),
        };

        Seeded {
            state,
            mailer,
            published,
            draft,
        }
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_listing_pages_and_falls_back() {
        let seeded = seeded().await;
        let app = app!(seeded.state);

        let req = test::TestRequest::get().uri("/blog/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["posts"]["items"].as_array().unwrap().len(), 3);
        assert_eq!(body["posts"]["num_pages"], 2);
        assert_eq!(body["posts"]["items"][0]["title"], "Post 3");
        assert!(body["tag"].is_null());

        let req = test::TestRequest::get()
            .uri("/blog/tag/rust/?page=abc")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["posts"]["number"], 1);
        assert_eq!(body["tag"]["slug"], "rust");

        let req = test::TestRequest::get().uri("/blog/?page=42").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["posts"]["number"], 2);
    }

    #[actix_web::test]
    async fn test_unknown_tag_is_404() {
        let seeded = seeded().await;
        let app = app!(seeded.state);

        let req = test::TestRequest::get().uri("/blog/tag/go/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_detail_shows_similar_posts_and_hides_drafts() {
        let seeded = seeded().await;
        let app = app!(seeded.state);
        let first = &seeded.published[0];

        let req = test::TestRequest::get().uri(&first.absolute_url()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["post"]["id"], first.id.to_string());
        let similar = body["similar_posts"].as_array().unwrap();
        assert_eq!(similar.len(), 3);
        assert_eq!(similar[0]["post"]["title"], "Post 3");
        assert_eq!(similar[0]["same_tags"], 1);

        let req = test::TestRequest::get()
            .uri(&seeded.draft.absolute_url())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_comment_validation_and_creation() {
        let seeded = seeded().await;
        let app = app!(seeded.state);
        let post = &seeded.published[1];
        let uri = format!("/blog/{}/comment/", post.id);

        let req = test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({"name": "", "email": "ana@example.com", "body": "Hi"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["errors"]["name"].is_array());

        let req = test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({"name": "Ana", "email": "ana@example.com", "body": "Hi"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["comment"]["name"], "Ana");
        assert!(body["comment"].get("email").is_none());

        let req = test::TestRequest::get().uri(&post.absolute_url()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["comments"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_share_sends_mail() {
        let seeded = seeded().await;
        let app = app!(seeded.state);
        let post = &seeded.published[2];
        let uri = format!("/blog/{}/share/", post.id);

        let req = test::TestRequest::get().uri(&uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["sent"], false);

        let req = test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({
                "name": "Ana",
                "email": "ana@example.com",
                "to": "bo@example.com",
                "comments": "Have a look"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["sent"], true);

        let outbox = seeded.mailer.outbox().await;
        assert_eq!(outbox.len(), 1);
        assert!(outbox[0].body.contains(&format!(
            "https://blog.example.com{}",
            post.absolute_url()
        )));
    }

    #[actix_web::test]
    async fn test_share_of_draft_is_404() {
        let seeded = seeded().await;
        let app = app!(seeded.state);

        let uri = format!("/blog/{}/share/", seeded.draft.id);
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_problem_details() {
        let seeded = seeded().await;
        let app = app!(seeded.state);

        let uri = format!("/blog/{}/comment/", seeded.published[0].id);
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Bad Request");
    }
}

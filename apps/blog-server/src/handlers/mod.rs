//! HTTP handlers and route configuration.

mod blog;
mod health;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .service(web::scope("/api").route("/health", web::get().to(health::health_check)))
    .service(
        web::scope("/blog")
            .route("/", web::get().to(blog::post_list))
            .route("/tag/{tag_slug}/", web::get().to(blog::post_list_by_tag))
            .route(
                "/{year}/{month}/{day}/{slug}/",
                web::get().to(blog::post_detail),
            )
            .route("/{post_id}/share/", web::get().to(blog::share_form))
            .route("/{post_id}/share/", web::post().to(blog::share_post))
            .route("/{post_id}/comment/", web::post().to(blog::post_comment)),
    );
}

//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod views;


use actix_web::web;

use crate::middleware::error::{json_error_handler, query_error_handler};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                // Post routes; `/{slug}` must stay last
                .service(
                    web::scope("/post")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::patch().to(posts::update_post))
                        .route("", web::delete().to(posts::delete_post))
                        .route("/tag", web::get().to(posts::list_by_tag))
                        .route("/category", web::get().to(posts::list_by_category))
                        .route("/add-post", web::post().to(posts::add_post))
                        .route("/comment", web::post().to(posts::add_comment))
                        .route("/comment", web::delete().to(posts::delete_comment))
                        .route("/reply", web::post().to(posts::add_reply))
                        .route("/{slug}", web::get().to(posts::get_by_slug)),
                ),
        );
}

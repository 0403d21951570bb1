//! HTTP routes.
//!
//! Each submodule owns one `/api/*` prefix.

pub mod admin;
pub mod ai;
pub mod auth;
pub mod blog;
pub mod bookmarks;
pub mod comments;
pub mod settings;
pub mod user;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use crate::state::SharedState;

async fn root() -> Json<Value> {
    Json(json!({ "message": "Blogforge API", "status": "running" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

fn blog_routes() -> Router<SharedState> {
    Router::new()
        .route("/create", post(blog::create_blog))
        .route("/stats/overview", get(blog::stats_overview))
        .route("/user/{user_id}", get(blog::list_user_blogs))
        .route(
            "/{id}",
            get(blog::get_blog).put(blog::update_blog).delete(blog::delete_blog),
        )
}

fn comment_routes() -> Router<SharedState> {
    Router::new().route(
        "/{id}",
        get(comments::list_comments)
            .post(comments::create_comment)
            .delete(comments::delete_comment),
    )
}

fn bookmark_routes() -> Router<SharedState> {
    Router::new()
        .route("/toggle", post(bookmarks::toggle_bookmark))
        .route("/{user_id}", get(bookmarks::list_bookmarks))
        .route("/{user_id}/{blog_id}", get(bookmarks::bookmark_status))
}

fn user_routes(max_avatar_bytes: usize) -> Router<SharedState> {
    Router::new()
        .route("/{id}", get(user::get_profile).put(user::update_profile))
        .route(
            "/{id}/avatar",
            post(user::upload_avatar).layer(DefaultBodyLimit::max(max_avatar_bytes)),
        )
        .route("/{id}/password", put(user::change_password))
}

fn auth_routes() -> Router<SharedState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
}

fn admin_routes() -> Router<SharedState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route("/users", get(admin::list_users))
}

fn ai_routes(max_image_bytes: usize) -> Router<SharedState> {
    Router::new()
        .route("/generate-blog", post(ai::generate_blog))
        .route("/summarize", post(ai::summarize))
        .route("/generate-headline", post(ai::generate_headline))
        .route("/change-tone", post(ai::change_tone))
        .route("/grammar-check", post(ai::grammar_check))
        .route("/translate", post(ai::translate))
        .route("/plagiarism-check", post(ai::plagiarism_check))
        .route(
            "/image-caption",
            post(ai::image_caption).layer(DefaultBodyLimit::max(max_image_bytes)),
        )
        .route(
            "/analyze-image",
            post(ai::analyze_image).layer(DefaultBodyLimit::max(max_image_bytes)),
        )
        .route("/generate-image", post(ai::generate_image))
        .route("/text-to-speech", post(ai::text_to_speech))
}

/// All application routes, without transport layers.
pub fn create_router(state: SharedState) -> Router {
    let static_files = ServeDir::new(&state.config.uploads.static_dir);
    let max_avatar_bytes = state.config.uploads.max_avatar_bytes;
    let max_image_bytes = state.config.uploads.max_image_bytes;

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Collection roots answer with and without the trailing slash.
        .route("/api/blog", get(blog::list_blogs))
        .route("/api/blog/", get(blog::list_blogs))
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/api/settings/",
            get(settings::get_settings).put(settings::update_settings),
        )
        .nest("/api/blog", blog_routes())
        .nest("/api/comments", comment_routes())
        .nest("/api/bookmarks", bookmark_routes())
        .nest("/api/user", user_routes(max_avatar_bytes))
        .nest("/api/auth", auth_routes())
        .nest("/api/admin", admin_routes())
        .nest("/api/ai", ai_routes(max_image_bytes))
        .nest_service("/static", static_files)
        .with_state(state)
}

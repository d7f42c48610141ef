pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

use axum::{middleware::from_fn, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn app() -> Router {
    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(profile_public_routes())
        // Protected (bearer token)
        .merge(post_routes())
        .merge(profile_routes())
        // Global middleware
        .layer(CorsLayer::permissive());

    // Request logging is a per-environment setting
    if config::config().server.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn post_routes() -> Router {
    use axum::routing::{delete, post, put};
    use handlers::posts;

    Router::new()
        .route("/api/posts", post(posts::create_post).get(posts::get_posts))
        .route("/api/posts/:id", get(posts::get_post).delete(posts::delete_post))
        .route("/api/posts/like/:id", put(posts::like_post))
        .route("/api/posts/unlike/:id", put(posts::unlike_post))
        .route("/api/posts/comment/:id", post(posts::add_comment))
        .route("/api/posts/comment/:id/:comment_id", delete(posts::delete_comment))
        .route_layer(from_fn(middleware::bearer_auth_middleware))
}

fn profile_routes() -> Router {
    use axum::routing::{delete, post, put};
    use handlers::profile;

    Router::new()
        .route("/api/profile/me", get(profile::get_my_profile))
        .route("/api/profile", post(profile::upsert_profile).delete(profile::delete_account))
        .route("/api/profile/experience", put(profile::add_experience))
        .route("/api/profile/experience/:exp_id", delete(profile::remove_experience))
        .route("/api/profile/education", put(profile::add_education))
        .route("/api/profile/education/:edu_id", delete(profile::remove_education))
        .route_layer(from_fn(middleware::bearer_auth_middleware))
}

fn profile_public_routes() -> Router {
    use handlers::profile;

    Router::new()
        .route("/api/profile", get(profile::list_profiles))
        .route("/api/profile/user/:user_id", get(profile::get_profile_by_user))
        .route("/api/profile/github/:username", get(profile::github_repos))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Devconnect API",
        "version": version,
        "description": "Developer network REST backend built with Rust (Axum)",
        "endpoints": {
            "home": "/ (public)",
            "posts": "/api/posts[/:id] (protected)",
            "likes": "/api/posts/like/:id, /api/posts/unlike/:id (protected)",
            "comments": "/api/posts/comment/:id[/:comment_id] (protected)",
            "profile": "/api/profile, /api/profile/me (protected), /api/profile/user/:user_id (public)",
            "github": "/api/profile/github/:username (public)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match store::manager::StoreManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "store_error": e.to_string()
            })),
        ),
    }
}

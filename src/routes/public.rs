use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a credential: liveness, the two identity gateways
/// (signup/login) and every read of articles, comments and profiles.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers; answers "ok" without touching the store.
        .route("/health", get(|| async { "ok" }))
        // --- Identity ---
        .route("/api/user/signup", post(handlers::signup))
        .route("/api/user/login", post(handlers::login))
        // GET /api/user/{username}
        // "/api/user/me" is a static segment in the authenticated router and wins the match.
        .route("/api/user/{username}", get(handlers::get_profile))
        // --- Reads ---
        .route("/api/article/{id}", get(handlers::get_article))
        .route(
            "/api/article/user/{username}",
            get(handlers::get_articles_user),
        )
        .route("/api/comment/{articleId}", get(handlers::get_comments))
}

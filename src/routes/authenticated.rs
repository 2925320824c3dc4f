use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Every mutation plus the personalised reads. The router is wrapped in the auth
/// middleware by `create_router`, and each handler also takes `AuthUser` so that the
/// requester id and role are available for ownership and admin checks.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Profile & Social Graph ---
        .route("/api/user/me", get(handlers::get_me).put(handlers::update_me))
        .route("/api/user/{id}/follow", put(handlers::follow))
        .route("/api/user/{id}/unfollow", put(handlers::unfollow))
        // --- Articles ---
        .route("/api/article", post(handlers::create_article))
        // PUT is owner-only; DELETE also admits admins and cascades to comments.
        .route(
            "/api/article/{id}",
            put(handlers::update_article).delete(handlers::delete_article),
        )
        // GET /api/article/timeline
        // Static segment, so it is never captured by the public "/api/article/{id}" route.
        .route("/api/article/timeline", get(handlers::get_timeline))
        .route("/api/article/{id}/like", put(handlers::like_unlike))
        // --- Comments ---
        .route("/api/comment", post(handlers::add_comment))
}

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiResult,
    models::{
        ApiMessage, ArticleDetail, AuthResponse, CommentResponse, CommentsResponse,
        CreateArticleRequest, CreateCommentRequest, LoginRequest, ProfileResponse, ResponseStatus,
        SignupRequest, TimelineResponse, UpdateArticleRequest, UpdateProfileRequest,
        UserArticlesResponse, UserProfile,
    },
    services::{article, comment, user},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

fn profile_response(user: UserProfile) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        status: ResponseStatus::Success,
        user,
    })
}

// --- User Handlers ---

/// signup
///
/// [Public Route] Creates a plain `user` account and returns its first bearer credential.
#[utoipa::path(
    post,
    path = "/api/user/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Signed up", body = AuthResponse),
        (status = 400, description = "Invalid or duplicate field", body = ApiMessage)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    user::signup(state.repo.as_ref(), &state.config, payload)
        .await
        .map(Json)
}

/// login
///
/// [Public Route] Exchanges email and password for a fresh bearer credential.
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Bad credentials", body = ApiMessage)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    user::login(state.repo.as_ref(), &state.config, payload)
        .await
        .map(Json)
}

/// get_me
///
/// [Authenticated Route] The requester's own profile, read fresh from the store.
#[utoipa::path(
    get,
    path = "/api/user/me",
    responses((status = 200, description = "Profile", body = ProfileResponse))
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ProfileResponse>> {
    user::get_me(state.repo.as_ref(), id).await.map(profile_response)
}

#[utoipa::path(
    put,
    path = "/api/user/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid field", body = ApiMessage)
    )
)]
pub async fn update_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    user::update_profile(state.repo.as_ref(), id, payload)
        .await
        .map(profile_response)
}

/// get_profile
///
/// [Public Route] Anyone's profile by username. Never exposes the password hash or token.
#[utoipa::path(
    get,
    path = "/api/user/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 404, description = "No such user", body = ApiMessage)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    user::get_profile(state.repo.as_ref(), &username)
        .await
        .map(profile_response)
}

#[utoipa::path(
    put,
    path = "/api/user/{id}/follow",
    params(("id" = Uuid, Path, description = "User to follow")),
    responses(
        (status = 200, description = "Followed", body = ApiMessage),
        (status = 403, description = "Already following", body = ApiMessage),
        (status = 404, description = "No such user", body = ApiMessage)
    )
)]
pub async fn follow(
    AuthUser { id: requester_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(target_id): Path<Uuid>,
) -> ApiResult<Json<ApiMessage>> {
    user::follow(state.repo.as_ref(), requester_id, target_id)
        .await
        .map(Json)
}

#[utoipa::path(
    put,
    path = "/api/user/{id}/unfollow",
    params(("id" = Uuid, Path, description = "User to unfollow")),
    responses(
        (status = 200, description = "Unfollowed", body = ApiMessage),
        (status = 403, description = "Not following", body = ApiMessage),
        (status = 404, description = "No such user", body = ApiMessage)
    )
)]
pub async fn unfollow(
    AuthUser { id: requester_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(target_id): Path<Uuid>,
) -> ApiResult<Json<ApiMessage>> {
    user::unfollow(state.repo.as_ref(), requester_id, target_id)
        .await
        .map(Json)
}

// --- Article Handlers ---

/// create_article
///
/// [Authenticated Route] The owner is always the authenticated requester; the body cannot
/// name one.
#[utoipa::path(
    post,
    path = "/api/article",
    request_body = CreateArticleRequest,
    responses(
        (status = 200, description = "Created", body = ApiMessage),
        (status = 500, description = "Store failure", body = ApiMessage)
    )
)]
pub async fn create_article(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateArticleRequest>,
) -> ApiResult<Json<ApiMessage>> {
    article::create_article(state.repo.as_ref(), id, payload)
        .await
        .map(Json)
}

/// update_article
///
/// [Authenticated Route] Owner only. A non-owner gets 401 and the article is left as is.
#[utoipa::path(
    put,
    path = "/api/article/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Updated", body = ApiMessage),
        (status = 401, description = "Not the owner", body = ApiMessage),
        (status = 404, description = "Not Found", body = ApiMessage)
    )
)]
pub async fn update_article(
    AuthUser { id: requester_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateArticleRequest>,
) -> ApiResult<Json<ApiMessage>> {
    article::update_article(state.repo.as_ref(), requester_id, id, payload)
        .await
        .map(Json)
}

/// delete_article
///
/// [Authenticated Route] Owner or admin. Also removes every comment on the article.
#[utoipa::path(
    delete,
    path = "/api/article/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiMessage),
        (status = 401, description = "Neither owner nor admin", body = ApiMessage),
        (status = 404, description = "Not Found", body = ApiMessage)
    )
)]
pub async fn delete_article(
    AuthUser { id: requester_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiMessage>> {
    article::delete_article(state.repo.as_ref(), requester_id, role, id)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/article/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article with its comments", body = ArticleDetail),
        (status = 404, description = "Not Found", body = ApiMessage)
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ArticleDetail>> {
    article::get_article(state.repo.as_ref(), id).await.map(Json)
}

/// get_articles_user
///
/// [Public Route] All articles owned by `username`. An unknown username answers 500.
#[utoipa::path(
    get,
    path = "/api/article/user/{username}",
    params(("username" = String, Path, description = "Owner username")),
    responses(
        (status = 200, description = "The user's articles", body = UserArticlesResponse),
        (status = 500, description = "Unknown user or store failure", body = ApiMessage)
    )
)]
pub async fn get_articles_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserArticlesResponse>> {
    article::get_articles_user(state.repo.as_ref(), &username)
        .await
        .map(Json)
}

/// get_timeline
///
/// [Authenticated Route] Articles of everyone the requester follows, newest first, with
/// each author populated.
#[utoipa::path(
    get,
    path = "/api/article/timeline",
    responses((status = 200, description = "Timeline", body = TimelineResponse))
)]
pub async fn get_timeline(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<TimelineResponse>> {
    article::get_timeline(state.repo.as_ref(), id).await.map(Json)
}

/// like_unlike
///
/// [Authenticated Route] Toggles the requester's like on the article.
#[utoipa::path(
    put,
    path = "/api/article/{id}/like",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Liked or disliked", body = ApiMessage),
        (status = 404, description = "Not Found", body = ApiMessage)
    )
)]
pub async fn like_unlike(
    AuthUser { id: requester_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiMessage>> {
    let outcome = article::like_unlike(state.repo.as_ref(), requester_id, id).await?;
    Ok(Json(ApiMessage::success(outcome.message())))
}

// --- Comment Handlers ---

/// add_comment
///
/// [Authenticated Route] Validation runs before the article lookup, so an oversized body
/// is a 400 even on a missing article.
#[utoipa::path(
    post,
    path = "/api/comment",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment Added", body = CommentResponse),
        (status = 400, description = "Invalid description", body = ApiMessage),
        (status = 404, description = "No such article", body = ApiMessage)
    )
)]
pub async fn add_comment(
    AuthUser { id: author_id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    let comment = comment::add_comment(
        state.repo.as_ref(),
        author_id,
        payload.article_id,
        payload.description,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            status: ResponseStatus::Success,
            message: "comment has been added".to_string(),
            comment,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/comment/{articleId}",
    params(("articleId" = Uuid, Path, description = "Article ID")),
    responses((status = 200, description = "Comments", body = CommentsResponse))
)]
pub async fn get_comments(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
) -> ApiResult<Json<CommentsResponse>> {
    let comments = comment::get_by_article_id(state.repo.as_ref(), article_id).await?;
    Ok(Json(CommentsResponse {
        status: ResponseStatus::Success,
        comments,
    }))
}

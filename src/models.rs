use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// Avatar assigned at signup when the client does not send one.
pub const DEFAULT_PROFILE_PICTURE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=default";

// --- Enumerations (Mapped to Postgres ENUM types) ---

/// Role
///
/// The RBAC field of a user. Only `Admin` may delete articles it does not own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    #[default]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_gender", rename_all = "lowercase")]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
}

// --- Core Records ---

/// User
///
/// The canonical user record as held by the data store. Carries the password hash and
/// the last issued token, so it is never serialized directly; handlers answer with
/// [`UserProfile`] instead.
#[derive(Debug, Clone, Default)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub description: String,
    pub profile_picture: String,
    pub followers: BTreeSet<Uuid>,
    pub followings: BTreeSet<Uuid>,
    pub role: Role,
    pub gender: Option<Gender>,
    pub auth_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// NewUser
///
/// Insert payload produced by the user service after validation and hashing.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub description: String,
    pub profile_picture: String,
    pub role: Role,
    pub gender: Option<Gender>,
}

/// Article
///
/// A post owned by a single user. `user` is the owner id and never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct Article {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub img_url: Option<String>,
    pub tags: Vec<String>,
    pub likes: BTreeSet<Uuid>,
    // Comment ids in insertion order.
    pub comments: Vec<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Comment
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct Comment {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "article")]
    pub article_id: Uuid,
    pub description: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: Uuid,
    pub article_id: Uuid,
    pub description: String,
}

// --- Request Payloads (Input Schemas) ---

/// SignupRequest
///
/// Input payload for POST /api/user/signup. The role is not client-controlled:
/// every signup creates a plain `user`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "profilePicture")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// UpdateProfileRequest
///
/// Partial profile edit (PUT /api/user/me). `None` leaves the stored value untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "profilePicture")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

/// CreateArticleRequest
///
/// Input payload for POST /api/article. Older clients send the body as `content` and the
/// image as `imgurl`; both spellings are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "content")]
    pub description: String,
    #[serde(default, alias = "imgurl")]
    pub img_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// UpdateArticleRequest
///
/// Partial update for PUT /api/article/{id}. There is deliberately no owner field.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "content")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "imgurl")]
    pub img_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// CreateCommentRequest
///
/// Input payload for POST /api/comment. `comment` is accepted as a spelling of `description`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCommentRequest {
    #[serde(rename = "articleId")]
    pub article_id: Uuid,
    #[serde(alias = "comment")]
    pub description: String,
}

// --- Response Envelopes (Output Schemas) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ResponseStatus {
    Success,
    Failure,
}

/// ApiMessage
///
/// The `{status, message}` body shared by every mutation and by every failure.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct ApiMessage {
    pub status: ResponseStatus,
    pub message: String,
}

impl ApiMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Failure,
            message: message.into(),
        }
    }
}

/// UserProfile
///
/// Public view of a user: everything except the password hash and the auth token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub description: String,
    pub profile_picture: String,
    pub followers: BTreeSet<Uuid>,
    pub followings: BTreeSet<Uuid>,
    pub role: Role,
    pub gender: Option<Gender>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            description: user.description.clone(),
            profile_picture: user.profile_picture.clone(),
            followers: user.followers.clone(),
            followings: user.followings.clone(),
            role: user.role,
            gender: user.gender,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ProfileResponse {
    pub status: ResponseStatus,
    pub user: UserProfile,
}

/// AuthResponse
///
/// Returned by signup and login; `token` is the bearer credential for later requests.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

/// ArticleAuthor
///
/// The populated `user` of a timeline entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct ArticleAuthor {
    pub id: Uuid,
    pub username: String,
    pub profile_picture: String,
}

impl From<&User> for ArticleAuthor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            profile_picture: user.profile_picture.clone(),
        }
    }
}

/// TimelineArticle
///
/// An article with its owner resolved to an [`ArticleAuthor`].
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct TimelineArticle {
    pub id: Uuid,
    pub user: ArticleAuthor,
    pub title: String,
    pub description: String,
    pub img_url: Option<String>,
    pub tags: Vec<String>,
    pub likes: BTreeSet<Uuid>,
    pub comments: Vec<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl TimelineArticle {
    pub fn new(article: Article, user: ArticleAuthor) -> Self {
        Self {
            id: article.id,
            user,
            title: article.title,
            description: article.description,
            img_url: article.img_url,
            tags: article.tags,
            likes: article.likes,
            comments: article.comments,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// ArticleDetail
///
/// GET /api/article/{id}: the article with its comment ids replaced by the comments.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct ArticleDetail {
    pub id: Uuid,
    pub user: Uuid,
    pub title: String,
    pub description: String,
    pub img_url: Option<String>,
    pub tags: Vec<String>,
    pub likes: BTreeSet<Uuid>,
    pub comments: Vec<Comment>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl ArticleDetail {
    pub fn new(article: Article, comments: Vec<Comment>) -> Self {
        Self {
            id: article.id,
            user: article.user_id,
            title: article.title,
            description: article.description,
            img_url: article.img_url,
            tags: article.tags,
            likes: article.likes,
            comments,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// TimelineResponse
///
/// The key is `Articles` (capitalised) for compatibility with existing clients.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TimelineResponse {
    pub status: ResponseStatus,
    #[serde(rename = "Articles")]
    pub articles: Vec<TimelineArticle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserArticlesResponse {
    pub status: ResponseStatus,
    #[serde(rename = "Articles")]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CommentResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub comment: Comment,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CommentsResponse {
    pub status: ResponseStatus,
    pub comments: Vec<Comment>,
}

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::RepositoryResult,
    models::{
        Article, Comment, CreateArticleRequest, NewComment, NewUser, UpdateArticleRequest,
        UpdateProfileRequest, User,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::{FailPoint, MemoryRepository};
pub use postgres::PostgresRepository;

/// Repository Trait
///
/// The data store capability injected into every service. Handlers and services only see
/// this trait, never a concrete store, so the Postgres store and the in-memory store are
/// interchangeable.
///
/// Lookups return `Ok(None)` on a miss; `Err` is reserved for the store itself failing.
/// Single-field mutations (like push/pull, follow insert/delete) must be atomic per record.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: NewUser) -> RepositoryResult<User>;
    async fn get_user(&self, id: Uuid) -> RepositoryResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    /// Batch lookup; unknown ids are skipped.
    async fn get_users(&self, ids: &[Uuid]) -> RepositoryResult<Vec<User>>;
    async fn update_profile(
        &self,
        id: Uuid,
        changes: UpdateProfileRequest,
    ) -> RepositoryResult<Option<User>>;
    async fn set_auth_token(&self, id: Uuid, token: &str) -> RepositoryResult<()>;

    // --- Follow graph ---
    /// Returns false when the edge already existed.
    async fn add_follow(&self, follower_id: Uuid, following_id: Uuid) -> RepositoryResult<bool>;
    /// Returns false when there was no edge to remove.
    async fn remove_follow(&self, follower_id: Uuid, following_id: Uuid)
    -> RepositoryResult<bool>;

    // --- Articles ---
    async fn create_article(
        &self,
        owner_id: Uuid,
        req: CreateArticleRequest,
    ) -> RepositoryResult<Article>;
    async fn get_article(&self, id: Uuid) -> RepositoryResult<Option<Article>>;
    async fn update_article(
        &self,
        id: Uuid,
        changes: UpdateArticleRequest,
    ) -> RepositoryResult<Option<Article>>;
    /// Deletes the article row only; comments are cleaned up separately.
    async fn delete_article(&self, id: Uuid) -> RepositoryResult<bool>;
    /// Newest first.
    async fn get_articles_by_owners(&self, owner_ids: &[Uuid]) -> RepositoryResult<Vec<Article>>;
    async fn push_like(&self, article_id: Uuid, user_id: Uuid) -> RepositoryResult<()>;
    async fn pull_like(&self, article_id: Uuid, user_id: Uuid) -> RepositoryResult<()>;

    // --- Comments ---
    /// Inserts the comment and appends its id to the article's comment sequence.
    async fn add_comment(&self, comment: NewComment) -> RepositoryResult<Comment>;
    /// Insertion order.
    async fn get_comments_by_article(&self, article_id: Uuid) -> RepositoryResult<Vec<Comment>>;
    /// Returns the number of comments removed.
    async fn delete_comments_by_article(&self, article_id: Uuid) -> RepositoryResult<u64>;

    // --- Lifecycle ---
    /// Releases the underlying connections. Called once at shutdown.
    async fn close(&self);
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

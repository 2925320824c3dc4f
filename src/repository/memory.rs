use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::{RepositoryError, RepositoryResult},
    models::{
        Article, Comment, CreateArticleRequest, NewComment, NewUser, UpdateArticleRequest,
        UpdateProfileRequest, User,
    },
};

/// FailPoint
///
/// Store operations that can be told to fail, so the persistence-error paths of the
/// services can be driven without a broken database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    CreateUser,
    GetUser,
    UpdateUser,
    Follow,
    CreateArticle,
    GetArticle,
    UpdateArticle,
    DeleteArticle,
    ListArticles,
    ToggleLike,
    AddComment,
    GetComments,
    DeleteComments,
}

#[derive(Default)]
struct Store {
    users: HashMap<Uuid, User>,
    // Insertion order; newest last.
    articles: Vec<Article>,
    comments: Vec<Comment>,
    fail_points: HashSet<FailPoint>,
}

impl Store {
    fn check(&self, point: FailPoint) -> RepositoryResult<()> {
        if self.fail_points.contains(&point) {
            return Err(RepositoryError::Store(format!(
                "simulated store failure during {point:?}"
            )));
        }
        Ok(())
    }

    fn article_mut(&mut self, id: Uuid) -> Option<&mut Article> {
        self.articles.iter_mut().find(|a| a.id == id)
    }
}

/// MemoryRepository
///
/// A `Repository` held entirely in process memory behind a tokio `RwLock`. Every trait
/// method takes the lock once, which gives the same per-record atomicity the Postgres
/// store provides. Used by the test suites and for running the API without a database.
#[derive(Default)]
pub struct MemoryRepository {
    store: RwLock<Store>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call of `point` return a store error.
    pub async fn fail_on(&self, point: FailPoint) {
        self.store.write().await.fail_points.insert(point);
    }

    pub async fn clear_failures(&self) {
        self.store.write().await.fail_points.clear();
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        let mut store = self.store.write().await;
        store.check(FailPoint::CreateUser)?;

        // Mirrors the UNIQUE constraints of the users table.
        if store.users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::Store(format!(
                "duplicate key: username {} already exists",
                user.username
            )));
        }
        if store.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Store(format!(
                "duplicate key: email {} already exists",
                user.email
            )));
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            description: user.description,
            profile_picture: user.profile_picture,
            followers: Default::default(),
            followings: Default::default(),
            role: user.role,
            gender: user.gender,
            auth_token: None,
            created_at: Utc::now(),
        };
        store.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_user(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let store = self.store.read().await;
        store.check(FailPoint::GetUser)?;
        Ok(store.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let store = self.store.read().await;
        store.check(FailPoint::GetUser)?;
        Ok(store
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let store = self.store.read().await;
        store.check(FailPoint::GetUser)?;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn get_users(&self, ids: &[Uuid]) -> RepositoryResult<Vec<User>> {
        let store = self.store.read().await;
        store.check(FailPoint::GetUser)?;
        Ok(ids
            .iter()
            .filter_map(|id| store.users.get(id).cloned())
            .collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: UpdateProfileRequest,
    ) -> RepositoryResult<Option<User>> {
        let mut store = self.store.write().await;
        store.check(FailPoint::UpdateUser)?;
        let Some(user) = store.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(description) = changes.description {
            user.description = description;
        }
        if let Some(picture) = changes.profile_picture {
            user.profile_picture = picture;
        }
        if let Some(gender) = changes.gender {
            user.gender = Some(gender);
        }
        Ok(Some(user.clone()))
    }

    async fn set_auth_token(&self, id: Uuid, token: &str) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        store.check(FailPoint::UpdateUser)?;
        if let Some(user) = store.users.get_mut(&id) {
            user.auth_token = Some(token.to_string());
        }
        Ok(())
    }

    async fn add_follow(&self, follower_id: Uuid, following_id: Uuid) -> RepositoryResult<bool> {
        let mut store = self.store.write().await;
        store.check(FailPoint::Follow)?;
        if !store.users.contains_key(&follower_id) || !store.users.contains_key(&following_id) {
            return Err(RepositoryError::Store("follow edge references a missing user".into()));
        }
        let inserted = store
            .users
            .get_mut(&follower_id)
            .map(|u| u.followings.insert(following_id))
            .unwrap_or(false);
        if let Some(target) = store.users.get_mut(&following_id) {
            target.followers.insert(follower_id);
        }
        Ok(inserted)
    }

    async fn remove_follow(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> RepositoryResult<bool> {
        let mut store = self.store.write().await;
        store.check(FailPoint::Follow)?;
        let removed = store
            .users
            .get_mut(&follower_id)
            .map(|u| u.followings.remove(&following_id))
            .unwrap_or(false);
        if let Some(target) = store.users.get_mut(&following_id) {
            target.followers.remove(&follower_id);
        }
        Ok(removed)
    }

    async fn create_article(
        &self,
        owner_id: Uuid,
        req: CreateArticleRequest,
    ) -> RepositoryResult<Article> {
        let mut store = self.store.write().await;
        store.check(FailPoint::CreateArticle)?;

        let now = Utc::now();
        let article = Article {
            id: Uuid::new_v4(),
            user_id: owner_id,
            title: req.title,
            description: req.description,
            img_url: req.img_url,
            tags: req.tags,
            likes: Default::default(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        store.articles.push(article.clone());
        Ok(article)
    }

    async fn get_article(&self, id: Uuid) -> RepositoryResult<Option<Article>> {
        let store = self.store.read().await;
        store.check(FailPoint::GetArticle)?;
        Ok(store.articles.iter().find(|a| a.id == id).cloned())
    }

    async fn update_article(
        &self,
        id: Uuid,
        changes: UpdateArticleRequest,
    ) -> RepositoryResult<Option<Article>> {
        let mut store = self.store.write().await;
        store.check(FailPoint::UpdateArticle)?;
        let Some(article) = store.article_mut(id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            article.title = title;
        }
        if let Some(description) = changes.description {
            article.description = description;
        }
        if let Some(img_url) = changes.img_url {
            article.img_url = Some(img_url);
        }
        if let Some(tags) = changes.tags {
            article.tags = tags;
        }
        article.updated_at = Utc::now();
        Ok(Some(article.clone()))
    }

    async fn delete_article(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut store = self.store.write().await;
        store.check(FailPoint::DeleteArticle)?;
        let before = store.articles.len();
        store.articles.retain(|a| a.id != id);
        Ok(store.articles.len() < before)
    }

    async fn get_articles_by_owners(&self, owner_ids: &[Uuid]) -> RepositoryResult<Vec<Article>> {
        let store = self.store.read().await;
        store.check(FailPoint::ListArticles)?;
        Ok(store
            .articles
            .iter()
            .rev()
            .filter(|a| owner_ids.contains(&a.user_id))
            .cloned()
            .collect())
    }

    async fn push_like(&self, article_id: Uuid, user_id: Uuid) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        store.check(FailPoint::ToggleLike)?;
        if let Some(article) = store.article_mut(article_id) {
            article.likes.insert(user_id);
        }
        Ok(())
    }

    async fn pull_like(&self, article_id: Uuid, user_id: Uuid) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        store.check(FailPoint::ToggleLike)?;
        if let Some(article) = store.article_mut(article_id) {
            article.likes.remove(&user_id);
        }
        Ok(())
    }

    async fn add_comment(&self, comment: NewComment) -> RepositoryResult<Comment> {
        let mut store = self.store.write().await;
        store.check(FailPoint::AddComment)?;

        let created = Comment {
            id: Uuid::new_v4(),
            user_id: comment.user_id,
            article_id: comment.article_id,
            description: comment.description,
            created_at: Utc::now(),
        };
        store.comments.push(created.clone());
        if let Some(article) = store.article_mut(created.article_id) {
            article.comments.push(created.id);
        }
        Ok(created)
    }

    async fn get_comments_by_article(&self, article_id: Uuid) -> RepositoryResult<Vec<Comment>> {
        let store = self.store.read().await;
        store.check(FailPoint::GetComments)?;
        Ok(store
            .comments
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect())
    }

    async fn delete_comments_by_article(&self, article_id: Uuid) -> RepositoryResult<u64> {
        let mut store = self.store.write().await;
        store.check(FailPoint::DeleteComments)?;
        let before = store.comments.len();
        store.comments.retain(|c| c.article_id != article_id);
        Ok((before - store.comments.len()) as u64)
    }

    async fn close(&self) {}
}

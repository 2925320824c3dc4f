use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use super::Repository;
use crate::{
    error::RepositoryResult,
    models::{
        Article, Comment, CreateArticleRequest, Gender, NewComment, NewUser, Role,
        UpdateArticleRequest, UpdateProfileRequest, User,
    },
};

// Follow sets and like sets live in their own tables and are folded back into arrays here.
const USER_SELECT: &str = r#"
    SELECT u.id, u.username, u.email, u.password_hash, u.description, u.profile_picture,
           u.role, u.gender, u.auth_token, u.created_at,
           ARRAY(SELECT f.follower_id FROM follows f WHERE f.following_id = u.id) AS followers,
           ARRAY(SELECT f.following_id FROM follows f WHERE f.follower_id = u.id) AS followings
    FROM users u
"#;

const ARTICLE_SELECT: &str = r#"
    SELECT a.id, a.user_id, a.title, a.description, a.img_url, a.tags,
           ARRAY(SELECT l.user_id FROM article_likes l WHERE l.article_id = a.id) AS likes,
           ARRAY(SELECT c.id FROM comments c WHERE c.article_id = a.id
                 ORDER BY c.created_at, c.id) AS comments,
           a.created_at, a.updated_at
    FROM articles a
"#;

/// UserRow
///
/// Raw database row (internal use). The arrays become sets in [`User`].
#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    description: String,
    profile_picture: String,
    role: Role,
    gender: Option<Gender>,
    auth_token: Option<String>,
    created_at: DateTime<Utc>,
    followers: Vec<Uuid>,
    followings: Vec<Uuid>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            description: row.description,
            profile_picture: row.profile_picture,
            followers: row.followers.into_iter().collect(),
            followings: row.followings.into_iter().collect(),
            role: row.role,
            gender: row.gender,
            auth_token: row.auth_token,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct ArticleRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    img_url: Option<String>,
    tags: Vec<String>,
    likes: Vec<Uuid>,
    comments: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            img_url: row.img_url,
            tags: row.tags,
            likes: row.likes.into_iter().collect(),
            comments: row.comments,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Wraps an already initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool of at most `max_connections` connections.
    pub async fn connect(db_url: &str, max_connections: u32) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations under `./migrations`.
    pub async fn migrate(&self) -> RepositoryResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn fetch_user_where(
        &self,
        clause: &str,
        value: &str,
    ) -> RepositoryResult<Option<User>> {
        let sql = format!("{USER_SELECT} WHERE {clause}");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, password_hash, description, profile_picture, role, gender)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, username, email, password_hash, description, profile_picture,
                      role, gender, auth_token, created_at,
                      ARRAY[]::uuid[] AS followers, ARRAY[]::uuid[] AS followings
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.description)
        .bind(&user.profile_picture)
        .bind(user.role)
        .bind(user.gender)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_user(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let sql = format!("{USER_SELECT} WHERE u.id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        self.fetch_user_where("u.username = $1", username).await
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.fetch_user_where("u.email = $1", email).await
    }

    async fn get_users(&self, ids: &[Uuid]) -> RepositoryResult<Vec<User>> {
        let sql = format!("{USER_SELECT} WHERE u.id = ANY($1)");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Uses `COALESCE` so that only the provided fields are written.
    async fn update_profile(
        &self,
        id: Uuid,
        changes: UpdateProfileRequest,
    ) -> RepositoryResult<Option<User>> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET description = COALESCE($2, description),
                profile_picture = COALESCE($3, profile_picture),
                gender = COALESCE($4, gender)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.description)
        .bind(changes.profile_picture)
        .bind(changes.gender)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.get_user(id).await,
            None => Ok(None),
        }
    }

    async fn set_auth_token(&self, id: Uuid, token: &str) -> RepositoryResult<()> {
        sqlx::query("UPDATE users SET auth_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn add_follow(&self, follower_id: Uuid, following_id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query(
            "INSERT INTO follows (follower_id, following_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_follow(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> RepositoryResult<bool> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
                .bind(follower_id)
                .bind(following_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_article(
        &self,
        owner_id: Uuid,
        req: CreateArticleRequest,
    ) -> RepositoryResult<Article> {
        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            INSERT INTO articles (id, user_id, title, description, img_url, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING id, user_id, title, description, img_url, tags,
                      ARRAY[]::uuid[] AS likes, ARRAY[]::uuid[] AS comments,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.img_url)
        .bind(req.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_article(&self, id: Uuid) -> RepositoryResult<Option<Article>> {
        let sql = format!("{ARTICLE_SELECT} WHERE a.id = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Article::from))
    }

    async fn update_article(
        &self,
        id: Uuid,
        changes: UpdateArticleRequest,
    ) -> RepositoryResult<Option<Article>> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE articles
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                img_url = COALESCE($4, img_url),
                tags = COALESCE($5, tags),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.img_url)
        .bind(changes.tags)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.get_article(id).await,
            None => Ok(None),
        }
    }

    async fn delete_article(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_articles_by_owners(&self, owner_ids: &[Uuid]) -> RepositoryResult<Vec<Article>> {
        let sql = format!("{ARTICLE_SELECT} WHERE a.user_id = ANY($1) ORDER BY a.created_at DESC");
        let rows = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(owner_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// `ON CONFLICT DO NOTHING` keeps the like set duplicate-free under concurrent togglers.
    async fn push_like(&self, article_id: Uuid, user_id: Uuid) -> RepositoryResult<()> {
        sqlx::query(
            "INSERT INTO article_likes (article_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(article_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn pull_like(&self, article_id: Uuid, user_id: Uuid) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM article_likes WHERE article_id = $1 AND user_id = $2")
            .bind(article_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn add_comment(&self, comment: NewComment) -> RepositoryResult<Comment> {
        let created = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, user_id, article_id, description, created_at)
            VALUES ($1, $2, $3, $4, clock_timestamp())
            RETURNING id, user_id, article_id, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(comment.user_id)
        .bind(comment.article_id)
        .bind(comment.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_comments_by_article(&self, article_id: Uuid) -> RepositoryResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, user_id, article_id, description, created_at
            FROM comments
            WHERE article_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn delete_comments_by_article(&self, article_id: Uuid) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE article_id = $1")
            .bind(article_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

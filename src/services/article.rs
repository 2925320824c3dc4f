use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        ApiMessage, Article, ArticleAuthor, ArticleDetail, CreateArticleRequest, ResponseStatus,
        Role, TimelineArticle, TimelineResponse, UpdateArticleRequest, UserArticlesResponse,
    },
    repository::Repository,
};

/// Outcome of a like toggle, i.e. the state the article is in afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Liked,
    NotLiked,
}

impl LikeState {
    pub fn message(&self) -> &'static str {
        match self {
            LikeState::Liked => "the article has been liked",
            LikeState::NotLiked => "the article has been disliked",
        }
    }
}

async fn load_article(repo: &dyn Repository, article_id: Uuid) -> ApiResult<Article> {
    repo.get_article(article_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("article not found".to_string()))
}

#[tracing::instrument(skip(repo, payload))]
pub async fn create_article(
    repo: &dyn Repository,
    owner_id: Uuid,
    payload: CreateArticleRequest,
) -> ApiResult<ApiMessage> {
    let article = repo.create_article(owner_id, payload).await?;
    tracing::info!(article_id = %article.id, "article created");
    Ok(ApiMessage::success("article has been created"))
}

/// Only the owner may update. Admins get no override here, unlike delete.
#[tracing::instrument(skip(repo, changes))]
pub async fn update_article(
    repo: &dyn Repository,
    requester_id: Uuid,
    article_id: Uuid,
    changes: UpdateArticleRequest,
) -> ApiResult<ApiMessage> {
    let article = load_article(repo, article_id).await?;
    if article.user_id != requester_id {
        tracing::warn!(owner_id = %article.user_id, "update denied: requester is not the owner");
        return Err(ApiError::Unauthorized);
    }

    // None here means the article vanished between the load and the write.
    repo.update_article(article_id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("article not found".to_string()))?;
    Ok(ApiMessage::success("article has been updated"))
}

/// delete_article
///
/// Owner or admin only. Removes the article and then every comment that references it.
/// The two deletions are not atomic; if the comment cleanup fails after the article is
/// gone, the failure is returned as a persistence error rather than swallowed.
#[tracing::instrument(skip(repo))]
pub async fn delete_article(
    repo: &dyn Repository,
    requester_id: Uuid,
    requester_role: Role,
    article_id: Uuid,
) -> ApiResult<ApiMessage> {
    let article = load_article(repo, article_id).await?;
    if article.user_id != requester_id && requester_role != Role::Admin {
        tracing::warn!(owner_id = %article.user_id, "delete denied: not owner and not admin");
        return Err(ApiError::Unauthorized);
    }

    repo.delete_article(article_id).await?;
    let removed = repo
        .delete_comments_by_article(article_id)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "article deleted but comment cleanup failed");
        })?;

    tracing::info!(removed_comments = removed, "article deleted");
    Ok(ApiMessage::success("article has been deleted"))
}

/// The article with its comments resolved, returned without an envelope.
pub async fn get_article(repo: &dyn Repository, article_id: Uuid) -> ApiResult<ArticleDetail> {
    let article = load_article(repo, article_id).await?;
    let comments = repo.get_comments_by_article(article_id).await?;
    Ok(ArticleDetail::new(article, comments))
}

/// get_articles_user
///
/// An unknown username is reported as a server error, not as a 404. Existing clients
/// depend on that status.
pub async fn get_articles_user(
    repo: &dyn Repository,
    username: &str,
) -> ApiResult<UserArticlesResponse> {
    let user = repo.find_user_by_username(username).await?.ok_or_else(|| {
        ApiError::Internal(format!("cannot read articles of unknown user '{username}'"))
    })?;

    let articles = repo.get_articles_by_owners(&[user.id]).await?;
    Ok(UserArticlesResponse {
        status: ResponseStatus::Success,
        articles,
    })
}

/// get_timeline
///
/// Articles written by everyone the requester follows, newest first, each with its author
/// populated. Following nobody yields an empty list.
#[tracing::instrument(skip(repo))]
pub async fn get_timeline(
    repo: &dyn Repository,
    requester_id: Uuid,
) -> ApiResult<TimelineResponse> {
    let requester = repo
        .get_user(requester_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    if requester.followings.is_empty() {
        return Ok(TimelineResponse {
            status: ResponseStatus::Success,
            articles: Vec::new(),
        });
    }

    let owner_ids: Vec<Uuid> = requester.followings.iter().copied().collect();
    let articles = repo.get_articles_by_owners(&owner_ids).await?;
    let authors: HashMap<Uuid, ArticleAuthor> = repo
        .get_users(&owner_ids)
        .await?
        .iter()
        .map(|user| (user.id, ArticleAuthor::from(user)))
        .collect();

    let articles: Vec<TimelineArticle> = articles
        .into_iter()
        .filter_map(|article| {
            let author = authors.get(&article.user_id)?.clone();
            Some(TimelineArticle::new(article, author))
        })
        .collect();

    tracing::debug!(count = articles.len(), "timeline composed");
    Ok(TimelineResponse {
        status: ResponseStatus::Success,
        articles,
    })
}

/// like_unlike
///
/// Flips the requester's membership in the article's like set. The push and pull are
/// single atomic store operations, so concurrent togglers never duplicate an entry.
#[tracing::instrument(skip(repo))]
pub async fn like_unlike(
    repo: &dyn Repository,
    requester_id: Uuid,
    article_id: Uuid,
) -> ApiResult<LikeState> {
    let article = load_article(repo, article_id).await?;

    if article.likes.contains(&requester_id) {
        repo.pull_like(article_id, requester_id).await?;
        Ok(LikeState::NotLiked)
    } else {
        repo.push_like(article_id, requester_id).await?;
        Ok(LikeState::Liked)
    }
}

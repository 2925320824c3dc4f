use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{Comment, NewComment},
    repository::Repository,
    validation::validate_comment_description,
};

/// add_comment
///
/// Validates the description before touching the store, then attaches the comment to the
/// article's comment sequence.
#[tracing::instrument(skip(repo, description))]
pub async fn add_comment(
    repo: &dyn Repository,
    author_id: Uuid,
    article_id: Uuid,
    description: String,
) -> ApiResult<Comment> {
    validate_comment_description(&description)?;

    if repo.get_article(article_id).await?.is_none() {
        return Err(ApiError::NotFound("article not found".to_string()));
    }

    let comment = repo
        .add_comment(NewComment {
            user_id: author_id,
            article_id,
            description,
        })
        .await?;
    tracing::info!(comment_id = %comment.id, "comment added");
    Ok(comment)
}

/// Comments of an article in insertion order. An unknown article simply has none.
pub async fn get_by_article_id(
    repo: &dyn Repository,
    article_id: Uuid,
) -> ApiResult<Vec<Comment>> {
    Ok(repo.get_comments_by_article(article_id).await?)
}

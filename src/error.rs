use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{models::ApiMessage, validation::ValidationError};

/// The one message every authorization failure answers with. It never says *why*.
pub const UNAUTHORIZED_MESSAGE: &str = "you are not authorized";

/// RepositoryError
///
/// Failure raised by a data store implementation. The display text is what ends up in the
/// `message` field of a 500 response, so it is kept verbatim.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Non-SQL store failure (in-memory store, injected faults).
    #[error("{0}")]
    Store(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// ApiError
///
/// The error kinds a service operation can end in. Implements `IntoResponse` so handlers
/// return `Result<_, ApiError>` and the failure envelope is produced in one place.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] RepositoryError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Persistence(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(ApiMessage::failure(self.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

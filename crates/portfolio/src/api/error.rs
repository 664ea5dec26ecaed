//! API error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Error returned by route handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, .. } => ApiError::NotFound(format!("{entity} not found")),
            RepositoryError::InvalidInput { message } => ApiError::BadRequest(message),
            RepositoryError::Database(e) => {
                tracing::error!(error = %e, "Database error while handling request");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn repository_errors_map_to_statuses() {
        let not_found: ApiError = RepositoryError::not_found("Note", "x").into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Note not found");

        let invalid: ApiError = RepositoryError::invalid_input("content is required").into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let db: ApiError = RepositoryError::Database(DbErr::Custom("boom".into())).into();
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn into_response_uses_status() {
        let response = ApiError::not_found("Blog not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

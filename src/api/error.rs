//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::documents::DocumentError;
use crate::news::NewsError;
use crate::storage::StorageError;
use crate::workflow::WorkflowError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("File exceeds the 6 MiB upload limit")]
    FileTooLarge,
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Contract is already being reviewed")]
    AlreadyInReview,
    #[error("Signed URL has expired")]
    UrlExpired,
    #[error("{0}")]
    UpstreamFailed(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Authentication required".to_string(),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::FileTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "FILE_TOO_LARGE",
                "File exceeds the 6 MiB upload limit".to_string(),
            ),
            ApiError::UnsupportedFileType(mime) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FILE_TYPE",
                format!("Unsupported file type: {mime}. Upload a PDF, JPEG or PNG."),
            ),
            ApiError::AlreadyInReview => (
                StatusCode::CONFLICT,
                "ALREADY_IN_REVIEW",
                "Contract is already being reviewed".to_string(),
            ),
            ApiError::UrlExpired => (
                StatusCode::GONE,
                "URL_EXPIRED",
                "Signed URL has expired".to_string(),
            ),
            ApiError::UpstreamFailed(detail) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_FAILED", detail.clone())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnknownToken => ApiError::NotFound("Signed URL is unknown".into()),
            StorageError::UrlExpired => ApiError::UrlExpired,
            StorageError::NotFound(key) => ApiError::NotFound(format!("Object not found: {key}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NotFound => ApiError::NotFound("Contract not found".into()),
            WorkflowError::AlreadyInReview => ApiError::AlreadyInReview,
            WorkflowError::Database(e) => ApiError::Internal(e.to_string()),
            WorkflowError::ReviewFailed => {
                ApiError::UpstreamFailed("Failed to review document".into())
            }
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::GenerationFailed => {
                ApiError::UpstreamFailed("Failed to generate document".into())
            }
            DocumentError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<NewsError> for ApiError {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            other => {
                tracing::warn!(error = %other, "News fetch failed");
                ApiError::UpstreamFailed("Failed to fetch legal news".into())
            }
        }
    }
}

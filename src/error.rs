//! Board error types with HTTP status code mapping.
//!
//! [`BoardError`] is the central error type for the service. Each variant
//! maps to an HTTP status code and one of two JSON body shapes:
//!
//! ```json
//! { "error": "Missing required fields" }
//! ```
//!
//! for rejected votes (400), and
//!
//! ```json
//! { "message": "database error: ...", "status": "error" }
//! ```
//!
//! for everything else.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Body of every non-vote error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub message: String,
    /// Always `"error"`.
    pub status: String,
}

/// Body of a rejected `POST /vote`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VoteRejection {
    /// Reason the vote was rejected.
    pub error: String,
}

/// Server-side error enum with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// `post_id` or `vote_type` was absent or empty.
    #[error("Missing required fields")]
    MissingVoteFields,

    /// The vote body could not be read as JSON.
    #[error("{0}")]
    InvalidVoteBody(String),

    /// A required comment field was absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A form or JSON body could not be parsed.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// A path segment that must be an integer was not one.
    #[error("Not Found")]
    InvalidPathId,

    /// The request body exceeded the configured limit.
    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,

    /// Database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Upload directory I/O failure.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl BoardError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingVoteFields | Self::InvalidVoteBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidPathId => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingField(_)
            | Self::InvalidBody(_)
            | Self::Database(_)
            | Self::Migration(_)
            | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn is_vote_rejection(&self) -> bool {
        matches!(self, Self::MissingVoteFields | Self::InvalidVoteBody(_))
    }
}

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let mut response = if self.is_vote_rejection() {
            axum::Json(VoteRejection {
                error: self.to_string(),
            })
            .into_response()
        } else {
            axum::Json(ErrorResponse {
                message: self.to_string(),
                status: "error".to_string(),
            })
            .into_response()
        };
        *response.status_mut() = status;
        response
    }
}

impl From<MultipartRejection> for BoardError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl From<MultipartError> for BoardError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::InvalidBody(err.body_text())
        }
    }
}

impl From<FormRejection> for BoardError {
    fn from(rejection: FormRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::InvalidBody(rejection.body_text())
        }
    }
}

impl From<JsonRejection> for BoardError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::InvalidBody(rejection.body_text())
        }
    }
}

impl From<PathRejection> for BoardError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "path did not match");
        Self::InvalidPathId
    }
}

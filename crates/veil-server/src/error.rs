//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use veil_core::moderation::SubmissionType;
use veil_core::resources::RejectionInfo;
use veil_core::SubmissionError;

/// API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request body.
    #[error("{0}")]
    BadRequest(String),

    /// Submission failed validation.
    #[error("{0}")]
    Validation(#[from] SubmissionError),

    /// Submission was refused by moderation.
    #[error("{}", .0.reason)]
    Rejected(RejectionInfo),

    /// Unsupported method on a submission route.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Persistence or other failure while handling a submission.
    #[error("Failed to submit {kind}. Please try again.")]
    SubmissionFailed {
        kind: SubmissionType,
        details: Option<String>,
    },
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, Some("bad_request")),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, Some("validation_error")),
            ApiError::Rejected(info) => {
                return (StatusCode::BAD_REQUEST, axum::Json(info)).into_response();
            }
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, None),
            ApiError::SubmissionFailed { .. } => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let details = match &self {
            ApiError::SubmissionFailed { details, .. } => details.clone(),
            _ => None,
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.map(str::to_string),
            details,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

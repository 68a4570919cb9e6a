//! API error handling
//!
//! Every failure is rendered as `{success: false, message, code}`. In
//! production mode internal errors return generic messages without details.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details are included in responses
///
/// Set to `false` in production.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

const GENERIC_MESSAGE: &str = "An error occurred processing your request";

/// Replace client-facing messages that leak storage details
fn sanitize_error_message(msg: &str) -> String {
    if should_expose_details() {
        return msg.to_string();
    }

    let sensitive_patterns = [
        "/home/",
        "/var/",
        "sqlite",
        "constraint",
        "database",
        "panicked at",
        ".rs:",
    ];

    let msg_lower = msg.to_lowercase();
    if sensitive_patterns.iter().any(|p| msg_lower.contains(p)) {
        return GENERIC_MESSAGE.to_string();
    }
    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required field missing or malformed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The station is already on the line
    #[error("Duplicate link: {0}")]
    DuplicateLink(String),

    /// Well-formed request that cannot be applied
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A topology change was stored but the line's aggregates are stale
    #[error("Aggregate inconsistency on line {line_id}: {reason}")]
    AggregateInconsistency { line_id: String, reason: String },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// Machine-readable error code
    pub code: &'static str,
    /// Underlying cause, only outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// A failure body without details
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code,
            details: None,
        }
    }
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DuplicateLink(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::AggregateInconsistency { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(msg) => ErrorResponse::new("validation_error", msg),
            Self::DuplicateLink(msg) => ErrorResponse::new("duplicate_link", msg),
            Self::BadRequest(msg) => ErrorResponse::new("bad_request", sanitize_error_message(&msg)),
            Self::NotFound(msg) => ErrorResponse::new("not_found", sanitize_error_message(&msg)),
            Self::AggregateInconsistency { line_id, reason } => ErrorResponse {
                details: should_expose_details().then_some(reason),
                ..ErrorResponse::new(
                    "aggregate_inconsistency",
                    format!(
                        "Change saved but aggregates of line {line_id} could not be refreshed; \
                         reconcile the line"
                    ),
                )
            },
            Self::ServiceUnavailable(msg) => ErrorResponse {
                details: should_expose_details().then_some(msg),
                ..ErrorResponse::new("service_unavailable", "Service temporarily unavailable")
            },
            Self::Internal(msg) => ErrorResponse {
                details: should_expose_details().then_some(msg),
                ..ErrorResponse::new("internal_error", "An internal error occurred")
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => Self::Validation(msg),
            e @ DomainError::NotFound { .. } => Self::NotFound(e.to_string()),
            e @ DomainError::DuplicateLink { .. } => Self::DuplicateLink(e.to_string()),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => e.into(),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::InvalidOperation(msg) => Self::BadRequest(msg),
            ApplicationError::AggregateInconsistency { line_id, reason } => {
                error!(%line_id, %reason, "Responding with aggregate inconsistency");
                Self::AggregateInconsistency {
                    line_id: line_id.to_string(),
                    reason,
                }
            },
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}

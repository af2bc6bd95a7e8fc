//! The external error contract.
//!
//! Every non-2xx HTTP response is this envelope. `ApiError` is the single
//! type every handler returns on failure; it knows how to render itself,
//! following the same `impl IntoResponse for ...Error` shape the teacher
//! uses in `auth::api::AuthApiError`, extended to carry the structured
//! fields clients rely on for retry.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::store::StoreError;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub details: Value,
    pub request_id: String,
    pub retryable: bool,
}

/// Taxonomy of failures the HTTP surface can return. Variants map 1:1 to the
/// `code` values enumerated in the spec's representative list.
#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidInput { message: String, details: Value },
    InvalidCredentials,
    EmailAlreadyExists,
    InvalidToken,
    Forbidden,
    NotFound { what: &'static str },
    Conflict { message: String },
    DuplicateReasonReport,
    ReasonRevisionHistoryNotFound,
    BriefLinkExpired,
    CompareUpstreamTimeout,
    TemporarilyUnavailable { message: String },
    UpstreamUnavailable { message: String },
    Backpressure,
    Unknown,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput { .. } => "invalid_input",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::EmailAlreadyExists => "email_already_exists",
            ApiError::InvalidToken => "invalid_token",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Conflict { .. } => "conflict",
            ApiError::DuplicateReasonReport => "duplicate_reason_report",
            ApiError::ReasonRevisionHistoryNotFound => "reason_revision_history_not_found",
            ApiError::BriefLinkExpired => "brief_link_expired",
            ApiError::CompareUpstreamTimeout => "compare_upstream_timeout",
            ApiError::TemporarilyUnavailable { .. } => "temporarily_unavailable",
            ApiError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ApiError::Backpressure => "temporarily_unavailable",
            ApiError::Unknown => "unknown_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::EmailAlreadyExists => StatusCode::CONFLICT,
            ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DuplicateReasonReport => StatusCode::BAD_REQUEST,
            ApiError::ReasonRevisionHistoryNotFound => StatusCode::NOT_FOUND,
            ApiError::BriefLinkExpired => StatusCode::GONE,
            ApiError::CompareUpstreamTimeout => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::TemporarilyUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Backpressure => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            ApiError::CompareUpstreamTimeout
                | ApiError::TemporarilyUnavailable { .. }
                | ApiError::UpstreamUnavailable { .. }
                | ApiError::Backpressure
        )
    }

    fn message(&self) -> String {
        match self {
            ApiError::InvalidInput { message, .. } => message.clone(),
            ApiError::InvalidCredentials => "invalid username or password".into(),
            ApiError::EmailAlreadyExists => "an account with this email already exists".into(),
            ApiError::InvalidToken => "invalid or expired token".into(),
            ApiError::Forbidden => "you do not have access to this resource".into(),
            ApiError::NotFound { what } => format!("{what} not found"),
            ApiError::Conflict { message } => message.clone(),
            ApiError::DuplicateReasonReport => {
                "an open report already exists for this reason".into()
            }
            ApiError::ReasonRevisionHistoryNotFound => {
                "no reports have ever been filed for this event".into()
            }
            ApiError::BriefLinkExpired => "this brief has expired".into(),
            ApiError::CompareUpstreamTimeout => {
                "evidence comparison timed out, try again".into()
            }
            ApiError::TemporarilyUnavailable { message } => message.clone(),
            ApiError::UpstreamUnavailable { message } => message.clone(),
            ApiError::Backpressure => "the reason engine queue is full, retry shortly".into(),
            ApiError::Unknown => "an unexpected error occurred".into(),
        }
    }

    fn details(&self) -> Value {
        match self {
            ApiError::InvalidInput { details, .. } => details.clone(),
            _ => json!({}),
        }
    }

    pub fn into_envelope(self, request_id: String) -> ErrorEnvelope {
        ErrorEnvelope {
            code: self.code().to_string(),
            message: self.message(),
            details: self.details(),
            request_id,
            retryable: self.retryable(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            message: message.into(),
            details: json!({}),
        }
    }

    pub fn not_found(what: &'static str) -> Self {
        ApiError::NotFound { what }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound { what },
            StoreError::Conflict(message) => ApiError::Conflict { message },
            StoreError::InvalidInput(message) => ApiError::invalid_input(message),
            StoreError::Backpressure => ApiError::Backpressure,
        }
    }
}

/// Wrapper carried through axum's error path so handlers can return
/// `Result<T, ApiError>` directly while the request-id middleware still gets
/// to stamp the envelope with the request's own id.
pub struct ApiErrorResponse {
    pub error: ApiError,
    pub request_id: String,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let envelope = self.error.into_envelope(self.request_id);
        (status, Json(envelope)).into_response()
    }
}

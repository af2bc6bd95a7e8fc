pub mod auth;
pub mod briefs;
pub mod events;
pub mod health;
pub mod notifications;
pub mod symbols;
pub mod thresholds;
pub mod watchlists;

use axum::Json;

use crate::error::{ApiError, ApiErrorResponse};
use crate::http::middleware::RequestId;

/// Every handler's success type. Plain `Json<T>` on success, an envelope on
/// failure, matching the teacher's `Result<Json<T>, ...ApiError>` handler
/// signature shape.
pub type HandlerResult<T> = Result<Json<T>, ApiErrorResponse>;

pub(crate) fn ok<T>(value: T) -> HandlerResult<T> {
    Ok(Json(value))
}

pub(crate) fn fail<T>(request_id: &RequestId, error: ApiError) -> HandlerResult<T> {
    Err(ApiErrorResponse { error, request_id: request_id.as_str().to_string() })
}

pub(crate) fn wrap<T>(request_id: &RequestId, result: Result<T, ApiError>) -> HandlerResult<T> {
    result.map(Json).map_err(|error| ApiErrorResponse { error, request_id: request_id.as_str().to_string() })
}

//! Per-window alert threshold listing and upsert.

use axum::extract::State;
use axum::Extension;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::http::handlers::{ok, wrap, HandlerResult};
use crate::http::middleware::RequestId;
use crate::http::state::AppState;
use crate::models::Threshold;

#[derive(Debug, Serialize)]
pub struct ThresholdListResponse {
    pub items: Vec<Threshold>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> HandlerResult<ThresholdListResponse> {
    ok(ThresholdListResponse { items: state.store.thresholds.list_for_user(auth_user.0) })
}

#[derive(Debug, Deserialize)]
pub struct UpsertRequest {
    pub window_minutes: u32,
    pub threshold_pct: f64,
}

pub async fn upsert(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    axum::Json(payload): axum::Json<UpsertRequest>,
) -> HandlerResult<Threshold> {
    let threshold = Threshold {
        user_id: auth_user.0,
        window_minutes: payload.window_minutes,
        threshold_pct: payload.threshold_pct,
    };
    let result: Result<Threshold, ApiError> = state.store.thresholds.upsert(threshold).map_err(ApiError::from);
    wrap(&request_id, result)
}

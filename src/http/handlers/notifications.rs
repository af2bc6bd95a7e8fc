//! Notification listing and mark-read.

use axum::extract::{Path, State};
use axum::Extension;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::http::handlers::{ok, wrap, HandlerResult};
use crate::http::middleware::RequestId;
use crate::http::state::AppState;
use crate::models::Notification;

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub items: Vec<Notification>,
    pub unread_count: usize,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> HandlerResult<NotificationListResponse> {
    let items = state.store.notifications.list_for_user(auth_user.0);
    let unread_count = state.store.notifications.unread_count(auth_user.0);
    ok(NotificationListResponse { items, unread_count })
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    Path(notification_id): Path<Uuid>,
) -> HandlerResult<Notification> {
    let now = state.clock.now();
    let result: Result<Notification, ApiError> = state
        .store
        .notifications
        .mark_read(auth_user.0, notification_id, now)
        .map_err(ApiError::from);
    wrap(&request_id, result)
}

//! Brief listing, detail (with auto-mark-read and expiry), explicit mark-read.

use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::brief_builder;
use crate::error::ApiError;
use crate::http::handlers::{fail, ok, wrap, HandlerResult};
use crate::http::middleware::RequestId;
use crate::http::state::AppState;
use crate::models::Brief;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    20
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<Brief>,
    pub unread_count: usize,
    pub total: usize,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> HandlerResult<ListResponse> {
    let now = state.clock.now();
    let size = params.size.clamp(1, 100);
    let all = state.store.briefs.list_for_user(auth_user.0);
    let total = all.len();
    let unread_count = all.iter().filter(|b| b.read_at_utc.is_none()).count();
    let items = all.into_iter().take(size).map(|b| brief_builder::stamp_expiry(b, now)).collect();
    ok(ListResponse { items, unread_count, total })
}

fn owned_brief(state: &AppState, auth_user: AuthUser, brief_id: Uuid) -> Result<Brief, ApiError> {
    let brief = state.store.briefs.get(brief_id).map_err(ApiError::from)?;
    if brief.user_id != auth_user.0 {
        return Err(ApiError::not_found("brief"));
    }
    Ok(brief)
}

/// Fetching an unexpired, unread brief marks it read as a side effect, per
/// the "may mark-as-read" clause. An expired brief is rejected outright
/// before that check, so viewing a stale link never resurrects it.
pub async fn get(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    Path(brief_id): Path<Uuid>,
) -> HandlerResult<Brief> {
    let brief = match owned_brief(&state, auth_user, brief_id) {
        Ok(brief) => brief,
        Err(err) => return fail(&request_id, err),
    };

    let now = state.clock.now();
    if brief_builder::is_expired(&brief, now) {
        return fail(&request_id, ApiError::BriefLinkExpired);
    }

    if brief.read_at_utc.is_none() {
        let result = state.store.briefs.mark_read(auth_user.0, brief_id, now).map_err(ApiError::from);
        return wrap(&request_id, result.map(|b| brief_builder::stamp_expiry(b, now)));
    }

    ok(brief_builder::stamp_expiry(brief, now))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    Path(brief_id): Path<Uuid>,
) -> HandlerResult<Brief> {
    let now = state.clock.now();
    let result = state.store.briefs.mark_read(auth_user.0, brief_id, now).map_err(ApiError::from);
    wrap(&request_id, result.map(|b| brief_builder::stamp_expiry(b, now)))
}

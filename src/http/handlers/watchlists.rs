//! Watchlist item listing, addition and removal.

use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::http::handlers::{fail, ok, wrap, HandlerResult};
use crate::http::middleware::RequestId;
use crate::http::state::AppState;
use crate::models::{Market, WatchlistItem};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_page() -> usize {
    1
}

fn default_size() -> usize {
    20
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<WatchlistItem>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> HandlerResult<ListResponse> {
    let all = state.store.watchlist.list_for_user(auth_user.0);
    let total = all.len();
    let page = params.page.max(1);
    let size = params.size.clamp(1, 100);
    let start = (page - 1) * size;
    let items = all.into_iter().skip(start).take(size).collect();
    ok(ListResponse { items, page, size, total })
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub symbol: String,
    pub market: Market,
}

#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub item: WatchlistItem,
    pub is_duplicate: bool,
}

pub async fn add(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    axum::Json(payload): axum::Json<AddRequest>,
) -> HandlerResult<AddResponse> {
    let ticker = payload.symbol.trim().to_uppercase();
    if ticker.is_empty() {
        return fail(&request_id, ApiError::invalid_input("symbol must not be empty"));
    }
    if !state.catalog.is_active(payload.market, &ticker) {
        return fail(&request_id, ApiError::invalid_input("unknown or inactive symbol"));
    }

    let existing = state
        .store
        .watchlist
        .list_for_user(auth_user.0)
        .into_iter()
        .find(|i| i.market == payload.market && i.ticker == ticker);

    if let Some(item) = existing {
        return ok(AddResponse { item, is_duplicate: true });
    }

    let item = WatchlistItem {
        id: state.ids.new_id(),
        user_id: auth_user.0,
        market: payload.market,
        ticker,
        created_at_utc: state.clock.now(),
    };

    let result: Result<AddResponse, ApiError> = state
        .store
        .watchlist
        .add(item)
        .map(|item| AddResponse { item, is_duplicate: false })
        .map_err(ApiError::from);
    wrap(&request_id, result)
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
) -> HandlerResult<()> {
    let result = state.store.watchlist.remove(auth_user.0, item_id).map_err(ApiError::from);
    wrap(&request_id, result)
}

//! GET /v1/symbols/search

use axum::extract::{Query, State};
use axum::Extension;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::error::ApiError;
use crate::http::handlers::{wrap, HandlerResult};
use crate::http::middleware::RequestId;
use crate::http::state::AppState;
use crate::models::Market;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub market: Option<Market>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub items: Vec<CatalogEntry>,
    pub catalog_version: String,
}

pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> HandlerResult<SearchResponse> {
    let result: Result<SearchResponse, ApiError> = (|| {
        let len = params.q.trim().len();
        if !(2..=20).contains(&len) {
            return Err(ApiError::invalid_input("q must be between 2 and 20 characters"));
        }
        let items = state.catalog.search(&params.q, params.market);
        Ok(SearchResponse { items, catalog_version: state.catalog.version().to_string() })
    })();
    wrap(&request_id, result)
}

//! Route assembly, mirroring the teacher's protected/public/auth
//! router-merge shape: separate `Router::new()` trees merged into one `app`,
//! with middleware layered bottom-to-top afterward.

use std::time::Duration;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::auth::auth_middleware;
use crate::http::handlers::{auth, briefs, events, health, notifications, symbols, thresholds, watchlists};
use crate::http::middleware::{request_logging_simple, stamp_request_id};
use crate::http::state::AppState;

fn cors_layer(allowed_ports: &[u16]) -> CorsLayer {
    let ports = allowed_ports.to_vec();
    CorsLayer::new()
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
        .allow_origin(AllowOrigin::predicate(move |origin, _request_parts| {
            let Ok(origin) = origin.to_str() else { return false };
            ports.iter().any(|port| {
                origin == format!("http://localhost:{port}") || origin == format!("http://127.0.0.1:{port}")
            })
        }))
}

pub fn build(app_state: AppState) -> Router {
    let auth_router = Router::new()
        .route("/v1/auth/signup", post(auth::signup))
        .route("/v1/auth/login", post(auth::login))
        .with_state(app_state.clone());

    let protected_routes = Router::new()
        .route("/v1/auth/me", get(auth::me))
        .route("/v1/symbols/search", get(symbols::search))
        .route("/v1/watchlists/items", get(watchlists::list).post(watchlists::add))
        .route("/v1/watchlists/items/:id", axum::routing::delete(watchlists::remove))
        .route("/v1/events", get(events::list))
        .route("/v1/events/:id", get(events::get))
        .route("/v1/events/:id/feedback", post(events::feedback))
        .route("/v1/events/:id/reason-reports", post(events::reason_reports))
        .route("/v1/events/:id/reason-reports/:report_id", patch(events::transition_reason_report))
        .route("/v1/events/:id/reason-revisions", get(events::reason_revisions))
        .route("/v1/events/:id/evidence-compare", get(events::evidence_compare_handler))
        .route("/v1/briefs", get(briefs::list))
        .route("/v1/briefs/:id", get(briefs::get))
        .route("/v1/briefs/:id/read", patch(briefs::mark_read))
        .route("/v1/notifications", get(notifications::list))
        .route("/v1/notifications/:id/read", patch(notifications::mark_read))
        .route("/v1/thresholds", get(thresholds::list).post(thresholds::upsert))
        .route_layer(axum::middleware::from_fn_with_state(app_state.jwt_handler.clone(), auth_middleware))
        .with_state(app_state.clone());

    let public_routes = Router::new().route("/health", get(health::health)).with_state(app_state.clone());

    let app = Router::new().merge(public_routes).merge(protected_routes).merge(auth_router);

    let timeout = app_state.config.http_request_timeout;
    let ids_for_request_id = app_state.ids.clone();

    app.layer(cors_layer(&app_state.config.cors_allowed_ports))
        .layer(axum::middleware::from_fn(request_logging_simple))
        .layer(axum::middleware::from_fn_with_state(ids_for_request_id, stamp_request_id))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(timeout.max(Duration::from_secs(1))))
}

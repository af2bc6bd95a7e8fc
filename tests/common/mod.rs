//! Shared test harness: build the real router against an in-memory store
//! with a deterministic clock/id generator, the same way the teacher's own
//! `tests/api_http.rs`-style suites exercise a router via
//! `tower::ServiceExt::oneshot` rather than opening a socket.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt as _;

use reason_pipeline_backend::auth::JwtHandler;
use reason_pipeline_backend::catalog::Catalog;
use reason_pipeline_backend::clock::{Clock, FixedClock};
use reason_pipeline_backend::config::Config;
use reason_pipeline_backend::detector::Detector;
use reason_pipeline_backend::http::router;
use reason_pipeline_backend::http::state::AppState;
use reason_pipeline_backend::ids::{IdGen, SequentialGen};
use reason_pipeline_backend::reason_engine::{EventQueue, ReasonEngine};
use reason_pipeline_backend::store::Store;

const BODY_LIMIT: usize = 1024 * 1024;

fn test_config() -> Config {
    Config {
        port: 8080,
        jwt_secret: "test-secret-test-secret-test-secret".into(),
        jwt_expiration: Duration::from_secs(24 * 3600),
        default_threshold_pct: 3.0,
        debounce_duration: Duration::from_secs(15 * 60),
        delta_pct_for_realert: 2.0,
        reason_lookback: Duration::from_secs(24 * 3600),
        reason_trailing: Duration::from_secs(3600),
        proximity_horizon: Duration::from_secs(12 * 3600),
        adapter_timeout: Duration::from_secs(5),
        adapter_retry_budget: 3,
        reason_fetch_concurrency: 8,
        reason_engine_workers: 1,
        reason_queue_capacity: 64,
        cooldown_in_app: Duration::from_secs(30 * 60),
        cooldown_email: Duration::from_secs(60 * 60),
        brief_lookback: Duration::from_secs(24 * 3600),
        brief_top_n: 10,
        brief_min_items: 3,
        min_compare_items: 2,
        compare_polarity_threshold: 0.15,
        http_request_timeout: Duration::from_secs(10),
        cors_allowed_ports: vec![3000],
    }
}

pub struct TestHarness {
    pub app: Router,
    pub store: Store,
    pub clock: FixedClock,
    pub ids: SequentialGen,
}

pub fn build() -> TestHarness {
    let clock = FixedClock::new(chrono::Utc::now());
    let ids = SequentialGen::default();
    let config = Arc::new(test_config());
    let store = Store::new();
    let jwt_handler = Arc::new(JwtHandler::new(config.jwt_secret.clone(), config.jwt_expiration));
    let detector = Arc::new(Detector::new());
    let reason_engine = Arc::new(ReasonEngine::new(Vec::new()));
    let (event_queue, _rx) = EventQueue::new(config.reason_queue_capacity);

    let clock_dyn: Arc<dyn Clock> = Arc::new(clock.clone());
    let ids_dyn: Arc<dyn IdGen> = Arc::new(ids.clone());

    let state = AppState {
        store: store.clone(),
        clock: clock_dyn,
        ids: ids_dyn,
        config,
        jwt_handler,
        detector,
        reason_engine,
        event_queue,
        catalog: Catalog::new(),
    };

    let app = router::build(state);
    TestHarness { app, store, clock, ids }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder.header("content-type", "application/json").body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request")
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    (status, value)
}

/// Sign up a fresh user and return (user_id, bearer token).
pub async fn signup(app: &Router, email: &str) -> (uuid::Uuid, String) {
    let req = json_request(
        "POST",
        "/v1/auth/signup",
        None,
        Some(json!({ "email": email, "password": "correct horse battery staple" })),
    );
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body:?}");
    let token = body["access_token"].as_str().expect("access_token field").to_string();
    let user_id = uuid::Uuid::parse_str(body["user_id"].as_str().expect("user_id field")).expect("valid uuid");
    (user_id, token)
}

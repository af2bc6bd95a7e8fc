//! Reason pipeline backend server entrypoint.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reason_pipeline_backend::auth::JwtHandler;
use reason_pipeline_backend::brief_builder;
use reason_pipeline_backend::catalog::Catalog;
use reason_pipeline_backend::clock::{Clock, SystemClock};
use reason_pipeline_backend::config::Config;
use reason_pipeline_backend::detector::Detector;
use reason_pipeline_backend::http::state::AppState;
use reason_pipeline_backend::http::router;
use reason_pipeline_backend::ids::{IdGen, UuidGen};
use reason_pipeline_backend::models::BriefType;
use reason_pipeline_backend::reason_engine::{EventQueue, ReasonEngine};
use reason_pipeline_backend::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Arc::new(Config::from_env().context("failed to load configuration")?);
    let store = Store::new();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ids: Arc<dyn IdGen> = Arc::new(UuidGen);
    let jwt_handler = Arc::new(JwtHandler::new(config.jwt_secret.clone(), config.jwt_expiration));
    let detector = Arc::new(Detector::new());

    // No external filings/news adapters are wired in (explicitly out of
    // scope); the engine still runs so events always get a reason_status,
    // just collecting_evidence until an adapter is registered.
    let reason_engine = Arc::new(ReasonEngine::new(Vec::new()));
    let (event_queue, event_rx) = EventQueue::new(config.reason_queue_capacity);

    reason_engine.clone().spawn_workers(
        event_rx,
        config.reason_engine_workers,
        store.clone(),
        clock.clone(),
        ids.clone(),
        config.clone(),
    );

    brief_builder::spawn_ticker(
        store.clone(),
        clock.clone(),
        ids.clone(),
        config.clone(),
        BriefType::PreMarket,
        std::time::Duration::from_secs(15 * 60),
    );
    brief_builder::spawn_ticker(
        store.clone(),
        clock.clone(),
        ids.clone(),
        config.clone(),
        BriefType::PostClose,
        std::time::Duration::from_secs(15 * 60),
    );

    let app_state = AppState {
        store,
        clock,
        ids,
        config: config.clone(),
        jwt_handler,
        detector,
        reason_engine,
        event_queue,
        catalog: Catalog::new(),
    };

    let app = router::build(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("reason pipeline backend listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reason_pipeline_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

//! Pipeline orchestration (spec.md §4.3): fetch -> gate -> canonicalize ->
//! dedupe -> score -> rank -> persist, plus the bounded-queue worker pool
//! described in spec.md §5. Worker draining is grounded on the teacher's
//! `DomeEnrichmentService::spawn_workers` (`Arc<Mutex<Receiver>>` shared
//! across a fixed pool) and per-call concurrency is bounded the same way,
//! via a `tokio::sync::Semaphore`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex, Semaphore};
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::Config;
use crate::ids::IdGen;
use crate::models::{EventReason, PriceEvent};
use crate::reason_engine::adapter::{Adapter, TimeRange};
use crate::reason_engine::gate::{apply_gate, dedupe_by_canonical_url};
use crate::reason_engine::scoring::{rank_top_3, score, DEFAULT_WEIGHTS};
use crate::store::Store;

#[derive(Clone)]
pub struct ReasonEngine {
    adapters: Vec<Arc<dyn Adapter>>,
}

impl ReasonEngine {
    pub fn new(adapters: Vec<Arc<dyn Adapter>>) -> Self {
        Self { adapters }
    }

    /// Fetch every adapter's candidates for `event`, gate/dedupe/score/rank
    /// them, and persist the resulting reasons atomically with the event.
    /// A partial reason set (including zero reasons) is a valid outcome;
    /// an adapter failure never poisons the others (spec.md §4.3, §4.10).
    pub async fn run_for_event(
        &self,
        store: &Store,
        clock: &dyn Clock,
        ids: &dyn IdGen,
        config: &Config,
        event: &PriceEvent,
    ) -> Vec<EventReason> {
        let range = TimeRange {
            from_utc: event.detected_at_utc - config.reason_lookback,
            to_utc: event.detected_at_utc + config.reason_trailing,
        };

        let semaphore = Arc::new(Semaphore::new(config.reason_fetch_concurrency.max(1)));
        let mut handles = Vec::new();
        for adapter in &self.adapters {
            let adapter = Arc::clone(adapter);
            let semaphore = Arc::clone(&semaphore);
            let symbol = event.symbol.clone();
            let market = event.market;
            let timeout = config.adapter_timeout;
            let retry_budget = config.adapter_retry_budget;
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await.ok()?;
                fetch_with_retry(adapter.as_ref(), &symbol, market, range, timeout, retry_budget).await
            }));
        }

        let mut candidates = Vec::new();
        for handle in handles {
            if let Ok(Some(mut batch)) = handle.await {
                candidates.append(&mut batch);
            }
        }

        let gated = apply_gate(candidates);
        let deduped = dedupe_by_canonical_url(gated);

        let descriptors: Vec<&str> = vec![event.symbol.as_str()];
        let scored: Vec<_> = deduped
            .into_iter()
            .map(|c| score(c, &descriptors, event.detected_at_utc, config.proximity_horizon, DEFAULT_WEIGHTS))
            .collect();
        let ranked = rank_top_3(scored);

        let reasons: Vec<EventReason> = ranked
            .into_iter()
            .enumerate()
            .map(|(idx, scored)| EventReason {
                id: ids.new_id(),
                event_id: event.id,
                rank: (idx + 1) as u8,
                reason_type: scored.candidate.reason_type,
                confidence_score: scored.breakdown.score_breakdown.total,
                summary: scored.candidate.summary,
                source_url: scored.candidate.canonical_url,
                published_at: scored.candidate.published_at,
                confidence_breakdown: Some(scored.breakdown),
            })
            .collect();

        if let Err(err) = store.events.set_reasons(event.id, reasons.clone()) {
            warn!(event_id = %event.id, error = ?err, "failed to persist reason-engine output");
            return Vec::new();
        }
        let _ = clock.now();
        reasons
    }

    /// Spawn a fixed-size worker pool draining `rx` (spec.md §5: "a
    /// fixed-size pool of Reason Engine workers draining a bounded work
    /// queue of newly detected events").
    pub fn spawn_workers(
        self: Arc<Self>,
        rx: mpsc::Receiver<PriceEvent>,
        worker_count: usize,
        store: Store,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGen>,
        config: Arc<Config>,
    ) {
        let shared_rx = Arc::new(Mutex::new(rx));
        for worker_id in 0..worker_count.max(1) {
            let engine = Arc::clone(&self);
            let rx = Arc::clone(&shared_rx);
            let store = store.clone();
            let clock = Arc::clone(&clock);
            let ids = Arc::clone(&ids);
            let config = Arc::clone(&config);
            tokio::spawn(async move {
                loop {
                    let event = { rx.lock().await.recv().await };
                    let Some(event) = event else { break };
                    let reasons = engine.run_for_event(&store, clock.as_ref(), ids.as_ref(), &config, &event).await;
                    info!(worker = worker_id, event_id = %event.id, reason_count = reasons.len(), "reason engine run complete");
                }
            });
        }
    }
}

/// A bounded dispatch queue with `backpressure` semantics on overflow
/// (spec.md §5: "when full, detector publish returns backpressure").
#[derive(Clone)]
pub struct EventQueue {
    tx: mpsc::Sender<PriceEvent>,
}

impl EventQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<PriceEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    pub fn try_publish(&self, event: PriceEvent) -> Result<(), crate::store::StoreError> {
        self.tx.try_send(event).map_err(|_| crate::store::StoreError::Backpressure)
    }
}

async fn fetch_with_retry(
    adapter: &dyn Adapter,
    symbol: &str,
    market: crate::models::Market,
    range: TimeRange,
    timeout: Duration,
    retry_budget: u32,
) -> Option<Vec<crate::reason_engine::adapter::Candidate>> {
    let mut attempt = 0u32;
    loop {
        let call = tokio::time::timeout(timeout, adapter.fetch(symbol, market, range)).await;
        match call {
            Ok(Ok(candidates)) => return Some(candidates),
            Ok(Err(err)) => {
                warn!(adapter = adapter.name(), attempt, error = %err, "adapter fetch failed");
            }
            Err(_) => {
                warn!(adapter = adapter.name(), attempt, "adapter fetch timed out");
            }
        }
        if attempt >= retry_budget {
            return None;
        }
        let backoff = Duration::from_millis(100 * 2u64.pow(attempt.min(6)));
        tokio::time::sleep(backoff).await;
        attempt += 1;
    }
}

/// Unique key for a pending dispatch, used to preserve the per-(user,
/// symbol, window) serialization spec.md §5 requires even though the queue
/// itself is a flat FIFO.
pub fn dispatch_key(event: &PriceEvent) -> (Uuid, String, u32) {
    (event.user_id, event.symbol.clone(), event.window_minutes)
}

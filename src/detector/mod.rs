//! Percent-change detection with per-user debounce (spec.md §4.2).
//!
//! The rolling tick math (`window`) and the session-calendar math
//! (`session`) are deliberately isolated from user/threshold concerns so
//! each can be unit tested the way the spec's scenarios exercise them in
//! isolation. `Detector` is the composition that ties ticks to watchlists,
//! thresholds, and debounce state, and hands back freshly-minted
//! `PriceEvent`s for the caller (the reason-engine dispatch loop) to act on.

pub mod debounce;
pub mod session;
pub mod window;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::Config;
use crate::ids::IdGen;
use crate::models::{Market, PriceEvent, SessionLabel};
use crate::notifier;
use crate::reason_engine::EventQueue;
use crate::store::Store;

use debounce::{DebounceDecision, DebounceState};
use window::TickWindow;

#[derive(Clone)]
pub struct Detector {
    window: TickWindow,
    debounce: DebounceState,
}

impl Default for Detector {
    fn default() -> Self {
        Self { window: TickWindow::new(), debounce: DebounceState::new() }
    }
}

impl Detector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick into the shared window for `window_minutes`, then
    /// evaluate every user currently watching (market, symbol) against
    /// their own effective threshold and debounce state. Returns the
    /// `PriceEvent`s newly persisted to `store` this call, in no particular
    /// cross-symbol order (spec.md §5: "across symbols there is no
    /// ordering guarantee").
    pub fn ingest_tick(
        &self,
        store: &Store,
        clock: &dyn Clock,
        ids: &dyn IdGen,
        config: &Config,
        market: Market,
        symbol: &str,
        window_minutes: u32,
        at_utc: DateTime<Utc>,
        price: f64,
    ) -> Vec<PriceEvent> {
        let Some(sample) = self.window.observe(market, symbol, window_minutes, at_utc, price) else {
            return Vec::new();
        };

        let watchers = store.watchlist.watchers_for(market, symbol);
        let mut emitted = Vec::new();

        for user_id in watchers {
            let threshold_pct = store
                .thresholds
                .get(user_id, window_minutes)
                .map(|t| t.threshold_pct)
                .unwrap_or(config.default_threshold_pct);

            if sample.change_pct.abs() < threshold_pct {
                continue;
            }

            let now = clock.now();
            let decision = self.debounce.check(
                user_id,
                symbol,
                window_minutes,
                sample.change_pct,
                now,
                config.debounce_duration,
                config.delta_pct_for_realert,
            );

            let delta_realert = match decision {
                DebounceDecision::Suppress => continue,
                DebounceDecision::Emit { delta_realert } => delta_realert,
            };

            let (session_label, tz_name) = session::classify(market, sample.at_utc);

            let event = PriceEvent {
                id: ids.new_id(),
                user_id,
                market,
                symbol: symbol.to_string(),
                change_pct: round2(sample.change_pct),
                window_minutes,
                detected_at_utc: sample.at_utc,
                exchange_timezone: tz_name.to_string(),
                session_label,
                delta_realert,
            };

            let event = store.events.insert_detected(event);
            emitted.push(event);
        }

        emitted
    }

    /// The full tick-to-notification pipeline: detect, then for each freshly
    /// emitted event notify the owner in-app and publish it onto `queue` for
    /// the Reason Engine worker pool to pick up (spec.md §2's data flow:
    /// "tick -> Detector -> PriceEvent -> Reason Engine -> EventReason(s) ->
    /// Notifier -> Notification"). A full reason market-data feed is out of
    /// scope; this is the entry point such a feed would call per tick.
    /// Publish failures (queue at capacity) are logged and do not block
    /// notification or later ticks (spec.md §5: detector publish failures
    /// degrade to backpressure, never panic).
    #[allow(clippy::too_many_arguments)]
    pub fn ingest_tick_and_dispatch(
        &self,
        store: &Store,
        clock: &dyn Clock,
        ids: &dyn IdGen,
        config: &Config,
        queue: &EventQueue,
        market: Market,
        symbol: &str,
        window_minutes: u32,
        at_utc: DateTime<Utc>,
        price: f64,
    ) -> Vec<PriceEvent> {
        let emitted = self.ingest_tick(store, clock, ids, config, market, symbol, window_minutes, at_utc, price);
        for event in &emitted {
            // Closed-session events still record and still feed the reason
            // engine, but spec.md §4.2 is explicit that they are never
            // alerted.
            if event.session_label != SessionLabel::Closed {
                notifier::notify(store, clock, ids, config, event);
            }
            if let Err(err) = queue.try_publish(event.clone()) {
                warn!(event_id = %event.id, error = ?err, "failed to publish event to reason engine queue");
            }
        }
        emitted
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::ids::SequentialGen;
    use crate::models::{Threshold, WatchlistItem};
    use chrono::TimeZone;

    fn setup() -> (Store, FixedClock, SequentialGen, Config) {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap());
        (Store::new(), clock, SequentialGen::default(), Config::for_tests())
    }

    #[test]
    fn debounced_then_delta_realert_matches_spec_scenario() {
        let (store, clock, ids, config) = setup();
        let detector = Detector::new();
        let user_id = Uuid::new_v4();
        store
            .watchlist
            .add(WatchlistItem {
                id: Uuid::new_v4(),
                user_id,
                market: Market::Us,
                ticker: "AAPL".into(),
                created_at_utc: clock.now(),
            })
            .unwrap();
        store
            .thresholds
            .upsert(Threshold { user_id, window_minutes: 5, threshold_pct: 3.0 })
            .unwrap();

        let t0 = clock.now();
        let t1 = t0 + chrono::Duration::minutes(4);
        detector.ingest_tick(&store, &clock, &ids, &config, Market::Us, "AAPL", 5, t0, 100.0);
        let first = detector.ingest_tick(&store, &clock, &ids, &config, Market::Us, "AAPL", 5, t1, 104.2);
        assert_eq!(first.len(), 1);
        assert!((first[0].change_pct - 4.2).abs() < 1e-9);
        assert!(!first[0].delta_realert);

        let t2 = t1 + chrono::Duration::minutes(1);
        let suppressed = detector.ingest_tick(&store, &clock, &ids, &config, Market::Us, "AAPL", 5, t2, 104.5);
        assert!(suppressed.is_empty());

        let t3 = t2 + chrono::Duration::minutes(1);
        let realert = detector.ingest_tick(&store, &clock, &ids, &config, Market::Us, "AAPL", 5, t3, 110.0);
        assert_eq!(realert.len(), 1);
        assert!(realert[0].delta_realert);
    }

    #[test]
    fn dispatch_notifies_owner_and_publishes_to_queue() {
        let (store, clock, ids, config) = setup();
        let detector = Detector::new();
        let user_id = Uuid::new_v4();
        store
            .watchlist
            .add(WatchlistItem {
                id: Uuid::new_v4(),
                user_id,
                market: Market::Us,
                ticker: "AAPL".into(),
                created_at_utc: clock.now(),
            })
            .unwrap();
        store
            .thresholds
            .upsert(Threshold { user_id, window_minutes: 5, threshold_pct: 3.0 })
            .unwrap();

        let (queue, mut rx) = crate::reason_engine::EventQueue::new(4);
        let t0 = clock.now();
        let t1 = t0 + chrono::Duration::minutes(1);
        detector.ingest_tick_and_dispatch(&store, &clock, &ids, &config, &queue, Market::Us, "AAPL", 5, t0, 100.0);
        let emitted = detector
            .ingest_tick_and_dispatch(&store, &clock, &ids, &config, &queue, Market::Us, "AAPL", 5, t1, 104.2);
        assert_eq!(emitted.len(), 1);

        let queued = rx.try_recv().expect("event published to reason engine queue");
        assert_eq!(queued.id, emitted[0].id);

        let notifications = store.notifications.list_for_user(user_id);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].event_id, emitted[0].id);
    }

    #[test]
    fn closed_session_events_are_still_queued_but_never_notified() {
        // 2024-03-02 is a Saturday; every US session classifies as closed.
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 2, 15, 0, 0).unwrap());
        let store = Store::new();
        let ids = SequentialGen::default();
        let config = Config::for_tests();
        let detector = Detector::new();
        let user_id = Uuid::new_v4();
        store
            .watchlist
            .add(WatchlistItem {
                id: Uuid::new_v4(),
                user_id,
                market: Market::Us,
                ticker: "AAPL".into(),
                created_at_utc: clock.now(),
            })
            .unwrap();
        store
            .thresholds
            .upsert(Threshold { user_id, window_minutes: 5, threshold_pct: 3.0 })
            .unwrap();

        let (queue, mut rx) = crate::reason_engine::EventQueue::new(4);
        let t0 = clock.now();
        let t1 = t0 + chrono::Duration::minutes(4);
        detector.ingest_tick_and_dispatch(&store, &clock, &ids, &config, &queue, Market::Us, "AAPL", 5, t0, 100.0);
        let emitted = detector
            .ingest_tick_and_dispatch(&store, &clock, &ids, &config, &queue, Market::Us, "AAPL", 5, t1, 104.2);

        assert_eq!(emitted.len(), 1);
        assert!(matches!(emitted[0].session_label, SessionLabel::Closed));
        assert!(rx.try_recv().is_ok(), "closed-session events are still handed to the reason engine");
        assert!(
            store.notifications.list_for_user(user_id).is_empty(),
            "closed-session events must never produce a notification"
        );
    }
}

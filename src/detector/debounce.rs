//! Per-(user, symbol, window) debounce, shaped directly on the teacher's
//! `RateLimitLayer`: a `parking_lot::Mutex<HashMap<key, entry>>` guarding a
//! sliding window, with one twist the rate limiter doesn't need — a delta
//! re-alert escape hatch (spec.md §4.2 scenario 2: a move that keeps
//! compounding past the debounce window should still surface promptly).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

type Key = (Uuid, String, u32);

struct Entry {
    last_emitted_at: DateTime<Utc>,
    last_change_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebounceDecision {
    /// Emit a PriceEvent; `delta_realert` is set if this bypassed the
    /// window purely because the move grew past the re-alert delta.
    Emit { delta_realert: bool },
    Suppress,
}

#[derive(Clone)]
pub struct DebounceState {
    entries: Arc<Mutex<HashMap<Key, Entry>>>,
}

impl Default for DebounceState {
    fn default() -> Self {
        Self { entries: Arc::new(Mutex::new(HashMap::new())) }
    }
}

impl DebounceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a freshly-detected move for (user, symbol, window)
    /// should become a PriceEvent, given the configured debounce window and
    /// re-alert delta.
    pub fn check(
        &self,
        user_id: Uuid,
        symbol: &str,
        window_minutes: u32,
        change_pct: f64,
        now: DateTime<Utc>,
        debounce_duration: Duration,
        delta_pct_for_realert: f64,
    ) -> DebounceDecision {
        let key = (user_id, symbol.to_string(), window_minutes);
        let mut entries = self.entries.lock();

        let decision = match entries.get(&key) {
            None => DebounceDecision::Emit { delta_realert: false },
            Some(entry) => {
                let elapsed = now.signed_duration_since(entry.last_emitted_at);
                let within_window = elapsed
                    .to_std()
                    .map(|d| d < debounce_duration)
                    .unwrap_or(false);
                if !within_window {
                    DebounceDecision::Emit { delta_realert: false }
                } else {
                    let delta = (change_pct - entry.last_change_pct).abs();
                    if delta >= delta_pct_for_realert {
                        DebounceDecision::Emit { delta_realert: true }
                    } else {
                        DebounceDecision::Suppress
                    }
                }
            }
        };

        if let DebounceDecision::Emit { .. } = decision {
            entries.insert(key, Entry { last_emitted_at: now, last_change_pct: change_pct });
        }

        decision
    }
}

//! Rolling tick window and percent-change math (spec.md §4.2), kept free of
//! any notion of user or threshold so it can be tested in isolation
//! (scenario 1 in spec.md §8 exercises exactly this layer).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::models::Market;

#[derive(Debug, Clone, Copy)]
struct Tick {
    at_utc: DateTime<Utc>,
    price: f64,
}

type WindowKey = (Market, String, u32);

#[derive(Default)]
struct Inner {
    ticks: HashMap<WindowKey, Vec<Tick>>,
}

/// Outcome of folding one tick into a symbol's rolling window.
#[derive(Debug, Clone, Copy)]
pub struct ChangeSample {
    pub change_pct: f64,
    pub at_utc: DateTime<Utc>,
}

/// Per-(market, symbol, window) rolling tick buffer, shared across users
/// since the ticks themselves are plain market data.
#[derive(Clone)]
pub struct TickWindow {
    inner: Arc<Mutex<Inner>>,
}

impl Default for TickWindow {
    fn default() -> Self {
        Self { inner: Arc::new(Mutex::new(Inner::default())) }
    }
}

impl TickWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick and, if the window now holds at least two ticks and
    /// the earliest ("reference") price is usable, return the resulting
    /// change sample. Returns `None` on any of the documented edge cases:
    /// fewer than two ticks, non-positive reference, or non-finite price.
    pub fn observe(
        &self,
        market: Market,
        symbol: &str,
        window_minutes: u32,
        at_utc: DateTime<Utc>,
        price: f64,
    ) -> Option<ChangeSample> {
        if !price.is_finite() {
            return None;
        }
        let key = (market, symbol.to_string(), window_minutes);
        let mut inner = self.inner.lock();
        let ticks = inner.ticks.entry(key).or_default();
        ticks.push(Tick { at_utc, price });

        let cutoff = at_utc - Duration::minutes(window_minutes as i64);
        ticks.retain(|t| t.at_utc >= cutoff);
        ticks.sort_by_key(|t| t.at_utc);

        if ticks.len() < 2 {
            return None;
        }
        let reference = ticks.first().copied()?;
        let last = ticks.last().copied()?;
        if !(reference.price > 0.0) || !reference.price.is_finite() {
            return None;
        }

        let change_pct = (last.price - reference.price) / reference.price * 100.0;
        if !change_pct.is_finite() {
            return None;
        }
        Some(ChangeSample { change_pct, at_utc: last.at_utc })
    }
}

//! Read-only (market, ticker) -> {name, active} mapping (spec.md §2 item 2).
//!
//! Loaded as a `lazy_static` seed table, the same shape as
//! `reason_engine::scoring::REPUTATION_TABLE`: hardcoded data until an
//! external catalog feed is wired in (spec.md §9 open question b treats this
//! as data, not code). The catalog never mutates after process start.

use lazy_static::lazy_static;
use serde::Serialize;

use crate::models::Market;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub market: Market,
    pub ticker: String,
    pub name: String,
    pub active: bool,
}

fn entry(market: Market, ticker: &str, name: &str, active: bool) -> CatalogEntry {
    CatalogEntry { market, ticker: ticker.to_string(), name: name.to_string(), active }
}

lazy_static! {
    static ref SEED: Vec<CatalogEntry> = vec![
        entry(Market::Us, "AAPL", "Apple Inc.", true),
        entry(Market::Us, "MSFT", "Microsoft Corporation", true),
        entry(Market::Us, "GOOGL", "Alphabet Inc.", true),
        entry(Market::Us, "AMZN", "Amazon.com, Inc.", true),
        entry(Market::Us, "TSLA", "Tesla, Inc.", true),
        entry(Market::Us, "NVDA", "NVIDIA Corporation", true),
        entry(Market::Us, "META", "Meta Platforms, Inc.", true),
        entry(Market::Kr, "005930", "Samsung Electronics Co., Ltd.", true),
        entry(Market::Kr, "000660", "SK hynix Inc.", true),
        entry(Market::Kr, "035420", "NAVER Corporation", true),
        entry(Market::Kr, "051910", "LG Chem, Ltd.", true),
        entry(Market::Kr, "207940", "Samsung Biologics Co., Ltd.", true),
        entry(Market::Kr, "035720", "Kakao Corp.", false),
    ];
}

pub const CATALOG_VERSION: &str = "seed-2024.1";

/// Stateless handle onto the seed table. Cheap to clone: the table itself is
/// a process-wide `lazy_static`, not owned per instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    pub fn new() -> Self {
        Self
    }

    pub fn lookup(&self, market: Market, ticker: &str) -> Option<CatalogEntry> {
        let ticker = ticker.trim().to_uppercase();
        SEED.iter().find(|e| e.market == market && e.ticker == ticker).cloned()
    }

    /// Whether (market, ticker) is a known, currently-active symbol, used to
    /// validate watchlist additions (spec.md §3).
    pub fn is_active(&self, market: Market, ticker: &str) -> bool {
        self.lookup(market, ticker).map(|e| e.active).unwrap_or(false)
    }

    /// Prefix/substring search over ticker and name, optionally scoped to one
    /// market (spec.md §6: `q` length must be in [2,20], enforced by the
    /// caller before reaching here).
    pub fn search(&self, q: &str, market: Option<Market>) -> Vec<CatalogEntry> {
        let needle = q.trim().to_uppercase();
        SEED.iter()
            .filter(|e| market.map(|m| m == e.market).unwrap_or(true))
            .filter(|e| e.ticker.contains(&needle) || e.name.to_uppercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn version(&self) -> &'static str {
        CATALOG_VERSION
    }
}

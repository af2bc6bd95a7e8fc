//! Adapter polymorphism (spec.md §9): the Reason Engine only needs one
//! capability from an external source — `fetch`. Treating every adapter as
//! an implementer of this single-method trait is what lets tests inject
//! deterministic fixtures instead of hitting real filings/news upstreams.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Market, ReasonType};

#[derive(Debug, Clone, Copy)]
pub struct TimeRange {
    pub from_utc: DateTime<Utc>,
    pub to_utc: DateTime<Utc>,
}

/// A raw, ungated candidate reason as handed back by an adapter. Any field
/// may be missing or malformed; the quality gate (spec.md §4.3 step 2)
/// decides what survives.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub source_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub summary: String,
    pub reason_type: ReasonType,
}

#[async_trait]
pub trait Adapter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, symbol: &str, market: Market, range: TimeRange) -> anyhow::Result<Vec<Candidate>>;
}

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Deterministic adapter for tests: returns a fixed candidate list,
    /// optionally simulating failure.
    pub struct FixtureAdapter {
        pub adapter_name: &'static str,
        pub candidates: Vec<Candidate>,
        pub fails: bool,
    }

    #[async_trait]
    impl Adapter for FixtureAdapter {
        fn name(&self) -> &'static str {
            self.adapter_name
        }

        async fn fetch(&self, _symbol: &str, _market: Market, _range: TimeRange) -> anyhow::Result<Vec<Candidate>> {
            if self.fails {
                anyhow::bail!("fixture adapter configured to fail");
            }
            Ok(self.candidates.clone())
        }
    }
}

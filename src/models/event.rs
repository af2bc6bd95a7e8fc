use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Market;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionLabel {
    Regular,
    Pre,
    Post,
    Closed,
}

/// A detected significant price move (spec.md §3). Immutable after creation.
///
/// `user_id` is not in the spec's public field list for PriceEvent, but the
/// Detector's debounce state is explicitly keyed by (user, symbol, window)
/// (spec.md §4.2), so detection is inherently scoped to the watchlist/
/// threshold of one user. We carry the owner as an internal field — see
/// DESIGN.md Open Question (a) — rather than invent a cross-user dedup rule
/// the spec never describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub market: Market,
    pub symbol: String,
    pub change_pct: f64,
    pub window_minutes: u32,
    pub detected_at_utc: DateTime<Utc>,
    pub exchange_timezone: String,
    pub session_label: SessionLabel,
    /// Set when this event was emitted as a delta re-alert bypassing the
    /// debounce window (spec.md §4.2 scenario 2).
    pub delta_realert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonType {
    Filing,
    News,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub source_reliability: f64,
    pub event_match: f64,
    pub time_proximity: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub weights: [f64; 3],
    pub signals: [f64; 3],
    pub score_breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventReason {
    pub id: Uuid,
    pub event_id: Uuid,
    pub rank: u8,
    pub reason_type: ReasonType,
    pub confidence_score: f64,
    pub summary: String,
    pub source_url: String,
    pub published_at: DateTime<Utc>,
    pub confidence_breakdown: Option<ConfidenceBreakdown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonStatus {
    CollectingEvidence,
    Verified,
}

/// Derived status (spec.md §3): `collecting_evidence` if the event has zero
/// reasons or all reasons lack a `source_url`, else `verified`.
pub fn derive_reason_status(reasons: &[EventReason]) -> ReasonStatus {
    if reasons.is_empty() || reasons.iter().all(|r| r.source_url.trim().is_empty()) {
        ReasonStatus::CollectingEvidence
    } else {
        ReasonStatus::Verified
    }
}

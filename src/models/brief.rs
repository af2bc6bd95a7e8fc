use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Market, SessionLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefType {
    PreMarket,
    PostClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    InsufficientData,
    NoEvents,
    MarketHoliday,
    PartialAggregation,
}

/// One watchlist symbol's contribution to a brief (spec.md §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefContentItem {
    pub market: Market,
    pub symbol: String,
    pub event_ids: Vec<Uuid>,
    pub session_label: SessionLabel,
    /// Top-ranked reason's summary for this symbol's event, blank when the
    /// event has no reasons yet.
    pub summary: String,
    pub source_url: String,
    pub event_detail_url: String,
}

/// Per-user periodic digest of the user's watchlist events (spec.md §4.7,
/// §9 — built by a ticker loop, same idiom as the teacher's polling tasks
/// in main.rs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brief {
    pub id: Uuid,
    pub user_id: Uuid,
    pub brief_type: BriefType,
    pub market: Market,
    pub generated_at_utc: DateTime<Utc>,
    pub expires_at_utc: DateTime<Utc>,
    pub items: Vec<BriefContentItem>,
    pub fallback_reason: Option<FallbackReason>,
    pub read_at_utc: Option<DateTime<Utc>>,
    pub is_expired: bool,
}

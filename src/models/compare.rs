use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ReasonType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareStatus {
    Ready,
    CompareUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareFallbackReason {
    InsufficientEvidence,
    AxisImbalance,
    AmbiguousClassification,
    MissingSourceMetadata,
    PermissionDenied,
}

/// One reason classified onto an axis of the Evidence Compare card
/// (spec.md §4.9). Malformed reasons are kept on the `uncertain` axis with
/// `summary`/`source_url`/`published_at`/`reason_type` left blank so the
/// client can still render a fallback label for the item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisItem {
    pub axis: String,
    pub summary: String,
    pub source_url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub reason_type: Option<ReasonType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceCompare {
    pub id: Uuid,
    pub user_id: Uuid,
    pub left_event_id: Uuid,
    pub right_event_id: Uuid,
    pub status: CompareStatus,
    pub fallback_reason: Option<CompareFallbackReason>,
    pub axes: Vec<AxisItem>,
    /// Flagged when both events' top reason share a single source domain
    /// (spec.md §4.8 edge case — one-sided evidence base).
    pub bias_warning: bool,
    pub created_at_utc: DateTime<Utc>,
}

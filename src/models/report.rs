use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    InaccurateReason,
    WrongSource,
    OutdatedInformation,
    Other,
}

/// Forward-only lifecycle (spec.md §4.6, §9): Received -> Reviewed ->
/// Resolved, skipping Reviewed is allowed, no transition ever moves backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Received,
    Reviewed,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reason_id: Uuid,
    pub report_type: ReportType,
    pub note: Option<String>,
    pub status: ReportStatus,
    pub created_at_utc: DateTime<Utc>,
}

/// Append-only transition log entry, mirroring the teacher's
/// `FailoverState` history idiom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonStatusTransition {
    pub id: Uuid,
    pub report_id: Uuid,
    pub from_status: Option<ReportStatus>,
    pub to_status: ReportStatus,
    pub transitioned_at_utc: DateTime<Utc>,
}

/// A re-run of the Reason Engine triggered by resolving a report (spec.md
/// §4.6 scenario: "resolving a report may trigger a rerun of scoring").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonRevision {
    pub id: Uuid,
    pub event_id: Uuid,
    pub reason_id: Uuid,
    pub triggered_by_report_id: Uuid,
    pub confidence_before: f64,
    pub confidence_after: f64,
    pub revision_reason: String,
    pub revised_at_utc: DateTime<Utc>,
}

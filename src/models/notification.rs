use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    InApp,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Read,
    /// Suppressed by the cooldown window; kept for `unread_count` and audit
    /// purposes but never delivered (spec.md §4.5, §9 — Notifier grounded on
    /// the rate-limit idiom).
    Cooldown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub channel: Channel,
    pub status: NotificationStatus,
    pub created_at_utc: DateTime<Utc>,
    pub read_at_utc: Option<DateTime<Utc>>,
}

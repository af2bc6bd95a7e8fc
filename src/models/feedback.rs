use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Helpful,
    NotHelpful,
}

/// One user's vote on one reason. Spec.md §3: "at most one feedback row per
/// (user, reason) — resubmission overwrites."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reason_id: Uuid,
    pub vote: Vote,
    pub created_at_utc: DateTime<Utc>,
}

impl Feedback {
    pub fn key(user_id: Uuid, reason_id: Uuid) -> (Uuid, Uuid) {
        (user_id, reason_id)
    }
}

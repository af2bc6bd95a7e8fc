use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per (user, window_minutes) alert threshold. Upsert semantics: one row per
/// window (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Threshold {
    pub user_id: Uuid,
    pub window_minutes: u32,
    pub threshold_pct: f64,
}

impl Threshold {
    pub fn key(user_id: Uuid, window_minutes: u32) -> (Uuid, u32) {
        (user_id, window_minutes)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Market;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub market: Market,
    pub ticker: String,
    pub created_at_utc: DateTime<Utc>,
}

impl WatchlistItem {
    /// Uniqueness key: (user, market, ticker) per spec.md §3.
    pub fn key(user_id: Uuid, market: Market, ticker: &str) -> (Uuid, Market, String) {
        (user_id, market, ticker.to_uppercase())
    }
}

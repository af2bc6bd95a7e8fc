use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{Market, WatchlistItem};
use crate::store::StoreError;

#[derive(Default)]
struct Inner {
    by_id: HashMap<Uuid, WatchlistItem>,
    by_key: HashMap<(Uuid, Market, String), Uuid>,
}

#[derive(Clone, Default)]
pub struct WatchlistTable {
    inner: Arc<RwLock<Inner>>,
}

impl WatchlistTable {
    pub fn add(&self, item: WatchlistItem) -> Result<WatchlistItem, StoreError> {
        let key = WatchlistItem::key(item.user_id, item.market, &item.ticker);
        let mut inner = self.inner.write();
        if inner.by_key.contains_key(&key) {
            return Err(StoreError::Conflict(
                "this ticker is already on the watchlist".into(),
            ));
        }
        inner.by_key.insert(key, item.id);
        inner.by_id.insert(item.id, item.clone());
        Ok(item)
    }

    pub fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let item = inner
            .by_id
            .get(&item_id)
            .cloned()
            .ok_or(StoreError::NotFound("watchlist item"))?;
        if item.user_id != user_id {
            return Err(StoreError::NotFound("watchlist item"));
        }
        let key = WatchlistItem::key(item.user_id, item.market, &item.ticker);
        inner.by_key.remove(&key);
        inner.by_id.remove(&item_id);
        Ok(())
    }

    pub fn list_for_user(&self, user_id: Uuid) -> Vec<WatchlistItem> {
        let mut items: Vec<_> = self
            .inner
            .read()
            .by_id
            .values()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.created_at_utc);
        items
    }

    /// Every user currently watching (market, symbol), used by the Detector
    /// to fan a single tick out to each watcher's own threshold/debounce.
    pub fn watchers_for(&self, market: Market, symbol: &str) -> Vec<Uuid> {
        let ticker = symbol.to_uppercase();
        self.inner
            .read()
            .by_id
            .values()
            .filter(|i| i.market == market && i.ticker == ticker)
            .map(|i| i.user_id)
            .collect()
    }

    /// Distinct users with at least one watchlist item, used by the Brief
    /// Builder's ticker to know whose digests to generate.
    pub fn all_user_ids(&self) -> std::collections::HashSet<Uuid> {
        self.inner.read().by_id.values().map(|i| i.user_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(user_id: Uuid, ticker: &str) -> WatchlistItem {
        WatchlistItem {
            id: Uuid::new_v4(),
            user_id,
            market: Market::Us,
            ticker: ticker.to_string(),
            created_at_utc: Utc::now(),
        }
    }

    #[test]
    fn duplicate_ticker_for_same_user_is_rejected() {
        let table = WatchlistTable::default();
        let user_id = Uuid::new_v4();
        table.add(item(user_id, "AAPL")).unwrap();
        let err = table.add(item(user_id, "aapl")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn remove_is_scoped_to_owner() {
        let table = WatchlistTable::default();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let added = table.add(item(owner, "AAPL")).unwrap();
        let err = table.remove(other, added.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{Brief, BriefType, Market};
use crate::store::StoreError;

#[derive(Default)]
struct Inner {
    by_id: HashMap<Uuid, Brief>,
}

#[derive(Clone, Default)]
pub struct BriefTable {
    inner: Arc<RwLock<Inner>>,
}

impl BriefTable {
    pub fn insert(&self, brief: Brief) -> Brief {
        self.inner.write().by_id.insert(brief.id, brief.clone());
        brief
    }

    pub fn get(&self, brief_id: Uuid) -> Result<Brief, StoreError> {
        self.inner
            .read()
            .by_id
            .get(&brief_id)
            .cloned()
            .ok_or(StoreError::NotFound("brief"))
    }

    pub fn list_for_user(&self, user_id: Uuid) -> Vec<Brief> {
        let mut rows: Vec<_> = self
            .inner
            .read()
            .by_id
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| std::cmp::Reverse(b.generated_at_utc));
        rows
    }

    pub fn latest_for(&self, user_id: Uuid, market: Market, brief_type: BriefType) -> Option<Brief> {
        self.inner
            .read()
            .by_id
            .values()
            .filter(|b| b.user_id == user_id && b.market == market && b.brief_type == brief_type)
            .max_by_key(|b| b.generated_at_utc)
            .cloned()
    }

    pub fn mark_read(&self, user_id: Uuid, brief_id: Uuid, now: DateTime<Utc>) -> Result<Brief, StoreError> {
        let mut inner = self.inner.write();
        let brief = inner
            .by_id
            .get_mut(&brief_id)
            .filter(|b| b.user_id == user_id)
            .ok_or(StoreError::NotFound("brief"))?;
        brief.read_at_utc = Some(now);
        Ok(brief.clone())
    }
}

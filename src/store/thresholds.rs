use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::Threshold;
use crate::store::StoreError;

#[derive(Clone, Default)]
pub struct ThresholdTable {
    inner: Arc<RwLock<HashMap<(Uuid, u32), Threshold>>>,
}

impl ThresholdTable {
    /// Upsert: one row per (user, window_minutes) (spec.md §3).
    pub fn upsert(&self, threshold: Threshold) -> Result<Threshold, StoreError> {
        if !(threshold.threshold_pct.is_finite()) || threshold.threshold_pct <= 0.0 {
            return Err(StoreError::InvalidInput(
                "threshold_pct must be a positive finite number".into(),
            ));
        }
        let key = Threshold::key(threshold.user_id, threshold.window_minutes);
        self.inner.write().insert(key, threshold.clone());
        Ok(threshold)
    }

    pub fn list_for_user(&self, user_id: Uuid) -> Vec<Threshold> {
        let mut rows: Vec<_> = self
            .inner
            .read()
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.window_minutes);
        rows
    }

    pub fn get(&self, user_id: Uuid, window_minutes: u32) -> Option<Threshold> {
        self.inner
            .read()
            .get(&Threshold::key(user_id, window_minutes))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_existing_window() {
        let table = ThresholdTable::default();
        let user_id = Uuid::new_v4();
        table
            .upsert(Threshold { user_id, window_minutes: 5, threshold_pct: 3.0 })
            .unwrap();
        table
            .upsert(Threshold { user_id, window_minutes: 5, threshold_pct: 4.5 })
            .unwrap();
        let rows = table.list_for_user(user_id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].threshold_pct, 4.5);
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let table = ThresholdTable::default();
        let err = table
            .upsert(Threshold { user_id: Uuid::new_v4(), window_minutes: 5, threshold_pct: 0.0 })
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }
}

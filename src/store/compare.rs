use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::EvidenceCompare;
use crate::store::StoreError;

#[derive(Clone, Default)]
pub struct CompareTable {
    inner: Arc<RwLock<HashMap<Uuid, EvidenceCompare>>>,
}

impl CompareTable {
    pub fn insert(&self, compare: EvidenceCompare) -> EvidenceCompare {
        self.inner.write().insert(compare.id, compare.clone());
        compare
    }

    pub fn get(&self, id: Uuid) -> Result<EvidenceCompare, StoreError> {
        self.inner.read().get(&id).cloned().ok_or(StoreError::NotFound("evidence compare"))
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{EventReason, PriceEvent};
use crate::store::StoreError;

#[derive(Default)]
struct Inner {
    events: HashMap<Uuid, PriceEvent>,
    reasons_by_event: HashMap<Uuid, Vec<EventReason>>,
}

/// Owns PriceEvents and their EventReasons together so a reason-engine run
/// persists both atomically under one write lock (spec.md §4.3: "ranking
/// and persistence happen as one unit; a partial write is never visible").
#[derive(Clone, Default)]
pub struct EventTable {
    inner: Arc<RwLock<Inner>>,
}

impl EventTable {
    pub fn insert_detected(&self, event: PriceEvent) -> PriceEvent {
        let mut inner = self.inner.write();
        inner.reasons_by_event.insert(event.id, Vec::new());
        inner.events.insert(event.id, event.clone());
        event
    }

    /// Replace the ranked reasons for an event in one write (pipeline
    /// output: at most 3 reasons, rank 1..=3).
    pub fn set_reasons(&self, event_id: Uuid, reasons: Vec<EventReason>) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if !inner.events.contains_key(&event_id) {
            return Err(StoreError::NotFound("event"));
        }
        inner.reasons_by_event.insert(event_id, reasons);
        Ok(())
    }

    /// Patch a single reason's confidence in place, leaving its rank and the
    /// rest of the ranked list untouched (used by report resolution rescoring,
    /// spec.md §4.6 — unlike `set_reasons`, this never replaces the list).
    pub fn update_reason_confidence(
        &self,
        event_id: Uuid,
        reason_id: Uuid,
        new_confidence: f64,
    ) -> Result<EventReason, StoreError> {
        let mut inner = self.inner.write();
        let reasons = inner.reasons_by_event.get_mut(&event_id).ok_or(StoreError::NotFound("event"))?;
        let reason = reasons.iter_mut().find(|r| r.id == reason_id).ok_or(StoreError::NotFound("reason"))?;
        reason.confidence_score = new_confidence;
        Ok(reason.clone())
    }

    pub fn get(&self, event_id: Uuid) -> Result<PriceEvent, StoreError> {
        self.inner
            .read()
            .events
            .get(&event_id)
            .cloned()
            .ok_or(StoreError::NotFound("event"))
    }

    pub fn get_reasons(&self, event_id: Uuid) -> Vec<EventReason> {
        self.inner
            .read()
            .reasons_by_event
            .get(&event_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn list_for_user(&self, user_id: Uuid) -> Vec<PriceEvent> {
        let mut events: Vec<_> = self
            .inner
            .read()
            .events
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| std::cmp::Reverse(e.detected_at_utc));
        events
    }

    /// Most recent event for (user, symbol, window), used by the Detector's
    /// debounce check (spec.md §4.2).
    pub fn latest_for_symbol_window(
        &self,
        user_id: Uuid,
        symbol: &str,
        window_minutes: u32,
    ) -> Option<PriceEvent> {
        self.inner
            .read()
            .events
            .values()
            .filter(|e| e.user_id == user_id && e.symbol == symbol && e.window_minutes == window_minutes)
            .max_by_key(|e| e.detected_at_utc)
            .cloned()
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{Notification, NotificationStatus};
use crate::store::StoreError;

#[derive(Default)]
struct Inner {
    by_id: HashMap<Uuid, Notification>,
    /// Last successfully sent (non-cooldown) notification per (user, event
    /// symbol key), used by the Notifier's cooldown check (spec.md §4.5).
    last_sent_at: HashMap<(Uuid, Uuid), DateTime<Utc>>,
}

#[derive(Clone, Default)]
pub struct NotificationTable {
    inner: Arc<RwLock<Inner>>,
}

impl NotificationTable {
    pub fn insert(&self, notification: Notification) -> Notification {
        let mut inner = self.inner.write();
        if notification.status != NotificationStatus::Cooldown {
            inner
                .last_sent_at
                .insert((notification.user_id, notification.event_id), notification.created_at_utc);
        }
        inner.by_id.insert(notification.id, notification.clone());
        notification
    }

    pub fn last_sent_for(&self, user_id: Uuid, event_id: Uuid) -> Option<DateTime<Utc>> {
        self.inner.read().last_sent_at.get(&(user_id, event_id)).copied()
    }

    pub fn list_for_user(&self, user_id: Uuid) -> Vec<Notification> {
        let mut rows: Vec<_> = self
            .inner
            .read()
            .by_id
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|n| std::cmp::Reverse(n.created_at_utc));
        rows
    }

    pub fn unread_count(&self, user_id: Uuid) -> usize {
        self.inner
            .read()
            .by_id
            .values()
            .filter(|n| n.user_id == user_id && n.status == NotificationStatus::Sent)
            .count()
    }

    pub fn mark_read(&self, user_id: Uuid, notification_id: Uuid, now: DateTime<Utc>) -> Result<Notification, StoreError> {
        let mut inner = self.inner.write();
        let notification = inner
            .by_id
            .get_mut(&notification_id)
            .filter(|n| n.user_id == user_id)
            .ok_or(StoreError::NotFound("notification"))?;
        notification.status = NotificationStatus::Read;
        notification.read_at_utc = Some(now);
        Ok(notification.clone())
    }

    /// System TTL promotion of a stale unread notification (spec.md §4.5:
    /// "sent -> cooldown"). Deliberately distinct from `mark_read`: this is
    /// not a user action, so `read_at_utc` stays unset.
    pub fn promote_to_cooldown(&self, user_id: Uuid, notification_id: Uuid) -> Result<Notification, StoreError> {
        let mut inner = self.inner.write();
        let notification = inner
            .by_id
            .get_mut(&notification_id)
            .filter(|n| n.user_id == user_id)
            .ok_or(StoreError::NotFound("notification"))?;
        notification.status = NotificationStatus::Cooldown;
        Ok(notification.clone())
    }
}

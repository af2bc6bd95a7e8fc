//! Converts detected events into Notification rows subject to per-channel
//! cooldown and delta re-alert (spec.md §4.5). The cooldown check is the
//! same sliding-window-per-key idiom as `http::middleware::rate_limit`,
//! just keyed by (user, event) instead of IP and gated on a boolean rather
//! than a request count.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::Config;
use crate::ids::IdGen;
use crate::models::{Channel, Notification, NotificationStatus, PriceEvent};
use crate::store::Store;

/// Evaluate whether `event` should produce a Notification for its owner,
/// honoring cooldown unless the move's delta re-alert flag is set
/// (spec.md §4.5). Returns the inserted row, which may carry
/// `status = cooldown` if suppressed — kept for audit/unread accounting.
pub fn notify(store: &Store, clock: &dyn Clock, ids: &dyn IdGen, config: &Config, event: &PriceEvent) -> Notification {
    let now = clock.now();
    let cooldown = config.cooldown_in_app;

    let suppressed = if event.delta_realert {
        false
    } else {
        match store.notifications.last_sent_for(event.user_id, event.id) {
            None => false,
            Some(last) => within_cooldown(last, now, cooldown),
        }
    };

    let status = if suppressed { NotificationStatus::Cooldown } else { NotificationStatus::Sent };

    let notification = Notification {
        id: ids.new_id(),
        user_id: event.user_id,
        event_id: event.id,
        channel: Channel::InApp,
        status,
        created_at_utc: now,
        read_at_utc: None,
    };
    store.notifications.insert(notification)
}

fn within_cooldown(last: DateTime<Utc>, now: DateTime<Utc>, cooldown: std::time::Duration) -> bool {
    now.signed_duration_since(last).to_std().map(|elapsed| elapsed < cooldown).unwrap_or(false)
}

/// Mark stale unread in-app notifications as `cooldown` (spec.md §4.5:
/// "sent -> cooldown, system promotion after TTL for unread in-app
/// messages"), the periodic ticker described in spec.md §5.
pub fn promote_stale_unreads(store: &Store, clock: &dyn Clock, config: &Config, user_id: Uuid) {
    let now = clock.now();
    for notification in store.notifications.list_for_user(user_id) {
        if notification.status != NotificationStatus::Sent {
            continue;
        }
        if !within_cooldown(notification.created_at_utc, now, config.cooldown_in_app) {
            let _ = store.notifications.promote_to_cooldown(user_id, notification.id);
        }
    }
}

//! Axis classification for the Evidence Compare card (spec.md §4.9).
//!
//! Grounded on two teacher idioms: `vault::belief_vol`'s shape of a
//! configurable classifier with named thresholds and a `Default` impl (here,
//! `config.compare_polarity_threshold` plays the role of `prior_sigma_b`),
//! and `signals::quality::SignalQualityGate`'s "keep only if corroborated,
//! else drop with a named reason" fallback idiom — `min_compare_items` and
//! the positive/negative occupancy check mirror that gate's `sources.len()
//! >= 2` corroboration check.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use uuid::Uuid;

use crate::error::ApiError;
use crate::ids::IdGen;
use crate::models::{AxisItem, CompareFallbackReason, CompareStatus, EventReason, EvidenceCompare};
use crate::store::Store;

lazy_static! {
    static ref POSITIVE_WORDS: HashSet<&'static str> = [
        "beat", "beats", "surge", "surges", "growth", "profit", "profits", "upgrade",
        "upgraded", "strong", "record", "expansion", "approval", "approved", "buyback",
        "outperform", "rally", "rallies", "rebound", "gain", "gains", "raise", "raised",
    ]
    .into_iter()
    .collect();
    static ref NEGATIVE_WORDS: HashSet<&'static str> = [
        "miss", "misses", "plunge", "plunges", "loss", "losses", "downgrade", "downgraded",
        "weak", "decline", "declines", "lawsuit", "recall", "investigation", "delay",
        "delayed", "default", "selloff", "cut", "cuts", "warning", "fraud",
    ]
    .into_iter()
    .collect();
}

/// Word-count polarity in [-1.0, 1.0]. Same lowercase-and-split approach as
/// `reason_engine::scoring::event_match`, swapped from Jaccard overlap to a
/// signed lexicon count since here direction, not overlap, is what matters.
fn polarity(summary: &str) -> f64 {
    let mut pos = 0i32;
    let mut neg = 0i32;
    for word in summary.to_lowercase().split_whitespace() {
        let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
        if POSITIVE_WORDS.contains(trimmed) {
            pos += 1;
        } else if NEGATIVE_WORDS.contains(trimmed) {
            neg += 1;
        }
    }
    if pos + neg == 0 {
        return 0.0;
    }
    (pos - neg) as f64 / (pos + neg) as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Positive,
    Negative,
    Uncertain,
}

impl Axis {
    fn as_str(self) -> &'static str {
        match self {
            Axis::Positive => "positive",
            Axis::Negative => "negative",
            Axis::Uncertain => "uncertain",
        }
    }
}

/// Classify one reason against the event's direction. `direction_sign` is
/// +1.0 for an upward move, -1.0 for a downward one. A reason is malformed
/// (empty summary or source url) moves straight to uncertain with its
/// fields blanked, per spec.md §4.9.
fn classify(reason: &EventReason, direction_sign: f64, threshold: f64) -> (Axis, AxisItem) {
    let malformed = reason.summary.trim().is_empty() || reason.source_url.trim().is_empty();
    if malformed {
        return (
            Axis::Uncertain,
            AxisItem {
                axis: Axis::Uncertain.as_str().into(),
                summary: String::new(),
                source_url: String::new(),
                published_at: None,
                reason_type: None,
            },
        );
    }

    let effective = polarity(&reason.summary) * direction_sign;
    let axis = if effective > threshold {
        Axis::Positive
    } else if effective < -threshold {
        Axis::Negative
    } else {
        Axis::Uncertain
    };

    let item = AxisItem {
        axis: axis.as_str().into(),
        summary: reason.summary.clone(),
        source_url: reason.source_url.clone(),
        published_at: Some(reason.published_at),
        reason_type: Some(reason.reason_type),
    };
    (axis, item)
}

fn host_of(url: &str) -> Option<String> {
    url::Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_lowercase))
}

/// Build the Evidence Compare card for one event's reasons. `left_event_id`
/// and `right_event_id` both point at the same event: the comparison is
/// between this event's positive-axis and negative-axis reasons, not
/// between two different events (see DESIGN.md's Evidence Compare open
/// question).
pub fn build_compare(
    store: &Store,
    ids: &dyn IdGen,
    config: &crate::config::Config,
    now: DateTime<Utc>,
    user_id: Uuid,
    event_id: Uuid,
) -> Result<EvidenceCompare, ApiError> {
    let event = store.events.get(event_id)?;
    if event.user_id != user_id {
        return Ok(unavailable(ids, now, user_id, event_id, CompareFallbackReason::PermissionDenied));
    }

    let reasons = store.events.get_reasons(event_id);
    let direction_sign = if event.change_pct >= 0.0 { 1.0 } else { -1.0 };

    let mut items = Vec::with_capacity(reasons.len());
    let mut positive_count = 0usize;
    let mut negative_count = 0usize;
    let mut hosts: HashSet<String> = HashSet::new();

    for reason in &reasons {
        let (axis, item) = classify(reason, direction_sign, config.compare_polarity_threshold);
        match axis {
            Axis::Positive => positive_count += 1,
            Axis::Negative => negative_count += 1,
            Axis::Uncertain => {}
        }
        if axis != Axis::Uncertain {
            if let Some(host) = host_of(&reason.source_url) {
                hosts.insert(host);
            }
        }
        items.push(item);
    }

    let total = items.len();
    let bias_warning = hosts.len() <= 1;

    let status_and_fallback = if positive_count >= 1 && negative_count >= 1 && total >= config.min_compare_items {
        (CompareStatus::Ready, None)
    } else if total < config.min_compare_items {
        (CompareStatus::CompareUnavailable, Some(CompareFallbackReason::InsufficientEvidence))
    } else if positive_count == 0 && negative_count == 0 {
        (CompareStatus::CompareUnavailable, Some(CompareFallbackReason::AxisImbalance))
    } else {
        (CompareStatus::CompareUnavailable, Some(CompareFallbackReason::AmbiguousClassification))
    };

    let compare = EvidenceCompare {
        id: ids.new_id(),
        user_id,
        left_event_id: event_id,
        right_event_id: event_id,
        status: status_and_fallback.0,
        fallback_reason: status_and_fallback.1,
        axes: items,
        bias_warning,
        created_at_utc: now,
    };
    Ok(store.compares.insert(compare))
}

fn unavailable(
    ids: &dyn IdGen,
    now: DateTime<Utc>,
    user_id: Uuid,
    event_id: Uuid,
    reason: CompareFallbackReason,
) -> EvidenceCompare {
    EvidenceCompare {
        id: ids.new_id(),
        user_id,
        left_event_id: event_id,
        right_event_id: event_id,
        status: CompareStatus::CompareUnavailable,
        fallback_reason: Some(reason),
        axes: Vec::new(),
        bias_warning: true,
        created_at_utc: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ids::SequentialGen;
    use crate::models::{Market, PriceEvent, ReasonType, SessionLabel};

    fn reason(ids: &SequentialGen, event_id: Uuid, summary: &str, url: &str, published_at: DateTime<Utc>) -> EventReason {
        EventReason {
            id: ids.new_id(),
            event_id,
            rank: 1,
            reason_type: ReasonType::News,
            confidence_score: 0.5,
            summary: summary.into(),
            source_url: url.into(),
            published_at,
            confidence_breakdown: None,
        }
    }

    fn setup_event(store: &Store, ids: &SequentialGen, user_id: Uuid, change_pct: f64) -> Uuid {
        let event = PriceEvent {
            id: ids.new_id(),
            user_id,
            market: Market::Us,
            symbol: "AAPL".into(),
            change_pct,
            window_minutes: 5,
            detected_at_utc: Utc::now(),
            exchange_timezone: "America/New_York".into(),
            session_label: SessionLabel::Regular,
            delta_realert: false,
        };
        let id = event.id;
        store.events.insert_detected(event);
        id
    }

    #[test]
    fn ready_when_both_axes_populated_and_item_floor_met() {
        let store = Store::new();
        let ids = SequentialGen::default();
        let config = Config::for_tests();
        let user_id = Uuid::new_v4();
        let event_id = setup_event(&store, &ids, user_id, 5.0);

        let reasons = vec![
            reason(&ids, event_id, "company beats earnings and raises guidance", "https://reuters.com/a", Utc::now()),
            reason(&ids, event_id, "investigation and lawsuit filed over recall", "https://bloomberg.com/b", Utc::now()),
        ];
        store.events.set_reasons(event_id, reasons).unwrap();

        let compare = build_compare(&store, &ids, &config, Utc::now(), user_id, event_id).unwrap();
        assert!(matches!(compare.status, CompareStatus::Ready));
        assert!(compare.fallback_reason.is_none());
    }

    #[test]
    fn only_uncertain_items_yields_axis_imbalance() {
        let store = Store::new();
        let ids = SequentialGen::default();
        let config = Config::for_tests();
        let user_id = Uuid::new_v4();
        let event_id = setup_event(&store, &ids, user_id, 5.0);

        let reasons = vec![
            reason(&ids, event_id, "quarterly filing published with routine disclosures", "https://sec.gov/a", Utc::now()),
            reason(&ids, event_id, "analyst note discusses sector trends", "https://sec.gov/b", Utc::now()),
        ];
        store.events.set_reasons(event_id, reasons).unwrap();

        let compare = build_compare(&store, &ids, &config, Utc::now(), user_id, event_id).unwrap();
        assert!(matches!(compare.status, CompareStatus::CompareUnavailable));
        assert!(matches!(compare.fallback_reason, Some(CompareFallbackReason::AxisImbalance)));
        assert!(compare.bias_warning);
    }

    #[test]
    fn malformed_reason_moves_to_uncertain_with_blank_fields() {
        let store = Store::new();
        let ids = SequentialGen::default();
        let config = Config::for_tests();
        let user_id = Uuid::new_v4();
        let event_id = setup_event(&store, &ids, user_id, 5.0);

        let reasons = vec![reason(&ids, event_id, "", "", Utc::now())];
        store.events.set_reasons(event_id, reasons).unwrap();

        let compare = build_compare(&store, &ids, &config, Utc::now(), user_id, event_id).unwrap();
        assert_eq!(compare.axes.len(), 1);
        assert_eq!(compare.axes[0].axis, "uncertain");
        assert!(compare.axes[0].summary.is_empty());
        assert!(compare.axes[0].published_at.is_none());
        assert!(compare.axes[0].reason_type.is_none());
    }

    #[test]
    fn other_users_event_is_permission_denied() {
        let store = Store::new();
        let ids = SequentialGen::default();
        let config = Config::for_tests();
        let owner = Uuid::new_v4();
        let event_id = setup_event(&store, &ids, owner, 5.0);

        let compare = build_compare(&store, &ids, &config, Utc::now(), Uuid::new_v4(), event_id).unwrap();
        assert!(matches!(compare.fallback_reason, Some(CompareFallbackReason::PermissionDenied)));
    }
}

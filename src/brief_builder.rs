//! Periodic pre-market / post-close digest aggregation (spec.md §4.6). The
//! pure aggregation function is kept separate from the ticker so it can be
//! unit tested without spinning up tokio; the ticker wiring mirrors the
//! teacher's `storage_pruning_polling`-style loop (`tokio::time::interval`,
//! tick, do the work, repeat).

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::Config;
use crate::ids::IdGen;
use crate::models::{Brief, BriefContentItem, BriefType, FallbackReason, Market, PriceEvent};
use crate::store::Store;

/// Build one brief for `user_id`/`market`/`brief_type` from events detected
/// within `config.brief_lookback` of `now`. Pure function: no clock reads,
/// no IO beyond the store snapshot already in hand.
pub fn build_brief(
    store: &Store,
    ids: &dyn IdGen,
    config: &Config,
    user_id: Uuid,
    market: Market,
    brief_type: BriefType,
    now: DateTime<Utc>,
) -> Brief {
    let cutoff = now - chrono::Duration::from_std(config.brief_lookback).unwrap_or_default();
    let mut events: Vec<PriceEvent> = store
        .events
        .list_for_user(user_id)
        .into_iter()
        .filter(|e| e.market == market && e.detected_at_utc >= cutoff)
        .collect();

    events.sort_by(|a, b| b.change_pct.abs().partial_cmp(&a.change_pct.abs()).unwrap_or(std::cmp::Ordering::Equal));
    events.truncate(config.brief_top_n);

    let items: Vec<BriefContentItem> = events
        .iter()
        .map(|e| {
            let top_reason = store.events.get_reasons(e.id).into_iter().find(|r| r.rank == 1);
            BriefContentItem {
                market: e.market,
                symbol: e.symbol.clone(),
                event_ids: vec![e.id],
                session_label: e.session_label,
                summary: top_reason.as_ref().map(|r| r.summary.clone()).unwrap_or_default(),
                source_url: top_reason.map(|r| r.source_url.clone()).unwrap_or_default(),
                event_detail_url: format!("/v1/events/{}", e.id),
            }
        })
        .collect();

    let fallback_reason = if items.is_empty() {
        Some(FallbackReason::NoEvents)
    } else if items.len() < config.brief_min_items {
        Some(FallbackReason::InsufficientData)
    } else {
        None
    };

    let expires_at_utc = match brief_type {
        // Pre-market briefs expire at the next session open; approximated
        // here as the regular-session open later the same UTC day, which is
        // refined once an external session calendar feed is wired in
        // (spec.md §9 open question b).
        BriefType::PreMarket => now + chrono::Duration::hours(12),
        BriefType::PostClose => now + chrono::Duration::hours(24),
    };

    Brief {
        id: ids.new_id(),
        user_id,
        brief_type,
        market,
        generated_at_utc: now,
        expires_at_utc,
        items,
        fallback_reason,
        read_at_utc: None,
        is_expired: now >= expires_at_utc,
    }
}

pub fn is_expired(brief: &Brief, now: DateTime<Utc>) -> bool {
    now >= brief.expires_at_utc
}

/// Refresh `Brief.is_expired` against the current time before serving a
/// brief that may have been generated earlier (spec.md §3: `is_expired`
/// reflects the moment it's read, not the moment it was built).
pub fn stamp_expiry(mut brief: Brief, now: DateTime<Utc>) -> Brief {
    brief.is_expired = is_expired(&brief, now);
    brief
}

/// Spawn the periodic ticker for all currently-registered users. Mirrors
/// the teacher's single-purpose polling task shape.
pub fn spawn_ticker(
    store: Store,
    clock: std::sync::Arc<dyn Clock>,
    ids: std::sync::Arc<dyn IdGen>,
    config: std::sync::Arc<Config>,
    brief_type: BriefType,
    poll_interval: Duration,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        loop {
            ticker.tick().await;
            let now = clock.now();
            let user_ids = store.watchlist.all_user_ids();
            for user_id in user_ids {
                for market in [Market::Kr, Market::Us] {
                    let brief = build_brief(&store, ids.as_ref(), &config, user_id, market, brief_type, now);
                    store.briefs.insert(brief);
                }
            }
            info!(brief_type = ?brief_type, "brief builder tick complete");
        }
    });
}

//! Notification listing/unread-count and brief detail expiry/auto-mark-read
//! (spec.md §8 invariants: `unread_count` formula, expired brief detail
//! returns 410 but still appears in the list).

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use reason_pipeline_backend::clock::Clock as _;
use reason_pipeline_backend::models::{
    Brief, BriefType, Channel, FallbackReason, Market, Notification, NotificationStatus,
};

fn seed_notification(store: &reason_pipeline_backend::store::Store, user_id: Uuid, status: NotificationStatus) -> Uuid {
    let notification = Notification {
        id: Uuid::new_v4(),
        user_id,
        event_id: Uuid::new_v4(),
        channel: Channel::InApp,
        status,
        created_at_utc: Utc::now(),
        read_at_utc: None,
    };
    let id = notification.id;
    store.notifications.insert(notification);
    id
}

fn seed_brief(store: &reason_pipeline_backend::store::Store, user_id: Uuid, expires_at_utc: chrono::DateTime<Utc>) -> Uuid {
    let brief = Brief {
        id: Uuid::new_v4(),
        user_id,
        brief_type: BriefType::PreMarket,
        market: Market::Us,
        generated_at_utc: Utc::now(),
        expires_at_utc,
        items: Vec::new(),
        fallback_reason: Some(FallbackReason::NoEvents),
        read_at_utc: None,
        is_expired: expires_at_utc <= Utc::now(),
    };
    let id = brief.id;
    store.briefs.insert(brief);
    id
}

#[tokio::test]
async fn notification_list_reports_unread_count_matching_sent_status_only() {
    let harness = common::build();
    let (user_id, token) = common::signup(&harness.app, "notify1@example.com").await;
    seed_notification(&harness.store, user_id, NotificationStatus::Sent);
    seed_notification(&harness.store, user_id, NotificationStatus::Sent);
    let read_id = seed_notification(&harness.store, user_id, NotificationStatus::Sent);

    let req = common::json_request("GET", "/v1/notifications", Some(&token), None);
    let (status, body) = common::send(&harness.app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unread_count"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);

    let mark_req =
        common::json_request("PATCH", &format!("/v1/notifications/{read_id}/read"), Some(&token), None);
    let (status, body) = common::send(&harness.app, mark_req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "read");

    let req = common::json_request("GET", "/v1/notifications", Some(&token), None);
    let (status, body) = common::send(&harness.app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unread_count"], 2);
}

#[tokio::test]
async fn marking_another_users_notification_read_is_not_found() {
    let harness = common::build();
    let (owner_id, _owner_token) = common::signup(&harness.app, "notify_owner@example.com").await;
    let (_, other_token) = common::signup(&harness.app, "notify_other@example.com").await;
    let notification_id = seed_notification(&harness.store, owner_id, NotificationStatus::Sent);

    let req = common::json_request(
        "PATCH",
        &format!("/v1/notifications/{notification_id}/read"),
        Some(&other_token),
        None,
    );
    let (status, body) = common::send(&harness.app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn expired_brief_detail_is_gone_but_still_appears_in_list() {
    let harness = common::build();
    let (user_id, token) = common::signup(&harness.app, "briefs1@example.com").await;
    let now = harness.clock.now();
    let brief_id = seed_brief(&harness.store, user_id, now - chrono::Duration::hours(1));

    let list_req = common::json_request("GET", "/v1/briefs", Some(&token), None);
    let (status, body) = common::send(&harness.app, list_req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["id"], brief_id.to_string());

    let detail_req = common::json_request("GET", &format!("/v1/briefs/{brief_id}"), Some(&token), None);
    let (status, body) = common::send(&harness.app, detail_req).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["code"], "brief_link_expired");
}

#[tokio::test]
async fn unexpired_unread_brief_is_marked_read_on_first_fetch_only() {
    let harness = common::build();
    let (user_id, token) = common::signup(&harness.app, "briefs2@example.com").await;
    let now = harness.clock.now();
    let brief_id = seed_brief(&harness.store, user_id, now + chrono::Duration::hours(6));

    let first = common::json_request("GET", &format!("/v1/briefs/{brief_id}"), Some(&token), None);
    let (status, body) = common::send(&harness.app, first).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["read_at_utc"].is_null());

    let first_read_at = body["read_at_utc"].clone();

    let second = common::json_request("GET", &format!("/v1/briefs/{brief_id}"), Some(&token), None);
    let (status, body) = common::send(&harness.app, second).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["read_at_utc"], first_read_at, "second fetch must not bump read_at_utc again");
}

#[tokio::test]
async fn explicit_mark_read_on_brief_works_independent_of_fetch() {
    let harness = common::build();
    let (user_id, token) = common::signup(&harness.app, "briefs3@example.com").await;
    let now = harness.clock.now();
    let brief_id = seed_brief(&harness.store, user_id, now + chrono::Duration::hours(6));

    let req = common::json_request("PATCH", &format!("/v1/briefs/{brief_id}/read"), Some(&token), None);
    let (status, body) = common::send(&harness.app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["read_at_utc"].is_null());
}

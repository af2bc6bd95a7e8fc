//! Watchlist add/list/remove round trips and threshold upsert (spec.md §8
//! round-trip laws).

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn add_then_list_then_remove_then_readd_is_not_a_duplicate() {
    let harness = common::build();
    let (_, token) = common::signup(&harness.app, "watcher@example.com").await;

    let add_req = common::json_request(
        "POST",
        "/v1/watchlists/items",
        Some(&token),
        Some(json!({ "symbol": "aapl", "market": "US" })),
    );
    let (status, body) = common::send(&harness.app, add_req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["ticker"], "AAPL");
    assert_eq!(body["is_duplicate"], false);
    let item_id = body["item"]["id"].as_str().unwrap().to_string();

    let list_req = common::json_request("GET", "/v1/watchlists/items", Some(&token), None);
    let (_, body) = common::send(&harness.app, list_req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["ticker"], "AAPL");

    let remove_req =
        common::json_request("DELETE", &format!("/v1/watchlists/items/{item_id}"), Some(&token), None);
    let (status, _) = common::send(&harness.app, remove_req).await;
    assert_eq!(status, StatusCode::OK);

    let list_req = common::json_request("GET", "/v1/watchlists/items", Some(&token), None);
    let (_, body) = common::send(&harness.app, list_req).await;
    assert_eq!(body["total"], 0);

    let readd_req = common::json_request(
        "POST",
        "/v1/watchlists/items",
        Some(&token),
        Some(json!({ "symbol": "AAPL", "market": "US" })),
    );
    let (status, body) = common::send(&harness.app, readd_req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_duplicate"], false, "item was removed, a fresh add is not a duplicate");
}

#[tokio::test]
async fn adding_same_symbol_twice_without_removal_reports_duplicate() {
    let harness = common::build();
    let (_, token) = common::signup(&harness.app, "watcher2@example.com").await;

    for _ in 0..2 {
        let req = common::json_request(
            "POST",
            "/v1/watchlists/items",
            Some(&token),
            Some(json!({ "symbol": "MSFT", "market": "US" })),
        );
        common::send(&harness.app, req).await;
    }

    let req = common::json_request(
        "POST",
        "/v1/watchlists/items",
        Some(&token),
        Some(json!({ "symbol": "MSFT", "market": "US" })),
    );
    let (status, body) = common::send(&harness.app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_duplicate"], true);
}

#[tokio::test]
async fn inactive_catalog_symbol_is_rejected() {
    let harness = common::build();
    let (_, token) = common::signup(&harness.app, "watcher3@example.com").await;

    let req = common::json_request(
        "POST",
        "/v1/watchlists/items",
        Some(&token),
        Some(json!({ "symbol": "035720", "market": "KR" })),
    );
    let (status, body) = common::send(&harness.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn upsert_threshold_then_list_shows_exactly_one_row_per_window() {
    let harness = common::build();
    let (_, token) = common::signup(&harness.app, "thresholder@example.com").await;

    let upsert = common::json_request(
        "POST",
        "/v1/thresholds",
        Some(&token),
        Some(json!({ "window_minutes": 5, "threshold_pct": 4.5 })),
    );
    common::send(&harness.app, upsert).await;

    let upsert_again = common::json_request(
        "POST",
        "/v1/thresholds",
        Some(&token),
        Some(json!({ "window_minutes": 5, "threshold_pct": 6.0 })),
    );
    common::send(&harness.app, upsert_again).await;

    let list_req = common::json_request("GET", "/v1/thresholds", Some(&token), None);
    let (status, body) = common::send(&harness.app, list_req).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1, "upsert replaces the row for window_minutes=5, not appends");
    assert_eq!(items[0]["threshold_pct"], 6.0);
}

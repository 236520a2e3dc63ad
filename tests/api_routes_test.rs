//! In-process tests for the `/orders` endpoints.
//!
//! Each test builds the router over a freshly seeded store and drives it with
//! `tower::ServiceExt::oneshot`; no socket is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use order_tracker::api::{build_router, AppState};
use order_tracker::clients::OrderClient;
use order_tracker::order_actor::{self, seed_orders};
use order_tracker::policy::TransitionPolicy;
use tower::ServiceExt; // oneshot

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Router over a store seeded with the default 100 orders.
fn make_router() -> axum::Router {
    let (actor, client) = order_actor::new(seed_orders(100, Utc::now()));
    tokio::spawn(actor.run(TransitionPolicy::standard()));
    build_router(Arc::new(AppState::new(
        OrderClient::new(client),
        TransitionPolicy::standard(),
    )))
}

async fn call(router: &axum::Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = router.clone().oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(router: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    call(router, req).await
}

async fn patch(router: &axum::Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    call(router, req).await
}

fn timestamp(v: &serde_json::Value) -> DateTime<Utc> {
    v.as_str().unwrap().parse().unwrap()
}

// ---------------------------------------------------------------------------
// GET /orders
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_defaults_to_first_ten_of_a_hundred() {
    let router = make_router();
    let (status, json) = get(&router, "/orders").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"].as_array().unwrap().len(), 10);
    assert_eq!(json["total"], 100);
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 10);

    let first = &json["items"][0];
    assert!(first["createdAt"].is_string());
    assert!(first["updatedAt"].is_string());
}

#[tokio::test]
async fn list_filters_by_status() {
    let router = make_router();
    let (status, json) = get(&router, "/orders?status=delivered&limit=50").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 20);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 20);
    assert!(items.iter().all(|o| o["status"] == "delivered"));
}

#[tokio::test]
async fn list_sorted_by_eta_is_non_decreasing() {
    let router = make_router();
    let (_, json) = get(&router, "/orders?sort=eta&order=asc&limit=100").await;

    let etas: Vec<_> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| timestamp(&o["eta"]))
        .collect();
    assert_eq!(etas.len(), 100);
    assert!(etas.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn list_accepts_underscore_aliases_and_empty_filters() {
    let router = make_router();
    let (status, json) =
        get(&router, "/orders?_page=2&_limit=5&_sort=id&_order=desc&status=&provider=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 2);
    assert_eq!(json["limit"], 5);
    assert_eq!(json["total"], 100);
    assert_eq!(json["items"][0]["id"], "ORD-1094");
}

#[tokio::test]
async fn list_prefers_plain_names_when_both_spellings_are_sent() {
    let router = make_router();
    let (status, json) = get(&router, "/orders?page=2&_page=3&limit=5&_limit=7&sort=id").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 2);
    assert_eq!(json["limit"], 5);
    assert_eq!(json["items"][0]["id"], "ORD-1005");
}

#[tokio::test]
async fn malformed_query_string_is_a_json_400() {
    let router = make_router();
    let (status, json) = get(&router, "/orders?page=1&page=2").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn list_rejects_unknown_values_but_not_bad_numbers() {
    let router = make_router();

    for uri in [
        "/orders?status=lost",
        "/orders?provider=DHL",
        "/orders?sort=weight",
        "/orders?order=up",
    ] {
        let (status, json) = get(&router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"].is_string(), "{uri}");
    }

    let (status, json) = get(&router, "/orders?page=abc&limit=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 1);
}

// ---------------------------------------------------------------------------
// GET /orders/:id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_id_and_by_number() {
    let router = make_router();

    let (status, json) = get(&router, "/orders/ORD-1003").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "delivered");
    assert_eq!(json["provider"], "Nauta");

    let (status, json) = get(&router, "/orders/1003").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "ORD-1003");
}

#[tokio::test]
async fn get_unknown_is_404() {
    let router = make_router();
    let (status, json) = get(&router, "/orders/ORD-9999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, serde_json::json!({"error": "Not found"}));

    let (_, list) = get(&router, "/orders?limit=100").await;
    assert_eq!(list["total"], 100);
}

// ---------------------------------------------------------------------------
// PATCH /orders/:id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn patch_applies_an_allowed_transition() {
    let router = make_router();
    let (_, before) = get(&router, "/orders/ORD-1000").await;
    assert_eq!(before["status"], "created");

    let (status, json) = patch(&router, "/orders/ORD-1000", r#"{"status":"in_transit"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "in_transit");
    assert!(timestamp(&json["updatedAt"]) > timestamp(&before["updatedAt"]));

    let (_, after) = get(&router, "/orders/1000").await;
    assert_eq!(after["status"], "in_transit");
}

#[tokio::test]
async fn patch_to_same_status_is_idempotent() {
    let router = make_router();
    let (_, before) = get(&router, "/orders/ORD-1003").await;

    let (status, json) = patch(&router, "/orders/ORD-1003", r#"{"status":"delivered"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, before);
}

#[tokio::test]
async fn patch_disallowed_transition_is_422_and_changes_nothing() {
    let router = make_router();
    let (_, before) = get(&router, "/orders/ORD-1003").await;

    let (status, json) = patch(&router, "/orders/ORD-1003", r#"{"status":"created"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "Invalid transition");
    assert_eq!(json["from"], "delivered");
    assert_eq!(json["to"], "created");
    assert_eq!(json["allowed"], serde_json::json!([]));

    let (_, after) = get(&router, "/orders/ORD-1003").await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn patch_checks_run_in_order() {
    let router = make_router();

    // unknown id wins over a missing status
    let (status, _) = patch(&router, "/orders/ORD-9999", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = patch(&router, "/orders/ORD-1000", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing status");

    let (status, json) = patch(&router, "/orders/ORD-1000", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing status");

    let (status, json) = patch(&router, "/orders/ORD-1000", r#"{"status":"lost"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid status");

    // present but not a string
    let (status, json) = patch(&router, "/orders/ORD-1000", r#"{"status":5}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid status");

    let (_, order) = get(&router, "/orders/ORD-1000").await;
    assert_eq!(order["status"], "created");
}

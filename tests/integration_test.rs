//! Integration tests for the ads API
//!
//! These tests verify the entire application stack including:
//! - HTTP routing
//! - Request/response handling
//! - Database operations
//! - Error handling

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use adpulse::database::{init_db, AppState};
use adpulse::metrics::{ctr_percent, round_one_decimal};
use adpulse::route::create_app;
use adpulse::seeder::FixedClock;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
}

/// Helper function to create a test application with a temporary database
fn setup_test_app() -> (axum::Router, NamedTempFile) {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_db.path().to_str().unwrap();

    let db = init_db(db_path).expect("Failed to initialize test database");
    let state = AppState::new(db).with_clock(FixedClock(today()));

    (create_app(state), temp_db)
}

/// Helper function to parse response body as JSON
async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn ad_json(id: &str, reach: u64, clicks: u64, conversions: u64, status: &str, sentiment: &str) -> Value {
    let ctr = round_one_decimal(ctr_percent(clicks, reach));

    json!({
        "id": id,
        "title": format!("Ad {id}"),
        "platform": "Instagram",
        "url": "https://instagram.com/p/1",
        "reach": reach,
        "clicks": clicks,
        "ctr": ctr,
        "conversions": conversions,
        "status": status,
        "sentiment": sentiment,
        "createdAt": "2026-02-01"
    })
}

async fn post_ad(app: &axum::Router, ad: Value) -> StatusCode {
    app.clone()
        .oneshot(json_request("POST", "/ads", &ad))
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_list_ads_empty() {
    let (app, _temp_db) = setup_test_app();

    let response = app.oneshot(empty_request("GET", "/ads")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_ad_success() {
    let (app, _temp_db) = setup_test_app();

    let ad = ad_json("ad-1", 3000, 150, 15, "active", "steady");
    let response = app
        .clone()
        .oneshot(json_request("POST", "/ads", &ad))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response.into_body()).await;
    assert_eq!(body, ad);

    let response = app.oneshot(empty_request("GET", "/ads")).await.unwrap();
    let body = response_json(response.into_body()).await;
    assert_eq!(body, json!([ad]));
}

#[tokio::test]
async fn test_create_ad_duplicate_id() {
    let (app, _temp_db) = setup_test_app();

    let ad = ad_json("dup", 3000, 150, 15, "active", "steady");
    assert_eq!(post_ad(&app, ad.clone()).await, StatusCode::CREATED);

    let response = app
        .oneshot(json_request("POST", "/ads", &ad))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["code"], "conflict");
}

#[tokio::test]
async fn test_create_ad_rejects_more_clicks_than_reach() {
    let (app, _temp_db) = setup_test_app();

    let ad = ad_json("bad", 100, 150, 15, "active", "hot");
    let response = app
        .oneshot(json_request("POST", "/ads", &ad))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_create_ad_stores_ctr_and_sentiment_as_given() {
    let (app, _temp_db) = setup_test_app();

    // 150 / 3000 is 5.0% (steady), but the caller's values are kept
    let mut ad = ad_json("as-given", 3000, 150, 15, "active", "hot");
    ad["ctr"] = json!(9.9);
    assert_eq!(post_ad(&app, ad.clone()).await, StatusCode::CREATED);

    let response = app.clone().oneshot(empty_request("GET", "/ads")).await.unwrap();
    let body = response_json(response.into_body()).await;
    assert_eq!(body, json!([ad]));

    let response = app.oneshot(empty_request("GET", "/ads/insights")).await.unwrap();
    let body = response_json(response.into_body()).await;
    assert_eq!(body["hot"][0]["id"], "as-given");
}

#[tokio::test]
async fn test_list_preserves_creation_order() {
    let (app, _temp_db) = setup_test_app();

    for id in ["zeta", "alpha", "mid"] {
        assert_eq!(
            post_ad(&app, ad_json(id, 3000, 150, 15, "active", "steady")).await,
            StatusCode::CREATED
        );
    }

    let response = app.oneshot(empty_request("GET", "/ads")).await.unwrap();
    let body = response_json(response.into_body()).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|ad| ad["id"].as_str().unwrap())
        .collect();

    assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn test_create_from_link_seeds_ad() {
    let (app, _temp_db) = setup_test_app();

    let payload = json!({
        "title": " Drop ",
        "platform": "Instagram",
        "url": " https://www.instagram.com/p/abc "
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/links", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["title"], "Drop");
    assert_eq!(body["url"], "https://www.instagram.com/p/abc");
    assert_eq!(body["status"], "active");
    assert_eq!(body["createdAt"], "2026-03-09");
    assert!(body["id"].as_str().unwrap().starts_with("ad-"));

    let reach = body["reach"].as_u64().unwrap();
    let clicks = body["clicks"].as_u64().unwrap();
    assert!((2400..6600).contains(&reach));
    assert!(clicks <= reach);
    assert!(body["conversions"].as_u64().unwrap() >= 4);

    let response = app.oneshot(empty_request("GET", "/ads")).await.unwrap();
    let listed = response_json(response.into_body()).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0], body);
}

#[tokio::test]
async fn test_create_from_link_rejects_platform_mismatch() {
    let (app, _temp_db) = setup_test_app();

    let payload = json!({
        "title": "Teaser",
        "platform": "LinkedIn",
        "url": "https://tiktok.com/@brand/video/1"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/links", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["code"], "validation_error");
    assert_eq!(
        body["error"],
        "URL domain tiktok.com does not match platform LinkedIn"
    );

    // Nothing was stored
    let response = app.oneshot(empty_request("GET", "/ads")).await.unwrap();
    assert_eq!(response_json(response.into_body()).await, json!([]));
}

#[tokio::test]
async fn test_create_from_link_rejects_blank_title() {
    let (app, _temp_db) = setup_test_app();

    let payload = json!({
        "title": "   ",
        "platform": "X",
        "url": "https://x.com/brand/status/1"
    });
    let response = app
        .oneshot(json_request("POST", "/links", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["error"], "title is required");
}

#[tokio::test]
async fn test_update_status_success() {
    let (app, _temp_db) = setup_test_app();
    post_ad(&app, ad_json("ad-1", 4000, 240, 24, "active", "hot")).await;

    let response = app
        .clone()
        .oneshot(json_request("PATCH", "/ads/ad-1", &json!({ "status": "paused" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["sentiment"], "hot");
    assert_eq!(body["reach"], 4000);

    let response = app.oneshot(empty_request("GET", "/ads")).await.unwrap();
    let listed = response_json(response.into_body()).await;
    assert_eq!(listed[0]["status"], "paused");
}

#[tokio::test]
async fn test_update_status_not_found() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .oneshot(json_request("PATCH", "/ads/missing", &json!({ "status": "paused" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_toggle_twice_restores_record() {
    let (app, _temp_db) = setup_test_app();
    let original = ad_json("ad-1", 2500, 75, 6, "active", "cool");
    post_ad(&app, original.clone()).await;

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/ads/ad-1/toggle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let paused = response_json(response.into_body()).await;
    assert_eq!(paused["status"], "paused");

    let response = app
        .oneshot(empty_request("POST", "/ads/ad-1/toggle"))
        .await
        .unwrap();
    let restored = response_json(response.into_body()).await;
    assert_eq!(restored, original);
}

#[tokio::test]
async fn test_toggle_not_found() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .oneshot(empty_request("POST", "/ads/missing/toggle"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_summary_totals() {
    let (app, _temp_db) = setup_test_app();
    post_ad(&app, ad_json("a", 4000, 240, 24, "active", "hot")).await;
    post_ad(&app, ad_json("b", 3000, 150, 16, "paused", "steady")).await;

    let response = app
        .oneshot(empty_request("GET", "/ads/summary"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["reach"], 7000);
    assert_eq!(body["clicks"], 390);
    assert_eq!(body["conversions"], 40);
    assert_eq!(body["active"], 1);
    assert!((body["ctr"].as_f64().unwrap() - 390.0 / 7000.0 * 100.0).abs() < 1e-9);
    assert!((body["cpa"].as_f64().unwrap() - 175.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_summary_of_empty_store() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .oneshot(empty_request("GET", "/ads/summary"))
        .await
        .unwrap();

    let body = response_json(response.into_body()).await;
    assert_eq!(body["reach"], 0);
    assert_eq!(body["active"], 0);
    assert_eq!(body["ctr"], 0.0);
    assert_eq!(body["cpa"], 0.0);
}

#[tokio::test]
async fn test_insights_cohorts() {
    let (app, _temp_db) = setup_test_app();
    post_ad(&app, ad_json("hot-live", 4000, 240, 24, "active", "hot")).await;
    post_ad(&app, ad_json("hot-paused", 4000, 240, 24, "paused", "hot")).await;
    post_ad(&app, ad_json("steady", 3000, 150, 15, "active", "steady")).await;
    post_ad(&app, ad_json("cool-1", 2500, 75, 6, "active", "cool")).await;
    post_ad(&app, ad_json("cool-2", 2600, 52, 4, "active", "cool")).await;

    let response = app
        .oneshot(empty_request("GET", "/ads/insights"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    let ids = |key: &str| -> Vec<String> {
        body[key]
            .as_array()
            .unwrap()
            .iter()
            .map(|ad| ad["id"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(ids("hot"), vec!["hot-live"]);
    assert_eq!(ids("cool"), vec!["cool-1", "cool-2"]);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _temp_db) = setup_test_app();

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
}

//! Storefront router tests with a fixed blocklist and a static locator.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use country_blocker_core::CountryCode;
use country_blocker_integration_tests::{StorefrontHarness, TEST_STORE, get, send};
use country_blocker_storefront::geo::StaticLocator;
use serde_json::json;

fn locator(code: &str) -> StaticLocator {
    StaticLocator::country(CountryCode::parse(code).unwrap())
}

fn gate_request(ip: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/gate")
        .header("cf-connecting-ip", ip)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_and_headers() {
    let harness = StorefrontHarness::new(&[], StaticLocator::failing());
    let resp = send(&harness.app, get("/health")).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.headers["x-content-type-options"], "nosniff");
    assert_eq!(
        resp.headers["access-control-allow-origin"],
        format!("https://{TEST_STORE}")
    );
    assert!(resp.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_blocked_visitor_sees_overlay() {
    let harness = StorefrontHarness::new(&["DE", "FR"], locator("DE"));
    let resp = send(&harness.app, gate_request("203.0.113.7")).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json(), json!({ "state": "visible", "country": "DE" }));
    assert_eq!(harness.locator.calls(), 1);
}

#[tokio::test]
async fn test_other_visitor_stays_hidden() {
    let harness = StorefrontHarness::new(&["DE", "FR"], locator("US"));
    let resp = send(&harness.app, gate_request("198.51.100.1")).await;

    assert_eq!(resp.json(), json!({ "state": "hidden", "country": "US" }));
}

#[tokio::test]
async fn test_lookup_failure_fails_open() {
    let harness = StorefrontHarness::new(&["DE", "FR"], StaticLocator::failing());
    let resp = send(&harness.app, gate_request("198.51.100.1")).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json(), json!({ "state": "hidden" }));
    assert_eq!(harness.locator.calls(), 1);
}

#[tokio::test]
async fn test_empty_list_skips_lookup() {
    let harness = StorefrontHarness::new(&[], locator("DE"));
    let resp = send(&harness.app, get("/api/gate")).await;

    assert_eq!(resp.json(), json!({ "state": "hidden" }));
    assert_eq!(harness.locator.calls(), 0);
}

#[tokio::test]
async fn test_blocker_snippet_injects_list() {
    let harness = StorefrontHarness::new(&["DE", "FR"], StaticLocator::failing());
    let resp = send(&harness.app, get("/blocker")).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(
        resp.headers["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert!(resp.body.contains(r#"id="blocked-countries""#));
    assert!(resp.body.contains(r#"id="blocker-div""#));
    assert!(resp.body.contains("DE&"));
    assert!(resp.body.contains("/assets/country_blocker.js"));
    assert_eq!(harness.locator.calls(), 0);
}

#[tokio::test]
async fn test_gate_script_is_served() {
    let harness = StorefrontHarness::new(&[], StaticLocator::failing());
    let resp = send(&harness.app, get("/assets/country_blocker.js")).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(
        resp.headers["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/javascript")
    );
    assert!(resp.body.contains("data-countries"));
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let harness = StorefrontHarness::new(&[], StaticLocator::failing());
    let resp = send(&harness.app, get("/wp-login.php")).await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

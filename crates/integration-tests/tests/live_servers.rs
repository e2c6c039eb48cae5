//! Tests against running servers.
//!
//! These tests require:
//! - The admin server running (cargo run -p country-blocker-admin)
//! - The storefront server running (cargo run -p country-blocker-storefront)
//! - Valid Shopify credentials in their environment
//!
//! Run with: cargo test -p country-blocker-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Base URL for admin API (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Base URL for storefront (configurable via environment).
fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[tokio::test]
#[ignore = "Requires running admin server and Shopify credentials"]
async fn test_admin_health() {
    let resp = Client::new()
        .get(format!("{}/health", admin_base_url()))
        .send()
        .await
        .expect("Failed to reach admin server");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server and Shopify credentials"]
async fn test_admin_selection_reflects_plan() {
    let resp = Client::new()
        .get(format!("{}/api/selection", admin_base_url()))
        .send()
        .await
        .expect("Failed to get selection");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert!(body["countries"].is_array());
    assert!(body["planType"].is_string());
}

#[tokio::test]
#[ignore = "Requires running storefront server and Shopify credentials"]
async fn test_storefront_snippet_and_gate() {
    let client = Client::new();
    let base_url = storefront_base_url();

    let snippet = client
        .get(format!("{base_url}/blocker"))
        .send()
        .await
        .expect("Failed to get blocker snippet");
    assert_eq!(snippet.status(), StatusCode::OK);
    assert!(snippet.text().await.unwrap().contains("blocked-countries"));

    let gate = client
        .get(format!("{base_url}/api/gate"))
        .send()
        .await
        .expect("Failed to get gate decision");
    assert_eq!(gate.status(), StatusCode::OK);
    let body: Value = gate.json().await.unwrap();
    assert!(body["state"] == "hidden" || body["state"] == "visible");
}

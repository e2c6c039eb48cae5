//! Integration test harness for Country Blocker.
//!
//! # Running Tests
//!
//! ```bash
//! # Router tests against in-memory collaborators
//! cargo test -p country-blocker-integration-tests
//!
//! # Live tests against running servers (needs Shopify credentials)
//! cargo test -p country-blocker-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `admin_api` - Admin router with an in-memory metafield store
//! - `storefront_api` - Storefront router with a static blocklist and locator
//! - `live_servers` - HTTP tests against `ADMIN_BASE_URL` / `STOREFRONT_BASE_URL`

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header::CONTENT_TYPE},
};
use country_blocker_admin::config::{AdminConfig, PlanNames, ShopifyAdminConfig};
use country_blocker_admin::gateway::memory::{InMemoryMetafieldStore, StaticPlanResolver};
use country_blocker_core::{CountryCode, MetafieldKey, PlanTier, Selection};
use country_blocker_storefront::blocklist::StaticBlocklist;
use country_blocker_storefront::config::{
    GeolocationConfig, ShopifyStorefrontConfig, StorefrontConfig,
};
use country_blocker_storefront::geo::StaticLocator;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

/// Shop domain used by every in-process test.
pub const TEST_STORE: &str = "blocker-test.myshopify.com";

/// Admin configuration that never touches the environment.
#[must_use]
pub fn admin_config() -> AdminConfig {
    AdminConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3001,
        shopify: ShopifyAdminConfig {
            store: TEST_STORE.to_string(),
            api_version: "2026-01".to_string(),
            access_token: SecretString::from("shpat_integration_test"),
        },
        app_handle: "insta-18".to_string(),
        plans: PlanNames::default(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Storefront configuration that never touches the environment.
#[must_use]
pub fn storefront_config() -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        shopify: ShopifyStorefrontConfig {
            store: TEST_STORE.to_string(),
            api_version: "2026-01".to_string(),
            storefront_private_token: SecretString::from("shpss_integration_test"),
        },
        geolocation: GeolocationConfig {
            url: "https://api.country.is".parse().unwrap(),
            timeout: Duration::from_secs(5),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Parse a list of codes.
#[must_use]
pub fn codes(raw: &[&str]) -> Vec<CountryCode> {
    raw.iter().map(|c| CountryCode::parse(c).unwrap()).collect()
}

/// The admin app wired to in-memory collaborators.
pub struct AdminHarness {
    pub app: Router,
    pub store: Arc<InMemoryMetafieldStore>,
    pub plans: Arc<StaticPlanResolver>,
}

impl AdminHarness {
    /// An admin app on `tier` with nothing stored.
    #[must_use]
    pub fn new(tier: PlanTier) -> Self {
        Self::with_store(tier, InMemoryMetafieldStore::new())
    }

    /// An admin app on `tier` with `raw` as the stored selection.
    #[must_use]
    pub fn with_selection(tier: PlanTier, raw: &str) -> Self {
        Self::with_store(
            tier,
            InMemoryMetafieldStore::with_value(MetafieldKey::SELECTED_COUNTRIES, raw),
        )
    }

    fn with_store(tier: PlanTier, store: InMemoryMetafieldStore) -> Self {
        let store = Arc::new(store);
        let plans = Arc::new(StaticPlanResolver::new(tier));
        let state = country_blocker_admin::AppState::with_collaborators(
            admin_config(),
            store.clone(),
            plans.clone(),
        );

        Self {
            app: country_blocker_admin::routes::app(state),
            store,
            plans,
        }
    }

    /// The persisted selection value, if any.
    #[must_use]
    pub fn stored_selection(&self) -> Option<String> {
        self.store.get(MetafieldKey::SELECTED_COUNTRIES)
    }
}

/// The storefront app wired to a fixed blocklist and locator.
pub struct StorefrontHarness {
    pub app: Router,
    pub locator: Arc<StaticLocator>,
}

impl StorefrontHarness {
    /// A storefront app blocking `blocked`, locating every visitor with `locator`.
    #[must_use]
    pub fn new(blocked: &[&str], locator: StaticLocator) -> Self {
        let locator = Arc::new(locator);
        let blocklist = Arc::new(StaticBlocklist::new(Selection::from(codes(blocked))));
        let state = country_blocker_storefront::AppState::with_collaborators(
            storefront_config(),
            blocklist,
            locator.clone(),
        );

        Self {
            app: country_blocker_storefront::routes::app(state),
            locator,
        }
    }
}

/// A response captured from a oneshot request.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Send one request through `app`.
pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// `GET uri`.
#[must_use]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// `method uri` with a JSON body.
#[must_use]
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `POST uri` with a urlencoded form body.
#[must_use]
pub fn form_request(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

//! Shopify webhooks.
//!
//! Compliance topics are only logged and acknowledged: the app stores
//! nothing outside Shopify metafields. Subscription updates drop the cached
//! plan so the next request sees the new tier.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::Value;

use crate::state::AppState;

/// Header carrying the webhook topic.
pub const TOPIC_HEADER: &str = "x-shopify-topic";
/// Header carrying the sending shop's domain.
pub const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";

/// Build the webhooks router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhooks/compliance", post(compliance))
        .route("/webhooks/customers/data_request", post(compliance))
        .route("/webhooks/shop/redact", post(compliance))
        .route("/webhooks/app_subscriptions/update", post(subscription_update))
}

/// Compliance topics this app subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceTopic {
    CustomersDataRequest,
    CustomersRedact,
    ShopRedact,
}

impl ComplianceTopic {
    #[must_use]
    pub fn from_header(topic: &str) -> Option<Self> {
        match topic {
            "customers/data_request" => Some(Self::CustomersDataRequest),
            "customers/redact" => Some(Self::CustomersRedact),
            "shop/redact" => Some(Self::ShopRedact),
            _ => None,
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

fn field<'a>(payload: &'a Value, pointer: &str) -> &'a Value {
    payload.pointer(pointer).unwrap_or(&Value::Null)
}

/// Topic, shop domain and JSON payload of a webhook request.
///
/// A missing topic or an unreadable payload is answered with 401.
fn read_webhook<'a>(
    headers: &'a HeaderMap,
    body: &Bytes,
) -> Result<(&'a str, &'a str, Value), StatusCode> {
    let Some(topic) = header(headers, TOPIC_HEADER) else {
        tracing::error!("Webhook request without topic");
        return Err(StatusCode::UNAUTHORIZED);
    };
    let shop = header(headers, SHOP_DOMAIN_HEADER).unwrap_or("unknown");

    match serde_json::from_slice(body) {
        Ok(payload) => Ok((topic, shop, payload)),
        Err(error) => {
            tracing::error!(topic, shop, %error, "Unreadable webhook payload");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Acknowledge a compliance webhook.
///
/// Returns 401 without a topic or with an unreadable payload, 200 otherwise.
pub async fn compliance(headers: HeaderMap, body: Bytes) -> StatusCode {
    let (topic, shop, payload) = match read_webhook(&headers, &body) {
        Ok(webhook) => webhook,
        Err(status) => return status,
    };

    tracing::info!(topic, shop, "Received compliance webhook");

    match ComplianceTopic::from_header(topic) {
        Some(ComplianceTopic::CustomersDataRequest) => {
            tracing::info!(
                shop,
                customer_id = %field(&payload, "/customer/id"),
                orders_requested = %field(&payload, "/orders_requested"),
                "Customer data request: no customer data stored"
            );
        }
        Some(ComplianceTopic::CustomersRedact) => {
            tracing::info!(
                shop,
                customer_id = %field(&payload, "/customer/id"),
                orders_to_redact = %field(&payload, "/orders_to_redact"),
                "Customer redaction request: no customer data stored"
            );
        }
        Some(ComplianceTopic::ShopRedact) => {
            tracing::info!(
                shop,
                shop_id = %field(&payload, "/shop_id"),
                "Shop redaction request: metafields are removed by Shopify"
            );
        }
        None => {
            tracing::warn!(topic, shop, "Unhandled compliance webhook topic");
        }
    }

    StatusCode::OK
}

/// `POST /webhooks/app_subscriptions/update`
///
/// A subscription was created, upgraded or cancelled.
pub async fn subscription_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let (topic, shop, payload) = match read_webhook(&headers, &body) {
        Ok(webhook) => webhook,
        Err(status) => return status,
    };

    tracing::info!(
        topic,
        shop,
        name = %field(&payload, "/app_subscription/name"),
        status = %field(&payload, "/app_subscription/status"),
        "Subscription changed, refreshing plan"
    );
    state.invalidate_plan().await;

    StatusCode::OK
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(topic: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(topic) = topic {
            headers.insert(TOPIC_HEADER, HeaderValue::from_static(topic));
        }
        headers.insert(
            SHOP_DOMAIN_HEADER,
            HeaderValue::from_static("blocker-test.myshopify.com"),
        );
        headers
    }

    #[test]
    fn test_topic_parsing() {
        assert_eq!(
            ComplianceTopic::from_header("shop/redact"),
            Some(ComplianceTopic::ShopRedact)
        );
        assert_eq!(ComplianceTopic::from_header("orders/create"), None);
    }

    #[tokio::test]
    async fn test_missing_topic_is_unauthorized() {
        let status = compliance(headers(None), Bytes::from_static(b"{}")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_known_and_unknown_topics_are_acknowledged() {
        let body = Bytes::from_static(br#"{"shop_id": 1, "shop_domain": "blocker-test.myshopify.com"}"#);
        assert_eq!(
            compliance(headers(Some("shop/redact")), body.clone()).await,
            StatusCode::OK
        );
        assert_eq!(
            compliance(headers(Some("app/uninstalled")), body).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_unreadable_payload_is_unauthorized() {
        let status = compliance(
            headers(Some("customers/redact")),
            Bytes::from_static(b"not json"),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

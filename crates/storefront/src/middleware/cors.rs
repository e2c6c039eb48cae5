//! Cross-origin read access for the shop's own pages.
//!
//! The blocker snippet and `/api/gate` are fetched by scripts running on
//! `https://{store}`. Only that origin is allowed; no credentials.

use axum::{
    extract::{Request, State},
    http::{
        HeaderValue,
        header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, VARY},
    },
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// The single origin allowed to read storefront responses.
#[must_use]
pub fn allowed_origin(store: &str) -> String {
    format!("https://{store}")
}

/// Add `Access-Control-Allow-Origin` for the configured shop.
pub async fn cors_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    match HeaderValue::from_str(&allowed_origin(&state.config().shopify.store)) {
        Ok(origin) => {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET"));
            headers.insert(VARY, HeaderValue::from_static("Origin"));
        }
        Err(error) => {
            tracing::warn!(%error, "Store domain is not a valid header value, no CORS headers sent");
        }
    }

    response
}

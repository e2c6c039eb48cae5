//! Security headers for the embedded admin.
//!
//! The admin is loaded inside an iframe in the Shopify admin, so it cannot
//! send `X-Frame-Options: DENY`. Framing is restricted with CSP
//! `frame-ancestors` to the shop's own domain and `admin.shopify.com`.

use axum::{
    extract::{Request, State},
    http::{
        HeaderValue,
        header::{CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS},
    },
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Build the CSP value allowing the shop and the Shopify admin to frame the app.
#[must_use]
pub fn frame_ancestors_policy(store: &str) -> String {
    format!("frame-ancestors https://{store} https://admin.shopify.com;")
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `Content-Security-Policy: frame-ancestors https://{store} https://admin.shopify.com;`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    match HeaderValue::from_str(&frame_ancestors_policy(&state.config().shopify.store)) {
        Ok(csp) => {
            headers.insert(CONTENT_SECURITY_POLICY, csp);
        }
        Err(error) => {
            tracing::warn!(%error, "Store domain is not a valid header value, refusing framing");
            headers.insert(
                CONTENT_SECURITY_POLICY,
                HeaderValue::from_static("frame-ancestors 'none';"),
            );
        }
    }

    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}

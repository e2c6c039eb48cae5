//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an upstream `x-request-id` or Cloudflare `cf-ray` value when
//! present, otherwise generates a UUID v4. The ID is recorded in the current
//! tracing span, tagged on the Sentry scope and echoed in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn upstream_request_id(request: &Request) -> Option<String> {
    [REQUEST_ID_HEADER, "cf-ray"].into_iter().find_map(|name| {
        request
            .headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .filter(|id| !id.is_empty())
            .map(String::from)
    })
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[test]
    fn test_upstream_request_id_prefers_explicit_header() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "req-1")
            .header("cf-ray", "ray-1")
            .body(Body::empty())
            .unwrap_or_default();
        assert_eq!(upstream_request_id(&request).as_deref(), Some("req-1"));

        let request = Request::builder()
            .header("cf-ray", "ray-1")
            .body(Body::empty())
            .unwrap_or_default();
        assert_eq!(upstream_request_id(&request).as_deref(), Some("ray-1"));
    }
}

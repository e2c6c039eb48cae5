//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Health check
//! GET  /blocker                   - Blocker snippet (HTML)
//! GET  /assets/country_blocker.js - Client-side gate script
//! GET  /api/gate                  - Gate decision for the caller's IP
//! ```

pub mod assets;
pub mod blocker;
pub mod gate;

use axum::{
    Router,
    http::{HeaderValue, header::X_CONTENT_TYPE_OPTIONS},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::StorefrontError;
use crate::middleware::{cors_middleware, request_id_middleware};
use crate::state::AppState;

/// All storefront routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/blocker", get(blocker::snippet))
        .route(assets::GATE_SCRIPT_PATH, get(assets::gate_script))
        .route("/api/gate", get(gate::decide))
        .fallback(not_found)
}

/// The storefront application with its request-level middleware.
///
/// Tracing and Sentry layers are added by the binary around this router.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> StorefrontError {
    StorefrontError::NotFound("page".to_string())
}

//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//!
//! # Catalog
//! GET    /api/countries                   - Quick-select options and continent groups
//!
//! # Selection
//! GET    /api/metafields                  - Raw blocked list ({ allowedCountries })
//! POST   /api/metafields                  - Replace the list (form field `countries`)
//! GET    /api/selection                   - Grouped selection with plan and limit
//! POST   /api/selection/pick              - Add a selector value ({ value })
//! POST   /api/selection/add               - Add codes ({ codes })
//! DELETE /api/selection/{code}            - Remove one code
//! POST   /api/selection/clear             - Remove every code
//!
//! # Settings
//! GET    /api/shortcuts                   - Keyboard shortcut suppression setting
//! POST   /api/shortcuts                   - Toggle it (premium only, form field `enabled`)
//! GET    /api/pricing                     - Managed pricing page URL
//!
//! # Compliance webhooks
//! POST   /webhooks/compliance             - customers/data_request, customers/redact, shop/redact
//! POST   /webhooks/customers/data_request
//! POST   /webhooks/shop/redact
//! ```

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};

use crate::error::AppError;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

pub mod countries;
pub mod metafields;
pub mod pricing;
pub mod selection;
pub mod shortcuts;
pub mod webhooks;

/// All admin routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(countries::router())
        .merge(metafields::router())
        .merge(selection::router())
        .merge(shortcuts::router())
        .merge(pricing::router())
        .merge(webhooks::router())
        .fallback(not_found)
}

/// The admin application with its request-level middleware.
///
/// Tracing and Sentry layers are added by the binary around this router.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(from_fn_with_state(state.clone(), security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("route".to_string())
}

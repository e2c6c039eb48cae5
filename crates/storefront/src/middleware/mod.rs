//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing, added in `main`)
//! 3. Request ID (add unique ID to each request)
//! 4. `X-Content-Type-Options: nosniff` (tower-http, added in `routes::app`)
//! 5. CORS (read access for the shop's own origin)
//!
//! [`ClientIp`] is an extractor rather than a layer: only the gate needs it.

pub mod client_ip;
pub mod cors;
pub mod request_id;

pub use client_ip::{ClientIp, client_ip_from_headers};
pub use cors::{allowed_origin, cors_middleware};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

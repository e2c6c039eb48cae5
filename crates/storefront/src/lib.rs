//! Country Blocker storefront library.
//!
//! Serves the blocker snippet a theme embeds, the client-side gate script,
//! and a server-side gate decision backed by a geolocation service.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod blocklist;
pub mod config;
pub mod error;
pub mod gate;
pub mod geo;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;

pub use config::StorefrontConfig;
pub use error::StorefrontError;
pub use state::AppState;

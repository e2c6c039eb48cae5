//! Country Blocker Admin library.
//!
//! This crate provides the embedded admin API as a library, allowing it to
//! be tested and reused by the CLI.
//!
//! # Security
//!
//! This crate holds the Shopify Admin API access token, which can read and
//! write shop metafields. Responses may only be framed by the shop's own
//! admin (see [`middleware::security_headers`]).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;

pub use config::AdminConfig;
pub use error::AppError;
pub use state::AppState;

//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **This module holds the offline Admin API access token for the shop.**
//!
//! The app only needs three things from the Admin API:
//! - reading shop metafields
//! - writing shop metafields (`metafieldsSet`)
//! - listing the app installation's active subscriptions
//!
//! # Architecture
//!
//! - Operations implement `graphql_client::GraphQLQuery` over hand-written
//!   documents (see [`queries`]), so no schema dump is required
//! - Direct API calls to Shopify (no local database)
//!
//! # Example
//!
//! ```rust,ignore
//! use country_blocker_admin::shopify::AdminClient;
//! use country_blocker_core::MetafieldKey;
//!
//! let client = AdminClient::new(&config.shopify);
//!
//! let raw = client.get_shop_metafield(MetafieldKey::SELECTED_COUNTRIES).await?;
//! client.set_shop_metafield(MetafieldKey::SELECTED_COUNTRIES, r#"["DE"]"#).await?;
//! ```

mod client;
pub mod queries;

pub use client::{AdminClient, AppSubscription};

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

//! CLI subcommand implementations.

use country_blocker_admin::config::ConfigError;
use country_blocker_admin::shopify::AdminShopifyError;
use country_blocker_core::{CountryCodeError, SelectorParseError};
use thiserror::Error;

pub mod catalog;
pub mod plan;
pub mod selection;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify Admin API call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),

    /// Argument is not a selector value.
    #[error("Invalid selector value: {0}")]
    Selector(#[from] SelectorParseError),

    /// Argument is not a country code.
    #[error("Invalid country code: {0}")]
    CountryCode(#[from] CountryCodeError),
}

//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_ADMIN_ACCESS_TOKEN` - Offline Admin API access token (HIGH PRIVILEGE)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `SHOPIFY_APP_HANDLE` - App handle used in the pricing page URL (default: insta-18)
//! - `PLAN_FREE_NAMES` - Comma-separated subscription names granting the free tier
//!   (default: Forever Free)
//! - `PLAN_PREMIUM_NAMES` - Comma-separated subscription names granting the premium tier
//!   (default: Forever 1)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use country_blocker_core::PlanTier;
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_API_VERSION: &str = "2026-01";
const DEFAULT_APP_HANDLE: &str = "insta-18";
const DEFAULT_FREE_PLAN_NAMES: &str = "Forever Free";
const DEFAULT_PREMIUM_PLAN_NAMES: &str = "Forever 1";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API configuration
    pub shopify: ShopifyAdminConfig,
    /// App handle used to build the managed pricing URL
    pub app_handle: String,
    /// Subscription plan name to tier mapping
    pub plans: PlanNames,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE access token.
#[derive(Clone)]
pub struct ShopifyAdminConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Offline Admin API access token (HIGH PRIVILEGE - full store access)
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAdminConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ShopifyAdminConfig {
    /// The shop name without the `.myshopify.com` suffix.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        self.store
            .strip_suffix(".myshopify.com")
            .unwrap_or(&self.store)
    }
}

/// Exact subscription plan names mapped to tiers.
///
/// Names compare case-insensitively after trimming. No substring matching:
/// a subscription called "Forever 10" does not match "Forever 1".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanNames {
    free: Vec<String>,
    premium: Vec<String>,
}

impl Default for PlanNames {
    fn default() -> Self {
        Self::new(
            parse_name_list(DEFAULT_FREE_PLAN_NAMES),
            parse_name_list(DEFAULT_PREMIUM_PLAN_NAMES),
        )
    }
}

impl PlanNames {
    /// Build a mapping from explicit name lists.
    #[must_use]
    pub fn new(free: Vec<String>, premium: Vec<String>) -> Self {
        let normalize = |names: Vec<String>| {
            names
                .into_iter()
                .map(|name| name.trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect()
        };
        Self {
            free: normalize(free),
            premium: normalize(premium),
        }
    }

    /// The tier a single subscription name grants.
    #[must_use]
    pub fn tier_for(&self, name: &str) -> PlanTier {
        let name = name.trim().to_lowercase();
        if self.premium.contains(&name) {
            PlanTier::Premium
        } else if self.free.contains(&name) {
            PlanTier::Free
        } else {
            PlanTier::None
        }
    }

    /// The best tier among several active subscription names (premium wins).
    pub fn best_tier<'a, I>(&self, names: I) -> PlanTier
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| self.tier_for(name))
            .max_by_key(|tier| tier_rank(*tier))
            .unwrap_or_default()
    }

    fn from_env() -> Self {
        Self::new(
            parse_name_list(&get_env_or_default("PLAN_FREE_NAMES", DEFAULT_FREE_PLAN_NAMES)),
            parse_name_list(&get_env_or_default(
                "PLAN_PREMIUM_NAMES",
                DEFAULT_PREMIUM_PLAN_NAMES,
            )),
        )
    }
}

const fn tier_rank(tier: PlanTier) -> u8 {
    match tier {
        PlanTier::None => 0,
        PlanTier::Free => 1,
        PlanTier::Premium => 2,
    }
}

fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split(',').map(String::from).collect()
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;

        let shopify = ShopifyAdminConfig::from_env()?;
        let app_handle = get_env_or_default("SHOPIFY_APP_HANDLE", DEFAULT_APP_HANDLE);
        let plans = PlanNames::from_env();
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            host,
            port,
            shopify,
            app_handle,
            plans,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// URL of the app's managed pricing page in the Shopify admin.
    #[must_use]
    pub fn pricing_url(&self) -> String {
        format!(
            "https://admin.shopify.com/store/{}/charges/{}/pricing_plans",
            self.shopify.shop_name(),
            self.app_handle
        )
    }
}

impl ShopifyAdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store: parse_store_domain(&get_required_env("SHOPIFY_STORE")?)?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            access_token: get_validated_secret("SHOPIFY_ADMIN_ACCESS_TOKEN")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Normalize a shop domain such as `https://my-shop.myshopify.com/` to
/// `my-shop.myshopify.com`.
///
/// The domain ends up in API URLs and the CSP header, so anything beyond a
/// bare host is rejected.
fn parse_store_domain(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::InvalidEnvVar("SHOPIFY_STORE".to_string(), format!("{reason}: {raw:?}"))
    };

    let trimmed = raw.trim().trim_end_matches('/');
    let bare = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed)
        .to_ascii_lowercase();

    let url = url::Url::parse(&format!("https://{bare}"))
        .map_err(|e| invalid(&e.to_string()))?;
    match url.host_str() {
        Some(host) if host == bare && url.port().is_none() && url.path() == "/" => {
            Ok(host.to_string())
        }
        _ => Err(invalid("expected a bare shop domain")),
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real access tokens (shpat_...) have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by Shopify."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

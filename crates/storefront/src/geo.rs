//! Visitor geolocation.
//!
//! The default locator speaks the `country.is` protocol:
//! `GET {base}` answers for the caller, `GET {base}/{ip}` for a given
//! address, both with `{ "ip": "...", "country": "DE" }`.

use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use country_blocker_core::{CountryCode, CountryCodeError};
use futures::future::BoxFuture;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::GeolocationConfig;

/// Errors that can occur during a country lookup.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Request failed, timed out, or the body was not the expected JSON.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("Geolocation service returned HTTP {0}")]
    Status(u16),

    /// Service answered with something that is not a country code.
    #[error("Invalid country in geolocation response: {0}")]
    InvalidCountry(#[from] CountryCodeError),

    /// The configured base URL cannot take a path segment.
    #[error("Geolocation URL cannot be extended: {0}")]
    InvalidUrl(String),
}

/// Resolves a visitor to a country.
pub trait GeoLocator: Send + Sync {
    /// Look up `ip`, or the caller of the service when `None`.
    fn locate(&self, ip: Option<IpAddr>) -> BoxFuture<'_, Result<CountryCode, GeoError>>;
}

#[derive(Debug, Deserialize)]
struct CountryIsResponse {
    country: String,
}

/// [`GeoLocator`] backed by a `country.is` compatible service.
#[derive(Clone)]
pub struct CountryIsLocator {
    client: reqwest::Client,
    base: Url,
}

impl CountryIsLocator {
    /// Create a locator with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &GeolocationConfig) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base: config.url.clone(),
        })
    }

    /// The URL queried for `ip`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidUrl`] if the base URL cannot have path segments.
    pub fn lookup_url(&self, ip: Option<IpAddr>) -> Result<Url, GeoError> {
        let Some(ip) = ip else {
            return Ok(self.base.clone());
        };

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| GeoError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(&ip.to_string());
        Ok(url)
    }

    #[instrument(skip(self))]
    async fn lookup(&self, ip: Option<IpAddr>) -> Result<CountryCode, GeoError> {
        let url = self.lookup_url(ip)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Status(status.as_u16()));
        }

        let body: CountryIsResponse = response.json().await?;
        Ok(CountryCode::parse(&body.country)?)
    }
}

impl GeoLocator for CountryIsLocator {
    fn locate(&self, ip: Option<IpAddr>) -> BoxFuture<'_, Result<CountryCode, GeoError>> {
        Box::pin(self.lookup(ip))
    }
}

/// A locator that always answers the same way and counts its calls.
#[derive(Debug, Clone)]
pub struct StaticLocator {
    answer: Option<CountryCode>,
    calls: Arc<AtomicUsize>,
}

impl StaticLocator {
    /// Every lookup resolves to `code`.
    #[must_use]
    pub fn country(code: CountryCode) -> Self {
        Self {
            answer: Some(code),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every lookup fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of lookups performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeoLocator for StaticLocator {
    fn locate(&self, _ip: Option<IpAddr>) -> BoxFuture<'_, Result<CountryCode, GeoError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self.answer.clone().ok_or(GeoError::Status(503));
        Box::pin(async move { result })
    }
}

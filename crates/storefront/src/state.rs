//! Application state shared across handlers.

use std::sync::Arc;

use crate::blocklist::BlocklistSource;
use crate::config::StorefrontConfig;
use crate::geo::{CountryIsLocator, GeoError, GeoLocator};
use crate::shopify::StorefrontClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the blocklist source and the geolocation service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    blocklist: Arc<dyn BlocklistSource>,
    locator: Arc<dyn GeoLocator>,
}

impl AppState {
    /// Create application state backed by the Storefront API and the
    /// configured geolocation service.
    ///
    /// # Errors
    ///
    /// Returns an error if the geolocation HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, GeoError> {
        let blocklist = StorefrontClient::new(&config.shopify);
        let locator = CountryIsLocator::new(&config.geolocation)?;

        Ok(Self::with_collaborators(
            config,
            Arc::new(blocklist),
            Arc::new(locator),
        ))
    }

    /// Create application state with explicit collaborators.
    #[must_use]
    pub fn with_collaborators(
        config: StorefrontConfig,
        blocklist: Arc<dyn BlocklistSource>,
        locator: Arc<dyn GeoLocator>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                blocklist,
                locator,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Where the blocked-country list comes from.
    #[must_use]
    pub fn blocklist(&self) -> &dyn BlocklistSource {
        self.inner.blocklist.as_ref()
    }

    /// Visitor geolocation.
    #[must_use]
    pub fn locator(&self) -> &dyn GeoLocator {
        self.inner.locator.as_ref()
    }
}

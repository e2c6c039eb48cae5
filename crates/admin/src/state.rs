//! Application state shared across handlers.

use std::sync::Arc;

use country_blocker_core::Catalog;

use crate::config::AdminConfig;
use crate::gateway::{
    CachedPlanResolver, MetafieldStore, PLAN_CACHE_TTL, PlanResolver, SubscriptionPlanResolver,
};
use crate::services::{SelectionService, ShortcutService};
use crate::shopify::AdminClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the collaborators behind the persistence and plan
/// lookups.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn MetafieldStore>,
    plans: Arc<dyn PlanResolver>,
}

impl AppState {
    /// Create application state backed by the Shopify Admin API.
    ///
    /// Plan lookups are cached for [`PLAN_CACHE_TTL`].
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let client = AdminClient::new(&config.shopify);
        let plans = CachedPlanResolver::new(
            SubscriptionPlanResolver::new(client.clone(), config.plans.clone()),
            PLAN_CACHE_TTL,
        );

        Self::with_collaborators(config, Arc::new(client), Arc::new(plans))
    }

    /// Create application state with explicit collaborators.
    #[must_use]
    pub fn with_collaborators(
        config: AdminConfig,
        store: Arc<dyn MetafieldStore>,
        plans: Arc<dyn PlanResolver>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                plans,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The country catalog.
    #[must_use]
    pub fn catalog(&self) -> &'static Catalog {
        Catalog::standard()
    }

    /// Selection operations over this state's collaborators.
    #[must_use]
    pub fn selection(&self) -> SelectionService {
        SelectionService::new(
            Arc::clone(&self.inner.store),
            Arc::clone(&self.inner.plans),
            self.catalog(),
        )
    }

    /// Drop the remembered plan after a billing change.
    pub async fn invalidate_plan(&self) {
        self.inner.plans.invalidate().await;
    }

    /// Keyboard shortcut setting operations.
    #[must_use]
    pub fn shortcuts(&self) -> ShortcutService {
        ShortcutService::new(Arc::clone(&self.inner.store), Arc::clone(&self.inner.plans))
    }
}

//! Collaborators the selection service depends on.
//!
//! - [`MetafieldStore`] - reads and writes shop metafields (the persistence gateway)
//! - [`PlanResolver`] - reports the active subscription tier
//!
//! Both are object-safe so [`AppState`](crate::state::AppState) can hold either
//! the Shopify-backed implementations or the in-memory ones from [`memory`].

use std::time::Duration;

use country_blocker_core::{MetafieldKey, PlanState};
use futures::future::BoxFuture;
use moka::future::Cache;

use crate::config::PlanNames;
use crate::shopify::{AdminClient, AdminShopifyError};

/// How long a resolved plan is reused before asking Shopify again.
pub const PLAN_CACHE_TTL: Duration = Duration::from_secs(60);

/// Persistence gateway over shop metafields.
pub trait MetafieldStore: Send + Sync {
    /// Read a metafield's raw value, `None` when absent.
    fn read(&self, key: MetafieldKey) -> BoxFuture<'_, Result<Option<String>, AdminShopifyError>>;

    /// Overwrite a metafield with `value`, typed per `key.kind`.
    fn write(
        &self,
        key: MetafieldKey,
        value: String,
    ) -> BoxFuture<'_, Result<(), AdminShopifyError>>;
}

/// Reports which subscription tier is active.
pub trait PlanResolver: Send + Sync {
    fn resolve(&self) -> BoxFuture<'_, Result<PlanState, AdminShopifyError>>;

    /// Forget any remembered plan so the next [`resolve`](Self::resolve)
    /// asks the source again. No-op for resolvers that keep nothing.
    fn invalidate(&self) -> BoxFuture<'_, ()> {
        Box::pin(futures::future::ready(()))
    }
}

impl MetafieldStore for AdminClient {
    fn read(&self, key: MetafieldKey) -> BoxFuture<'_, Result<Option<String>, AdminShopifyError>> {
        Box::pin(self.get_shop_metafield(key))
    }

    fn write(
        &self,
        key: MetafieldKey,
        value: String,
    ) -> BoxFuture<'_, Result<(), AdminShopifyError>> {
        Box::pin(async move { self.set_shop_metafield(key, &value).await })
    }
}

// =============================================================================
// Subscription-backed plan resolution
// =============================================================================

/// Resolves the plan from the app installation's active subscriptions.
///
/// Only `ACTIVE` subscriptions count. Names map to tiers through the
/// configured [`PlanNames`]; when several match, premium wins.
pub struct SubscriptionPlanResolver {
    client: AdminClient,
    names: PlanNames,
}

impl SubscriptionPlanResolver {
    #[must_use]
    pub const fn new(client: AdminClient, names: PlanNames) -> Self {
        Self { client, names }
    }
}

impl PlanResolver for SubscriptionPlanResolver {
    fn resolve(&self) -> BoxFuture<'_, Result<PlanState, AdminShopifyError>> {
        Box::pin(async move {
            let subscriptions = self.client.get_active_subscriptions().await?;
            let tier = self.names.best_tier(
                subscriptions
                    .iter()
                    .filter(|subscription| subscription.is_active())
                    .map(|subscription| subscription.name.as_str()),
            );

            tracing::debug!(
                subscriptions = subscriptions.len(),
                tier = %tier,
                "Resolved plan from subscriptions"
            );
            Ok(PlanState::from_tier(tier))
        })
    }
}

/// Caches another resolver's answer in memory.
///
/// Failures are not cached.
pub struct CachedPlanResolver<R> {
    inner: R,
    cache: Cache<&'static str, PlanState>,
}

const PLAN_CACHE_KEY: &str = "plan";

impl<R: PlanResolver> CachedPlanResolver<R> {
    #[must_use]
    pub fn new(inner: R, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { inner, cache }
    }
}

impl<R: PlanResolver> PlanResolver for CachedPlanResolver<R> {
    fn resolve(&self) -> BoxFuture<'_, Result<PlanState, AdminShopifyError>> {
        Box::pin(async move {
            if let Some(plan) = self.cache.get(PLAN_CACHE_KEY).await {
                tracing::debug!("Plan cache hit");
                return Ok(plan);
            }

            let plan = self.inner.resolve().await?;
            self.cache.insert(PLAN_CACHE_KEY, plan).await;
            Ok(plan)
        })
    }

    fn invalidate(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.cache.invalidate(PLAN_CACHE_KEY).await;
            self.inner.invalidate().await;
        })
    }
}

// =============================================================================
// In-memory implementations
// =============================================================================

/// In-memory collaborators for tests and local development.
pub mod memory {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};

    use country_blocker_core::{MetafieldKey, PlanState, PlanTier};
    use futures::future::{self, BoxFuture};

    use super::{MetafieldStore, PlanResolver};
    use crate::shopify::AdminShopifyError;

    /// A metafield store backed by a `HashMap`.
    ///
    /// Reads and writes can be made to fail to exercise upstream error paths.
    #[derive(Debug, Default)]
    pub struct InMemoryMetafieldStore {
        values: Mutex<HashMap<MetafieldKey, String>>,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
    }

    impl InMemoryMetafieldStore {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A store with one metafield already set.
        #[must_use]
        pub fn with_value(key: MetafieldKey, value: impl Into<String>) -> Self {
            let store = Self::new();
            store.insert(key, value);
            store
        }

        pub fn insert(&self, key: MetafieldKey, value: impl Into<String>) {
            self.values
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key, value.into());
        }

        #[must_use]
        pub fn get(&self, key: MetafieldKey) -> Option<String> {
            self.values
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&key)
                .cloned()
        }

        /// Number of successful writes so far.
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    impl MetafieldStore for InMemoryMetafieldStore {
        fn read(
            &self,
            key: MetafieldKey,
        ) -> BoxFuture<'_, Result<Option<String>, AdminShopifyError>> {
            let result = if self.fail_reads.load(Ordering::SeqCst) {
                Err(AdminShopifyError::Status {
                    status: 503,
                    body: "metafield read unavailable".to_string(),
                })
            } else {
                Ok(self.get(key))
            };
            Box::pin(future::ready(result))
        }

        fn write(
            &self,
            key: MetafieldKey,
            value: String,
        ) -> BoxFuture<'_, Result<(), AdminShopifyError>> {
            let result = if self.fail_writes.load(Ordering::SeqCst) {
                Err(AdminShopifyError::UserError(
                    "value: metafield write rejected".to_string(),
                ))
            } else {
                self.insert(key, value);
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            };
            Box::pin(future::ready(result))
        }
    }

    /// A plan resolver that always reports the same tier.
    #[derive(Debug)]
    pub struct StaticPlanResolver {
        plan: Mutex<PlanState>,
        invalidations: AtomicUsize,
    }

    impl StaticPlanResolver {
        #[must_use]
        pub fn new(tier: PlanTier) -> Self {
            Self {
                plan: Mutex::new(PlanState::from_tier(tier)),
                invalidations: AtomicUsize::new(0),
            }
        }

        /// How often the plan was invalidated.
        #[must_use]
        pub fn invalidation_count(&self) -> usize {
            self.invalidations.load(Ordering::SeqCst)
        }

        /// Switch the reported tier.
        pub fn set_tier(&self, tier: PlanTier) {
            *self.plan.lock().unwrap_or_else(PoisonError::into_inner) = PlanState::from_tier(tier);
        }
    }

    impl PlanResolver for StaticPlanResolver {
        fn resolve(&self) -> BoxFuture<'_, Result<PlanState, AdminShopifyError>> {
            let plan = *self.plan.lock().unwrap_or_else(PoisonError::into_inner);
            Box::pin(future::ready(Ok(plan)))
        }

        fn invalidate(&self) -> BoxFuture<'_, ()> {
            self.invalidations.fetch_add(1, Ordering::SeqCst);
            Box::pin(future::ready(()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use country_blocker_core::PlanTier;

    use super::memory::{InMemoryMetafieldStore, StaticPlanResolver};
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_round_trip() {
        let store = InMemoryMetafieldStore::new();
        let key = MetafieldKey::SELECTED_COUNTRIES;

        assert_eq!(store.read(key).await.unwrap(), None);
        store.write(key, r#"["DE"]"#.to_string()).await.unwrap();
        assert_eq!(store.read(key).await.unwrap().as_deref(), Some(r#"["DE"]"#));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_store_failures() {
        let store = InMemoryMetafieldStore::new();
        store.fail_reads(true);
        store.fail_writes(true);

        assert!(store.read(MetafieldKey::SELECTED_COUNTRIES).await.is_err());
        assert!(
            store
                .write(MetafieldKey::SELECTED_COUNTRIES, "[]".to_string())
                .await
                .is_err()
        );
        assert_eq!(store.write_count(), 0);
    }

    /// Counts how often the wrapped resolver is consulted.
    struct CountingResolver {
        calls: Arc<std::sync::atomic::AtomicUsize>,
        inner: StaticPlanResolver,
    }

    impl PlanResolver for CountingResolver {
        fn resolve(&self) -> BoxFuture<'_, Result<PlanState, AdminShopifyError>> {
            self.calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.resolve()
        }

        fn invalidate(&self) -> BoxFuture<'_, ()> {
            self.inner.invalidate()
        }
    }

    #[tokio::test]
    async fn test_cached_resolver_reuses_plan() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let resolver = CachedPlanResolver::new(
            CountingResolver {
                calls: Arc::clone(&calls),
                inner: StaticPlanResolver::new(PlanTier::Free),
            },
            PLAN_CACHE_TTL,
        );

        assert_eq!(resolver.resolve().await.unwrap().tier, PlanTier::Free);
        assert_eq!(resolver.resolve().await.unwrap().tier, PlanTier::Free);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        resolver.invalidate().await;
        resolver.resolve().await.unwrap();
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_picks_up_plan_change() {
        let resolver =
            CachedPlanResolver::new(StaticPlanResolver::new(PlanTier::Free), PLAN_CACHE_TTL);
        assert_eq!(resolver.resolve().await.unwrap().tier, PlanTier::Free);

        resolver.inner.set_tier(PlanTier::Premium);
        assert_eq!(resolver.resolve().await.unwrap().tier, PlanTier::Free);

        let dynamic: &dyn PlanResolver = &resolver;
        dynamic.invalidate().await;
        assert_eq!(resolver.resolve().await.unwrap().tier, PlanTier::Premium);
        assert_eq!(resolver.inner.invalidation_count(), 1);
    }
}

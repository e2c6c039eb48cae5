//! Blocked-country selection service.
//!
//! Every operation follows the same shape: resolve the plan, load the
//! persisted selection, apply one pure mutation from the core crate, and
//! write the result back only if it changed. A failed write is reported as a
//! warning; the returned selection is still the mutated one.

use std::sync::Arc;

use country_blocker_core::{
    Catalog, CountryCode, MetafieldKey, Mutation, PlanState, Selection, SelectionPolicy,
    SelectorValue,
};
use tracing::instrument;

use crate::gateway::{MetafieldStore, PlanResolver};
use crate::shopify::AdminShopifyError;

/// The persisted selection together with the active plan.
#[derive(Debug, Clone)]
pub struct SelectionSnapshot {
    pub selection: Selection,
    pub plan: PlanState,
}

/// Outcome of one mutation request.
#[derive(Debug, Clone)]
pub struct MutationReport {
    pub mutation: Mutation,
    pub plan: PlanState,
    /// Set when the mutation changed the selection but saving it failed.
    pub warning: Option<String>,
}

/// Selection operations over a metafield store and a plan resolver.
#[derive(Clone)]
pub struct SelectionService {
    store: Arc<dyn MetafieldStore>,
    plans: Arc<dyn PlanResolver>,
    catalog: &'static Catalog,
}

impl SelectionService {
    #[must_use]
    pub fn new(
        store: Arc<dyn MetafieldStore>,
        plans: Arc<dyn PlanResolver>,
        catalog: &'static Catalog,
    ) -> Self {
        Self {
            store,
            plans,
            catalog,
        }
    }

    /// The active plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be resolved.
    pub async fn plan(&self) -> Result<PlanState, AdminShopifyError> {
        self.plans.resolve().await
    }

    /// Load the persisted selection.
    ///
    /// A missing metafield is an empty selection. So is a malformed one,
    /// which is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns an error only if the metafield cannot be read.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Selection, AdminShopifyError> {
        let raw = self.store.read(MetafieldKey::SELECTED_COUNTRIES).await?;
        Ok(raw.map_or_else(Selection::new, |raw| parse_or_empty(&raw)))
    }

    /// Load the selection and the plan.
    ///
    /// # Errors
    ///
    /// Returns an error if either lookup fails.
    pub async fn snapshot(&self) -> Result<SelectionSnapshot, AdminShopifyError> {
        let (selection, plan) = futures::try_join!(self.load(), self.plan())?;
        Ok(SelectionSnapshot { selection, plan })
    }

    /// Apply one mutation under the active plan's policy and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan or the current selection cannot be
    /// loaded. Write failures become [`MutationReport::warning`].
    pub async fn apply<F>(&self, operation: &str, mutate: F) -> Result<MutationReport, AdminShopifyError>
    where
        F: FnOnce(Selection, &SelectionPolicy) -> Mutation + Send,
    {
        let SelectionSnapshot { selection, plan } = self.snapshot().await?;
        let policy = plan.selection_policy();
        let mutation = mutate(selection, &policy);

        let warning = if mutation.is_changed() {
            self.persist(mutation.selection()).await.err().map(|error| {
                tracing::warn!(
                    %error,
                    operation,
                    "Selection changed but could not be saved"
                );
                format!("Blocked countries were updated but could not be saved: {error}")
            })
        } else {
            None
        };

        tracing::info!(
            operation,
            tier = %plan.tier,
            changed = mutation.is_changed(),
            reason = ?mutation.no_change(),
            count = mutation.selection().len(),
            rejected = mutation.rejected().len(),
            "Selection mutation applied"
        );

        Ok(MutationReport {
            mutation,
            plan,
            warning,
        })
    }

    /// Add the countries a selector value stands for.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    #[instrument(skip(self))]
    pub async fn pick(&self, value: &SelectorValue) -> Result<MutationReport, AdminShopifyError> {
        let catalog = self.catalog;
        self.apply("pick", |selection, policy| {
            selection.pick(value, catalog, policy)
        })
        .await
    }

    /// Add countries in order.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    #[instrument(skip(self, codes), fields(requested = codes.len()))]
    pub async fn add(&self, codes: Vec<CountryCode>) -> Result<MutationReport, AdminShopifyError> {
        self.apply("add", |selection, policy| selection.add_all(codes, policy))
            .await
    }

    /// Remove one country.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    #[instrument(skip(self), fields(code = %code))]
    pub async fn remove(&self, code: &CountryCode) -> Result<MutationReport, AdminShopifyError> {
        self.apply("remove", |selection, policy| {
            selection.remove_country(code, policy)
        })
        .await
    }

    /// Remove every country.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<MutationReport, AdminShopifyError> {
        self.apply("clear", |selection, policy| selection.clear_all(policy))
            .await
    }

    /// Replace the whole list.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    #[instrument(skip(self, codes), fields(requested = codes.len()))]
    pub async fn replace(
        &self,
        codes: Vec<CountryCode>,
    ) -> Result<MutationReport, AdminShopifyError> {
        self.apply("replace", |selection, policy| {
            selection.replace_with(codes, policy)
        })
        .await
    }

    async fn persist(&self, selection: &Selection) -> Result<(), AdminShopifyError> {
        self.store
            .write(
                MetafieldKey::SELECTED_COUNTRIES,
                selection.to_metafield_value(),
            )
            .await
    }
}

fn parse_or_empty(raw: &str) -> Selection {
    match Selection::from_metafield_value_lossy(raw) {
        Ok((selection, skipped)) => {
            if !skipped.is_empty() {
                tracing::warn!(?skipped, "Skipped invalid entries in selection metafield");
            }
            selection
        }
        Err(error) => {
            tracing::warn!(%error, "Malformed selection metafield, treating as empty");
            Selection::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use country_blocker_core::{Continent, NoChange, PlanTier};

    use super::*;
    use crate::gateway::memory::{InMemoryMetafieldStore, StaticPlanResolver};

    fn service(
        tier: PlanTier,
        stored: Option<&str>,
    ) -> (SelectionService, Arc<InMemoryMetafieldStore>) {
        let store = Arc::new(InMemoryMetafieldStore::new());
        if let Some(value) = stored {
            store.insert(MetafieldKey::SELECTED_COUNTRIES, value);
        }
        let service = SelectionService::new(
            Arc::clone(&store) as Arc<dyn MetafieldStore>,
            Arc::new(StaticPlanResolver::new(tier)),
            Catalog::standard(),
        );
        (service, store)
    }

    fn codes(list: &[&str]) -> Vec<CountryCode> {
        list.iter().map(|c| CountryCode::parse(c).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let (service, _) = service(PlanTier::Free, None);
        assert!(service.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_is_empty() {
        let (service, _) = service(PlanTier::Free, Some("{not json"));
        assert!(service.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_entry_does_not_erase_stored_codes() {
        let (service, store) = service(PlanTier::Premium, Some(r#"["US","CA","Kosovo"]"#));

        let loaded = service.load().await.unwrap();
        assert_eq!(loaded.codes(), codes(&["US", "CA"]).as_slice());

        let report = service.add(codes(&["FR"])).await.unwrap();
        assert!(report.mutation.is_changed());
        assert_eq!(
            store.get(MetafieldKey::SELECTED_COUNTRIES).as_deref(),
            Some(r#"["US","CA","FR"]"#)
        );
    }

    #[tokio::test]
    async fn test_load_read_failure_is_error() {
        let (service, store) = service(PlanTier::Free, None);
        store.fail_reads(true);
        assert!(service.load().await.is_err());
    }

    #[tokio::test]
    async fn test_add_persists_truncated_selection() {
        let (service, store) = service(PlanTier::Free, Some(r#"["US","CA"]"#));

        let report = service
            .add(codes(&["FR", "DE", "IT", "ES", "GB"]))
            .await
            .unwrap();

        assert!(report.mutation.is_changed());
        assert!(report.warning.is_none());
        assert_eq!(report.mutation.rejected(), codes(&["ES", "GB"]).as_slice());
        assert_eq!(
            store.get(MetafieldKey::SELECTED_COUNTRIES).as_deref(),
            Some(r#"["US","CA","FR","DE","IT"]"#)
        );
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_unchanged_mutation_does_not_write() {
        let (service, store) = service(PlanTier::Free, Some(r#"["US"]"#));

        let report = service.add(codes(&["US"])).await.unwrap();

        assert_eq!(report.mutation.no_change(), Some(NoChange::AlreadyPresent));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_no_plan_blocks_mutation() {
        let (service, store) = service(PlanTier::None, Some(r#"["US"]"#));

        let report = service.clear().await.unwrap();

        assert_eq!(report.mutation.no_change(), Some(NoChange::Disabled));
        assert_eq!(report.mutation.selection().len(), 1);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_becomes_warning() {
        let (service, store) = service(PlanTier::Premium, None);
        store.fail_writes(true);

        let report = service
            .pick(&SelectorValue::Continent(Continent::Oceania))
            .await
            .unwrap();

        assert!(report.mutation.is_changed());
        assert_eq!(report.mutation.selection().len(), 14);
        assert!(report.warning.unwrap().contains("could not be saved"));
        assert!(store.get(MetafieldKey::SELECTED_COUNTRIES).is_none());
    }

    #[tokio::test]
    async fn test_remove_and_replace() {
        let (service, store) = service(PlanTier::Premium, Some(r#"["US","CA"]"#));

        service.remove(&CountryCode::parse("US").unwrap()).await.unwrap();
        assert_eq!(
            store.get(MetafieldKey::SELECTED_COUNTRIES).as_deref(),
            Some(r#"["CA"]"#)
        );

        service.replace(codes(&["DE", "FR"])).await.unwrap();
        assert_eq!(
            store.get(MetafieldKey::SELECTED_COUNTRIES).as_deref(),
            Some(r#"["DE","FR"]"#)
        );
    }
}

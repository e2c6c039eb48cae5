//! Keyboard shortcut suppression setting (premium only).

use std::sync::Arc;

use country_blocker_core::{MetafieldKey, PlanState, metafield};
use thiserror::Error;
use tracing::instrument;

use crate::gateway::{MetafieldStore, PlanResolver};
use crate::shopify::AdminShopifyError;

/// Errors that can occur when changing the shortcut setting.
#[derive(Debug, Error)]
pub enum ShortcutError {
    /// The active plan does not include the feature.
    #[error("This feature is only available on the Premium plan")]
    PremiumRequired,

    /// Reading the plan or writing the metafield failed.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),
}

/// Current shortcut setting and the plan it is evaluated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutStatus {
    /// Whether storefront keyboard shortcuts are suppressed.
    pub is_enabled: bool,
    pub plan: PlanState,
}

#[derive(Clone)]
pub struct ShortcutService {
    store: Arc<dyn MetafieldStore>,
    plans: Arc<dyn PlanResolver>,
}

impl ShortcutService {
    #[must_use]
    pub fn new(store: Arc<dyn MetafieldStore>, plans: Arc<dyn PlanResolver>) -> Self {
        Self { store, plans }
    }

    /// Read the setting. Missing or unparsable values read as disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan or the metafield cannot be read.
    pub async fn status(&self) -> Result<ShortcutStatus, AdminShopifyError> {
        let (raw, plan) = futures::try_join!(
            self.store.read(MetafieldKey::SHORTCUTS_DISABLED),
            self.plans.resolve()
        )?;

        Ok(ShortcutStatus {
            is_enabled: metafield::parse_shortcut_flag(raw.as_deref()),
            plan,
        })
    }

    /// Change the setting.
    ///
    /// # Errors
    ///
    /// Returns [`ShortcutError::PremiumRequired`] unless the premium plan is
    /// active, or an upstream error if the write fails.
    #[instrument(skip(self))]
    pub async fn set(&self, enabled: bool) -> Result<ShortcutStatus, ShortcutError> {
        let plan = self.plans.resolve().await?;
        if !plan.can_toggle_shortcuts() {
            tracing::info!(tier = %plan.tier, "Shortcut toggle refused without premium plan");
            return Err(ShortcutError::PremiumRequired);
        }

        self.store
            .write(
                MetafieldKey::SHORTCUTS_DISABLED,
                metafield::shortcut_flag_value(enabled).to_string(),
            )
            .await?;

        tracing::info!(enabled, "Keyboard shortcut setting updated");
        Ok(ShortcutStatus {
            is_enabled: enabled,
            plan,
        })
    }
}

//! Where the storefront gets the blocked-country list from.

use std::sync::{Arc, Mutex, PoisonError};

use country_blocker_core::{MetafieldKey, Selection};
use futures::future::BoxFuture;

use crate::shopify::{ShopifyError, StorefrontClient};

/// Source of the current blocked-country list.
pub trait BlocklistSource: Send + Sync {
    /// Load the list. Missing or malformed metafields read as empty.
    fn load(&self) -> BoxFuture<'_, Result<Selection, ShopifyError>>;
}

impl BlocklistSource for StorefrontClient {
    fn load(&self) -> BoxFuture<'_, Result<Selection, ShopifyError>> {
        Box::pin(async move {
            let raw = self
                .get_shop_metafield(MetafieldKey::SELECTED_COUNTRIES)
                .await?;
            Ok(raw.as_deref().map_or_else(Selection::new, parse_or_empty))
        })
    }
}

fn parse_or_empty(raw: &str) -> Selection {
    match Selection::from_metafield_value_lossy(raw) {
        Ok((selection, skipped)) => {
            if !skipped.is_empty() {
                tracing::warn!(?skipped, "Skipped invalid entries in blocked-country metafield");
            }
            selection
        }
        Err(error) => {
            tracing::warn!(%error, "Malformed blocked-country metafield, nothing is blocked");
            Selection::new()
        }
    }
}

/// A fixed list, for tests and local runs without Shopify.
#[derive(Debug, Clone, Default)]
pub struct StaticBlocklist {
    selection: Arc<Mutex<Selection>>,
}

impl StaticBlocklist {
    #[must_use]
    pub fn new(selection: Selection) -> Self {
        Self {
            selection: Arc::new(Mutex::new(selection)),
        }
    }

    /// Replace the list.
    pub fn set(&self, selection: Selection) {
        *self
            .selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = selection;
    }
}

impl BlocklistSource for StaticBlocklist {
    fn load(&self) -> BoxFuture<'_, Result<Selection, ShopifyError>> {
        let selection = self
            .selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Box::pin(async move { Ok(selection) })
    }
}

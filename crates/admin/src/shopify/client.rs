//! Shopify Admin API GraphQL client with an offline access token.

use std::sync::Arc;

use country_blocker_core::MetafieldKey;
use graphql_client::{GraphQLQuery, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::config::ShopifyAdminConfig;

use super::queries::{
    GetActiveSubscriptions, GetShopId, GetShopMetafield, MetafieldsSet, get_active_subscriptions,
    get_shop_id, get_shop_metafield, metafields_set,
};
use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation};

/// Subscription status that counts toward the plan tier.
const ACTIVE_STATUS: &str = "ACTIVE";

/// An app subscription reported by the Admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSubscription {
    pub id: String,
    pub name: String,
    pub status: String,
}

impl AppSubscription {
    /// Whether the subscription is currently billable.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case(ACTIVE_STATUS)
    }
}

/// Shopify Admin API client.
///
/// # Security
///
/// Holds an offline access token with HIGH PRIVILEGE access to the store.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    store: String,
    access_token: SecretString,
    /// Shop GID, fetched once and reused as the metafield owner.
    shop_id: OnceCell<String>,
}

impl AdminClient {
    /// Create a new Admin API client.
    #[must_use]
    pub fn new(config: &ShopifyAdminConfig) -> Self {
        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            config.store, config.api_version
        );

        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                endpoint,
                store: config.store.clone(),
                access_token: config.access_token.clone(),
                shop_id: OnceCell::new(),
            }),
        }
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(
                "X-Shopify-Access-Token",
                self.inner.access_token.expose_secret(),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(AdminShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdminShopifyError::Unauthorized(
                "Invalid or revoked access token".to_string(),
            ));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify Admin API returned non-success status"
            );
            return Err(AdminShopifyError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        let response: Response<Q::ResponseData> = serde_json::from_str(&response_text)?;

        // Check for GraphQL errors
        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");

            return Err(AdminShopifyError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response
            .data
            .ok_or_else(|| AdminShopifyError::GraphQL(vec![GraphQLError::message("No data in response")]))
    }

    // =========================================================================
    // Shop metafields
    // =========================================================================

    /// Read a shop metafield's raw value, `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(metafield = %key))]
    pub async fn get_shop_metafield(
        &self,
        key: MetafieldKey,
    ) -> Result<Option<String>, AdminShopifyError> {
        let variables = get_shop_metafield::Variables {
            namespace: key.namespace.to_string(),
            key: key.key.to_string(),
        };

        let response = self.execute::<GetShopMetafield>(variables).await?;

        Ok(response.shop.metafield.map(|metafield| metafield.value))
    }

    /// The shop's global ID (cached after the first call).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_shop_id(&self) -> Result<String, AdminShopifyError> {
        self.inner
            .shop_id
            .get_or_try_init(|| async {
                let response = self.execute::<GetShopId>(get_shop_id::Variables).await?;
                Ok::<_, AdminShopifyError>(response.shop.id)
            })
            .await
            .cloned()
    }

    /// Create or overwrite a shop metafield.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify reports user
    /// errors for the mutation.
    #[instrument(skip(self, value), fields(metafield = %key))]
    pub async fn set_shop_metafield(
        &self,
        key: MetafieldKey,
        value: &str,
    ) -> Result<(), AdminShopifyError> {
        use metafields_set::{MetafieldsSetInput, Variables};

        let owner_id = self.get_shop_id().await?;

        let variables = Variables {
            metafields: vec![MetafieldsSetInput {
                owner_id,
                namespace: key.namespace.to_string(),
                key: key.key.to_string(),
                type_: key.kind.to_string(),
                value: value.to_string(),
            }],
        };

        let response = self.execute::<MetafieldsSet>(variables).await?;

        if let Some(payload) = response.metafields_set
            && !payload.user_errors.is_empty()
        {
            let error_messages: Vec<String> = payload
                .user_errors
                .iter()
                .map(|e| {
                    let field = e.field.as_ref().map_or_else(String::new, |f| f.join("."));
                    format!("{}: {}", field, e.message)
                })
                .collect();
            return Err(AdminShopifyError::UserError(error_messages.join("; ")));
        }

        tracing::info!("Metafield saved");
        Ok(())
    }

    // =========================================================================
    // Billing
    // =========================================================================

    /// List the app installation's subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_active_subscriptions(
        &self,
    ) -> Result<Vec<AppSubscription>, AdminShopifyError> {
        let response = self
            .execute::<GetActiveSubscriptions>(get_active_subscriptions::Variables)
            .await?;

        Ok(response
            .current_app_installation
            .active_subscriptions
            .into_iter()
            .map(|subscription| AppSubscription {
                id: subscription.id,
                name: subscription.name,
                status: subscription.status,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(status: &str) -> AppSubscription {
        AppSubscription {
            id: "gid://shopify/AppSubscription/1".to_string(),
            name: "Forever 1".to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_only_active_subscriptions_count() {
        assert!(subscription("ACTIVE").is_active());
        assert!(!subscription("PENDING").is_active());
        assert!(!subscription("CANCELLED").is_active());
        assert!(!subscription("FROZEN").is_active());
    }

    #[test]
    fn test_endpoint_uses_store_and_version() {
        let client = AdminClient::new(&ShopifyAdminConfig {
            store: "blocker-test.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            access_token: SecretString::from("shpat_test"),
        });

        assert_eq!(client.store(), "blocker-test.myshopify.com");
        assert_eq!(
            client.inner.endpoint,
            "https://blocker-test.myshopify.com/admin/api/2026-01/graphql.json"
        );
    }
}

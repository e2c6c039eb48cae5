//! GraphQL operations for the Shopify Admin API.
//!
//! Each operation implements [`GraphQLQuery`] directly: the document is a
//! constant and the variables/response types are declared next to it, in the
//! same `snake_case` module layout `#[derive(GraphQLQuery)]` would generate.

use graphql_client::{GraphQLQuery, QueryBody};

// =============================================================================
// Shop metafields
// =============================================================================

/// Read one shop metafield by namespace and key.
pub struct GetShopMetafield;

pub mod get_shop_metafield {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetShopMetafield";
    pub const QUERY: &str = r"query GetShopMetafield($namespace: String!, $key: String!) {
  shop {
    metafield(namespace: $namespace, key: $key) {
      value
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub namespace: String,
        pub key: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub shop: Shop,
    }

    #[derive(Debug, Deserialize)]
    pub struct Shop {
        pub metafield: Option<Metafield>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Metafield {
        pub value: String,
    }
}

impl GraphQLQuery for GetShopMetafield {
    type Variables = get_shop_metafield::Variables;
    type ResponseData = get_shop_metafield::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_shop_metafield::QUERY,
            operation_name: get_shop_metafield::OPERATION_NAME,
        }
    }
}

/// The shop's global ID, the owner of shop metafields.
pub struct GetShopId;

pub mod get_shop_id {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetShopId";
    pub const QUERY: &str = r"query GetShopId {
  shop {
    id
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables;

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub shop: Shop,
    }

    #[derive(Debug, Deserialize)]
    pub struct Shop {
        pub id: String,
    }
}

impl GraphQLQuery for GetShopId {
    type Variables = get_shop_id::Variables;
    type ResponseData = get_shop_id::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_shop_id::QUERY,
            operation_name: get_shop_id::OPERATION_NAME,
        }
    }
}

/// Create or update metafields.
pub struct MetafieldsSet;

pub mod metafields_set {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "MetafieldsSet";
    pub const QUERY: &str = r"mutation MetafieldsSet($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields {
      id
      namespace
      key
    }
    userErrors {
      field
      message
      code
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub metafields: Vec<MetafieldsSetInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetafieldsSetInput {
        pub owner_id: String,
        pub namespace: String,
        pub key: String,
        #[serde(rename = "type")]
        pub type_: String,
        pub value: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafields_set: Option<MetafieldsSetPayload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetafieldsSetPayload {
        #[serde(default)]
        pub metafields: Option<Vec<SetMetafield>>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Deserialize)]
    pub struct SetMetafield {
        pub id: String,
        pub namespace: String,
        pub key: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct UserError {
        pub field: Option<Vec<String>>,
        pub message: String,
        pub code: Option<String>,
    }
}

impl GraphQLQuery for MetafieldsSet {
    type Variables = metafields_set::Variables;
    type ResponseData = metafields_set::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: metafields_set::QUERY,
            operation_name: metafields_set::OPERATION_NAME,
        }
    }
}

// =============================================================================
// Billing
// =============================================================================

/// The app installation's active subscriptions.
pub struct GetActiveSubscriptions;

pub mod get_active_subscriptions {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetActiveSubscriptions";
    pub const QUERY: &str = r"query GetActiveSubscriptions {
  currentAppInstallation {
    activeSubscriptions {
      id
      name
      status
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub current_app_installation: CurrentAppInstallation,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CurrentAppInstallation {
        pub active_subscriptions: Vec<ActiveSubscription>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ActiveSubscription {
        pub id: String,
        pub name: String,
        pub status: String,
    }
}

impl GraphQLQuery for GetActiveSubscriptions {
    type Variables = get_active_subscriptions::Variables;
    type ResponseData = get_active_subscriptions::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_active_subscriptions::QUERY,
            operation_name: get_active_subscriptions::OPERATION_NAME,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_metafield_query_body() {
        let body = GetShopMetafield::build_query(get_shop_metafield::Variables {
            namespace: "countryselector".to_string(),
            key: "selected-country".to_string(),
        });
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["operationName"], "GetShopMetafield");
        assert_eq!(json["variables"]["namespace"], "countryselector");
        assert!(json["query"].as_str().unwrap().contains("metafield(namespace: $namespace"));
    }

    #[test]
    fn test_metafields_set_input_uses_shopify_field_names() {
        let body = MetafieldsSet::build_query(metafields_set::Variables {
            metafields: vec![metafields_set::MetafieldsSetInput {
                owner_id: "gid://shopify/Shop/1".to_string(),
                namespace: "countryselector".to_string(),
                key: "selected-country".to_string(),
                type_: "json".to_string(),
                value: "[]".to_string(),
            }],
        });
        let json = serde_json::to_value(&body).unwrap();
        let input = &json["variables"]["metafields"][0];

        assert_eq!(input["ownerId"], "gid://shopify/Shop/1");
        assert_eq!(input["type"], "json");
    }

    #[test]
    fn test_subscriptions_response_parses() {
        let raw = r#"{
            "currentAppInstallation": {
                "activeSubscriptions": [
                    {"id": "gid://shopify/AppSubscription/1", "name": "Forever 1", "status": "ACTIVE"}
                ]
            }
        }"#;
        let data: get_active_subscriptions::ResponseData = serde_json::from_str(raw).unwrap();
        let subscriptions = data.current_app_installation.active_subscriptions;
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].name, "Forever 1");
    }

    #[test]
    fn test_missing_metafield_parses_as_none() {
        let data: get_shop_metafield::ResponseData =
            serde_json::from_str(r#"{"shop": {"metafield": null}}"#).unwrap();
        assert!(data.shop.metafield.is_none());
    }
}

//! GraphQL operations for the Shopify Storefront API.

use graphql_client::{GraphQLQuery, QueryBody};

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

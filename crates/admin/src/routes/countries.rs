//! Country catalog for the selector UI.

use axum::{Json, Router, extract::State, routing::get};
use country_blocker_core::{Catalog, Continent, QuickSelectOption};
use serde::Serialize;

use crate::state::AppState;

/// Build the countries router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/countries", get(list_countries))
}

/// Selector contents: special options first, then one group per continent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountriesResponse {
    pub quick_select: Vec<QuickSelectOption>,
    pub groups: Vec<CountryGroup>,
    pub total: usize,
}

/// One continent's countries in catalog order.
#[derive(Debug, Serialize)]
pub struct CountryGroup {
    pub continent: Continent,
    pub label: &'static str,
    pub countries: Vec<CountryOption>,
}

#[derive(Debug, Serialize)]
pub struct CountryOption {
    pub code: &'static str,
    pub name: &'static str,
}

impl CountriesResponse {
    fn from_catalog(catalog: &Catalog) -> Self {
        let groups = Continent::ALL
            .into_iter()
            .map(|continent| CountryGroup {
                continent,
                label: continent.display_name(),
                countries: catalog
                    .by_continent(continent)
                    .map(|entry| CountryOption {
                        code: entry.code_str(),
                        name: entry.display_name(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            quick_select: Catalog::quick_select_options(),
            groups,
            total: catalog.len(),
        }
    }
}

/// List the catalog.
pub async fn list_countries(State(state): State<AppState>) -> Json<CountriesResponse> {
    Json(CountriesResponse::from_catalog(state.catalog()))
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_response_covers_catalog() {
        let response = CountriesResponse::from_catalog(Catalog::standard());

        assert_eq!(response.quick_select.len(), 7);
        assert_eq!(response.groups.len(), 6);
        let listed: usize = response.groups.iter().map(|g| g.countries.len()).sum();
        assert_eq!(listed, response.total);
        assert_eq!(response.groups[3].label, "North America");
    }
}

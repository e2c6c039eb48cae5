//! Raw metafield API used by the embedded selector form.

use axum::{
    Form, Json, Router,
    extract::State,
    routing::get,
};
use country_blocker_core::CountryCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::selection::{MutationResponse, parse_codes};
use crate::error::AppError;
use crate::state::AppState;

/// Build the metafields router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/metafields", get(get_metafield).post(set_metafield))
}

/// The persisted list. Missing or malformed values read as empty.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedCountriesResponse {
    pub allowed_countries: Vec<CountryCode>,
}

/// Form body: `countries` holds a JSON array of codes.
#[derive(Debug, Deserialize)]
pub struct SetCountriesForm {
    pub countries: String,
}

/// Decode the `countries` form field.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] if the field is not a JSON array of strings
/// or any entry is not a valid code.
pub fn parse_countries_field(raw: &str) -> Result<Vec<CountryCode>, AppError> {
    let values: Vec<String> = serde_json::from_str(raw)
        .map_err(|e| AppError::BadRequest(format!("countries must be a JSON array: {e}")))?;
    parse_codes(&values)
}

/// Read the blocked-country list.
///
/// # Errors
///
/// Returns 502 if the metafield cannot be read.
#[instrument(skip(state))]
pub async fn get_metafield(
    State(state): State<AppState>,
) -> Result<Json<AllowedCountriesResponse>, AppError> {
    let selection = state.selection().load().await?;
    Ok(Json(AllowedCountriesResponse {
        allowed_countries: selection.codes().to_vec(),
    }))
}

/// Replace the blocked-country list, subject to the plan.
///
/// # Errors
///
/// Returns 400 for malformed input, 502 if the plan or current list cannot be read.
#[instrument(skip(state, form))]
pub async fn set_metafield(
    State(state): State<AppState>,
    Form(form): Form<SetCountriesForm>,
) -> Result<Json<MutationResponse>, AppError> {
    let codes = parse_countries_field(&form.countries)?;
    let report = state.selection().replace(codes).await?;
    Ok(Json(report.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_countries_field() {
        let codes = parse_countries_field(r#"["us","CA"]"#).unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes.first().unwrap().as_str(), "US");

        assert!(parse_countries_field("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_countries_field_rejects_garbage() {
        assert!(matches!(
            parse_countries_field("US,CA"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_countries_field(r#"[1, 2]"#),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_countries_field(r#"["USA"]"#),
            Err(AppError::BadRequest(_))
        ));
    }
}

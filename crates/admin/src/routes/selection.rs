//! Blocked-country selection API.
//!
//! Every mutation answers with the full resulting list so the UI never has to
//! merge state itself.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use country_blocker_core::{
    Continent, CountryCode, GroupedSelection, NoChange, PlanState, PlanTier, SelectedCountry,
    Selection, SelectionPolicy, SelectorValue,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::services::MutationReport;
use crate::state::AppState;

/// Build the selection router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/selection", get(show_selection))
        .route("/api/selection/pick", post(pick))
        .route("/api/selection/add", post(add))
        .route("/api/selection/clear", post(clear))
        .route("/api/selection/{code}", delete(remove))
}

// =============================================================================
// Response types
// =============================================================================

/// Plan banner shown above the selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanBanner {
    /// Polaris banner tone: `warning`, `info` or `success`.
    pub status: &'static str,
    pub message: &'static str,
}

impl PlanBanner {
    #[must_use]
    pub const fn for_tier(tier: PlanTier) -> Self {
        match tier {
            PlanTier::None => Self {
                status: "warning",
                message: "You need to select a subscription plan to use country blocking.",
            },
            PlanTier::Free => Self {
                status: "info",
                message: "You are on the Free Plan. You can block up to 5 countries.",
            },
            PlanTier::Premium => Self {
                status: "success",
                message: "You are on the Premium Plan with unlimited country blocking.",
            },
        }
    }
}

/// Selected countries of one continent, with the continent label.
#[derive(Debug, Serialize)]
pub struct SelectedGroupView {
    pub continent: Continent,
    pub label: &'static str,
    pub countries: Vec<SelectedCountry>,
}

/// Full selection view for the admin page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub countries: Vec<CountryCode>,
    pub groups: Vec<SelectedGroupView>,
    /// Stored codes that are not in the catalog, shown by code.
    pub unknown: Vec<SelectedCountry>,
    pub count: usize,
    pub limit: Option<usize>,
    pub plan_type: PlanTier,
    pub has_plan: bool,
    /// Free slots left, `None` when unbounded.
    pub remaining: Option<usize>,
    pub banner: PlanBanner,
}

impl SelectionView {
    fn build(selection: &Selection, plan: PlanState, grouped: GroupedSelection) -> Self {
        let policy = SelectionPolicy::new(plan.limit);
        let groups = grouped
            .groups
            .into_iter()
            .map(|group| SelectedGroupView {
                continent: group.continent,
                label: group.continent.display_name(),
                countries: group.countries,
            })
            .collect();

        Self {
            countries: selection.codes().to_vec(),
            groups,
            unknown: grouped.unknown,
            count: selection.len(),
            limit: plan.limit,
            plan_type: plan.tier,
            has_plan: plan.has_plan(),
            remaining: policy.remaining(selection.len()),
            banner: PlanBanner::for_tier(plan.tier),
        }
    }
}

/// Response to any selection mutation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub countries: Vec<CountryCode>,
    pub count: usize,
    pub limit: Option<usize>,
    pub plan_type: PlanTier,
    pub changed: bool,
    /// Why nothing changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<NoChange>,
    /// UI hint for `reason`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    /// Codes kept out by the plan limit.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<CountryCode>,
    /// Set when the change could not be saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<MutationReport> for MutationResponse {
    fn from(report: MutationReport) -> Self {
        let reason = report.mutation.no_change();
        let rejected = report.mutation.rejected().to_vec();
        let changed = report.mutation.is_changed();
        let selection = report.mutation.into_selection();

        Self {
            count: selection.len(),
            countries: selection.codes().to_vec(),
            limit: report.plan.limit,
            plan_type: report.plan.tier,
            changed,
            reason,
            message: reason.map(NoChange::message),
            rejected,
            warning: report.warning,
        }
    }
}

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PickRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub codes: Vec<String>,
}

/// Parse a list of raw codes, rejecting the whole request on the first bad one.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] naming the offending value.
pub fn parse_codes<S: AsRef<str>>(raw: &[S]) -> Result<Vec<CountryCode>, AppError> {
    raw.iter()
        .map(|value| {
            CountryCode::parse(value.as_ref())
                .map_err(|e| AppError::BadRequest(format!("{e}: {:?}", value.as_ref())))
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Current selection grouped by continent, with plan information.
///
/// # Errors
///
/// Returns 502 if the plan or the metafield cannot be read.
#[instrument(skip(state))]
pub async fn show_selection(State(state): State<AppState>) -> Result<Json<SelectionView>, AppError> {
    let snapshot = state.selection().snapshot().await?;
    let grouped = snapshot.selection.grouped_by_continent(state.catalog());
    Ok(Json(SelectionView::build(
        &snapshot.selection,
        snapshot.plan,
        grouped,
    )))
}

/// Add whatever a selector value names: one country, a continent or all.
///
/// # Errors
///
/// Returns 400 for an unparsable value, 502 on upstream read failure.
#[instrument(skip(state, body), fields(value = %body.value))]
pub async fn pick(
    State(state): State<AppState>,
    Json(body): Json<PickRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let value =
        SelectorValue::parse(&body.value).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let report = state.selection().pick(&value).await?;
    Ok(Json(report.into()))
}

/// Add a batch of codes, truncated to the plan limit.
///
/// # Errors
///
/// Returns 400 if any code is malformed, 502 on upstream read failure.
#[instrument(skip(state, body), fields(requested = body.codes.len()))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let codes = parse_codes(&body.codes)?;
    let report = state.selection().add(codes).await?;
    Ok(Json(report.into()))
}

/// Remove one code.
///
/// # Errors
///
/// Returns 400 if the code is malformed, 502 on upstream read failure.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let code = CountryCode::parse(&code).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let report = state.selection().remove(&code).await?;
    Ok(Json(report.into()))
}

/// Remove every code.
///
/// # Errors
///
/// Returns 502 on upstream read failure.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<MutationResponse>, AppError> {
    let report = state.selection().clear().await?;
    Ok(Json(report.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use country_blocker_core::Catalog;

    use super::*;

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    #[test]
    fn test_banner_per_tier() {
        assert_eq!(PlanBanner::for_tier(PlanTier::None).status, "warning");
        assert_eq!(PlanBanner::for_tier(PlanTier::Free).status, "info");
        assert_eq!(PlanBanner::for_tier(PlanTier::Premium).status, "success");
    }

    #[test]
    fn test_view_reports_remaining_slots() {
        let selection = Selection::from_metafield_value(r#"["US","CA"]"#).unwrap();
        let plan = PlanState::from_tier(PlanTier::Free);
        let grouped = selection.grouped_by_continent(Catalog::standard());

        let view = SelectionView::build(&selection, plan, grouped);

        assert_eq!(view.count, 2);
        assert_eq!(view.limit, Some(5));
        assert_eq!(view.remaining, Some(3));
        assert!(view.has_plan);
        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].label, "North America");
    }

    #[test]
    fn test_view_unbounded_for_premium() {
        let selection = Selection::new();
        let plan = PlanState::from_tier(PlanTier::Premium);
        let grouped = selection.grouped_by_continent(Catalog::standard());

        let view = SelectionView::build(&selection, plan, grouped);

        assert_eq!(view.remaining, None);
        assert!(view.groups.is_empty());
    }

    #[test]
    fn test_mutation_response_for_limited_add() {
        let selection = Selection::from_metafield_value(r#"["US","CA"]"#).unwrap();
        let mutation = selection.add_all(
            ["FR", "DE", "IT", "ES", "GB"].map(code),
            &SelectionPolicy::limited(5),
        );
        let report = MutationReport {
            mutation,
            plan: PlanState::from_tier(PlanTier::Free),
            warning: None,
        };

        let response = MutationResponse::from(report);

        assert!(response.changed);
        assert_eq!(response.count, 5);
        assert_eq!(response.rejected, vec![code("ES"), code("GB")]);
        assert!(response.reason.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["planType"], "free");
        assert_eq!(json["countries"][4], "IT");
        assert!(json.get("warning").is_none());
    }

    #[test]
    fn test_mutation_response_for_disabled_plan() {
        let mutation = Selection::new().add_country(code("FR"), &SelectionPolicy::disabled());
        let report = MutationReport {
            mutation,
            plan: PlanState::from_tier(PlanTier::None),
            warning: None,
        };

        let json = serde_json::to_value(MutationResponse::from(report)).unwrap();

        assert_eq!(json["changed"], false);
        assert_eq!(json["reason"], "disabled");
        assert!(json.get("rejected").is_none());
    }

    #[test]
    fn test_parse_codes_rejects_bad_entry() {
        assert_eq!(parse_codes(&["fr", "DE"]).unwrap(), vec![code("FR"), code("DE")]);
        assert!(matches!(
            parse_codes(&["FR", "FRA"]),
            Err(AppError::BadRequest(_))
        ));
    }
}

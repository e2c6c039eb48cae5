//! Storefront keyboard shortcut setting.

use axum::{Form, Json, Router, extract::State, routing::get};
use country_blocker_core::PlanTier;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::services::ShortcutStatus;
use crate::state::AppState;

/// Build the shortcuts router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/shortcuts", get(get_shortcuts).post(set_shortcuts))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutsResponse {
    pub is_enabled: bool,
    pub shop_domain: String,
    pub has_plan: bool,
    pub plan_type: PlanTier,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutsUpdated {
    pub success: bool,
    pub is_enabled: bool,
    pub plan_type: PlanTier,
}

/// Form body. Only the literal `"true"` enables suppression.
#[derive(Debug, Deserialize)]
pub struct ShortcutsForm {
    #[serde(default)]
    pub enabled: Option<String>,
}

impl ShortcutsForm {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.as_deref() == Some("true")
    }
}

fn response(status: ShortcutStatus, shop_domain: &str) -> ShortcutsResponse {
    ShortcutsResponse {
        is_enabled: status.is_enabled,
        shop_domain: shop_domain.to_string(),
        has_plan: status.plan.has_plan(),
        plan_type: status.plan.tier,
    }
}

/// Read the setting together with the plan.
///
/// # Errors
///
/// Returns 502 if the plan or the metafield cannot be read.
#[instrument(skip(state))]
pub async fn get_shortcuts(
    State(state): State<AppState>,
) -> Result<Json<ShortcutsResponse>, AppError> {
    let status = state.shortcuts().status().await?;
    Ok(Json(response(status, &state.config().shopify.store)))
}

/// Change the setting.
///
/// # Errors
///
/// Returns 403 without the premium plan, 502 if Shopify fails.
#[instrument(skip(state, form))]
pub async fn set_shortcuts(
    State(state): State<AppState>,
    Form(form): Form<ShortcutsForm>,
) -> Result<Json<ShortcutsUpdated>, AppError> {
    let status = state.shortcuts().set(form.is_enabled()).await?;
    Ok(Json(ShortcutsUpdated {
        success: true,
        is_enabled: status.is_enabled,
        plan_type: status.plan.tier,
    }))
}

#[cfg(test)]
mod tests {
    use country_blocker_core::PlanState;

    use super::*;

    #[test]
    fn test_only_literal_true_enables() {
        let form = |v: Option<&str>| ShortcutsForm {
            enabled: v.map(String::from),
        };
        assert!(form(Some("true")).is_enabled());
        assert!(!form(Some("TRUE")).is_enabled());
        assert!(!form(Some("false")).is_enabled());
        assert!(!form(Some("on")).is_enabled());
        assert!(!form(None).is_enabled());
    }

    #[test]
    fn test_response_shape() {
        let status = ShortcutStatus {
            is_enabled: true,
            plan: PlanState::from_tier(PlanTier::Premium),
        };
        let body = response(status, "blocker-test.myshopify.com");

        assert!(body.has_plan);
        assert_eq!(body.plan_type, PlanTier::Premium);
        assert_eq!(body.shop_domain, "blocker-test.myshopify.com");
    }
}

//! Managed pricing page link.

use axum::{Json, Router, extract::State, routing::get};
use country_blocker_core::PlanTier;
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

/// Build the pricing router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/pricing", get(pricing))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    pub shop: String,
    pub pricing_url: String,
    pub plan_type: PlanTier,
}

/// Where to pick a plan, and the current one.
///
/// A failed plan lookup must not hide the pricing link, so it is logged and
/// reported as no plan.
#[instrument(skip(state))]
pub async fn pricing(State(state): State<AppState>) -> Json<PricingResponse> {
    let plan_type = match state.selection().plan().await {
        Ok(plan) => plan.tier,
        Err(error) => {
            tracing::warn!(%error, "Plan lookup failed, showing pricing without a plan");
            PlanTier::None
        }
    };

    let config = state.config();
    Json(PricingResponse {
        shop: config.shopify.store.clone(),
        pricing_url: config.pricing_url(),
        plan_type,
    })
}

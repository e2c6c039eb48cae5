//! Server-side gate decision for the calling visitor.

use axum::{Json, extract::State};
use country_blocker_core::Gate;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::gate::{GateDecision, run_gate};
use crate::middleware::ClientIp;
use crate::state::AppState;

/// `GET /api/gate`
///
/// Loads the blocked list, geolocates the caller once and reports whether
/// the overlay should be shown.
#[instrument(skip_all)]
pub async fn decide(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
) -> Result<Json<GateDecision>> {
    let blocked = state.blocklist().load().await?;
    let decision = run_gate(Gate::new(blocked), state.locator(), ip).await;

    let outcome = if decision.state.is_visible() { "visible" } else { "hidden" };
    add_breadcrumb("gate", "Gate decision", Some(&[("state", outcome)]));

    Ok(Json(decision))
}

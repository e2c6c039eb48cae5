//! Server-side evaluation of the storefront gate.

use std::net::IpAddr;

use country_blocker_core::{CountryCode, Gate, GateState};
use serde::Serialize;

use crate::geo::GeoLocator;

/// Result of running the gate for one visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateDecision {
    pub state: GateState,
    /// The visitor's country, when the lookup succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryCode>,
}

/// Run `gate` against one geolocation lookup.
///
/// Performs at most one lookup and none at all when nothing is blocked.
/// Lookup failures are logged and leave the gate hidden.
pub async fn run_gate(mut gate: Gate, locator: &dyn GeoLocator, ip: Option<IpAddr>) -> GateDecision {
    if gate.state().is_visible() || gate.blocked().is_empty() {
        return GateDecision {
            state: gate.state(),
            country: None,
        };
    }

    let lookup = locator.locate(ip).await;
    let country = match &lookup {
        Ok(code) => Some(code.clone()),
        Err(error) => {
            tracing::warn!(%error, "Geolocation lookup failed, storefront stays open");
            None
        }
    };

    let state = gate.observe(lookup);
    if state.is_visible() {
        tracing::info!(country = ?country, "Visitor country is blocked");
    }

    GateDecision { state, country }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geo::StaticLocator;

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    fn gate() -> Gate {
        Gate::from_data_attribute(r#"["DE","FR"]"#)
    }

    #[tokio::test]
    async fn test_blocked_country_shows_overlay() {
        let locator = StaticLocator::country(code("DE"));
        let decision = run_gate(gate(), &locator, None).await;

        assert_eq!(decision.state, GateState::Visible);
        assert_eq!(decision.country, Some(code("DE")));
        assert_eq!(locator.calls(), 1);
    }

    #[tokio::test]
    async fn test_other_country_stays_hidden() {
        let locator = StaticLocator::country(code("US"));
        let decision = run_gate(gate(), &locator, None).await;

        assert_eq!(decision.state, GateState::Hidden);
        assert_eq!(decision.country, Some(code("US")));
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_open() {
        let locator = StaticLocator::failing();
        let decision = run_gate(gate(), &locator, None).await;

        assert_eq!(decision.state, GateState::Hidden);
        assert_eq!(decision.country, None);
        assert_eq!(locator.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_list_skips_lookup() {
        let locator = StaticLocator::country(code("DE"));
        let decision = run_gate(Gate::from_data_attribute("garbage"), &locator, None).await;

        assert_eq!(decision.state, GateState::Hidden);
        assert_eq!(locator.calls(), 0);
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(GateDecision {
            state: GateState::Hidden,
            country: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "state": "hidden" }));
    }
}

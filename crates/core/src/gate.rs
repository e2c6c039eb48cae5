//! Visitor-facing gate deciding whether the blocking overlay is shown.
//!
//! The gate starts [`Hidden`](GateState::Hidden) and becomes
//! [`Visible`](GateState::Visible) once a geolocation lookup reports a blocked
//! country. `Visible` is terminal. Lookup failures leave the gate hidden: the
//! storefront fails open.

use serde::Serialize;

use crate::selection::{Selection, SelectionParseError};
use crate::types::CountryCode;

/// Visibility of the blocking overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    #[default]
    Hidden,
    Visible,
}

impl GateState {
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Gate over one blocked-country list.
///
/// ## Examples
///
/// ```
/// use country_blocker_core::{CountryCode, Gate, GateState};
///
/// let mut gate = Gate::from_data_attribute(r#"["DE","FR"]"#);
/// let lookup: Result<CountryCode, ()> = CountryCode::parse("de").map_err(|_| ());
/// assert_eq!(gate.observe(lookup), GateState::Visible);
/// ```
#[derive(Debug, Clone)]
pub struct Gate {
    blocked: Selection,
    state: GateState,
}

impl Gate {
    /// A hidden gate over `blocked`.
    #[must_use]
    pub const fn new(blocked: Selection) -> Self {
        Self {
            blocked,
            state: GateState::Hidden,
        }
    }

    /// Build a gate from the injected `data-countries` attribute.
    ///
    /// An unparsable attribute yields an empty list, so the gate can never
    /// open. Use [`try_from_data_attribute`](Self::try_from_data_attribute)
    /// to observe the parse error.
    #[must_use]
    pub fn from_data_attribute(raw: &str) -> Self {
        Self::try_from_data_attribute(raw).unwrap_or_else(|_| Self::new(Selection::new()))
    }

    /// Build a gate from the injected `data-countries` attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is not a JSON array of codes.
    pub fn try_from_data_attribute(raw: &str) -> Result<Self, SelectionParseError> {
        Selection::from_metafield_value(raw).map(Self::new)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    /// The blocked list this gate checks against.
    #[must_use]
    pub const fn blocked(&self) -> &Selection {
        &self.blocked
    }

    /// Whether `code` is on the blocked list.
    #[must_use]
    pub fn blocks(&self, code: &CountryCode) -> bool {
        self.blocked.contains(code.as_str())
    }

    /// Apply one geolocation outcome and return the resulting state.
    ///
    /// Only `Ok(code)` with a blocked code moves the gate to `Visible`; there
    /// is no transition back.
    pub fn observe<E>(&mut self, lookup: Result<CountryCode, E>) -> GateState {
        if self.state.is_visible() {
            return self.state;
        }

        if let Ok(code) = lookup
            && self.blocks(&code)
        {
            self.state = GateState::Visible;
        }

        self.state
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    fn gate() -> Gate {
        Gate::from_data_attribute(r#"["DE","FR"]"#)
    }

    #[test]
    fn test_blocked_country_shows_overlay() {
        let mut gate = gate();
        assert_eq!(gate.observe::<()>(Ok(code("DE"))), GateState::Visible);
    }

    #[test]
    fn test_other_country_stays_hidden() {
        let mut gate = gate();
        assert_eq!(gate.observe::<()>(Ok(code("US"))), GateState::Hidden);
    }

    #[test]
    fn test_lookup_error_fails_open() {
        let mut gate = gate();
        assert_eq!(gate.observe(Err("timeout")), GateState::Hidden);
    }

    #[test]
    fn test_visible_is_terminal() {
        let mut gate = gate();
        gate.observe::<()>(Ok(code("FR")));
        assert_eq!(gate.observe::<()>(Ok(code("US"))), GateState::Visible);
        assert_eq!(gate.observe(Err("timeout")), GateState::Visible);
    }

    #[test]
    fn test_unparsable_attribute_never_opens() {
        assert!(Gate::try_from_data_attribute("{{ countries }}").is_err());

        let mut gate = Gate::from_data_attribute("{{ countries }}");
        assert!(gate.blocked().is_empty());
        assert_eq!(gate.observe::<()>(Ok(code("DE"))), GateState::Hidden);
    }

    #[test]
    fn test_state_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&GateState::Visible).unwrap(),
            "\"visible\""
        );
    }
}

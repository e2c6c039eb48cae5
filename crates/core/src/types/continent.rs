//! Continent groupings used for bulk selection.

use serde::{Deserialize, Serialize};

/// A continent grouping of the country catalog.
///
/// Variants are declared in catalog order; [`Continent::ALL`] preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continent {
    Africa,
    Asia,
    Europe,
    NorthAmerica,
    SouthAmerica,
    Oceania,
}

impl Continent {
    /// Every continent, in catalog declaration order.
    pub const ALL: [Self; 6] = [
        Self::Africa,
        Self::Asia,
        Self::Europe,
        Self::NorthAmerica,
        Self::SouthAmerica,
        Self::Oceania,
    ];

    /// Human-readable name shown in the admin UI.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::NorthAmerica => "North America",
            Self::SouthAmerica => "South America",
            Self::Oceania => "Oceania",
        }
    }

    /// Value of the "All <continent>" option in the country selector.
    #[must_use]
    pub const fn selector_value(self) -> &'static str {
        match self {
            Self::Africa => "ALL_AFRICA",
            Self::Asia => "ALL_ASIA",
            Self::Europe => "ALL_EUROPE",
            Self::NorthAmerica => "ALL_NORTH_AMERICA",
            Self::SouthAmerica => "ALL_SOUTH_AMERICA",
            Self::Oceania => "ALL_OCEANIA",
        }
    }

    /// Look up a continent from its selector value (e.g. `ALL_EUROPE`).
    #[must_use]
    pub fn from_selector_value(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|continent| continent.selector_value() == value)
    }
}

impl std::fmt::Display for Continent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Continent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|continent| continent.display_name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| format!("invalid continent: {s}"))
    }
}

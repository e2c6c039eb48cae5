//! Subscription plan tiers and the limits they imply.

use serde::{Deserialize, Serialize};

use crate::selection::SelectionPolicy;

/// Maximum number of blocked countries on the free plan.
pub const FREE_PLAN_COUNTRY_LIMIT: usize = 5;

/// The merchant's subscription level.
///
/// Supplied by the plan resolver; the core never derives it from display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    /// No active subscription: country blocking is disabled.
    #[default]
    None,
    /// Free plan: country blocking limited to [`FREE_PLAN_COUNTRY_LIMIT`].
    Free,
    /// Premium plan: unlimited country blocking and keyboard shortcut control.
    Premium,
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Free => write!(f, "free"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

impl std::str::FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            _ => Err(format!("invalid plan tier: {s}")),
        }
    }
}

/// The active plan together with its country limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlanState {
    /// Active tier.
    pub tier: PlanTier,
    /// Maximum number of blocked countries, `None` when unbounded.
    pub limit: Option<usize>,
}

impl PlanState {
    /// Derive the plan state for a tier.
    #[must_use]
    pub const fn from_tier(tier: PlanTier) -> Self {
        let limit = match tier {
            PlanTier::Free => Some(FREE_PLAN_COUNTRY_LIMIT),
            PlanTier::None | PlanTier::Premium => None,
        };
        Self { tier, limit }
    }

    /// Whether any plan is active.
    #[must_use]
    pub const fn has_plan(&self) -> bool {
        !matches!(self.tier, PlanTier::None)
    }

    /// Keyboard shortcut suppression is a premium-only feature.
    #[must_use]
    pub const fn can_toggle_shortcuts(&self) -> bool {
        matches!(self.tier, PlanTier::Premium)
    }

    /// The selection policy this plan enforces.
    #[must_use]
    pub const fn selection_policy(&self) -> SelectionPolicy {
        if self.has_plan() {
            SelectionPolicy::new(self.limit)
        } else {
            SelectionPolicy::disabled()
        }
    }
}

impl From<PlanTier> for PlanState {
    fn from(tier: PlanTier) -> Self {
        Self::from_tier(tier)
    }
}

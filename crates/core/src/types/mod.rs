//! Core types for Country Blocker.
//!
//! This module provides type-safe wrappers for the domain's small vocabulary.

pub mod continent;
pub mod country_code;
pub mod plan;

pub use continent::Continent;
pub use country_code::{CountryCode, CountryCodeError};
pub use plan::{FREE_PLAN_COUNTRY_LIMIT, PlanState, PlanTier};

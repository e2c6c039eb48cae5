//! Country Blocker Core - Domain library.
//!
//! This crate holds the rules shared by every Country Blocker component:
//! - `admin` - Embedded Shopify admin API that edits the blocked-country list
//! - `storefront` - Storefront service rendering the blocker snippet and gate
//! - `cli` - Command-line tools for inspecting and editing the selection
//!
//! # Architecture
//!
//! The core crate contains only data and pure functions - no I/O, no HTTP
//! clients. Loading and persisting a [`Selection`] is the caller's job.
//!
//! # Modules
//!
//! - [`types`] - Country codes, continents and plan tiers
//! - [`catalog`] - Static country reference data and continent groups
//! - [`selection`] - The blocked-country list and its plan-limited mutations
//! - [`gate`] - Storefront overlay state machine
//! - [`metafield`] - Metafield keys used for persistence

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod gate;
pub mod metafield;
pub mod selection;
pub mod types;

pub use catalog::{ALL_COUNTRIES_VALUE, Catalog, ContinentGroup, CountryEntry, QuickSelectOption};
pub use gate::{Gate, GateState};
pub use metafield::MetafieldKey;
pub use selection::{
    Change, GroupedSelection, Mutation, NoChange, Outcome, SelectedCountry, SelectedGroup,
    Selection, SelectionParseError, SelectionPolicy, SelectorParseError, SelectorValue,
};
pub use types::*;

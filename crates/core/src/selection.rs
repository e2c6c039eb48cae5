//! The merchant's blocked-country selection and its mutation rules.
//!
//! A [`Selection`] is an ordered set of [`CountryCode`]s. Every mutation is a
//! pure function: it consumes the current selection, applies the active
//! [`SelectionPolicy`] and returns a [`Mutation`] carrying the resulting
//! selection and what happened. Persisting the result is the caller's job and
//! should happen only when [`Mutation::is_changed`] is true.
//!
//! # Rules
//!
//! - Codes already present are skipped silently.
//! - With a limit `L`, a mutation never grows the selection past `L`; bulk
//!   additions are truncated to the free slots, keeping input order.
//! - When the policy is disabled (no active plan) every mutation is refused,
//!   including removal and clearing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{ALL_COUNTRIES_VALUE, Catalog, CountryEntry};
use crate::types::{Continent, CountryCode, CountryCodeError};

// =============================================================================
// Policy
// =============================================================================

/// Constraints applied to every selection mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionPolicy {
    disabled: bool,
    limit: Option<usize>,
}

impl SelectionPolicy {
    /// An enabled policy with an optional limit.
    #[must_use]
    pub const fn new(limit: Option<usize>) -> Self {
        Self {
            disabled: false,
            limit,
        }
    }

    /// No limit on the number of countries.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self::new(None)
    }

    /// At most `limit` countries.
    #[must_use]
    pub const fn limited(limit: usize) -> Self {
        Self::new(Some(limit))
    }

    /// All mutations refused.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            disabled: true,
            limit: None,
        }
    }

    /// Whether mutations are refused.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The active limit, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Free slots left for a selection of `current` countries, `None` when unbounded.
    #[must_use]
    pub const fn remaining(&self, current: usize) -> Option<usize> {
        match self.limit {
            Some(limit) => Some(limit.saturating_sub(current)),
            None => None,
        }
    }
}

// =============================================================================
// Selector values
// =============================================================================

/// A value submitted by the admin country selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorValue {
    /// "Select All Countries".
    AllCountries,
    /// "All <continent>".
    Continent(Continent),
    /// A single country.
    Country(CountryCode),
}

/// Errors that can occur when parsing a [`SelectorValue`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorParseError {
    /// Empty value (e.g. a separator option).
    #[error("selector value cannot be empty")]
    Empty,
    /// An `ALL_*` value that names no known group.
    #[error("unknown group selector: {0}")]
    UnknownGroup(String),
    /// Not a group and not a valid country code.
    #[error("invalid country code: {0}")]
    Country(#[from] CountryCodeError),
}

impl SelectorValue {
    /// Parse a selector value.
    ///
    /// # Errors
    ///
    /// Returns an error for empty input, unknown `ALL_*` groups, and
    /// malformed country codes.
    pub fn parse(value: &str) -> Result<Self, SelectorParseError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SelectorParseError::Empty);
        }

        if value == ALL_COUNTRIES_VALUE {
            return Ok(Self::AllCountries);
        }

        if value.starts_with("ALL_") {
            return Continent::from_selector_value(value)
                .map(Self::Continent)
                .ok_or_else(|| SelectorParseError::UnknownGroup(value.to_string()));
        }

        Ok(Self::Country(CountryCode::parse(value)?))
    }

    /// The codes this value stands for, in catalog order.
    #[must_use]
    pub fn expand(&self, catalog: &Catalog) -> Vec<CountryCode> {
        match self {
            Self::AllCountries => catalog.all_codes(),
            Self::Continent(continent) => catalog.continent_codes(*continent),
            Self::Country(code) => vec![code.clone()],
        }
    }
}

impl std::str::FromStr for SelectorValue {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Mutation outcome
// =============================================================================

/// Why a mutation left the selection untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoChange {
    /// No active plan.
    Disabled,
    /// Every requested code is already selected.
    AlreadyPresent,
    /// The plan limit leaves no free slot.
    LimitReached,
    /// Nothing was requested.
    NothingToAdd,
    /// The code to remove is not selected.
    NotPresent,
    /// The selection is already empty.
    AlreadyEmpty,
    /// The replacement equals the current selection.
    Identical,
}

impl NoChange {
    /// Short explanation suitable for a UI hint.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Disabled => "Select a subscription plan to use country blocking.",
            Self::AlreadyPresent => "No countries added: already blocked.",
            Self::LimitReached => "Country limit reached for your plan.",
            Self::NothingToAdd => "No countries added.",
            Self::NotPresent => "Country is not blocked.",
            Self::AlreadyEmpty => "No countries are blocked.",
            Self::Identical => "Blocked countries are unchanged.",
        }
    }
}

/// What a successful mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Codes appended; `rejected` lists codes dropped by the plan limit.
    Added {
        added: Vec<CountryCode>,
        rejected: Vec<CountryCode>,
    },
    /// One code removed.
    Removed(CountryCode),
    /// Selection emptied.
    Cleared,
    /// Selection replaced; `rejected` lists codes dropped by the plan limit.
    Replaced { rejected: Vec<CountryCode> },
}

/// Result of applying a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed(Change),
    Unchanged(NoChange),
}

/// The selection after a mutation, together with its [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Mutation {
    selection: Selection,
    outcome: Outcome,
}

impl Mutation {
    const fn changed(selection: Selection, change: Change) -> Self {
        Self {
            selection,
            outcome: Outcome::Changed(change),
        }
    }

    const fn unchanged(selection: Selection, reason: NoChange) -> Self {
        Self {
            selection,
            outcome: Outcome::Unchanged(reason),
        }
    }

    /// Whether the selection differs from the input and must be persisted.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self.outcome, Outcome::Changed(_))
    }

    /// The resulting selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Consume the mutation and return the resulting selection.
    #[must_use]
    pub fn into_selection(self) -> Selection {
        self.selection
    }

    /// What happened.
    #[must_use]
    pub const fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The reason nothing changed, if nothing did.
    #[must_use]
    pub const fn no_change(&self) -> Option<NoChange> {
        match self.outcome {
            Outcome::Unchanged(reason) => Some(reason),
            Outcome::Changed(_) => None,
        }
    }

    /// Codes the plan limit kept out of the selection.
    #[must_use]
    pub fn rejected(&self) -> &[CountryCode] {
        match &self.outcome {
            Outcome::Changed(Change::Added { rejected, .. } | Change::Replaced { rejected }) => {
                rejected
            }
            _ => &[],
        }
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Errors that can occur when decoding a persisted [`Selection`].
#[derive(thiserror::Error, Debug)]
pub enum SelectionParseError {
    /// The value is not a JSON array of two-letter codes.
    #[error("selection is not a JSON array of country codes: {0}")]
    Json(#[from] serde_json::Error),
}

/// An ordered set of blocked country codes.
///
/// Serializes as a JSON array of codes, which is also the persisted metafield
/// format. Duplicates are collapsed on construction (first occurrence wins).
///
/// ## Examples
///
/// ```
/// use country_blocker_core::{CountryCode, Selection, SelectionPolicy};
///
/// let selection = Selection::from_metafield_value(r#"["US","CA"]"#).unwrap();
/// let codes = ["FR", "DE", "IT", "ES", "GB"].map(|c| CountryCode::parse(c).unwrap());
///
/// let mutation = selection.add_all(codes, &SelectionPolicy::limited(5));
/// assert!(mutation.is_changed());
/// assert_eq!(mutation.selection().to_metafield_value(), r#"["US","CA","FR","DE","IT"]"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CountryCode>", into = "Vec<CountryCode>")]
pub struct Selection {
    codes: Vec<CountryCode>,
}

impl Selection {
    /// An empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { codes: Vec::new() }
    }

    /// Decode the persisted metafield value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON array of valid codes.
    /// Callers treat this as an empty selection.
    pub fn from_metafield_value(raw: &str) -> Result<Self, SelectionParseError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Decode the persisted metafield value, skipping entries that are not
    /// country codes.
    ///
    /// Valid codes keep their stored order. Skipped entries are returned as
    /// their JSON text so callers can log them.
    ///
    /// # Errors
    ///
    /// Returns an error only if the value is not a JSON array.
    pub fn from_metafield_value_lossy(
        raw: &str,
    ) -> Result<(Self, Vec<String>), SelectionParseError> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(raw)?;
        let mut skipped = Vec::new();

        let selection = entries
            .into_iter()
            .filter_map(|entry| match entry.as_str().map(CountryCode::parse) {
                Some(Ok(code)) => Some(code),
                _ => {
                    skipped.push(entry.to_string());
                    None
                }
            })
            .collect();

        Ok((selection, skipped))
    }

    /// Encode as the persisted metafield value (a JSON array of codes).
    #[must_use]
    pub fn to_metafield_value(&self) -> String {
        serde_json::Value::from(
            self.codes
                .iter()
                .map(|code| code.as_str().to_owned())
                .collect::<Vec<_>>(),
        )
        .to_string()
    }

    /// Number of selected countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no country is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Whether `code` is selected.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|selected| selected == code)
    }

    /// Selected codes in insertion order.
    #[must_use]
    pub fn codes(&self) -> &[CountryCode] {
        &self.codes
    }

    /// Iterate the selected codes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CountryCode> {
        self.codes.iter()
    }

    /// Order-insensitive equality.
    #[must_use]
    pub fn same_codes(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|code| other.contains(code.as_str()))
    }

    /// Add one country.
    ///
    /// No-op when the policy is disabled, the code is already selected, or
    /// the limit is reached.
    pub fn add_country(self, code: CountryCode, policy: &SelectionPolicy) -> Mutation {
        self.add_all(std::iter::once(code), policy)
    }

    /// Add several countries in order.
    ///
    /// Codes already selected (or repeated in the input) are skipped. With a
    /// limit, only the first `limit - len` remaining codes are appended; the
    /// rest are reported in [`Mutation::rejected`].
    pub fn add_all<I>(mut self, codes: I, policy: &SelectionPolicy) -> Mutation
    where
        I: IntoIterator<Item = CountryCode>,
    {
        if policy.is_disabled() {
            return Mutation::unchanged(self, NoChange::Disabled);
        }

        let mut seen: HashSet<CountryCode> = self.codes.iter().cloned().collect();
        let mut requested = 0_usize;
        let candidates: Vec<CountryCode> = codes
            .into_iter()
            .inspect(|_| requested += 1)
            .filter(|code| seen.insert(code.clone()))
            .collect();

        if candidates.is_empty() {
            let reason = if requested == 0 {
                NoChange::NothingToAdd
            } else {
                NoChange::AlreadyPresent
            };
            return Mutation::unchanged(self, reason);
        }

        let (added, rejected) = match policy.remaining(self.len()) {
            Some(0) => return Mutation::unchanged(self, NoChange::LimitReached),
            Some(remaining) if candidates.len() > remaining => {
                let mut added = candidates;
                let rejected = added.split_off(remaining);
                (added, rejected)
            }
            _ => (candidates, Vec::new()),
        };

        self.codes.extend(added.iter().cloned());
        Mutation::changed(self, Change::Added { added, rejected })
    }

    /// Remove one country.
    pub fn remove_country(mut self, code: &CountryCode, policy: &SelectionPolicy) -> Mutation {
        if policy.is_disabled() {
            return Mutation::unchanged(self, NoChange::Disabled);
        }

        match self.codes.iter().position(|selected| selected == code) {
            Some(position) => {
                let removed = self.codes.remove(position);
                Mutation::changed(self, Change::Removed(removed))
            }
            None => Mutation::unchanged(self, NoChange::NotPresent),
        }
    }

    /// Remove every country.
    pub fn clear_all(self, policy: &SelectionPolicy) -> Mutation {
        if policy.is_disabled() {
            return Mutation::unchanged(self, NoChange::Disabled);
        }

        if self.is_empty() {
            return Mutation::unchanged(self, NoChange::AlreadyEmpty);
        }

        Mutation::changed(Self::new(), Change::Cleared)
    }

    /// Replace the whole selection, as one mutation.
    ///
    /// Equivalent to [`clear_all`](Self::clear_all) followed by
    /// [`add_all`](Self::add_all), producing a single write.
    pub fn replace_with<I>(self, codes: I, policy: &SelectionPolicy) -> Mutation
    where
        I: IntoIterator<Item = CountryCode>,
    {
        if policy.is_disabled() {
            return Mutation::unchanged(self, NoChange::Disabled);
        }

        let fresh = Self::new().add_all(codes, policy);
        let rejected = fresh.rejected().to_vec();
        let replacement = fresh.into_selection();

        if replacement == self {
            return Mutation::unchanged(self, NoChange::Identical);
        }

        Mutation::changed(replacement, Change::Replaced { rejected })
    }

    /// Apply a selector pick: a single country or an expanded group.
    pub fn pick(self, value: &SelectorValue, catalog: &Catalog, policy: &SelectionPolicy) -> Mutation {
        match value {
            SelectorValue::Country(code) => self.add_country(code.clone(), policy),
            group => self.add_all(group.expand(catalog), policy),
        }
    }

    /// Group the selection by continent for display.
    ///
    /// Continents appear in catalog order and only when non-empty; members
    /// keep selection order. Codes outside the catalog go to `unknown` and
    /// are labelled with the raw code.
    #[must_use]
    pub fn grouped_by_continent(&self, catalog: &Catalog) -> GroupedSelection {
        let mut groups: Vec<SelectedGroup> = Continent::ALL
            .into_iter()
            .map(|continent| SelectedGroup {
                continent,
                countries: Vec::new(),
            })
            .collect();
        let mut unknown = Vec::new();

        for code in &self.codes {
            let country = SelectedCountry {
                code: code.clone(),
                label: catalog.label_for(code.as_str()).to_string(),
            };
            let continent = catalog.by_code(code.as_str()).map(CountryEntry::continent);
            match groups.iter_mut().find(|g| Some(g.continent) == continent) {
                Some(group) => group.countries.push(country),
                None => unknown.push(country),
            }
        }

        groups.retain(|group| !group.countries.is_empty());
        GroupedSelection { groups, unknown }
    }
}

impl From<Vec<CountryCode>> for Selection {
    fn from(codes: Vec<CountryCode>) -> Self {
        codes.into_iter().collect()
    }
}

impl From<Selection> for Vec<CountryCode> {
    fn from(selection: Selection) -> Self {
        selection.codes
    }
}

impl FromIterator<CountryCode> for Selection {
    fn from_iter<T: IntoIterator<Item = CountryCode>>(iter: T) -> Self {
        let mut seen = HashSet::new();
        let codes = iter
            .into_iter()
            .filter(|code| seen.insert(code.clone()))
            .collect();
        Self { codes }
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a CountryCode;
    type IntoIter = std::slice::Iter<'a, CountryCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

/// A selected country with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedCountry {
    pub code: CountryCode,
    pub label: String,
}

/// Selected countries of one continent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedGroup {
    pub continent: Continent,
    pub countries: Vec<SelectedCountry>,
}

/// A selection grouped by continent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedSelection {
    pub groups: Vec<SelectedGroup>,
    pub unknown: Vec<SelectedCountry>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn code(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    fn codes(list: &[&str]) -> Vec<CountryCode> {
        list.iter().map(|s| code(s)).collect()
    }

    fn selection(list: &[&str]) -> Selection {
        Selection::from(codes(list))
    }

    fn as_strs(selection: &Selection) -> Vec<&str> {
        selection.iter().map(CountryCode::as_str).collect()
    }

    // =========================================================================
    // add_country
    // =========================================================================

    #[test]
    fn test_add_country_appends() {
        let mutation = selection(&["US"]).add_country(code("CA"), &SelectionPolicy::unrestricted());
        assert!(mutation.is_changed());
        assert_eq!(as_strs(mutation.selection()), ["US", "CA"]);
    }

    #[test]
    fn test_add_country_skips_present() {
        let mutation = selection(&["US"]).add_country(code("US"), &SelectionPolicy::unrestricted());
        assert_eq!(mutation.no_change(), Some(NoChange::AlreadyPresent));
        assert_eq!(as_strs(mutation.selection()), ["US"]);
    }

    #[test]
    fn test_add_country_at_limit_is_noop() {
        let full = selection(&["US", "CA", "MX", "FR", "DE"]);
        let mutation = full.clone().add_country(code("IT"), &SelectionPolicy::limited(5));
        assert_eq!(mutation.no_change(), Some(NoChange::LimitReached));
        assert_eq!(mutation.selection(), &full);
    }

    #[test]
    fn test_add_country_disabled_is_noop() {
        let mutation = Selection::new().add_country(code("US"), &SelectionPolicy::disabled());
        assert_eq!(mutation.no_change(), Some(NoChange::Disabled));
        assert!(mutation.selection().is_empty());
    }

    // =========================================================================
    // add_all
    // =========================================================================

    #[test]
    fn test_add_all_truncates_to_remaining_slots() {
        let mutation = selection(&["US", "CA"]).add_all(
            codes(&["FR", "DE", "IT", "ES", "GB"]),
            &SelectionPolicy::limited(5),
        );

        assert!(mutation.is_changed());
        assert_eq!(as_strs(mutation.selection()), ["US", "CA", "FR", "DE", "IT"]);
        assert_eq!(mutation.rejected(), codes(&["ES", "GB"]).as_slice());
    }

    #[test]
    fn test_add_all_filters_present_before_truncating() {
        let mutation = selection(&["US", "FR"]).add_all(
            codes(&["FR", "DE", "IT", "ES"]),
            &SelectionPolicy::limited(4),
        );
        assert_eq!(as_strs(mutation.selection()), ["US", "FR", "DE", "IT"]);
        assert_eq!(mutation.rejected(), codes(&["ES"]).as_slice());
    }

    #[test]
    fn test_add_all_skips_duplicates_in_input() {
        let mutation =
            Selection::new().add_all(codes(&["FR", "FR", "DE"]), &SelectionPolicy::unrestricted());
        assert_eq!(as_strs(mutation.selection()), ["FR", "DE"]);
    }

    #[test]
    fn test_add_all_no_remaining_slots_is_noop() {
        let mutation = selection(&["US", "CA"]).add_all(codes(&["FR"]), &SelectionPolicy::limited(2));
        assert_eq!(mutation.no_change(), Some(NoChange::LimitReached));
        assert_eq!(as_strs(mutation.selection()), ["US", "CA"]);
    }

    #[test]
    fn test_add_all_over_limit_selection_is_not_trimmed() {
        // A premium merchant who downgraded keeps the existing list.
        let seven = selection(&["US", "CA", "MX", "FR", "DE", "IT", "ES"]);
        let mutation = seven.clone().add_all(codes(&["GB"]), &SelectionPolicy::limited(5));
        assert_eq!(mutation.no_change(), Some(NoChange::LimitReached));
        assert_eq!(mutation.selection(), &seven);
    }

    #[test]
    fn test_add_all_empty_input() {
        let mutation = Selection::new().add_all(Vec::new(), &SelectionPolicy::unrestricted());
        assert_eq!(mutation.no_change(), Some(NoChange::NothingToAdd));
    }

    #[test]
    fn test_add_all_africa_premium_is_not_truncated() {
        let catalog = Catalog::standard();
        let africa = catalog.continent_codes(Continent::Africa);
        assert_eq!(africa.len(), 54);

        let mutation = Selection::new().add_all(africa.clone(), &SelectionPolicy::unrestricted());
        assert_eq!(mutation.selection().len(), 54);
        assert_eq!(mutation.selection().codes(), africa.as_slice());
        assert!(mutation.rejected().is_empty());
    }

    // =========================================================================
    // remove / clear / replace
    // =========================================================================

    #[test]
    fn test_remove_country() {
        let mutation =
            selection(&["US", "CA", "MX"]).remove_country(&code("CA"), &SelectionPolicy::limited(5));
        assert_eq!(as_strs(mutation.selection()), ["US", "MX"]);
        assert_eq!(
            mutation.outcome(),
            &Outcome::Changed(Change::Removed(code("CA")))
        );
    }

    #[test]
    fn test_remove_missing_country_is_noop() {
        let mutation = selection(&["US"]).remove_country(&code("CA"), &SelectionPolicy::unrestricted());
        assert_eq!(mutation.no_change(), Some(NoChange::NotPresent));
    }

    #[test]
    fn test_clear_all() {
        let mutation = selection(&["US", "CA"]).clear_all(&SelectionPolicy::limited(5));
        assert!(mutation.is_changed());
        assert!(mutation.selection().is_empty());
    }

    #[test]
    fn test_clear_all_empty_is_noop() {
        let mutation = Selection::new().clear_all(&SelectionPolicy::unrestricted());
        assert_eq!(mutation.no_change(), Some(NoChange::AlreadyEmpty));
        assert!(mutation.selection().is_empty());
    }

    #[test]
    fn test_disabled_blocks_every_mutation() {
        let original = selection(&["US", "CA"]);
        let policy = SelectionPolicy::disabled();

        let added = original.clone().add_country(code("FR"), &policy);
        let removed = original.clone().remove_country(&code("US"), &policy);
        let cleared = original.clone().clear_all(&policy);
        let replaced = original.clone().replace_with(codes(&["DE"]), &policy);

        for mutation in [added, removed, cleared, replaced] {
            assert_eq!(mutation.no_change(), Some(NoChange::Disabled));
            assert_eq!(mutation.selection(), &original);
        }
    }

    #[test]
    fn test_replace_with_applies_limit() {
        let mutation = selection(&["US"]).replace_with(
            codes(&["FR", "DE", "IT", "ES", "GB", "PT"]),
            &SelectionPolicy::limited(5),
        );
        assert_eq!(as_strs(mutation.selection()), ["FR", "DE", "IT", "ES", "GB"]);
        assert_eq!(mutation.rejected(), codes(&["PT"]).as_slice());
    }

    #[test]
    fn test_replace_with_identical_is_noop() {
        let mutation = selection(&["US", "CA"])
            .replace_with(codes(&["US", "CA"]), &SelectionPolicy::unrestricted());
        assert_eq!(mutation.no_change(), Some(NoChange::Identical));
    }

    #[test]
    fn test_replace_with_empty_clears() {
        let mutation = selection(&["US"]).replace_with(Vec::new(), &SelectionPolicy::unrestricted());
        assert!(mutation.is_changed());
        assert!(mutation.selection().is_empty());
    }

    // =========================================================================
    // Selector picks
    // =========================================================================

    #[test]
    fn test_selector_parse() {
        assert_eq!(
            SelectorValue::parse("ALL_COUNTRIES").unwrap(),
            SelectorValue::AllCountries
        );
        assert_eq!(
            SelectorValue::parse("ALL_OCEANIA").unwrap(),
            SelectorValue::Continent(Continent::Oceania)
        );
        assert_eq!(
            SelectorValue::parse("fr").unwrap(),
            SelectorValue::Country(code("FR"))
        );
        assert_eq!(SelectorValue::parse(""), Err(SelectorParseError::Empty));
        assert_eq!(
            SelectorValue::parse("ALL_ATLANTIS"),
            Err(SelectorParseError::UnknownGroup("ALL_ATLANTIS".to_string()))
        );
        assert!(matches!(
            SelectorValue::parse("France"),
            Err(SelectorParseError::Country(_))
        ));
    }

    #[test]
    fn test_pick_continent_on_free_plan_takes_first_listed() {
        let catalog = Catalog::standard();
        let mutation = Selection::new().pick(
            &SelectorValue::Continent(Continent::SouthAmerica),
            catalog,
            &SelectionPolicy::limited(5),
        );
        assert_eq!(as_strs(mutation.selection()), ["AR", "BO", "BR", "CL", "CO"]);
        assert_eq!(mutation.rejected().len(), 7);
    }

    #[test]
    fn test_pick_all_countries_premium() {
        let catalog = Catalog::standard();
        let mutation = selection(&["FR"]).pick(
            &SelectorValue::AllCountries,
            catalog,
            &SelectionPolicy::unrestricted(),
        );
        assert_eq!(mutation.selection().len(), catalog.len());
        assert_eq!(mutation.selection().codes()[0], "FR");
    }

    // =========================================================================
    // Persistence format
    // =========================================================================

    #[test]
    fn test_metafield_round_trip() {
        let original = selection(&["US", "CA", "FR"]);
        let parsed = Selection::from_metafield_value(&original.to_metafield_value()).unwrap();
        assert!(parsed.same_codes(&original));
        assert_eq!(original.to_metafield_value(), r#"["US","CA","FR"]"#);
    }

    #[test]
    fn test_metafield_parse_collapses_duplicates() {
        let parsed = Selection::from_metafield_value(r#"["US","us","CA"]"#).unwrap();
        assert_eq!(as_strs(&parsed), ["US", "CA"]);
    }

    #[test]
    fn test_metafield_parse_rejects_malformed() {
        assert!(Selection::from_metafield_value("not json").is_err());
        assert!(Selection::from_metafield_value(r#"{"US":true}"#).is_err());
        assert!(Selection::from_metafield_value(r#"["USA"]"#).is_err());
    }

    #[test]
    fn test_lossy_parse_keeps_valid_codes() {
        let (parsed, skipped) =
            Selection::from_metafield_value_lossy(r#"["US","CA","Kosovo",7,"fr"]"#).unwrap();
        assert_eq!(as_strs(&parsed), ["US", "CA", "FR"]);
        assert_eq!(skipped, [r#""Kosovo""#, "7"]);
    }

    #[test]
    fn test_lossy_parse_rejects_non_arrays() {
        assert!(Selection::from_metafield_value_lossy("not json").is_err());
        assert!(Selection::from_metafield_value_lossy(r#"{"US":true}"#).is_err());

        let (parsed, skipped) = Selection::from_metafield_value_lossy("[]").unwrap();
        assert!(parsed.is_empty());
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_metafield_parse_keeps_unknown_codes() {
        let parsed = Selection::from_metafield_value(r#"["XK","FR"]"#).unwrap();
        assert_eq!(as_strs(&parsed), ["XK", "FR"]);
    }

    // =========================================================================
    // Grouping
    // =========================================================================

    #[test]
    fn test_grouped_by_continent() {
        let grouped = selection(&["US", "FR", "XK", "CA", "JP"]).grouped_by_continent(Catalog::standard());

        let continents: Vec<Continent> = grouped.groups.iter().map(|g| g.continent).collect();
        assert_eq!(
            continents,
            [Continent::Asia, Continent::Europe, Continent::NorthAmerica]
        );

        let north_america = &grouped.groups[2];
        let labels: Vec<&str> = north_america
            .countries
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, ["United States", "Canada"]);

        assert_eq!(grouped.unknown.len(), 1);
        assert_eq!(grouped.unknown[0].label, "XK");
    }
}

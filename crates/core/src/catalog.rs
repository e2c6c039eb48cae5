//! Static country reference data.
//!
//! The catalog is the single source for display names and continent groups.
//! Declaration order is a contract: continent expansion and "select all" add
//! countries in this order, so truncation at a plan limit keeps the
//! first-listed countries.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::types::{Continent, CountryCode};
use crate::types::Continent::{Africa, Asia, Europe, NorthAmerica, Oceania, SouthAmerica};

/// Selector value for the "Select All Countries" option.
pub const ALL_COUNTRIES_VALUE: &str = "ALL_COUNTRIES";

/// A single country in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountryEntry {
    code: &'static str,
    display_name: &'static str,
    continent: Continent,
}

impl CountryEntry {
    /// The entry's country code.
    #[must_use]
    pub fn code(&self) -> CountryCode {
        CountryCode::from_static(self.code)
    }

    /// The country code as a string slice.
    #[must_use]
    pub const fn code_str(&self) -> &'static str {
        self.code
    }

    /// English display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// Continent the country is grouped under.
    #[must_use]
    pub const fn continent(&self) -> Continent {
        self.continent
    }
}

const fn entry(code: &'static str, display_name: &'static str, continent: Continent) -> CountryEntry {
    CountryEntry {
        code,
        display_name,
        continent,
    }
}

/// Every country the selector offers, grouped by continent.
pub static COUNTRIES: &[CountryEntry] = &[
    // Africa
    entry("DZ", "Algeria", Africa),
    entry("AO", "Angola", Africa),
    entry("BJ", "Benin", Africa),
    entry("BW", "Botswana", Africa),
    entry("BF", "Burkina Faso", Africa),
    entry("BI", "Burundi", Africa),
    entry("CM", "Cameroon", Africa),
    entry("CV", "Cape Verde", Africa),
    entry("CF", "Central African Republic", Africa),
    entry("TD", "Chad", Africa),
    entry("KM", "Comoros", Africa),
    entry("CG", "Republic of the Congo", Africa),
    entry("CD", "Democratic Republic of the Congo", Africa),
    entry("DJ", "Djibouti", Africa),
    entry("EG", "Egypt", Africa),
    entry("GQ", "Equatorial Guinea", Africa),
    entry("ER", "Eritrea", Africa),
    entry("SZ", "Eswatini", Africa),
    entry("ET", "Ethiopia", Africa),
    entry("GA", "Gabon", Africa),
    entry("GM", "Gambia", Africa),
    entry("GH", "Ghana", Africa),
    entry("GN", "Guinea", Africa),
    entry("GW", "Guinea-Bissau", Africa),
    entry("CI", "Ivory Coast", Africa),
    entry("KE", "Kenya", Africa),
    entry("LS", "Lesotho", Africa),
    entry("LR", "Liberia", Africa),
    entry("LY", "Libya", Africa),
    entry("MG", "Madagascar", Africa),
    entry("MW", "Malawi", Africa),
    entry("ML", "Mali", Africa),
    entry("MR", "Mauritania", Africa),
    entry("MU", "Mauritius", Africa),
    entry("MA", "Morocco", Africa),
    entry("MZ", "Mozambique", Africa),
    entry("NA", "Namibia", Africa),
    entry("NE", "Niger", Africa),
    entry("NG", "Nigeria", Africa),
    entry("RW", "Rwanda", Africa),
    entry("ST", "Sao Tome and Principe", Africa),
    entry("SN", "Senegal", Africa),
    entry("SC", "Seychelles", Africa),
    entry("SL", "Sierra Leone", Africa),
    entry("SO", "Somalia", Africa),
    entry("ZA", "South Africa", Africa),
    entry("SS", "South Sudan", Africa),
    entry("SD", "Sudan", Africa),
    entry("TZ", "Tanzania", Africa),
    entry("TG", "Togo", Africa),
    entry("TN", "Tunisia", Africa),
    entry("UG", "Uganda", Africa),
    entry("ZM", "Zambia", Africa),
    entry("ZW", "Zimbabwe", Africa),
    // Asia
    entry("AF", "Afghanistan", Asia),
    entry("AM", "Armenia", Asia),
    entry("AZ", "Azerbaijan", Asia),
    entry("BH", "Bahrain", Asia),
    entry("BD", "Bangladesh", Asia),
    entry("BT", "Bhutan", Asia),
    entry("BN", "Brunei", Asia),
    entry("KH", "Cambodia", Asia),
    entry("CN", "China", Asia),
    entry("CY", "Cyprus", Asia),
    entry("GE", "Georgia", Asia),
    entry("IN", "India", Asia),
    entry("ID", "Indonesia", Asia),
    entry("IR", "Iran", Asia),
    entry("IQ", "Iraq", Asia),
    entry("IL", "Israel", Asia),
    entry("JP", "Japan", Asia),
    entry("JO", "Jordan", Asia),
    entry("KZ", "Kazakhstan", Asia),
    entry("KW", "Kuwait", Asia),
    entry("KG", "Kyrgyzstan", Asia),
    entry("LA", "Laos", Asia),
    entry("LB", "Lebanon", Asia),
    entry("MY", "Malaysia", Asia),
    entry("MV", "Maldives", Asia),
    entry("MN", "Mongolia", Asia),
    entry("MM", "Myanmar", Asia),
    entry("NP", "Nepal", Asia),
    entry("KP", "North Korea", Asia),
    entry("OM", "Oman", Asia),
    entry("PK", "Pakistan", Asia),
    entry("PS", "Palestine", Asia),
    entry("PH", "Philippines", Asia),
    entry("QA", "Qatar", Asia),
    entry("SA", "Saudi Arabia", Asia),
    entry("SG", "Singapore", Asia),
    entry("KR", "South Korea", Asia),
    entry("LK", "Sri Lanka", Asia),
    entry("SY", "Syria", Asia),
    entry("TW", "Taiwan", Asia),
    entry("TJ", "Tajikistan", Asia),
    entry("TH", "Thailand", Asia),
    entry("TL", "Timor-Leste", Asia),
    entry("TM", "Turkmenistan", Asia),
    entry("AE", "United Arab Emirates", Asia),
    entry("UZ", "Uzbekistan", Asia),
    entry("VN", "Vietnam", Asia),
    entry("YE", "Yemen", Asia),
    // Europe
    entry("AL", "Albania", Europe),
    entry("AD", "Andorra", Europe),
    entry("AT", "Austria", Europe),
    entry("BY", "Belarus", Europe),
    entry("BE", "Belgium", Europe),
    entry("BA", "Bosnia and Herzegovina", Europe),
    entry("BG", "Bulgaria", Europe),
    entry("HR", "Croatia", Europe),
    entry("CZ", "Czech Republic", Europe),
    entry("DK", "Denmark", Europe),
    entry("EE", "Estonia", Europe),
    entry("FI", "Finland", Europe),
    entry("FR", "France", Europe),
    entry("DE", "Germany", Europe),
    entry("GR", "Greece", Europe),
    entry("HU", "Hungary", Europe),
    entry("IS", "Iceland", Europe),
    entry("IE", "Ireland", Europe),
    entry("IT", "Italy", Europe),
    entry("LV", "Latvia", Europe),
    entry("LI", "Liechtenstein", Europe),
    entry("LT", "Lithuania", Europe),
    entry("LU", "Luxembourg", Europe),
    entry("MT", "Malta", Europe),
    entry("MD", "Moldova", Europe),
    entry("MC", "Monaco", Europe),
    entry("ME", "Montenegro", Europe),
    entry("NL", "Netherlands", Europe),
    entry("MK", "North Macedonia", Europe),
    entry("NO", "Norway", Europe),
    entry("PL", "Poland", Europe),
    entry("PT", "Portugal", Europe),
    entry("RO", "Romania", Europe),
    entry("RU", "Russia", Europe),
    entry("SM", "San Marino", Europe),
    entry("RS", "Serbia", Europe),
    entry("SK", "Slovakia", Europe),
    entry("SI", "Slovenia", Europe),
    entry("ES", "Spain", Europe),
    entry("SE", "Sweden", Europe),
    entry("CH", "Switzerland", Europe),
    entry("UA", "Ukraine", Europe),
    entry("GB", "United Kingdom", Europe),
    entry("VA", "Vatican City", Europe),
    // North America
    entry("AG", "Antigua and Barbuda", NorthAmerica),
    entry("BS", "Bahamas", NorthAmerica),
    entry("BB", "Barbados", NorthAmerica),
    entry("BZ", "Belize", NorthAmerica),
    entry("CA", "Canada", NorthAmerica),
    entry("CR", "Costa Rica", NorthAmerica),
    entry("CU", "Cuba", NorthAmerica),
    entry("DM", "Dominica", NorthAmerica),
    entry("DO", "Dominican Republic", NorthAmerica),
    entry("SV", "El Salvador", NorthAmerica),
    entry("GD", "Grenada", NorthAmerica),
    entry("GT", "Guatemala", NorthAmerica),
    entry("HT", "Haiti", NorthAmerica),
    entry("HN", "Honduras", NorthAmerica),
    entry("JM", "Jamaica", NorthAmerica),
    entry("MX", "Mexico", NorthAmerica),
    entry("NI", "Nicaragua", NorthAmerica),
    entry("PA", "Panama", NorthAmerica),
    entry("KN", "Saint Kitts and Nevis", NorthAmerica),
    entry("LC", "Saint Lucia", NorthAmerica),
    entry("VC", "Saint Vincent and the Grenadines", NorthAmerica),
    entry("TT", "Trinidad and Tobago", NorthAmerica),
    entry("US", "United States", NorthAmerica),
    // South America
    entry("AR", "Argentina", SouthAmerica),
    entry("BO", "Bolivia", SouthAmerica),
    entry("BR", "Brazil", SouthAmerica),
    entry("CL", "Chile", SouthAmerica),
    entry("CO", "Colombia", SouthAmerica),
    entry("EC", "Ecuador", SouthAmerica),
    entry("GY", "Guyana", SouthAmerica),
    entry("PY", "Paraguay", SouthAmerica),
    entry("PE", "Peru", SouthAmerica),
    entry("SR", "Suriname", SouthAmerica),
    entry("UY", "Uruguay", SouthAmerica),
    entry("VE", "Venezuela", SouthAmerica),
    // Oceania
    entry("AU", "Australia", Oceania),
    entry("FJ", "Fiji", Oceania),
    entry("KI", "Kiribati", Oceania),
    entry("MH", "Marshall Islands", Oceania),
    entry("FM", "Micronesia", Oceania),
    entry("NR", "Nauru", Oceania),
    entry("NZ", "New Zealand", Oceania),
    entry("PW", "Palau", Oceania),
    entry("PG", "Papua New Guinea", Oceania),
    entry("WS", "Samoa", Oceania),
    entry("SB", "Solomon Islands", Oceania),
    entry("TO", "Tonga", Oceania),
    entry("TV", "Tuvalu", Oceania),
    entry("VU", "Vanuatu", Oceania),
];

static STANDARD: LazyLock<Catalog> = LazyLock::new(|| Catalog::from_entries(COUNTRIES));

/// Countries belonging to one continent, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContinentGroup {
    /// The continent.
    pub continent: Continent,
    /// Member codes in catalog order.
    pub codes: Vec<CountryCode>,
}

/// One of the selector's special "Quick Select" options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickSelectOption {
    /// Label shown in the select control.
    pub label: String,
    /// Selector value submitted when the option is picked.
    pub value: &'static str,
}

/// Read-only lookups over a list of [`CountryEntry`] values.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: &'static [CountryEntry],
    index: HashMap<&'static str, usize>,
}

impl Catalog {
    /// The built-in catalog of 195 countries.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Build a catalog over static entries.
    ///
    /// If a code appears more than once, lookups resolve to the first entry.
    #[must_use]
    pub fn from_entries(entries: &'static [CountryEntry]) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            index.entry(entry.code).or_insert(position);
        }
        Self { entries, index }
    }

    /// All entries in declaration order.
    #[must_use]
    pub const fn entries(&self) -> &'static [CountryEntry] {
        self.entries
    }

    /// Number of countries in the catalog.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a country by code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Option<&'static CountryEntry> {
        self.index
            .get(code)
            .and_then(|&position| self.entries.get(position))
    }

    /// Whether the code is in the catalog.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Entries of one continent, in declaration order.
    pub fn by_continent(
        &self,
        continent: Continent,
    ) -> impl Iterator<Item = &'static CountryEntry> + '_ {
        self.entries
            .iter()
            .filter(move |entry| entry.continent == continent)
    }

    /// Codes of one continent, in declaration order.
    #[must_use]
    pub fn continent_codes(&self, continent: Continent) -> Vec<CountryCode> {
        self.by_continent(continent).map(CountryEntry::code).collect()
    }

    /// Every code in declaration order.
    #[must_use]
    pub fn all_codes(&self) -> Vec<CountryCode> {
        self.entries.iter().map(CountryEntry::code).collect()
    }

    /// Display label for a code, falling back to the raw code when unknown.
    #[must_use]
    pub fn label_for<'a>(&self, code: &'a str) -> &'a str {
        self.by_code(code).map_or(code, |entry| entry.display_name)
    }

    /// The continent groups, one per continent in declaration order.
    #[must_use]
    pub fn groups(&self) -> Vec<ContinentGroup> {
        Continent::ALL
            .into_iter()
            .map(|continent| ContinentGroup {
                continent,
                codes: self.continent_codes(continent),
            })
            .collect()
    }

    /// The selector's "Quick Select" options.
    #[must_use]
    pub fn quick_select_options() -> Vec<QuickSelectOption> {
        std::iter::once(QuickSelectOption {
            label: "Select All Countries".to_string(),
            value: ALL_COUNTRIES_VALUE,
        })
        .chain(Continent::ALL.into_iter().map(|continent| QuickSelectOption {
            label: format!("All {continent}"),
            value: continent.selector_value(),
        }))
        .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_codes_are_unique_and_well_formed() {
        let mut seen = HashSet::new();
        for entry in COUNTRIES {
            assert!(seen.insert(entry.code), "duplicate code {}", entry.code);
            assert_eq!(
                CountryCode::parse(entry.code).unwrap().as_str(),
                entry.code,
                "code {} is not a canonical alpha-2 code",
                entry.code
            );
        }
    }

    #[test]
    fn test_continent_sizes() {
        let catalog = Catalog::standard();
        let count = |continent| catalog.by_continent(continent).count();
        assert_eq!(count(Africa), 54);
        assert_eq!(count(Asia), 48);
        assert_eq!(count(Europe), 44);
        assert_eq!(count(NorthAmerica), 23);
        assert_eq!(count(SouthAmerica), 12);
        assert_eq!(count(Oceania), 14);
        assert_eq!(catalog.len(), 195);
    }

    #[test]
    fn test_groups_cover_catalog() {
        let catalog = Catalog::standard();
        let grouped: Vec<CountryCode> = catalog
            .groups()
            .into_iter()
            .flat_map(|group| group.codes)
            .collect();
        assert_eq!(grouped.len(), catalog.len());
        for code in &grouped {
            assert!(catalog.contains(code.as_str()));
        }
    }

    #[test]
    fn test_by_code() {
        let catalog = Catalog::standard();
        let germany = catalog.by_code("DE").unwrap();
        assert_eq!(germany.display_name(), "Germany");
        assert_eq!(germany.continent(), Europe);
        assert!(catalog.by_code("XX").is_none());
    }

    #[test]
    fn test_by_continent_keeps_declaration_order() {
        let codes = Catalog::standard().continent_codes(SouthAmerica);
        let first_three: Vec<&str> = codes.iter().take(3).map(CountryCode::as_str).collect();
        assert_eq!(first_three, ["AR", "BO", "BR"]);
    }

    #[test]
    fn test_label_falls_back_to_code() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.label_for("FR"), "France");
        assert_eq!(catalog.label_for("XK"), "XK");
    }

    #[test]
    fn test_all_codes_exclude_selector_values() {
        let codes = Catalog::standard().all_codes();
        assert!(codes.iter().all(|code| !code.as_str().starts_with("ALL")));
        assert_eq!(codes.first().unwrap(), "DZ");
        assert_eq!(codes.last().unwrap(), "VU");
    }

    #[test]
    fn test_quick_select_options() {
        let options = Catalog::quick_select_options();
        assert_eq!(options.len(), 7);
        assert_eq!(options.first().unwrap().value, ALL_COUNTRIES_VALUE);
        assert!(
            options
                .iter()
                .any(|option| option.value == "ALL_NORTH_AMERICA"
                    && option.label == "All North America")
        );
    }
}

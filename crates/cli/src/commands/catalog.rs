//! Country catalog listing.
//!
//! # Usage
//!
//! ```bash
//! # Every country, grouped by continent
//! cb-cli catalog
//!
//! # One continent
//! cb-cli catalog --continent europe
//! ```

use std::fmt::Write as _;

use country_blocker_core::{Catalog, Continent};

/// Render the catalog, optionally restricted to one continent.
#[must_use]
pub fn render(catalog: &Catalog, continent: Option<Continent>) -> String {
    let continents: Vec<Continent> = continent.map_or_else(|| Continent::ALL.to_vec(), |c| vec![c]);

    let mut out = String::new();
    for continent in continents {
        let entries: Vec<_> = catalog.by_continent(continent).collect();
        let _ = writeln!(
            out,
            "{} ({}, {} countries)",
            continent.display_name(),
            continent.selector_value(),
            entries.len()
        );
        for entry in entries {
            let _ = writeln!(out, "  {}  {}", entry.code_str(), entry.display_name());
        }
    }

    if continent.is_none() {
        let _ = writeln!(out, "Total: {} countries", catalog.len());
    }

    out
}

/// Print the catalog.
#[allow(clippy::print_stdout)]
pub fn list(continent: Option<Continent>) {
    print!("{}", render(Catalog::standard(), continent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_continent() {
        let out = render(Catalog::standard(), Some(Continent::Europe));
        assert!(out.starts_with("Europe (ALL_EUROPE, 44 countries)"));
        assert!(out.contains("  DE  Germany"));
        assert!(!out.contains("Total:"));
        assert!(!out.contains("Asia"));
    }

    #[test]
    fn test_render_everything() {
        let out = render(Catalog::standard(), None);
        for continent in Continent::ALL {
            assert!(out.contains(continent.selector_value()));
        }
        assert!(out.ends_with(&format!("Total: {} countries\n", Catalog::standard().len())));
    }
}

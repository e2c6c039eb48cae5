//! Shop metafields used for persistence.

use serde::Serialize;

/// Location and type of a shop metafield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MetafieldKey {
    pub namespace: &'static str,
    pub key: &'static str,
    /// Shopify metafield type (`json`, `boolean`, ...).
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl MetafieldKey {
    /// The blocked-country selection, a JSON array of codes.
    pub const SELECTED_COUNTRIES: Self = Self {
        namespace: "countryselector",
        key: "selected-country",
        kind: "json",
    };

    /// Whether storefront keyboard shortcuts are suppressed.
    pub const SHORTCUTS_DISABLED: Self = Self {
        namespace: "keyboardshortcuts",
        key: "disabled",
        kind: "boolean",
    };
}

impl std::fmt::Display for MetafieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace, self.key)
    }
}

/// Decode the shortcut flag. Missing or unparsable values read as `false`.
#[must_use]
pub fn parse_shortcut_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

/// Encode the shortcut flag as a metafield value.
#[must_use]
pub const fn shortcut_flag_value(enabled: bool) -> &'static str {
    if enabled { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_flag() {
        assert!(parse_shortcut_flag(Some("true")));
        assert!(parse_shortcut_flag(Some(" TRUE ")));
        assert!(!parse_shortcut_flag(Some("false")));
        assert!(!parse_shortcut_flag(Some("yes")));
        assert!(!parse_shortcut_flag(None));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(
            MetafieldKey::SELECTED_COUNTRIES.to_string(),
            "countryselector.selected-country"
        );
        assert_eq!(MetafieldKey::SHORTCUTS_DISABLED.kind, "boolean");
    }
}

//! ISO 3166-1 alpha-2 country code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// The input string is empty (after trimming).
    #[error("country code cannot be empty")]
    Empty,
    /// The input is not exactly two characters long.
    #[error("country code must be exactly 2 letters (got {len})")]
    InvalidLength {
        /// Length of the rejected input, in characters.
        len: usize,
    },
    /// The input contains something other than ASCII letters.
    #[error("country code must contain only ASCII letters")]
    NonAlphabetic,
}

/// A two-letter ISO 3166-1 alpha-2 country code.
///
/// Codes are normalized to uppercase on parse, so `"de"` and `" DE "` both
/// produce `DE`. Only the shape is validated: a well-formed code that is not
/// in the [`Catalog`](crate::Catalog) is still a valid `CountryCode`.
///
/// ## Examples
///
/// ```
/// use country_blocker_core::CountryCode;
///
/// assert_eq!(CountryCode::parse("fr").unwrap().as_str(), "FR");
/// assert!(CountryCode::parse("").is_err());
/// assert!(CountryCode::parse("FRA").is_err());
/// assert!(CountryCode::parse("F1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a `CountryCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, is not two characters
    /// long, or contains non-ASCII-letter characters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CountryCodeError::Empty);
        }

        let len = trimmed.chars().count();
        if len != 2 {
            return Err(CountryCodeError::InvalidLength { len });
        }

        if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryCodeError::NonAlphabetic);
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Wrap a code from the static catalog, which is validated by tests.
    pub(crate) fn from_static(code: &'static str) -> Self {
        Self(code.to_owned())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `CountryCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CountryCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CountryCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_codes() {
        assert_eq!(CountryCode::parse("US").unwrap().as_str(), "US");
        assert_eq!(CountryCode::parse("de").unwrap().as_str(), "DE");
        assert_eq!(CountryCode::parse(" gb ").unwrap().as_str(), "GB");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(CountryCode::parse(""), Err(CountryCodeError::Empty));
        assert_eq!(CountryCode::parse("   "), Err(CountryCodeError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            CountryCode::parse("USA"),
            Err(CountryCodeError::InvalidLength { len: 3 })
        );
        assert_eq!(
            CountryCode::parse("U"),
            Err(CountryCodeError::InvalidLength { len: 1 })
        );
    }

    #[test]
    fn test_parse_non_alphabetic() {
        assert_eq!(
            CountryCode::parse("U1"),
            Err(CountryCodeError::NonAlphabetic)
        );
        assert_eq!(
            CountryCode::parse("Üs"),
            Err(CountryCodeError::NonAlphabetic)
        );
    }

    #[test]
    fn test_serde_is_plain_string() {
        let code = CountryCode::parse("FR").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"FR\"");

        let parsed: CountryCode = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(parsed, code);
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        assert!(serde_json::from_str::<CountryCode>("\"France\"").is_err());
        assert!(serde_json::from_str::<CountryCode>("42").is_err());
    }

    #[test]
    fn test_compare_with_str() {
        let code = CountryCode::parse("ca").unwrap();
        assert_eq!(code, "CA");
        assert_eq!(format!("{code}"), "CA");
    }
}

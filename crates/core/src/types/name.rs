//! Normalized natural-key names.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`NameKey`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum NameError {
    /// The input string is empty (or whitespace only).
    #[error("name cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A normalized name used as a natural key.
///
/// Tag names, keyword names and spot category names are looked up by value,
/// so the same logical name must always compare equal no matter how a caller
/// typed it. `NameKey` guarantees that by trimming surrounding whitespace and
/// lower-casing at the boundary; every lookup and every stored value goes
/// through this type.
///
/// ## Constraints
///
/// - Must not be empty after trimming
/// - At most 120 characters after trimming
///
/// ## Examples
///
/// ```
/// use trailmark_core::NameKey;
///
/// let a = NameKey::parse("  Ocean ").unwrap();
/// let b = NameKey::parse("ocean").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "ocean");
///
/// assert!(NameKey::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct NameKey(String);

impl NameKey {
    /// Maximum length of a name in characters.
    pub const MAX_LENGTH: usize = 120;

    /// Parse a `NameKey` from raw caller input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty after trimming, or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, NameError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the normalized name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `NameKey` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NameKey {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for NameKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for NameKey {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::postgres::PgHasArrayType for NameKey {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::postgres::PgHasArrayType>::array_type_info()
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for NameKey {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are stored normalized
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for NameKey {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases() {
        assert_eq!(NameKey::parse("Hiking").unwrap().as_str(), "hiking");
        assert_eq!(NameKey::parse("OCEAN").unwrap().as_str(), "ocean");
        assert_eq!(NameKey::parse("ocean").unwrap().as_str(), "ocean");
    }

    #[test]
    fn test_parse_trims() {
        assert_eq!(NameKey::parse("  beach  ").unwrap().as_str(), "beach");
        assert_eq!(NameKey::parse("\tsunset\n").unwrap().as_str(), "sunset");
    }

    #[test]
    fn test_mixed_case_compares_equal() {
        assert_eq!(
            NameKey::parse("Camping").unwrap(),
            NameKey::parse("camping").unwrap()
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(NameKey::parse(""), Err(NameError::Empty)));
        assert!(matches!(NameKey::parse("   "), Err(NameError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(NameKey::MAX_LENGTH + 1);
        assert!(matches!(
            NameKey::parse(&long),
            Err(NameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_max_length_ok() {
        let max = "a".repeat(NameKey::MAX_LENGTH);
        assert!(NameKey::parse(&max).is_ok());
    }

    #[test]
    fn test_preserves_interior_whitespace() {
        assert_eq!(
            NameKey::parse("Rock Climbing").unwrap().as_str(),
            "rock climbing"
        );
    }

    #[test]
    fn test_display() {
        let name = NameKey::parse("Sunset").unwrap();
        assert_eq!(format!("{name}"), "sunset");
    }

    #[test]
    fn test_serde_roundtrip() {
        let name = NameKey::parse("Hiking").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"hiking\"");

        let parsed: NameKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn test_from_str() {
        let name: NameKey = "Viewpoint".parse().unwrap();
        assert_eq!(name.as_str(), "viewpoint");
    }
}

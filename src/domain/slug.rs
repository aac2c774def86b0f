use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// A validated identifier containing only lowercase ASCII letters, digits and
/// underscores (`[a-z0-9_]+`).
///
/// Every revision of an award or essay prompt carries the same slug, e.g.
/// `ean_hong` or `newmember_coe_friends`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(NonEmptyString);

impl Slug {
    /// Creates a new `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlugError` if the string is empty or contains
    /// characters other than lowercase letters, digits and underscores.
    pub fn new(s: String) -> Result<Self, InvalidSlugError> {
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(InvalidSlugError(s));
        }

        NonEmptyString::new(s).map(Self).map_err(InvalidSlugError)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the slug begins with the given prefix.
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }
}

impl TryFrom<String> for Slug {
    type Error = InvalidSlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Slug {
    type Error = InvalidSlugError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0.into_inner()
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Slug {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Slug {
    type Err = InvalidSlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Error returned when a string doesn't match the required pattern
/// `[a-z0-9_]+`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "Invalid slug '{0}': must be non-empty and contain only lowercase letters, digits and underscores"
)]
pub struct InvalidSlugError(String);

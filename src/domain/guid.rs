//! Opaque identifier assigned by the remote note service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque, non-empty identifier for notes and attachments.
///
/// The remote service owns the format; the only local requirement is that it
/// is non-empty and stable across fetches. Attachment identities are also used
/// verbatim as file stems on disk.
///
/// # Examples
///
/// ```
/// use noteport::domain::Guid;
///
/// let guid: Guid = "abc123".parse().unwrap();
/// assert_eq!(guid.as_str(), "abc123");
/// assert!("".parse::<Guid>().is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid(String);

impl Guid {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid(\"{}\")", self.0)
    }
}

impl AsRef<str> for Guid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error returned when parsing an empty or malformed identifier.
#[derive(Debug, Clone)]
pub struct ParseGuidError {
    value: String,
    reason: &'static str,
}

impl ParseGuidError {
    /// Returns the invalid value that caused this error.
    pub fn invalid_value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseGuidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid identifier '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for ParseGuidError {}

impl FromStr for Guid {
    type Err = ParseGuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseGuidError {
                value: s.to_string(),
                reason: "identifier cannot be empty",
            });
        }
        // Attachment identities become file names, so path syntax is refused.
        if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
            return Err(ParseGuidError {
                value: s.to_string(),
                reason: "identifier cannot contain path separators",
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Serialize for Guid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Guid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

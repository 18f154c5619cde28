//! Validated newtype wrappers for resource identity.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated resource name.
///
/// Names are normalized (surrounding whitespace trimmed, lowercased) and must
/// then consist of 4 to 15 lowercase ASCII letters. The same rule applies to
/// a resource's own name and to the parent name it refers to.
///
/// # Serialization
///
/// `ResourceName` serializes to its normalized string and re-validates on
/// deserialization:
///
/// ```rust
/// use apify::ResourceName;
///
/// let name = ResourceName::new(" Users ").unwrap();
/// let json = serde_json::to_string(&name).unwrap();
/// assert_eq!(json, r#""users""#);
/// ```
///
/// # Example
///
/// ```rust
/// use apify::ResourceName;
///
/// let name = ResourceName::new("Users").unwrap();
/// assert_eq!(name.as_ref(), "users");
///
/// assert!(ResourceName::new("ab").is_err());
/// assert!(ResourceName::new("posts2").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceName(String);

impl ResourceName {
    /// Shortest accepted name, in letters.
    pub const MIN_LEN: usize = 4;
    /// Longest accepted name, in letters.
    pub const MAX_LEN: usize = 15;

    /// Creates a new validated resource name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidName`] if the normalized name is not
    /// 4 to 15 lowercase ASCII letters.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ConfigError> {
        let name = name.as_ref().trim().to_lowercase();

        if !Self::is_valid(&name) {
            return Err(ConfigError::InvalidName { name });
        }

        Ok(Self(name))
    }

    fn is_valid(name: &str) -> bool {
        (Self::MIN_LEN..=Self::MAX_LEN).contains(&name.len())
            && name.bytes().all(|b| b.is_ascii_lowercase())
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ResourceName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ResourceName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated resource description.
///
/// Descriptions feed the generated API documentation and must be longer than
/// 15 and shorter than 200 characters. Length is counted in characters, not
/// bytes, and the text is kept exactly as given.
///
/// # Example
///
/// ```rust
/// use apify::Description;
///
/// let description = Description::new("Registered platform users").unwrap();
/// assert_eq!(description.as_ref(), "Registered platform users");
///
/// assert!(Description::new("short").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    /// Exclusive lower bound on the description length.
    pub const MIN_EXCLUSIVE: usize = 15;
    /// Exclusive upper bound on the description length.
    pub const MAX_EXCLUSIVE: usize = 200;

    /// Creates a new validated description.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDescription`] if the description has 15
    /// characters or fewer, or 200 characters or more.
    pub fn new(description: impl Into<String>) -> Result<Self, ConfigError> {
        let description = description.into();
        let length = description.chars().count();

        if length <= Self::MIN_EXCLUSIVE || length >= Self::MAX_EXCLUSIVE {
            return Err(ConfigError::InvalidDescription { length });
        }

        Ok(Self(description))
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Description {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Description {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

//! Error types for resource configuration.
//!
//! This module contains the errors raised while a resource is being
//! described: name and description validation, write-once violations and
//! incomplete definitions.
//!
//! # Error Handling
//!
//! Every setter returns `Result<(), ConfigError>`. A failed setter leaves the
//! resource untouched, so the caller can retry with corrected input.
//!
//! # Example
//!
//! ```rust
//! use apify::{ConfigError, ResourceName};
//!
//! let result = ResourceName::new("ab");
//! assert!(matches!(result, Err(ConfigError::InvalidName { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a resource.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Resource name does not match `^[a-z]{4,15}$` once trimmed and lowercased.
    #[error("Invalid resource name '{name}'. Names must be 4 to 15 lowercase ASCII letters.")]
    InvalidName {
        /// The normalized name that was rejected.
        name: String,
    },

    /// Description length is outside the accepted bounds.
    #[error("Invalid description of {length} characters. Descriptions must be longer than 15 and shorter than 200 characters.")]
    InvalidDescription {
        /// The length, in characters, of the rejected description.
        length: usize,
    },

    /// A name (or parent name) was already assigned to the resource.
    #[error("Name already set to '{current}' and cannot be changed.")]
    NameAlreadySet {
        /// The value that is already recorded.
        current: String,
    },

    /// The description was already assigned to the resource.
    #[error("Description already set and cannot be changed.")]
    DescriptionAlreadySet,

    /// A collaborator or configuration slot was already assigned.
    #[error("Field '{field}' already set and cannot be changed.")]
    AlreadySet {
        /// The name of the field.
        field: &'static str,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the resource.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The resource allows no mode at all.
    #[error("Resource '{name}' allows no mode. At least one mode must be allowed.")]
    NoAllowedModes {
        /// The resource name.
        name: String,
    },
}

// Verify ConfigError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConfigError>();
};

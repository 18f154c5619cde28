//! Configuration types for resources.
//!
//! This module provides the per-resource configuration and the validated
//! identity newtypes.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ResourceConf`]: The allowed modes and pagination settings of a resource
//! - [`ResourceConfBuilder`]: A builder for constructing [`ResourceConf`] instances
//! - [`ResourceName`]: A validated resource name newtype
//! - [`Description`]: A validated resource description newtype
//!
//! # Example
//!
//! ```rust
//! use apify::{Mode, ResourceConf};
//!
//! let conf = ResourceConf::builder()
//!     .allowed_modes(Mode::READ_ONLY)
//!     .allow(Mode::Search)
//!     .pagination_default_limit(50)
//!     .build();
//!
//! assert!(conf.is_mode_allowed(Mode::Search));
//! assert!(!conf.is_mode_allowed(Mode::Create));
//! ```

mod newtypes;

pub use newtypes::{Description, ResourceName};

use serde::{Deserialize, Serialize};

use crate::rest::Mode;

/// Configuration of a single resource.
///
/// # Defaults
///
/// [`ResourceConf::default`] allows every mode except [`Mode::Search`] and
/// sets a default page size of 20 items.
///
/// # Example
///
/// ```rust
/// use apify::{Mode, ResourceConf};
///
/// let conf = ResourceConf::default();
/// assert!(conf.is_mode_allowed(Mode::List));
/// assert!(!conf.is_mode_allowed(Mode::Search));
/// assert_eq!(conf.pagination_default_limit(), 20);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConf {
    allowed_modes: Vec<Mode>,
    pagination_default_limit: usize,
}

impl ResourceConf {
    /// Default number of items per page.
    pub const DEFAULT_PAGINATION_LIMIT: usize = 20;

    /// Creates a new builder starting from the default configuration.
    #[must_use]
    pub fn builder() -> ResourceConfBuilder {
        ResourceConfBuilder::new()
    }

    /// Returns `true` if `mode` is in the allowed set.
    #[must_use]
    pub fn is_mode_allowed(&self, mode: Mode) -> bool {
        self.allowed_modes.contains(&mode)
    }

    /// Returns the allowed modes, in configuration order.
    #[must_use]
    pub fn allowed_modes(&self) -> &[Mode] {
        &self.allowed_modes
    }

    /// Returns the page size applied when a list request has no `limit`.
    ///
    /// Zero disables default pagination.
    #[must_use]
    pub const fn pagination_default_limit(&self) -> usize {
        self.pagination_default_limit
    }
}

impl Default for ResourceConf {
    fn default() -> Self {
        Self {
            allowed_modes: Mode::READ_WRITE.to_vec(),
            pagination_default_limit: Self::DEFAULT_PAGINATION_LIMIT,
        }
    }
}

// Verify ResourceConf is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceConf>();
};

/// Builder for constructing [`ResourceConf`] instances.
///
/// The builder starts from [`ResourceConf::default`]. Calling
/// [`allowed_modes`](Self::allowed_modes) replaces the whole set, while
/// [`allow`](Self::allow) and [`deny`](Self::deny) adjust it.
///
/// # Example
///
/// ```rust
/// use apify::{Mode, ResourceConf};
///
/// // Keep the defaults but forbid bulk deletion
/// let conf = ResourceConf::builder().deny(Mode::Clear).build();
/// assert!(!conf.is_mode_allowed(Mode::Clear));
/// assert!(conf.is_mode_allowed(Mode::Delete));
///
/// // Deny everything
/// let conf = ResourceConf::builder().allowed_modes(&[]).build();
/// assert!(conf.allowed_modes().is_empty());
/// ```
#[derive(Debug)]
pub struct ResourceConfBuilder {
    allowed_modes: Vec<Mode>,
    pagination_default_limit: usize,
}

impl ResourceConfBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        let ResourceConf {
            allowed_modes,
            pagination_default_limit,
        } = ResourceConf::default();
        Self {
            allowed_modes,
            pagination_default_limit,
        }
    }

    /// Replaces the allowed modes.
    #[must_use]
    pub fn allowed_modes(mut self, modes: &[Mode]) -> Self {
        self.allowed_modes = modes.to_vec();
        self
    }

    /// Adds a mode to the allowed set.
    #[must_use]
    pub fn allow(mut self, mode: Mode) -> Self {
        if !self.allowed_modes.contains(&mode) {
            self.allowed_modes.push(mode);
        }
        self
    }

    /// Removes a mode from the allowed set.
    #[must_use]
    pub fn deny(mut self, mode: Mode) -> Self {
        self.allowed_modes.retain(|m| *m != mode);
        self
    }

    /// Sets the default page size for list requests.
    #[must_use]
    pub const fn pagination_default_limit(mut self, limit: usize) -> Self {
        self.pagination_default_limit = limit;
        self
    }

    /// Builds the [`ResourceConf`].
    #[must_use]
    pub fn build(self) -> ResourceConf {
        ResourceConf {
            allowed_modes: self.allowed_modes,
            pagination_default_limit: self.pagination_default_limit,
        }
    }
}

impl Default for ResourceConfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

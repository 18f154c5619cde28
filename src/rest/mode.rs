//! The CRUDL mode vocabulary.
//!
//! A [`Mode`] names one logical operation a resource can expose. Modes keep
//! stable integer codes (`Create` is 0, `Search` is 7) so that they can be
//! stored or transmitted compactly; [`Mode::try_from`] rejects any other code.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rest::RouteError;

/// A logical operation on a resource.
///
/// # Example
///
/// ```rust
/// use apify::Mode;
///
/// assert_eq!(Mode::try_from(7).unwrap(), Mode::Search);
/// assert!(Mode::try_from(8).is_err());
/// assert!(!Mode::READ_WRITE.contains(&Mode::Search));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// POST on the collection URL.
    Create,
    /// GET on an item URL.
    Read,
    /// PATCH on an item URL.
    Update,
    /// PUT on an existing item URL.
    Replace,
    /// DELETE on an item URL.
    Delete,
    /// DELETE on the collection URL.
    Clear,
    /// GET on the collection URL.
    List,
    /// GET on the collection URL with query parameters.
    Search,
}

impl Mode {
    /// Every mode, in code order.
    pub const ALL: &'static [Self] = &[
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Replace,
        Self::Delete,
        Self::Clear,
        Self::List,
        Self::Search,
    ];

    /// Every mode except [`Mode::Search`], which is opt-in.
    pub const READ_WRITE: &'static [Self] = &[
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Replace,
        Self::Delete,
        Self::List,
        Self::Clear,
    ];

    /// Read and List.
    pub const READ_ONLY: &'static [Self] = &[Self::Read, Self::List];

    /// Create, Update, Replace, Delete and Clear.
    pub const WRITE_ONLY: &'static [Self] = &[
        Self::Create,
        Self::Update,
        Self::Replace,
        Self::Delete,
        Self::Clear,
    ];

    /// Returns the stable integer code of this mode.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the mode name as a lowercase string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Replace => "replace",
            Self::Delete => "delete",
            Self::Clear => "clear",
            Self::List => "list",
            Self::Search => "search",
        }
    }

    /// Returns `true` if the mode addresses a single item (`<path>/:id`).
    #[must_use]
    pub const fn targets_item(self) -> bool {
        matches!(
            self,
            Self::Read | Self::Update | Self::Replace | Self::Delete
        )
    }

    /// Returns `true` if the mode carries an item body.
    #[must_use]
    pub const fn carries_body(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Replace)
    }
}

impl TryFrom<u8> for Mode {
    type Error = RouteError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(RouteError::UnsupportedMode { code })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

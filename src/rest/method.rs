//! HTTP methods and request shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rest::RouteError;

/// HTTP methods understood by the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET method for reading items and collections.
    Get,
    /// HTTP POST method for creating items.
    Post,
    /// HTTP PUT method for replacing items.
    Put,
    /// HTTP PATCH method for partially updating items.
    Patch,
    /// HTTP DELETE method for removing items or whole collections.
    Delete,
}

impl HttpMethod {
    /// Returns the method token as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a method token. Method tokens are case-sensitive.
///
/// # Example
///
/// ```rust
/// use apify::HttpMethod;
///
/// assert_eq!("PATCH".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
/// assert!("patch".parse::<HttpMethod>().is_err());
/// assert!("OPTIONS".parse::<HttpMethod>().is_err());
/// ```
impl FromStr for HttpMethod {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(RouteError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// The request shape a mode maps to.
///
/// A shape is the minimal signal available from a routed request before any
/// body inspection: the verb, whether an item identifier is part of the URL,
/// and whether query parameters are present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodShape {
    /// The HTTP method.
    pub http_method: HttpMethod,
    /// Whether the request targets `<path>/:id` rather than `<path>`.
    pub id_required: bool,
    /// Whether query parameters are required.
    pub query_required: bool,
}

impl MethodShape {
    /// Creates a new `MethodShape`.
    ///
    /// This is a `const fn` to allow shapes to be defined as constants.
    #[must_use]
    pub const fn new(http_method: HttpMethod, id_required: bool, query_required: bool) -> Self {
        Self {
            http_method,
            id_required,
            query_required,
        }
    }
}

impl fmt::Display for MethodShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}",
            self.http_method,
            if self.id_required { "item" } else { "collection" },
            if self.query_required { " ?query" } else { "" }
        )
    }
}

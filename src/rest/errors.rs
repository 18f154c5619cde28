//! Routing and hierarchy error types.
//!
//! [`RouteError`] covers failures to translate between modes and request
//! shapes. Every variant stems from the request or the resource
//! configuration, never from a system fault, so all of them map to a 4xx
//! status through [`RouteError::status_code`].
//!
//! [`PathError`] covers failures to walk a resource's ancestry.
//!
//! # Example
//!
//! ```rust
//! use apify::rest::{resolve_mode, RouteError};
//!
//! match resolve_mode("GET", true, true) {
//!     Err(e @ RouteError::UnresolvableRequestShape { .. }) => assert_eq!(e.status_code(), 400),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use thiserror::Error;

use crate::rest::{HttpMethod, Mode};

/// Error type for mode and method resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The mode code is outside the closed mode set.
    #[error("Unsupported mode code {code}")]
    UnsupportedMode {
        /// The rejected code.
        code: u8,
    },

    /// The HTTP method token is not one of GET, POST, PUT, PATCH or DELETE.
    #[error("Unsupported HTTP method '{method}'")]
    UnsupportedMethod {
        /// The rejected method token.
        method: String,
    },

    /// The method is known but no mode matches the identifier/query combination.
    #[error("Cannot handle {method} request with identifier={id_present} and query={query_present}")]
    UnresolvableRequestShape {
        /// The request method.
        method: HttpMethod,
        /// Whether the request addressed a single item.
        id_present: bool,
        /// Whether the request carried query parameters.
        query_present: bool,
    },

    /// The mode resolved but the resource does not allow it.
    #[error("Mode '{mode}' is not allowed on resource '{resource}'")]
    ModeNotAllowed {
        /// The resource name.
        resource: String,
        /// The resolved mode.
        mode: Mode,
    },
}

impl RouteError {
    /// Returns the HTTP status code to answer with.
    ///
    /// - Unknown verb or disallowed mode: 405
    /// - Unmapped request shape or unknown mode code: 400
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedMethod { .. } | Self::ModeNotAllowed { .. } => 405,
            Self::UnsupportedMode { .. } | Self::UnresolvableRequestShape { .. } => 400,
        }
    }
}

/// Error type for ancestry resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// An ancestor name could not be resolved through the lookup.
    #[error("Cannot derive path for '{resource}': ancestor '{ancestor}' is not registered")]
    UnresolvedAncestor {
        /// The resource whose path was requested.
        resource: String,
        /// The dangling ancestor name.
        ancestor: String,
    },

    /// The ancestry revisits a name already on the current chain.
    #[error("Cannot derive path for '{resource}': ancestry cycles through '{ancestor}'")]
    AncestryCycle {
        /// The resource whose path was requested.
        resource: String,
        /// The first name seen twice.
        ancestor: String,
    },
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RouteError>();
    assert_send_sync::<PathError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolvable_shape_formats_request_facts() {
        let error = RouteError::UnresolvableRequestShape {
            method: HttpMethod::Post,
            id_present: true,
            query_present: false,
        };
        let message = error.to_string();

        assert!(message.contains("POST"));
        assert!(message.contains("identifier=true"));
        assert!(message.contains("query=false"));
    }

    #[test]
    fn test_route_errors_are_client_errors() {
        let errors = [
            RouteError::UnsupportedMode { code: 9 },
            RouteError::UnsupportedMethod {
                method: "TRACE".to_string(),
            },
            RouteError::UnresolvableRequestShape {
                method: HttpMethod::Get,
                id_present: true,
                query_present: true,
            },
            RouteError::ModeNotAllowed {
                resource: "users".to_string(),
                mode: Mode::Search,
            },
        ];

        for error in errors {
            let code = error.status_code();
            assert!((400..500).contains(&code), "{error} mapped to {code}");
        }
    }

    #[test]
    fn test_unsupported_method_is_distinct_from_shape() {
        let unknown = RouteError::UnsupportedMethod {
            method: "HEAD".to_string(),
        };
        assert_eq!(unknown.status_code(), 405);
        assert!(unknown.to_string().contains("HEAD"));
    }

    #[test]
    fn test_path_error_messages() {
        let error = PathError::UnresolvedAncestor {
            resource: "posts".to_string(),
            ancestor: "users".to_string(),
        };
        assert!(error.to_string().contains("'users' is not registered"));

        let error = PathError::AncestryCycle {
            resource: "posts".to_string(),
            ancestor: "posts".to_string(),
        };
        assert!(error.to_string().contains("cycles through 'posts'"));
    }
}

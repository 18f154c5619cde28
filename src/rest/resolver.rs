//! Bidirectional translation between modes and request shapes.
//!
//! Two lookup tables drive the resolver: [`MODE_SHAPES`] maps every
//! [`Mode`] to its [`MethodShape`], and the reverse lookup scans the same
//! table for a matching triple. Because no two modes share a shape, the
//! reverse lookup is unambiguous and `resolve_mode(resolve_method_shape(m))`
//! always yields `m`.
//!
//! | Mode    | Method | Identifier | Query |
//! |---------|--------|------------|-------|
//! | Create  | POST   | no         | no    |
//! | Read    | GET    | yes        | no    |
//! | Update  | PATCH  | yes        | no    |
//! | Replace | PUT    | yes        | no    |
//! | Delete  | DELETE | yes        | no    |
//! | Clear   | DELETE | no         | no    |
//! | List    | GET    | no         | no    |
//! | Search  | GET    | no         | yes   |
//!
//! # Example
//!
//! ```rust
//! use apify::rest::{resolve_method_shape, resolve_mode};
//! use apify::{HttpMethod, Mode};
//!
//! let shape = resolve_method_shape(Mode::Clear).unwrap();
//! assert_eq!(shape.http_method, HttpMethod::Delete);
//! assert!(!shape.id_required);
//!
//! assert_eq!(resolve_mode("DELETE", false, false).unwrap(), Mode::Clear);
//! assert_eq!(resolve_mode("GET", false, true).unwrap(), Mode::Search);
//! ```

use crate::rest::{HttpMethod, MethodShape, Mode, RouteError};

/// The shape of every mode, in mode code order.
pub const MODE_SHAPES: &[(Mode, MethodShape)] = &[
    (Mode::Create, MethodShape::new(HttpMethod::Post, false, false)),
    (Mode::Read, MethodShape::new(HttpMethod::Get, true, false)),
    (Mode::Update, MethodShape::new(HttpMethod::Patch, true, false)),
    (Mode::Replace, MethodShape::new(HttpMethod::Put, true, false)),
    (Mode::Delete, MethodShape::new(HttpMethod::Delete, true, false)),
    (Mode::Clear, MethodShape::new(HttpMethod::Delete, false, false)),
    (Mode::List, MethodShape::new(HttpMethod::Get, false, false)),
    (Mode::Search, MethodShape::new(HttpMethod::Get, false, true)),
];

/// Returns the request shape for a mode.
///
/// # Errors
///
/// Returns [`RouteError::UnsupportedMode`] if the mode has no entry in
/// [`MODE_SHAPES`].
pub fn resolve_method_shape(mode: Mode) -> Result<MethodShape, RouteError> {
    MODE_SHAPES
        .iter()
        .find(|(m, _)| *m == mode)
        .map(|(_, shape)| *shape)
        .ok_or(RouteError::UnsupportedMode { code: mode.code() })
}

/// Resolves a raw method token and request facts to a mode.
///
/// # Errors
///
/// Returns [`RouteError::UnsupportedMethod`] if the token is not a known
/// verb, and [`RouteError::UnresolvableRequestShape`] if the verb is known
/// but no mode takes that identifier/query combination.
pub fn resolve_mode(
    method: &str,
    id_present: bool,
    query_present: bool,
) -> Result<Mode, RouteError> {
    let method: HttpMethod = method.parse()?;
    resolve_shape(MethodShape::new(method, id_present, query_present))
}

/// Resolves an already parsed request shape to a mode.
///
/// # Errors
///
/// Returns [`RouteError::UnresolvableRequestShape`] if no mode maps to `shape`.
pub fn resolve_shape(shape: MethodShape) -> Result<Mode, RouteError> {
    MODE_SHAPES
        .iter()
        .find(|(_, s)| *s == shape)
        .map(|(mode, _)| *mode)
        .ok_or(RouteError::UnresolvableRequestShape {
            method: shape.http_method,
            id_present: shape.id_required,
            query_present: shape.query_required,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_mode_has_a_shape() {
        for mode in Mode::ALL {
            assert!(resolve_method_shape(*mode).is_ok(), "{mode} has no shape");
        }
        assert_eq!(MODE_SHAPES.len(), Mode::ALL.len());
    }

    #[test]
    fn test_shapes_are_distinct() {
        let shapes: HashSet<MethodShape> = MODE_SHAPES.iter().map(|(_, s)| *s).collect();
        assert_eq!(shapes.len(), MODE_SHAPES.len());
    }

    #[test]
    fn test_shape_round_trips_to_mode() {
        for mode in Mode::ALL {
            let shape = resolve_method_shape(*mode).unwrap();
            let resolved = resolve_mode(
                shape.http_method.as_str(),
                shape.id_required,
                shape.query_required,
            )
            .unwrap();
            assert_eq!(resolved, *mode);
        }
    }

    #[test]
    fn test_get_disambiguation() {
        assert_eq!(resolve_mode("GET", true, false).unwrap(), Mode::Read);
        assert_eq!(resolve_mode("GET", false, true).unwrap(), Mode::Search);
        assert_eq!(resolve_mode("GET", false, false).unwrap(), Mode::List);
        assert_eq!(
            resolve_mode("GET", true, true),
            Err(RouteError::UnresolvableRequestShape {
                method: HttpMethod::Get,
                id_present: true,
                query_present: true,
            })
        );
    }

    #[test]
    fn test_post_only_creates_on_bare_collection() {
        assert_eq!(resolve_mode("POST", false, false).unwrap(), Mode::Create);
        for (id, query) in [(true, false), (false, true), (true, true)] {
            assert!(matches!(
                resolve_mode("POST", id, query),
                Err(RouteError::UnresolvableRequestShape { .. })
            ));
        }
    }

    #[test]
    fn test_put_and_patch_require_identifier() {
        assert_eq!(resolve_mode("PUT", true, false).unwrap(), Mode::Replace);
        assert_eq!(resolve_mode("PATCH", true, false).unwrap(), Mode::Update);
        for method in ["PUT", "PATCH"] {
            for (id, query) in [(false, false), (false, true), (true, true)] {
                assert!(matches!(
                    resolve_mode(method, id, query),
                    Err(RouteError::UnresolvableRequestShape { .. })
                ));
            }
        }
    }

    #[test]
    fn test_delete_item_or_collection() {
        assert_eq!(resolve_mode("DELETE", true, false).unwrap(), Mode::Delete);
        assert_eq!(resolve_mode("DELETE", false, false).unwrap(), Mode::Clear);
        assert!(matches!(
            resolve_mode("DELETE", false, true),
            Err(RouteError::UnresolvableRequestShape { .. })
        ));
        assert!(matches!(
            resolve_mode("DELETE", true, true),
            Err(RouteError::UnresolvableRequestShape { .. })
        ));
    }

    #[test]
    fn test_unknown_method_is_not_a_shape_error() {
        assert_eq!(
            resolve_mode("OPTIONS", false, false),
            Err(RouteError::UnsupportedMethod {
                method: "OPTIONS".to_string()
            })
        );
    }
}

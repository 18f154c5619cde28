//! Mode vocabulary, mode/method resolution and route derivation.
//!
//! This module decides two things:
//!
//! - given a logical operation, or the facts of a routed request, which
//!   [`Mode`] and HTTP method apply ([`resolve_method_shape`], [`resolve_mode`]);
//! - given a resource's ancestry, what its canonical path and routes are
//!   ([`derive_path`], [`routes_for`]).
//!
//! # Example
//!
//! ```rust
//! use apify::rest::{resolve_mode, routes_for, get_route};
//! use apify::{HttpMethod, Mode};
//!
//! let mode = resolve_mode("PATCH", true, false).unwrap();
//! assert_eq!(mode, Mode::Update);
//!
//! let routes = routes_for("/users", Mode::READ_WRITE).unwrap();
//! let route = get_route(&routes, mode).unwrap();
//! assert_eq!(route.http_method, HttpMethod::Patch);
//! assert_eq!(route.template, "/users/:id");
//! ```

mod errors;
mod method;
mod mode;
mod path;
mod resolver;

pub use errors::{PathError, RouteError};
pub use method::{HttpMethod, MethodShape};
pub use mode::Mode;
pub use path::{
    build_path, collection_path, derive_path, get_route, item_path, routes_for, AncestryLookup,
    Route, ID_PLACEHOLDER,
};
pub use resolver::{resolve_method_shape, resolve_mode, resolve_shape, MODE_SHAPES};

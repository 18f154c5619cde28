//! Hierarchical path derivation and route templates.
//!
//! A resource's path is derived from its chain of parents. Every ancestor
//! contributes a `/<name>/:id` segment, root-most first, and the resource
//! itself contributes the final `/<name>` segment:
//!
//! - `users` (root) → `/users`
//! - `posts` under `users` → `/users/:id/posts`
//! - `users` under `teams` under `orgs` → `/orgs/:id/teams/:id/users`
//!
//! Parents are referenced by name and resolved through an
//! [`AncestryLookup`], so the hierarchy is a name-indexed graph rather than a
//! pointer graph. The walk rejects a chain that revisits a name.
//!
//! # Example
//!
//! ```rust
//! use apify::rest::{build_path, derive_path, item_path};
//! use apify::ResourceName;
//! use std::collections::HashMap;
//!
//! let users = ResourceName::new("users").unwrap();
//! let posts = ResourceName::new("posts").unwrap();
//!
//! let mut registry: HashMap<ResourceName, Option<ResourceName>> = HashMap::new();
//! registry.insert(users.clone(), None);
//!
//! let path = derive_path(&posts, Some(&users), &registry).unwrap();
//! assert_eq!(path, "/users/:id/posts");
//!
//! let url = build_path(&item_path(&path), &["42", "7"]);
//! assert_eq!(url, "/users/42/posts/7");
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::{self, Display};
use std::hash::BuildHasher;

use serde::Serialize;

use crate::config::ResourceName;
use crate::rest::{resolve_method_shape, HttpMethod, Mode, PathError, RouteError};

/// Placeholder standing for an item identifier in a route template.
pub const ID_PLACEHOLDER: &str = ":id";

/// Read access to the parent relation of registered resources.
pub trait AncestryLookup {
    /// Returns `true` if a resource with this name is registered.
    fn contains(&self, name: &ResourceName) -> bool;

    /// Returns the parent of a registered resource, or `None` for a root
    /// or unregistered resource.
    fn parent_of(&self, name: &ResourceName) -> Option<ResourceName>;
}

impl<S: BuildHasher> AncestryLookup for HashMap<ResourceName, Option<ResourceName>, S> {
    fn contains(&self, name: &ResourceName) -> bool {
        self.contains_key(name)
    }

    fn parent_of(&self, name: &ResourceName) -> Option<ResourceName> {
        self.get(name).cloned().flatten()
    }
}

impl AncestryLookup for BTreeMap<ResourceName, Option<ResourceName>> {
    fn contains(&self, name: &ResourceName) -> bool {
        self.contains_key(name)
    }

    fn parent_of(&self, name: &ResourceName) -> Option<ResourceName> {
        self.get(name).cloned().flatten()
    }
}

/// Derives the path of a resource from its ancestry.
///
/// The resource itself does not need to be registered in `lookup`; every
/// ancestor does.
///
/// # Errors
///
/// Returns [`PathError::UnresolvedAncestor`] if an ancestor is missing from
/// `lookup`, and [`PathError::AncestryCycle`] if the chain revisits a name
/// (including the resource naming itself as an ancestor).
pub fn derive_path<L: AncestryLookup + ?Sized>(
    name: &ResourceName,
    parent: Option<&ResourceName>,
    lookup: &L,
) -> Result<String, PathError> {
    // Nearest ancestor first
    let mut chain: Vec<ResourceName> = Vec::new();
    let mut current = parent.cloned();

    while let Some(ancestor) = current {
        if ancestor == *name || chain.contains(&ancestor) {
            return Err(PathError::AncestryCycle {
                resource: name.to_string(),
                ancestor: ancestor.to_string(),
            });
        }
        if !lookup.contains(&ancestor) {
            return Err(PathError::UnresolvedAncestor {
                resource: name.to_string(),
                ancestor: ancestor.to_string(),
            });
        }
        current = lookup.parent_of(&ancestor);
        chain.push(ancestor);
    }

    let mut path = String::new();
    for ancestor in chain.iter().rev() {
        path.push('/');
        path.push_str(ancestor.as_ref());
        path.push('/');
        path.push_str(ID_PLACEHOLDER);
    }
    path.push('/');
    path.push_str(name.as_ref());

    Ok(path)
}

/// Returns the collection endpoint for a derived path.
#[must_use]
pub fn collection_path(path: &str) -> String {
    path.to_string()
}

/// Returns the item endpoint for a derived path.
#[must_use]
pub fn item_path(path: &str) -> String {
    format!("{path}/{ID_PLACEHOLDER}")
}

/// Replaces `:id` placeholders in a template with concrete ids, left to right.
///
/// Ids are percent-encoded. Placeholders without a matching id are left
/// unchanged; surplus ids are ignored.
///
/// # Example
///
/// ```rust
/// use apify::rest::build_path;
///
/// assert_eq!(build_path("/orgs/:id/teams/:id/users", &[1, 2]), "/orgs/1/teams/2/users");
/// assert_eq!(build_path("/users/:id", &["a b"]), "/users/a%20b");
/// assert_eq!(build_path("/users/:id", &[] as &[u64]), "/users/:id");
/// ```
#[must_use]
pub fn build_path<V: Display>(template: &str, ids: &[V]) -> String {
    let mut ids = ids.iter();

    template
        .split('/')
        .map(|segment| {
            if segment == ID_PLACEHOLDER {
                ids.next().map_or_else(
                    || segment.to_string(),
                    |id| urlencoding::encode(&id.to_string()).into_owned(),
                )
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// An endpoint exposed for one mode of a resource.
///
/// # Example
///
/// ```rust
/// use apify::rest::Route;
/// use apify::{HttpMethod, Mode};
///
/// let route = Route::for_mode(Mode::Replace, "/users").unwrap();
/// assert_eq!(route.http_method, HttpMethod::Put);
/// assert_eq!(route.template, "/users/:id");
/// assert!(!route.query_required);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// The HTTP method for this route.
    pub http_method: HttpMethod,
    /// The mode this route serves.
    pub mode: Mode,
    /// The URL template, `<path>` or `<path>/:id`.
    pub template: String,
    /// Whether the route is only taken when query parameters are present.
    pub query_required: bool,
}

impl Route {
    /// Builds the route serving `mode` on the resource at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnsupportedMode`] if the mode has no shape.
    pub fn for_mode(mode: Mode, path: &str) -> Result<Self, RouteError> {
        let shape = resolve_method_shape(mode)?;
        let template = if shape.id_required {
            item_path(path)
        } else {
            collection_path(path)
        };

        Ok(Self {
            http_method: shape.http_method,
            mode,
            template,
            query_required: shape.query_required,
        })
    }

    /// Returns the number of `:id` placeholders in the template.
    #[must_use]
    pub fn id_count(&self) -> usize {
        self.template
            .split('/')
            .filter(|segment| *segment == ID_PLACEHOLDER)
            .count()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.http_method, self.template)?;
        if self.query_required {
            f.write_str("?…")?;
        }
        Ok(())
    }
}

/// Builds the routes for every mode in `modes`, skipping duplicates.
///
/// # Errors
///
/// Returns [`RouteError::UnsupportedMode`] if a mode has no shape.
pub fn routes_for(path: &str, modes: &[Mode]) -> Result<Vec<Route>, RouteError> {
    let mut seen = HashSet::new();
    modes
        .iter()
        .filter(|mode| seen.insert(**mode))
        .map(|mode| Route::for_mode(*mode, path))
        .collect()
}

/// Selects the route serving `mode`.
#[must_use]
pub fn get_route(routes: &[Route], mode: Mode) -> Option<&Route> {
    routes.iter().find(|r| r.mode == mode)
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Route>();
};

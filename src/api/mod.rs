//! The API registry: named resources aggregated into a servable set.
//!
//! [`Api`] owns every registered [`Resource`]. Children refer to their
//! parent by name only, so the registry is the single owner of the
//! hierarchy and resolves ancestry on demand.
//!
//! # Two-Phase Pattern
//!
//! 1. **Register**: [`Api::add_resource`] inserts resources in any order,
//!    typically from startup code that may run in parallel. Registration is
//!    insert-if-absent; a second resource with the same name is rejected.
//! 2. **Resolve**: once the ancestry is registered, [`Api::derive_path`] and
//!    [`Api::routes`] compute each resource's path and its wire surface, and
//!    [`Api::dispatch`] serves requests.
//!
//! # Example
//!
//! ```rust
//! use apify::{Api, ApiRequest, Resource};
//! use apify::schema::{Field, Schema};
//! use apify::storage::MemoryStore;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! fn resource(name: &str, parent: Option<&str>) -> Resource {
//!     let builder = Resource::builder();
//!     builder.set_name(name).unwrap();
//!     if let Some(parent) = parent {
//!         builder.set_parent(parent).unwrap();
//!     }
//!     builder.set_description("A resource of the blog API").unwrap();
//!     builder.set_schema(Schema::new(vec![Field::required("id")])).unwrap();
//!     builder.set_store(Arc::new(MemoryStore::new())).unwrap();
//!     builder.build().unwrap()
//! }
//!
//! let api = Api::new("v1");
//! api.add_resource(resource("posts", Some("users"))).unwrap();
//! api.add_resource(resource("users", None)).unwrap();
//!
//! assert_eq!(api.derive_path("posts").unwrap(), "/users/:id/posts");
//!
//! let response = api
//!     .dispatch(ApiRequest::new("POST", "posts").body(json!({"id": "p1"})))
//!     .unwrap();
//! assert_eq!(response.status, 201);
//! ```

mod errors;

pub use errors::ApiError;

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use serde::Serialize;
use serde_json::Value;

use crate::config::ResourceName;
use crate::resource::Resource;
use crate::rest::{resolve_mode, AncestryLookup, Mode, Route, RouteError};
use crate::storage::{ensure_id, Item, ListFilter, SearchParams, StoreError};

/// Registry of named resources forming one API.
///
/// # Thread Safety
///
/// `Api` is `Send + Sync`. Registration takes a write lock for the duration
/// of a single insert; every other operation reads.
#[derive(Debug)]
pub struct Api {
    version: String,
    resources: RwLock<BTreeMap<ResourceName, Arc<Resource>>>,
}

// Verify Api is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Api>();
};

impl Api {
    /// Creates an empty API with the given version label.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            resources: RwLock::new(BTreeMap::new()),
        }
    }

    /// Returns the version label.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    // Entries are only ever inserted whole, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<ResourceName, Arc<Resource>>> {
        self.resources.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a resource under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::DuplicateResource`] if the name is taken; the
    /// registered resource is left untouched.
    pub fn add_resource(&self, resource: Resource) -> Result<Arc<Resource>, ApiError> {
        let name = resource.name().clone();
        let mut resources = self
            .resources
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if resources.contains_key(&name) {
            tracing::warn!(resource = %name, "rejected duplicate resource registration");
            return Err(ApiError::DuplicateResource {
                name: name.to_string(),
            });
        }

        let resource = Arc::new(resource);
        resources.insert(name.clone(), Arc::clone(&resource));
        drop(resources);

        tracing::debug!(
            resource = %name,
            parent = ?resource.parent().map(AsRef::<str>::as_ref),
            "registered resource"
        );
        Ok(resource)
    }

    /// Returns the resource registered under `name`.
    ///
    /// The name is normalized first, so `"Users"` finds `users`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Resource>> {
        let name = ResourceName::new(name).ok()?;
        self.read().get(&name).cloned()
    }

    fn resource(&self, name: &str) -> Result<Arc<Resource>, ApiError> {
        self.get(name).ok_or_else(|| ApiError::UnknownResource {
            name: name.to_string(),
        })
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.read().keys().map(ToString::to_string).collect()
    }

    /// Returns the number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if no resource is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Derives and records the path of a registered resource.
    ///
    /// The first successful derivation is kept; later calls return it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownResource`] if `name` is not registered, and
    /// [`ApiError::Path`] if an ancestor is missing or the ancestry cycles.
    pub fn derive_path(&self, name: &str) -> Result<String, ApiError> {
        let resource = self.resource(name)?;
        if let Some(path) = resource.path() {
            return Ok(path.to_string());
        }

        let path = resource.derive_path(self).map_err(|e| {
            tracing::warn!(resource = %resource.name(), error = %e, "cannot derive path");
            e
        })?;
        let path = resource.record_path(path).to_string();

        tracing::debug!(resource = %resource.name(), path = %path, "derived resource path");
        Ok(path)
    }

    /// Derives the path of every registered resource, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError::Path`] encountered.
    pub fn paths(&self) -> Result<BTreeMap<String, String>, ApiError> {
        self.names()
            .into_iter()
            .map(|name| {
                let path = self.derive_path(&name)?;
                Ok((name, path))
            })
            .collect()
    }

    /// Returns the routes of every registered resource, ordered by resource
    /// name and then by configured mode order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError::Path`] encountered.
    pub fn routes(&self) -> Result<Vec<Route>, ApiError> {
        let mut routes = Vec::new();
        for name in self.names() {
            self.derive_path(&name)?;
            let resource = self.resource(&name)?;
            routes.extend(resource.routes().unwrap_or_default());
        }
        Ok(routes)
    }

    /// Resolves a request to a mode and checks the resource allows it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownResource`], or [`ApiError::Route`] when the
    /// method is unknown, the shape is unmapped or the mode is not allowed.
    pub fn authorize(
        &self,
        resource: &str,
        method: &str,
        id_present: bool,
        query_present: bool,
    ) -> Result<Mode, ApiError> {
        let resource = self.resource(resource)?;
        let mode = resolve_mode(method, id_present, query_present)?;

        resource.check_mode(mode).map_err(|e| {
            tracing::warn!(resource = %resource.name(), mode = %mode, "mode not allowed");
            e
        })?;
        Ok(mode)
    }

    /// Serves a request against the resource's store.
    ///
    /// The mode is resolved from the method, the presence of an id and the
    /// presence of search criteria (pagination parameters alone keep a
    /// request in List mode). Bodies are validated with the resource schema
    /// before they reach the store: in full for Create and Replace, partially
    /// for Update.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for unknown resources, unroutable or disallowed
    /// requests, missing bodies or items, schema failures and store failures.
    pub fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let ApiRequest {
            method,
            resource,
            id,
            query,
            body,
        } = request;

        let mode = self.authorize(&resource, &method, id.is_some(), query.has_criteria())?;
        let resource = self.resource(&resource)?;
        let store = resource.store();

        tracing::debug!(resource = %resource.name(), mode = %mode, id = ?id, "dispatching request");

        let require_body = || body.clone().ok_or(ApiError::MissingBody { mode });
        let not_found = |id: &str| ApiError::ItemNotFound {
            resource: resource.name().to_string(),
            id: id.to_string(),
        };

        match (mode, id.as_deref()) {
            (Mode::Create, None) => {
                let item = require_body()?;
                resource.schema().validate(&item)?;
                store.insert(item.clone())?;
                Ok(ApiResponse::new(mode, 201, Some(item)))
            }
            (Mode::Read, Some(id)) => {
                let item = store.find(id).ok_or_else(|| not_found(id))?;
                Ok(ApiResponse::new(mode, 200, Some(item)))
            }
            (Mode::Update, Some(id)) => {
                let changes = require_body()?;
                resource.schema().validate_partial(&changes)?;
                let item = store.patch(id, changes).map_err(|e| match e {
                    StoreError::NotFound { .. } => not_found(id),
                    other => other.into(),
                })?;
                Ok(ApiResponse::new(mode, 200, Some(item)))
            }
            (Mode::Replace, Some(id)) => {
                let mut item = require_body()?;
                stamp_id(&mut item, id);
                resource.schema().validate(&item)?;
                ensure_id(id, &item)?;
                store.update(id, item.clone()).map_err(|e| match e {
                    StoreError::NotFound { .. } => not_found(id),
                    other => other.into(),
                })?;
                Ok(ApiResponse::new(mode, 200, Some(item)))
            }
            (Mode::Delete, Some(id)) => {
                store.delete(id)?;
                Ok(ApiResponse::new(mode, 204, None))
            }
            (Mode::Clear, None) => {
                let deleted = store.clear()?;
                Ok(ApiResponse::new(
                    mode,
                    200,
                    Some(serde_json::json!({ "deleted": deleted })),
                ))
            }
            (Mode::List, None) => {
                // Zero, explicit or configured, disables pagination
                let limit = query
                    .limit()
                    .unwrap_or_else(|| resource.conf().pagination_default_limit());
                let filter = ListFilter {
                    limit: (limit > 0).then_some(limit),
                    offset: query.offset(),
                };
                let items = store.find_list(filter);
                Ok(ApiResponse::new(mode, 200, Some(Value::Array(items))))
            }
            (Mode::Search, None) => {
                let (items, facets) = store.search(&query);
                let mut response = ApiResponse::new(mode, 200, Some(Value::Array(items)));
                response.facets = facets;
                Ok(response)
            }
            (_, id) => Err(RouteError::UnresolvableRequestShape {
                method: method.parse()?,
                id_present: id.is_some(),
                query_present: query.has_criteria(),
            }
            .into()),
        }
    }
}

impl AncestryLookup for Api {
    fn contains(&self, name: &ResourceName) -> bool {
        self.read().contains_key(name)
    }

    fn parent_of(&self, name: &ResourceName) -> Option<ResourceName> {
        self.read().get(name).and_then(|r| r.parent().cloned())
    }
}

// The URL id fills a body that names no id of its own.
fn stamp_id(item: &mut Item, id: &str) {
    if let Some(object) = item.as_object_mut() {
        object
            .entry("id")
            .or_insert_with(|| Value::String(id.to_string()));
    }
}

/// A routed request, reduced to the facts the resolver needs.
///
/// # Example
///
/// ```rust
/// use apify::ApiRequest;
/// use apify::storage::SearchParams;
///
/// let request = ApiRequest::new("GET", "posts").query(SearchParams::parse("author=jane"));
/// assert!(request.id.is_none());
/// ```
#[derive(Clone, Debug)]
pub struct ApiRequest {
    /// The raw HTTP method token.
    pub method: String,
    /// The target resource name.
    pub resource: String,
    /// The item id, for item URLs.
    pub id: Option<String>,
    /// Decoded query parameters.
    pub query: SearchParams,
    /// The JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a collection request without query or body.
    #[must_use]
    pub fn new(method: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            resource: resource.into(),
            id: None,
            query: SearchParams::default(),
            body: None,
        }
    }

    /// Targets a single item.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn query(mut self, query: SearchParams) -> Self {
        self.query = query;
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The outcome of a dispatched request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiResponse {
    /// The mode the request resolved to.
    pub mode: Mode,
    /// The HTTP status code to answer with.
    pub status: u16,
    /// The response body, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Facets returned by a search.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<String>,
}

impl ApiResponse {
    fn new(mode: Mode, status: u16, body: Option<Value>) -> Self {
        Self {
            mode,
            status,
            body,
            facets: Vec::new(),
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

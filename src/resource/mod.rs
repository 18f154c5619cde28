//! Resource definitions.
//!
//! A resource is described through a [`ResourceBuilder`] whose setters may be
//! called in any order, each at most once. Once the builder
//! [`is_complete`](ResourceBuilder::is_complete), [`build`](ResourceBuilder::build)
//! freezes it into an immutable [`Resource`] that can be shared between
//! threads without further synchronization.
//!
//! # Write-once fields
//!
//! Every field is stored in a [`OnceLock`], so two threads racing on the same
//! setter cannot both succeed: exactly one assignment wins and the other
//! observes the `*AlreadySet` error. A rejected value leaves the field unset.
//!
//! # Example
//!
//! ```rust
//! use apify::{ConfigError, ResourceBuilder};
//! use apify::schema::{Field, Schema};
//! use apify::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! let builder = ResourceBuilder::new();
//! builder.set_name("Posts").unwrap();
//! builder.set_parent("users").unwrap();
//! builder.set_description("Blog posts written by users").unwrap();
//! assert!(!builder.is_complete());
//!
//! builder.set_schema(Schema::new(vec![Field::required("title")])).unwrap();
//! builder.set_store(Arc::new(MemoryStore::new())).unwrap();
//! assert!(builder.is_complete());
//!
//! assert!(matches!(builder.set_name("comments"), Err(ConfigError::NameAlreadySet { .. })));
//!
//! let resource = builder.build().unwrap();
//! assert_eq!(resource.name().as_ref(), "posts");
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::config::{Description, ResourceConf, ResourceName};
use crate::error::ConfigError;
use crate::rest::{derive_path, routes_for, AncestryLookup, Mode, PathError, Route, RouteError};
use crate::schema::Schema;
use crate::storage::Store;

/// Mutable, write-once description of a resource.
#[derive(Default)]
pub struct ResourceBuilder {
    name: OnceLock<ResourceName>,
    description: OnceLock<Description>,
    parent: OnceLock<ResourceName>,
    conf: OnceLock<ResourceConf>,
    schema: OnceLock<Arc<Schema>>,
    store: OnceLock<Arc<dyn Store>>,
}

impl ResourceBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resource name.
    ///
    /// The name is trimmed and lowercased, then must be 4 to 15 lowercase
    /// ASCII letters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NameAlreadySet`] if a name is already recorded,
    /// whatever the new value, and [`ConfigError::InvalidName`] if the new
    /// value is malformed.
    pub fn set_name(&self, raw: &str) -> Result<(), ConfigError> {
        let name = set_name_once(&self.name, raw)?;
        tracing::debug!(resource = %name, "resource name set");
        Ok(())
    }

    /// Records the name of the parent resource.
    ///
    /// The parent is a reference by name; it is resolved, and cycles are
    /// detected, only when the path is derived.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NameAlreadySet`] if a parent is already
    /// recorded, and [`ConfigError::InvalidName`] if the name is malformed.
    pub fn set_parent(&self, raw: &str) -> Result<(), ConfigError> {
        let parent = set_name_once(&self.parent, raw)?;
        tracing::debug!(parent = %parent, "resource parent set");
        Ok(())
    }

    /// Sets the resource description.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DescriptionAlreadySet`] if a description is
    /// already recorded, and [`ConfigError::InvalidDescription`] if the text
    /// is not longer than 15 and shorter than 200 characters.
    pub fn set_description(&self, raw: &str) -> Result<(), ConfigError> {
        if self.description.get().is_some() {
            return Err(ConfigError::DescriptionAlreadySet);
        }
        let description = Description::new(raw)?;
        let length = description.as_ref().chars().count();
        self.description
            .set(description)
            .map_err(|_| ConfigError::DescriptionAlreadySet)?;

        tracing::debug!(length, "resource description set");
        Ok(())
    }

    /// Sets the configuration. Without one, [`ResourceConf::default`] applies.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadySet`] if a configuration is already recorded.
    pub fn set_conf(&self, conf: ResourceConf) -> Result<(), ConfigError> {
        self.conf
            .set(conf)
            .map_err(|_| ConfigError::AlreadySet { field: "conf" })
    }

    /// Sets the schema item bodies are validated against.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadySet`] if a schema is already recorded.
    pub fn set_schema(&self, schema: Schema) -> Result<(), ConfigError> {
        self.schema
            .set(Arc::new(schema))
            .map_err(|_| ConfigError::AlreadySet { field: "schema" })
    }

    /// Sets the backing store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadySet`] if a store is already recorded.
    pub fn set_store(&self, store: Arc<dyn Store>) -> Result<(), ConfigError> {
        self.store
            .set(store)
            .map_err(|_| ConfigError::AlreadySet { field: "store" })
    }

    /// Returns the recorded name.
    #[must_use]
    pub fn name(&self) -> Option<&ResourceName> {
        self.name.get()
    }

    /// Returns the recorded parent name.
    #[must_use]
    pub fn parent(&self) -> Option<&ResourceName> {
        self.parent.get()
    }

    /// Returns `true` once name, description, schema and store are set and
    /// at least one mode is allowed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
            && self
                .conf
                .get()
                .map_or(true, |conf| !conf.allowed_modes().is_empty())
    }

    fn missing_field(&self) -> Option<&'static str> {
        if self.name.get().is_none() {
            Some("name")
        } else if self.description.get().is_none() {
            Some("description")
        } else if self.schema.get().is_none() {
            Some("schema")
        } else if self.store.get().is_none() {
            Some("store")
        } else {
            None
        }
    }

    /// Freezes the builder into an immutable [`Resource`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] naming the first unset
    /// field, or [`ConfigError::NoAllowedModes`] if the configuration allows
    /// nothing.
    pub fn build(&self) -> Result<Resource, ConfigError> {
        let missing = |field| ConfigError::MissingRequiredField { field };

        let name = self.name.get().ok_or_else(|| missing("name"))?.clone();
        let description = self
            .description
            .get()
            .ok_or_else(|| missing("description"))?
            .clone();
        let schema = Arc::clone(self.schema.get().ok_or_else(|| missing("schema"))?);
        let store = Arc::clone(self.store.get().ok_or_else(|| missing("store"))?);
        let conf = self.conf.get().cloned().unwrap_or_default();

        if conf.allowed_modes().is_empty() {
            return Err(ConfigError::NoAllowedModes {
                name: name.to_string(),
            });
        }

        Ok(Resource {
            name,
            description,
            parent: self.parent.get().cloned(),
            conf,
            schema,
            store,
            path: OnceLock::new(),
        })
    }
}

fn set_name_once(slot: &OnceLock<ResourceName>, raw: &str) -> Result<ResourceName, ConfigError> {
    let already_set = |current: &ResourceName| ConfigError::NameAlreadySet {
        current: current.to_string(),
    };

    if let Some(current) = slot.get() {
        return Err(already_set(current));
    }
    let name = ResourceName::new(raw)?;
    slot.set(name.clone())
        .map_err(|rejected| already_set(slot.get().unwrap_or(&rejected)))?;
    Ok(name)
}

impl fmt::Debug for ResourceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceBuilder")
            .field("name", &self.name.get())
            .field("description", &self.description.get())
            .field("parent", &self.parent.get())
            .field("conf", &self.conf.get())
            .field("schema", &self.schema.get().is_some())
            .field("store", &self.store.get().map(|s| s.store_type()))
            .finish()
    }
}

/// A complete, immutable resource definition.
///
/// The derived path is the only late-bound attribute: it is recorded once by
/// the registry after the full ancestry is registered.
pub struct Resource {
    name: ResourceName,
    description: Description,
    parent: Option<ResourceName>,
    conf: ResourceConf,
    schema: Arc<Schema>,
    store: Arc<dyn Store>,
    path: OnceLock<String>,
}

// Verify Resource types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceBuilder>();
    assert_send_sync::<Resource>();
};

impl Resource {
    /// Creates a new, empty builder.
    #[must_use]
    pub fn builder() -> ResourceBuilder {
        ResourceBuilder::new()
    }

    /// Returns the resource name.
    #[must_use]
    pub const fn name(&self) -> &ResourceName {
        &self.name
    }

    /// Returns the resource description.
    #[must_use]
    pub const fn description(&self) -> &Description {
        &self.description
    }

    /// Returns the parent name, if the resource is nested.
    #[must_use]
    pub const fn parent(&self) -> Option<&ResourceName> {
        self.parent.as_ref()
    }

    /// Returns the resource configuration.
    #[must_use]
    pub const fn conf(&self) -> &ResourceConf {
        &self.conf
    }

    /// Returns the schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Returns `true` if the configuration allows `mode`.
    #[must_use]
    pub fn is_mode_allowed(&self, mode: Mode) -> bool {
        self.conf.is_mode_allowed(mode)
    }

    /// Fails unless the configuration allows `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::ModeNotAllowed`].
    pub fn check_mode(&self, mode: Mode) -> Result<(), RouteError> {
        if self.is_mode_allowed(mode) {
            Ok(())
        } else {
            Err(RouteError::ModeNotAllowed {
                resource: self.name.to_string(),
                mode,
            })
        }
    }

    /// Derives the path of this resource through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if an ancestor is unresolved or the ancestry
    /// loops back on itself.
    pub fn derive_path<L: AncestryLookup + ?Sized>(&self, lookup: &L) -> Result<String, PathError> {
        derive_path(&self.name, self.parent.as_ref(), lookup)
    }

    /// Returns the derived path, once recorded.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.get().map(String::as_str)
    }

    /// Records the derived path. Later calls keep the first value.
    pub(crate) fn record_path(&self, path: String) -> &str {
        self.path.get_or_init(|| path)
    }

    /// Returns the routes of every allowed mode, once the path is recorded.
    #[must_use]
    pub fn routes(&self) -> Option<Vec<Route>> {
        let path = self.path()?;
        routes_for(path, self.conf.allowed_modes()).ok()
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parent", &self.parent)
            .field("conf", &self.conf)
            .field("store", &self.store.store_type())
            .field("path", &self.path.get())
            .finish_non_exhaustive()
    }
}

//! # Apify
//!
//! Declarative binding of resource definitions to a REST surface.
//!
//! ## Overview
//!
//! A resource is described by a name, a description, an optional parent, a
//! set of allowed operations, a schema and a storage backend. This crate
//! turns that description into routes and request handling:
//!
//! - Validated identity via [`ResourceName`] and [`Description`]
//! - Write-once resource definition via [`ResourceBuilder`], frozen into [`Resource`]
//! - Per-resource allow-lists via [`ResourceConf`] and the [`Mode`] vocabulary
//! - Bidirectional mode ⇄ HTTP method resolution via [`rest::resolve_method_shape`]
//!   and [`rest::resolve_mode`]
//! - Hierarchical paths (`/users/:id/posts`) derived from the parent chain
//! - A registry, [`Api`], that aggregates resources and dispatches requests
//!   to their [`storage::Store`]
//!
//! ## Quick Start
//!
//! ```rust
//! use apify::{Api, Mode, Resource, ResourceConf};
//! use apify::schema::{Field, Schema};
//! use apify::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! let users = Resource::builder();
//! users.set_name("Users").unwrap();
//! users.set_description("Registered platform users").unwrap();
//! users.set_schema(Schema::new(vec![Field::required("id")])).unwrap();
//! users.set_store(Arc::new(MemoryStore::new())).unwrap();
//! users
//!     .set_conf(ResourceConf::builder().allow(Mode::Search).build())
//!     .unwrap();
//!
//! let api = Api::new("v1");
//! api.add_resource(users.build().unwrap()).unwrap();
//!
//! assert_eq!(api.derive_path("users").unwrap(), "/users");
//! assert_eq!(api.authorize("users", "GET", false, true).unwrap(), Mode::Search);
//! ```
//!
//! ## Resolving Requests
//!
//! ```rust
//! use apify::rest::{resolve_method_shape, resolve_mode, RouteError};
//! use apify::{HttpMethod, Mode};
//!
//! // Mode -> shape
//! let shape = resolve_method_shape(Mode::Replace).unwrap();
//! assert_eq!(shape.http_method, HttpMethod::Put);
//! assert!(shape.id_required);
//!
//! // Shape -> mode
//! assert_eq!(resolve_mode("GET", false, false).unwrap(), Mode::List);
//!
//! // Item id and query together map to no mode
//! assert!(matches!(
//!     resolve_mode("GET", true, true),
//!     Err(RouteError::UnresolvableRequestShape { .. })
//! ));
//! ```
//!
//! ## Design Principles
//!
//! - **Fail-fast validation**: names and descriptions are validated when set
//! - **Write-once identity**: every resource field is assigned at most once
//! - **Name-indexed hierarchy**: parents are referenced by name, never by pointer
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Client-facing failures**: routing errors always map to 4xx statuses

pub mod api;
pub mod config;
pub mod error;
pub mod resource;
pub mod rest;
pub mod schema;
pub mod storage;

// Re-export public types at crate root for convenience
pub use api::{Api, ApiError, ApiRequest, ApiResponse};
pub use config::{Description, ResourceConf, ResourceConfBuilder, ResourceName};
pub use error::ConfigError;
pub use resource::{Resource, ResourceBuilder};
pub use rest::{HttpMethod, MethodShape, Mode, PathError, RouteError};

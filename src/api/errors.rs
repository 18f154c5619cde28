//! Error types for the API registry and request dispatch.
//!
//! [`ApiError`] wraps the lower-level errors so that a caller serving HTTP
//! can answer every failure through [`ApiError::status_code`]:
//!
//! - **400**: unmapped request shape, unknown mode code, missing body
//! - **404**: unknown resource or item
//! - **405**: unknown verb or mode not allowed on the resource
//! - **409**: duplicate registration or item id
//! - **422**: configuration, ancestry or schema validation failure
//! - **500**: storage backend failure

use thiserror::Error;

use crate::error::ConfigError;
use crate::rest::{Mode, PathError, RouteError};
use crate::schema::SchemaError;
use crate::storage::StoreError;

/// Error type for registry and dispatch operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A resource with the same name is already registered.
    #[error("Resource '{name}' is already registered")]
    DuplicateResource {
        /// The conflicting name.
        name: String,
    },

    /// No resource with this name is registered.
    #[error("Resource '{name}' is not registered")]
    UnknownResource {
        /// The requested name.
        name: String,
    },

    /// No item with this id exists in the resource.
    #[error("{resource} with id {id} not found")]
    ItemNotFound {
        /// The resource name.
        resource: String,
        /// The requested id.
        id: String,
    },

    /// The mode needs a request body and none was supplied.
    #[error("Mode '{mode}' requires a request body")]
    MissingBody {
        /// The resolved mode.
        mode: Mode,
    },

    /// A resource definition is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A request could not be routed.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// A path could not be derived.
    #[error(transparent)]
    Path(#[from] PathError),

    /// An item body failed schema validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Returns the HTTP status code to answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingBody { .. } => 400,
            Self::UnknownResource { .. }
            | Self::ItemNotFound { .. }
            | Self::Store(StoreError::NotFound { .. }) => 404,
            Self::DuplicateResource { .. } | Self::Store(StoreError::Conflict { .. }) => 409,
            Self::Config(_)
            | Self::Path(_)
            | Self::Schema(_)
            | Self::Store(StoreError::MissingId | StoreError::IdMismatch { .. }) => 422,
            Self::Route(e) => e.status_code(),
            Self::Store(StoreError::Backend { .. }) => 500,
        }
    }

    /// Returns `true` if the failure is caused by the client.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

// Verify ApiError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
};

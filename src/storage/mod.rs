//! Storage collaborator for resources.
//!
//! A [`Store`] persists opaque items and answers item, list and search
//! queries. The routing core calls into a store only after a request has been
//! resolved to a [`Mode`](crate::Mode) and the mode has been allowed for the
//! resource; it never interprets item payloads beyond their `id` field.
//!
//! [`MemoryStore`] is the in-process backend used by default in tests and
//! small deployments.

mod memory;

pub use memory::MemoryStore;

use std::borrow::Cow;

use serde_json::Value;
use thiserror::Error;

/// An opaque stored item.
pub type Item = Value;

/// Error type for store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No item has the requested id.
    #[error("Item with id {id} not found")]
    NotFound {
        /// The requested id.
        id: String,
    },

    /// An item with the same id already exists.
    #[error("Item with id {id} already exists")]
    Conflict {
        /// The conflicting id.
        id: String,
    },

    /// The item carries no usable `id` field.
    #[error("Item has no 'id' field")]
    MissingId,

    /// The body's `id` field does not name the item it is written to.
    #[error("Item {id} cannot be written with id {body_id:?}")]
    IdMismatch {
        /// The id the item is stored under.
        id: String,
        /// The id carried by the body, if any.
        body_id: Option<String>,
    },

    /// The backend failed.
    #[error("Storage backend failure: {message}")]
    Backend {
        /// A description of the failure.
        message: String,
    },
}

/// Pagination window applied to list queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Maximum number of items to return, `None` for all.
    pub limit: Option<usize>,
    /// Number of items to skip.
    pub offset: usize,
}

/// Decoded query parameters of a search request.
///
/// `limit` and `offset` are pagination parameters; every other pair is a
/// search criterion.
///
/// # Example
///
/// ```rust
/// use apify::storage::SearchParams;
///
/// let params = SearchParams::parse("author=jane%20doe&tag=rust&limit=5");
/// assert_eq!(params.get("author"), Some("jane doe"));
/// assert_eq!(params.limit(), Some(5));
/// assert_eq!(params.criteria().count(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    const PAGINATION_KEYS: [&'static str; 2] = ["limit", "offset"];

    /// Creates parameters from already decoded pairs.
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Decodes a URL query string (without the leading `?`).
    ///
    /// `+` decodes to a space. Pairs that fail to decode are kept verbatim.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();
        Self { pairs }
    }

    /// Returns `true` if there are no pairs at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns `true` if at least one search criterion is present.
    #[must_use]
    pub fn has_criteria(&self) -> bool {
        self.criteria().next().is_some()
    }

    /// Returns the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the search criteria, excluding pagination parameters.
    pub fn criteria(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .filter(|(k, _)| !Self::PAGINATION_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the `limit` parameter, if present and numeric.
    ///
    /// `limit=0` asks for every item, the same as a zero default page size.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.get("limit").and_then(|v| v.parse().ok())
    }

    /// Returns the `offset` parameter, or zero.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0)
    }
}

/// Extracts the key of an item from its `id` field.
///
/// String and number ids are accepted; an empty string is not an id.
#[must_use]
pub fn item_id(item: &Item) -> Option<String> {
    match item.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Applies `changes` to `item` field by field.
///
/// A non-object on either side replaces the item whole.
pub fn merge(item: &mut Item, changes: Item) {
    match (item.as_object_mut(), changes) {
        (Some(target), Value::Object(changes)) => {
            for (key, value) in changes {
                target.insert(key, value);
            }
        }
        (_, changes) => *item = changes,
    }
}

/// Fails unless `item` carries `id` in its `id` field.
///
/// # Errors
///
/// Returns [`StoreError::IdMismatch`].
pub fn ensure_id(id: &str, item: &Item) -> Result<(), StoreError> {
    match item_id(item) {
        Some(body_id) if body_id == id => Ok(()),
        body_id => Err(StoreError::IdMismatch {
            id: id.to_string(),
            body_id,
        }),
    }
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw).map_or_else(|_| raw.clone(), Cow::into_owned)
}

/// Storage and search backend of a resource.
///
/// Implementations must be safe to share between threads: a registered
/// resource is read concurrently by every request handler.
pub trait Store: Send + Sync {
    /// Stores a new item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the id is taken.
    fn insert(&self, item: Item) -> Result<(), StoreError>;

    /// Removes the item with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such item exists.
    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Overwrites the item with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such item exists, and
    /// [`StoreError::IdMismatch`] if `item` does not carry `id`.
    fn update(&self, id: &str, item: Item) -> Result<(), StoreError>;

    /// Merges `changes` into the item with the given id and returns the
    /// stored result.
    ///
    /// The default implementation is a `find` followed by an `update`, so
    /// two concurrent patches of one item may lose one of the changes.
    /// Backends that can hold the item locked across both steps override it.
    ///
    /// # Errors
    ///
    /// Same as [`update`](Self::update).
    fn patch(&self, id: &str, changes: Item) -> Result<Item, StoreError> {
        let mut item = self
            .find(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        merge(&mut item, changes);
        self.update(id, item.clone())?;
        Ok(item)
    }

    /// Removes every item and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the backend fails; no item may be
    /// left half-removed.
    fn clear(&self) -> Result<usize, StoreError>;

    /// Returns the item with the given id.
    fn find(&self, id: &str) -> Option<Item>;

    /// Returns the items inside the pagination window.
    fn find_list(&self, filter: ListFilter) -> Vec<Item>;

    /// Returns the items matching every criterion, and the facets that matched.
    fn search(&self, params: &SearchParams) -> (Vec<Item>, Vec<String>);

    /// Returns the storage type, e.g. `"memory"`.
    fn store_type(&self) -> &'static str;
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreError>();
    assert_send_sync::<SearchParams>();
};

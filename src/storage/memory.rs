//! In-memory [`Store`] backend.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use super::{ensure_id, item_id, merge, Item, ListFilter, SearchParams, Store, StoreError};

/// A [`Store`] keeping items in memory, ordered by id.
///
/// Items are keyed by their `id` field, which may be a string or a number.
///
/// # Example
///
/// ```rust
/// use apify::storage::{ListFilter, MemoryStore, Store};
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// store.insert(json!({"id": 1, "title": "First"})).unwrap();
///
/// assert_eq!(store.find("1").unwrap()["title"], "First");
/// assert_eq!(store.find_list(ListFilter::default()).len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<String, Item>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if the store holds no item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Items are replaced whole under the lock, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Item>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Item>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn field_matches(item: &Item, key: &str, expected: &str) -> bool {
    match item.get(key) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Array(values)) => values.iter().any(|v| match v {
            Value::String(s) => s == expected,
            other => other.to_string() == expected,
        }),
        Some(other) => other.to_string() == expected,
        None => false,
    }
}

impl Store for MemoryStore {
    fn insert(&self, item: Item) -> Result<(), StoreError> {
        let id = item_id(&item).ok_or(StoreError::MissingId)?;
        let mut items = self.write();

        if items.contains_key(&id) {
            return Err(StoreError::Conflict { id });
        }

        tracing::debug!(id = %id, "inserted item");
        items.insert(id, item);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        if self.write().remove(id).is_none() {
            return Err(StoreError::NotFound { id: id.to_string() });
        }

        tracing::debug!(id = %id, "deleted item");
        Ok(())
    }

    fn update(&self, id: &str, item: Item) -> Result<(), StoreError> {
        let mut items = self.write();
        let slot = items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        ensure_id(id, &item)?;
        *slot = item;
        Ok(())
    }

    fn patch(&self, id: &str, changes: Item) -> Result<Item, StoreError> {
        let mut items = self.write();
        let slot = items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        let mut item = slot.clone();
        merge(&mut item, changes);
        ensure_id(id, &item)?;
        *slot = item.clone();
        Ok(item)
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut items = self.write();
        let removed = items.len();
        items.clear();
        drop(items);

        tracing::debug!(removed, "cleared items");
        Ok(removed)
    }

    fn find(&self, id: &str) -> Option<Item> {
        self.read().get(id).cloned()
    }

    fn find_list(&self, filter: ListFilter) -> Vec<Item> {
        let items = self.read();
        let window = items.values().skip(filter.offset).cloned();
        match filter.limit {
            Some(limit) => window.take(limit).collect(),
            None => window.collect(),
        }
    }

    fn search(&self, params: &SearchParams) -> (Vec<Item>, Vec<String>) {
        let criteria: Vec<(&str, &str)> = params.criteria().collect();
        let found: Vec<Item> = self
            .read()
            .values()
            .filter(|item| criteria.iter().all(|(k, v)| field_matches(item, k, v)))
            .skip(params.offset())
            .take(params.limit().filter(|l| *l > 0).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        let mut facets: Vec<String> = Vec::new();
        for (key, _) in &criteria {
            if !facets.iter().any(|f| f == key) {
                facets.push((*key).to_string());
            }
        }

        (found, facets)
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}

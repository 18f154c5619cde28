//! Field-level schema attached to a resource.
//!
//! The routing core holds a schema by reference and never inspects its
//! fields; only [`Api::dispatch`](crate::Api::dispatch) hands item bodies to
//! [`Schema::validate`] before they reach the store.
//!
//! # Example
//!
//! ```rust
//! use apify::schema::{Field, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new(vec![Field::required("title"), Field::optional("body")]).strict();
//!
//! assert!(schema.validate(&json!({"title": "Hello"})).is_ok());
//! assert!(schema.validate(&json!({"body": "no title"})).is_err());
//! assert!(schema.validate(&json!({"title": "x", "tags": []})).is_err());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single field definition, keyed by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// The field name as it appears in item bodies.
    pub name: String,
    /// Whether item bodies must contain the field.
    #[serde(default)]
    pub required: bool,
}

impl Field {
    /// A field that every item body must contain.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    /// A field that item bodies may omit.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

/// The set of fields an item body is validated against.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
    #[serde(default)]
    strict: bool,
}

/// Error returned when an item body does not satisfy a schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The body is not a JSON object.
    #[error("Item body must be a JSON object")]
    NotAnObject,

    /// One or more fields failed validation.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed {
        /// A map of field names to error messages.
        errors: HashMap<String, Vec<String>>,
    },
}

impl Schema {
    /// Creates a schema from its field definitions.
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            strict: false,
        }
    }

    /// Rejects fields that the schema does not define.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Returns the field definitions.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates a full item body.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotAnObject`] for non-object bodies and
    /// [`SchemaError::ValidationFailed`] listing every missing or unknown field.
    pub fn validate(&self, item: &Value) -> Result<(), SchemaError> {
        self.check(item, true)
    }

    /// Validates a partial body, as sent for an update.
    ///
    /// Required fields may be absent; unknown fields are still rejected by a
    /// strict schema.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate), without missing-field errors.
    pub fn validate_partial(&self, item: &Value) -> Result<(), SchemaError> {
        self.check(item, false)
    }

    fn check(&self, item: &Value, require_all: bool) -> Result<(), SchemaError> {
        let object = item.as_object().ok_or(SchemaError::NotAnObject)?;
        let mut errors: HashMap<String, Vec<String>> = HashMap::new();

        if require_all {
            for field in self.fields.iter().filter(|f| f.required) {
                if object.get(&field.name).map_or(true, Value::is_null) {
                    errors
                        .entry(field.name.clone())
                        .or_default()
                        .push("can't be blank".to_string());
                }
            }
        }

        if self.strict {
            for key in object.keys() {
                if self.field(key).is_none() {
                    errors
                        .entry(key.clone())
                        .or_default()
                        .push("is not a known field".to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Schema>();
    assert_send_sync::<SchemaError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_schema() -> Schema {
        Schema::new(vec![
            Field::required("title"),
            Field::required("author"),
            Field::optional("body"),
        ])
    }

    #[test]
    fn test_validate_collects_every_missing_field() {
        let result = post_schema().validate(&json!({"body": "text", "title": null}));

        if let Err(SchemaError::ValidationFailed { errors }) = result {
            assert_eq!(errors.len(), 2);
            assert_eq!(
                errors.get("title"),
                Some(&vec!["can't be blank".to_string()])
            );
            assert!(errors.contains_key("author"));
        } else {
            panic!("Expected ValidationFailed variant");
        }
    }

    #[test]
    fn test_non_strict_schema_accepts_unknown_fields() {
        let item = json!({"title": "t", "author": "a", "tags": ["x"]});
        assert!(post_schema().validate(&item).is_ok());
        assert!(post_schema().strict().validate(&item).is_err());
    }

    #[test]
    fn test_partial_validation_skips_required_fields() {
        let schema = post_schema().strict();
        assert!(schema.validate_partial(&json!({"body": "new"})).is_ok());
        assert!(schema.validate_partial(&json!({"rating": 5})).is_err());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert_eq!(
            post_schema().validate(&json!(["title"])),
            Err(SchemaError::NotAnObject)
        );
    }

    #[test]
    fn test_schema_deserializes_with_defaults() {
        let schema: Schema =
            serde_json::from_str(r#"{"fields": [{"name": "title", "required": true}, {"name": "body"}]}"#)
                .unwrap();
        assert!(schema.field("title").unwrap().required);
        assert!(!schema.field("body").unwrap().required);
    }
}

//! Documents, filters and index specifications.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{DocumentError, DocumentResult};
use crate::constants::DOCUMENT_NAME_BYTES_MAX;

// =============================================================================
// Document
// =============================================================================

/// A stored document: a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a value into a document.
    ///
    /// # Errors
    /// Fails when the value cannot be serialized or does not serialize to a
    /// JSON object.
    pub fn encode<T: Serialize>(value: &T) -> DocumentResult<Self> {
        match serde_json::to_value(value).map_err(DocumentError::Encode)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DocumentError::NotAnObject(json_kind(&other))),
        }
    }

    /// Decode the document into `T`.
    ///
    /// # Errors
    /// Fails when the document does not match the shape of `T`.
    pub fn decode<T: DeserializeOwned>(self) -> DocumentResult<T> {
        serde_json::from_value(Value::Object(self.0)).map_err(DocumentError::Decode)
    }

    /// Get a top-level field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a top-level field, returning the document.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Convert into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for Document {
    type Error = DocumentError;

    fn try_from(value: Value) -> DocumentResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DocumentError::NotAnObject(json_kind(&other))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Equality filter on a single top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field: String,
    value: Value,
}

impl Filter {
    /// Match documents whose `field` equals `value`.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Filtered field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Expected value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether `doc` satisfies the filter. A missing field never matches.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        doc.get(&self.field) == Some(&self.value)
    }
}

// =============================================================================
// Index Spec
// =============================================================================

/// A single-field ascending index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexSpec {
    /// Indexed field
    pub field: String,
    /// Whether the index rejects duplicate values
    pub unique: bool,
}

impl IndexSpec {
    /// A unique index on `field`.
    #[must_use]
    pub fn unique(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            unique: true,
        }
    }

    /// Stable index name, so an equivalent index is recognized on re-creation.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}_1", self.field)
    }
}

/// Check a collection or field name: `[A-Za-z_][A-Za-z0-9_]*`, bounded length.
///
/// # Errors
/// Returns [`DocumentError::InvalidName`] for anything else.
pub fn validate_name(name: &str) -> DocumentResult<()> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if head_ok && tail_ok && name.len() <= DOCUMENT_NAME_BYTES_MAX {
        Ok(())
    } else {
        Err(DocumentError::InvalidName(name.to_string()))
    }
}

//! Documents.

use crate::id::DocumentId;
use jsongo_codec::{Map, Value};
use serde::{Deserialize, Serialize};

/// Reserved field holding a document's identifier.
pub const ID_FIELD: &str = "_id";

/// A single record: an ordered mapping from field name to [`Value`].
///
/// Once inserted into a store a document always carries [`ID_FIELD`]. A
/// document built by the caller is just a bag of fields; any `_id` it
/// carries is replaced on insert.
///
/// # Example
///
/// ```rust
/// use jsongo_core::Document;
///
/// let doc = Document::new().with("name", "a").with("age", 5);
/// assert_eq!(doc.get("age").and_then(|v| v.as_i64()), Some(5));
/// assert!(doc.id().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map);

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing field map.
    #[must_use]
    pub fn from_map(map: Map) -> Self {
        Self(map)
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Returns the document's `_id`, if it has a non-empty string one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self.0.get(ID_FIELD) {
            Some(Value::Text(id)) if !id.is_empty() => Some(id),
            _ => None,
        }
    }

    /// Returns the value of `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns true if the document has `field`, even when it is null.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Sets `field`, returning the previous value.
    ///
    /// An existing field keeps its position; a new field is appended.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Removes `field`, preserving the order of the remaining fields.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.shift_remove(field)
    }

    /// Number of fields, including `_id`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the underlying field map.
    #[must_use]
    pub fn as_map(&self) -> &Map {
        &self.0
    }

    /// Consumes the document, returning the field map.
    #[must_use]
    pub fn into_map(self) -> Map {
        self.0
    }

    /// Writes `id` into [`ID_FIELD`], returning any value it replaced.
    pub(crate) fn assign_id(&mut self, id: &DocumentId) -> Option<Value> {
        self.set(ID_FIELD, id.as_str())
    }
}

impl From<Map> for Document {
    fn from(map: Map) -> Self {
        Self(map)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.0)
    }
}

impl TryFrom<Value> for Document {
    type Error = Value;

    /// Succeeds only for objects; any other value is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.into_object().map(Self)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//! Exact-match queries and patches.

use crate::document::{Document, ID_FIELD};
use crate::error::{CoreError, CoreResult};
use crate::id::DocumentId;
use jsongo_codec::{Map, Value};

/// A conjunction of exact-match field constraints.
///
/// A document matches when, for every `(field, value)` pair, the document
/// has `field` and its value is deeply equal to `value`. Numbers compare by
/// numeric value, so a query for `5` matches a stored `5.0`.
///
/// - An empty query matches every document
/// - A missing field never matches, even when the query asks for null;
///   an explicitly null field does match a null constraint
///
/// # Example
///
/// ```rust
/// use jsongo_core::{Document, Query};
///
/// let doc = Document::new().with("name", "a").with("age", 5);
///
/// assert!(Query::new().eq("name", "a").matches(&doc));
/// assert!(Query::new().eq("name", "a").eq("age", 5.0).matches(&doc));
/// assert!(!Query::new().eq("age", 6).matches(&doc));
/// assert!(!Query::new().eq("missing_field", "x").matches(&doc));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    constraints: Map,
}

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A query matching every document.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A query matching the document with the given `_id`.
    #[must_use]
    pub fn by_id(id: &DocumentId) -> Self {
        Self::new().eq(ID_FIELD, id.as_str())
    }

    /// Adds the constraint `field == value`.
    ///
    /// A second constraint on the same field replaces the first.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constraints.insert(field.into(), value.into());
        self
    }

    /// Returns true if `document` satisfies every constraint.
    ///
    /// Stops at the first failing constraint.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        self.constraints
            .iter()
            .all(|(field, want)| {
                document.get(field).is_some_and(|have| have == want)
            })
    }

    /// Iterates over the constraints in the order they were added.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.constraints.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns true if the query has no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl From<Map> for Query {
    fn from(constraints: Map) -> Self {
        Self { constraints }
    }
}

impl TryFrom<Value> for Query {
    type Error = Value;

    /// Succeeds only for objects; any other value is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.into_object().map(Self::from)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            constraints: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Field assignments applied by [`crate::Store::update`].
///
/// Each `(field, value)` pair overwrites the field if present and appends it
/// otherwise. A patch may not touch `_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    assignments: Map,
}

impl Patch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the assignment `field = value`.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assignments.insert(field.into(), value.into());
        self
    }

    /// Iterates over the assignments in order.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.assignments.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns true if the patch assigns nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Checks that the patch leaves `_id` alone.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidOperation`] if the patch assigns `_id`.
    pub fn validate(&self) -> CoreResult<()> {
        if self.assignments.contains_key(ID_FIELD) {
            return Err(CoreError::invalid_operation(format!(
                "`{ID_FIELD}` is assigned at insert and cannot be patched"
            )));
        }
        Ok(())
    }

    /// Applies every assignment to `document`.
    pub(crate) fn apply_to(&self, document: &mut Document) {
        for (field, value) in &self.assignments {
            document.set(field.clone(), value.clone());
        }
    }
}

impl From<Map> for Patch {
    fn from(assignments: Map) -> Self {
        Self { assignments }
    }
}

impl TryFrom<Value> for Patch {
    type Error = Value;

    /// Succeeds only for objects; any other value is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.into_object().map(Self::from)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Patch {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            assignments: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        Document::try_from(Value::from(json!({
            "name": "a",
            "age": 5,
            "nick": null,
            "tags": ["x", "y"],
            "address": {"city": "Oslo", "zip": 150}
        })))
        .unwrap()
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(Query::all().matches(&sample()));
        assert!(Query::new().matches(&Document::new()));
    }

    #[test]
    fn single_and_multi_field_match() {
        let doc = sample();
        assert!(Query::new().eq("name", "a").matches(&doc));
        assert!(Query::new().eq("name", "a").eq("age", 5).matches(&doc));
        assert!(!Query::new().eq("name", "a").eq("age", 6).matches(&doc));
    }

    #[test]
    fn missing_field_never_matches() {
        let doc = sample();
        assert!(!Query::new().eq("missing_field", "x").matches(&doc));
        assert!(!Query::new().eq("missing_field", Value::Null).matches(&doc));
    }

    #[test]
    fn explicit_null_matches_null() {
        assert!(Query::new().eq("nick", Value::Null).matches(&sample()));
    }

    #[test]
    fn numbers_match_across_representation() {
        let doc = sample();
        assert!(Query::new().eq("age", 5.0).matches(&doc));
        assert!(!Query::new().eq("age", "5").matches(&doc));
    }

    #[test]
    fn nested_values_match_structurally() {
        let doc = sample();
        let address = Value::from(json!({"zip": 150.0, "city": "Oslo"}));
        assert!(Query::new().eq("address", address).matches(&doc));
        assert!(Query::new().eq("tags", vec!["x", "y"]).matches(&doc));
        assert!(!Query::new().eq("tags", vec!["y", "x"]).matches(&doc));
    }

    #[test]
    fn repeated_field_replaces_constraint() {
        let q = Query::new().eq("age", 1).eq("age", 5);
        assert_eq!(q.len(), 1);
        assert!(q.matches(&sample()));
    }

    #[test]
    fn query_from_json_object() {
        let q = Query::try_from(Value::from(json!({"name": "a"}))).unwrap();
        assert!(q.matches(&sample()));
        assert!(Query::try_from(Value::from(json!("name"))).is_err());
    }

    #[test]
    fn by_id_matches_only_that_id() {
        let id = DocumentId::new("abc");
        let doc = Document::new().with(ID_FIELD, "abc");
        assert!(Query::by_id(&id).matches(&doc));
        assert!(!Query::by_id(&DocumentId::new("abd")).matches(&doc));
    }

    #[test]
    fn patch_rejects_id() {
        assert!(Patch::new().set("age", 10).validate().is_ok());
        assert!(matches!(
            Patch::new().set("age", 10).set(ID_FIELD, "x").validate(),
            Err(CoreError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn patch_overwrites_and_appends() {
        let mut doc = sample();
        Patch::new()
            .set("age", 10)
            .set("email", "a@b")
            .apply_to(&mut doc);

        assert_eq!(doc.get("age"), Some(&Value::Integer(10)));
        assert_eq!(doc.get("email"), Some(&Value::from("a@b")));
        assert_eq!(doc.iter().last().map(|(k, _)| k), Some("email"));
    }
}

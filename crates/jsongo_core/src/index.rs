//! Per-field value indexes.
//!
//! A [`FieldIndex`] groups documents by their value for one field. It is a
//! point-in-time snapshot: the store builds it once, from the collection as
//! it is at that moment, and never updates it afterwards. Queries never
//! consult it.

use crate::document::Document;
use jsongo_codec::{IndexKey, Value};
use std::collections::HashMap;

/// Snapshot grouping of documents by the value of one field.
///
/// Documents lacking the field are omitted. Values are grouped by
/// [`IndexKey`], so `5` and `5.0` share a bucket. Within a bucket documents
/// keep collection order.
#[derive(Debug, Clone)]
pub struct FieldIndex {
    /// Indexed field name.
    field: String,
    /// Key to documents mapping.
    entries: HashMap<IndexKey, Vec<Document>>,
    /// Total indexed documents.
    count: usize,
}

impl FieldIndex {
    /// Builds an index over `documents` for `field`.
    pub fn build<'a, I>(field: impl Into<String>, documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let field = field.into();
        let mut entries: HashMap<IndexKey, Vec<Document>> = HashMap::new();
        let mut count = 0;

        for doc in documents {
            if let Some(value) = doc.get(&field) {
                entries
                    .entry(IndexKey::from(value))
                    .or_default()
                    .push(doc.clone());
                count += 1;
            }
        }

        Self {
            field,
            entries,
            count,
        }
    }

    /// Returns the indexed field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the documents whose field equalled `value` at build time.
    #[must_use]
    pub fn lookup(&self, value: &Value) -> &[Document] {
        self.entries
            .get(&IndexKey::from(value))
            .map_or(&[], Vec::as_slice)
    }

    /// Returns true if any document had `value` at build time.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.entries.contains_key(&IndexKey::from(value))
    }

    /// Iterates over the distinct keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &IndexKey> {
        self.entries.keys()
    }

    /// Number of distinct values.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Number of indexed documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no document had the field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

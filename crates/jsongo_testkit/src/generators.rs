//! Property-based test generators using proptest.
//!
//! Field names and scalar values are drawn from small pools so generated
//! queries actually hit generated documents.

use jsongo_core::{Document, Map, Patch, Query, Value};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

/// Field names used by the generators. `_id` is never generated.
pub const FIELD_NAMES: &[&str] = &["name", "age", "city", "tags", "active", "score"];

/// Strategy for generating field names.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(FIELD_NAMES).prop_map(str::to_string)
}

/// Strategy for generating scalar values (null, bool, number, string).
///
/// Floats are always finite, since JSON has no encoding for NaN or infinity.
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-5i64..5).prop_map(Value::Integer),
        any::<i64>().prop_map(Value::Integer),
        (-5i32..5).prop_map(|n| Value::Float(f64::from(n))),
        any::<f64>()
            .prop_filter("JSON floats are finite", |f| f.is_finite())
            .prop_map(Value::Float),
        prop::string::string_regex("[a-c]{0,3}")
            .expect("Invalid regex")
            .prop_map(Value::Text),
    ]
}

/// Strategy for generating arbitrary values, nested up to three levels.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_value_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((field_name_strategy(), inner), 0..4)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map>())),
        ]
    })
}

/// Strategy for generating documents without an `_id`.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::vec((field_name_strategy(), value_strategy()), 0..5)
        .prop_map(|pairs| pairs.into_iter().collect())
}

/// Strategy for generating a batch of documents.
pub fn documents_strategy(max: usize) -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(document_strategy(), 0..=max)
}

/// Strategy for generating queries of up to two scalar constraints.
pub fn query_strategy() -> impl Strategy<Value = Query> {
    prop::collection::vec((field_name_strategy(), scalar_value_strategy()), 0..3)
        .prop_map(|pairs| pairs.into_iter().collect())
}

/// Strategy for generating non-empty patches that never touch `_id`.
pub fn patch_strategy() -> impl Strategy<Value = Patch> {
    prop::collection::vec((field_name_strategy(), value_strategy()), 1..3)
        .prop_map(|pairs| pairs.into_iter().collect())
}

/// A mutating store operation.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Insert a document.
    Insert(Document),
    /// Update matches of a query with a patch.
    Update(Query, Patch),
    /// Remove matches of a query.
    Remove(Query),
}

/// Strategy for generating operations, weighted towards inserts.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => document_strategy().prop_map(Operation::Insert),
        2 => (query_strategy(), patch_strategy()).prop_map(|(q, p)| Operation::Update(q, p)),
        1 => query_strategy().prop_map(Operation::Remove),
    ]
}

/// Strategy for generating operation sequences.
pub fn operations_strategy(max: usize) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(), 1..=max)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsongo_core::ID_FIELD;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn generated_documents_have_no_id(doc in document_strategy()) {
            prop_assert!(!doc.contains(ID_FIELD));
        }

        #[test]
        fn generated_patches_are_valid(patch in patch_strategy()) {
            prop_assert!(patch.validate().is_ok());
            prop_assert!(!patch.is_empty());
        }

        #[test]
        fn generated_values_encode_as_json(value in value_strategy()) {
            let bytes = jsongo_codec::to_json(&value, false).unwrap();
            let back = jsongo_codec::from_json(&bytes).unwrap();
            prop_assert_eq!(back, value);
        }

        #[test]
        fn generated_queries_use_known_fields(query in query_strategy()) {
            for (field, _) in query.constraints() {
                prop_assert!(FIELD_NAMES.contains(&field));
            }
        }
    }
}

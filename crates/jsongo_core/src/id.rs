//! Document identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Process-wide sequence shared by every generator.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifier stored in a document's `_id` field.
///
/// IDs are:
/// - Non-empty strings
/// - Assigned once, at insertion
/// - Never reassigned afterwards
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an existing id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl PartialEq<str> for DocumentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DocumentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// How new ids are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Wall-clock time followed by a process-wide monotonic counter, in hex.
    ///
    /// Unique for the lifetime of the process; ids also sort roughly by
    /// creation time.
    #[default]
    Sequential,
    /// A random v4 UUID in hyphenated form.
    Uuid,
}

/// Generates `_id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator {
    strategy: IdStrategy,
}

impl IdGenerator {
    /// Creates a generator using `strategy`.
    #[must_use]
    pub const fn new(strategy: IdStrategy) -> Self {
        Self { strategy }
    }

    /// Returns the strategy in use.
    #[must_use]
    pub const fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Generates a fresh id.
    #[must_use]
    pub fn generate(&self) -> DocumentId {
        match self.strategy {
            IdStrategy::Sequential => Self::sequential(),
            IdStrategy::Uuid => DocumentId(Uuid::new_v4().to_string()),
        }
    }

    fn sequential() -> DocumentId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        DocumentId(format!(
            "{:08x}{:05x}{:06x}",
            now.as_secs(),
            now.subsec_micros(),
            seq & 0x00FF_FFFF
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequential_ids_are_unique() {
        let generator = IdGenerator::default();
        let ids: HashSet<_> = (0..10_000).map(|_| generator.generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn sequential_id_shape() {
        let id = IdGenerator::new(IdStrategy::Sequential).generate();
        assert_eq!(id.as_str().len(), 19);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn uuid_ids_are_unique() {
        let generator = IdGenerator::new(IdStrategy::Uuid);
        let a = generator.generate();
        let b = generator.generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn ids_are_non_empty() {
        for strategy in [IdStrategy::Sequential, IdStrategy::Uuid] {
            assert!(!IdGenerator::new(strategy).generate().as_str().is_empty());
        }
    }

    #[test]
    fn conversions() {
        let id = DocumentId::from("abc");
        assert_eq!(id, "abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(format!("{id:?}"), "DocumentId(abc)");
        assert_eq!(String::from(id.clone()), "abc");
        assert_eq!(id.into_string(), "abc");
    }
}

//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The snapshot does not exist.
    #[error("no snapshot at {location}")]
    NotFound {
        /// Where the snapshot was expected.
        location: String,
    },

    /// The new snapshot replaced the old one, but durability of the
    /// replacement could not be confirmed.
    ///
    /// Readers already see the new snapshot, so the write must be treated
    /// as applied.
    #[error("snapshot at {location} replaced but not made durable: {source}")]
    NotDurable {
        /// Where the snapshot lives.
        location: String,
        /// The failed sync.
        #[source]
        source: io::Error,
    },

    /// A fault injected by a test backend.
    #[error("injected fault: {0}")]
    Injected(String),
}

impl StorageError {
    /// Creates a not-found error.
    pub fn not_found(location: impl Into<String>) -> Self {
        Self::NotFound {
            location: location.into(),
        }
    }

    /// Creates a not-durable error.
    pub fn not_durable(location: impl Into<String>, source: io::Error) -> Self {
        Self::NotDurable {
            location: location.into(),
            source,
        }
    }

    /// Returns true if the write this error came from was still applied.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::NotDurable { .. })
    }

    /// Returns true if this error means the snapshot is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io(err) => err.kind() == io::ErrorKind::NotFound,
            Self::NotDurable { .. } | Self::Injected(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_durable_is_committed() {
        let err = StorageError::not_durable("store.json", io::Error::other("fsync"));
        assert!(err.is_committed());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("store.json"));

        assert!(!StorageError::not_found("store.json").is_committed());
        assert!(!StorageError::Io(io::Error::other("disk")).is_committed());
        assert!(!StorageError::Injected("x".into()).is_committed());
    }
}

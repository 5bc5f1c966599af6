//! Error types for jsongo core.

use jsongo_codec::CodecError;
use jsongo_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in store operations.
///
/// Storage failures are classified by the operation that hit them, so the
/// same underlying I/O error surfaces as [`CoreError::FileCreate`] on open
/// and as [`CoreError::FileWrite`] after an insert.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The initial empty store file could not be created.
    #[error("cannot create store file {path}: {source}")]
    FileCreate {
        /// Location of the store.
        path: String,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },

    /// The store file exists but could not be read.
    #[error("cannot read store file {path}: {source}")]
    FileRead {
        /// Location of the store.
        path: String,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },

    /// The store file is not a JSON array of objects.
    #[error("corrupt store file {path}: {source}")]
    CorruptStore {
        /// Location of the store.
        path: String,
        /// What was wrong with the contents.
        #[source]
        source: CodecError,
    },

    /// Persisting the collection failed.
    #[error("cannot write store file {path}: {source}")]
    FileWrite {
        /// Location of the store.
        path: String,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },

    /// Deleting the store file failed.
    #[error("cannot delete store file {path}: {source}")]
    Io {
        /// Location of the store.
        path: String,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },

    /// Operation not permitted.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },

    /// The store file is absent and creation was disabled.
    #[error("store file does not exist: {path}")]
    StoreNotFound {
        /// Location of the store.
        path: String,
    },

    /// The store file already exists and `error_if_exists` was set.
    #[error("store file already exists: {path}")]
    StoreExists {
        /// Location of the store.
        path: String,
    },

    /// Another handle holds the store's lock.
    #[error("store locked: another handle has exclusive access to {path}")]
    StoreLocked {
        /// Location of the store.
        path: String,
    },

    /// The platform refused the advisory lock for a reason other than
    /// contention.
    #[error("cannot lock store {path}: {source}")]
    LockFailed {
        /// Location of the store.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be serialized.
    #[error("cannot encode collection: {0}")]
    Encode(#[source] CodecError),
}

impl CoreError {
    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates a file create error.
    pub fn file_create(path: impl Into<String>, source: StorageError) -> Self {
        Self::FileCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a file read error.
    pub fn file_read(path: impl Into<String>, source: StorageError) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a corrupt store error.
    pub fn corrupt_store(path: impl Into<String>, source: CodecError) -> Self {
        Self::CorruptStore {
            path: path.into(),
            source,
        }
    }

    /// Creates a file write error.
    pub fn file_write(path: impl Into<String>, source: StorageError) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a delete error.
    pub fn io(path: impl Into<String>, source: StorageError) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

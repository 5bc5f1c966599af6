//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-snapshot storage backend for jsongo.
///
/// Backends are **opaque byte stores** holding a single snapshot. There is no
/// append and no partial read: the store reads the full snapshot on open and
/// replaces it in full after every mutation.
///
/// # Invariants
///
/// - After `write(data)` succeeds, `read()` returns exactly `data`
/// - After `remove()` succeeds, `exists()` returns false
/// - A failed `write` leaves the previous snapshot readable whenever the
///   backend supports it (see [`super::WriteMode::Atomic`])
///
/// # Implementors
///
/// - [`super::FileBackend`] - For persistent storage
/// - [`super::InMemoryBackend`] - For testing
pub trait StorageBackend: Send + Sync {
    /// Returns true if a snapshot is currently present.
    ///
    /// # Errors
    ///
    /// Returns an error if presence cannot be determined.
    fn exists(&self) -> StorageResult<bool>;

    /// Reads the full snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`super::StorageError::NotFound`] if no snapshot exists, or an
    /// I/O error if it cannot be read.
    fn read(&self) -> StorageResult<Vec<u8>>;

    /// Replaces the snapshot with `data`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be written. An error for which
    /// [`super::StorageError::is_committed`] holds means the snapshot was
    /// nevertheless replaced.
    fn write(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Deletes the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is absent or cannot be removed.
    fn remove(&mut self) -> StorageResult<()>;

    /// Human-readable location of the snapshot, used in error messages.
    fn location(&self) -> String;
}

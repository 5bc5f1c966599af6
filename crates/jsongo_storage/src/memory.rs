//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::io;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MemoryState {
    data: Option<Vec<u8>>,
    fail_writes: bool,
    fail_removes: bool,
    fail_syncs: bool,
    writes: u64,
}

/// An in-memory storage backend.
///
/// This backend keeps the snapshot in memory and is suitable for:
/// - Unit tests
/// - Failure-injection tests (see [`InMemoryBackend::fail_writes`])
/// - Ephemeral stores that don't need persistence
///
/// Clones share the same snapshot, so a test can hand one clone to a store
/// and keep another to inspect what the store wrote.
///
/// # Example
///
/// ```rust
/// use jsongo_storage::{StorageBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// let observer = backend.clone();
///
/// backend.write(b"[]").unwrap();
/// assert_eq!(observer.data(), Some(b"[]".to_vec()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryBackend {
    /// Creates a new backend with no snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new backend holding an existing snapshot.
    ///
    /// Useful for testing load and corruption scenarios.
    #[must_use]
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        let backend = Self::default();
        backend.state.write().data = Some(data.into());
        backend
    }

    /// Returns a copy of the current snapshot, if any.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.state.read().data.clone()
    }

    /// Returns how many successful writes have been performed.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.state.read().writes
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.state.write().fail_writes = fail;
    }

    /// Makes subsequent writes apply the snapshot, then report it as not
    /// durable, the way a failed directory sync after a rename does.
    pub fn fail_syncs(&self, fail: bool) {
        self.state.write().fail_syncs = fail;
    }

    /// Makes subsequent removes fail (or succeed again).
    pub fn fail_removes(&self, fail: bool) {
        self.state.write().fail_removes = fail;
    }
}

impl StorageBackend for InMemoryBackend {
    fn exists(&self) -> StorageResult<bool> {
        Ok(self.state.read().data.is_some())
    }

    fn read(&self) -> StorageResult<Vec<u8>> {
        self.state
            .read()
            .data
            .clone()
            .ok_or_else(|| StorageError::not_found(self.location()))
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut state = self.state.write();
        if state.fail_writes {
            return Err(StorageError::Injected("write rejected".into()));
        }
        state.data = Some(data.to_vec());
        state.writes += 1;
        if state.fail_syncs {
            return Err(StorageError::not_durable(
                self.location(),
                io::Error::other("sync rejected"),
            ));
        }
        Ok(())
    }

    fn remove(&mut self) -> StorageResult<()> {
        let mut state = self.state.write();
        if state.fail_removes {
            return Err(StorageError::Injected("remove rejected".into()));
        }
        match state.data.take() {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(self.location())),
        }
    }

    fn location(&self) -> String {
        ":memory:".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = InMemoryBackend::new();
        assert!(!backend.exists().unwrap());
        assert!(backend.read().unwrap_err().is_not_found());
    }

    #[test]
    fn memory_write_and_read() {
        let mut backend = InMemoryBackend::new();
        backend.write(b"hello").unwrap();

        assert!(backend.exists().unwrap());
        assert_eq!(backend.read().unwrap(), b"hello");
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn memory_with_data() {
        let backend = InMemoryBackend::with_data(b"[]".to_vec());
        assert_eq!(backend.read().unwrap(), b"[]");
    }

    #[test]
    fn memory_clones_share_state() {
        let mut backend = InMemoryBackend::new();
        let observer = backend.clone();

        backend.write(b"one").unwrap();
        backend.write(b"two").unwrap();

        assert_eq!(observer.data(), Some(b"two".to_vec()));
        assert_eq!(observer.write_count(), 2);
    }

    #[test]
    fn memory_injected_write_failure_keeps_snapshot() {
        let mut backend = InMemoryBackend::with_data(b"old".to_vec());
        backend.fail_writes(true);

        assert!(matches!(
            backend.write(b"new"),
            Err(StorageError::Injected(_))
        ));
        assert_eq!(backend.read().unwrap(), b"old");

        backend.fail_writes(false);
        backend.write(b"new").unwrap();
        assert_eq!(backend.read().unwrap(), b"new");
    }

    #[test]
    fn memory_injected_sync_failure_still_applies() {
        let mut backend = InMemoryBackend::with_data(b"old".to_vec());
        backend.fail_syncs(true);

        let err = backend.write(b"new").unwrap_err();
        assert!(err.is_committed());
        assert_eq!(backend.read().unwrap(), b"new");
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn memory_remove() {
        let mut backend = InMemoryBackend::with_data(b"[]".to_vec());
        backend.remove().unwrap();

        assert!(!backend.exists().unwrap());
        assert!(backend.remove().unwrap_err().is_not_found());
    }

    #[test]
    fn memory_injected_remove_failure() {
        let mut backend = InMemoryBackend::with_data(b"[]".to_vec());
        backend.fail_removes(true);

        assert!(backend.remove().is_err());
        assert!(backend.exists().unwrap());
    }
}

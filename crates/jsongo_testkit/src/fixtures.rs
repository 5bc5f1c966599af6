//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common test scenarios.

use jsongo_core::{Config, Document, Store, Value};
use jsongo_storage::InMemoryBackend;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

/// File name used for file-backed test stores.
pub const STORE_FILE: &str = "store.json";

/// A test store with automatic cleanup.
///
/// Memory stores keep a handle on their backend so tests can inspect the
/// saved bytes or inject failures. File stores live in a temporary
/// directory removed on drop.
pub struct TestStore {
    store: Option<Store>,
    config: Config,
    backend: Option<InMemoryBackend>,
    path: Option<PathBuf>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates a new in-memory test store.
    pub fn memory() -> Self {
        let config = Config::default();
        let backend = InMemoryBackend::new();
        let store = Store::open_with_backend(backend.clone(), config.clone())
            .expect("Failed to open in-memory store");

        Self {
            store: Some(store),
            config,
            backend: Some(backend),
            path: None,
            _temp_dir: None,
        }
    }

    /// Creates a new file-based test store.
    pub fn file() -> Self {
        Self::file_with_config(Config::default())
    }

    /// Creates a new file-based test store with custom configuration.
    pub fn file_with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(STORE_FILE);
        let store =
            Store::open_with_config(&path, config.clone()).expect("Failed to open file store");

        Self {
            store: Some(store),
            config,
            backend: None,
            path: Some(path),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the store file path if file-based, None if in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the memory backend if in-memory, None if file-based.
    pub fn backend(&self) -> Option<&InMemoryBackend> {
        self.backend.as_ref()
    }

    /// Closes the store and opens it again from its backing snapshot.
    pub fn reopen(&mut self) {
        // Drop first so the file lock is released.
        self.store = None;

        let store = match (&self.backend, &self.path) {
            (Some(backend), _) => Store::open_with_backend(backend.clone(), self.config.clone()),
            (None, Some(path)) => Store::open_with_config(path, self.config.clone()),
            (None, None) => unreachable!("test store has neither backend nor path"),
        };
        self.store = Some(store.expect("Failed to reopen store"));
    }

    /// Takes the store out of the fixture, e.g. to drop it.
    ///
    /// The temporary directory stays alive with the fixture.
    pub fn take(&mut self) -> Store {
        self.store.take().expect("Store already taken")
    }

    /// Reads the saved collection back from the backing snapshot.
    pub fn saved_documents(&self) -> Vec<Document> {
        let bytes = match (&self.backend, &self.path) {
            (Some(backend), _) => backend.data().expect("Memory backend is empty"),
            (None, Some(path)) => std::fs::read(path).expect("Failed to read store file"),
            (None, None) => unreachable!("test store has neither backend nor path"),
        };
        jsongo_codec::decode_collection(&bytes)
            .expect("Saved store is not a document array")
            .into_iter()
            .map(Document::from_map)
            .collect()
    }
}

impl std::ops::Deref for TestStore {
    type Target = Store;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref().expect("Store already taken")
    }
}

impl std::ops::DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.store.as_mut().expect("Store already taken")
    }
}

/// Builds a document from a JSON object literal.
///
/// # Panics
///
/// Panics if `json` is not an object.
pub fn document(json: serde_json::Value) -> Document {
    Document::try_from(Value::from(json)).expect("Document literal must be a JSON object")
}

/// Installs a `tracing` subscriber for test output, once per process.
///
/// Honors `RUST_LOG`; defaults to `debug` for the jsongo crates.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jsongo_core=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Runs a test with a temporary in-memory store.
///
/// # Example
///
/// ```rust,ignore
/// use jsongo_testkit::with_temp_store;
///
/// #[test]
/// fn my_test() {
///     with_temp_store(|store| {
///         assert_eq!(store.count(), 0);
///     });
/// }
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut Store) -> R,
{
    let mut test_store = TestStore::memory();
    f(&mut test_store)
}

/// Runs a test with a temporary file-based store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut Store, &Path) -> R,
{
    let mut test_store = TestStore::file();
    let path = test_store
        .path()
        .expect("File store should have a path")
        .to_path_buf();
    f(&mut test_store, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use serde_json::json;

    /// Creates a store with `count` documents `{"index": i, "group": i % 3}`.
    pub fn populated_store(count: usize) -> TestStore {
        let mut test_store = TestStore::memory();
        let docs = (0..count).map(|i| document(json!({"index": i, "group": i % 3})));
        test_store
            .insert_many(docs)
            .expect("Failed to insert documents");
        test_store
    }

    /// Creates a file store holding a few people with mixed field types.
    pub fn people_store() -> TestStore {
        let mut test_store = TestStore::file();
        let people = [
            json!({"name": "ada", "age": 36, "tags": ["math"], "active": true}),
            json!({"name": "brian", "age": 5, "address": {"city": "x"}}),
            json!({"name": "carol", "age": 5.0, "active": false}),
            json!({"name": "dave", "email": null}),
        ];
        for person in people {
            test_store
                .insert(document(person))
                .expect("Failed to insert person");
        }
        test_store
    }
}

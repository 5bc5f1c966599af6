//! The document store.

use crate::config::Config;
use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use crate::id::{DocumentId, IdGenerator};
use crate::index::FieldIndex;
#[cfg(feature = "std")]
use crate::lock::StoreLock;
use crate::query::{Patch, Query};
use crate::stats::{StatsSnapshot, StoreStats};
use jsongo_codec::{decode_collection, encode_collection};
use jsongo_storage::{FileBackend, InMemoryBackend, StorageBackend};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// The main store handle.
///
/// A `Store` owns one ordered collection of [`Document`]s, the field
/// indexes built over it, and the backend holding its JSON file. Every
/// operation runs synchronously against the in-memory collection; every
/// mutating operation then rewrites the whole file.
///
/// # Consistency
///
/// After a mutating call returns `Ok`, the file is an exact serialization
/// of the collection. If persisting fails the call returns the error and the
/// in-memory collection is rolled back to its state before the call, so the
/// file and memory still agree on the last successful snapshot. A save whose
/// new file is already in place but could not be confirmed durable counts as
/// successful and is only logged.
///
/// # Concurrency
///
/// Mutation takes `&mut self`, so one handle is single-writer by
/// construction. Across handles and processes the file is guarded by an
/// advisory lock (see [`Config::exclusive_lock`]); without it, concurrent
/// writers overwrite each other.
///
/// The lock lives on a sibling `<file>.lock`, created on first open and
/// left in place when the store is closed. Deleting it while a handle is
/// open would let a second handle lock a fresh file, so only
/// [`Store::drop_store`] removes it. If the lock file cannot be created,
/// for instance in a read-only directory, an existing store file is locked
/// directly (see [`StoreLock`]).
///
/// # Example
///
/// ```rust,no_run
/// use jsongo_core::{Document, Patch, Query, Store};
///
/// let mut store = Store::open("users.json")?;
///
/// let id = store.insert(Document::new().with("name", "a").with("age", 5))?;
/// store.update(&Query::new().eq("age", 5), &Patch::new().set("age", 10))?;
///
/// let found = store.find_one(&Query::new().eq("age", 10)).unwrap();
/// assert_eq!(found.id(), Some(id.as_str()));
/// # Ok::<(), jsongo_core::CoreError>(())
/// ```
pub struct Store {
    /// Configuration.
    config: Config,
    /// Backend location, for logs and errors.
    location: String,
    /// Backing snapshot.
    backend: Box<dyn StorageBackend>,
    /// The collection, in insertion order.
    documents: Vec<Document>,
    /// Field indexes, keyed by field name.
    indexes: HashMap<String, FieldIndex>,
    /// `_id` generator.
    ids: IdGenerator,
    /// Operation counters.
    stats: StoreStats,
    /// Advisory lock, held until the store is dropped.
    #[cfg(feature = "std")]
    lock: Option<StoreLock>,
}

impl Store {
    /// Opens the store file at `path`, creating it as `[]` if absent.
    ///
    /// # Errors
    ///
    /// - [`CoreError::FileCreate`] if the empty file cannot be created
    /// - [`CoreError::FileRead`] if the file cannot be read
    /// - [`CoreError::CorruptStore`] if the file is not a JSON array of objects
    /// - [`CoreError::StoreLocked`] if another handle holds the store
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens the store file at `path` with custom configuration.
    ///
    /// # Errors
    ///
    /// Everything [`Store::open`] returns, plus [`CoreError::StoreNotFound`]
    /// and [`CoreError::StoreExists`] as selected by `config`.
    pub fn open_with_config(path: impl AsRef<Path>, config: Config) -> CoreResult<Self> {
        let path = path.as_ref();

        #[cfg(feature = "std")]
        let lock = if config.exclusive_lock {
            Some(StoreLock::acquire(path)?)
        } else {
            None
        };

        let backend = FileBackend::new(path)
            .with_write_mode(config.write_mode)
            .with_sync(config.sync_on_write);

        match Self::load(Box::new(backend), config) {
            #[cfg(feature = "std")]
            Ok(mut store) => {
                store.lock = lock;
                Ok(store)
            }
            #[cfg(not(feature = "std"))]
            Ok(store) => Ok(store),
            Err(err) => {
                #[cfg(feature = "std")]
                if let Some(lock) = lock {
                    if !path.exists() {
                        lock.release_and_remove();
                    }
                }
                Err(err)
            }
        }
    }

    /// Opens an empty store that lives only in memory.
    ///
    /// # Errors
    ///
    /// Infallible in practice; the signature matches the other constructors.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::open_with_backend(InMemoryBackend::new(), Config::default())
    }

    /// Opens a store over an arbitrary backend.
    ///
    /// `config.exclusive_lock` is ignored; locking is tied to file paths.
    ///
    /// # Errors
    ///
    /// Same as [`Store::open_with_config`], minus locking.
    pub fn open_with_backend(
        backend: impl StorageBackend + 'static,
        config: Config,
    ) -> CoreResult<Self> {
        Self::load(Box::new(backend), config)
    }

    fn load(mut backend: Box<dyn StorageBackend>, config: Config) -> CoreResult<Self> {
        let location = backend.location();
        let exists = backend
            .exists()
            .map_err(|e| CoreError::file_read(&location, e))?;

        if exists && config.error_if_exists {
            return Err(CoreError::StoreExists { path: location });
        }

        if !exists {
            if !config.create_if_missing {
                return Err(CoreError::StoreNotFound { path: location });
            }
            let empty =
                encode_collection::<Document>(&[], config.pretty).map_err(CoreError::Encode)?;
            match backend.write(&empty) {
                Ok(()) => {}
                Err(err) if err.is_committed() => {
                    warn!(path = %location, error = %err, "created store file without durability");
                }
                Err(err) => return Err(CoreError::file_create(&location, err)),
            }
            debug!(path = %location, "created empty store file");
        }

        let bytes = backend
            .read()
            .map_err(|e| CoreError::file_read(&location, e))?;
        let documents: Vec<Document> = decode_collection(&bytes)
            .map_err(|e| CoreError::corrupt_store(&location, e))?
            .into_iter()
            .map(Document::from_map)
            .collect();

        let without_id = documents.iter().filter(|d| d.id().is_none()).count();
        if without_id > 0 {
            warn!(path = %location, count = without_id, "store contains documents without an _id");
        }

        let stats = StoreStats::new();
        stats.record_load(bytes.len() as u64);
        info!(path = %location, documents = documents.len(), "opened store");

        Ok(Self {
            ids: IdGenerator::new(config.id_strategy),
            config,
            location,
            backend,
            documents,
            indexes: HashMap::new(),
            stats,
            #[cfg(feature = "std")]
            lock: None,
        })
    }

    /// Inserts `document`, returning its newly assigned `_id`.
    ///
    /// The document is appended to the end of the collection. Any `_id` it
    /// already carried is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileWrite`] if persisting fails; the document is
    /// then not in the collection.
    pub fn insert(&mut self, mut document: Document) -> CoreResult<DocumentId> {
        let id = self.ids.generate();
        if let Some(previous) = document.assign_id(&id) {
            warn!(previous = %previous, id = %id, "replacing caller-supplied _id on insert");
        }
        self.documents.push(document);

        if let Err(err) = self.save() {
            self.documents.pop();
            return Err(err);
        }

        self.stats.record_inserts(1);
        debug!(id = %id, "inserted document");
        Ok(id)
    }

    /// Inserts several documents with a single save.
    ///
    /// Ids are returned in argument order, which is also collection order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileWrite`] if persisting fails; none of the
    /// documents are then in the collection.
    pub fn insert_many<I>(&mut self, documents: I) -> CoreResult<Vec<DocumentId>>
    where
        I: IntoIterator<Item = Document>,
    {
        let before = self.documents.len();
        let mut ids = Vec::new();

        for mut document in documents {
            let id = self.ids.generate();
            if let Some(previous) = document.assign_id(&id) {
                warn!(previous = %previous, id = %id, "replacing caller-supplied _id on insert");
            }
            self.documents.push(document);
            ids.push(id);
        }

        if let Err(err) = self.save() {
            self.documents.truncate(before);
            return Err(err);
        }

        self.stats.record_inserts(ids.len() as u64);
        debug!(count = ids.len(), "inserted documents");
        Ok(ids)
    }

    /// Returns copies of every document matching `query`, in insertion order.
    ///
    /// Always a full scan; indexes are never consulted.
    #[must_use]
    pub fn find(&self, query: &Query) -> Vec<Document> {
        self.find_iter(query).cloned().collect()
    }

    /// Returns a copy of the first document matching `query`, if any.
    #[must_use]
    pub fn find_one(&self, query: &Query) -> Option<Document> {
        self.find_iter(query).next().cloned()
    }

    /// Iterates over documents matching `query` without copying them.
    pub fn find_iter<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = &'a Document> + 'a {
        self.stats.record_scan();
        self.documents.iter().filter(move |doc| query.matches(doc))
    }

    /// Returns the document with the given `_id`.
    #[must_use]
    pub fn get(&self, id: impl AsRef<str>) -> Option<&Document> {
        let id = id.as_ref();
        self.documents.iter().find(|doc| doc.id() == Some(id))
    }

    /// Applies `patch` to every document matching `query`, returning how
    /// many documents were updated.
    ///
    /// Matches are selected first, against the collection as it is when the
    /// call starts, then patched in place. Zero matches still saves.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidOperation`] if `patch` assigns `_id`; nothing is
    ///   changed or saved
    /// - [`CoreError::FileWrite`] if persisting fails; the patched documents
    ///   are restored
    pub fn update(&mut self, query: &Query, patch: &Patch) -> CoreResult<usize> {
        patch.validate()?;

        let positions = self.matching_positions(query);
        let previous: Vec<(usize, Document)> = positions
            .iter()
            .map(|&pos| (pos, self.documents[pos].clone()))
            .collect();

        for &pos in &positions {
            patch.apply_to(&mut self.documents[pos]);
        }

        if let Err(err) = self.save() {
            for (pos, doc) in previous {
                self.documents[pos] = doc;
            }
            return Err(err);
        }

        self.stats.record_updates(positions.len() as u64);
        debug!(matched = positions.len(), "updated documents");
        Ok(positions.len())
    }

    /// Deletes every document matching `query`, returning how many were
    /// removed.
    ///
    /// Documents are removed by their position in the collection, so two
    /// value-identical documents are distinct. The remaining documents keep
    /// their relative order. Zero matches still saves.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileWrite`] if persisting fails; the removed
    /// documents are put back where they were.
    pub fn remove(&mut self, query: &Query) -> CoreResult<usize> {
        let positions = self.matching_positions(query);

        let mut removed = Vec::with_capacity(positions.len());
        let mut kept = Vec::with_capacity(self.documents.len() - positions.len());
        for (pos, doc) in std::mem::take(&mut self.documents).into_iter().enumerate() {
            if positions.binary_search(&pos).is_ok() {
                removed.push((pos, doc));
            } else {
                kept.push(doc);
            }
        }
        self.documents = kept;

        if let Err(err) = self.save() {
            // Ascending positions, so each insert lands where it started.
            for (pos, doc) in removed {
                self.documents.insert(pos, doc);
            }
            return Err(err);
        }

        self.stats.record_removes(removed.len() as u64);
        debug!(removed = removed.len(), "removed documents");
        Ok(removed.len())
    }

    /// Returns the number of documents.
    #[must_use]
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Builds an index on `field` unless one already exists.
    ///
    /// The index captures the collection as it is now and is not maintained
    /// by later inserts, updates or removes. An existing index is kept as is,
    /// however stale. Queries do not use indexes.
    pub fn ensure_index(&mut self, field: &str) {
        if self.indexes.contains_key(field) {
            return;
        }

        let index = FieldIndex::build(field, &self.documents);
        trace!(
            field,
            distinct = index.distinct(),
            indexed = index.len(),
            "built index"
        );
        self.stats.record_index_build();
        self.indexes.insert(field.to_string(), index);
    }

    /// Returns the index on `field`, if one was built.
    #[must_use]
    pub fn index(&self, field: &str) -> Option<&FieldIndex> {
        self.indexes.get(field)
    }

    /// Returns true if an index on `field` exists.
    #[must_use]
    pub fn has_index(&self, field: &str) -> bool {
        self.indexes.contains_key(field)
    }

    /// Iterates over the names of indexed fields.
    pub fn indexed_fields(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }

    /// Deletes the backing file and consumes the store.
    ///
    /// The in-memory collection and indexes are discarded whether or not
    /// the delete succeeds. Opening the same path afterwards creates a fresh
    /// empty store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be deleted.
    pub fn drop_store(mut self) -> CoreResult<()> {
        self.documents.clear();
        self.indexes.clear();

        let result = self
            .backend
            .remove()
            .map_err(|e| CoreError::io(&self.location, e));

        #[cfg(feature = "std")]
        if let Some(lock) = self.lock.take() {
            lock.release_and_remove();
        }

        match &result {
            Ok(()) => info!(path = %self.location, "dropped store"),
            Err(err) => warn!(path = %self.location, error = %err, "failed to drop store"),
        }
        result
    }

    /// Returns the documents in insertion order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Iterates over all documents in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Returns the backend location (the file path for file stores).
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a snapshot of the operation counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Positions of matching documents, ascending.
    fn matching_positions(&self, query: &Query) -> Vec<usize> {
        self.stats.record_scan();
        self.documents
            .iter()
            .enumerate()
            .filter(|(_, doc)| query.matches(doc))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Replaces the backing file with the current collection.
    fn save(&mut self) -> CoreResult<()> {
        let bytes =
            encode_collection(&self.documents, self.config.pretty).map_err(CoreError::Encode)?;

        match self.backend.write(&bytes) {
            Ok(()) => {
                self.stats.record_save(bytes.len() as u64);
                debug!(
                    bytes = bytes.len(),
                    documents = self.documents.len(),
                    "saved store"
                );
                Ok(())
            }
            // The new snapshot is in place, so memory must keep matching it.
            Err(err) if err.is_committed() => {
                self.stats.record_save(bytes.len() as u64);
                warn!(path = %self.location, error = %err, "saved store without durability");
                Ok(())
            }
            Err(err) => {
                self.stats.record_failed_save();
                warn!(path = %self.location, error = %err, "save failed; rolling back");
                Err(CoreError::file_write(&self.location, err))
            }
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("location", &self.location)
            .field("documents", &self.documents.len())
            .field("indexes", &self.indexes.len())
            .finish_non_exhaustive()
    }
}

impl<'a> IntoIterator for &'a Store {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

//! Cross-crate integration test helpers.
//!
//! [`StoreHarness`] drives a real store alongside a plain `Vec<Document>`
//! model and checks that the two agree, in memory and on disk.

use crate::fixtures::TestStore;
use crate::generators::Operation;
use jsongo_core::{Document, DocumentId, Patch, Query};

/// A test harness that mirrors every store mutation in a model.
pub struct StoreHarness {
    /// The store under test.
    pub store: TestStore,
    /// Expected collection, in insertion order.
    expected: Vec<Document>,
}

impl StoreHarness {
    /// Creates a harness over an in-memory store.
    pub fn memory() -> Self {
        Self::with_store(TestStore::memory())
    }

    /// Creates a harness over a file store.
    pub fn file() -> Self {
        Self::with_store(TestStore::file())
    }

    /// Creates a harness over an empty test store.
    pub fn with_store(store: TestStore) -> Self {
        assert_eq!(store.count(), 0, "Harness store must start empty");
        Self {
            store,
            expected: Vec::new(),
        }
    }

    /// Inserts a document into both the store and the model.
    pub fn insert(&mut self, document: Document) -> DocumentId {
        let id = self
            .store
            .insert(document.clone())
            .expect("Failed to insert");
        let mut expected = document;
        expected.set(jsongo_core::ID_FIELD, id.as_str());
        self.expected.push(expected);
        id
    }

    /// Updates matching documents in both the store and the model.
    pub fn update(&mut self, query: &Query, patch: &Patch) -> usize {
        let updated = self.store.update(query, patch).expect("Failed to update");

        let mut modeled = 0;
        for doc in self.expected.iter_mut().filter(|d| query.matches(d)) {
            for (field, value) in patch.assignments() {
                doc.set(field, value.clone());
            }
            modeled += 1;
        }
        assert_eq!(updated, modeled, "Update count mismatch");
        updated
    }

    /// Removes matching documents from both the store and the model.
    pub fn remove(&mut self, query: &Query) -> usize {
        let removed = self.store.remove(query).expect("Failed to remove");

        let before = self.expected.len();
        self.expected.retain(|d| !query.matches(d));
        assert_eq!(
            removed,
            before - self.expected.len(),
            "Remove count mismatch"
        );
        removed
    }

    /// Applies a generated operation.
    pub fn apply(&mut self, operation: &Operation) {
        match operation {
            Operation::Insert(document) => {
                self.insert(document.clone());
            }
            Operation::Update(query, patch) => {
                self.update(query, patch);
            }
            Operation::Remove(query) => {
                self.remove(query);
            }
        }
    }

    /// Returns the modeled collection.
    pub fn expected(&self) -> &[Document] {
        &self.expected
    }

    /// Verifies the store and its saved snapshot both equal the model.
    pub fn verify(&self) {
        assert_eq!(
            self.store.documents(),
            self.expected.as_slice(),
            "Store diverged from model"
        );
        assert_eq!(self.store.count(), self.expected.len());
        assert_eq!(
            self.store.saved_documents(),
            self.expected,
            "Saved snapshot diverged from model"
        );
    }

    /// Reopens the store and verifies it against the model.
    pub fn reopen_and_verify(&mut self) {
        self.store.reopen();
        self.verify();
    }
}

impl Default for StoreHarness {
    fn default() -> Self {
        Self::memory()
    }
}

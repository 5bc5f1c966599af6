//! Store statistics.
//!
//! Counters are atomic so read operations, which take `&self`, can record
//! themselves.
//!
//! # Usage
//!
//! ```rust
//! use jsongo_core::{Document, Query, Store};
//!
//! let mut store = Store::open_in_memory().unwrap();
//! store.insert(Document::new().with("name", "a")).unwrap();
//! let _ = store.find(&Query::all());
//!
//! let stats = store.stats();
//! assert_eq!(stats.inserts, 1);
//! assert_eq!(stats.scans, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters owned by a store.
#[derive(Debug, Default)]
pub struct StoreStats {
    /// Documents inserted.
    inserts: AtomicU64,
    /// Documents modified by update.
    updates: AtomicU64,
    /// Documents deleted by remove.
    removes: AtomicU64,
    /// Full collection scans (find, find_one, update, remove).
    scans: AtomicU64,
    /// Indexes built.
    index_builds: AtomicU64,
    /// Successful saves.
    saves: AtomicU64,
    /// Saves that failed and were rolled back.
    failed_saves: AtomicU64,
    /// Bytes written by successful saves.
    bytes_written: AtomicU64,
    /// Bytes read when loading.
    bytes_read: AtomicU64,
}

impl StoreStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_inserts(&self, count: u64) {
        self.inserts.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_updates(&self, count: u64) {
        self.updates.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_removes(&self, count: u64) {
        self.removes.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_scan(&self) {
        self.scans.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_index_build(&self) {
        self.index_builds.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_save(&self, bytes: u64) {
        self.saves.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_failed_save(&self) {
        self.failed_saves.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_load(&self, bytes: u64) {
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            scans: self.scans.load(Ordering::Relaxed),
            index_builds: self.index_builds.load(Ordering::Relaxed),
            saves: self.saves.load(Ordering::Relaxed),
            failed_saves: self.failed_saves.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`StoreStats`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Documents inserted.
    pub inserts: u64,
    /// Documents modified by update.
    pub updates: u64,
    /// Documents deleted by remove.
    pub removes: u64,
    /// Full collection scans.
    pub scans: u64,
    /// Indexes built.
    pub index_builds: u64,
    /// Successful saves.
    pub saves: u64,
    /// Saves that failed and were rolled back.
    pub failed_saves: u64,
    /// Bytes written by successful saves.
    pub bytes_written: u64,
    /// Bytes read when loading.
    pub bytes_read: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        assert_eq!(StoreStats::new().snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn record_operations() {
        let stats = StoreStats::new();

        stats.record_inserts(3);
        stats.record_updates(2);
        stats.record_removes(1);
        stats.record_scan();
        stats.record_scan();
        stats.record_save(100);
        stats.record_save(50);
        stats.record_failed_save();
        stats.record_load(7);
        stats.record_index_build();

        let snap = stats.snapshot();
        assert_eq!(snap.inserts, 3);
        assert_eq!(snap.updates, 2);
        assert_eq!(snap.removes, 1);
        assert_eq!(snap.scans, 2);
        assert_eq!(snap.saves, 2);
        assert_eq!(snap.bytes_written, 150);
        assert_eq!(snap.failed_saves, 1);
        assert_eq!(snap.bytes_read, 7);
        assert_eq!(snap.index_builds, 1);
    }
}

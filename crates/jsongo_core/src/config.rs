//! Store configuration.

use crate::id::IdStrategy;
use jsongo_storage::WriteMode;

/// Configuration for opening a store.
///
/// The file path is the only required input; every field here has a
/// default that matches plain `Store::open(path)`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the store file (as `[]`) if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to error if the store file already exists.
    pub error_if_exists: bool,

    /// How the file is replaced on every save.
    pub write_mode: WriteMode,

    /// Whether to fsync on every save (safer but slower).
    pub sync_on_write: bool,

    /// Whether to pretty-print the JSON array.
    pub pretty: bool,

    /// Whether to hold an exclusive advisory lock for the store's lifetime.
    pub exclusive_lock: bool,

    /// How `_id` values are generated on insert.
    pub id_strategy: IdStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            error_if_exists: false,
            write_mode: WriteMode::Atomic,
            sync_on_write: true,
            pretty: false,
            exclusive_lock: true,
            id_strategy: IdStrategy::Sequential,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the store file if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to error if the store file exists.
    #[must_use]
    pub const fn error_if_exists(mut self, value: bool) -> Self {
        self.error_if_exists = value;
        self
    }

    /// Sets the write mode.
    #[must_use]
    pub const fn write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    /// Sets whether to fsync on every save.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Sets whether to pretty-print the file.
    #[must_use]
    pub const fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    /// Sets whether to take the exclusive lock.
    #[must_use]
    pub const fn exclusive_lock(mut self, value: bool) -> Self {
        self.exclusive_lock = value;
        self
    }

    /// Sets the id generation strategy.
    #[must_use]
    pub const fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }
}

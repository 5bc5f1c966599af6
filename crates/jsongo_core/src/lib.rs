//! # jsongo Core
//!
//! Embedded JSON document store.
//!
//! A store is one JSON file holding an array of objects. This crate provides:
//! - [`Store`], which loads the file into an ordered in-memory collection and
//!   rewrites it after every mutation
//! - [`Query`] equality filters and [`Patch`] field assignments
//! - Generated `_id` values ([`DocumentId`], [`IdStrategy`])
//! - Point-in-time [`FieldIndex`] snapshots
//! - Advisory locking of the store file
//!
//! ## Usage
//!
//! ```rust
//! use jsongo_core::{Document, Patch, Query, Store};
//!
//! let mut store = Store::open_in_memory()?;
//! store.insert(Document::new().with("name", "a").with("age", 5))?;
//! store.insert(Document::new().with("name", "b").with("age", 6))?;
//!
//! let updated = store.update(&Query::new().eq("name", "a"), &Patch::new().set("age", 10))?;
//! assert_eq!(updated, 1);
//!
//! store.remove(&Query::new().eq("age", 6))?;
//! assert_eq!(store.count(), 1);
//! # Ok::<(), jsongo_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod document;
mod error;
mod id;
mod index;
#[cfg(feature = "std")]
mod lock;
mod query;
mod stats;
mod store;

pub use config::Config;
pub use document::{Document, ID_FIELD};
pub use error::{CoreError, CoreResult};
pub use id::{DocumentId, IdGenerator, IdStrategy};
pub use index::FieldIndex;
#[cfg(feature = "std")]
pub use lock::{LockTarget, StoreLock};
pub use query::{Patch, Query};
pub use stats::{StatsSnapshot, StoreStats};
pub use store::Store;

pub use jsongo_codec::{IndexKey, Map, Value};
pub use jsongo_storage::WriteMode;

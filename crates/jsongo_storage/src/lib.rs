//! # jsongo Storage
//!
//! Storage backends for jsongo.
//!
//! A backend holds exactly one **snapshot**: an opaque byte string that is
//! read back in one piece and replaced in one piece. Backends do not
//! interpret the bytes; the JSON format belongs to `jsongo_codec` and the
//! document semantics to `jsongo_core`.
//!
//! ## Available Backends
//!
//! - [`FileBackend`] - A single file on disk, replaced atomically or in place
//! - [`InMemoryBackend`] - For testing and ephemeral stores
//!
//! ## Example
//!
//! ```rust
//! use jsongo_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(!backend.exists().unwrap());
//!
//! backend.write(b"[]").unwrap();
//! assert_eq!(backend.read().unwrap(), b"[]");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::{FileBackend, WriteMode};
pub use memory::InMemoryBackend;

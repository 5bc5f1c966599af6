//! Advisory store lock.
//!
//! A store at `data.json` is guarded by `data.json.lock`. The lock is held
//! for the lifetime of the [`StoreLock`] value and released when the file
//! handle closes, so it never outlives the process. The lock file itself is
//! left in place after a normal close; only [`StoreLock::release_and_remove`]
//! deletes it.
//!
//! When the lock file cannot be created, for example because the directory
//! is read-only, an existing store file is locked directly instead. That lock
//! only covers the current file: an atomic save replaces the file, and with
//! it the locked inode.

use crate::error::{CoreError, CoreResult};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Which file carries the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockTarget {
    /// The sibling `<file>.lock`.
    LockFile,
    /// The store file itself.
    StoreFile,
}

/// Exclusive advisory lock on a store file.
#[derive(Debug)]
pub struct StoreLock {
    /// Locked file path.
    path: PathBuf,
    /// Which file is locked.
    target: LockTarget,
    /// Locked file handle (held for exclusive access).
    _file: File,
}

impl StoreLock {
    /// Returns the lock file path guarding `store_path`.
    #[must_use]
    pub fn path_for(store_path: &Path) -> PathBuf {
        let mut name: OsString = store_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".lock");
        store_path.with_file_name(name)
    }

    /// Acquires the lock for `store_path` without blocking.
    ///
    /// # Errors
    ///
    /// - [`CoreError::StoreLocked`] if another handle holds the lock
    /// - [`CoreError::FileCreate`] if the lock file cannot be created and
    ///   there is no store file to lock instead
    /// - [`CoreError::LockFailed`] if the platform refuses the lock
    pub fn acquire(store_path: &Path) -> CoreResult<Self> {
        let lock_path = Self::path_for(store_path);
        let (path, target, file) = match Self::open_lock_file(&lock_path) {
            Ok(file) => (lock_path, LockTarget::LockFile, file),
            Err(err) => match File::open(store_path) {
                Ok(file) if store_path.is_file() => {
                    warn!(
                        lock = %lock_path.display(),
                        error = %err,
                        "cannot create lock file; locking the store file instead"
                    );
                    (store_path.to_path_buf(), LockTarget::StoreFile, file)
                }
                _ => {
                    return Err(CoreError::file_create(
                        lock_path.display().to_string(),
                        err.into(),
                    ))
                }
            },
        };

        if let Err(err) = file.try_lock_exclusive() {
            return Err(Self::lock_error(store_path, err));
        }

        Ok(Self {
            path,
            target,
            _file: file,
        })
    }

    /// Opens the lock file, creating it if needed. An existing lock file
    /// that cannot be opened for writing is opened read-only.
    fn open_lock_file(path: &Path) -> io::Result<File> {
        let created = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path);

        match created {
            Ok(file) => Ok(file),
            Err(err) if path.is_file() => File::open(path).map_err(|_| err),
            Err(err) => Err(err),
        }
    }

    /// Classifies a failed `try_lock_exclusive`.
    fn lock_error(store_path: &Path, err: io::Error) -> CoreError {
        let path = store_path.display().to_string();
        if err.kind() == fs2::lock_contended_error().kind() {
            CoreError::StoreLocked { path }
        } else {
            CoreError::LockFailed { path, source: err }
        }
    }

    /// Returns the locked file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns which file carries the lock.
    #[must_use]
    pub fn target(&self) -> LockTarget {
        self.target
    }

    /// Releases the lock and deletes the lock file.
    ///
    /// A lock held on the store file itself is only released.
    pub fn release_and_remove(self) {
        let path = self.path.clone();
        let target = self.target;
        drop(self);
        if target == LockTarget::LockFile {
            let _ = fs::remove_file(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lock_path_is_sibling() {
        assert_eq!(
            StoreLock::path_for(Path::new("/data/users.json")),
            PathBuf::from("/data/users.json.lock")
        );
    }

    #[test]
    fn second_acquire_fails_while_held() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("store.json");

        let lock = StoreLock::acquire(&store).unwrap();
        assert!(matches!(
            StoreLock::acquire(&store),
            Err(CoreError::StoreLocked { .. })
        ));

        drop(lock);
        assert!(StoreLock::acquire(&store).is_ok());
    }

    #[test]
    fn release_and_remove_deletes_file() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("store.json");

        let lock = StoreLock::acquire(&store).unwrap();
        let path = lock.path().to_path_buf();
        assert!(path.exists());

        lock.release_and_remove();
        assert!(!path.exists());
    }

    #[test]
    fn falls_back_to_store_file() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("store.json");
        fs::write(&store, b"[]").unwrap();
        // A directory in the way makes the lock file impossible to create.
        fs::create_dir(StoreLock::path_for(&store)).unwrap();

        let lock = StoreLock::acquire(&store).unwrap();
        assert_eq!(lock.target(), LockTarget::StoreFile);
        assert_eq!(lock.path(), store.as_path());
        assert!(matches!(
            StoreLock::acquire(&store),
            Err(CoreError::StoreLocked { .. })
        ));

        lock.release_and_remove();
        assert!(store.exists());
        assert!(StoreLock::acquire(&store).is_ok());
    }

    #[test]
    fn missing_store_without_lock_file_is_create_error() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("missing").join("store.json");

        assert!(matches!(
            StoreLock::acquire(&store),
            Err(CoreError::FileCreate { .. })
        ));
    }

    #[test]
    fn only_contention_is_store_locked() {
        let store = Path::new("store.json");

        assert!(matches!(
            StoreLock::lock_error(store, fs2::lock_contended_error()),
            CoreError::StoreLocked { .. }
        ));
        assert!(matches!(
            StoreLock::lock_error(
                store,
                io::Error::new(io::ErrorKind::Unsupported, "no locks")
            ),
            CoreError::LockFailed { .. }
        ));
    }

    #[test]
    fn lock_file_outlives_release() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("store.json");

        drop(StoreLock::acquire(&store).unwrap());

        assert!(StoreLock::path_for(&store).exists());
        assert!(StoreLock::acquire(&store).is_ok());
    }
}

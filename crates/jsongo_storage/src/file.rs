//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// How a [`FileBackend`] replaces the snapshot on `write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Write a sibling temp file, sync it, then rename it over the target.
    ///
    /// A crash mid-write leaves either the old or the new snapshot, never a
    /// truncated one.
    #[default]
    Atomic,
    /// Truncate the target and overwrite it in place.
    InPlace,
}

/// A file-based storage backend.
///
/// Holds the path of one file whose full contents are the snapshot. No file
/// handle is kept open between calls.
///
/// # Durability
///
/// - With `sync` enabled, every `write` calls `File::sync_all()` before
///   returning, and atomic writes also sync the parent directory on Unix
/// - With `sync` disabled, data is left to the OS page cache
///
/// # Example
///
/// ```no_run
/// use jsongo_storage::{StorageBackend, FileBackend};
///
/// let mut backend = FileBackend::new("data.json");
/// backend.write(b"[]").unwrap();
/// assert_eq!(backend.read().unwrap(), b"[]");
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    mode: WriteMode,
    sync: bool,
    create_dirs: bool,
}

impl FileBackend {
    /// Creates a backend for the file at `path`.
    ///
    /// Nothing is touched on disk until the first call.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            mode: WriteMode::default(),
            sync: true,
            create_dirs: false,
        }
    }

    /// Sets the write mode.
    #[must_use]
    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets whether writes are synced to disk before returning.
    #[must_use]
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Creates missing parent directories on write.
    #[must_use]
    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the write mode.
    #[must_use]
    pub fn write_mode(&self) -> WriteMode {
        self.mode
    }

    /// Returns the sibling path used for atomic writes.
    #[must_use]
    pub fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn prepare_parent(&self) -> StorageResult<()> {
        if !self.create_dirs {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn write_in_place(&self, data: &[u8]) -> StorageResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(data)?;
        if self.sync {
            file.sync_all()?;
        }
        Ok(())
    }

    fn write_atomic(&self, data: &[u8]) -> StorageResult<()> {
        let temp_path = self.temp_path();

        let result = (|| -> io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            if self.sync {
                file.sync_all()?;
            }
            drop(file);
            fs::rename(&temp_path, &self.path)
        })();

        if let Err(err) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        // The rename has replaced the snapshot; from here on the write is applied.
        if self.sync {
            self.sync_parent()
                .map_err(|e| StorageError::not_durable(self.location(), e))?;
        }
        Ok(())
    }

    /// Syncs the parent directory so a rename is durable.
    #[cfg(unix)]
    fn sync_parent(&self) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> io::Result<()> {
        // Directory fsync is not available on Windows; NTFS journals metadata.
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn exists(&self) -> StorageResult<bool> {
        Ok(self.path.try_exists()?)
    }

    fn read(&self) -> StorageResult<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::not_found(self.location()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        self.prepare_parent()?;
        match self.mode {
            WriteMode::Atomic => self.write_atomic(data),
            WriteMode::InPlace => self.write_in_place(data),
        }
    }

    fn remove(&mut self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::not_found(self.location()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_missing_does_not_exist() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("store.json"));

        assert!(!backend.exists().unwrap());
        assert!(backend.read().unwrap_err().is_not_found());
    }

    #[test]
    fn file_write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut backend = FileBackend::new(&path);

        backend.write(b"[{\"a\":1}]").unwrap();

        assert!(backend.exists().unwrap());
        assert_eq!(backend.read().unwrap(), b"[{\"a\":1}]");
        assert_eq!(fs::read(&path).unwrap(), b"[{\"a\":1}]");
    }

    #[test]
    fn file_write_replaces_contents() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path().join("store.json"));

        backend.write(b"a much longer first snapshot").unwrap();
        backend.write(b"[]").unwrap();

        assert_eq!(backend.read().unwrap(), b"[]");
    }

    #[test]
    fn file_in_place_replaces_contents() {
        let dir = tempdir().unwrap();
        let mut backend =
            FileBackend::new(dir.path().join("store.json")).with_write_mode(WriteMode::InPlace);

        backend.write(b"a much longer first snapshot").unwrap();
        backend.write(b"[]").unwrap();

        assert_eq!(backend.read().unwrap(), b"[]");
        assert!(!backend.temp_path().exists());
    }

    #[test]
    fn file_atomic_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path().join("store.json"));

        backend.write(b"[]").unwrap();

        assert!(!backend.temp_path().exists());
    }

    #[test]
    fn file_atomic_failure_keeps_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut backend = FileBackend::new(&path);
        backend.write(b"[]").unwrap();

        // A directory squatting on the temp path makes the temp create fail.
        fs::create_dir(backend.temp_path()).unwrap();

        assert!(backend.write(b"[1]").is_err());
        assert_eq!(fs::read(&path).unwrap(), b"[]");
    }

    #[test]
    fn file_temp_path_is_sibling() {
        let backend = FileBackend::new("/data/users.json");
        assert_eq!(backend.temp_path(), PathBuf::from("/data/users.json.tmp"));
    }

    #[test]
    fn file_remove() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path().join("store.json"));
        backend.write(b"[]").unwrap();

        backend.remove().unwrap();

        assert!(!backend.exists().unwrap());
        assert!(backend.remove().unwrap_err().is_not_found());
    }

    #[test]
    fn file_create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("path").join("store.json");
        let mut backend = FileBackend::new(&path).with_create_dirs(true);

        backend.write(b"[]").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn file_without_dirs_fails_on_missing_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("store.json");
        let mut backend = FileBackend::new(&path);

        assert!(matches!(backend.write(b"[]"), Err(StorageError::Io(_))));
    }

    #[test]
    fn file_unsynced_write() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path().join("store.json")).with_sync(false);

        backend.write(b"[]").unwrap();
        assert_eq!(backend.read().unwrap(), b"[]");
    }

    #[test]
    fn file_location_is_path() {
        let backend = FileBackend::new("store.json");
        assert_eq!(backend.location(), "store.json");
        assert_eq!(backend.path(), Path::new("store.json"));
    }
}

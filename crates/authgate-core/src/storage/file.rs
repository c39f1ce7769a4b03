use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{validate_key, KeyValueStore, StorageError};

/// File-backed key-value store: `<root>/<namespace>/<key>`.
///
/// Each write goes to its own dot-prefixed temp file that is renamed over the
/// target, so a crash mid-write leaves either the old value or the new one and
/// overlapping writers (threads or processes) never share a temp file.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Open (creating if needed) the namespace directory under `root`.
    pub fn open(root: impl AsRef<Path>, namespace: &str) -> Result<Self, StorageError> {
        if validate_key(namespace).is_err() {
            return Err(StorageError::InvalidNamespace(namespace.to_string()));
        }
        let dir = root.as_ref().join(namespace);
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        debug!(?dir, "Opened key-value namespace");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.entry_path(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StorageError::NotUtf8(key.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key)?;
        let mut tmp =
            NamedTempFile::new_in(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| StorageError::io(tmp.path(), e))?;
        tmp.persist(&path).map_err(|e| StorageError::io(&path, e.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}

//! File-backed key-value store.
//!
//! Each key maps to `<root>/<key>.json`. Writes go to a temporary sibling
//! file and are renamed into place so a crash never leaves a half-written
//! blob behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// A store that keeps one JSON file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            key: root.display().to_string(),
            source,
        })?;
        tracing::debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        tracing::trace!(key, bytes = value.len(), "Wrote blob");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

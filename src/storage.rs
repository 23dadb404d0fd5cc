//! Key/value persistence used for the training pool and session state.
//!
//! The engine only needs `get`/`set` of whole documents. Hosts can plug in
//! their own backend; two are provided here: an in-memory map for tests and
//! embedding, and a directory of JSON files under the application root.

use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use thiserror::Error;

use crate::app_dirs;

/// Errors raised by persistence backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key cannot be mapped onto the backend, e.g. it contains a path separator.
    #[error("Invalid storage key {key:?}")]
    InvalidKey { key: String },
    /// Failed to read a stored document.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a stored document.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The application data directory could not be prepared.
    #[error("Storage directory unavailable: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    /// Backend-specific failure reported by a host implementation.
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Persistence collaborator: whole-document reads and writes by key.
pub trait KeyValueStore {
    /// Stored bytes for `key`, or `None` when nothing was written yet.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    /// Replace the bytes stored under `key`. Must be durable when it returns.
    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// In-process store. Clones share the same map, so a test can keep a handle
/// and inspect what the engine wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `key` holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Store rooted at `root`; the directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted in the application data directory.
    pub fn in_app_dir() -> Result<Self, StorageError> {
        Ok(Self::new(app_dirs::data_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root).map_err(|source| StorageError::Write {
            path: self.root.clone(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes).map_err(|source| StorageError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StorageError::Write { path, source })
    }
}

//! Source library abstraction
//!
//! The press never touches the filesystem directly. Source texts are listed and
//! read through a [`SourceLibrary`], keyed by title-key (the file name).

use crate::error::StorageError;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Where the press finds the source text for each title
pub trait SourceLibrary: Send + Sync {
    /// Read the raw source for a title-key
    fn read(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// List every title-key in the library
    fn list(&self) -> StorageResult<Vec<String>>;
}

/// Directory-backed library: one file per title, the file name is the key
pub struct LocalLibrary {
    root: PathBuf,
}

impl LocalLibrary {
    /// Create a library rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the library reads from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a title-key to a file directly under the root.
    /// Keys that would leave the root, or descend into subdirectories, are rejected.
    fn full_path(&self, key: &str) -> StorageResult<PathBuf> {
        let mut components = Path::new(key).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.root.join(name)),
            _ => Err(StorageError::InvalidKey(key.to_string())),
        }
    }
}

impl SourceLibrary for LocalLibrary {
    fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(key)?;
        std::fs::read(&full_path).map_err(StorageError::from)
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => entries.push(name),
                Err(name) => {
                    tracing::debug!("Skipping non UTF-8 file name {:?}", name);
                }
            }
        }
        Ok(entries)
    }
}

/// In-memory library (for testing)
#[derive(Default)]
pub struct MemoryLibrary {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a title's source text
    pub fn insert(&self, key: impl Into<String>, text: impl Into<Vec<u8>>) {
        self.data
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), text.into());
    }

    /// Remove a title's source text, as if the file vanished
    pub fn remove(&self, key: &str) -> Option<Vec<u8>> {
        self.data
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key)
    }
}

impl SourceLibrary for MemoryLibrary {
    fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.data
            .read()
            .map_err(|e| StorageError::BackendError(e.to_string()))?
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        Ok(self
            .data
            .read()
            .map_err(|e| StorageError::BackendError(e.to_string()))?
            .keys()
            .cloned()
            .collect())
    }
}

//! Object stores for templates, sources and filled documents
//!
//! Objects are addressed by `/`-separated keys such as `Input/Form1.pdf`.

use crate::{BatchError, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Byte storage addressable by key
pub trait ObjectStore {
    /// Read an object
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Write an object, replacing any previous content
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Check whether an object exists
    fn contains(&self, key: &str) -> Result<bool>;
}

/// Store backed by a directory
///
/// A key maps to a path below the root. Writes go to a temporary file in the
/// target directory which is then renamed into place.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Path for a key, or `None` if the key would escape the root
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty()
            || !relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

fn invalid_key(key: &str) -> String {
    format!("invalid key {key:?}")
}

impl ObjectStore for FsObjectStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let read_error = |message: String| BatchError::StoreReadError {
            key: key.to_string(),
            message,
        };

        let path = self.path_for(key).ok_or_else(|| read_error(invalid_key(key)))?;
        std::fs::read(&path).map_err(|e| read_error(e.to_string()))
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let write_error = |message: String| BatchError::StoreWriteError {
            key: key.to_string(),
            message,
        };

        let path = self.path_for(key).ok_or_else(|| write_error(invalid_key(key)))?;
        let dir = path.parent().unwrap_or(self.root.as_path());
        std::fs::create_dir_all(dir).map_err(|e| write_error(e.to_string()))?;

        let mut file =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| write_error(e.to_string()))?;
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|e| write_error(e.to_string()))?;
        file.persist(&path)
            .map_err(|e| write_error(e.error.to_string()))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "stored object");
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        let path = self
            .path_for(key)
            .ok_or_else(|| BatchError::StoreReadError {
                key: key.to_string(),
                message: invalid_key(key),
            })?;
        Ok(path.is_file())
    }
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, builder style
    pub fn with_object(mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(key.into(), bytes.into());
        self
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| BatchError::StoreReadError {
                key: key.to_string(),
                message: "no such object".to_string(),
            })
    }

    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        self.objects.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.objects.contains_key(key))
    }
}

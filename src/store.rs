//! Persisted configuration access.
//!
//! The engine sees storage as one opaque string blob under a single key.
//! Which medium backs that key is the embedder's business; the engine only
//! needs the distinction between "here is the blob", "nothing saved yet",
//! and "the medium failed".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

pub trait ConfigStore {
    /// Fetch the blob. `Ok(None)` is the normal nothing-saved condition.
    fn load(&self) -> Result<Option<String>, StoreError>;

    fn save(&mut self, blob: &str) -> Result<(), StoreError>;
}

/// Outcome of a load request against a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The registry was replaced with this many restored tracks.
    Restored(usize),
    /// The store had no blob; the registry is untouched.
    NothingSaved,
}

/// In-memory store, for tests and embedders that bring their own medium.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreError> {
        self.blob = Some(blob.to_owned());
        Ok(())
    }
}

/// Blob persisted as one file at a caller-chosen path. A missing file is
/// "nothing saved", not an error.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(StoreError::Io)?;
            }
        }
        fs::write(&self.path, blob).map_err(StoreError::Io)
    }
}

// src/store/mod.rs

//! Persistence boundary.
//!
//! The board is saved as one opaque text value in a key-value store. The
//! store itself knows nothing about buckets; [`snapshot::SnapshotStore`]
//! does the JSON encoding and the fallback to the demo board.

use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub mod mock;
pub mod snapshot;

pub use mock::MemoryStore;
pub use snapshot::SnapshotStore;

/// Abstract key-value interface (string keys, string values).
pub trait KeyValueStore: Debug {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Implementation that keeps one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(None);
        }
        let contents =
            fs::read_to_string(&path).with_context(|| format!("reading file {:?}", path))?;
        Ok(Some(contents))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| format!("creating dir {:?}", self.dir))?;
        let path = self.path_for(key);
        // Temporary file first, then rename into place.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("writing to file {:?}", tmp))?;
        fs::rename(&tmp, &path).with_context(|| format!("renaming {:?} to {:?}", tmp, path))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("removing file {:?}", path))?;
        }
        Ok(())
    }
}

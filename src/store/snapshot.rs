// src/store/snapshot.rs

//! Snapshot load/save on top of a [`KeyValueStore`].

use tracing::{debug, info, warn};

use crate::board::{Snapshot, default_snapshot};
use crate::dag::graph::GraphStore;
use crate::errors::Result;
use crate::store::KeyValueStore;

/// Reads and writes the whole board under a single key. Last write wins.
#[derive(Debug)]
pub struct SnapshotStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl SnapshotStore {
    pub fn new(backend: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    /// `Ok(None)` when nothing was saved yet; an error when the stored text
    /// is not a valid board.
    pub fn load(&self) -> Result<Option<GraphStore>> {
        let Some(text) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        let snapshot: Snapshot = serde_json::from_str(&text)?;
        let store = GraphStore::from_snapshot(snapshot)?;
        debug!(key = %self.key, buckets = store.buckets().len(), "snapshot loaded");
        Ok(Some(store))
    }

    /// Load the saved board, falling back to the demo board when the key is
    /// missing or its content is unusable.
    pub fn load_or_default(&self) -> GraphStore {
        match self.load() {
            Ok(Some(store)) => store,
            Ok(None) => {
                info!(key = %self.key, "no saved board; starting from the default board");
                default_store()
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "saved board unusable; starting from the default board");
                default_store()
            }
        }
    }

    pub fn save(&mut self, store: &GraphStore) -> Result<()> {
        let text = serde_json::to_string(&store.snapshot())?;
        self.backend.set(&self.key, &text)?;
        debug!(key = %self.key, bytes = text.len(), "snapshot saved");
        Ok(())
    }

    /// Forget the saved board.
    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove(&self.key)?;
        Ok(())
    }
}

/// The demo board as a graph store.
pub fn default_store() -> GraphStore {
    GraphStore::from_snapshot(default_snapshot()).unwrap_or_else(|err| {
        warn!(error = %err, "default board failed validation; starting empty");
        GraphStore::default()
    })
}

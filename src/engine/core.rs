// src/engine/core.rs

//! The board service.
//!
//! [`Board`] is constructed once per session and owns the [`GraphStore`].
//! Mutations arrive one at a time through [`Board::dispatch`]; every read
//! accessor derives its answer from the committed state at call time, so
//! there is no cache to go stale.

use tracing::{debug, warn};

use crate::config::{BoardOptions, ConfigFile};
use crate::dag::chains::{Chain, dependency_chains};
use crate::dag::graph::GraphStore;
use crate::dag::layers::{Layering, assign_layers};
use crate::dag::placement::{Placements, allowed_buckets_by_layer};
use crate::dag::subgraph::{Subgraph, subgraph_of, subgraphs, unconnected_buckets};
use crate::board::Bucket;
use crate::engine::actions::{ActionOutcome, BoardAction};
use crate::engine::drag::{
    DragPayload, DropTarget, dependency_drop_allowed, drop_action, layer_drop_allowed,
    task_drop_allowed,
};
use crate::engine::view::{BoardView, board_view};
use crate::errors::Result;
use crate::store::{FileStore, SnapshotStore};
use crate::types::BucketId;

#[derive(Debug)]
pub struct Board {
    store: GraphStore,
    options: BoardOptions,
    persistence: Option<SnapshotStore>,
    autosave: bool,
}

impl Board {
    /// A board without persistence.
    pub fn new(store: GraphStore, options: BoardOptions) -> Self {
        Self {
            store,
            options,
            persistence: None,
            autosave: false,
        }
    }

    /// Load the board from `persistence` (or the demo board), make sure the
    /// default buckets exist, and save after every applied action when
    /// `autosave` is set.
    pub fn open(persistence: SnapshotStore, options: BoardOptions, autosave: bool) -> Self {
        let mut store = persistence.load_or_default();
        store.ensure_default_buckets();
        Self {
            store,
            options,
            persistence: Some(persistence),
            autosave,
        }
    }

    /// [`Board::open`] with a [`FileStore`] at `[storage].dir`.
    pub fn from_config(config: &ConfigFile) -> Self {
        let persistence = SnapshotStore::new(
            FileStore::new(config.storage.dir.clone()),
            config.storage.key.clone(),
        );
        Self::open(persistence, config.board_options(), config.storage.autosave)
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn options(&self) -> &BoardOptions {
        &self.options
    }

    pub fn buckets(&self) -> &[Bucket] {
        self.store.buckets()
    }

    pub fn bucket(&self, id: &BucketId) -> Option<&Bucket> {
        self.store.bucket(id.as_str())
    }

    pub fn chains(&self) -> Vec<Chain> {
        dependency_chains(&self.store)
    }

    pub fn subgraphs(&self) -> Vec<Subgraph> {
        subgraphs(&self.chains())
    }

    /// Layers over the whole chain set.
    pub fn layers(&self) -> Layering {
        assign_layers(&self.chains(), &self.store, self.options.layering)
    }

    /// Layers of one subgraph.
    pub fn layers_for(&self, subgraph: &Subgraph) -> Layering {
        assign_layers(subgraph.chains(), &self.store, self.options.layering)
    }

    /// Drop affordances for the lanes of one subgraph.
    pub fn allowed_buckets_by_layer(&self, subgraph: &Subgraph) -> Placements {
        allowed_buckets_by_layer(subgraph.chains(), &self.layers_for(subgraph))
    }

    pub fn unconnected(&self) -> Vec<BucketId> {
        unconnected_buckets(&self.store, &self.chains())
    }

    pub fn buckets_available_as_dependency_for(&self, bucket: &BucketId) -> Vec<BucketId> {
        self.store.buckets_available_as_dependency_for(bucket)
    }

    pub fn buckets_depending_on(&self, bucket: &BucketId) -> Vec<BucketId> {
        self.store.buckets_depending_on(bucket)
    }

    pub fn view(&self) -> Option<BoardView> {
        board_view(&self.store, &self.options)
    }

    /// Whether `target` would accept `payload` if it were dropped now.
    pub fn accepts(&self, payload: &DragPayload, target: &DropTarget) -> bool {
        match (payload, target) {
            (DragPayload::Task { source, task }, DropTarget::Bucket(to)) => {
                task_drop_allowed(&self.store, source, task, to)
            }
            (DragPayload::BucketGraph { bucket }, DropTarget::Bucket(to)) => {
                dependency_drop_allowed(&self.store, bucket, to)
            }
            (DragPayload::BucketFoliation { bucket }, DropTarget::Lane(zone)) => {
                match subgraph_of(&self.chains(), bucket) {
                    Some(subgraph) => {
                        layer_drop_allowed(&self.allowed_buckets_by_layer(&subgraph), bucket, *zone)
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    /// Apply one action. Failures are logged and reported in the outcome;
    /// nothing here panics or propagates.
    pub fn dispatch(&mut self, action: BoardAction) -> ActionOutcome {
        debug!(?action, "dispatch");
        let outcome = self.apply(action);
        if outcome.is_applied() && self.autosave {
            if let Err(err) = self.save() {
                warn!(error = %err, "autosave failed");
            }
        }
        outcome
    }

    /// Write the current state through the attached snapshot store. A board
    /// without persistence has nothing to do.
    pub fn save(&mut self) -> Result<()> {
        match self.persistence.as_mut() {
            Some(persistence) => persistence.save(&self.store),
            None => Ok(()),
        }
    }

    fn apply(&mut self, action: BoardAction) -> ActionOutcome {
        let max_title = self.options.max_task_title_len;
        match action {
            BoardAction::AddDependency { bucket, dependency } => {
                match self.store.add_dependency(&bucket, &dependency) {
                    Ok(added) => ActionOutcome::changed(added),
                    Err(err) => ActionOutcome::from_error(err),
                }
            }
            BoardAction::RemoveDependency { bucket, dependency } => {
                ActionOutcome::changed(self.store.remove_dependency(&bucket, &dependency))
            }
            BoardAction::SetLayer { bucket, layer } => {
                let previous = self.store.bucket(bucket.as_str()).and_then(|b| b.layer);
                match self.store.set_layer(&bucket, layer, &self.options) {
                    Ok(applied) => ActionOutcome::changed(previous != Some(applied)),
                    Err(err) => ActionOutcome::from_error(err),
                }
            }
            BoardAction::ClearLayerOverrides => {
                ActionOutcome::changed(self.store.clear_all_layer_overrides() > 0)
            }
            BoardAction::AddBucket { name } => {
                self.store.add_bucket(&name);
                ActionOutcome::Applied
            }
            BoardAction::RemoveBucket { bucket } => {
                ActionOutcome::changed(self.store.remove_bucket(&bucket))
            }
            BoardAction::RenameBucket { bucket, name } => {
                ActionOutcome::changed(self.store.rename_bucket(&bucket, &name))
            }
            BoardAction::SetBucketFlagged { bucket, flagged } => {
                ActionOutcome::changed(self.store.set_bucket_flagged(&bucket, flagged))
            }
            BoardAction::SetBucketActive { bucket, active } => {
                ActionOutcome::changed(self.store.set_bucket_active(&bucket, active))
            }
            BoardAction::AddTask { bucket, title } => {
                ActionOutcome::changed(self.store.add_task(&bucket, &title, max_title).is_some())
            }
            BoardAction::MoveTask { task, to, index } => {
                ActionOutcome::changed(self.store.move_task(&task, &to, index))
            }
            BoardAction::UpdateTaskTitle { task, title } => {
                ActionOutcome::changed(self.store.update_task_title(&task, &title, max_title))
            }
            BoardAction::SetTaskClosed { task, closed } => {
                ActionOutcome::changed(self.store.set_task_closed(&task, closed))
            }
            BoardAction::DeleteTask { task } => {
                ActionOutcome::changed(self.store.delete_task(&task))
            }
            BoardAction::Drop { payload, target } => self.apply_drop(&payload, &target),
        }
    }

    fn apply_drop(&mut self, payload: &DragPayload, target: &DropTarget) -> ActionOutcome {
        if !self.accepts(payload, target) {
            debug!(?payload, ?target, "drop target does not accept payload");
            return ActionOutcome::Unchanged;
        }

        // Lanes are rendered per subgraph; resolve virtual zones against the
        // dragged bucket's own subgraph.
        let layering = subgraph_of(&self.chains(), payload.bucket())
            .map(|subgraph| self.layers_for(&subgraph))
            .unwrap_or_default();

        match drop_action(payload, target, &layering) {
            Some(action) => self.apply(action),
            None => ActionOutcome::Unchanged,
        }
    }
}

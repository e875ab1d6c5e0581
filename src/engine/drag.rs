// src/engine/drag.rs

//! Drag payloads, drop targets, and the predicates deciding whether a target
//! accepts a payload.

use crate::dag::graph::GraphStore;
use crate::dag::layers::Layering;
use crate::dag::placement::{DropZone, Placements};
use crate::engine::actions::BoardAction;
use crate::types::{BucketId, TaskId};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    /// A task card, coming from `source`.
    Task { source: BucketId, task: TaskId },
    /// A bucket dragged onto another bucket to make that one a dependency.
    BucketGraph { bucket: BucketId },
    /// A bucket dragged onto a layer lane to pin its layer.
    BucketFoliation { bucket: BucketId },
}

impl DragPayload {
    /// The bucket the drag started from (the task's bucket for task drags).
    pub fn bucket(&self) -> &BucketId {
        match self {
            DragPayload::Task { source, .. } => source,
            DragPayload::BucketGraph { bucket } | DragPayload::BucketFoliation { bucket } => bucket,
        }
    }
}

/// Where it is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Bucket(BucketId),
    Lane(DropZone),
}

/// A task may land on any other existing bucket, as long as it still lives
/// in `source`.
pub fn task_drop_allowed(store: &GraphStore, source: &BucketId, task: &TaskId, target: &BucketId) -> bool {
    target != source
        && store.bucket(target.as_str()).is_some()
        && store
            .bucket(source.as_str())
            .is_some_and(|b| b.tasks.iter().any(|t| &t.id == task))
}

/// `target` must be a legal new dependency of `dragged`.
pub fn dependency_drop_allowed(store: &GraphStore, dragged: &BucketId, target: &BucketId) -> bool {
    store
        .buckets_available_as_dependency_for(dragged)
        .contains(target)
}

/// The placement validator must list `dragged` for `zone`.
pub fn layer_drop_allowed(placements: &Placements, dragged: &BucketId, zone: DropZone) -> bool {
    placements.allows(zone, dragged)
}

/// The mutation a drop stands for, or `None` for a payload/target pairing
/// that means nothing (a task on a lane, a bucket-graph drag on a lane, ...).
///
/// `layering` must be the layering the lanes were rendered from.
pub fn drop_action(payload: &DragPayload, target: &DropTarget, layering: &Layering) -> Option<BoardAction> {
    match (payload, target) {
        (DragPayload::Task { task, .. }, DropTarget::Bucket(to)) => Some(BoardAction::MoveTask {
            task: task.clone(),
            to: to.clone(),
            index: None,
        }),
        (DragPayload::BucketGraph { bucket }, DropTarget::Bucket(dependency)) => {
            Some(BoardAction::AddDependency {
                bucket: bucket.clone(),
                dependency: dependency.clone(),
            })
        }
        (DragPayload::BucketFoliation { bucket }, DropTarget::Lane(zone)) => Some(BoardAction::SetLayer {
            bucket: bucket.clone(),
            layer: zone.target_layer(layering),
        }),
        _ => None,
    }
}

// src/engine/actions.rs

//! Typed board mutations and their outcome.

use tracing::debug;

use crate::engine::drag::{DragPayload, DropTarget};
use crate::errors::BoardError;
use crate::types::{BucketId, TaskId};

/// Every mutation a presentation layer can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardAction {
    AddDependency {
        bucket: BucketId,
        dependency: BucketId,
    },
    RemoveDependency {
        bucket: BucketId,
        dependency: BucketId,
    },
    SetLayer {
        bucket: BucketId,
        layer: i64,
    },
    /// "Restore defaults": drop every layer override.
    ClearLayerOverrides,
    AddBucket {
        name: String,
    },
    RemoveBucket {
        bucket: BucketId,
    },
    RenameBucket {
        bucket: BucketId,
        name: String,
    },
    SetBucketFlagged {
        bucket: BucketId,
        flagged: bool,
    },
    SetBucketActive {
        bucket: BucketId,
        active: bool,
    },
    AddTask {
        bucket: BucketId,
        title: String,
    },
    MoveTask {
        task: TaskId,
        to: BucketId,
        index: Option<usize>,
    },
    UpdateTaskTitle {
        task: TaskId,
        title: String,
    },
    SetTaskClosed {
        task: TaskId,
        closed: bool,
    },
    DeleteTask {
        task: TaskId,
    },
    /// A finished drag; translated into one of the actions above when the
    /// target accepts the payload.
    Drop {
        payload: DragPayload,
        target: DropTarget,
    },
}

/// Result of dispatching one [`BoardAction`].
#[derive(Debug)]
pub enum ActionOutcome {
    /// State changed.
    Applied,
    /// Nothing to do (unknown entity, edge already present, drop refused, ...).
    Unchanged,
    /// The store refused the mutation; state is untouched.
    Rejected(BoardError),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }

    pub(crate) fn changed(changed: bool) -> Self {
        if changed {
            ActionOutcome::Applied
        } else {
            ActionOutcome::Unchanged
        }
    }

    /// Outcome for a store error. A bucket that vanished before the action
    /// arrived makes it a no-op.
    pub(crate) fn from_error(err: BoardError) -> Self {
        match err {
            BoardError::BucketNotFound(bucket) => {
                debug!(%bucket, "action names a bucket that no longer exists");
                ActionOutcome::Unchanged
            }
            err => ActionOutcome::Rejected(err),
        }
    }
}

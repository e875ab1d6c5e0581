// src/board/bucket.rs

use serde::{Deserialize, Serialize};

use crate::types::{BucketId, TaskId};

/// A single task. Owned by exactly one bucket at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub closed: bool,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            closed: false,
        }
    }
}

/// A named container of tasks and the unit of the dependency graph.
///
/// `dependencies` lists the buckets this one comes after. The graph store
/// keeps it free of self references and cycles; the struct itself does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub id: BucketId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub dump: bool,
    /// Explicit user-pinned layer. Wins over the derived layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<i64>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub dependencies: Vec<BucketId>,
}

impl Bucket {
    /// An empty, inactive bucket with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(BucketId::generate(), name)
    }

    pub fn with_id(id: BucketId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: false,
            dump: false,
            layer: None,
            tasks: Vec::new(),
            flagged: false,
            dependencies: Vec::new(),
        }
    }

    /// The distinguished inbox bucket.
    pub fn dump(name: impl Into<String>) -> Self {
        Self {
            dump: true,
            active: true,
            ..Self::new(name)
        }
    }

    pub fn depends_directly_on(&self, other: &BucketId) -> bool {
        self.dependencies.contains(other)
    }

    pub fn state(&self) -> BucketState {
        BucketState::of(self)
    }
}

/// Progress summary of a bucket, derived from its tasks and `active` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BucketState {
    /// No tasks at all.
    Empty,
    /// Active and every task closed.
    Solved,
    /// Inactive and every task closed.
    Done,
    /// Active with at least one open task.
    Unsolved,
    /// Inactive with at least one open task.
    Inactive,
}

impl BucketState {
    pub fn of(bucket: &Bucket) -> Self {
        if bucket.tasks.is_empty() {
            return BucketState::Empty;
        }
        let all_closed = bucket.tasks.iter().all(|t| t.closed);
        match (all_closed, bucket.active) {
            (true, true) => BucketState::Solved,
            (true, false) => BucketState::Done,
            (false, true) => BucketState::Unsolved,
            (false, false) => BucketState::Inactive,
        }
    }
}

/// Full persisted board: `{ "buckets": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub buckets: Vec<Bucket>,
}

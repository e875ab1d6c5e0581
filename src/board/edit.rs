// src/board/edit.rs

//! Task and bucket edits on the graph store.
//!
//! These are plain list operations. Anything that names a bucket or task
//! which no longer exists is a logged no-op.

use tracing::{debug, warn};

use crate::board::bucket::{Bucket, Task};
use crate::board::defaults::ensure_default_buckets;
use crate::dag::graph::GraphStore;
use crate::types::{BucketId, TaskId};

impl GraphStore {
    /// Pad the board to the default bucket set. Returns how many buckets were
    /// added.
    pub fn ensure_default_buckets(&mut self) -> usize {
        let added = self
            .transact(|buckets| Ok(ensure_default_buckets(buckets)))
            .unwrap_or(0);
        if added > 0 {
            debug!(added, "default buckets ensured");
        }
        added
    }

    /// Append a new bucket and return its ID.
    pub fn add_bucket(&mut self, name: &str) -> BucketId {
        let bucket = Bucket::new(name.trim());
        let id = bucket.id.clone();
        self.buckets.push(bucket);
        debug!(bucket = %id, "bucket added");
        id
    }

    /// Delete a bucket, its tasks, and every edge pointing at it. The dump
    /// bucket cannot be removed.
    pub fn remove_bucket(&mut self, bucket: &BucketId) -> bool {
        match self.bucket(bucket.as_str()) {
            None => {
                warn!(%bucket, "remove for unknown bucket; ignoring");
                return false;
            }
            Some(b) if b.dump => {
                warn!(%bucket, "the dump bucket cannot be removed");
                return false;
            }
            Some(_) => {}
        }

        let removed = self.transact(|buckets| {
            buckets.retain(|b| &b.id != bucket);
            for b in buckets.iter_mut() {
                b.dependencies.retain(|d| d != bucket);
            }
            Ok(())
        });
        debug!(%bucket, "bucket removed");
        removed.is_ok()
    }

    pub fn find_task(&self, task: &TaskId) -> Option<(&Bucket, &Task)> {
        self.buckets
            .iter()
            .find_map(|b| b.tasks.iter().find(|t| &t.id == task).map(|t| (b, t)))
    }

    /// Append a task to `bucket`. The title is trimmed and cut to
    /// `max_title_len` characters.
    pub fn add_task(&mut self, bucket: &BucketId, title: &str, max_title_len: usize) -> Option<TaskId> {
        let Some(pos) = self.position_of(bucket) else {
            warn!(%bucket, "add_task for unknown bucket; ignoring");
            return None;
        };
        let task = Task::new(bound_title(title, max_title_len));
        let id = task.id.clone();
        self.buckets[pos].tasks.push(task);
        debug!(%bucket, task = %id, "task added");
        Some(id)
    }

    /// Move `task` into `to` at `index` (end of list when `None` or out of
    /// range). Ownership transfers in one step; moving within the same bucket
    /// reorders it.
    pub fn move_task(&mut self, task: &TaskId, to: &BucketId, index: Option<usize>) -> bool {
        if self.position_of(to).is_none() {
            warn!(bucket = %to, %task, "move_task to unknown bucket; ignoring");
            return false;
        }
        if self.find_task(task).is_none() {
            warn!(%task, "move_task for unknown task; ignoring");
            return false;
        }

        let moved = self.transact(|buckets| {
            let mut taken = None;
            for b in buckets.iter_mut() {
                if let Some(i) = b.tasks.iter().position(|t| &t.id == task) {
                    taken = Some(b.tasks.remove(i));
                    break;
                }
            }
            if let (Some(t), Some(target)) = (taken, buckets.iter_mut().find(|b| &b.id == to)) {
                let at = index.unwrap_or(usize::MAX).min(target.tasks.len());
                target.tasks.insert(at, t);
            }
            Ok(())
        });
        debug!(%task, bucket = %to, ?index, "task moved");
        moved.is_ok()
    }

    pub fn update_task_title(&mut self, task: &TaskId, title: &str, max_title_len: usize) -> bool {
        let title = bound_title(title, max_title_len);
        self.edit_task(task, |t| t.title = title)
    }

    pub fn set_task_closed(&mut self, task: &TaskId, closed: bool) -> bool {
        self.edit_task(task, |t| t.closed = closed)
    }

    pub fn delete_task(&mut self, task: &TaskId) -> bool {
        let Some(pos) = self
            .buckets
            .iter()
            .position(|b| b.tasks.iter().any(|t| &t.id == task))
        else {
            debug!(%task, "delete for unknown task; nothing to do");
            return false;
        };
        self.buckets[pos].tasks.retain(|t| &t.id != task);
        debug!(%task, "task deleted");
        true
    }

    pub fn rename_bucket(&mut self, bucket: &BucketId, name: &str) -> bool {
        self.edit_bucket(bucket, |b| b.name = name.trim().to_string())
    }

    pub fn set_bucket_flagged(&mut self, bucket: &BucketId, flagged: bool) -> bool {
        self.edit_bucket(bucket, |b| b.flagged = flagged)
    }

    pub fn set_bucket_active(&mut self, bucket: &BucketId, active: bool) -> bool {
        self.edit_bucket(bucket, |b| b.active = active)
    }

    fn position_of(&self, bucket: &BucketId) -> Option<usize> {
        self.buckets.iter().position(|b| &b.id == bucket)
    }

    fn edit_bucket(&mut self, bucket: &BucketId, edit: impl FnOnce(&mut Bucket)) -> bool {
        match self.buckets.iter_mut().find(|b| &b.id == bucket) {
            Some(b) => {
                edit(b);
                true
            }
            None => {
                warn!(%bucket, "edit for unknown bucket; ignoring");
                false
            }
        }
    }

    fn edit_task(&mut self, task: &TaskId, edit: impl FnOnce(&mut Task)) -> bool {
        match self
            .buckets
            .iter_mut()
            .find_map(|b| b.tasks.iter_mut().find(|t| &t.id == task))
        {
            Some(t) => {
                edit(t);
                true
            }
            None => {
                warn!(%task, "edit for unknown task; ignoring");
                false
            }
        }
    }
}

fn bound_title(title: &str, max_chars: usize) -> String {
    title.trim().chars().take(max_chars).collect()
}

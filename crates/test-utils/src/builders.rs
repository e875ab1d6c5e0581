use bucketdag::board::{Bucket, Snapshot, Task};
use bucketdag::config::BoardOptions;
use bucketdag::dag::{Chain, GraphStore};
use bucketdag::engine::Board;
use bucketdag::types::{BucketId, TaskId};

/// ID of the dump bucket every builder starts with.
pub const DUMP: &str = "dump";

pub fn id(s: &str) -> BucketId {
    BucketId::new(s)
}

pub fn chain(ids: &[&str]) -> Chain {
    ids.iter().map(|s| BucketId::new(*s)).collect()
}

/// Builder for boards with readable bucket IDs (`"A"`, `"B"`, ...).
pub struct BoardBuilder {
    buckets: Vec<Bucket>,
}

impl BoardBuilder {
    /// Starts with a single dump bucket whose ID is [`DUMP`].
    pub fn new() -> Self {
        let mut dump = Bucket::with_id(id(DUMP), "Inbox");
        dump.dump = true;
        dump.active = true;
        Self {
            buckets: vec![dump],
        }
    }

    pub fn without_dump(mut self) -> Self {
        self.buckets.retain(|b| !b.dump);
        self
    }

    /// Add a bucket if it does not exist yet.
    pub fn bucket(mut self, name: &str) -> Self {
        self.ensure(name);
        self
    }

    /// `name` depends on every bucket in `deps`; missing buckets are created.
    pub fn depends_on(mut self, name: &str, deps: &[&str]) -> Self {
        for dep in deps {
            self.ensure(dep);
        }
        let bucket = self.ensure(name);
        for dep in deps {
            bucket.dependencies.push(id(dep));
        }
        self
    }

    pub fn layer(mut self, name: &str, layer: i64) -> Self {
        self.ensure(name).layer = Some(layer);
        self
    }

    pub fn active(mut self, name: &str, active: bool) -> Self {
        self.ensure(name).active = active;
        self
    }

    pub fn task(mut self, name: &str, task_id: &str, title: &str, closed: bool) -> Self {
        self.ensure(name).tasks.push(Task {
            id: TaskId::new(task_id),
            title: title.to_string(),
            closed,
        });
        self
    }

    pub fn snapshot(self) -> Snapshot {
        Snapshot {
            buckets: self.buckets,
        }
    }

    pub fn store(self) -> GraphStore {
        GraphStore::from_snapshot(self.snapshot()).expect("Failed to build valid store from builder")
    }

    pub fn board(self) -> Board {
        self.board_with(BoardOptions::default())
    }

    pub fn board_with(self, options: BoardOptions) -> Board {
        Board::new(self.store(), options)
    }

    fn ensure(&mut self, name: &str) -> &mut Bucket {
        let pos = match self.buckets.iter().position(|b| b.id.as_str() == name) {
            Some(pos) => pos,
            None => {
                self.buckets.push(Bucket::with_id(id(name), name));
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[pos]
    }
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// src/board/defaults.rs

//! Demo board and default-bucket padding.

use tracing::debug;

use crate::board::bucket::{Bucket, Snapshot, Task};

/// Number of buckets a board always offers: the dump bucket plus ten.
pub const DEFAULT_BUCKET_COUNT: usize = 11;

/// The hardcoded demo board used when no snapshot could be loaded.
///
/// Two independent subgraphs (a product pipeline with a diamond and a short
/// marketing chain) plus one bucket without any dependency relation.
pub fn default_snapshot() -> Snapshot {
    let mut inbox = Bucket::dump("Inbox");
    inbox.tasks.push(Task::new("Sort incoming ideas"));

    let mut research = Bucket::new("Research");
    research.active = true;
    research.tasks.push(closed(Task::new("Interview five users")));
    research.tasks.push(Task::new("Summarise findings"));

    let mut design = Bucket::new("Design");
    design.active = true;
    design.tasks.push(Task::new("Sketch main screens"));

    let mut prototype = Bucket::new("Prototype");
    prototype.tasks.push(Task::new("Clickable mock-up"));

    let mut build = Bucket::new("Build");
    build.tasks.push(Task::new("Set up repository"));
    build.tasks.push(Task::new("Implement core flow"));

    let mut test = Bucket::new("Test");
    test.tasks.push(Task::new("Usability session"));

    let mut release = Bucket::new("Release");
    release.tasks.push(Task::new("Write changelog"));

    let mut branding = Bucket::new("Branding");
    branding.active = true;
    branding.tasks.push(closed(Task::new("Pick a name")));

    let mut copywriting = Bucket::new("Copywriting");
    copywriting.tasks.push(Task::new("Landing page text"));

    let mut marketing = Bucket::new("Marketing");
    marketing.flagged = true;

    let mut someday = Bucket::new("Someday");
    someday.tasks.push(Task::new("Learn the cello"));

    design.dependencies.push(research.id.clone());
    prototype.dependencies.push(research.id.clone());
    build.dependencies.push(design.id.clone());
    build.dependencies.push(prototype.id.clone());
    test.dependencies.push(build.id.clone());
    release.dependencies.push(test.id.clone());
    copywriting.dependencies.push(branding.id.clone());
    marketing.dependencies.push(copywriting.id.clone());

    Snapshot {
        buckets: vec![
            inbox,
            research,
            design,
            prototype,
            build,
            test,
            release,
            branding,
            copywriting,
            marketing,
            someday,
        ],
    }
}

fn closed(mut task: Task) -> Task {
    task.closed = true;
    task
}

/// Make sure a dump bucket exists and the board holds at least
/// [`DEFAULT_BUCKET_COUNT`] buckets. Returns how many buckets were added.
pub fn ensure_default_buckets(buckets: &mut Vec<Bucket>) -> usize {
    let before = buckets.len();

    if !buckets.iter().any(|b| b.dump) {
        debug!("no dump bucket present; inserting one");
        buckets.insert(0, Bucket::dump("Inbox"));
    }
    while buckets.len() < DEFAULT_BUCKET_COUNT {
        buckets.push(Bucket::new(""));
    }

    buckets.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_has_one_dump_and_eleven_buckets() {
        let snapshot = default_snapshot();
        assert_eq!(snapshot.buckets.len(), DEFAULT_BUCKET_COUNT);
        assert_eq!(snapshot.buckets.iter().filter(|b| b.dump).count(), 1);
    }

    #[test]
    fn ensure_default_buckets_pads_and_adds_dump() {
        let mut buckets = vec![Bucket::new("only")];
        let added = ensure_default_buckets(&mut buckets);
        assert_eq!(added, DEFAULT_BUCKET_COUNT - 1);
        assert!(buckets[0].dump);
        assert_eq!(buckets[1].name, "only");

        let mut full = default_snapshot().buckets;
        assert_eq!(ensure_default_buckets(&mut full), 0);
    }
}

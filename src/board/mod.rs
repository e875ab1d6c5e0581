// src/board/mod.rs

//! Board data model.
//!
//! - [`bucket`] holds the serialisable `Bucket` / `Task` / `Snapshot` types.
//! - [`defaults`] provides the demo board and the default-bucket padding
//!   applied when a board is opened.
//! - [`edit`] adds task and bucket editing to the graph store.

pub mod bucket;
pub mod defaults;
pub mod edit;

pub use bucket::{Bucket, BucketState, Snapshot, Task};
pub use defaults::{DEFAULT_BUCKET_COUNT, default_snapshot, ensure_default_buckets};

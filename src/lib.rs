// src/lib.rs

//! Dependency graph and layering engine for a bucket-based task board.
//!
//! Buckets hold tasks and depend on other buckets. The crate keeps that
//! graph acyclic, derives maximal dependency chains from it, lays buckets out
//! in ordered layers, and tells a drag-and-drop UI where a bucket may land.
//! [`Board`] is the entry point; [`dag`] holds the pure derivations.

pub mod board;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod store;
pub mod types;

pub use board::{Bucket, BucketState, Snapshot, Task};
pub use config::{BoardOptions, ConfigFile};
pub use dag::GraphStore;
pub use engine::{ActionOutcome, Board, BoardAction, BoardView, DragPayload, DropTarget};
pub use errors::{BoardError, Result};
pub use types::{BucketId, TaskId};

use anyhow::Context;
use std::path::Path;

/// Load the config at `path`, install logging at the configured level (unless
/// a subscriber is already installed), and open the board it describes.
pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Board> {
    let path = path.as_ref();
    let cfg = config::load_and_validate(path)
        .with_context(|| format!("loading config {:?}", path))?;
    if let Err(err) = logging::init_logging(cfg.logging.level) {
        // A host that installed its own subscriber keeps it.
        tracing::debug!(error = %err, "logging already initialised");
    }
    let board = Board::from_config(&cfg);
    tracing::info!(
        buckets = board.buckets().len(),
        layering = ?cfg.board.layering,
        "board opened"
    );
    Ok(board)
}

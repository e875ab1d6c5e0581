// src/dag/mod.rs

//! Dependency graph and layering engine.
//!
//! - [`graph`] owns buckets and edges and enforces acyclicity on write.
//! - [`chains`] derives maximal root-to-leaf paths.
//! - [`subgraph`] groups chains into connected components.
//! - [`layers`] turns chains plus overrides into dense ordered layers.
//! - [`placement`] computes where a dragged bucket may legally land.
//!
//! Everything except [`graph`] is a pure function of the store's current
//! state and is recomputed on every call.

pub mod chains;
pub mod graph;
pub mod layers;
pub mod placement;
pub mod subgraph;

pub use chains::{Chain, dependency_chains};
pub use graph::GraphStore;
pub use layers::{Layering, assign_layers};
pub use placement::{DropZone, PlacementBounds, Placements, allowed_buckets_by_layer};
pub use subgraph::{Subgraph, subgraphs, unconnected_buckets};

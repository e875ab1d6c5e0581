// src/engine/view.rs

//! Everything a renderer needs for one frame, derived from the store.

use tracing::warn;

use crate::config::BoardOptions;
use crate::dag::chains::{Chain, dependency_chains};
use crate::dag::graph::GraphStore;
use crate::dag::layers::{Layering, assign_layers};
use crate::dag::placement::{Placements, allowed_buckets_by_layer};
use crate::dag::subgraph::{subgraphs, unconnected_buckets};
use crate::types::BucketId;

/// One connected component with its layers and drop affordances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgraphView {
    pub chains: Vec<Chain>,
    pub layering: Layering,
    pub placements: Placements,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub dump: BucketId,
    pub subgraphs: Vec<SubgraphView>,
    /// Non-dump buckets without any dependency relation.
    pub unconnected: Vec<BucketId>,
}

/// Derive the full view. `None` (with a diagnostic) when the board has no
/// dump bucket.
pub fn board_view(store: &GraphStore, options: &BoardOptions) -> Option<BoardView> {
    let Some(dump) = store.dump_bucket() else {
        warn!("board has no dump bucket; nothing to render");
        return None;
    };

    let chains = dependency_chains(store);
    let unconnected = unconnected_buckets(store, &chains);
    let subgraphs = subgraphs(&chains)
        .into_iter()
        .map(|subgraph| {
            let layering = assign_layers(subgraph.chains(), store, options.layering);
            let placements = allowed_buckets_by_layer(subgraph.chains(), &layering);
            SubgraphView {
                chains: subgraph.chains().to_vec(),
                layering,
                placements,
            }
        })
        .collect();

    Some(BoardView {
        dump: dump.id.clone(),
        subgraphs,
        unconnected,
    })
}

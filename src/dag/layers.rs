// src/dag/layers.rs

//! Layer assignment: chains plus per-bucket overrides to an ordered, dense
//! list of layers.
//!
//! Layer `0` holds chain roots (buckets nothing else depends on); higher
//! indices are further down the dependency direction. Indices are absolute,
//! so a negative override makes the range start below zero.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::trace;

use crate::dag::chains::Chain;
use crate::dag::graph::GraphStore;
use crate::types::{BucketId, LayeringStrategy};

/// Layer overrides live in `-LAYER_LIMIT..=LAYER_LIMIT`, which keeps the
/// dense layer range small enough to materialise.
pub const LAYER_LIMIT: i64 = 1024;

/// `layer` pulled into the override window.
pub fn clamp_override(layer: i64) -> i64 {
    layer.clamp(-LAYER_LIMIT, LAYER_LIMIT)
}

/// Ordered layers from `first_index()` to `last_index()` with no gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layering {
    first: i64,
    layers: Vec<BTreeSet<BucketId>>,
    index: HashMap<BucketId, i64>,
}

impl Layering {
    pub fn layers(&self) -> &[BTreeSet<BucketId>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Absolute index of the first layer (0 unless an override is negative).
    pub fn first_index(&self) -> i64 {
        self.first
    }

    /// Absolute index of the last layer, `None` when there are no layers.
    pub fn last_index(&self) -> Option<i64> {
        (!self.layers.is_empty()).then(|| self.first + self.layers.len() as i64 - 1)
    }

    /// Buckets on the layer with absolute index `index`.
    pub fn get(&self, index: i64) -> Option<&BTreeSet<BucketId>> {
        let offset = usize::try_from(index.checked_sub(self.first)?).ok()?;
        self.layers.get(offset)
    }

    pub fn layer_of(&self, id: &BucketId) -> Option<i64> {
        self.index.get(id).copied()
    }

    /// `(absolute index, buckets)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &BTreeSet<BucketId>)> {
        let first = self.first;
        self.layers
            .iter()
            .enumerate()
            .map(move |(i, set)| (first + i as i64, set))
    }
}

/// Every bucket appearing in `chains`, in order of first appearance.
pub fn unique_buckets(chains: &[Chain]) -> Vec<BucketId> {
    let mut seen = HashSet::new();
    chains
        .iter()
        .flatten()
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

/// Layer a bucket gets from the chains alone, ignoring overrides.
pub fn derived_layer(chains: &[Chain], id: &BucketId, strategy: LayeringStrategy) -> Option<i64> {
    let mut positions = chains
        .iter()
        .filter_map(|chain| chain.iter().position(|c| c == id));
    let position = match strategy {
        LayeringStrategy::FirstChain => positions.next(),
        LayeringStrategy::LongestPath => positions.max(),
    };
    position.map(|p| p as i64)
}

/// Assign every bucket in `chains` to a layer.
///
/// A bucket's `layer` override in `store` takes precedence (pulled into the
/// override window, see [`clamp_override`]); otherwise the
/// layer comes from [`derived_layer`]. Buckets that appear in no chain are
/// not part of the result.
pub fn assign_layers(chains: &[Chain], store: &GraphStore, strategy: LayeringStrategy) -> Layering {
    let mut grouped: BTreeMap<i64, BTreeSet<BucketId>> = BTreeMap::new();
    let mut index: HashMap<BucketId, i64> = HashMap::new();

    for id in unique_buckets(chains) {
        let pinned = store
            .bucket(id.as_str())
            .and_then(|b| b.layer)
            .map(clamp_override);
        let Some(layer) = pinned.or_else(|| derived_layer(chains, &id, strategy)) else {
            continue;
        };
        grouped.entry(layer).or_default().insert(id.clone());
        index.insert(id, layer);
    }

    let (Some(&first), Some(&last)) = (grouped.keys().next(), grouped.keys().next_back()) else {
        return Layering::default();
    };

    let layers: Vec<BTreeSet<BucketId>> = (first..=last)
        .map(|i| grouped.remove(&i).unwrap_or_default())
        .collect();
    trace!(first, last, "layers assigned");

    Layering {
        first,
        layers,
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(ids: &[&str]) -> Chain {
        ids.iter().map(|id| BucketId::new(*id)).collect()
    }

    #[test]
    fn strategies_differ_when_positions_differ() {
        // X sits at position 1 in the first chain and 2 in the second.
        let chains = vec![chain(&["A", "X", "Z"]), chain(&["B", "C", "X", "Z"])];
        let x = BucketId::new("X");
        assert_eq!(derived_layer(&chains, &x, LayeringStrategy::FirstChain), Some(1));
        assert_eq!(derived_layer(&chains, &x, LayeringStrategy::LongestPath), Some(2));
        assert_eq!(derived_layer(&chains, &BucketId::new("Q"), LayeringStrategy::LongestPath), None);
    }

    #[test]
    fn overrides_are_pulled_into_the_window() {
        assert_eq!(clamp_override(i64::MAX), LAYER_LIMIT);
        assert_eq!(clamp_override(i64::MIN), -LAYER_LIMIT);
        assert_eq!(clamp_override(-3), -3);
    }

    #[test]
    fn empty_layering_has_no_last_index() {
        let layering = Layering::default();
        assert!(layering.is_empty());
        assert_eq!(layering.last_index(), None);
        assert!(layering.get(0).is_none());
        assert!(layering.get(i64::MIN).is_none());
    }
}

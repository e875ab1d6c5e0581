// src/dag/placement.rs

//! Placement validation for bucket drags onto layer lanes.
//!
//! For every bucket in a chain set we derive `[min, max]`:
//! - `min`: the smallest current layer among the bucket's dependents
//!   (`None` when nothing depends on it),
//! - `max`: the largest current layer among the bucket's dependencies
//!   (`None` when it depends on nothing).
//!
//! A bucket may be dropped onto layer `i` when it is not already there and
//! `min <= i <= max`. Nothing in here mutates state.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::dag::chains::{Chain, chain_edges};
use crate::dag::layers::{Layering, unique_buckets};
use crate::types::BucketId;

/// Inclusive layer range a bucket may move within. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementBounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl PlacementBounds {
    pub fn admits(&self, layer: i64) -> bool {
        self.min.is_none_or(|min| min <= layer) && self.max.is_none_or(|max| layer <= max)
    }

    /// The same range intersected with `lo..=hi`.
    pub fn within(&self, lo: i64, hi: i64) -> Self {
        Self {
            min: Some(self.min.map_or(lo, |min| min.max(lo))),
            max: Some(self.max.map_or(hi, |max| max.min(hi))),
        }
    }

    /// Nearest admitted layer, or `None` if the range is empty.
    pub fn clamp(&self, layer: i64) -> Option<i64> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return None;
            }
        }
        let layer = self.min.map_or(layer, |min| layer.max(min));
        Some(self.max.map_or(layer, |max| layer.min(max)))
    }
}

/// Bounds for every bucket in `chains`, measured on `layering`.
pub fn placement_bounds(chains: &[Chain], layering: &Layering) -> HashMap<BucketId, PlacementBounds> {
    let mut bounds: HashMap<BucketId, PlacementBounds> = unique_buckets(chains)
        .into_iter()
        .map(|id| (id, PlacementBounds::default()))
        .collect();

    for (dependent, dependency) in chain_edges(chains) {
        let (Some(dependent_layer), Some(dependency_layer)) =
            (layering.layer_of(dependent), layering.layer_of(dependency))
        else {
            continue;
        };
        if let Some(b) = bounds.get_mut(dependency) {
            b.min = Some(b.min.map_or(dependent_layer, |m| m.min(dependent_layer)));
        }
        if let Some(b) = bounds.get_mut(dependent) {
            b.max = Some(b.max.map_or(dependency_layer, |m| m.max(dependency_layer)));
        }
    }

    bounds
}

/// A place a bucket can be dropped in the layered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    /// Virtual lane before the first layer.
    BeforeAll,
    /// An existing layer, by absolute index.
    Layer(i64),
    /// Virtual lane after the last layer.
    AfterAll,
}

impl DropZone {
    /// The absolute layer index a drop into this zone pins the bucket to.
    pub fn target_layer(&self, layering: &Layering) -> i64 {
        match self {
            DropZone::BeforeAll => layering.first_index().saturating_sub(1),
            DropZone::Layer(index) => *index,
            DropZone::AfterAll => layering.last_index().map_or(0, |last| last.saturating_add(1)),
        }
    }
}

/// Which buckets each drop zone accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placements {
    by_layer: BTreeMap<i64, BTreeSet<BucketId>>,
    before_all: BTreeSet<BucketId>,
    after_all: BTreeSet<BucketId>,
}

impl Placements {
    pub fn by_layer(&self) -> &BTreeMap<i64, BTreeSet<BucketId>> {
        &self.by_layer
    }

    /// Chain roots: nothing depends on them.
    pub fn before_all(&self) -> &BTreeSet<BucketId> {
        &self.before_all
    }

    /// Chain leaves: they depend on nothing.
    pub fn after_all(&self) -> &BTreeSet<BucketId> {
        &self.after_all
    }

    pub fn allowed_on(&self, zone: DropZone) -> Option<&BTreeSet<BucketId>> {
        match zone {
            DropZone::BeforeAll => Some(&self.before_all),
            DropZone::Layer(index) => self.by_layer.get(&index),
            DropZone::AfterAll => Some(&self.after_all),
        }
    }

    pub fn allows(&self, zone: DropZone, id: &BucketId) -> bool {
        self.allowed_on(zone).is_some_and(|set| set.contains(id))
    }
}

/// Per layer, the buckets that may be dropped there, plus the two virtual
/// zones.
pub fn allowed_buckets_by_layer(chains: &[Chain], layering: &Layering) -> Placements {
    let bounds = placement_bounds(chains, layering);

    let mut by_layer: BTreeMap<i64, BTreeSet<BucketId>> = BTreeMap::new();
    for (index, _) in layering.iter() {
        let allowed = bounds
            .iter()
            .filter(|(id, b)| layering.layer_of(id) != Some(index) && b.admits(index))
            .map(|(id, _)| id.clone())
            .collect();
        by_layer.insert(index, allowed);
    }

    let before_all = chains.iter().filter_map(|c| c.first().cloned()).collect();
    let after_all = chains.iter().filter_map(|c| c.last().cloned()).collect();

    Placements {
        by_layer,
        before_all,
        after_all,
    }
}

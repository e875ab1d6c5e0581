// src/dag/subgraph.rs

//! Grouping chains into connected components ("subgraphs") and listing the
//! buckets that belong to none.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::unionfind::UnionFind;

use crate::dag::chains::Chain;
use crate::dag::graph::GraphStore;
use crate::types::BucketId;

/// Chains that share at least one bucket, transitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgraph {
    chains: Vec<Chain>,
}

impl Subgraph {
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Unique bucket IDs in order of first appearance.
    pub fn buckets(&self) -> Vec<BucketId> {
        let mut seen = HashSet::new();
        self.chains
            .iter()
            .flatten()
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect()
    }

    pub fn contains(&self, id: &BucketId) -> bool {
        self.chains.iter().any(|chain| chain.contains(id))
    }
}

/// Partition `chains` into connected components by shared bucket
/// membership. Components are ordered by their first chain.
pub fn subgraphs(chains: &[Chain]) -> Vec<Subgraph> {
    let mut components = UnionFind::<usize>::new(chains.len());
    let mut owner: HashMap<&BucketId, usize> = HashMap::new();

    for (i, chain) in chains.iter().enumerate() {
        for id in chain {
            match owner.get(id) {
                Some(&first) => {
                    components.union(first, i);
                }
                None => {
                    owner.insert(id, i);
                }
            }
        }
    }

    // Key by the smallest chain index of each component to keep input order.
    let mut grouped: BTreeMap<usize, Vec<Chain>> = BTreeMap::new();
    let mut leader_of_root: HashMap<usize, usize> = HashMap::new();
    for (i, chain) in chains.iter().enumerate() {
        let root = components.find(i);
        let leader = *leader_of_root.entry(root).or_insert(i);
        grouped.entry(leader).or_default().push(chain.clone());
    }

    grouped
        .into_values()
        .map(|chains| Subgraph { chains })
        .collect()
}

/// The subgraph containing `id`, if the bucket appears in any chain.
pub fn subgraph_of(chains: &[Chain], id: &BucketId) -> Option<Subgraph> {
    subgraphs(chains).into_iter().find(|s| s.contains(id))
}

/// Non-dump buckets that appear in no chain, in store order.
pub fn unconnected_buckets(store: &GraphStore, chains: &[Chain]) -> Vec<BucketId> {
    let connected: HashSet<&BucketId> = chains.iter().flatten().collect();
    store
        .graph_buckets()
        .filter(|b| !connected.contains(&b.id))
        .map(|b| b.id.clone())
        .collect()
}

// src/dag/chains.rs

//! Chain extraction.
//!
//! A chain is an ordered path `[root, ..., leaf]` where every consecutive
//! pair is a dependency edge `dependent -> dependency`. Chains are computed
//! from every bucket and then filtered down to maximal paths with at least
//! one edge.

use std::collections::{HashMap, HashSet};

use tracing::{trace, warn};

use crate::board::Bucket;
use crate::dag::graph::GraphStore;
use crate::types::BucketId;

pub type Chain = Vec<BucketId>;

/// All maximal dependency chains of the store, dump bucket excluded.
///
/// Order is deterministic: chains appear in the order their starting bucket
/// appears in the store, then in dependency-list order.
pub fn dependency_chains(store: &GraphStore) -> Vec<Chain> {
    let index: HashMap<&str, &Bucket> = store
        .graph_buckets()
        .map(|b| (b.id.as_str(), b))
        .collect();

    // Memo is per call; nothing survives between calls.
    let mut memo: HashMap<BucketId, Vec<Chain>> = HashMap::new();
    let mut all: Vec<Chain> = Vec::new();
    for bucket in store.graph_buckets() {
        let mut on_path: HashSet<BucketId> = HashSet::new();
        all.extend(chains_from(&bucket.id, &index, &mut memo, &mut on_path));
    }

    let chains = maximal_chains(all);
    trace!(count = chains.len(), "dependency chains extracted");
    chains
}

fn chains_from(
    id: &BucketId,
    index: &HashMap<&str, &Bucket>,
    memo: &mut HashMap<BucketId, Vec<Chain>>,
    on_path: &mut HashSet<BucketId>,
) -> Vec<Chain> {
    if let Some(known) = memo.get(id) {
        return known.clone();
    }
    let Some(bucket) = index.get(id.as_str()) else {
        return Vec::new();
    };

    on_path.insert(id.clone());
    let mut out: Vec<Chain> = Vec::new();
    for dep in &bucket.dependencies {
        // Dump bucket and dangling references are not part of the graph.
        if !index.contains_key(dep.as_str()) {
            continue;
        }
        if on_path.contains(dep) {
            warn!(bucket = %id, dependency = %dep, "cycle in dependency graph; edge skipped");
            continue;
        }
        for tail in chains_from(dep, index, memo, on_path) {
            let mut chain = Vec::with_capacity(tail.len() + 1);
            chain.push(id.clone());
            chain.extend(tail);
            out.push(chain);
        }
    }
    on_path.remove(id);

    if out.is_empty() {
        out.push(vec![id.clone()]);
    }
    memo.insert(id.clone(), out.clone());
    out
}

/// Deduplicate, drop every chain that is a strict suffix of a longer one, then
/// drop single-bucket chains.
pub fn maximal_chains(chains: Vec<Chain>) -> Vec<Chain> {
    let proper_suffixes: HashSet<&[BucketId]> = chains
        .iter()
        .flat_map(|chain| (1..chain.len()).map(move |start| &chain[start..]))
        .collect();

    let mut seen: HashSet<&[BucketId]> = HashSet::new();
    let keep: Vec<bool> = chains
        .iter()
        .map(|chain| {
            chain.len() > 1
                && !proper_suffixes.contains(chain.as_slice())
                && seen.insert(chain.as_slice())
        })
        .collect();

    chains
        .iter()
        .zip(keep)
        .filter_map(|(chain, keep)| keep.then(|| chain.clone()))
        .collect()
}

/// Direct edges `(dependent, dependency)` contained in a chain set.
pub fn chain_edges(chains: &[Chain]) -> HashSet<(&BucketId, &BucketId)> {
    chains
        .iter()
        .flat_map(|chain| chain.windows(2).map(|pair| (&pair[0], &pair[1])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(ids: &[&str]) -> Chain {
        ids.iter().map(|id| BucketId::new(*id)).collect()
    }

    #[test]
    fn maximal_chains_removes_suffixes_duplicates_and_singletons() {
        let input = vec![
            chain(&["A"]),
            chain(&["B", "A"]),
            chain(&["C", "B", "A"]),
            chain(&["C", "B", "A"]),
            chain(&["D"]),
            chain(&["E", "A"]),
        ];
        assert_eq!(
            maximal_chains(input),
            vec![chain(&["C", "B", "A"]), chain(&["E", "A"])]
        );
    }

    #[test]
    fn chain_edges_follow_consecutive_pairs() {
        let chains = vec![chain(&["C", "B", "A"])];
        let edges = chain_edges(&chains);
        assert_eq!(edges.len(), 2);
        assert!(edges.contains(&(&BucketId::new("C"), &BucketId::new("B"))));
        assert!(edges.contains(&(&BucketId::new("B"), &BucketId::new("A"))));
    }
}

use std::collections::{HashMap, HashSet};

use bucketdag::config::BoardOptions;
use bucketdag::dag::placement::placement_bounds;
use bucketdag::dag::{
    DropZone, GraphStore, allowed_buckets_by_layer, assign_layers, dependency_chains, subgraphs,
};
use bucketdag::types::{BucketId, LayeringStrategy, OverridePolicy};
use bucketdag_test_utils::builders::{BoardBuilder, id};
use proptest::prelude::*;

fn name(i: usize) -> String {
    format!("b{i}")
}

// Acyclic by construction: bucket N may only depend on buckets 0..N.
fn dag_strategy(max_buckets: usize) -> impl Strategy<Value = GraphStore> {
    (1..=max_buckets).prop_flat_map(|count| {
        proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..count), count)
            .prop_map(move |raw_deps| {
                let mut builder = BoardBuilder::new();
                for (i, potential) in raw_deps.into_iter().enumerate() {
                    let mut deps: Vec<String> = Vec::new();
                    if i > 0 {
                        for d in potential {
                            let dep = name(d % i);
                            if !deps.contains(&dep) {
                                deps.push(dep);
                            }
                        }
                    }
                    let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
                    builder = builder.depends_on(&name(i), &deps);
                }
                builder.store()
            })
    })
}

fn edges(store: &GraphStore) -> Vec<(BucketId, BucketId)> {
    store
        .graph_buckets()
        .flat_map(|b| b.dependencies.iter().map(move |d| (b.id.clone(), d.clone())))
        .collect()
}

proptest! {
    #[test]
    fn random_edits_never_create_a_cycle(
        count in 2..8usize,
        edits in proptest::collection::vec((0..8usize, 0..8usize, any::<bool>()), 1..40),
    ) {
        let mut builder = BoardBuilder::new();
        for i in 0..count {
            builder = builder.bucket(&name(i));
        }
        let mut store = builder.store();

        for (from, to, add) in edits {
            let (from, to) = (id(&name(from % count)), id(&name(to % count)));
            let before = store.snapshot();
            if add {
                if store.add_dependency(&from, &to).is_err() {
                    prop_assert_eq!(store.snapshot(), before);
                }
            } else {
                store.remove_dependency(&from, &to);
            }
        }

        // Snapshot validation runs a full topological sort.
        prop_assert!(GraphStore::from_snapshot(store.snapshot()).is_ok());
    }

    #[test]
    fn chains_are_maximal_paths(store in dag_strategy(8)) {
        let chains = dependency_chains(&store);
        let edge_set: HashSet<(BucketId, BucketId)> = edges(&store).into_iter().collect();

        for chain in &chains {
            prop_assert!(chain.len() >= 2);
            for pair in chain.windows(2) {
                prop_assert!(edge_set.contains(&(pair[0].clone(), pair[1].clone())));
            }
            // Starts at a root, ends at a leaf.
            prop_assert!(store.buckets_depending_on(&chain[0]).is_empty());
            let last = store.bucket(chain[chain.len() - 1].as_str()).unwrap();
            prop_assert!(last.dependencies.is_empty());
        }
        for a in &chains {
            for b in &chains {
                if a.len() < b.len() {
                    prop_assert!(!b.ends_with(a));
                }
            }
        }
        // Every edge lies on some chain.
        for (from, to) in &edge_set {
            prop_assert!(chains.iter().any(|c| c.windows(2).any(|w| &w[0] == from && &w[1] == to)));
        }
    }

    #[test]
    fn layers_are_dense_and_cover_every_chained_bucket(
        store in dag_strategy(8),
        overrides in proptest::collection::vec((0..8usize, -3i64..6), 0..4),
        first_chain in any::<bool>(),
    ) {
        let mut store = store;
        let count = store.graph_buckets().count();
        for (i, layer) in overrides {
            let bucket = id(&name(i % count));
            // Clamping can still refuse when earlier pins inverted the bounds.
            let _ = store.set_layer(&bucket, layer, &BoardOptions::default());
        }
        let strategy = if first_chain {
            LayeringStrategy::FirstChain
        } else {
            LayeringStrategy::LongestPath
        };

        let chains = dependency_chains(&store);
        let layering = assign_layers(&chains, &store, strategy);
        let chained: HashSet<&BucketId> = chains.iter().flatten().collect();

        if chained.is_empty() {
            prop_assert!(layering.is_empty());
            return Ok(());
        }
        let last = layering.last_index().unwrap();
        prop_assert_eq!(layering.len() as i64, last - layering.first_index() + 1);
        prop_assert!(!layering.layers()[0].is_empty());
        prop_assert!(!layering.layers()[layering.len() - 1].is_empty());

        let mut seen: HashMap<&BucketId, i64> = HashMap::new();
        for (index, members) in layering.iter() {
            for bucket in members {
                prop_assert!(seen.insert(bucket, index).is_none());
                prop_assert_eq!(layering.layer_of(bucket), Some(index));
            }
        }
        prop_assert_eq!(seen.len(), chained.len());
    }

    #[test]
    fn offered_lanes_respect_dependency_bounds(store in dag_strategy(8)) {
        let chains = dependency_chains(&store);
        for component in subgraphs(&chains) {
            let layering = assign_layers(component.chains(), &store, LayeringStrategy::LongestPath);
            let placements = allowed_buckets_by_layer(component.chains(), &layering);
            let bounds = placement_bounds(component.chains(), &layering);

            for (lane, allowed) in placements.by_layer() {
                for bucket in allowed {
                    prop_assert_ne!(layering.layer_of(bucket), Some(*lane));
                    for dependent in store.buckets_depending_on(bucket) {
                        if let Some(l) = layering.layer_of(&dependent) {
                            prop_assert!(bounds[bucket].min.is_some_and(|min| min <= l));
                            prop_assert!(*lane >= bounds[bucket].min.unwrap_or(i64::MIN));
                        }
                    }
                    let deps = &store.bucket(bucket.as_str()).unwrap().dependencies;
                    if let Some(max) = deps.iter().filter_map(|d| layering.layer_of(d)).max() {
                        prop_assert!(*lane <= max);
                    }
                }
            }
            for root in placements.before_all() {
                prop_assert!(placements.allows(DropZone::BeforeAll, root));
                prop_assert!(store.buckets_depending_on(root).is_empty());
            }
        }
    }

    #[test]
    fn accepted_overrides_stay_within_bounds_under_reject(
        store in dag_strategy(6),
        target in 0..6usize,
        layer in -4i64..8,
    ) {
        let mut store = store;
        let count = store.graph_buckets().count();
        let bucket = id(&name(target % count));
        let options = BoardOptions {
            override_policy: OverridePolicy::Reject,
            ..BoardOptions::default()
        };
        let before = store.snapshot();

        match store.set_layer(&bucket, layer, &options) {
            Ok(applied) => prop_assert_eq!(applied, layer),
            Err(_) => prop_assert_eq!(store.snapshot(), before),
        }
    }

    #[test]
    fn removing_what_is_not_there_changes_nothing(store in dag_strategy(6)) {
        let mut store = store;
        let before = store.snapshot();
        prop_assert!(!store.remove_dependency(&id("b0"), &id("nope")));
        prop_assert!(!store.delete_task(&bucketdag::types::TaskId::new("nope")));
        prop_assert_eq!(store.snapshot(), before);
    }
}

use bucketdag::config::BoardOptions;
use bucketdag::dag::layers::LAYER_LIMIT;
use bucketdag::errors::BoardError;
use bucketdag::types::OverridePolicy;
use bucketdag_test_utils::builders::{BoardBuilder, DUMP, id};
use bucketdag_test_utils::init_tracing;

#[test]
fn add_dependency_appends_edge() {
    init_tracing();
    let mut store = BoardBuilder::new().bucket("A").bucket("B").store();

    assert!(store.add_dependency(&id("A"), &id("B")).unwrap());
    assert_eq!(store.bucket("A").unwrap().dependencies, vec![id("B")]);
}

#[test]
fn add_dependency_is_idempotent_for_existing_edge() {
    init_tracing();
    let mut store = BoardBuilder::new().depends_on("A", &["B"]).store();

    assert!(!store.add_dependency(&id("A"), &id("B")).unwrap());
    assert_eq!(store.bucket("A").unwrap().dependencies.len(), 1);
}

#[test]
fn direct_cycle_is_rejected_and_graph_unchanged() {
    init_tracing();
    let mut store = BoardBuilder::new().depends_on("A", &["B"]).store();
    let before = store.snapshot();

    let err = store.add_dependency(&id("B"), &id("A")).unwrap_err();
    assert!(matches!(err, BoardError::Cycle { .. }), "got {err:?}");
    assert_eq!(store.snapshot(), before);
}

#[test]
fn transitive_cycle_is_rejected() {
    init_tracing();
    // A -> B -> C
    let mut store = BoardBuilder::new()
        .depends_on("B", &["C"])
        .depends_on("A", &["B"])
        .store();

    match store.add_dependency(&id("C"), &id("A")) {
        Err(BoardError::Cycle { bucket, dependency }) => {
            assert_eq!(bucket, id("C"));
            assert_eq!(dependency, id("A"));
        }
        other => panic!("expected cycle rejection, got {other:?}"),
    }
    assert!(store.bucket("C").unwrap().dependencies.is_empty());
}

#[test]
fn self_dependency_is_rejected() {
    init_tracing();
    let mut store = BoardBuilder::new().bucket("A").store();

    let err = store.add_dependency(&id("A"), &id("A")).unwrap_err();
    assert!(matches!(err, BoardError::SelfDependency(b) if b == id("A")));
}

#[test]
fn dump_and_unknown_buckets_are_rejected() {
    init_tracing();
    let mut store = BoardBuilder::new().bucket("A").store();

    assert!(matches!(
        store.add_dependency(&id("A"), &id(DUMP)),
        Err(BoardError::DumpBucket(_))
    ));
    assert!(matches!(
        store.add_dependency(&id(DUMP), &id("A")),
        Err(BoardError::DumpBucket(_))
    ));
    assert!(matches!(
        store.add_dependency(&id("A"), &id("ghost")),
        Err(BoardError::BucketNotFound(b)) if b == id("ghost")
    ));
}

#[test]
fn remove_dependency_is_idempotent() {
    init_tracing();
    let mut store = BoardBuilder::new().depends_on("A", &["B"]).store();

    assert!(store.remove_dependency(&id("A"), &id("B")));
    let after_first = store.snapshot();
    assert!(!store.remove_dependency(&id("A"), &id("B")));
    assert!(!store.remove_dependency(&id("ghost"), &id("B")));
    assert_eq!(store.snapshot(), after_first);
}

#[test]
fn availability_excludes_self_direct_deps_and_cycle_makers() {
    init_tracing();
    // C -> B -> A, D unrelated
    let store = BoardBuilder::new()
        .depends_on("B", &["A"])
        .depends_on("C", &["B"])
        .bucket("D")
        .store();

    assert_eq!(store.buckets_available_as_dependency_for(&id("C")), vec![id("A"), id("D")]);
    assert_eq!(store.buckets_available_as_dependency_for(&id("A")), vec![id("D")]);
    assert_eq!(
        store.buckets_available_as_dependency_for(&id("D")),
        vec![id("A"), id("B"), id("C")]
    );
    assert!(store.buckets_available_as_dependency_for(&id(DUMP)).is_empty());
    assert!(store.buckets_available_as_dependency_for(&id("ghost")).is_empty());
}

#[test]
fn dependents_are_reverse_adjacency() {
    let store = BoardBuilder::new()
        .depends_on("B", &["A"])
        .depends_on("C", &["A", "B"])
        .store();

    assert_eq!(store.buckets_depending_on(&id("A")), vec![id("B"), id("C")]);
    assert_eq!(store.buckets_depending_on(&id("B")), vec![id("C")]);
    assert!(store.buckets_depending_on(&id("C")).is_empty());
}

#[test]
fn set_layer_clamps_override_into_bounds() {
    init_tracing();
    // Layers: C=0, A=1, B=1. C's dependencies sit on layer 1.
    let mut store = BoardBuilder::new().depends_on("C", &["A", "B"]).store();
    let options = BoardOptions::default();

    assert_eq!(store.set_layer(&id("C"), 5, &options).unwrap(), 1);
    assert_eq!(store.bucket("C").unwrap().layer, Some(1));

    // No dependents: anything below is fine.
    assert_eq!(store.set_layer(&id("C"), -4, &options).unwrap(), -4);
}

#[test]
fn set_layer_rejects_out_of_bounds_under_reject_policy() {
    init_tracing();
    let mut store = BoardBuilder::new().depends_on("C", &["A", "B"]).store();
    let options = BoardOptions {
        override_policy: OverridePolicy::Reject,
        ..BoardOptions::default()
    };

    match store.set_layer(&id("A"), -1, &options) {
        Err(BoardError::LayerOutOfBounds { requested, min, max, .. }) => {
            assert_eq!(requested, -1);
            assert_eq!(min, Some(0));
            assert_eq!(max, Some(LAYER_LIMIT));
        }
        other => panic!("expected LayerOutOfBounds, got {other:?}"),
    }
    assert_eq!(store.bucket("A").unwrap().layer, None);
}

#[test]
fn set_layer_on_unconnected_bucket_is_unchecked() {
    let mut store = BoardBuilder::new().bucket("Lonely").store();
    let options = BoardOptions {
        override_policy: OverridePolicy::Reject,
        ..BoardOptions::default()
    };

    assert_eq!(store.set_layer(&id("Lonely"), 42, &options).unwrap(), 42);
    assert!(matches!(
        store.set_layer(&id(DUMP), 0, &options),
        Err(BoardError::DumpBucket(_))
    ));
}

#[test]
fn clear_all_layer_overrides_restores_defaults() {
    let mut store = BoardBuilder::new()
        .depends_on("C", &["A"])
        .layer("A", 3)
        .layer("C", 0)
        .store();

    assert_eq!(store.clear_all_layer_overrides(), 2);
    assert!(store.buckets().iter().all(|b| b.layer.is_none()));
    assert_eq!(store.clear_all_layer_overrides(), 0);
}

#[test]
fn removing_a_bucket_drops_edges_pointing_at_it() {
    let mut store = BoardBuilder::new()
        .depends_on("B", &["A"])
        .depends_on("C", &["A", "B"])
        .store();

    assert!(store.remove_bucket(&id("A")));
    assert!(store.bucket("A").is_none());
    assert_eq!(store.bucket("C").unwrap().dependencies, vec![id("B")]);
    assert!(store.bucket("B").unwrap().dependencies.is_empty());
    assert!(!store.remove_bucket(&id(DUMP)));
}

#[test]
fn extreme_overrides_are_clamped_into_the_window() {
    init_tracing();
    // C -> A: A is a leaf (no upper bound), C a root (no lower bound).
    let mut store = BoardBuilder::new().depends_on("C", &["A"]).bucket("Lonely").store();
    let options = BoardOptions::default();

    assert_eq!(store.set_layer(&id("A"), i64::MAX, &options).unwrap(), LAYER_LIMIT);
    assert_eq!(store.set_layer(&id("C"), i64::MIN, &options).unwrap(), -LAYER_LIMIT);
    assert_eq!(store.set_layer(&id("Lonely"), i64::MAX, &options).unwrap(), LAYER_LIMIT);
}

#[test]
fn extreme_overrides_are_refused_under_reject_policy() {
    let mut store = BoardBuilder::new().depends_on("C", &["A"]).store();
    let options = BoardOptions {
        override_policy: OverridePolicy::Reject,
        ..BoardOptions::default()
    };

    assert!(matches!(
        store.set_layer(&id("A"), i64::MAX, &options),
        Err(BoardError::LayerOutOfBounds { max: Some(LAYER_LIMIT), .. })
    ));
    assert_eq!(store.bucket("A").unwrap().layer, None);
}

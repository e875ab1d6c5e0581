// src/dag/graph.rs

//! The graph store: single owner of buckets, their tasks and dependency edges.
//!
//! Every mutation runs through [`GraphStore::transact`], which edits a copy of
//! the bucket list and swaps it in only when the whole operation succeeded.
//! Rejected mutations are logged here and leave the store untouched.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::board::{Bucket, Snapshot};
use crate::config::BoardOptions;
use crate::dag::chains::dependency_chains;
use crate::dag::layers::{LAYER_LIMIT, assign_layers, clamp_override};
use crate::dag::placement::{PlacementBounds, placement_bounds};
use crate::dag::subgraph::subgraph_of;
use crate::errors::{BoardError, Result};
use crate::types::{BucketId, OverridePolicy};

#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    pub(crate) buckets: Vec<Bucket>,
}

impl GraphStore {
    /// Build a store from a persisted snapshot.
    ///
    /// Fails on duplicate bucket IDs, more than one dump bucket, self
    /// dependencies and cycles. Dependencies on unknown buckets and repeated
    /// entries are dropped with a diagnostic, and layer overrides outside the
    /// override window are clamped into it.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut buckets = snapshot.buckets;

        let mut seen: HashSet<BucketId> = HashSet::new();
        for bucket in &buckets {
            if !seen.insert(bucket.id.clone()) {
                return Err(BoardError::InvalidSnapshot(format!(
                    "duplicate bucket id '{}'",
                    bucket.id
                )));
            }
        }

        let dumps = buckets.iter().filter(|b| b.dump).count();
        if dumps > 1 {
            return Err(BoardError::InvalidSnapshot(format!(
                "expected at most one dump bucket, found {dumps}"
            )));
        }

        for bucket in &mut buckets {
            if bucket.depends_directly_on(&bucket.id) {
                return Err(BoardError::InvalidSnapshot(format!(
                    "bucket '{}' depends on itself",
                    bucket.id
                )));
            }
            let mut kept: Vec<BucketId> = Vec::with_capacity(bucket.dependencies.len());
            for dep in bucket.dependencies.drain(..) {
                if !seen.contains(&dep) {
                    warn!(bucket = %bucket.id, dependency = %dep, "dropping dependency on unknown bucket");
                } else if !kept.contains(&dep) {
                    kept.push(dep);
                }
            }
            bucket.dependencies = kept;

            if let Some(layer) = bucket.layer {
                let clamped = clamp_override(layer);
                if clamped != layer {
                    warn!(bucket = %bucket.id, layer, clamped, "layer override outside the window; clamped");
                    bucket.layer = Some(clamped);
                }
            }
        }

        ensure_acyclic(&buckets)?;

        Ok(Self { buckets })
    }

    /// Copy of the current state for persistence.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            buckets: self.buckets.clone(),
        }
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn bucket(&self, id: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.id.as_str() == id)
    }

    pub fn dump_bucket(&self) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.dump)
    }

    /// Buckets that take part in dependency and layer computations
    /// (everything except the dump bucket).
    pub fn graph_buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter().filter(|b| !b.dump)
    }

    /// Whether `target` is `start` itself or reachable from `start` by
    /// following dependency edges.
    ///
    /// One shared visited set: every bucket is expanded at most once, so
    /// diamonds are not re-walked.
    pub fn reaches(&self, start: &BucketId, target: &BucketId) -> bool {
        let index = self.index();
        let mut stack: Vec<&BucketId> = vec![start];
        let mut visited: HashSet<&BucketId> = HashSet::new();

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(bucket) = index.get(current.as_str()) {
                stack.extend(bucket.dependencies.iter());
            }
        }

        false
    }

    /// Add the edge `bucket -> dependency` (bucket comes after dependency).
    ///
    /// Returns `Ok(true)` when the edge was added and `Ok(false)` when it was
    /// already present. Self edges, cycles, unknown buckets and the dump
    /// bucket are rejected without touching the graph.
    pub fn add_dependency(&mut self, bucket: &BucketId, dependency: &BucketId) -> Result<bool> {
        if bucket == dependency {
            return reject(BoardError::SelfDependency(bucket.clone()));
        }
        for id in [bucket, dependency] {
            match self.bucket(id.as_str()) {
                None => return reject(BoardError::BucketNotFound(id.clone())),
                Some(b) if b.dump => return reject(BoardError::DumpBucket(id.clone())),
                Some(_) => {}
            }
        }
        if self
            .bucket(bucket.as_str())
            .is_some_and(|b| b.depends_directly_on(dependency))
        {
            debug!(%bucket, %dependency, "dependency already present");
            return Ok(false);
        }
        if self.reaches(dependency, bucket) {
            return reject(BoardError::Cycle {
                bucket: bucket.clone(),
                dependency: dependency.clone(),
            });
        }

        self.transact(|buckets| {
            if let Some(b) = buckets.iter_mut().find(|b| &b.id == bucket) {
                b.dependencies.push(dependency.clone());
            }
            Ok(())
        })?;
        debug!(%bucket, %dependency, "dependency added");
        Ok(true)
    }

    /// Remove the edge `bucket -> dependency` if present. Returns whether
    /// anything changed.
    pub fn remove_dependency(&mut self, bucket: &BucketId, dependency: &BucketId) -> bool {
        let present = self
            .bucket(bucket.as_str())
            .is_some_and(|b| b.depends_directly_on(dependency));
        if !present {
            debug!(%bucket, %dependency, "no such dependency; nothing to remove");
            return false;
        }

        let removed = self.transact(|buckets| {
            if let Some(b) = buckets.iter_mut().find(|b| &b.id == bucket) {
                b.dependencies.retain(|d| d != dependency);
            }
            Ok(())
        });
        debug!(%bucket, %dependency, "dependency removed");
        removed.is_ok()
    }

    /// Buckets that could become a new direct dependency of `bucket`: not the
    /// bucket itself, not already a direct dependency, not the dump bucket,
    /// and not something that (transitively) depends on `bucket`.
    pub fn buckets_available_as_dependency_for(&self, bucket: &BucketId) -> Vec<BucketId> {
        let Some(subject) = self.bucket(bucket.as_str()) else {
            warn!(%bucket, "availability requested for unknown bucket");
            return Vec::new();
        };
        if subject.dump {
            return Vec::new();
        }

        self.graph_buckets()
            .filter(|candidate| &candidate.id != bucket)
            .filter(|candidate| !subject.depends_directly_on(&candidate.id))
            .filter(|candidate| !self.reaches(&candidate.id, bucket))
            .map(|candidate| candidate.id.clone())
            .collect()
    }

    /// Direct dependents of `bucket` (reverse adjacency).
    pub fn buckets_depending_on(&self, bucket: &BucketId) -> Vec<BucketId> {
        self.buckets
            .iter()
            .filter(|b| b.depends_directly_on(bucket))
            .map(|b| b.id.clone())
            .collect()
    }

    /// Pin `bucket` to `layer`.
    ///
    /// The value is checked against the placement bounds of the bucket inside
    /// its subgraph (see [`crate::dag::placement`]), narrowed to the override
    /// window `-LAYER_LIMIT..=LAYER_LIMIT`. Buckets outside every chain are
    /// only held to the window. Depending on `options.override_policy` an
    /// out-of-range value is clamped or rejected. Returns the layer that was
    /// stored.
    pub fn set_layer(&mut self, bucket: &BucketId, layer: i64, options: &BoardOptions) -> Result<i64> {
        match self.bucket(bucket.as_str()) {
            None => return reject(BoardError::BucketNotFound(bucket.clone())),
            Some(b) if b.dump => return reject(BoardError::DumpBucket(bucket.clone())),
            Some(_) => {}
        }

        let chains = dependency_chains(self);
        let bounds = match subgraph_of(&chains, bucket) {
            None => {
                debug!(%bucket, layer, "bucket is in no chain; only the override window applies");
                PlacementBounds::default()
            }
            Some(subgraph) => {
                let layering = assign_layers(subgraph.chains(), self, options.layering);
                placement_bounds(subgraph.chains(), &layering)
                    .remove(bucket)
                    .unwrap_or_default()
            }
        }
        .within(-LAYER_LIMIT, LAYER_LIMIT);

        let applied = if bounds.admits(layer) {
            layer
        } else {
            match (options.override_policy, bounds.clamp(layer)) {
                (OverridePolicy::Clamp, Some(clamped)) => {
                    debug!(%bucket, requested = layer, clamped, "layer override clamped");
                    clamped
                }
                _ => {
                    return reject(BoardError::LayerOutOfBounds {
                        bucket: bucket.clone(),
                        requested: layer,
                        min: bounds.min,
                        max: bounds.max,
                    });
                }
            }
        };

        self.transact(|buckets| {
            if let Some(b) = buckets.iter_mut().find(|b| &b.id == bucket) {
                b.layer = Some(applied);
            }
            Ok(())
        })?;
        debug!(%bucket, layer = applied, "layer override set");
        Ok(applied)
    }

    /// Drop every layer override ("restore defaults"). Returns how many
    /// buckets had one.
    pub fn clear_all_layer_overrides(&mut self) -> usize {
        let count = self.buckets.iter().filter(|b| b.layer.is_some()).count();
        if count == 0 {
            return 0;
        }
        let cleared = self.transact(|buckets| {
            for b in buckets.iter_mut() {
                b.layer = None;
            }
            Ok(count)
        });
        debug!(count, "cleared all layer overrides");
        cleared.unwrap_or(0)
    }

    /// Run `op` against a copy of the bucket list and commit it only if `op`
    /// succeeds.
    pub(crate) fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut Vec<Bucket>) -> Result<T>,
    ) -> Result<T> {
        let mut next = self.buckets.clone();
        let out = op(&mut next)?;
        self.buckets = next;
        Ok(out)
    }

    fn index(&self) -> HashMap<&str, &Bucket> {
        self.buckets.iter().map(|b| (b.id.as_str(), b)).collect()
    }
}

/// Log a rejected mutation and hand the error back to the caller.
pub(crate) fn reject<T>(err: BoardError) -> Result<T> {
    warn!(error = %err, "mutation rejected");
    Err(err)
}

fn ensure_acyclic(buckets: &[Bucket]) -> Result<()> {
    // Edge direction: dependency -> dependent.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for bucket in buckets {
        graph.add_node(bucket.id.as_str());
    }
    for bucket in buckets {
        for dep in &bucket.dependencies {
            graph.add_edge(dep.as_str(), bucket.id.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(BoardError::InvalidSnapshot(format!(
            "cycle detected in bucket dependencies involving '{}'",
            cycle.node_id()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(edges: &[(&str, &[&str])]) -> GraphStore {
        let buckets = edges
            .iter()
            .map(|(id, deps)| {
                let mut b = Bucket::with_id(BucketId::new(*id), *id);
                b.dependencies = deps.iter().map(|d| BucketId::new(*d)).collect();
                b
            })
            .collect();
        GraphStore::from_snapshot(Snapshot { buckets }).expect("valid snapshot")
    }

    #[test]
    fn reaches_walks_diamonds_once() {
        let s = store(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B", "C"])]);
        assert!(s.reaches(&"D".into(), &"A".into()));
        assert!(s.reaches(&"A".into(), &"A".into()));
        assert!(!s.reaches(&"A".into(), &"D".into()));
    }

    #[test]
    fn snapshot_with_cycle_is_rejected() {
        let buckets = vec![
            Bucket {
                dependencies: vec!["B".into()],
                ..Bucket::with_id("A".into(), "A")
            },
            Bucket {
                dependencies: vec!["A".into()],
                ..Bucket::with_id("B".into(), "B")
            },
        ];
        let err = GraphStore::from_snapshot(Snapshot { buckets }).unwrap_err();
        assert!(matches!(err, BoardError::InvalidSnapshot(msg) if msg.contains("cycle")));
    }

    #[test]
    fn snapshot_drops_unknown_and_repeated_dependencies() {
        let buckets = vec![
            Bucket::with_id("A".into(), "A"),
            Bucket {
                dependencies: vec!["A".into(), "ghost".into(), "A".into()],
                ..Bucket::with_id("B".into(), "B")
            },
        ];
        let s = GraphStore::from_snapshot(Snapshot { buckets }).expect("valid");
        assert_eq!(s.bucket("B").unwrap().dependencies, vec![BucketId::new("A")]);
    }

    #[test]
    fn failed_transaction_leaves_state_untouched() {
        let mut s = store(&[("A", &[])]);
        let res: Result<()> = s.transact(|buckets| {
            buckets.clear();
            Err(BoardError::InvalidSnapshot("boom".into()))
        });
        assert!(res.is_err());
        assert_eq!(s.buckets().len(), 1);
    }
}

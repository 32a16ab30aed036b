/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Feasibility graph: which targets each pending task may be offloaded to.
//!
//! Task nodes are keyed by [`TaskKey`]; target nodes are implicit in the edge
//! [`Target`]s.  An edge `task → target` exists iff the route latency is
//! within the task's deadline under the *current* vehicle position.
//!
//! Nodes live in one of two sets:
//!
//! * **active**: still pending; rebuilt after every mobility step.
//! * **settled**: committed by the constructor in the current run.  Their
//!   candidate edges are frozen so the local search can consider
//!   alternatives, and they are never rebuilt again.
//!
//! A task with no edge stays an isolated active node; the planning loop
//! classifies it at the end of the run (local execution or unresolved).
//!
//! Iteration order is always by `TaskKey`, so construction is deterministic
//! given a seed.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::entity::{SimContext, Target, TaskKey};
use crate::latency::estimate_latency;
use crate::mobility::find_reachable_rsu;

// ── Types ─────────────────────────────────────────────────────────────────────

/// A feasible `task → target` route weighted by its latency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: Target,
    pub latency_ms: f64,
}

/// Switches that change which edges are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphOptions {
    /// Additionally require the vehicle to stay in the RSU's coverage for at
    /// least the RSU route latency.
    pub enforce_sojourn: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FeasibilityGraph {
    active: BTreeMap<TaskKey, Vec<Edge>>,
    settled: BTreeMap<TaskKey, Vec<Edge>>,
}

impl FeasibilityGraph {
    // ── Construction ──────────────────────────────────────────────────────────

    /// One active node per task of every vehicle, with edges derived from the
    /// current state of `ctx`.
    pub fn build(ctx: &SimContext, options: &GraphOptions) -> Self {
        let mut graph = Self::default();
        for key in ctx.task_keys() {
            let edges = derive_edges(ctx, key, options).unwrap_or_default();
            graph.active.insert(key, edges);
        }
        debug!(
            tasks = graph.task_count(),
            edges = graph.edge_count(),
            "feasibility graph built"
        );
        graph
    }

    /// Drop every active edge and re-derive it from the current state of
    /// `ctx`.  Settled nodes are left untouched.
    ///
    /// A node whose key no longer resolves to a live vehicle/task is left
    /// without edges and reported with a warning.  Returns the number of such
    /// nodes.
    pub fn rebuild(&mut self, ctx: &SimContext, options: &GraphOptions) -> usize {
        let mut stale = 0usize;
        for (key, edges) in self.active.iter_mut() {
            edges.clear();
            match derive_edges(ctx, *key, options) {
                Some(fresh) => *edges = fresh,
                None => {
                    stale += 1;
                    warn!(task = %key, "task node does not resolve to a live vehicle task, skipping");
                }
            }
        }
        debug!(
            tasks = self.task_count(),
            edges = self.edge_count(),
            stale = stale,
            "feasibility graph rebuilt"
        );
        stale
    }

    // ── Mutation ──────────────────────────────────────────────────────────────

    /// Move `key` from the active set to the settled set, keeping its edges.
    ///
    /// Returns `false` if `key` was not active.
    pub fn settle(&mut self, key: TaskKey) -> bool {
        match self.active.remove(&key) {
            Some(edges) => {
                self.settled.insert(key, edges);
                true
            }
            None => false,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Outgoing edges of an active node (empty if unknown or settled).
    pub fn edges(&self, key: TaskKey) -> &[Edge] {
        self.active.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Frozen candidate edges of a settled node.
    pub fn settled_edges(&self, key: TaskKey) -> &[Edge] {
        self.settled.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Active task keys in ascending order.
    pub fn active_keys(&self) -> impl Iterator<Item = TaskKey> + '_ {
        self.active.keys().copied()
    }

    pub fn is_active(&self, key: TaskKey) -> bool {
        self.active.contains_key(&key)
    }

    pub fn is_settled(&self, key: TaskKey) -> bool {
        self.settled.contains_key(&key)
    }

    /// Number of edges over active nodes.
    pub fn edge_count(&self) -> usize {
        self.active.values().map(Vec::len).sum()
    }

    /// `true` while at least one active node has an edge.
    pub fn has_edges(&self) -> bool {
        self.active.values().any(|e| !e.is_empty())
    }

    /// Number of active task nodes.
    pub fn task_count(&self) -> usize {
        self.active.len()
    }

    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }
}

/// Derive the feasible edges of one task.  `None` if `key` does not resolve.
fn derive_edges(ctx: &SimContext, key: TaskKey, options: &GraphOptions) -> Option<Vec<Edge>> {
    let (vu, task) = ctx.task(key)?;

    let coverage = find_reachable_rsu(vu, &ctx.rsus);
    let rsu_gflops = coverage.map(|c| ctx.rsus[c.rsu.index()].compute_gflops);
    let est = estimate_latency(task, vu, &ctx.network, rsu_gflops, ctx.hap.compute_gflops);

    let mut edges = Vec::with_capacity(2);

    if let Some(cov) = coverage {
        let stays_long_enough = !options.enforce_sojourn || cov.sojourn_ms >= est.rsu_ms;
        if est.rsu_ms <= task.deadline_ms && stays_long_enough {
            edges.push(Edge {
                target: Target::Rsu(cov.rsu),
                latency_ms: est.rsu_ms,
            });
        }
    }

    if est.hap_ms <= task.deadline_ms {
        edges.push(Edge {
            target: Target::Hap,
            latency_ms: est.hap_ms,
        });
    }

    Some(edges)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Direction, Hap, RoadsideUnit, RsuId, Task, VehicleUnit};

    /// One RSU at 100 m (radius 20 m, 80 GFLOPS) and a 150 GFLOPS HAP.
    fn ctx(vus: Vec<VehicleUnit>) -> SimContext {
        SimContext {
            road_length_m: 1000.0,
            vus,
            rsus: vec![RoadsideUnit {
                id: 1,
                compute_gflops: 80.0,
                position_m: 100.0,
                coverage_m: 20.0,
                capacity_limit: 10,
                current_load: 0,
            }],
            hap: Hap {
                compute_gflops: 150.0,
                capacity_limit: 5,
                current_load: 0,
            },
            ..Default::default()
        }
    }

    fn vu(position_m: f64, deadlines: &[f64]) -> VehicleUnit {
        VehicleUnit {
            id: 1,
            speed_mps: 6.0,
            compute_gflops: 8.0,
            position_m,
            direction: Direction::Right,
            tasks: deadlines
                .iter()
                .enumerate()
                .map(|(i, &d)| Task {
                    id: i as u32 + 1,
                    size_mb: 1.0,
                    deadline_ms: d,
                })
                .collect(),
        }
    }

    #[test]
    fn covered_vehicle_gets_rsu_and_hap_edges() {
        let c = ctx(vec![vu(100.0, &[10_000.0])]);
        let g = FeasibilityGraph::build(&c, &GraphOptions::default());
        let edges = g.edges(TaskKey::new(0, 0));
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].target, Target::Rsu(RsuId(0)));
        assert_eq!(edges[1].target, Target::Hap);
        assert!(edges[1].latency_ms < edges[0].latency_ms);
    }

    #[test]
    fn uncovered_vehicle_gets_only_hap_edge() {
        let c = ctx(vec![vu(500.0, &[10_000.0])]);
        let g = FeasibilityGraph::build(&c, &GraphOptions::default());
        let edges = g.edges(TaskKey::new(0, 0));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target, Target::Hap);
    }

    #[test]
    fn deadline_filters_slow_routes() {
        // HAP ≈ 54.2 ms, RSU ≈ 100.9 ms.  A 60 ms deadline keeps only HAP;
        // a 10 ms deadline keeps nothing.
        let c = ctx(vec![vu(100.0, &[60.0, 10.0])]);
        let g = FeasibilityGraph::build(&c, &GraphOptions::default());
        assert_eq!(g.edges(TaskKey::new(0, 0)).len(), 1);
        assert!(g.edges(TaskKey::new(0, 1)).is_empty());
        assert!(g.is_active(TaskKey::new(0, 1)), "isolated node must still exist");
        assert_eq!(g.task_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn every_edge_respects_its_deadline() {
        let c = ctx(vec![vu(90.0, &[55.0, 101.0, 5_000.0]), vu(700.0, &[300.0])]);
        let g = FeasibilityGraph::build(&c, &GraphOptions::default());
        for key in g.active_keys() {
            let (_, task) = c.task(key).unwrap();
            for e in g.edges(key) {
                assert!(e.latency_ms <= task.deadline_ms, "{key} → {}", e.target);
            }
        }
    }

    #[test]
    fn sojourn_enforcement_drops_rsu_when_vehicle_leaves_too_soon() {
        // At 119.5 m moving right, 0.5 m remain → ≈ 83 ms in coverage,
        // less than the ≈ 100.9 ms RSU route.
        let c = ctx(vec![vu(119.5, &[10_000.0])]);
        let relaxed = FeasibilityGraph::build(&c, &GraphOptions::default());
        let strict = FeasibilityGraph::build(
            &c,
            &GraphOptions {
                enforce_sojourn: true,
            },
        );
        assert_eq!(relaxed.edges(TaskKey::new(0, 0)).len(), 2);
        assert_eq!(strict.edges(TaskKey::new(0, 0)).len(), 1);
        assert_eq!(strict.edges(TaskKey::new(0, 0))[0].target, Target::Hap);
    }

    #[test]
    fn rebuild_follows_vehicle_out_of_coverage() {
        let mut c = ctx(vec![vu(100.0, &[10_000.0])]);
        let opts = GraphOptions::default();
        let mut g = FeasibilityGraph::build(&c, &opts);
        assert_eq!(g.edge_count(), 2);

        c.vus[0].position_m = 300.0;
        let stale = g.rebuild(&c, &opts);
        assert_eq!(stale, 0);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edges(TaskKey::new(0, 0))[0].target, Target::Hap);
    }

    #[test]
    fn settled_nodes_survive_rebuild_unchanged() {
        let mut c = ctx(vec![vu(100.0, &[10_000.0, 10_000.0])]);
        let opts = GraphOptions::default();
        let mut g = FeasibilityGraph::build(&c, &opts);

        assert!(g.settle(TaskKey::new(0, 0)));
        assert!(!g.settle(TaskKey::new(0, 0)), "second settle is a no-op");

        c.vus[0].position_m = 600.0;
        g.rebuild(&c, &opts);

        assert!(g.is_settled(TaskKey::new(0, 0)));
        assert_eq!(g.settled_edges(TaskKey::new(0, 0)).len(), 2);
        assert!(g.edges(TaskKey::new(0, 0)).is_empty());
        assert_eq!(g.task_count(), 1);
        assert_eq!(g.settled_count(), 1);
    }

    #[test]
    fn rebuild_skips_keys_that_no_longer_resolve() {
        let opts = GraphOptions::default();
        let two = ctx(vec![vu(100.0, &[10_000.0]), vu(500.0, &[10_000.0])]);
        let mut g = FeasibilityGraph::build(&two, &opts);

        let one = ctx(vec![vu(100.0, &[10_000.0])]);
        let stale = g.rebuild(&one, &opts);

        assert_eq!(stale, 1);
        assert!(g.edges(TaskKey::new(1, 0)).is_empty());
        assert_eq!(g.edges(TaskKey::new(0, 0)).len(), 2);
    }

    #[test]
    fn empty_context_has_no_edges() {
        let g = FeasibilityGraph::build(&ctx(vec![]), &GraphOptions::default());
        assert!(!g.has_edges());
        assert_eq!(g.task_count(), 0);
    }
}

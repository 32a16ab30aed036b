/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Mobility-driven offloading planner.
//!
//! [`Planner`] drives one planning run over a [`SimContext`]: it repeatedly
//! builds the feasibility graph, commits tasks with the randomized greedy
//! constructor, improves the cycle's assignment with local search, advances
//! the vehicles by one time step and starts over, until no task can be
//! offloaded any more.
//!
//! ```text
//!   ┌──────────► Building ──(no edges)──────────────► Done
//!   │               │
//!   │               ▼
//!   │          Constructing ──(nothing committed)───► Done
//!   │               │
//!   │               ▼
//!   │           Improving
//!   │               │
//!   │               ▼
//!   └─────────── Advancing
//! ```
//!
//! # Capacity model
//! RSU and HAP capacity is *per cycle*: a target's slots are taken by the
//! tasks committed in the current cycle and returned when the cycle's time
//! step has elapsed.  Within a cycle every slot change happens together with
//! the assignment change it belongs to, so `current_load` always equals the
//! number of active placements on that target.
//!
//! # Termination
//! Every cycle that reaches `Advancing` has settled at least one task, and a
//! settled task never returns to the graph.  The loop therefore stops within
//! `task_count + 1` cycles; that bound is also enforced explicitly.
//!
//! # Example
//! ```rust,ignore
//! let mut planner = Planner::new(PlannerConfig::default(), PlanRng::new(42));
//! let outcome = planner.run(&mut ctx);
//! println!("{} ms  {}", outcome.total_latency_ms, outcome.decisions);
//! ```

pub mod construct;
pub mod error;
pub mod improve;

pub use construct::{candidate_width, construct, Construction};
pub use error::{ConfigError, PlacementReason};
pub use improve::{improve, Improvement, MAX_IMPROVE_PASSES};

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::decision::{DecisionVector, OffloadClass};
use crate::entity::{SimContext, Target, TaskKey};
use crate::graph::{FeasibilityGraph, GraphOptions};
use crate::mobility::advance_positions;
use crate::rng::RandomSource;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Simulated time advanced per planning cycle, in milliseconds.
pub const REFERENCE_STEP_MS: f64 = 504.5;

/// Default greediness parameter.
pub const DEFAULT_ALPHA: f64 = 0.498;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Where a committed task runs and at what latency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub target: Target,
    pub latency_ms: f64,
}

/// Tasks committed in the active cycle.
///
/// Local search visits tasks in key order.
pub type Assignment = BTreeMap<TaskKey, Placement>;

/// Planner knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Greediness / randomization in `[0, 1]`.
    pub alpha: f64,

    /// Simulated time per cycle in milliseconds.
    pub step_ms: f64,

    /// Require RSU sojourn time ≥ RSU route latency for RSU edges.
    pub enforce_sojourn: bool,

    /// Run local search after construction.  Off gives the
    /// construction-only baseline.
    pub local_search: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            step_ms: REFERENCE_STEP_MS,
            enforce_sojourn: false,
            local_search: true,
        }
    }
}

impl PlannerConfig {
    fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            enforce_sojourn: self.enforce_sojourn,
        }
    }
}

/// States of the planning loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanPhase {
    Building,
    Constructing,
    Improving,
    Advancing,
    Done,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// No active task has a feasible edge left.
    Exhausted,

    /// Edges remain but construction could not commit any task.
    Deadlock,

    /// The defensive cycle bound was reached.
    CycleLimit,
}

/// Summary of one completed cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// 0-based cycle index.
    pub cycle: usize,

    /// Tasks committed by construction.
    pub committed: usize,

    /// Relocations made by local search.
    pub relocations: usize,

    /// Worst latency among the cycle's placements.
    pub max_latency_ms: f64,
}

/// Result of one planning run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Sum over cycles of each cycle's worst placement latency.
    pub total_latency_ms: f64,

    /// Class of every task in the context.
    pub decisions: DecisionVector,

    pub cycles: Vec<CycleReport>,

    pub termination: Termination,
}

impl PlanOutcome {
    /// Tasks no tier could serve within the deadline.
    pub fn unresolved(&self) -> Vec<TaskKey> {
        self.decisions.unresolved()
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

/// Runs the planning loop with an injected random source.
///
/// The planner holds no per-run state other than its RNG: the graph and the
/// assignments are local to [`run`](Self::run), the entities belong to the
/// caller's [`SimContext`].
pub struct Planner<R: RandomSource> {
    config: PlannerConfig,
    rng: R,
}

impl<R: RandomSource> Planner<R> {
    pub fn new(config: PlannerConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Plan every task in `ctx` until no further offloading is possible.
    ///
    /// Moves the vehicles in `ctx`; capacity counters are back to their
    /// starting values when the call returns.
    pub fn run(&mut self, ctx: &mut SimContext) -> PlanOutcome {
        let options = self.config.graph_options();
        let cycle_limit = ctx.task_count() + 1;
        let step_s = self.config.step_ms / 1000.0;

        info!(
            alpha        = self.config.alpha,
            step_ms      = self.config.step_ms,
            local_search = self.config.local_search,
            vu_count   = ctx.vus.len(),
            rsu_count  = ctx.rsus.len(),
            task_count = ctx.task_count(),
            "=== Planner::run() ==="
        );

        let mut graph = FeasibilityGraph::default();
        let mut built = false;
        let mut assignment = Assignment::new();
        let mut decisions = DecisionVector::new();
        let mut cycles: Vec<CycleReport> = Vec::new();
        let mut total_latency_ms = 0.0;
        let mut termination = Termination::Exhausted;
        let mut committed = 0usize;
        let mut relocations = 0usize;

        let mut phase = PlanPhase::Building;
        while phase != PlanPhase::Done {
            debug!(phase = ?phase, cycle = cycles.len(), "transition");

            phase = match phase {
                // ── Building ──────────────────────────────────────────────────
                PlanPhase::Building => {
                    if built {
                        graph.rebuild(ctx, &options);
                    } else {
                        graph = FeasibilityGraph::build(ctx, &options);
                        built = true;
                    }

                    if cycles.len() >= cycle_limit {
                        warn!(cycles = cycles.len(), "cycle limit reached, stopping");
                        termination = Termination::CycleLimit;
                        PlanPhase::Done
                    } else if graph.has_edges() {
                        PlanPhase::Constructing
                    } else {
                        termination = Termination::Exhausted;
                        PlanPhase::Done
                    }
                }

                // ── Constructing ──────────────────────────────────────────────
                PlanPhase::Constructing => {
                    let construction =
                        construct(&mut graph, ctx, self.config.alpha, &mut self.rng);
                    if construction.any_assigned {
                        committed = construction.assignment.len();
                        assignment = construction.assignment;
                        PlanPhase::Improving
                    } else {
                        info!(
                            pending = graph.task_count(),
                            "no task could be committed: capacity deadlock"
                        );
                        termination = Termination::Deadlock;
                        PlanPhase::Done
                    }
                }

                // ── Improving ─────────────────────────────────────────────────
                PlanPhase::Improving => {
                    if self.config.local_search {
                        let imp = improve(&mut assignment, &graph, ctx);
                        relocations = imp.relocations;
                        decisions.merge(imp.decisions);
                    } else {
                        relocations = 0;
                        for (key, placement) in &assignment {
                            decisions.insert(*key, OffloadClass::from(placement.target));
                        }
                    }
                    PlanPhase::Advancing
                }

                // ── Advancing ─────────────────────────────────────────────────
                PlanPhase::Advancing => {
                    advance_positions(&mut ctx.vus, step_s, ctx.road_length_m);

                    let max_latency_ms = assignment
                        .values()
                        .map(|p| p.latency_ms)
                        .fold(0.0, f64::max);
                    total_latency_ms += max_latency_ms;

                    let report = CycleReport {
                        cycle: cycles.len(),
                        committed,
                        relocations,
                        max_latency_ms,
                    };
                    info!(
                        cycle          = report.cycle,
                        committed      = report.committed,
                        relocations    = report.relocations,
                        max_latency_ms = report.max_latency_ms,
                        "cycle complete"
                    );
                    cycles.push(report);

                    // The step has elapsed: this cycle's tasks free their slots.
                    for placement in assignment.values() {
                        ctx.release(placement.target);
                    }
                    assignment.clear();

                    PlanPhase::Building
                }

                PlanPhase::Done => PlanPhase::Done,
            };
        }

        let fallback = decisions.classify_remaining(ctx);
        let outcome = PlanOutcome {
            total_latency_ms,
            decisions,
            cycles,
            termination,
        };

        let counts = outcome.decisions.counts();
        info!(
            termination      = ?outcome.termination,
            cycles           = outcome.cycles.len(),
            total_latency_ms = outcome.total_latency_ms,
            rsu              = counts.rsu,
            hap              = counts.hap,
            local            = counts.local,
            unresolved       = counts.unresolved,
            fallback         = fallback,
            "=== Planning complete ==="
        );

        outcome
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! First-improvement local search over the tasks committed in one cycle.
//!
//! Each pass walks the assignment in key order.  For a task, the first frozen
//! candidate edge with strictly lower latency whose target has spare capacity
//! wins: the old slot is released, the new one acquired.  Passes repeat until
//! one makes no relocation.
//!
//! Every relocation strictly lowers one task's latency and there are finitely
//! many `(task, target)` pairs, so the loop terminates; the pass cap only
//! guards against a graph changing underneath it.

use tracing::{debug, warn};

use crate::decision::{DecisionVector, OffloadClass};
use crate::entity::SimContext;
use crate::graph::FeasibilityGraph;

use super::Assignment;

/// Upper bound on local-search passes per call.
pub const MAX_IMPROVE_PASSES: usize = 1_000;

/// Result of one local-search call.
#[derive(Debug, Clone, Default)]
pub struct Improvement {
    /// Offload class of every task in the assignment after the search.
    pub decisions: DecisionVector,

    /// Number of relocations performed.
    pub relocations: usize,

    /// Passes run, including the final pass that found nothing.
    pub passes: usize,
}

/// Improve `assignment` in place using the settled edges in `graph`.
pub fn improve(
    assignment: &mut Assignment,
    graph: &FeasibilityGraph,
    ctx: &mut SimContext,
) -> Improvement {
    let mut decisions = DecisionVector::new();
    for (key, placement) in assignment.iter() {
        decisions.insert(*key, OffloadClass::from(placement.target));
    }

    let mut relocations = 0usize;
    let mut passes = 0usize;

    loop {
        if passes == MAX_IMPROVE_PASSES {
            warn!(
                passes = passes,
                relocations = relocations,
                "local search hit the pass limit, keeping current assignment"
            );
            break;
        }
        passes += 1;

        let mut improved = false;

        for (key, placement) in assignment.iter_mut() {
            let better = graph.settled_edges(*key).iter().find(|e| {
                e.target != placement.target
                    && e.latency_ms < placement.latency_ms
                    && ctx.has_spare(e.target)
            });

            let Some(edge) = better.copied() else {
                continue;
            };

            ctx.release(placement.target);
            let acquired = ctx.acquire(edge.target);
            debug_assert!(acquired, "spare capacity was checked before relocating");

            debug!(
                task = %key,
                from = %placement.target,
                to   = %edge.target,
                before_ms = placement.latency_ms,
                after_ms  = edge.latency_ms,
                "relocated"
            );

            placement.target = edge.target;
            placement.latency_ms = edge.latency_ms;
            decisions.insert(*key, OffloadClass::from(edge.target));
            relocations += 1;
            improved = true;
        }

        if !improved {
            break;
        }
    }

    debug_assert!(ctx.capacity_respected());

    Improvement {
        decisions,
        relocations,
        passes,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

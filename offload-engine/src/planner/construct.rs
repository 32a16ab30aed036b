/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Randomized greedy construction (GRASP restricted candidate list).
//!
//! For every active task with at least one edge, candidates are sorted by
//! latency and one of the best `max(1, ⌊alpha · n⌋)` is drawn uniformly.
//! `alpha → 0` approaches pure greedy, `alpha → 1` approaches uniform choice
//! among all feasible targets.

use tracing::debug;

use crate::entity::SimContext;
use crate::graph::{Edge, FeasibilityGraph};
use crate::rng::RandomSource;

use super::error::PlacementReason;
use super::{Assignment, Placement};

/// Result of one construction pass.
#[derive(Debug, Clone, Default)]
pub struct Construction {
    /// Tasks committed in this pass.
    pub assignment: Assignment,

    /// `false` when nothing could be committed (capacity deadlock or no edges).
    pub any_assigned: bool,
}

/// Size of the restricted candidate list for `n` candidates.
///
/// Always in `1..=n` for `n ≥ 1`.
pub fn candidate_width(alpha: f64, n: usize) -> usize {
    let alpha = if alpha.is_nan() {
        0.0
    } else {
        alpha.clamp(0.0, 1.0)
    };
    ((alpha * n as f64).floor() as usize).clamp(1, n.max(1))
}

/// Commit as many active tasks of `graph` as capacity allows.
///
/// Committed tasks take a slot on their target in `ctx` and are settled in
/// the graph.  Tasks whose sampled target is full stay active.
pub fn construct<R: RandomSource + ?Sized>(
    graph: &mut FeasibilityGraph,
    ctx: &mut SimContext,
    alpha: f64,
    rng: &mut R,
) -> Construction {
    let mut assignment = Assignment::new();
    let keys: Vec<_> = graph.active_keys().collect();

    for key in keys {
        let mut candidates: Vec<Edge> = graph.edges(key).to_vec();
        if candidates.is_empty() {
            debug!(task = %key, reason = %PlacementReason::NoCandidates, "pending");
            continue;
        }

        // Stable: equal latencies keep derivation order (RSU before HAP).
        candidates.sort_by(|a, b| a.latency_ms.total_cmp(&b.latency_ms));

        let width = candidate_width(alpha, candidates.len());
        let pick = rng.pick_index(width).min(width - 1);
        let chosen = candidates[pick];

        if ctx.acquire(chosen.target) {
            assignment.insert(
                key,
                Placement {
                    target: chosen.target,
                    latency_ms: chosen.latency_ms,
                },
            );
            graph.settle(key);
            debug!(
                task       = %key,
                target     = %chosen.target,
                latency_ms = chosen.latency_ms,
                rcl_width  = width,
                "committed"
            );
        } else {
            let (load, limit) = ctx.load(chosen.target).unwrap_or((0, 0));
            let reason = PlacementReason::TargetFull {
                target: chosen.target,
                load,
                limit,
            };
            debug!(task = %key, reason = %reason, "pending");
        }
    }

    debug_assert!(ctx.capacity_respected());

    Construction {
        any_assigned: !assignment.is_empty(),
        assignment,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

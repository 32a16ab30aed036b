/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured diagnostics and error types for the offloading planner.
//!
//! Two types model the two layers:
//!
//! * [`PlacementReason`]: why one task was not committed in a cycle.  This is
//!   never an error: the task stays pending and is logged at `debug!`.
//! * [`ConfigError`]: invalid scenario or sweep parameters, detected before a
//!   run starts.  A planning run itself has no failure mode.

use thiserror::Error;

use crate::entity::Target;

// ── Placement diagnostics ─────────────────────────────────────────────────────

/// Why a task stayed pending after a construction pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementReason {
    /// The task has no feasible edge under the current vehicle position.
    NoCandidates,

    /// The sampled target had no spare capacity.
    TargetFull { target: Target, load: u32, limit: u32 },
}

impl std::fmt::Display for PlacementReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementReason::NoCandidates => {
                write!(f, "no target meets the deadline from the current position")
            }

            PlacementReason::TargetFull {
                target,
                load,
                limit,
            } => write!(f, "{} is at capacity ({}/{})", target, load, limit),
        }
    }
}

// ── Configuration errors ──────────────────────────────────────────────────────

/// Invalid parameters rejected by `ScenarioConfig::validate` or
/// `SweepConfig::validate`.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Greediness parameter outside `[0, 1]` (or NaN).
    #[error("alpha must be within [0, 1], got {0}")]
    AlphaOutOfRange(f64),

    /// A physical quantity that must be strictly positive is not.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// A sampling range has `min > max` or a negative bound.
    #[error("{field} range [{min}, {max}] is invalid")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    /// A sweep with no alpha values or zero runs per alpha.
    #[error("sweep needs at least one alpha value and one run per alpha")]
    EmptySweep,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Monte-Carlo sweep over the greediness parameter.
//!
//! For every alpha the planner is run `runs_per_alpha` times from the same
//! initial scenario.  Trial `(alpha_index, run)` draws from its own RNG stream
//! `alpha_index · runs_per_alpha + run`, so the report does not depend on
//! execution order.  Per alpha the lowest total latency wins; ties keep the
//! lowest run index.
//!
//! With the `parallel` feature the runs of one alpha execute on the rayon
//! pool, each on its own clone of the initial context.  Without it, one
//! context is reused and reset from a snapshot between runs.

use tracing::{debug, info};

use crate::config::check_alpha;
use crate::decision::DecisionVector;
use crate::entity::SimContext;
use crate::planner::{ConfigError, PlanOutcome, Planner, PlannerConfig};
use crate::rng::PlanRng;

/// Default number of trials per alpha.
pub const DEFAULT_RUNS_PER_ALPHA: usize = 100;

/// Sweep parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Alpha values, evaluated in this order.
    pub alphas: Vec<f64>,

    pub runs_per_alpha: usize,

    /// Root seed for every trial stream.
    pub seed: u64,

    /// Planner template; `alpha` is overwritten per sweep point.
    pub planner: PlannerConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            alphas: default_alphas(),
            runs_per_alpha: DEFAULT_RUNS_PER_ALPHA,
            seed: 42,
            planner: PlannerConfig::default(),
        }
    }
}

/// `0.1, 0.2, …, 0.9`.
pub fn default_alphas() -> Vec<f64> {
    (1..=9).map(|i| 0.1 * i as f64).collect()
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alphas.is_empty() || self.runs_per_alpha == 0 {
            return Err(ConfigError::EmptySweep);
        }
        for &alpha in &self.alphas {
            check_alpha(alpha)?;
        }
        if !(self.planner.step_ms > 0.0 && self.planner.step_ms.is_finite()) {
            return Err(ConfigError::NonPositive {
                field: "planner.step_ms",
                value: self.planner.step_ms,
            });
        }
        Ok(())
    }
}

/// Best and mean result for one alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaResult {
    pub alpha: f64,
    pub best_latency_ms: f64,

    /// Run index that produced `best_latency_ms`.
    pub best_run: usize,

    /// Decisions of the best run.
    pub decisions: DecisionVector,

    pub mean_latency_ms: f64,
}

/// One [`AlphaResult`] per configured alpha, in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub results: Vec<AlphaResult>,
}

impl SweepReport {
    /// Alpha with the lowest best latency; ties keep the earlier alpha.
    pub fn best(&self) -> Option<&AlphaResult> {
        self.results.iter().reduce(|best, r| {
            if r.best_latency_ms < best.best_latency_ms {
                r
            } else {
                best
            }
        })
    }
}

/// Run the sweep described by `config` starting from `initial`.
///
/// `initial` is never modified.
pub fn run_sweep(initial: &SimContext, config: &SweepConfig) -> Result<SweepReport, ConfigError> {
    config.validate()?;

    info!(
        alphas = config.alphas.len(),
        runs   = config.runs_per_alpha,
        seed   = config.seed,
        tasks  = initial.task_count(),
        "=== Alpha sweep ==="
    );

    let mut results = Vec::with_capacity(config.alphas.len());
    for (alpha_idx, &alpha) in config.alphas.iter().enumerate() {
        let planner = PlannerConfig {
            alpha,
            ..config.planner
        };
        let first_stream = (alpha_idx * config.runs_per_alpha) as u64;

        let outcomes = run_trials(initial, planner, config, first_stream);
        let result = reduce(alpha, outcomes);

        info!(
            alpha           = result.alpha,
            best_latency_ms = result.best_latency_ms,
            best_run        = result.best_run,
            mean_latency_ms = result.mean_latency_ms,
            "alpha evaluated"
        );
        results.push(result);
    }

    let report = SweepReport { results };
    if let Some(best) = report.best() {
        info!(
            alpha           = best.alpha,
            best_latency_ms = best.best_latency_ms,
            "=== Sweep complete ==="
        );
    }
    Ok(report)
}

/// Run one trial on `ctx` with RNG stream `stream`.
pub fn run_trial(ctx: &mut SimContext, planner: PlannerConfig, seed: u64, stream: u64) -> PlanOutcome {
    Planner::new(planner, PlanRng::for_stream(seed, stream)).run(ctx)
}

#[cfg(not(feature = "parallel"))]
fn run_trials(
    initial: &SimContext,
    planner: PlannerConfig,
    config: &SweepConfig,
    first_stream: u64,
) -> Vec<PlanOutcome> {
    let mut ctx = initial.clone();
    let snapshot = ctx.snapshot();

    (0..config.runs_per_alpha)
        .map(|run| {
            ctx.reset_to(&snapshot);
            run_trial(&mut ctx, planner, config.seed, first_stream + run as u64)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn run_trials(
    initial: &SimContext,
    planner: PlannerConfig,
    config: &SweepConfig,
    first_stream: u64,
) -> Vec<PlanOutcome> {
    use rayon::prelude::*;

    // `collect` on an indexed parallel iterator keeps run order.
    (0..config.runs_per_alpha)
        .into_par_iter()
        .map(|run| {
            let mut ctx = initial.clone();
            run_trial(&mut ctx, planner, config.seed, first_stream + run as u64)
        })
        .collect()
}

fn reduce(alpha: f64, outcomes: Vec<PlanOutcome>) -> AlphaResult {
    let runs = outcomes.len().max(1) as f64;
    let mean_latency_ms = outcomes.iter().map(|o| o.total_latency_ms).sum::<f64>() / runs;

    let mut best: Option<(usize, PlanOutcome)> = None;
    for (run, outcome) in outcomes.into_iter().enumerate() {
        debug!(alpha, run, total_latency_ms = outcome.total_latency_ms, "trial");
        let better = match &best {
            Some((_, b)) => outcome.total_latency_ms < b.total_latency_ms,
            None => true,
        };
        if better {
            best = Some((run, outcome));
        }
    }

    match best {
        Some((best_run, outcome)) => AlphaResult {
            alpha,
            best_latency_ms: outcome.total_latency_ms,
            best_run,
            decisions: outcome.decisions,
            mean_latency_ms,
        },
        None => AlphaResult {
            alpha,
            best_latency_ms: f64::INFINITY,
            best_run: 0,
            decisions: DecisionVector::new(),
            mean_latency_ms,
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Seeded generation of a [`SimContext`] from a [`ScenarioConfig`].
//!
//! * Vehicles are placed uniformly on `[0, road_length_m]` and drive left or
//!   right with equal probability.
//! * RSU `i` of `n` sits at `(i + 1) · road_length_m / (n + 1)`.
//! * Task size and deadline are drawn uniformly from their configured ranges.
//!
//! All capacity counters start at zero.

use tracing::{debug, info};

use crate::config::{SampleRange, ScenarioConfig};
use crate::entity::{Direction, Hap, RoadsideUnit, SimContext, Task, VehicleUnit};
use crate::rng::PlanRng;

/// Build the scenario described by `config`, drawing from `rng`.
pub fn generate(config: &ScenarioConfig, rng: &mut PlanRng) -> SimContext {
    let road = config.road_length_m;

    let vus: Vec<VehicleUnit> = (0..config.vu.count)
        .map(|v| {
            let position_m = rng.gen_range(0.0..=road);
            let direction = if rng.gen_bool(0.5) {
                Direction::Right
            } else {
                Direction::Left
            };
            let tasks = (0..config.vu.tasks_per_vu)
                .map(|t| Task {
                    id: t as u32 + 1,
                    size_mb: sample(rng, config.vu.task_size_mb),
                    deadline_ms: sample(rng, config.vu.deadline_ms),
                })
                .collect();

            VehicleUnit {
                id: v as u32 + 1,
                speed_mps: config.vu.speed_mps,
                compute_gflops: config.vu.compute_gflops,
                position_m,
                direction,
                tasks,
            }
        })
        .collect();

    let n_rsu = config.rsu.count;
    let rsus: Vec<RoadsideUnit> = (0..n_rsu)
        .map(|i| RoadsideUnit {
            id: i as u32 + 1,
            compute_gflops: config.rsu.compute_gflops,
            position_m: (i as f64 + 1.0) * road / (n_rsu as f64 + 1.0),
            coverage_m: config.rsu.coverage_m,
            capacity_limit: config.rsu.capacity,
            current_load: 0,
        })
        .collect();

    for vu in &vus {
        debug!(
            vu         = vu.id,
            position_m = vu.position_m,
            direction  = ?vu.direction,
            tasks      = vu.tasks.len(),
            "vehicle placed"
        );
    }

    let ctx = SimContext {
        road_length_m: road,
        network: config.network,
        vus,
        rsus,
        hap: Hap {
            compute_gflops: config.hap.compute_gflops,
            capacity_limit: config.hap.capacity,
            current_load: 0,
        },
    };

    info!(
        vus   = ctx.vus.len(),
        rsus  = ctx.rsus.len(),
        tasks = ctx.task_count(),
        "scenario generated"
    );

    ctx
}

/// Build the scenario with an RNG seeded from `config.seed`.
pub fn from_config(config: &ScenarioConfig) -> SimContext {
    generate(config, &mut PlanRng::new(config.seed))
}

fn sample(rng: &mut PlanRng, range: SampleRange) -> f64 {
    if range.min >= range.max {
        range.min
    } else {
        rng.gen_range(range.min..=range.max)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

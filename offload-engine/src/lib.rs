/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Offload engine – mobility-aware task offloading for vehicles, roadside
//! units and a high-altitude platform.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── entity      – tasks, vehicles, RSUs, HAP, SimContext (capacity ledger)
//! ├── latency     – per-route latency model
//! ├── mobility    – RSU coverage, sojourn time, position advance
//! ├── graph/      – task → target feasibility graph
//! ├── rng         – injectable seeded random source
//! ├── planner/    – GRASP construction, local search, planning loop
//! ├── decision    – per-task offload class and code string
//! ├── config/     – YAML scenario configuration
//! ├── scenario    – seeded scenario generation
//! └── sweep       – Monte-Carlo alpha sweep
//! ```

pub mod config;
pub mod decision;
pub mod entity;
pub mod graph;
pub mod latency;
pub mod mobility;
pub mod planner;
pub mod rng;
pub mod scenario;
pub mod sweep;

pub use config::ScenarioConfig;
pub use decision::{DecisionVector, OffloadClass};
pub use entity::{SimContext, Target, TaskKey};
pub use planner::{PlanOutcome, Planner, PlannerConfig, Termination};
pub use rng::{PlanRng, RandomSource};
pub use sweep::{run_sweep, SweepConfig, SweepReport};

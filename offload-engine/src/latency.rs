/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-route latency estimates.
//!
//! All results are in milliseconds.  For a task of `b` bits:
//!
//! | Term | Formula |
//! |---|---|
//! | uplink | `b / (uplink_gbps · 10⁹) · 1000` |
//! | downlink | `b / (downlink_factor · downlink_gbps · 10⁹) · 1000` |
//! | processing on `g` GFLOPS | `cycles_per_bit · b / (g · 10⁹) · 1000` |
//! | local | processing on the vehicle, no transmission |
//! | RSU / HAP | uplink + processing on the target + downlink |
//!
//! The downlink term runs at its own effective rate
//! (`downlink_factor × downlink_gbps`), distinct from the uplink rate.

use serde::Deserialize;

use crate::entity::{Task, VehicleUnit};

/// Reference uplink bandwidth in Gbps.
pub const DEFAULT_UPLINK_GBPS: f64 = 10.0;

/// Reference downlink bandwidth in Gbps.
pub const DEFAULT_DOWNLINK_GBPS: f64 = 20.0;

/// Multiplier applied to the downlink bandwidth for result delivery.
pub const DEFAULT_DOWNLINK_FACTOR: f64 = 5.0;

/// Floating-point operations needed per input bit.
pub const DEFAULT_CYCLES_PER_BIT: f64 = 1000.0;

// ── NetworkParams ─────────────────────────────────────────────────────────────

/// Fixed link and workload parameters shared by every route.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkParams {
    pub uplink_gbps: f64,
    pub downlink_gbps: f64,
    pub downlink_factor: f64,
    pub cycles_per_bit: f64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            uplink_gbps: DEFAULT_UPLINK_GBPS,
            downlink_gbps: DEFAULT_DOWNLINK_GBPS,
            downlink_factor: DEFAULT_DOWNLINK_FACTOR,
            cycles_per_bit: DEFAULT_CYCLES_PER_BIT,
        }
    }
}

impl NetworkParams {
    pub fn uplink_ms(&self, task: &Task) -> f64 {
        task.bits() / (self.uplink_gbps * 1e9) * 1000.0
    }

    pub fn downlink_ms(&self, task: &Task) -> f64 {
        task.bits() / (self.downlink_factor * self.downlink_gbps * 1e9) * 1000.0
    }

    /// Processing time on a node with `gflops` throughput.
    ///
    /// A non-positive throughput yields `f64::INFINITY` (the node can never
    /// finish), except for an empty task, which always costs nothing.
    pub fn processing_ms(&self, task: &Task, gflops: f64) -> f64 {
        let work = self.cycles_per_bit * task.bits();
        if work == 0.0 {
            return 0.0;
        }
        if gflops <= 0.0 {
            return f64::INFINITY;
        }
        work / (gflops * 1e9) * 1000.0
    }

    /// Uplink + processing on `gflops` + downlink.
    pub fn offload_ms(&self, task: &Task, gflops: f64) -> f64 {
        self.uplink_ms(task) + self.processing_ms(task, gflops) + self.downlink_ms(task)
    }

    /// Execution on the vehicle itself.
    pub fn local_ms(&self, task: &Task, vu: &VehicleUnit) -> f64 {
        self.processing_ms(task, vu.compute_gflops)
    }
}

// ── LatencyEstimate ───────────────────────────────────────────────────────────

/// Latency of one task on each tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyEstimate {
    pub local_ms: f64,

    /// `f64::INFINITY` when no RSU is reachable.
    pub rsu_ms: f64,

    pub hap_ms: f64,
}

/// Estimate the latency of `task` issued by `vu` on every tier.
///
/// `rsu_gflops` is the compute capacity of the RSU the vehicle can currently
/// reach, or `None` if it is outside every RSU's coverage.
pub fn estimate_latency(
    task: &Task,
    vu: &VehicleUnit,
    network: &NetworkParams,
    rsu_gflops: Option<f64>,
    hap_gflops: f64,
) -> LatencyEstimate {
    LatencyEstimate {
        local_ms: network.local_ms(task, vu),
        rsu_ms: rsu_gflops
            .map(|g| network.offload_ms(task, g))
            .unwrap_or(f64::INFINITY),
        hap_ms: network.offload_ms(task, hap_gflops),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn one_mb() -> Task {
        Task {
            id: 1,
            size_mb: 1.0,
            deadline_ms: 10_000.0,
        }
    }

    fn vu(gflops: f64) -> VehicleUnit {
        VehicleUnit {
            compute_gflops: gflops,
            ..Default::default()
        }
    }

    #[test]
    fn reference_one_megabyte_task() {
        // 8e6 bits:
        //   uplink   = 8e6 / 10e9  · 1000 = 0.8 ms
        //   downlink = 8e6 / 100e9 · 1000 = 0.08 ms
        //   RSU proc = 8e9 / 80e9  · 1000 = 100 ms
        //   HAP proc = 8e9 / 150e9 · 1000 = 53.333… ms
        //   local    = 8e9 / 8e9   · 1000 = 1000 ms
        let net = NetworkParams::default();
        let est = estimate_latency(&one_mb(), &vu(8.0), &net, Some(80.0), 150.0);

        assert!(approx(net.uplink_ms(&one_mb()), 0.8));
        assert!(approx(net.downlink_ms(&one_mb()), 0.08));
        assert!(approx(est.local_ms, 1000.0));
        assert!(approx(est.rsu_ms, 100.88));
        assert!(approx(est.hap_ms, 0.88 + 8000.0 / 150.0));
    }

    #[test]
    fn downlink_is_faster_than_uplink_by_configured_ratio() {
        let net = NetworkParams::default();
        let t = one_mb();
        let ratio = net.uplink_ms(&t) / net.downlink_ms(&t);
        assert!(approx(ratio, 10.0), "expected 10x, got {ratio}");
    }

    #[test]
    fn zero_size_task_costs_nothing() {
        let net = NetworkParams::default();
        let empty = Task::default();
        let est = estimate_latency(&empty, &vu(0.0), &net, Some(80.0), 150.0);
        assert_eq!(est.local_ms, 0.0);
        assert_eq!(est.rsu_ms, 0.0);
        assert_eq!(est.hap_ms, 0.0);
    }

    #[test]
    fn unreachable_rsu_is_infinite() {
        let net = NetworkParams::default();
        let est = estimate_latency(&one_mb(), &vu(8.0), &net, None, 150.0);
        assert!(est.rsu_ms.is_infinite());
        assert!(est.hap_ms.is_finite());
    }

    #[test]
    fn zero_throughput_never_finishes() {
        let net = NetworkParams::default();
        assert!(net.processing_ms(&one_mb(), 0.0).is_infinite());
    }
}

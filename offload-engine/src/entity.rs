/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core entity data structures for one planning run.
//!
//! ```text
//! ScenarioConfig ──(scenario)──►  SimContext  ──(planner)──►  PlanOutcome
//!                                  ↑ vus / rsus / hap              ↑ DecisionVector
//!                                  mutable working state           per-task offload class
//! ```
//!
//! # Ownership model
//! [`SimContext`] is the single owner of every entity in a run.  Components
//! borrow it (`&SimContext` to read, `&mut SimContext` to move vehicles or
//! touch capacity counters); there is no global state.  Only two things ever
//! change during a run:
//!
//! * `VehicleUnit::position_m`, advanced by the mobility model.
//! * `current_load` on RSUs and the HAP, changed by the constructor and the
//!   local search through [`SimContext::acquire`] / [`SimContext::release`].

use std::fmt;

use crate::latency::NetworkParams;

// ── Identifiers ───────────────────────────────────────────────────────────────

/// Index of a roadside unit in [`SimContext::rsus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RsuId(pub usize);

impl RsuId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RsuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RSU{}", self.0 + 1)
    }
}

/// Typed identity of one task instance: `(vu index, task index)`.
///
/// Derived `Ord` sorts by VU first, then by task, which is exactly the
/// serialization order of the decision vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskKey {
    pub vu: usize,
    pub task: usize,
}

impl TaskKey {
    pub fn new(vu: usize, task: usize) -> Self {
        Self { vu, task }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VU{}:T{}", self.vu + 1, self.task + 1)
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// Direction of travel along the road.
///
/// The road is one-dimensional: `Right` means increasing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// `+1.0` for `Right`, `-1.0` for `Left`.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// A pending computation task owned by a [`VehicleUnit`].
///
/// Immutable once created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    /// 1-based label within the owning VU.
    pub id: u32,

    /// Input data volume in megabytes.
    pub size_mb: f64,

    /// Maximum acceptable end-to-end latency in milliseconds.
    pub deadline_ms: f64,
}

impl Task {
    /// Data volume in bits (`size_mb × 8 × 10⁶`).
    pub fn bits(&self) -> f64 {
        self.size_mb * 8.0 * 1e6
    }
}

// ── VehicleUnit ───────────────────────────────────────────────────────────────

/// A mobile, compute-constrained vehicle that generates tasks.
#[derive(Debug, Clone, Default)]
pub struct VehicleUnit {
    pub id: u32,

    /// Speed in metres per second.  Fixed for the run.
    pub speed_mps: f64,

    /// Local compute throughput in GFLOPS.
    pub compute_gflops: f64,

    /// Position along the road in metres, `0 ≤ position_m ≤ road_length_m`.
    pub position_m: f64,

    pub direction: Direction,

    /// Tasks in submission order; a [`TaskKey::task`] indexes into this list.
    pub tasks: Vec<Task>,
}

// ── RoadsideUnit ──────────────────────────────────────────────────────────────

/// A fixed edge-compute node with bounded coverage and per-cycle capacity.
#[derive(Debug, Clone, Default)]
pub struct RoadsideUnit {
    pub id: u32,
    pub compute_gflops: f64,
    pub position_m: f64,

    /// Coverage radius in metres around `position_m`.
    pub coverage_m: f64,

    /// Maximum number of tasks served concurrently.
    pub capacity_limit: u32,

    /// Tasks currently committed here.  Never exceeds `capacity_limit`.
    pub current_load: u32,
}

impl RoadsideUnit {
    /// `true` if one more task fits.
    pub fn has_spare(&self) -> bool {
        self.current_load < self.capacity_limit
    }
}

// ── Hap ───────────────────────────────────────────────────────────────────────

/// High-altitude platform: covers the whole road, bounded capacity.
#[derive(Debug, Clone, Default)]
pub struct Hap {
    pub compute_gflops: f64,
    pub capacity_limit: u32,
    pub current_load: u32,
}

impl Hap {
    pub fn has_spare(&self) -> bool {
        self.current_load < self.capacity_limit
    }
}

// ── Target ────────────────────────────────────────────────────────────────────

/// An offloading destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Rsu(RsuId),
    Hap,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Rsu(id) => write!(f, "{id}"),
            Target::Hap => write!(f, "HAP"),
        }
    }
}

// ── SimContext ────────────────────────────────────────────────────────────────

/// Everything one planning run reads and mutates.
#[derive(Debug, Clone, Default)]
pub struct SimContext {
    /// Road length in metres; vehicle positions are clamped to `[0, road_length_m]`.
    pub road_length_m: f64,

    /// Fixed link parameters used by the latency model.
    pub network: NetworkParams,

    pub vus: Vec<VehicleUnit>,
    pub rsus: Vec<RoadsideUnit>,
    pub hap: Hap,
}

/// Mutable part of a [`SimContext`], captured so repeated runs start from
/// identical conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSnapshot {
    positions_m: Vec<f64>,
    rsu_loads: Vec<u32>,
    hap_load: u32,
}

impl SimContext {
    /// Resolve a task key to its owning vehicle and task.
    ///
    /// Returns `None` if either index is out of range.
    pub fn task(&self, key: TaskKey) -> Option<(&VehicleUnit, &Task)> {
        let vu = self.vus.get(key.vu)?;
        let task = vu.tasks.get(key.task)?;
        Some((vu, task))
    }

    /// Every task key in decision-vector order.
    pub fn task_keys(&self) -> impl Iterator<Item = TaskKey> + '_ {
        self.vus.iter().enumerate().flat_map(|(vi, vu)| {
            (0..vu.tasks.len()).map(move |ti| TaskKey::new(vi, ti))
        })
    }

    /// Total number of tasks across all vehicles.
    pub fn task_count(&self) -> usize {
        self.vus.iter().map(|vu| vu.tasks.len()).sum()
    }

    // ── Capacity ledger ───────────────────────────────────────────────────────

    /// `(current_load, capacity_limit)` for `target`, or `None` for an
    /// unknown RSU.
    pub fn load(&self, target: Target) -> Option<(u32, u32)> {
        match target {
            Target::Rsu(id) => self
                .rsus
                .get(id.index())
                .map(|r| (r.current_load, r.capacity_limit)),
            Target::Hap => Some((self.hap.current_load, self.hap.capacity_limit)),
        }
    }

    /// `true` if `target` can take one more task.  Unknown RSUs never can.
    pub fn has_spare(&self, target: Target) -> bool {
        match target {
            Target::Rsu(id) => self
                .rsus
                .get(id.index())
                .is_some_and(RoadsideUnit::has_spare),
            Target::Hap => self.hap.has_spare(),
        }
    }

    /// Take one capacity slot on `target`.
    ///
    /// Returns `false` (and changes nothing) if the target is full or unknown.
    pub fn acquire(&mut self, target: Target) -> bool {
        if !self.has_spare(target) {
            return false;
        }
        match target {
            Target::Rsu(id) => {
                if let Some(rsu) = self.rsus.get_mut(id.index()) {
                    rsu.current_load += 1;
                }
            }
            Target::Hap => self.hap.current_load += 1,
        }
        true
    }

    /// Return one capacity slot on `target`.  Saturates at zero.
    pub fn release(&mut self, target: Target) {
        match target {
            Target::Rsu(id) => {
                if let Some(rsu) = self.rsus.get_mut(id.index()) {
                    rsu.current_load = rsu.current_load.saturating_sub(1);
                }
            }
            Target::Hap => self.hap.current_load = self.hap.current_load.saturating_sub(1),
        }
    }

    /// Return every slot on every target.
    pub fn release_all(&mut self) {
        for rsu in &mut self.rsus {
            rsu.current_load = 0;
        }
        self.hap.current_load = 0;
    }

    /// `true` if every RSU and the HAP respect `current_load ≤ capacity_limit`.
    pub fn capacity_respected(&self) -> bool {
        self.rsus.iter().all(|r| r.current_load <= r.capacity_limit)
            && self.hap.current_load <= self.hap.capacity_limit
    }

    // ── Snapshot / reset ──────────────────────────────────────────────────────

    /// Capture positions and capacity counters.
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            positions_m: self.vus.iter().map(|vu| vu.position_m).collect(),
            rsu_loads: self.rsus.iter().map(|r| r.current_load).collect(),
            hap_load: self.hap.current_load,
        }
    }

    /// Restore positions and capacity counters captured by [`snapshot`](Self::snapshot).
    ///
    /// Entities added after the snapshot was taken keep their current state.
    pub fn reset_to(&mut self, snapshot: &ContextSnapshot) {
        for (vu, &pos) in self.vus.iter_mut().zip(&snapshot.positions_m) {
            vu.position_m = pos;
        }
        for (rsu, &load) in self.rsus.iter_mut().zip(&snapshot.rsu_loads) {
            rsu.current_load = load;
        }
        self.hap.current_load = snapshot.hap_load;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

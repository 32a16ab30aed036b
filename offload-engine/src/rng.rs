/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Injectable, seeded randomness.
//!
//! The constructor only ever needs "pick one of the first `n` candidates", so
//! that is the whole [`RandomSource`] seam.  Production code uses
//! [`PlanRng`]; tests can script the sequence.
//!
//! Independent trials of a sweep derive their seeds as
//!
//!   seed = root_seed XOR (stream * MIXING_CONSTANT)
//!
//! so trials never share RNG state and results do not depend on which worker
//! thread ran which trial.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Source of the uniform choices made during construction.
pub trait RandomSource {
    /// Uniform index in `0..len`.  `len` is always at least 1.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

// ── PlanRng ───────────────────────────────────────────────────────────────────

/// Deterministic `SmallRng` wrapper used by the planner and the scenario
/// generator.
#[derive(Debug, Clone)]
pub struct PlanRng(SmallRng);

impl PlanRng {
    pub fn new(seed: u64) -> Self {
        PlanRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed for stream `stream` derived from `root_seed`.
    pub fn for_stream(root_seed: u64, stream: u64) -> Self {
        Self::new(root_seed ^ stream.wrapping_add(1).wrapping_mul(MIXING_CONSTANT))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p`, clamped to [0, 1].  NaN counts as 0.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.0.gen_bool(p)
    }
}

impl RandomSource for PlanRng {
    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            0
        } else {
            self.0.gen_range(0..len)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

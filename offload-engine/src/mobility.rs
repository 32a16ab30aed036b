/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! RSU coverage and vehicle movement along the road.
//!
//! A vehicle is covered by an RSU iff `|vu.position − rsu.position| ≤
//! rsu.coverage`.  When several RSUs cover it, the one the vehicle will leave
//! *first* in its direction of travel is selected. That is the RSU the next
//! handoff happens from, not necessarily the closest one.

use crate::entity::{Direction, RoadsideUnit, RsuId, VehicleUnit};

/// The RSU a vehicle can currently reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    pub rsu: RsuId,

    /// Metres left before the vehicle exits this RSU's coverage.
    pub distance_to_exit_m: f64,

    /// Time left in coverage in milliseconds; infinite for a stationary vehicle.
    pub sojourn_ms: f64,
}

/// Select the RSU covering `vu` with the smallest signed exit distance.
///
/// Ties keep the lowest RSU index.  Returns `None` if no RSU covers the vehicle.
pub fn find_reachable_rsu(vu: &VehicleUnit, rsus: &[RoadsideUnit]) -> Option<Coverage> {
    let mut best: Option<Coverage> = None;

    for (idx, rsu) in rsus.iter().enumerate() {
        if (vu.position_m - rsu.position_m).abs() > rsu.coverage_m {
            continue;
        }

        let exit = match vu.direction {
            Direction::Right => (rsu.position_m + rsu.coverage_m) - vu.position_m,
            Direction::Left => vu.position_m - (rsu.position_m - rsu.coverage_m),
        };

        if best.is_some_and(|b| exit >= b.distance_to_exit_m) {
            continue;
        }

        best = Some(Coverage {
            rsu: RsuId(idx),
            distance_to_exit_m: exit,
            sojourn_ms: sojourn_ms(exit, vu.speed_mps),
        });
    }

    best
}

fn sojourn_ms(distance_m: f64, speed_mps: f64) -> f64 {
    if speed_mps <= 0.0 {
        f64::INFINITY
    } else {
        distance_m.abs() / speed_mps * 1000.0
    }
}

/// Move every vehicle by `speed × elapsed_s` in its direction, clamped to
/// `[0, road_length_m]`.
///
/// A vehicle that reaches an end of the road stays there.
pub fn advance_positions(vus: &mut [VehicleUnit], elapsed_s: f64, road_length_m: f64) {
    for vu in vus {
        let next = vu.position_m + vu.speed_mps * elapsed_s * vu.direction.sign();
        vu.position_m = next.clamp(0.0, road_length_m);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rsu(position_m: f64, coverage_m: f64) -> RoadsideUnit {
        RoadsideUnit {
            position_m,
            coverage_m,
            capacity_limit: 10,
            ..Default::default()
        }
    }

    fn vu_at(position_m: f64, direction: Direction) -> VehicleUnit {
        VehicleUnit {
            speed_mps: 10.0,
            position_m,
            direction,
            ..Default::default()
        }
    }

    #[test]
    fn no_rsu_in_range_returns_none() {
        let rsus = vec![rsu(100.0, 20.0)];
        assert!(find_reachable_rsu(&vu_at(50.0, Direction::Right), &rsus).is_none());
    }

    #[test]
    fn coverage_boundary_is_inclusive() {
        let rsus = vec![rsu(100.0, 20.0)];
        let cov = find_reachable_rsu(&vu_at(80.0, Direction::Right), &rsus).unwrap();
        assert_eq!(cov.rsu, RsuId(0));
        assert_eq!(cov.distance_to_exit_m, 40.0);
        assert_eq!(cov.sojourn_ms, 4000.0);
    }

    #[test]
    fn selects_rsu_left_first_moving_right() {
        // Vehicle at 110 is covered by both. Moving right it exits RSU0
        // (edge at 120) before RSU1 (edge at 140), although RSU1 is nearer.
        let rsus = vec![rsu(100.0, 20.0), rsu(115.0, 25.0)];
        let cov = find_reachable_rsu(&vu_at(110.0, Direction::Right), &rsus).unwrap();
        assert_eq!(cov.rsu, RsuId(0));
        assert_eq!(cov.distance_to_exit_m, 10.0);
    }

    #[test]
    fn selects_rsu_left_first_moving_left() {
        let rsus = vec![rsu(100.0, 20.0), rsu(115.0, 25.0)];
        let cov = find_reachable_rsu(&vu_at(110.0, Direction::Left), &rsus).unwrap();
        // RSU0 lower edge 80 → 30 m; RSU1 lower edge 90 → 20 m
        assert_eq!(cov.rsu, RsuId(1));
        assert_eq!(cov.distance_to_exit_m, 20.0);
        assert_eq!(cov.sojourn_ms, 2000.0);
    }

    #[test]
    fn stationary_vehicle_has_infinite_sojourn() {
        let rsus = vec![rsu(100.0, 20.0)];
        let mut v = vu_at(100.0, Direction::Left);
        v.speed_mps = 0.0;
        let cov = find_reachable_rsu(&v, &rsus).unwrap();
        assert!(cov.sojourn_ms.is_infinite());
    }

    #[test]
    fn advance_moves_in_direction_of_travel() {
        let mut vus = vec![vu_at(100.0, Direction::Right), vu_at(100.0, Direction::Left)];
        advance_positions(&mut vus, 0.5, 1000.0);
        assert_eq!(vus[0].position_m, 105.0);
        assert_eq!(vus[1].position_m, 95.0);
    }

    #[test]
    fn advance_clamps_to_road_ends() {
        let mut vus = vec![vu_at(998.0, Direction::Right), vu_at(3.0, Direction::Left)];
        advance_positions(&mut vus, 1.0, 1000.0);
        assert_eq!(vus[0].position_m, 1000.0);
        assert_eq!(vus[1].position_m, 0.0);

        // Resting at the boundary is stable.
        advance_positions(&mut vus, 1.0, 1000.0);
        assert_eq!(vus[0].position_m, 1000.0);
        assert_eq!(vus[1].position_m, 0.0);
    }
}

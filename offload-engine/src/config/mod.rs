/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scenario configuration loading and validation.
//!
//! Every section is optional; anything left out falls back to the reference
//! scenario (10 vehicles, 20 RSUs on a 1 km road, one HAP).
//!
//! The expected YAML structure is:
//! ```yaml
//! seed: 42
//! road_length_m: 1000
//! vu:
//!   count: 10
//!   speed_mps: 6
//!   compute_gflops: 8
//!   tasks_per_vu: 10
//!   task_size_mb: [1, 1]
//!   deadline_ms: [300, 10000]
//! rsu:
//!   count: 20
//!   compute_gflops: 80
//!   coverage_m: 20
//!   capacity: 10
//! hap:
//!   compute_gflops: 150
//!   capacity: 5
//! network:
//!   uplink_gbps: 10
//!   downlink_gbps: 20
//!   downlink_factor: 5
//!   cycles_per_bit: 1000
//! planner:
//!   alpha: 0.498
//!   step_ms: 504.5
//!   enforce_sojourn: false
//!   local_search: true
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::latency::NetworkParams;
use crate::planner::{ConfigError, PlannerConfig, DEFAULT_ALPHA, REFERENCE_STEP_MS};

// ── Private YAML deserialization types ────────────────────────────────────────

/// `[min, max]` as it appears in the YAML file.
#[derive(Debug, Deserialize)]
struct RangeEntry(f64, f64);

impl From<RangeEntry> for SampleRange {
    fn from(entry: RangeEntry) -> Self {
        SampleRange {
            min: entry.0,
            max: entry.1,
        }
    }
}

// ── Public data structures ────────────────────────────────────────────────────

/// Inclusive sampling interval for generated task attributes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "RangeEntry")]
pub struct SampleRange {
    pub min: f64,
    pub max: f64,
}

impl SampleRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate range that always yields `value`.
    pub fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 || self.min > self.max
        {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Vehicle fleet parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VuSection {
    pub count: usize,
    pub speed_mps: f64,
    pub compute_gflops: f64,
    pub tasks_per_vu: usize,
    pub task_size_mb: SampleRange,
    pub deadline_ms: SampleRange,
}

impl Default for VuSection {
    fn default() -> Self {
        Self {
            count: 10,
            speed_mps: 6.0,
            compute_gflops: 8.0,
            tasks_per_vu: 10,
            task_size_mb: SampleRange::fixed(1.0),
            deadline_ms: SampleRange::new(300.0, 10_000.0),
        }
    }
}

/// Roadside unit parameters; RSUs are spread evenly along the road.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsuSection {
    pub count: usize,
    pub compute_gflops: f64,
    pub coverage_m: f64,
    pub capacity: u32,
}

impl Default for RsuSection {
    fn default() -> Self {
        Self {
            count: 20,
            compute_gflops: 80.0,
            coverage_m: 20.0,
            capacity: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HapSection {
    pub compute_gflops: f64,
    pub capacity: u32,
}

impl Default for HapSection {
    fn default() -> Self {
        Self {
            compute_gflops: 150.0,
            capacity: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerSection {
    pub alpha: f64,
    pub step_ms: f64,
    pub enforce_sojourn: bool,

    /// `false` runs the construction-only baseline.
    pub local_search: bool,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            step_ms: REFERENCE_STEP_MS,
            enforce_sojourn: false,
            local_search: true,
        }
    }
}

// ── ScenarioConfig ────────────────────────────────────────────────────────────

/// Everything needed to generate a scenario and run the planner on it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Root seed for scenario generation and planning.
    pub seed: u64,
    pub road_length_m: f64,
    pub vu: VuSection,
    pub rsu: RsuSection,
    pub hap: HapSection,
    pub network: NetworkParams,
    pub planner: PlannerSection,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            road_length_m: 1000.0,
            vu: VuSection::default(),
            rsu: RsuSection::default(),
            hap: HapSection::default(),
            network: NetworkParams::default(),
            planner: PlannerSection::default(),
        }
    }
}

impl ScenarioConfig {
    /// Parses and validates the scenario at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is structurally
    /// invalid, or a value fails [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading scenario configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid scenario file: {}", path.display()))?;

        info!(
            "Scenario loaded: {} VUs x {} tasks | {} RSUs | road {} m | seed {}",
            config.vu.count,
            config.vu.tasks_per_vu,
            config.rsu.count,
            config.road_length_m,
            config.seed,
        );
        debug!("  Network: {:?}", config.network);
        debug!("  Planner: {:?}", config.planner);

        Ok(config)
    }

    /// Parses and validates a scenario held in memory.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document deserializes to `()`, not an empty mapping.
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every physical quantity and range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("road_length_m", self.road_length_m)?;

        positive("vu.speed_mps", self.vu.speed_mps)?;
        positive("vu.compute_gflops", self.vu.compute_gflops)?;
        self.vu.task_size_mb.check("vu.task_size_mb")?;
        self.vu.deadline_ms.check("vu.deadline_ms")?;

        positive("rsu.compute_gflops", self.rsu.compute_gflops)?;
        positive("rsu.coverage_m", self.rsu.coverage_m)?;
        positive("hap.compute_gflops", self.hap.compute_gflops)?;

        positive("network.uplink_gbps", self.network.uplink_gbps)?;
        positive("network.downlink_gbps", self.network.downlink_gbps)?;
        positive("network.downlink_factor", self.network.downlink_factor)?;
        positive("network.cycles_per_bit", self.network.cycles_per_bit)?;

        check_alpha(self.planner.alpha)?;
        positive("planner.step_ms", self.planner.step_ms)?;

        Ok(())
    }

    /// Planner knobs from the `planner` section.
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            alpha: self.planner.alpha,
            step_ms: self.planner.step_ms,
            enforce_sojourn: self.planner.enforce_sojourn,
            local_search: self.planner.local_search,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Rejects alpha outside `[0, 1]`, including NaN.
pub fn check_alpha(alpha: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(ConfigError::AlphaOutOfRange(alpha))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn defaults_are_the_reference_scenario() {
        let cfg = ScenarioConfig::default();
        assert_eq!(cfg.road_length_m, 1000.0);
        assert_eq!(cfg.vu.count, 10);
        assert_eq!(cfg.vu.speed_mps, 6.0);
        assert_eq!(cfg.vu.tasks_per_vu, 10);
        assert_eq!(cfg.rsu.count, 20);
        assert_eq!(cfg.rsu.capacity, 10);
        assert_eq!(cfg.hap.capacity, 5);
        assert_eq!(cfg.planner.alpha, 0.498);
        assert_eq!(cfg.planner.step_ms, 504.5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn reference_file_matches_defaults() {
        let cfg = ScenarioConfig::from_yaml_str(include_str!("../../../configs/reference.yaml"))
            .unwrap();
        assert_eq!(cfg, ScenarioConfig::default());
    }

    #[test]
    fn planner_config_copies_planner_section() {
        let mut cfg = ScenarioConfig::default();
        cfg.planner.alpha = 0.25;
        cfg.planner.enforce_sojourn = true;
        let p = cfg.planner_config();
        assert_eq!(p.alpha, 0.25);
        assert_eq!(p.step_ms, 504.5);
        assert!(p.enforce_sojourn);
        assert!(p.local_search);

        cfg.planner.local_search = false;
        assert!(!cfg.planner_config().local_search);
    }

    // ── load_from_file ────────────────────────────────────────────────────────

    #[test]
    fn load_full_yaml() {
        let yaml = r#"
seed: 7
road_length_m: 500
vu:
  count: 4
  speed_mps: 10
  compute_gflops: 4
  tasks_per_vu: 3
  task_size_mb: [1, 5]
  deadline_ms: [100, 2000]
rsu:
  count: 5
  compute_gflops: 60
  coverage_m: 30
  capacity: 2
hap:
  compute_gflops: 200
  capacity: 1
network:
  uplink_gbps: 5
  downlink_gbps: 10
  downlink_factor: 2
  cycles_per_bit: 500
planner:
  alpha: 0.3
  step_ms: 250
  enforce_sojourn: true
  local_search: false
"#;
        let f = yaml_tempfile(yaml);
        let cfg = ScenarioConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.road_length_m, 500.0);
        assert_eq!(cfg.vu.count, 4);
        assert_eq!(cfg.vu.task_size_mb, SampleRange::new(1.0, 5.0));
        assert_eq!(cfg.vu.deadline_ms, SampleRange::new(100.0, 2000.0));
        assert_eq!(cfg.rsu.coverage_m, 30.0);
        assert_eq!(cfg.hap.compute_gflops, 200.0);
        assert_eq!(cfg.network.downlink_factor, 2.0);
        assert_eq!(cfg.network.cycles_per_bit, 500.0);
        assert!(cfg.planner.enforce_sojourn);
        assert!(!cfg.planner.local_search);
    }

    #[test]
    fn partial_yaml_keeps_defaults_elsewhere() {
        let yaml = "vu:\n  count: 3\nhap:\n  capacity: 0\n";
        let f = yaml_tempfile(yaml);
        let cfg = ScenarioConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.vu.count, 3);
        assert_eq!(cfg.vu.speed_mps, 6.0);
        assert_eq!(cfg.hap.capacity, 0);
        assert_eq!(cfg.hap.compute_gflops, 150.0);
        assert_eq!(cfg.rsu, RsuSection::default());
    }

    #[test]
    fn empty_file_is_the_reference_scenario() {
        let f = yaml_tempfile("");
        let cfg = ScenarioConfig::load_from_file(f.path()).unwrap();
        assert_eq!(cfg, ScenarioConfig::default());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = ScenarioConfig::load_from_file(Path::new("/nonexistent/path/scenario.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(ScenarioConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let f = yaml_tempfile("rsu:\n  capacty: 3\n");
        assert!(ScenarioConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn invalid_value_in_file_is_rejected() {
        let f = yaml_tempfile("planner:\n  alpha: 2.0\n");
        let err = ScenarioConfig::load_from_file(f.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::AlphaOutOfRange(2.0))
        );
    }

    // ── validate ──────────────────────────────────────────────────────────────

    #[test]
    fn alpha_bounds() {
        assert!(check_alpha(0.0).is_ok());
        assert!(check_alpha(1.0).is_ok());
        assert_eq!(check_alpha(-0.1), Err(ConfigError::AlphaOutOfRange(-0.1)));
        assert!(check_alpha(f64::NAN).is_err());
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        let mut cfg = ScenarioConfig::default();
        cfg.vu.speed_mps = 0.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "vu.speed_mps",
                value: 0.0
            })
        );

        let mut cfg = ScenarioConfig::default();
        cfg.network.uplink_gbps = -1.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "network.uplink_gbps",
                ..
            })
        ));

        let mut cfg = ScenarioConfig::default();
        cfg.planner.step_ms = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_or_negative_ranges_are_rejected() {
        let mut cfg = ScenarioConfig::default();
        cfg.vu.deadline_ms = SampleRange::new(500.0, 100.0);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidRange {
                field: "vu.deadline_ms",
                min: 500.0,
                max: 100.0
            })
        );

        let mut cfg = ScenarioConfig::default();
        cfg.vu.task_size_mb = SampleRange::new(-1.0, 2.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn zero_task_size_is_allowed() {
        // Empty tasks cost nothing on any route.
        let mut cfg = ScenarioConfig::default();
        cfg.vu.task_size_mb = SampleRange::fixed(0.0);
        assert!(cfg.validate().is_ok());

        cfg.vu.task_size_mb = SampleRange::new(0.0, 2.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_capacities_and_counts_are_allowed() {
        let mut cfg = ScenarioConfig::default();
        cfg.rsu.count = 0;
        cfg.rsu.capacity = 0;
        cfg.hap.capacity = 0;
        cfg.vu.tasks_per_vu = 0;
        assert!(cfg.validate().is_ok());
    }
}

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use offload_engine::config::ScenarioConfig;
use offload_engine::scenario;
use offload_engine::sweep::{default_alphas, run_sweep, SweepConfig, DEFAULT_RUNS_PER_ALPHA};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Find the alpha with the lowest total latency over repeated planning runs.
///
/// Example:
///   offload-sweep -c configs/reference.yaml -r 100 --alphas 0.1,0.5,0.9
#[derive(Debug, Parser)]
#[command(
    name = "offload-sweep",
    about = "Monte-Carlo alpha sweep for the offloading planner",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML scenario file (reference scenario if omitted).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Planning runs per alpha value.
    #[arg(short = 'r', long = "runs", default_value_t = DEFAULT_RUNS_PER_ALPHA)]
    runs: usize,

    /// Comma-separated alpha values (default 0.1..0.9 in steps of 0.1).
    #[arg(long = "alphas", value_delimiter = ',')]
    alphas: Vec<f64>,

    /// Root seed; overrides `seed` in the scenario file.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Skip local search (construction-only baseline).
    #[arg(long = "no-local-search", default_value_t = false)]
    no_local_search: bool,
}

impl Cli {
    fn configs(&self) -> Result<(ScenarioConfig, SweepConfig)> {
        let mut scenario = match &self.config {
            Some(path) => ScenarioConfig::load_from_file(path)?,
            None => {
                warn!("No scenario file provided, using the reference scenario");
                ScenarioConfig::default()
            }
        };
        if let Some(seed) = self.seed {
            scenario.seed = seed;
        }
        if self.no_local_search {
            scenario.planner.local_search = false;
        }

        let sweep = SweepConfig {
            alphas: if self.alphas.is_empty() {
                default_alphas()
            } else {
                self.alphas.clone()
            },
            runs_per_alpha: self.runs,
            seed: scenario.seed,
            planner: scenario.planner_config(),
        };
        sweep.validate()?;

        Ok((scenario, sweep))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!(config = ?cli.config, runs = cli.runs, alphas = ?cli.alphas, "offload-sweep starting");

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let (scenario_cfg, sweep_cfg) = cli.configs()?;

    let initial = scenario::from_config(&scenario_cfg);
    let report = run_sweep(&initial, &sweep_cfg)?;

    for r in &report.results {
        println!(
            "Alpha {:.1} - Best Latency: {:.4}, Mean: {:.4}, Best Decisions: {}",
            r.alpha, r.best_latency_ms, r.mean_latency_ms, r.decisions
        );
    }

    if let Some(best) = report.best() {
        println!(
            "The most optimal alpha is {:.1} with the lowest latency of {:.4}ms. Optimal Decisions: {}",
            best.alpha, best.best_latency_ms, best.decisions
        );
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn alphas_are_comma_separated() {
        let cli = Cli::parse_from(["offload-sweep", "--alphas", "0.2,0.4", "-r", "3"]);
        let (_, sweep) = cli.configs().unwrap();
        assert_eq!(sweep.alphas, vec![0.2, 0.4]);
        assert_eq!(sweep.runs_per_alpha, 3);
    }

    #[test]
    fn defaults_sweep_nine_alphas() {
        let cli = Cli::parse_from(["offload-sweep", "-s", "11"]);
        let (scenario, sweep) = cli.configs().unwrap();
        assert_eq!(sweep.alphas.len(), 9);
        assert_eq!(sweep.runs_per_alpha, 100);
        assert_eq!(scenario.seed, 11);
        assert_eq!(sweep.seed, 11);
    }

    #[test]
    fn baseline_flag_reaches_the_planner_template() {
        let cli = Cli::parse_from(["offload-sweep", "--no-local-search"]);
        let (scenario, sweep) = cli.configs().unwrap();
        assert!(!scenario.planner.local_search);
        assert!(!sweep.planner.local_search);

        let cli = Cli::parse_from(["offload-sweep"]);
        let (_, sweep) = cli.configs().unwrap();
        assert!(sweep.planner.local_search);
    }

    #[test]
    fn zero_runs_is_rejected() {
        let cli = Cli::parse_from(["offload-sweep", "-r", "0"]);
        assert!(cli.configs().is_err());
    }
}

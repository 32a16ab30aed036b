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
use offload_engine::planner::Planner;
use offload_engine::rng::PlanRng;
use offload_engine::scenario;

// ── CLI argument definition ───────────────────────────────────────────────────

/// One planning run over a generated scenario.
///
/// Example:
///   offload-engine -c configs/reference.yaml -a 0.498 -s 7
#[derive(Debug, Parser)]
#[command(
    name = "offload-engine",
    about = "Mobility-aware VU/RSU/HAP offloading planner",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML scenario file (reference scenario if omitted).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Greediness parameter in [0, 1]; overrides `planner.alpha`.
    #[arg(short = 'a', long = "alpha")]
    alpha: Option<f64>,

    /// Root seed; overrides `seed`.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Simulated time per cycle in ms; overrides `planner.step_ms`.
    #[arg(long = "step-ms")]
    step_ms: Option<f64>,

    /// Require RSU sojourn time to cover the RSU route latency.
    #[arg(long = "enforce-sojourn", default_value_t = false)]
    enforce_sojourn: bool,

    /// Skip local search (construction-only baseline).
    #[arg(long = "no-local-search", default_value_t = false)]
    no_local_search: bool,
}

impl Cli {
    fn scenario(&self) -> Result<ScenarioConfig> {
        let mut config = match &self.config {
            Some(path) => ScenarioConfig::load_from_file(path)?,
            None => {
                warn!("No scenario file provided, using the reference scenario");
                ScenarioConfig::default()
            }
        };

        if let Some(alpha) = self.alpha {
            config.planner.alpha = alpha;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(step_ms) = self.step_ms {
            config.planner.step_ms = step_ms;
        }
        if self.enforce_sojourn {
            config.planner.enforce_sojourn = true;
        }
        if self.no_local_search {
            config.planner.local_search = false;
        }

        config.validate()?;
        Ok(config)
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
    info!(config = ?cli.config, alpha = ?cli.alpha, seed = ?cli.seed, "offload-engine starting");

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.scenario()?;

    let mut ctx = scenario::from_config(&config);
    let mut planner = Planner::new(config.planner_config(), PlanRng::for_stream(config.seed, 0));
    let outcome = planner.run(&mut ctx);

    let counts = outcome.decisions.counts();
    println!(
        "Alpha {:.3} - Latency: {:.4} ms, Decisions: {}",
        config.planner.alpha, outcome.total_latency_ms, outcome.decisions
    );
    println!(
        "Cycles: {} ({:?}) | RSU {} | HAP {} | Local {} | Unresolved {}",
        outcome.cycles.len(),
        outcome.termination,
        counts.rsu,
        counts.hap,
        counts.local,
        counts.unresolved,
    );

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

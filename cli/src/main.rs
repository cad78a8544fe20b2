//! Influence simulator CLI.
//!
//! Runs one simulation and prints a JSON report to stdout. Logs go to stderr.
//!
//! ```text
//! influence-sim --model timer_based --nodes 200 --steps 80 --pretty
//! influence-sim --config scenario.json --window 5
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use influence_simulator_core_rs::{
    moving_average_counts, run, DiffusionModel, SimulationConfig, SimulationResult, Status, StatusCounts,
    TopologyKind, TransitionCounts,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "influence-sim")]
#[command(version)]
#[command(about = "Simulate performance-status influence across an organization graph", long_about = None)]
struct Cli {
    /// JSON config file; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of agents
    #[arg(long)]
    nodes: Option<usize>,

    /// Graph generator (preferential_attachment, random_edge)
    #[arg(long)]
    topology: Option<TopologyKind>,

    /// Attachment count or edge probability, depending on the topology
    #[arg(long)]
    topology_param: Option<f64>,

    /// Agents starting as high performers
    #[arg(long)]
    seeds: Option<usize>,

    /// Base probability of one successful interaction
    #[arg(long)]
    influence: Option<f64>,

    /// Per-step probability a high performer is retained
    #[arg(long, conflicts_with = "no_retention")]
    retention: Option<f64>,

    /// Disable retention entirely
    #[arg(long)]
    no_retention: bool,

    /// Diffusion model (simple_probabilistic, timer_based, threshold_based)
    #[arg(short, long)]
    model: Option<DiffusionModel>,

    /// Number of steps to run
    #[arg(long)]
    steps: Option<usize>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Moving-average window for the smoothed series
    #[arg(short, long, default_value_t = influence_simulator_core_rs::metrics::DEFAULT_WINDOW)]
    window: usize,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report {
    config: SimulationConfig,
    nodes: usize,
    edges: usize,
    isolated_nodes: usize,
    baseline: StatusCounts,
    final_counts: StatusCounts,
    series: BTreeMap<&'static str, Vec<usize>>,
    window: usize,
    smoothed: BTreeMap<&'static str, Vec<f64>>,
    transition_totals: TransitionCounts,
    events: usize,
}

impl Report {
    fn new(config: SimulationConfig, result: &SimulationResult, window: usize) -> anyhow::Result<Self> {
        let history = &result.history;
        let mut series = BTreeMap::new();
        let mut smoothed = BTreeMap::new();
        for status in Status::ALL {
            let counts = history.series(status);
            smoothed.insert(status.as_str(), moving_average_counts(&counts, window)?);
            series.insert(status.as_str(), counts);
        }

        Ok(Self {
            config,
            nodes: result.graph.node_count(),
            edges: result.graph.edge_count(),
            isolated_nodes: result.graph.isolated_nodes().len(),
            baseline: history.baseline(),
            final_counts: history.latest().map(|e| e.counts).unwrap_or(history.baseline()),
            series,
            window,
            smoothed,
            transition_totals: history.transition_totals(),
            events: result.events.len(),
        })
    }
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();
}

/// Config file (or defaults) with command-line overrides applied
fn build_config(cli: &Cli) -> anyhow::Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_str(&json).with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(nodes) = cli.nodes {
        config.node_count = nodes;
    }
    if let Some(kind) = cli.topology {
        config.topology_kind = kind;
    }
    if let Some(param) = cli.topology_param {
        config.topology_param = param;
    }
    if let Some(seeds) = cli.seeds {
        config.initial_seed_count = seeds;
    }
    if let Some(p) = cli.influence {
        config.base_influence_probability = p;
    }
    if let Some(model) = cli.model {
        config.diffusion_model = model;
        // The default retention rate does not apply to models without retention
        if cli.retention.is_none() && !model.supports_retention() {
            config.retention_rate = None;
        }
    }
    if let Some(rate) = cli.retention {
        config.retention_rate = Some(rate);
    }
    if cli.no_retention {
        config.retention_rate = None;
    }
    if let Some(steps) = cli.steps {
        config.step_count = steps;
    }
    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    info!(model = %config.diffusion_model, steps = config.step_count, "running simulation");

    let result = run(config.clone())?;
    let report = Report::new(config, &result, cli.window)?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("influence-sim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = build_config(&parse(&[])).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_threshold_model_drops_default_retention() {
        let config = build_config(&parse(&["--model", "threshold_based"])).unwrap();
        assert_eq!(config.diffusion_model, DiffusionModel::ThresholdBased);
        assert_eq!(config.retention_rate, None);
    }

    #[test]
    fn test_explicit_retention_with_threshold_rejected() {
        let cli = parse(&["--model", "threshold_based", "--retention", "0.5"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn test_unknown_model_rejected_by_parser() {
        assert!(Cli::try_parse_from(["influence-sim", "--model", "contagion"]).is_err());
    }

    #[test]
    fn test_report_series_lengths() {
        let cli = parse(&["--nodes", "20", "--steps", "12", "--window", "5"]);
        let config = build_config(&cli).unwrap();
        let result = run(config.clone()).unwrap();
        let report = Report::new(config, &result, cli.window).unwrap();

        assert_eq!(report.series["neutral"].len(), 12);
        assert_eq!(report.smoothed["neutral"].len(), 8);
        assert_eq!(report.final_counts.total(), 20);
    }
}

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use segregation::{
    engine::{EngineBuilder, EngineSettings},
    rng::POPULATE_STREAM,
    scenario::ScenarioLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Schelling segregation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/neighbours.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the satisfaction threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Override snapshot interval in ticks (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long, default_value = "snapshots")]
    snapshot_dir: PathBuf,

    /// Stop as soon as a tick has no unsatisfied occupants
    #[arg(long)]
    stop_when_settled: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    if let Some(threshold) = cli.threshold {
        scenario.threshold = threshold;
    }
    if let Some(interval) = cli.snapshot_interval {
        scenario.snapshot_interval_ticks = interval;
    }
    scenario.validate()?;
    let ticks = scenario.ticks(cli.ticks);

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        threshold: scenario.threshold,
        snapshot_interval_ticks: scenario.snapshot_interval_ticks,
        snapshot_dir: cli.snapshot_dir,
        stop_when_settled: cli.stop_when_settled,
    };
    let mut engine = EngineBuilder::new(settings).build()?;
    let mut world = scenario.build_world(&mut engine.rng_stream(POPULATE_STREAM))?;
    info!(side = world.side(), census = %world.census(), "world created");

    let summary = engine.run(&mut world, ticks)?;
    println!(
        "Scenario '{}' finished after {} ticks ({}). Final census: {}",
        scenario.name,
        summary.ticks_run,
        if summary.settled { "settled" } else { "still moving" },
        summary.census
    );
    Ok(())
}

//! Beehive Colony - headless driver
//!
//! Builds a colony from command-line parameters, runs it for a fixed number of
//! ticks and prints the statistics series as JSON.

use beehive_colony::core::config::{Activation, BehaviorPolicy, ColonyConfig, HormoneGrowth};
use beehive_colony::core::error::Result;
use beehive_colony::simulation::Colony;
use clap::Parser;

/// Run a honeybee colony simulation
#[derive(Parser, Debug)]
#[command(name = "beehive-colony")]
#[command(about = "Simulate a honeybee colony and export its population series")]
struct Args {
    /// Number of ticks to run
    #[arg(long, default_value_t = 100)]
    ticks: u64,

    /// Random seed for reproducible runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Initial worker population (queen not included)
    #[arg(long, default_value_t = 150)]
    population: u32,

    /// Grid width in cells
    #[arg(long, default_value_t = 17)]
    width: u32,

    /// Grid height in cells
    #[arg(long, default_value_t = 17)]
    height: u32,

    /// Initial and maximum resource level
    #[arg(long, default_value_t = 450)]
    resources: u32,

    /// Activation mode: random or simultaneous
    #[arg(long, default_value = "random")]
    activation: String,

    /// Behavior preset: colony-wide, spatial or aggressive
    #[arg(long, default_value = "colony-wide")]
    policy: String,

    /// Delay hormone growth until this age
    #[arg(long)]
    hormone_onset: Option<u32>,

    /// Write the statistics series here instead of stdout
    #[arg(long)]
    output: Option<String>,
}

fn parse_activation(name: &str) -> Activation {
    match name {
        "simultaneous" => Activation::Simultaneous,
        "random" => Activation::Random,
        other => {
            tracing::warn!("Unknown activation '{}', using random", other);
            Activation::Random
        }
    }
}

fn parse_policy(name: &str) -> BehaviorPolicy {
    match name {
        "spatial" => BehaviorPolicy::spatial(),
        "aggressive" => BehaviorPolicy::aggressive(),
        "colony-wide" => BehaviorPolicy::colony_wide(),
        other => {
            tracing::warn!("Unknown policy '{}', using colony-wide", other);
            BehaviorPolicy::colony_wide()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("beehive_colony=info")
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut policy = parse_policy(&args.policy);
    if let Some(onset_age) = args.hormone_onset {
        policy = policy.with_hormone_growth(HormoneGrowth::Delayed { onset_age });
    }

    let config = ColonyConfig {
        population: args.population,
        width: args.width,
        height: args.height,
        initial_resources: args.resources,
        max_resources: Some(args.resources),
        activation: parse_activation(&args.activation),
        seed: args.seed,
        policy,
        ..ColonyConfig::default()
    };

    let mut colony = Colony::new(config)?;
    let start = colony.snapshot();
    tracing::info!(
        "Colony started: {} foragers, {} nurses, {} guards, resource {}",
        start.foragers,
        start.nurses,
        start.guards,
        start.resource
    );

    let ran = colony.run(args.ticks);
    if ran < args.ticks {
        tracing::info!("Colony extinct after {} ticks", ran);
    }

    let end = colony.snapshot();
    tracing::info!(
        "After {} ticks: {} workers, {} larvae, queen alive: {}, resource {}, peak workers {}",
        ran,
        end.workers(),
        end.larvae,
        end.queen_alive,
        end.resource,
        colony.statistics().peak_workers()
    );

    let json = colony.statistics().to_json();
    match args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &json) {
                tracing::error!("Failed to write {}: {}", path, e);
            } else {
                tracing::info!("Statistics written to {}", path);
            }
        }
        None => println!("{}", json),
    }

    Ok(())
}

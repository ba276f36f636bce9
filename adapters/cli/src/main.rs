#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the waste collection simulator.

mod config;
mod logging;
mod render;
mod session;

use std::{io, path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use waste_route_core::{Command, SensorId, StrategyKind};
use waste_route_world::{self as world, query};

use crate::{config::Scenario, session::Session};

/// Amounts added to the first sensors by the `demo` scenario.
const DEMO_AMOUNTS: [u32; 3] = [3, 6, 12];

/// Simulates fill-level sensors feeding a pluggable collection router.
#[derive(Debug, Parser)]
#[command(name = "waste-route", version)]
struct Cli {
    /// Scenario file describing sensors, trucks and defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Fill three sensors by 3, 6 and 12, save, and print the route.
    Demo(Overrides),
    /// Read actions from standard input until `quit`.
    Run(Overrides),
}

/// Command-line values that take precedence over the scenario file.
#[derive(Debug, Default, Args)]
struct Overrides {
    /// Routing strategy to start with.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Seed for the fill generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Pause between sensors during a collection, in milliseconds.
    #[arg(long)]
    pause_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Sequential,
    Highest,
}

impl From<StrategyArg> for StrategyKind {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Sequential => Self::Sequential,
            StrategyArg::Highest => Self::HighestLevelFirst,
        }
    }
}

/// Entry point for the waste collection command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let mut scenario = match &cli.config {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };

    match cli.mode.unwrap_or(Mode::Demo(Overrides::default())) {
        Mode::Demo(overrides) => {
            apply_overrides(&mut scenario, &overrides);
            demo(&scenario)
        }
        Mode::Run(overrides) => {
            apply_overrides(&mut scenario, &overrides);
            run(&scenario)
        }
    }
}

fn apply_overrides(scenario: &mut Scenario, overrides: &Overrides) {
    if let Some(strategy) = overrides.strategy {
        scenario.strategy = strategy.into();
    }
    if overrides.seed.is_some() {
        scenario.seed = overrides.seed;
    }
    if let Some(pause_ms) = overrides.pause_ms {
        scenario.pause = Duration::from_millis(pause_ms);
    }
}

fn demo(scenario: &Scenario) -> Result<()> {
    let mut world = scenario.build_world();
    let mut events = Vec::new();

    println!("{}", query::welcome_banner(&world));
    for (index, amount) in DEMO_AMOUNTS.iter().enumerate() {
        let sensor = SensorId::new(index as u32);
        if query::level(&world, sensor).is_none() {
            break;
        }
        world::apply(
            &mut world,
            Command::IncreaseLevel {
                sensor,
                amount: *amount,
            },
            &mut events,
        )?;
    }
    world::apply(&mut world, Command::SaveState, &mut events)?;

    for event in &events {
        println!("{}", render::describe(event));
    }
    let view = query::sensor_view(&world);
    print!("{}", query::strategy(&world).generate_route(&view));
    Ok(())
}

fn run(scenario: &Scenario) -> Result<()> {
    let seed = scenario.seed.unwrap_or_else(rand::random);
    info!(seed, strategy = %scenario.strategy, "starting session");

    let mut session = Session::new(
        scenario.build_world(),
        scenario.filling()?,
        seed,
        scenario.pause,
    )?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout)?;

    info!(
        full_alerts = query::full_alerts(session.world()),
        saved_states = query::history_depth(session.world()),
        "session finished"
    );
    Ok(())
}

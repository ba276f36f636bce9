use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use waste_route_core::{Capacity, StrategyKind};
use waste_route_system_filling::{Filling, DEFAULT_MAX_AMOUNT, DEFAULT_MIN_AMOUNT};
use waste_route_system_routing::strategy_for;
use waste_route_world::{fleet, Sensor, SensorConfig, World};

const SUPPORTED_CONFIG_VERSION: u32 = 1;
const DEFAULT_CAPACITY: Capacity = match Capacity::new(10) {
    Some(capacity) => capacity,
    None => panic!("default capacity must be positive"),
};
const DEFAULT_SENSOR_COUNT: usize = 3;
const DEFAULT_TRUCKS: u32 = 1;

/// Fully resolved simulation settings.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Scenario {
    pub(crate) capacities: Vec<Capacity>,
    pub(crate) trucks: u32,
    pub(crate) strategy: StrategyKind,
    pub(crate) seed: Option<u64>,
    pub(crate) fill_min: u32,
    pub(crate) fill_max: u32,
    pub(crate) pause: Duration,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            capacities: vec![DEFAULT_CAPACITY; DEFAULT_SENSOR_COUNT],
            trucks: DEFAULT_TRUCKS,
            strategy: StrategyKind::default(),
            seed: None,
            fill_min: DEFAULT_MIN_AMOUNT,
            fill_max: DEFAULT_MAX_AMOUNT,
            pause: Duration::ZERO,
        }
    }
}

impl Scenario {
    /// Reads and validates a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario file at {}", path.display()))
    }

    /// Parses scenario contents, filling omitted fields with defaults.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let file: ScenarioFile =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        if let Some(version) = file.version {
            if version != SUPPORTED_CONFIG_VERSION {
                bail!(
                    "unsupported scenario version {version}; expected {SUPPORTED_CONFIG_VERSION}"
                );
            }
        }

        let mut scenario = Self::default();
        if let Some(capacities) = file.capacities {
            scenario.capacities = capacities
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    Capacity::new(value)
                        .with_context(|| format!("sensor {index} must have a positive capacity"))
                })
                .collect::<Result<_>>()?;
        }
        if let Some(trucks) = file.trucks {
            scenario.trucks = trucks;
        }
        if let Some(strategy) = file.strategy {
            scenario.strategy = strategy;
        }
        scenario.seed = file.seed;
        if let Some(fill_min) = file.fill_min {
            scenario.fill_min = fill_min;
        }
        if let Some(fill_max) = file.fill_max {
            scenario.fill_max = fill_max;
        }
        if let Some(pause_ms) = file.pause_ms {
            scenario.pause = Duration::from_millis(pause_ms);
        }

        let _ = scenario.filling()?;
        Ok(scenario)
    }

    /// Filling system configured with the scenario's amount range.
    pub(crate) fn filling(&self) -> Result<Filling> {
        Filling::with_amounts(self.fill_min, self.fill_max).with_context(|| {
            format!(
                "fill range {}..={} is empty",
                self.fill_min, self.fill_max
            )
        })
    }

    /// Builds an empty world matching the scenario.
    pub(crate) fn build_world(&self) -> World {
        let sensors = self
            .capacities
            .iter()
            .map(|capacity| Sensor::new(SensorConfig::new(*capacity)))
            .collect();
        World::new(
            sensors,
            fleet::assemble(self.trucks),
            strategy_for(self.strategy),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    version: Option<u32>,
    capacities: Option<Vec<u32>>,
    trucks: Option<u32>,
    strategy: Option<StrategyKind>,
    seed: Option<u64>,
    fill_min: Option<u32>,
    fill_max: Option<u32>,
    pause_ms: Option<u64>,
}

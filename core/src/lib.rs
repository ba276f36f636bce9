#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the waste collection simulator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Systems read immutable [`SensorView`] snapshots and respond with
//! new command batches or routes.

use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the simulator boots.
pub const WELCOME_BANNER: &str = "Waste collection simulator ready.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Raises a sensor's fill level, clamping at its capacity.
    IncreaseLevel {
        /// Identifier of the sensor being filled.
        sensor: SensorId,
        /// Amount added to the current level.
        amount: u32,
    },
    /// Empties a single sensor without consulting the routing strategy.
    EmptySensor {
        /// Identifier of the sensor being emptied.
        sensor: SensorId,
    },
    /// Captures the current levels and order onto the snapshot stack.
    SaveState,
    /// Pops the most recent snapshot and applies it to the live sensors.
    RestoreState,
    /// Replaces the active routing strategy.
    SetStrategy {
        /// Strategy that should plan subsequent routes.
        kind: StrategyKind,
    },
    /// Plans a route with the active strategy and empties every visited sensor.
    Collect,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a sensor's level changed after an increase.
    LevelIncreased {
        /// Identifier of the sensor that was filled.
        sensor: SensorId,
        /// Level before the increase.
        from: u32,
        /// Level after the increase, already clamped.
        to: u32,
    },
    /// Announces that a sensor transitioned into the full state.
    SensorFilled {
        /// Identifier of the sensor that reached capacity.
        sensor: SensorId,
        /// Level recorded at notification time, equal to the capacity.
        level: u32,
    },
    /// Confirms that a sensor was emptied.
    SensorEmptied {
        /// Identifier of the emptied sensor.
        sensor: SensorId,
    },
    /// Confirms that a snapshot was pushed.
    StateSaved {
        /// Number of snapshots held after the push.
        depth: usize,
    },
    /// Confirms that a snapshot was popped and applied.
    StateRestored {
        /// Number of snapshots remaining after the pop.
        depth: usize,
    },
    /// Reports that a restore was requested with an empty snapshot stack.
    NothingToRestore,
    /// Announces that a new routing strategy became active.
    StrategyChanged {
        /// Strategy that is now active.
        kind: StrategyKind,
    },
    /// Reports the sensors visited by a completed collection, in route order.
    CollectionCompleted {
        /// Sensors emptied by the collection.
        visited: Vec<SensorId>,
    },
}

/// Stable identifier assigned to a sensor when the world is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SensorId(u32);

impl SensorId {
    /// Creates a new sensor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sensor {}", self.0)
    }
}

/// Identifier assigned to an inert collection truck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TruckId(u32);

impl TruckId {
    /// Creates a new truck identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Maximum fill level a sensor can hold. Always strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capacity(NonZeroU32);

impl Capacity {
    /// Creates a capacity, returning `None` when `value` is zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Retrieves the numeric capacity.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

/// Routing strategies the world knows how to construct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Visits sensors in their current order.
    Sequential,
    /// Visits the fullest sensors first, keeping ties in their current order.
    #[default]
    HighestLevelFirst,
}

impl StrategyKind {
    /// Human readable label used by logs and adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::HighestLevelFirst => "highest-level-first",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable representation of a single sensor's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorSnapshot {
    /// Stable identifier assigned to the sensor.
    pub id: SensorId,
    /// Fill level at capture time.
    pub level: u32,
    /// Capacity fixed when the sensor was created.
    pub capacity: Capacity,
}

impl SensorSnapshot {
    /// Reports whether the captured level sits at capacity.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.level >= self.capacity.get()
    }
}

/// Read-only snapshot describing all sensors in their live order.
///
/// The order is meaningful: routing strategies treat it as the visiting order
/// of record, so the view never re-sorts the captured snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SensorView {
    snapshots: Vec<SensorSnapshot>,
}

impl SensorView {
    /// Creates a new sensor view preserving the order of `snapshots`.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<SensorSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured sensor snapshots in live order.
    pub fn iter(&self) -> impl Iterator<Item = &SensorSnapshot> {
        self.snapshots.iter()
    }

    /// Number of sensors captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no sensors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up the snapshot captured for `id`.
    #[must_use]
    pub fn get(&self, id: SensorId) -> Option<&SensorSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }
}

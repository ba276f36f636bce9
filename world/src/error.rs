//! Invariant violations surfaced by the world.

use thiserror::Error;
use waste_route_core::SensorId;

/// Internal inconsistencies that callers must treat as fatal.
///
/// The world never applies a partial mutation before returning one of these.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// A command or snapshot referenced a sensor this world does not own.
    #[error("{0} is not owned by this world")]
    UnknownSensor(SensorId),
    /// A snapshot tried to assign a level above the sensor's capacity.
    #[error("{sensor} cannot hold level {level}; capacity is {capacity}")]
    LevelExceedsCapacity {
        /// Sensor targeted by the assignment.
        sensor: SensorId,
        /// Level the snapshot attempted to assign.
        level: u32,
        /// Capacity fixed when the sensor was created.
        capacity: u32,
    },
}

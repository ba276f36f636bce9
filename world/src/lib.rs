#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative sensor state management for the waste collection simulator.
//!
//! The [`World`] owns every sensor, the active routing strategy, the snapshot
//! history, and the inert truck fleet. Sensors live in an arena indexed by
//! [`SensorId`]; the live visiting order is a separate list of identifiers, so
//! snapshots store identifiers rather than sensors and restoring never has to
//! guess which sensor a captured level belongs to.

pub mod error;
pub mod fleet;
pub mod history;
pub mod sensor;

use std::{
    collections::BTreeMap,
    sync::mpsc::{self, Receiver},
};

use tracing::{debug, info, warn};
use waste_route_core::{Command, Event, SensorId, SensorSnapshot, SensorView, WELCOME_BANNER};
use waste_route_system_routing::{strategy_for, RoutingStrategy};

pub use error::WorldError;
pub use fleet::Truck;
pub use history::{Snapshot, SnapshotStack};
pub use sensor::{NotificationTarget, Sensor, SensorConfig};

/// Notification delivered by a sensor that reached capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FullNotice {
    sensor: SensorId,
    level: u32,
}

/// Level transition produced by [`World::increase_level`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelChange {
    /// Sensor that was filled.
    pub sensor: SensorId,
    /// Level before the increase.
    pub from: u32,
    /// Level after the increase.
    pub to: u32,
    /// Indicates whether the increase moved the sensor into the full state.
    pub filled: bool,
}

/// Result of a restore request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A snapshot was popped and applied.
    Restored {
        /// Number of snapshots remaining on the stack.
        depth: usize,
    },
    /// The snapshot stack was empty and nothing changed.
    NothingToRestore,
}

/// Represents the authoritative collection world.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    sensors: Vec<Sensor>,
    order: Vec<SensorId>,
    strategy: Box<dyn RoutingStrategy>,
    history: SnapshotStack,
    fleet: Vec<Truck>,
    notices: Receiver<FullNotice>,
    full_alerts: u64,
}

impl World {
    /// Takes ownership of `sensors`, assigning identifiers in the provided
    /// order starting at zero.
    ///
    /// The world becomes the only notification target of every sensor.
    /// Targets registered before the hand-off are dropped.
    #[must_use]
    pub fn new(
        sensors: Vec<Sensor>,
        fleet: Vec<Truck>,
        strategy: Box<dyn RoutingStrategy>,
    ) -> Self {
        let (sender, notices) = mpsc::channel();
        let mut arena = Vec::with_capacity(sensors.len());
        let mut order = Vec::with_capacity(sensors.len());

        for (index, mut sensor) in sensors.into_iter().enumerate() {
            let id = SensorId::new(index as u32);
            let dropped = sensor.clear_notification_targets();
            if dropped > 0 {
                debug!(sensor = %id, dropped, "dropped notification targets registered before assembly");
            }
            let sender = sender.clone();
            sensor.register_notification_target(move |sensor: &Sensor| {
                // The receiver lives as long as the world that owns this sensor.
                let _ = sender.send(FullNotice {
                    sensor: id,
                    level: sensor.level(),
                });
            });
            arena.push(sensor);
            order.push(id);
        }

        info!(
            sensors = arena.len(),
            trucks = fleet.len(),
            strategy = strategy.name(),
            "world assembled"
        );

        Self {
            banner: WELCOME_BANNER,
            sensors: arena,
            order,
            strategy,
            history: SnapshotStack::new(),
            fleet,
            notices,
            full_alerts: 0,
        }
    }

    /// Raises the level of `sensor` by `amount`, clamping at capacity.
    pub fn increase_level(
        &mut self,
        sensor: SensorId,
        amount: u32,
    ) -> Result<LevelChange, WorldError> {
        let target = self.sensor_mut(sensor)?;
        let from = target.level();
        target.increase_level(amount);
        let to = target.level();
        debug!(%sensor, from, to, amount, "level increased");

        let mut filled = false;
        for notice in self.drain_notices() {
            filled |= notice.sensor == sensor;
            self.on_notification(notice);
        }

        Ok(LevelChange {
            sensor,
            from,
            to,
            filled,
        })
    }

    /// Empties a single sensor without consulting the routing strategy.
    pub fn empty_sensor(&mut self, sensor: SensorId) -> Result<(), WorldError> {
        self.sensor_mut(sensor)?.reset_to_empty();
        debug!(%sensor, "sensor emptied");
        Ok(())
    }

    /// Captures every level and the live order onto the snapshot stack.
    ///
    /// Returns the stack depth after the push.
    pub fn save_state(&mut self) -> usize {
        let levels: BTreeMap<SensorId, u32> = self
            .order
            .iter()
            .filter_map(|id| self.sensor(*id).map(|sensor| (*id, sensor.level())))
            .collect();
        self.history.push(levels, self.order.clone());
        info!(depth = self.history.len(), "state saved");
        self.history.len()
    }

    /// Pops the most recent snapshot and applies it to the live sensors.
    ///
    /// Levels are assigned directly, so restoring never notifies. The snapshot
    /// is validated before anything changes; on error it goes back onto the
    /// stack and the world is left untouched.
    pub fn restore_state(&mut self) -> Result<RestoreOutcome, WorldError> {
        let Some(snapshot) = self.history.pop() else {
            warn!("no previous state available");
            return Ok(RestoreOutcome::NothingToRestore);
        };

        if let Err(error) = self.validate(&snapshot) {
            self.history.push_back(snapshot);
            return Err(error);
        }

        for id in snapshot.order() {
            if let Some(level) = snapshot.level_of(*id) {
                self.sensors[index_of(*id)].assign_level(level);
            }
        }
        self.order = snapshot.order().to_vec();

        let depth = self.history.len();
        info!(depth, "state restored");
        Ok(RestoreOutcome::Restored { depth })
    }

    /// Replaces the active routing strategy.
    pub fn set_strategy(&mut self, strategy: Box<dyn RoutingStrategy>) {
        info!(
            from = self.strategy.name(),
            to = strategy.name(),
            "strategy changed"
        );
        self.strategy = strategy;
    }

    /// Active routing strategy.
    #[must_use]
    pub fn strategy(&self) -> &dyn RoutingStrategy {
        self.strategy.as_ref()
    }

    /// Plans a route with the active strategy and empties every visited
    /// sensor in route order.
    ///
    /// Returns the visited identifiers. Sensors left off the route keep their
    /// level. No snapshot is taken.
    pub fn collect(&mut self) -> Result<Vec<SensorId>, WorldError> {
        let view = query::sensor_view(self);
        let route = self.strategy.generate_route(&view);
        let mut visited = Vec::with_capacity(route.len());
        visited.extend(route.ids());

        if let Some(unknown) = visited.iter().find(|id| self.sensor(**id).is_none()) {
            return Err(WorldError::UnknownSensor(*unknown));
        }

        for id in &visited {
            self.sensors[index_of(*id)].reset_to_empty();
        }

        info!(
            strategy = self.strategy.name(),
            visited = visited.len(),
            "collection completed"
        );
        Ok(visited)
    }

    fn on_notification(&mut self, notice: FullNotice) {
        self.full_alerts = self.full_alerts.saturating_add(1);
        info!(sensor = %notice.sensor, level = notice.level, "sensor reached capacity");
    }

    fn drain_notices(&mut self) -> Vec<FullNotice> {
        self.notices.try_iter().collect()
    }

    fn validate(&self, snapshot: &Snapshot) -> Result<(), WorldError> {
        for id in snapshot.order() {
            let sensor = self.sensor(*id).ok_or(WorldError::UnknownSensor(*id))?;
            if let Some(level) = snapshot.level_of(*id) {
                let capacity = sensor.capacity().get();
                if level > capacity {
                    return Err(WorldError::LevelExceedsCapacity {
                        sensor: *id,
                        level,
                        capacity,
                    });
                }
            }
        }
        Ok(())
    }

    fn sensor(&self, id: SensorId) -> Option<&Sensor> {
        self.sensors.get(index_of(id))
    }

    fn sensor_mut(&mut self, id: SensorId) -> Result<&mut Sensor, WorldError> {
        self.sensors
            .get_mut(index_of(id))
            .ok_or(WorldError::UnknownSensor(id))
    }
}

fn index_of(id: SensorId) -> usize {
    id.get() as usize
}

/// Applies the provided command to the world, appending the resulting events.
///
/// Errors are invariant violations; the world is unchanged when one is
/// returned.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::IncreaseLevel { sensor, amount } => {
            let change = world.increase_level(sensor, amount)?;
            if change.from != change.to {
                out_events.push(Event::LevelIncreased {
                    sensor,
                    from: change.from,
                    to: change.to,
                });
            }
            if change.filled {
                out_events.push(Event::SensorFilled {
                    sensor,
                    level: change.to,
                });
            }
        }
        Command::EmptySensor { sensor } => {
            world.empty_sensor(sensor)?;
            out_events.push(Event::SensorEmptied { sensor });
        }
        Command::SaveState => {
            let depth = world.save_state();
            out_events.push(Event::StateSaved { depth });
        }
        Command::RestoreState => match world.restore_state()? {
            RestoreOutcome::Restored { depth } => {
                out_events.push(Event::StateRestored { depth });
            }
            RestoreOutcome::NothingToRestore => out_events.push(Event::NothingToRestore),
        },
        Command::SetStrategy { kind } => {
            world.set_strategy(strategy_for(kind));
            out_events.push(Event::StrategyChanged { kind });
        }
        Command::Collect => {
            let visited = world.collect()?;
            out_events.push(Event::CollectionCompleted { visited });
        }
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{index_of, SensorSnapshot, SensorView, Truck, World};
    use waste_route_core::SensorId;
    use waste_route_system_routing::RoutingStrategy;

    /// Retrieves the welcome banner that adapters may display.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Captures a read-only view of the sensors in live order.
    #[must_use]
    pub fn sensor_view(world: &World) -> SensorView {
        let snapshots = world
            .order
            .iter()
            .filter_map(|id| {
                world.sensors.get(index_of(*id)).map(|sensor| SensorSnapshot {
                    id: *id,
                    level: sensor.level(),
                    capacity: sensor.capacity(),
                })
            })
            .collect();
        SensorView::from_snapshots(snapshots)
    }

    /// Current level of `sensor`, if the world owns it.
    #[must_use]
    pub fn level(world: &World, sensor: SensorId) -> Option<u32> {
        world.sensor(sensor).map(|sensor| sensor.level())
    }

    /// Live visiting order of the sensors.
    #[must_use]
    pub fn sensor_order(world: &World) -> &[SensorId] {
        &world.order
    }

    /// Active routing strategy.
    #[must_use]
    pub fn strategy(world: &World) -> &dyn RoutingStrategy {
        world.strategy()
    }

    /// Number of snapshots waiting on the stack.
    #[must_use]
    pub fn history_depth(world: &World) -> usize {
        world.history.len()
    }

    /// Trucks held by the world.
    #[must_use]
    pub fn fleet(world: &World) -> &[Truck] {
        &world.fleet
    }

    /// Number of full notifications the world has received.
    #[must_use]
    pub fn full_alerts(world: &World) -> u64 {
        world.full_alerts
    }
}

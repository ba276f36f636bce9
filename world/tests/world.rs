use waste_route_core::{Capacity, Command, Event, SensorId, SensorView, StrategyKind};
use waste_route_system_routing::{HighestLevelFirst, Route, RoutingStrategy, Sequential};
use waste_route_world::{
    self as world, fleet, query, RestoreOutcome, Sensor, SensorConfig, World,
};

fn sensors(capacities: &[u32]) -> Vec<Sensor> {
    capacities
        .iter()
        .map(|capacity| {
            Sensor::new(SensorConfig::new(
                Capacity::new(*capacity).expect("non-zero capacity"),
            ))
        })
        .collect()
}

fn world_with(capacities: &[u32], strategy: Box<dyn RoutingStrategy>) -> World {
    World::new(sensors(capacities), fleet::assemble(1), strategy)
}

fn levels(world: &World) -> Vec<u32> {
    query::sensor_view(world)
        .iter()
        .map(|snapshot| snapshot.level)
        .collect()
}

fn ids(raw: &[u32]) -> Vec<SensorId> {
    raw.iter().copied().map(SensorId::new).collect()
}

#[test]
fn three_bin_scenario_clamps_routes_and_collects() {
    let mut world = world_with(&[10, 10, 10], Box::new(HighestLevelFirst));

    let first = world.increase_level(SensorId::new(0), 3).expect("sensor 0");
    let second = world.increase_level(SensorId::new(1), 6).expect("sensor 1");
    let third = world.increase_level(SensorId::new(2), 12).expect("sensor 2");

    assert_eq!(levels(&world), vec![3, 6, 10]);
    assert!(!first.filled && !second.filled);
    assert!(third.filled, "overshoot must clamp and notify");
    assert_eq!(query::full_alerts(&world), 1);

    let view = query::sensor_view(&world);
    let route = query::strategy(&world).generate_route(&view);
    assert_eq!(route.ids().collect::<Vec<_>>(), ids(&[2, 1, 0]));

    let visited = world.collect().expect("collection succeeds");
    assert_eq!(visited, ids(&[2, 1, 0]));
    assert_eq!(levels(&world), vec![0, 0, 0]);
}

#[test]
fn save_then_restore_round_trips_levels_and_order() {
    let mut world = world_with(&[10, 8, 6], Box::new(Sequential));
    let _ = world.increase_level(SensorId::new(0), 2).expect("sensor 0");
    let _ = world.increase_level(SensorId::new(2), 9).expect("sensor 2");
    let saved_levels = levels(&world);
    let saved_order = query::sensor_order(&world).to_vec();

    assert_eq!(world.save_state(), 1);
    let _ = world.increase_level(SensorId::new(1), 8).expect("sensor 1");
    let _ = world.collect().expect("collection succeeds");
    let _ = world.increase_level(SensorId::new(0), 4).expect("sensor 0");

    assert_eq!(
        world.restore_state(),
        Ok(RestoreOutcome::Restored { depth: 0 })
    );
    assert_eq!(levels(&world), saved_levels);
    assert_eq!(query::sensor_order(&world), saved_order.as_slice());
}

#[test]
fn restores_pop_most_recent_snapshot_first() {
    let mut world = world_with(&[10], Box::new(Sequential));
    let sensor = SensorId::new(0);

    let _ = world.increase_level(sensor, 1).expect("sensor 0");
    let _ = world.save_state();
    let _ = world.increase_level(sensor, 4).expect("sensor 0");
    let _ = world.save_state();
    let _ = world.increase_level(sensor, 2).expect("sensor 0");

    let _ = world.restore_state().expect("restore B");
    assert_eq!(query::level(&world, sensor), Some(5));
    let _ = world.restore_state().expect("restore A");
    assert_eq!(query::level(&world, sensor), Some(1));
    assert_eq!(
        world.restore_state(),
        Ok(RestoreOutcome::NothingToRestore)
    );
    assert_eq!(query::level(&world, sensor), Some(1));
}

#[test]
fn restore_on_fresh_world_reports_nothing_and_changes_nothing() {
    let mut world = world_with(&[4, 4], Box::new(Sequential));
    let mut events = Vec::new();

    world::apply(&mut world, Command::RestoreState, &mut events).expect("restore succeeds");

    assert_eq!(events, vec![Event::NothingToRestore]);
    assert_eq!(levels(&world), vec![0, 0]);
    assert_eq!(query::history_depth(&world), 0);
}

#[test]
fn restore_moves_full_sensor_back_without_notifying() {
    let mut world = world_with(&[5], Box::new(Sequential));
    let sensor = SensorId::new(0);

    let _ = world.save_state();
    let _ = world.increase_level(sensor, 5).expect("sensor 0");
    assert_eq!(query::full_alerts(&world), 1);

    let _ = world.restore_state().expect("restore succeeds");
    assert_eq!(query::level(&world, sensor), Some(0));

    let change = world.increase_level(sensor, 5).expect("sensor 0");
    assert!(change.filled, "restored sensor accumulates and fills again");
    assert_eq!(query::full_alerts(&world), 2);
}

#[test]
fn collection_does_not_notify_or_snapshot() {
    let mut world = world_with(&[3, 3], Box::new(HighestLevelFirst));
    let _ = world.increase_level(SensorId::new(0), 3).expect("sensor 0");
    let alerts = query::full_alerts(&world);

    let _ = world.collect().expect("collection succeeds");

    assert_eq!(query::full_alerts(&world), alerts);
    assert_eq!(query::history_depth(&world), 0);
}

/// Visits only sensors that are currently full.
#[derive(Debug)]
struct FullOnly;

impl RoutingStrategy for FullOnly {
    fn name(&self) -> &'static str {
        "full-only"
    }

    fn generate_route<'a>(&self, sensors: &'a SensorView) -> Route<'a> {
        Route::new(sensors.iter().filter(|snapshot| snapshot.is_full()).collect())
    }
}

#[test]
fn collection_leaves_sensors_off_the_route_untouched() {
    let mut world = world_with(&[5, 5, 5], Box::new(FullOnly));
    let _ = world.increase_level(SensorId::new(0), 2).expect("sensor 0");
    let _ = world.increase_level(SensorId::new(1), 9).expect("sensor 1");
    let _ = world.increase_level(SensorId::new(2), 4).expect("sensor 2");

    let visited = world.collect().expect("collection succeeds");

    assert_eq!(visited, ids(&[1]));
    assert_eq!(levels(&world), vec![2, 0, 4]);
}

#[test]
fn strategy_can_be_swapped_at_runtime() {
    let mut world = world_with(&[10, 10], Box::new(HighestLevelFirst));
    let mut events = Vec::new();
    assert_eq!(query::strategy(&world).name(), "highest-level-first");

    world::apply(
        &mut world,
        Command::SetStrategy {
            kind: StrategyKind::Sequential,
        },
        &mut events,
    )
    .expect("strategy change succeeds");

    assert_eq!(world.strategy().name(), "sequential");
    assert_eq!(
        events,
        vec![Event::StrategyChanged {
            kind: StrategyKind::Sequential
        }]
    );
}

#[test]
fn apply_reports_level_changes_and_fills() {
    let mut world = world_with(&[4], Box::new(Sequential));
    let sensor = SensorId::new(0);
    let mut events = Vec::new();

    for amount in [3, 3, 3] {
        world::apply(
            &mut world,
            Command::IncreaseLevel { sensor, amount },
            &mut events,
        )
        .expect("increase succeeds");
    }

    assert_eq!(
        events,
        vec![
            Event::LevelIncreased {
                sensor,
                from: 0,
                to: 3
            },
            Event::LevelIncreased {
                sensor,
                from: 3,
                to: 4
            },
            Event::SensorFilled { sensor, level: 4 },
        ]
    );
}

#[test]
fn apply_rejects_unknown_sensors() {
    let mut world = world_with(&[4], Box::new(Sequential));
    let mut events = Vec::new();

    let result = world::apply(
        &mut world,
        Command::IncreaseLevel {
            sensor: SensorId::new(3),
            amount: 1,
        },
        &mut events,
    );

    assert_eq!(
        result,
        Err(world::WorldError::UnknownSensor(SensorId::new(3)))
    );
    assert!(events.is_empty());
}

#[test]
fn trucks_are_held_but_inert() {
    let world = World::new(sensors(&[1]), fleet::assemble(2), Box::new(Sequential));

    assert_eq!(query::fleet(&world).len(), 2);
    assert_eq!(query::welcome_banner(&world), waste_route_core::WELCOME_BANNER);
}

#[test]
fn empty_world_collects_nothing() {
    let mut world = World::new(Vec::new(), Vec::new(), Box::new(HighestLevelFirst));

    assert!(world.collect().expect("collection succeeds").is_empty());
    assert_eq!(world.save_state(), 1);
    assert_eq!(
        world.restore_state(),
        Ok(RestoreOutcome::Restored { depth: 0 })
    );
}

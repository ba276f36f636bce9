#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure routing system that orders sensors into collection routes.
//!
//! Strategies never mutate anything: they read a [`SensorView`] and hand back
//! a [`Route`] that borrows the snapshots it was planned from. The world owns
//! the active strategy and decides what to do with the resulting visiting
//! order.

use std::fmt;

use waste_route_core::{SensorId, SensorSnapshot, SensorView, StrategyKind};

/// Interchangeable algorithm that maps a sensor view to a visiting order.
pub trait RoutingStrategy: fmt::Debug + Send {
    /// Short name reported by logs and adapters.
    fn name(&self) -> &'static str;

    /// Plans a route over the provided sensors.
    ///
    /// Implementations must be free of side effects and keep no state
    /// between calls.
    fn generate_route<'a>(&self, sensors: &'a SensorView) -> Route<'a>;
}

/// Visits sensors in the order they currently appear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sequential;

impl RoutingStrategy for Sequential {
    fn name(&self) -> &'static str {
        StrategyKind::Sequential.label()
    }

    fn generate_route<'a>(&self, sensors: &'a SensorView) -> Route<'a> {
        Route::new(sensors.iter().collect())
    }
}

/// Visits the fullest sensors first.
///
/// Sensors sharing a level keep their relative input order, so repeated
/// planning over an unchanged view always yields the same route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighestLevelFirst;

impl RoutingStrategy for HighestLevelFirst {
    fn name(&self) -> &'static str {
        StrategyKind::HighestLevelFirst.label()
    }

    fn generate_route<'a>(&self, sensors: &'a SensorView) -> Route<'a> {
        let mut stops: Vec<&SensorSnapshot> = sensors.iter().collect();
        // `sort_by` is stable.
        stops.sort_by(|left, right| right.level.cmp(&left.level));
        Route::new(stops)
    }
}

/// Builds the strategy registered for `kind`.
#[must_use]
pub fn strategy_for(kind: StrategyKind) -> Box<dyn RoutingStrategy> {
    match kind {
        StrategyKind::Sequential => Box::new(Sequential),
        StrategyKind::HighestLevelFirst => Box::new(HighestLevelFirst),
    }
}

/// Ordered visiting plan borrowed from the view it was generated from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route<'a> {
    stops: Vec<&'a SensorSnapshot>,
}

impl<'a> Route<'a> {
    /// Creates a route visiting `stops` in the provided order.
    #[must_use]
    pub fn new(stops: Vec<&'a SensorSnapshot>) -> Self {
        Self { stops }
    }

    /// Snapshots visited by the route, in visiting order.
    #[must_use]
    pub fn stops(&self) -> &[&'a SensorSnapshot] {
        &self.stops
    }

    /// Identifiers visited by the route, in visiting order.
    pub fn ids(&self) -> impl Iterator<Item = SensorId> + '_ {
        self.stops.iter().map(|stop| stop.id)
    }

    /// Number of stops on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Reports whether the route visits nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

impl fmt::Display for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collection route:")?;
        for stop in &self.stops {
            writeln!(
                f,
                " - {} ({}/{})",
                stop.id,
                stop.level,
                stop.capacity.get()
            )?;
        }
        Ok(())
    }
}

//! Capacity-bounded fill sensors and their notification registry.

use std::{fmt, mem};

use waste_route_core::Capacity;

/// Callback invoked when a sensor transitions into the full state.
pub type NotificationTarget = Box<dyn FnMut(&Sensor) + Send>;

/// Creation options for a [`Sensor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorConfig {
    /// Level at which the sensor reports itself full.
    pub capacity: Capacity,
}

impl SensorConfig {
    /// Creates a configuration for sensors holding at most `capacity`.
    #[must_use]
    pub const fn new(capacity: Capacity) -> Self {
        Self { capacity }
    }
}

/// Fill-level sensor that never exceeds its capacity.
///
/// The sensor is either accumulating (`level < capacity`) or full
/// (`level == capacity`). Registered targets hear about the rising edge into
/// the full state exactly once; increases while full are ignored.
pub struct Sensor {
    level: u32,
    capacity: Capacity,
    targets: Vec<NotificationTarget>,
}

impl Sensor {
    /// Creates an empty sensor from the provided configuration.
    #[must_use]
    pub fn new(config: SensorConfig) -> Self {
        Self {
            level: 0,
            capacity: config.capacity,
            targets: Vec::new(),
        }
    }

    /// Current fill level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Capacity fixed at creation.
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Reports whether the level sits at capacity.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.level >= self.capacity.get()
    }

    /// Adds `amount` to the level, clamping at capacity.
    ///
    /// Reaching capacity notifies every registered target in registration
    /// order. Does nothing when the sensor is already full.
    pub fn increase_level(&mut self, amount: u32) {
        if self.is_full() {
            return;
        }

        let raised = self.level.saturating_add(amount);
        if raised >= self.capacity.get() {
            self.level = self.capacity.get();
            self.notify();
        } else {
            self.level = raised;
        }
    }

    /// Appends a notification target. Duplicates are kept.
    pub fn register_notification_target<F>(&mut self, target: F)
    where
        F: FnMut(&Sensor) + Send + 'static,
    {
        self.targets.push(Box::new(target));
    }

    /// Number of registered notification targets.
    #[must_use]
    pub fn notification_targets(&self) -> usize {
        self.targets.len()
    }

    /// Drops every registered target, returning how many were removed.
    pub(crate) fn clear_notification_targets(&mut self) -> usize {
        let cleared = self.targets.len();
        self.targets.clear();
        cleared
    }

    /// Empties the sensor. Emptying is not a threshold event and never notifies.
    pub fn reset_to_empty(&mut self) {
        self.level = 0;
    }

    /// Assigns a level directly, bypassing notification.
    ///
    /// Callers guarantee `level <= capacity`.
    pub(crate) fn assign_level(&mut self, level: u32) {
        debug_assert!(level <= self.capacity.get());
        self.level = level;
    }

    fn notify(&mut self) {
        let mut targets = mem::take(&mut self.targets);
        for target in &mut targets {
            target(self);
        }
        self.targets = targets;
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("level", &self.level)
            .field("capacity", &self.capacity.get())
            .field("targets", &self.targets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use super::*;

    fn sensor(capacity: u32) -> Sensor {
        Sensor::new(SensorConfig::new(
            Capacity::new(capacity).expect("non-zero capacity"),
        ))
    }

    fn counting_target(sensor: &mut Sensor) -> Arc<AtomicUsize> {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        sensor.register_notification_target(move |_| {
            let _ = counter.fetch_add(1, Ordering::SeqCst);
        });
        fired
    }

    #[test]
    fn new_sensor_is_empty_and_silent() {
        let mut sensor = sensor(10);
        let fired = counting_target(&mut sensor);

        assert_eq!(sensor.level(), 0);
        assert!(!sensor.is_full());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn level_stays_within_bounds_for_any_sequence() {
        let mut sensor = sensor(7);
        for amount in [0, 1, 3, 0, 2, 9, 4, u32::MAX, 1] {
            sensor.increase_level(amount);
            assert!(sensor.level() <= sensor.capacity().get());
        }
        assert_eq!(sensor.level(), 7);
    }

    #[test]
    fn overshoot_clamps_and_notifies_once() {
        let mut sensor = sensor(10);
        let fired = counting_target(&mut sensor);

        sensor.increase_level(12);
        assert_eq!(sensor.level(), 10);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        sensor.increase_level(5);
        sensor.increase_level(0);
        assert_eq!(sensor.level(), 10, "increase while full must be a no-op");
        assert_eq!(fired.load(Ordering::SeqCst), 1, "notification must not double-fire");
    }

    #[test]
    fn exact_fill_notifies() {
        let mut sensor = sensor(4);
        let fired = counting_target(&mut sensor);

        sensor.increase_level(3);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        sensor.increase_level(1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reset_is_silent_and_rearms_notification() {
        let mut sensor = sensor(5);
        let fired = counting_target(&mut sensor);

        sensor.increase_level(5);
        sensor.reset_to_empty();
        assert_eq!(sensor.level(), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        sensor.increase_level(8);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn targets_fire_in_registration_order() {
        let mut sensor = sensor(2);
        let order = Arc::new(Mutex::new(Vec::new()));
        for label in ["first", "second", "first-again"] {
            let order = Arc::clone(&order);
            sensor.register_notification_target(move |sensor| {
                order
                    .lock()
                    .expect("order lock")
                    .push((label, sensor.level()));
            });
        }

        sensor.increase_level(2);

        let observed = order.lock().expect("order lock").clone();
        assert_eq!(
            observed,
            vec![("first", 2), ("second", 2), ("first-again", 2)]
        );
        assert_eq!(sensor.notification_targets(), 3);
    }

    #[test]
    fn assigned_levels_bypass_notification() {
        let mut sensor = sensor(3);
        let fired = counting_target(&mut sensor);

        sensor.assign_level(3);
        assert!(sensor.is_full());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}

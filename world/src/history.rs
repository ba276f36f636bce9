//! Last-in, first-out storage of sensor snapshots.

use std::collections::BTreeMap;

use waste_route_core::SensorId;

/// Frozen capture of every sensor level and the live order at save time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    levels: BTreeMap<SensorId, u32>,
    order: Vec<SensorId>,
}

impl Snapshot {
    /// Creates a snapshot from captured levels and order.
    #[must_use]
    pub fn new(levels: BTreeMap<SensorId, u32>, order: Vec<SensorId>) -> Self {
        Self { levels, order }
    }

    /// Level captured for `sensor`, if it was part of the capture.
    #[must_use]
    pub fn level_of(&self, sensor: SensorId) -> Option<u32> {
        self.levels.get(&sensor).copied()
    }

    /// Sensor order captured at save time.
    #[must_use]
    pub fn order(&self) -> &[SensorId] {
        &self.order
    }
}

/// Unbounded stack of snapshots. Popped snapshots are gone for good.
#[derive(Clone, Debug, Default)]
pub struct SnapshotStack {
    entries: Vec<Snapshot>,
}

impl SnapshotStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new snapshot on top of the stack.
    pub fn push(&mut self, levels: BTreeMap<SensorId, u32>, order: Vec<SensorId>) {
        self.entries.push(Snapshot::new(levels, order));
    }

    /// Removes the most recent snapshot, or `None` when nothing was saved.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop()
    }

    /// Returns a previously popped snapshot to the top of the stack.
    pub(crate) fn push_back(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot);
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the stack holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure filling system that simulates waste accumulating in every sensor.

use std::ops::RangeInclusive;

use rand::Rng;
use waste_route_core::{Command, SensorView};

/// Smallest amount added by default when a sensor accumulates waste.
pub const DEFAULT_MIN_AMOUNT: u32 = 1;
/// Largest amount added by default when a sensor accumulates waste.
pub const DEFAULT_MAX_AMOUNT: u32 = 5;

/// Filling system that emits one increase per sensor still below capacity.
#[derive(Clone, Debug)]
pub struct Filling {
    amounts: RangeInclusive<u32>,
}

impl Default for Filling {
    fn default() -> Self {
        Self {
            amounts: DEFAULT_MIN_AMOUNT..=DEFAULT_MAX_AMOUNT,
        }
    }
}

impl Filling {
    /// Creates a filling system drawing amounts from `min..=max`.
    ///
    /// Returns `None` when the range is empty.
    #[must_use]
    pub fn with_amounts(min: u32, max: u32) -> Option<Self> {
        (min <= max).then(|| Self { amounts: min..=max })
    }

    /// Range amounts are drawn from.
    #[must_use]
    pub fn amounts(&self) -> &RangeInclusive<u32> {
        &self.amounts
    }

    /// Emits `Command::IncreaseLevel` for every sensor that is not yet full.
    ///
    /// Sensors are visited in view order and each draw consumes the RNG, so a
    /// seeded generator replays identically.
    pub fn handle<R>(&self, sensors: &SensorView, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng,
    {
        for snapshot in sensors.iter() {
            if snapshot.is_full() {
                continue;
            }

            let amount = rng.gen_range(self.amounts.clone());
            out.push(Command::IncreaseLevel {
                sensor: snapshot.id,
                amount,
            });
        }
    }
}

//! Plain-text presentation of sensors, routes, and world events.

use std::io::{self, Write};

use waste_route_core::{Event, SensorView};

const BAR_WIDTH: u32 = 10;

/// Writes one fill bar per sensor in live order.
pub(crate) fn status<W: Write>(sensors: &SensorView, out: &mut W) -> io::Result<()> {
    if sensors.is_empty() {
        return writeln!(out, "no sensors");
    }
    for snapshot in sensors.iter() {
        let capacity = snapshot.capacity.get();
        let filled = snapshot.level.saturating_mul(BAR_WIDTH) / capacity;
        let bar: String = (0..BAR_WIDTH)
            .map(|cell| if cell < filled { '#' } else { '.' })
            .collect();
        write!(
            out,
            "{:<10} [{bar}] {:>3}/{capacity}",
            snapshot.id.to_string(),
            snapshot.level
        )?;
        if snapshot.is_full() {
            write!(out, "  {} full!", snapshot.id)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Describes an event for the session transcript.
pub(crate) fn describe(event: &Event) -> String {
    match event {
        Event::LevelIncreased { sensor, from, to } => format!("{sensor}: {from} -> {to}"),
        Event::SensorFilled { sensor, level } => format!("{sensor} reached capacity ({level})"),
        Event::SensorEmptied { sensor } => format!("{sensor} emptied"),
        Event::StateSaved { depth } => format!("state saved ({depth} stored)"),
        Event::StateRestored { depth } => format!("state restored ({depth} stored)"),
        Event::NothingToRestore => "no previous state available".to_owned(),
        Event::StrategyChanged { kind } => format!("strategy set to {kind}"),
        Event::CollectionCompleted { visited } => {
            format!("collection completed ({} sensors)", visited.len())
        }
    }
}

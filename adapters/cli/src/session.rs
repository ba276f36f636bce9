//! Line-oriented driver that feeds user actions into the world.

use std::{
    io::{BufRead, Write},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use waste_route_core::{Command, Event, SensorId, StrategyKind};
use waste_route_system_filling::Filling;
use waste_route_world::{self as world, query, World};

use crate::render;

const HELP: &str = "\
commands:
  fill                 add waste to every sensor that is not full
  add <sensor> <n>     add n units to one sensor
  collect              empty sensors along the current route
  route                show the route the current strategy would take
  strategy <name>      switch to `sequential` or `highest`
  save                 store the current state
  restore              return to the last stored state
  status               show every sensor
  help                 show this message
  quit                 leave the session";

/// Single user request parsed from an input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Fill,
    Add { sensor: SensorId, amount: u32 },
    Collect,
    Route,
    Strategy(StrategyKind),
    Save,
    Restore,
    Status,
    Help,
    Quit,
}

impl Action {
    /// Parses an input line, returning a hint for unrecognised input.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let action = match verb {
            "fill" => Self::Fill,
            "add" => {
                let sensor = words
                    .next()
                    .and_then(|word| word.parse().ok())
                    .ok_or("usage: add <sensor> <amount>")?;
                let amount = words
                    .next()
                    .and_then(|word| word.parse().ok())
                    .ok_or("usage: add <sensor> <amount>")?;
                Self::Add {
                    sensor: SensorId::new(sensor),
                    amount,
                }
            }
            "collect" => Self::Collect,
            "route" => Self::Route,
            "strategy" => match words.next() {
                Some("sequential") => Self::Strategy(StrategyKind::Sequential),
                Some("highest") | Some("highest-level-first") => {
                    Self::Strategy(StrategyKind::HighestLevelFirst)
                }
                _ => return Err("usage: strategy <sequential|highest>".to_owned()),
            },
            "save" => Self::Save,
            "restore" => Self::Restore,
            "status" => Self::Status,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command `{other}`; try `help`")),
        };
        Ok(Some(action))
    }
}

/// Interactive session owning the world and its driving systems.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    filling: Filling,
    rng: ChaCha8Rng,
    pause: Duration,
}

impl Session {
    /// Creates a session and stores the initial state so it can be restored.
    pub(crate) fn new(world: World, filling: Filling, seed: u64, pause: Duration) -> Result<Self> {
        let mut session = Self {
            world,
            filling,
            rng: ChaCha8Rng::seed_from_u64(seed),
            pause,
        };
        let _ = session.submit(Command::SaveState)?;
        Ok(session)
    }

    /// Authoritative world driven by the session.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Reads actions until `quit` or end of input.
    pub(crate) fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", query::welcome_banner(&self.world))?;
        render::status(&query::sensor_view(&self.world), out)?;

        for line in input.lines() {
            let line = line.context("failed to read session input")?;
            match Action::parse(&line) {
                Ok(None) => {}
                Ok(Some(Action::Quit)) => break,
                Ok(Some(action)) => self.perform(action, out)?,
                Err(hint) => writeln!(out, "{hint}")?,
            }
        }
        Ok(())
    }

    /// Executes a single action, writing its transcript to `out`.
    pub(crate) fn perform<W: Write>(&mut self, action: Action, out: &mut W) -> Result<()> {
        debug!(?action, "performing action");
        match action {
            Action::Fill => {
                let mut commands = Vec::new();
                self.filling
                    .handle(&query::sensor_view(&self.world), &mut self.rng, &mut commands);
                for command in commands {
                    let events = self.submit(command)?;
                    report(&events, out)?;
                }
                report(&self.submit(Command::SaveState)?, out)?;
                render::status(&query::sensor_view(&self.world), out)?;
            }
            Action::Add { sensor, amount } => {
                if query::level(&self.world, sensor).is_none() {
                    let count = query::sensor_view(&self.world).len();
                    writeln!(out, "no {sensor}; sensors are 0..{count}")?;
                    return Ok(());
                }
                report(&self.submit(Command::IncreaseLevel { sensor, amount })?, out)?;
            }
            Action::Collect => {
                self.collect(out)?;
                report(&self.submit(Command::SaveState)?, out)?;
                render::status(&query::sensor_view(&self.world), out)?;
            }
            Action::Route => {
                let view = query::sensor_view(&self.world);
                write!(out, "{}", query::strategy(&self.world).generate_route(&view))?;
            }
            Action::Strategy(kind) => {
                report(&self.submit(Command::SetStrategy { kind })?, out)?;
            }
            Action::Save => report(&self.submit(Command::SaveState)?, out)?,
            Action::Restore => {
                report(&self.submit(Command::RestoreState)?, out)?;
                render::status(&query::sensor_view(&self.world), out)?;
            }
            Action::Status => render::status(&query::sensor_view(&self.world), out)?,
            Action::Help => writeln!(out, "{HELP}")?,
            Action::Quit => {}
        }
        Ok(())
    }

    fn collect<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let view = query::sensor_view(&self.world);
        let route = query::strategy(&self.world).generate_route(&view);
        write!(out, "{route}")?;

        if self.pause.is_zero() {
            return report(&self.submit(Command::Collect)?, out);
        }

        // Staggered run: one sensor per step with a pause in between.
        let stops: Vec<SensorId> = route.ids().collect();
        for (index, sensor) in stops.iter().enumerate() {
            if index > 0 {
                thread::sleep(self.pause);
            }
            report(&self.submit(Command::EmptySensor { sensor: *sensor })?, out)?;
        }
        Ok(())
    }

    fn submit(&mut self, command: Command) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events)?;
        Ok(events)
    }
}

fn report<W: Write>(events: &[Event], out: &mut W) -> Result<()> {
    for event in events {
        writeln!(out, "{}", render::describe(event))?;
    }
    Ok(())
}

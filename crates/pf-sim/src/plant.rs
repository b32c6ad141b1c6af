//! The plant: independent stations advanced together, one tick at a time.

use crate::address::{Field, FieldValue, TankAddress};
use crate::alarm::{AlarmLog, AlarmThresholds, LevelAlarm};
use crate::command::{Action, Applied, Command, CommandQueue};
use crate::error::{SimError, SimResult};
use crate::snapshot::{PlantSnapshot, TankReading, read_reading};
use crate::station::{Station, StationTick};
use crate::topology::PlantTopology;
use pf_components::FlowControl;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How stations are advanced within a tick.
///
/// Stations share no state, so both modes produce identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickMode {
    #[default]
    Sequential,
    /// One rayon task per station.
    Parallel,
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Number of completed ticks, including this one
    pub tick: u64,
    pub time_s: f64,
    /// Staged commands executed at the start of the tick
    pub applied: Vec<Applied>,
    /// One entry per station, in plant order
    pub stations: Vec<StationTick>,
    pub alarms: Vec<LevelAlarm>,
}

/// Ordered collection of stations with a staged command buffer.
///
/// Readers see the snapshot taken at the end of the last completed tick;
/// commands wait in the queue until the next tick boundary.
#[derive(Debug, Clone)]
pub struct Plant {
    name: String,
    stations: Vec<Station>,
    topology: Arc<PlantTopology>,
    queue: CommandQueue,
    mode: TickMode,
    thresholds: AlarmThresholds,
    alarms: AlarmLog,
    tick: u64,
    time_s: f64,
    snapshot: Arc<PlantSnapshot>,
}

impl Plant {
    /// # Errors
    /// Rejects an empty station list and duplicate station names.
    pub fn new(name: impl Into<String>, stations: Vec<Station>) -> SimResult<Self> {
        let name = name.into();
        let topology = Arc::new(PlantTopology::from_stations(&stations)?);
        let snapshot = Arc::new(PlantSnapshot::capture(&name, 0, 0.0, &stations));
        Ok(Self {
            name,
            stations,
            topology,
            queue: CommandQueue::with_max_history(256),
            mode: TickMode::default(),
            thresholds: AlarmThresholds::default(),
            alarms: AlarmLog::default(),
            tick: 0,
            time_s: 0.0,
            snapshot,
        })
    }

    pub fn with_tick_mode(mut self, mode: TickMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_alarm_thresholds(mut self, thresholds: AlarmThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tick_mode(&self) -> TickMode {
        self.mode
    }

    pub fn topology(&self) -> Arc<PlantTopology> {
        Arc::clone(&self.topology)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, name: &str) -> Option<&Station> {
        let id = self.topology.station_id(name)?;
        self.stations.get(id.slot())
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    pub fn pending_commands(&self) -> usize {
        self.queue.pending_count()
    }

    /// Commands executed so far, most recent last, with the tick boundary
    /// they ran at.
    pub fn command_history(&self) -> &[(u64, Command)] {
        self.queue.history()
    }

    pub fn alarm_history(&self) -> &AlarmLog {
        &self.alarms
    }

    /// Stage a new opening for a tank's outlet.
    ///
    /// # Errors
    /// `UnknownTarget` for a bad address, `InvalidCommand` when `fraction`
    /// lies outside [0, 1]. Nothing is staged on error.
    pub fn apply_command(&mut self, station: &str, tank: &str, fraction: f64) -> SimResult<()> {
        self.submit(station, tank, Action::SetOpening(fraction))
    }

    /// Stage any action for the next tick boundary.
    pub fn submit(&mut self, station: &str, tank: &str, action: Action) -> SimResult<()> {
        let command = self
            .topology
            .command(station, tank, action)
            .inspect_err(|e| warn!(error = %e, "command rejected"))?;
        info!(station, tank, ?action, "command staged");
        self.queue.push(command);
        Ok(())
    }

    /// Stage commands that were validated against this plant's topology.
    pub(crate) fn enqueue(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.queue.push_batch(commands);
    }

    /// Fill a supply tank immediately, between ticks; returns the new level
    /// fraction.
    pub fn fill_now(&mut self, station: &str, tank: &str) -> SimResult<f64> {
        self.execute_now(station, tank, Action::Fill)
    }

    /// Empty a tank immediately, between ticks; returns the new level fraction.
    pub fn flush_now(&mut self, station: &str, tank: &str) -> SimResult<f64> {
        self.execute_now(station, tank, Action::Flush)
    }

    fn execute_now(&mut self, station: &str, tank: &str, action: Action) -> SimResult<f64> {
        let command = self.topology.command(station, tank, action)?;
        let fraction = self.execute(command)?;
        info!(station, tank, ?action, level = fraction, "command executed");
        self.snapshot = Arc::new(self.capture());
        Ok(fraction)
    }

    fn execute(&mut self, command: Command) -> SimResult<f64> {
        let station = self
            .stations
            .get_mut(command.target.station.slot())
            .ok_or(SimError::InvalidArg {
                what: "command addresses a station outside this plant",
            })?;
        let tank = station.tank_mut(command.target.tank);
        match command.action {
            Action::SetOpening(fraction) => {
                tank.outlet_mut().set_open_fraction(fraction)?;
                Ok(tank.level_fraction())
            }
            Action::Fill => Ok(tank.fill()),
            Action::Flush => Ok(tank.flush()),
        }
    }

    fn capture(&self) -> PlantSnapshot {
        PlantSnapshot::capture(&self.name, self.tick, self.time_s, &self.stations)
    }

    /// Advance every station by `dt` seconds.
    ///
    /// Staged commands are executed first, so the whole tick runs on one set
    /// of outlet settings. The new snapshot replaces the old one only once
    /// every station has advanced.
    ///
    /// # Errors
    /// `InvalidArg` when `dt` is not positive and finite; the plant is left
    /// untouched and staged commands stay queued.
    pub fn run_tick(&mut self, dt: f64) -> SimResult<TickReport> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive and finite",
            });
        }

        let mut applied = Vec::new();
        for command in self.queue.drain() {
            match self.execute(command) {
                Ok(level_fraction) => {
                    self.queue.record(self.tick, command);
                    applied.push(Applied {
                        command,
                        level_fraction,
                    });
                }
                Err(e) => warn!(error = %e, "dropping staged command"),
            }
        }

        let stations: Vec<StationTick> = match self.mode {
            TickMode::Sequential => self.stations.iter_mut().map(|s| s.tick(dt)).collect(),
            TickMode::Parallel => self.stations.par_iter_mut().map(|s| s.tick(dt)).collect(),
        };

        self.tick += 1;
        self.time_s += dt;

        let next = self.capture();
        let alarms = self.thresholds.detect(&self.snapshot, &next);
        for alarm in &alarms {
            warn!(%alarm, "level alarm");
            self.alarms.push(alarm.clone());
        }
        self.snapshot = Arc::new(next);

        debug!(
            tick = self.tick,
            time_s = self.time_s,
            applied = applied.len(),
            "tick complete"
        );

        Ok(TickReport {
            tick: self.tick,
            time_s: self.time_s,
            applied,
            stations,
            alarms,
        })
    }

    /// Snapshot of the last completed tick.
    pub fn snapshot(&self) -> Arc<PlantSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Reading of one tank as of the last completed tick.
    ///
    /// # Errors
    /// `UnknownTarget` when the station or tank does not exist.
    pub fn read_state(&self, station: &str, tank: &str) -> SimResult<TankReading> {
        read_reading(&self.topology, &self.snapshot, station, tank)
    }

    /// One field of a tank; an address without a field reads the level.
    pub fn read_field(&self, address: &TankAddress) -> SimResult<FieldValue> {
        let reading = self.read_state(&address.station, &address.tank)?;
        Ok(FieldValue::from_reading(
            &reading,
            address.field.unwrap_or(Field::Level),
        ))
    }

    pub fn device_names(&self, prefix: &str) -> Vec<String> {
        self.topology.device_names(prefix)
    }
}

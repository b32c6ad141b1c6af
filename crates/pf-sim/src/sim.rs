//! Batch runner and result recording.

use crate::alarm::LevelAlarm;
use crate::command::{Action, Applied};
use crate::error::{SimError, SimResult};
use crate::plant::Plant;
use crate::snapshot::PlantSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Options for batch runs.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Number of ticks to run
    pub ticks: u64,
    /// Record every N-th tick (decimation)
    pub record_every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dt: 1.0,
            ticks: 60,
            record_every: 1,
        }
    }
}

/// A command submitted just before the run's `tick`-th tick (0-based).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    pub tick: u64,
    pub station: String,
    pub tank: String,
    pub action: Action,
}

/// Record of a batch run.
#[derive(Clone, Debug)]
pub struct RunRecord {
    /// Simulated time of each snapshot (seconds)
    pub t: Vec<f64>,
    pub snapshots: Vec<Arc<PlantSnapshot>>,
    /// Executed commands with the run tick they preceded
    pub applied: Vec<(u64, Applied)>,
    /// Scheduled commands the plant refused
    pub rejected: Vec<(ScheduledCommand, SimError)>,
    pub alarms: Vec<LevelAlarm>,
}

impl RunRecord {
    /// Snapshot after the last tick.
    pub fn last(&self) -> Option<&PlantSnapshot> {
        self.snapshots.last().map(Arc::as_ref)
    }
}

/// Run `opts.ticks` ticks, feeding `schedule` in at the tick boundaries.
///
/// Rejected scheduled commands are recorded and skipped; they never stop the
/// run. Entries scheduled at or after `opts.ticks` are recorded as rejected.
/// The initial snapshot is always recorded, and so is the final one.
pub fn run_ticks(
    plant: &mut Plant,
    opts: &RunOptions,
    schedule: &[ScheduledCommand],
) -> SimResult<RunRecord> {
    if !(opts.dt.is_finite() && opts.dt > 0.0) {
        return Err(SimError::InvalidArg {
            what: "dt must be positive and finite",
        });
    }
    if opts.ticks == 0 {
        return Err(SimError::InvalidArg {
            what: "ticks must be positive",
        });
    }
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    let mut by_tick: BTreeMap<u64, Vec<&ScheduledCommand>> = BTreeMap::new();
    for entry in schedule {
        by_tick.entry(entry.tick).or_default().push(entry);
    }

    let initial = plant.snapshot();
    let mut record = RunRecord {
        t: vec![initial.time_s],
        snapshots: vec![initial],
        applied: Vec::new(),
        rejected: Vec::new(),
        alarms: Vec::new(),
    };

    info!(ticks = opts.ticks, dt = opts.dt, scheduled = schedule.len(), "batch run");

    for step in 0..opts.ticks {
        for entry in by_tick.remove(&step).unwrap_or_default() {
            if let Err(e) = plant.submit(&entry.station, &entry.tank, entry.action) {
                record.rejected.push((entry.clone(), e));
            }
        }

        let report = plant.run_tick(opts.dt)?;
        record
            .applied
            .extend(report.applied.into_iter().map(|a| (step, a)));
        record.alarms.extend(report.alarms);

        let done = step + 1;
        if done % opts.record_every == 0 || done == opts.ticks {
            let snap = plant.snapshot();
            record.t.push(snap.time_s);
            record.snapshots.push(snap);
        }
    }

    for entry in by_tick.into_values().flatten() {
        warn!(
            tick = entry.tick,
            station = %entry.station,
            tank = %entry.tank,
            "scheduled past the end of the run"
        );
        record.rejected.push((
            entry.clone(),
            SimError::InvalidArg {
                what: "scheduled tick lies beyond the end of the run",
            },
        ));
    }

    Ok(record)
}

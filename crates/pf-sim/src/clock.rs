//! Fixed-interval simulation clock running on its own thread.
//!
//! The clock thread owns the [`Plant`]. External collaborators talk to it
//! through a [`PlantHandle`]:
//!
//! - commands are validated against the immutable topology and staged in a
//!   buffer the clock swaps out at the start of each tick
//! - readings come from the last published snapshot, an `Arc` the clock
//!   replaces after every completed tick
//!
//! Readers never see a half-advanced tank, and the clock never waits on
//! reader work beyond an `Arc` clone.

use crate::address::{Field, FieldValue, TankAddress};
use crate::command::{Action, Command};
use crate::error::{SimError, SimResult};
use crate::plant::Plant;
use crate::snapshot::{PlantSnapshot, TankReading, read_reading};
use crate::topology::PlantTopology;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Options for the real-time clock.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockOptions {
    /// Wall-clock time between ticks
    pub period: Duration,
    /// Simulated seconds per tick
    pub dt: f64,
    /// Stop by itself after this many ticks
    pub max_ticks: Option<u64>,
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            dt: 1.0,
            max_ticks: None,
        }
    }
}

impl ClockOptions {
    fn validate(&self) -> SimResult<()> {
        if self.period.is_zero() {
            return Err(SimError::InvalidArg {
                what: "clock period must be positive",
            });
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive and finite",
            });
        }
        if self.max_ticks == Some(0) {
            return Err(SimError::InvalidArg {
                what: "max_ticks must be positive",
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Shared {
    topology: Arc<PlantTopology>,
    staged: Mutex<Vec<Command>>,
    published: RwLock<Arc<PlantSnapshot>>,
    running: AtomicBool,
}

pub struct SimulationClock;

impl SimulationClock {
    /// Start ticking `plant` every `options.period`.
    ///
    /// Dropping the returned [`ClockHandle`] stops the clock after the tick
    /// in progress.
    pub fn spawn(plant: Plant, options: ClockOptions) -> SimResult<(ClockHandle, PlantHandle)> {
        options.validate()?;

        let shared = Arc::new(Shared {
            topology: plant.topology(),
            staged: Mutex::new(Vec::new()),
            published: RwLock::new(plant.snapshot()),
            running: AtomicBool::new(true),
        });
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        info!(
            plant = plant.name(),
            period_ms = options.period.as_millis() as u64,
            dt = options.dt,
            "simulation clock starting"
        );

        let thread_shared = Arc::clone(&shared);
        let join = thread::Builder::new()
            .name("pf-clock".to_string())
            .spawn(move || {
                let mut plant = plant;
                let mut ticks = 0u64;
                let mut deadline = Instant::now() + options.period;
                loop {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                        Err(RecvTimeoutError::Timeout) => {}
                    }

                    let staged = std::mem::take(
                        &mut *thread_shared
                            .staged
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner),
                    );
                    plant.enqueue(staged);
                    if let Err(e) = plant.run_tick(options.dt) {
                        warn!(error = %e, "tick failed");
                    }
                    *thread_shared
                        .published
                        .write()
                        .unwrap_or_else(PoisonError::into_inner) = plant.snapshot();

                    ticks += 1;
                    if options.max_ticks.is_some_and(|max| ticks >= max) {
                        break;
                    }
                    deadline = next_deadline(deadline, options.period, Instant::now());
                }
                thread_shared.running.store(false, Ordering::Release);
                info!(ticks, "simulation clock stopped");
                plant
            })
            .map_err(|_| SimError::Clock {
                what: "failed to spawn clock thread",
            })?;

        let handle = PlantHandle {
            shared: Arc::clone(&shared),
        };
        Ok((
            ClockHandle {
                stop_tx,
                join,
                shared,
            },
            handle,
        ))
    }
}

/// The slot after `deadline`; missed slots are skipped rather than run back
/// to back.
fn next_deadline(deadline: Instant, period: Duration, now: Instant) -> Instant {
    let next = deadline + period;
    if next < now { now + period } else { next }
}

/// Owner's handle on a running clock.
#[derive(Debug)]
pub struct ClockHandle {
    stop_tx: Sender<()>,
    join: JoinHandle<Plant>,
    shared: Arc<Shared>,
}

impl ClockHandle {
    pub fn plant_handle(&self) -> PlantHandle {
        PlantHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Stop after the tick in progress and hand the plant back.
    pub fn stop(self) -> SimResult<Plant> {
        // The clock may already have stopped by itself.
        let _ = self.stop_tx.send(());
        self.join.join().map_err(|_| SimError::Clock {
            what: "clock thread panicked",
        })
    }

    /// Wait for a clock started with `max_ticks` to finish.
    ///
    /// Blocks forever on a clock without a tick limit.
    pub fn join(self) -> SimResult<Plant> {
        let ClockHandle { stop_tx, join, .. } = self;
        let plant = join.join().map_err(|_| SimError::Clock {
            what: "clock thread panicked",
        });
        drop(stop_tx);
        plant
    }
}

/// Cloneable access to a running plant for readers and command sources.
#[derive(Debug, Clone)]
pub struct PlantHandle {
    shared: Arc<Shared>,
}

impl PlantHandle {
    pub fn topology(&self) -> &PlantTopology {
        &self.shared.topology
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Stage a new outlet opening for the next tick.
    pub fn apply_command(&self, station: &str, tank: &str, fraction: f64) -> SimResult<()> {
        self.submit(station, tank, Action::SetOpening(fraction))
    }

    pub fn submit(&self, station: &str, tank: &str, action: Action) -> SimResult<()> {
        let command = self
            .shared
            .topology
            .command(station, tank, action)
            .inspect_err(|e| warn!(error = %e, "command rejected"))?;
        self.shared
            .staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
        info!(station, tank, ?action, "command staged");
        Ok(())
    }

    /// Commands staged but not yet picked up by the clock.
    pub fn staged_commands(&self) -> usize {
        self.shared
            .staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Last published snapshot.
    pub fn snapshot(&self) -> Arc<PlantSnapshot> {
        Arc::clone(
            &self
                .shared
                .published
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Last published snapshot, or `None` if the clock is publishing right now.
    pub fn try_snapshot(&self) -> Option<Arc<PlantSnapshot>> {
        match self.shared.published.try_read() {
            Ok(guard) => Some(Arc::clone(&guard)),
            Err(TryLockError::Poisoned(e)) => Some(Arc::clone(&e.into_inner())),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    pub fn read_state(&self, station: &str, tank: &str) -> SimResult<TankReading> {
        read_reading(&self.shared.topology, &self.snapshot(), station, tank)
    }

    /// Like [`Self::read_state`] but never waits; `Ok(None)` means the
    /// snapshot was being replaced.
    pub fn try_read_state(&self, station: &str, tank: &str) -> SimResult<Option<TankReading>> {
        self.shared.topology.resolve(station, tank)?;
        self.try_snapshot()
            .map(|snap| read_reading(&self.shared.topology, &snap, station, tank))
            .transpose()
    }

    pub fn read_field(&self, address: &TankAddress) -> SimResult<FieldValue> {
        let reading = self.read_state(&address.station, &address.tank)?;
        Ok(FieldValue::from_reading(
            &reading,
            address.field.unwrap_or(Field::Level),
        ))
    }

    pub fn device_names(&self, prefix: &str) -> Vec<String> {
        self.shared.topology.device_names(prefix)
    }
}

//! Discrete-time simulation of a paint-mixing plant.
//!
//! Provides:
//! - Stations of five supply tanks wired into one mixing tank
//! - A plant advancing independent stations tick by tick
//! - Staged operator commands applied only at tick boundaries
//! - Consistent per-tick snapshots, level alarms and device addressing
//! - A fixed-interval clock thread and a deterministic batch runner
//!
//! # Example
//!
//! ```
//! use pf_sim::{Plant, StationTemplate};
//!
//! let station = StationTemplate::default().build("station1").unwrap();
//! let mut plant = Plant::new("demo", vec![station]).unwrap();
//!
//! plant.apply_command("station1", "cyan", 1.0).unwrap();
//! plant.apply_command("station1", "yellow", 1.0).unwrap();
//! plant.run_tick(1.0).unwrap();
//!
//! let mixer = plant.read_state("station1", "mixer").unwrap();
//! assert!((mixer.level - 2.0).abs() < 1e-9);
//! ```

pub mod address;
pub mod alarm;
pub mod clock;
pub mod command;
pub mod error;
pub mod plant;
pub mod sim;
pub mod snapshot;
pub mod station;
pub mod topology;

// Re-exports for public API
pub use address::{Field, FieldValue, TankAddress};
pub use alarm::{AlarmKind, AlarmLog, AlarmThresholds, LevelAlarm};
pub use clock::{ClockHandle, ClockOptions, PlantHandle, SimulationClock};
pub use command::{Action, Applied, Command, CommandQueue, Target};
pub use error::{SimError, SimResult};
pub use plant::{Plant, TickMode, TickReport};
pub use sim::{RunOptions, RunRecord, ScheduledCommand, run_ticks};
pub use snapshot::{PlantSnapshot, StationSnapshot, TankReading};
pub use station::{Station, StationTemplate, StationTick, TankKey, Wiring};
pub use topology::PlantTopology;

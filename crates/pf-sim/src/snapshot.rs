//! Readings published after each completed tick.

use crate::command::Target;
use crate::error::{SimError, SimResult};
use crate::station::{Station, TankKey};
use crate::topology::PlantTopology;
use pf_components::{FlowControl, Tank};
use pf_pigments::PigmentMix;
use serde::Serialize;

/// State of one tank at a tick boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankReading {
    pub tank: String,
    /// Volume held (litres)
    pub level: f64,
    /// Capacity (litres)
    pub capacity: f64,
    /// `level / capacity`, in [0, 1]
    pub capacity_fraction: f64,
    /// Average outflow rate over the last tick (l/s)
    pub outflow: f64,
    /// Volume that left during the last tick (litres)
    pub outflow_volume: f64,
    /// Valve position or pump speed
    pub open_fraction: f64,
    pub color: PigmentMix,
    /// Rendered colour, `#rrggbb`
    pub color_hex: String,
}

impl TankReading {
    pub fn capture(key: TankKey, tank: &Tank) -> Self {
        Self {
            tank: key.name().to_string(),
            level: tank.level(),
            capacity: tank.capacity(),
            capacity_fraction: tank.level_fraction(),
            outflow: tank.last_outflow_rate(),
            outflow_volume: tank.last_outflow(),
            open_fraction: tank.outlet().open_fraction(),
            color: tank.color().clone(),
            color_hex: tank.color().to_hex(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSnapshot {
    pub name: String,
    /// In [`TankKey::ALL`] order
    pub tanks: Vec<TankReading>,
}

impl StationSnapshot {
    pub fn capture(station: &Station) -> Self {
        Self {
            name: station.name().to_string(),
            tanks: station
                .tanks()
                .map(|(key, tank)| TankReading::capture(key, tank))
                .collect(),
        }
    }

    pub fn reading(&self, key: TankKey) -> Option<&TankReading> {
        self.tanks.get(key.slot())
    }
}

/// Consistent view of the whole plant between two ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantSnapshot {
    pub plant: String,
    /// Number of completed ticks
    pub tick: u64,
    /// Simulated time (seconds)
    pub time_s: f64,
    pub stations: Vec<StationSnapshot>,
}

impl PlantSnapshot {
    pub fn capture(plant: &str, tick: u64, time_s: f64, stations: &[Station]) -> Self {
        Self {
            plant: plant.to_string(),
            tick,
            time_s,
            stations: stations.iter().map(StationSnapshot::capture).collect(),
        }
    }

    pub fn reading(&self, target: Target) -> Option<&TankReading> {
        self.stations
            .get(target.station.slot())
            .and_then(|s| s.reading(target.tank))
    }

    /// Look a reading up by names.
    pub fn find(&self, station: &str, tank: &str) -> Option<&TankReading> {
        let key = TankKey::parse(tank)?;
        self.stations
            .iter()
            .find(|s| s.name == station)
            .and_then(|s| s.reading(key))
    }
}

/// Resolve names through `topology` and copy the reading out of `snapshot`.
pub(crate) fn read_reading(
    topology: &PlantTopology,
    snapshot: &PlantSnapshot,
    station: &str,
    tank: &str,
) -> SimResult<TankReading> {
    let target = topology.resolve(station, tank)?;
    snapshot
        .reading(target)
        .cloned()
        .ok_or_else(|| SimError::UnknownTarget {
            station: station.to_string(),
            tank: tank.to_string(),
        })
}

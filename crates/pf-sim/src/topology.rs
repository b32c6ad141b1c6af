//! Immutable plant topology: station names and tank addressing.

use crate::command::{Action, Command, Target};
use crate::error::{SimError, SimResult};
use crate::station::{Station, TankKey};
use pf_core::ids::StationId;
use std::collections::HashMap;

/// Station names and their ids, fixed for the lifetime of a plant.
///
/// Shared read-only with external collaborators so commands can be resolved
/// and validated without touching live simulation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantTopology {
    stations: Vec<String>,
    index: HashMap<String, StationId>,
}

impl PlantTopology {
    /// # Errors
    /// Rejects an empty station list and duplicate station names.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> SimResult<Self> {
        let mut stations = Vec::new();
        let mut index = HashMap::new();
        for name in names {
            let id = u32::try_from(stations.len())
                .ok()
                .and_then(StationId::from_index)
                .ok_or(SimError::InvalidArg {
                    what: "too many stations",
                })?;
            if index.insert(name.to_string(), id).is_some() {
                return Err(SimError::Topology {
                    what: format!("duplicate station name {name}"),
                });
            }
            stations.push(name.to_string());
        }
        if stations.is_empty() {
            return Err(SimError::InvalidArg {
                what: "plant needs at least one station",
            });
        }
        Ok(Self { stations, index })
    }

    pub(crate) fn from_stations(stations: &[Station]) -> SimResult<Self> {
        Self::new(stations.iter().map(Station::name))
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn station_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stations.iter().map(String::as_str)
    }

    pub fn station_name(&self, id: StationId) -> Option<&str> {
        self.stations.get(id.slot()).map(String::as_str)
    }

    pub fn station_id(&self, name: &str) -> Option<StationId> {
        self.index.get(name).copied()
    }

    /// Resolve `(station, tank)` names.
    ///
    /// # Errors
    /// `UnknownTarget` when either name does not exist.
    pub fn resolve(&self, station: &str, tank: &str) -> SimResult<Target> {
        let unknown = || SimError::UnknownTarget {
            station: station.to_string(),
            tank: tank.to_string(),
        };
        let station_id = self.station_id(station).ok_or_else(unknown)?;
        let tank = TankKey::parse(tank).ok_or_else(unknown)?;
        Ok(Target {
            station: station_id,
            tank,
        })
    }

    /// Resolve and validate a command.
    ///
    /// # Errors
    /// `UnknownTarget` for a bad address, then `InvalidCommand` for an
    /// action the addressed tank cannot take.
    pub fn command(&self, station: &str, tank: &str, action: Action) -> SimResult<Command> {
        let target = self.resolve(station, tank)?;
        action
            .check(target.tank)
            .map_err(|reason| SimError::InvalidCommand {
                station: station.to_string(),
                tank: tank.to_string(),
                reason,
            })?;
        Ok(Command { target, action })
    }

    /// Every device name `<prefix>/<station>/<tank>`, station by station.
    pub fn device_names(&self, prefix: &str) -> Vec<String> {
        self.stations
            .iter()
            .flat_map(|station| {
                TankKey::ALL
                    .into_iter()
                    .map(move |tank| format!("{prefix}/{station}/{tank}"))
            })
            .collect()
    }
}

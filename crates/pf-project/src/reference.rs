//! The reference deployment: six identical stations.

use crate::schema::{ClockDef, LATEST_VERSION, MixerDef, PlantDef, StationDef, SupplyTankDef};
use pf_pigments::Pigment;

/// Number of stations in the reference deployment.
pub const REFERENCE_STATIONS: usize = 6;

/// A station with full supply tanks, closed valves and an empty mixer.
pub fn reference_station(name: impl Into<String>) -> StationDef {
    StationDef {
        name: name.into(),
        supplies: Pigment::ALL
            .into_iter()
            .map(|pigment| SupplyTankDef {
                pigment,
                capacity_l: 100.0,
                level_l: 100.0,
                valve_max_flow_lps: 1.0,
                valve_open: 0.0,
            })
            .collect(),
        mixer: MixerDef {
            capacity_l: 200.0,
            level_l: 0.0,
            color: Vec::new(),
            pump_max_flow_lps: 2.0,
            pump_speed: 0.0,
        },
        wiring: None,
    }
}

/// Stations `station1`..`station6`, ticking once a second.
pub fn reference_plant() -> PlantDef {
    PlantDef {
        version: LATEST_VERSION,
        name: "Paint mixing plant".to_string(),
        prefix: "epfl".to_string(),
        clock: ClockDef::default(),
        stations: (1..=REFERENCE_STATIONS)
            .map(|i| reference_station(format!("station{i}")))
            .collect(),
        schedule: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_shape() {
        let plant = reference_plant();
        assert_eq!(plant.stations.len(), REFERENCE_STATIONS);
        assert_eq!(plant.stations[5].name, "station6");
        assert_eq!(plant.clock.period_s, 1.0);
        assert_eq!(plant.clock.dt_s, 1.0);
        for station in &plant.stations {
            assert_eq!(station.supplies.len(), Pigment::COUNT);
            assert!(station.supplies.iter().all(|s| s.level_l == s.capacity_l));
            assert_eq!(station.mixer.level_l, 0.0);
        }
    }
}

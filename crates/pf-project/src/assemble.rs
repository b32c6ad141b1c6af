//! Turning a validated plant file into a runnable plant.

use crate::ProjectResult;
use crate::schema::{MixerDef, PlantDef, StationDef, SupplyTankDef};
use crate::validate::{ValidationError, validate_plant};
use pf_components::{Outlet, Pump, Tank, Valve};
use pf_core::units::{liters, lps};
use pf_pigments::{Pigment, PigmentMix};
use pf_sim::{ClockOptions, Plant, ScheduledCommand, SimResult, Station, Wiring};
use std::time::Duration;
use tracing::info;

/// Validate `def` and build the plant it describes.
pub fn build_plant(def: &PlantDef) -> ProjectResult<Plant> {
    validate_plant(def)?;
    let stations = def
        .stations
        .iter()
        .map(build_station)
        .collect::<SimResult<Vec<_>>>()?;
    let plant = Plant::new(def.name.clone(), stations)?.with_tick_mode(def.clock.tick_mode);
    info!(
        plant = plant.name(),
        stations = plant.stations().len(),
        "plant built"
    );
    Ok(plant)
}

fn build_station(def: &StationDef) -> SimResult<Station> {
    let supplies = def
        .supplies
        .iter()
        .map(|s| Ok((s.pigment, build_supply(s)?)))
        .collect::<SimResult<Vec<(Pigment, Tank)>>>()?;
    let mixer = build_mixer(&def.mixer)?;
    let wiring = match &def.wiring {
        Some(routes) => Wiring::new(routes.iter().map(|r| (r.pigment, r.inlet)))?,
        None => Wiring::standard(),
    };
    Station::new(def.name.clone(), supplies, mixer, wiring)
}

fn build_supply(def: &SupplyTankDef) -> SimResult<Tank> {
    let name = def.pigment.key();
    let valve = Valve::new(name, lps(def.valve_max_flow_lps), def.valve_open)?;
    Ok(Tank::new(
        name,
        liters(def.capacity_l),
        liters(def.level_l),
        PigmentMix::pure(def.pigment),
        Outlet::Valve(valve),
    )?)
}

fn build_mixer(def: &MixerDef) -> SimResult<Tank> {
    let color = if def.color.is_empty() {
        PigmentMix::empty()
    } else {
        PigmentMix::new_fractions(def.color.iter().map(|s| (s.pigment, s.fraction)).collect())?
    };
    let pump = Pump::new("mixer", lps(def.pump_max_flow_lps), def.pump_speed)?;
    Ok(Tank::new(
        "mixer",
        liters(def.capacity_l),
        liters(def.level_l),
        color,
        Outlet::Pump(pump),
    )?)
}

/// Real-time clock settings from the file.
///
/// # Errors
/// `InvalidValue` when `clock.period_s` is not a usable wall-clock period.
pub fn clock_options(def: &PlantDef) -> ProjectResult<ClockOptions> {
    let period_s = def.clock.period_s;
    let invalid = |reason: String| ValidationError::InvalidValue {
        field: "clock.period_s".to_string(),
        value: period_s.to_string(),
        reason,
    };
    let period = Duration::try_from_secs_f64(period_s).map_err(|e| invalid(e.to_string()))?;
    if period.is_zero() {
        return Err(invalid("rounds to zero".to_string()).into());
    }
    Ok(ClockOptions {
        period,
        dt: def.clock.dt_s,
        max_ticks: None,
    })
}

/// The file's batch schedule as runner input.
pub fn schedule(def: &PlantDef) -> Vec<ScheduledCommand> {
    def.schedule
        .iter()
        .map(|e| ScheduledCommand {
            tick: e.tick,
            station: e.station.clone(),
            tank: e.tank.clone(),
            action: e.action,
        })
        .collect()
}

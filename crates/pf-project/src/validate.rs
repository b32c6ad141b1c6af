//! Plant file validation logic.

use crate::schema::{
    LATEST_VERSION, MixerDef, PlantDef, ScheduleEntryDef, StationDef, SupplyTankDef,
};
use pf_pigments::Pigment;
use pf_sim::{Action, TankKey, Wiring};
use std::collections::HashSet;

/// Shortest wall-clock period a plant file may ask for (seconds).
pub const MIN_CLOCK_PERIOD_S: f64 = 1e-3;
/// Longest wall-clock period a plant file may ask for (seconds).
pub const MAX_CLOCK_PERIOD_S: f64 = 3600.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: String, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn fraction(field: String, value: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, value, "must lie in [0, 1]"))
    }
}

fn level(field: String, level: f64, capacity: f64) -> Result<(), ValidationError> {
    if level.is_finite() && (0.0..=capacity).contains(&level) {
        Ok(())
    } else {
        Err(invalid(field, level, "must lie in [0, capacity]"))
    }
}

pub fn validate_plant(plant: &PlantDef) -> Result<(), ValidationError> {
    if plant.version == 0 || plant.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: plant.version,
        });
    }
    if plant.prefix.is_empty() || plant.prefix.contains('/') {
        return Err(invalid("prefix", &plant.prefix, "must be one non-empty segment"));
    }

    positive("clock.period_s".to_string(), plant.clock.period_s)?;
    if !(MIN_CLOCK_PERIOD_S..=MAX_CLOCK_PERIOD_S).contains(&plant.clock.period_s) {
        return Err(invalid(
            "clock.period_s",
            plant.clock.period_s,
            "must lie between 1 ms and 1 h",
        ));
    }
    positive("clock.dt_s".to_string(), plant.clock.dt_s)?;

    if plant.stations.is_empty() {
        return Err(invalid("stations", "[]", "a plant needs at least one station"));
    }
    let mut names = HashSet::new();
    for station in &plant.stations {
        if !names.insert(station.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: station.name.clone(),
                context: "stations".to_string(),
            });
        }
        validate_station(station)?;
    }

    for (i, entry) in plant.schedule.iter().enumerate() {
        validate_schedule_entry(i, entry, &names)?;
    }

    Ok(())
}

fn validate_station(station: &StationDef) -> Result<(), ValidationError> {
    if station.name.is_empty() || station.name.contains('/') {
        return Err(invalid(
            "station name",
            &station.name,
            "must be one non-empty segment",
        ));
    }

    let mut seen = HashSet::new();
    for supply in &station.supplies {
        if !seen.insert(supply.pigment) {
            return Err(ValidationError::DuplicateId {
                id: supply.pigment.to_string(),
                context: format!("station '{}' supplies", station.name),
            });
        }
        validate_supply(&station.name, supply)?;
    }
    for pigment in Pigment::ALL {
        if !seen.contains(&pigment) {
            return Err(ValidationError::MissingReference {
                id: pigment.to_string(),
                context: format!("station '{}' supplies", station.name),
            });
        }
    }

    validate_mixer(&station.name, &station.mixer)?;

    if let Some(routes) = &station.wiring {
        Wiring::new(routes.iter().map(|r| (r.pigment, r.inlet))).map_err(|e| {
            invalid(
                format!("{}.wiring", station.name),
                format!("{} routes", routes.len()),
                &e.to_string(),
            )
        })?;
    }

    Ok(())
}

fn validate_supply(station: &str, supply: &SupplyTankDef) -> Result<(), ValidationError> {
    let at = |field: &str| format!("{station}/{}.{field}", supply.pigment);
    positive(at("capacity_l"), supply.capacity_l)?;
    level(at("level_l"), supply.level_l, supply.capacity_l)?;
    positive(at("valve_max_flow_lps"), supply.valve_max_flow_lps)?;
    fraction(at("valve_open"), supply.valve_open)
}

fn validate_mixer(station: &str, mixer: &MixerDef) -> Result<(), ValidationError> {
    let at = |field: &str| format!("{station}/mixer.{field}");
    positive(at("capacity_l"), mixer.capacity_l)?;
    level(at("level_l"), mixer.level_l, mixer.capacity_l)?;
    positive(at("pump_max_flow_lps"), mixer.pump_max_flow_lps)?;
    fraction(at("pump_speed"), mixer.pump_speed)?;

    for share in &mixer.color {
        if !(share.fraction.is_finite() && share.fraction >= 0.0) {
            return Err(invalid(at("color"), share.fraction, "fractions must be non-negative"));
        }
    }
    let total: f64 = mixer.color.iter().map(|s| s.fraction).sum();
    if mixer.level_l > 0.0 && total <= 0.0 {
        return Err(invalid(
            at("color"),
            "none",
            "a mixer holding paint needs a colour",
        ));
    }
    Ok(())
}

fn validate_schedule_entry(
    index: usize,
    entry: &ScheduleEntryDef,
    stations: &HashSet<&str>,
) -> Result<(), ValidationError> {
    let context = format!("schedule[{index}]");
    if !stations.contains(entry.station.as_str()) {
        return Err(ValidationError::MissingReference {
            id: entry.station.clone(),
            context,
        });
    }
    let Some(tank) = TankKey::parse(&entry.tank) else {
        return Err(ValidationError::MissingReference {
            id: entry.tank.clone(),
            context,
        });
    };
    if let Err(reason) = entry.action.check(tank) {
        let value = match entry.action {
            Action::SetOpening(x) => x.to_string(),
            Action::Fill => "fill".to_string(),
            Action::Flush => "flush".to_string(),
        };
        return Err(invalid(format!("{context}.action"), value, &reason));
    }
    Ok(())
}

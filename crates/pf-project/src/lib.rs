//! pf-project: plant file format, validation and plant assembly.

pub mod assemble;
pub mod reference;
pub mod schema;
pub mod validate;

pub use assemble::{build_plant, clock_options, schedule};
pub use reference::{REFERENCE_STATIONS, reference_plant, reference_station};
pub use schema::*;
pub use validate::{MAX_CLOCK_PERIOD_S, MIN_CLOCK_PERIOD_S, ValidationError, validate_plant};

use pf_sim::SimError;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<PlantDef> {
    let content = std::fs::read_to_string(path)?;
    let plant: PlantDef = serde_yaml::from_str(&content)?;
    validate_plant(&plant)?;
    Ok(plant)
}

pub fn save_yaml(path: &std::path::Path, plant: &PlantDef) -> ProjectResult<()> {
    validate_plant(plant)?;
    let content = serde_yaml::to_string(plant)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<PlantDef> {
    let content = std::fs::read_to_string(path)?;
    let plant: PlantDef = serde_json::from_str(&content)?;
    validate_plant(&plant)?;
    Ok(plant)
}

pub fn save_json(path: &std::path::Path, plant: &PlantDef) -> ProjectResult<()> {
    validate_plant(plant)?;
    let content = serde_json::to_string_pretty(plant)?;
    std::fs::write(path, content)?;
    Ok(())
}

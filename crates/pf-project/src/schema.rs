//! Plant file schema definitions.

use pf_pigments::Pigment;
use pf_sim::{Action, TickMode};
use serde::{Deserialize, Serialize};

/// Schema version written by this crate.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantDef {
    pub version: u32,
    pub name: String,
    /// First segment of every device name
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub clock: ClockDef,
    #[serde(default)]
    pub stations: Vec<StationDef>,
    /// Commands for batch runs, applied at the given tick boundaries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleEntryDef>,
}

fn default_prefix() -> String {
    "epfl".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClockDef {
    #[serde(default = "default_period_s")]
    pub period_s: f64,
    #[serde(default = "default_dt_s")]
    pub dt_s: f64,
    #[serde(default)]
    pub tick_mode: TickMode,
}

impl Default for ClockDef {
    fn default() -> Self {
        Self {
            period_s: default_period_s(),
            dt_s: default_dt_s(),
            tick_mode: TickMode::default(),
        }
    }
}

fn default_period_s() -> f64 {
    1.0
}

fn default_dt_s() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationDef {
    pub name: String,
    pub supplies: Vec<SupplyTankDef>,
    pub mixer: MixerDef,
    /// Explicit supply-to-inlet routes; every supply on its own inlet if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiring: Option<Vec<WiringDef>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplyTankDef {
    pub pigment: Pigment,
    pub capacity_l: f64,
    pub level_l: f64,
    pub valve_max_flow_lps: f64,
    #[serde(default)]
    pub valve_open: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MixerDef {
    pub capacity_l: f64,
    #[serde(default)]
    pub level_l: f64,
    /// Paint already in the mixer; required when `level_l > 0`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color: Vec<PigmentShareDef>,
    pub pump_max_flow_lps: f64,
    #[serde(default)]
    pub pump_speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PigmentShareDef {
    pub pigment: Pigment,
    pub fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WiringDef {
    pub pigment: Pigment,
    pub inlet: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleEntryDef {
    pub tick: u64,
    pub station: String,
    pub tank: String,
    pub action: Action,
}

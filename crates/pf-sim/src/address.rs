//! Device-name addressing: `<prefix>/<station>/<tank>[/<field>]`.

use crate::error::{SimError, SimResult};
use crate::snapshot::TankReading;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A readable attribute of a tank device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Level as a fraction of capacity
    Level,
    /// Outflow rate (l/s)
    Flow,
    /// Outlet opening
    Valve,
    /// Rendered colour, `#rrggbb`
    Color,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Level, Field::Flow, Field::Valve, Field::Color];

    pub fn name(self) -> &'static str {
        match self {
            Field::Level => "level",
            Field::Flow => "flow",
            Field::Valve => "valve",
            Field::Color => "color",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "level" => Some(Field::Level),
            "flow" | "outflow" => Some(Field::Flow),
            "valve" => Some(Field::Valve),
            "color" | "colour" => Some(Field::Color),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tank device, optionally narrowed to one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TankAddress {
    pub prefix: Option<String>,
    pub station: String,
    pub tank: String,
    pub field: Option<Field>,
}

impl TankAddress {
    pub fn new(station: impl Into<String>, tank: impl Into<String>) -> Self {
        Self {
            prefix: None,
            station: station.into(),
            tank: tank.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    /// Parse one of
    ///
    /// ```text
    /// station/tank
    /// station/tank/field
    /// prefix/station/tank
    /// prefix/station/tank/field
    /// ```
    ///
    /// A three-part name is read as `station/tank/field` when its last part
    /// is a field name.
    pub fn parse(text: &str) -> SimResult<Self> {
        let invalid = || SimError::InvalidAddress {
            text: text.to_string(),
        };
        let parts: Vec<&str> = text.trim().split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }

        let (prefix, station, tank, field) = match parts.as_slice() {
            [station, tank] => (None, *station, *tank, None),
            [a, b, c] => match Field::parse(c) {
                Some(field) => (None, *a, *b, Some(field)),
                None => (Some(*a), *b, *c, None),
            },
            [prefix, station, tank, field] => {
                let field = Field::parse(field).ok_or_else(invalid)?;
                (Some(*prefix), *station, *tank, Some(field))
            }
            _ => return Err(invalid()),
        };

        Ok(Self {
            prefix: prefix.map(str::to_string),
            station: station.to_string(),
            tank: tank.to_string(),
            field,
        })
    }
}

impl FromStr for TankAddress {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TankAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{prefix}/")?;
        }
        write!(f, "{}/{}", self.station, self.tank)?;
        if let Some(field) = self.field {
            write!(f, "/{field}")?;
        }
        Ok(())
    }
}

/// Value of one field of a tank reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Level(f64),
    Flow(f64),
    Valve(f64),
    Color(String),
}

impl FieldValue {
    pub fn from_reading(reading: &TankReading, field: Field) -> Self {
        match field {
            Field::Level => FieldValue::Level(reading.capacity_fraction),
            Field::Flow => FieldValue::Flow(reading.outflow),
            Field::Valve => FieldValue::Valve(reading.open_fraction),
            Field::Color => FieldValue::Color(reading.color_hex.clone()),
        }
    }

    /// Numeric value, for the fields that have one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Level(v) | FieldValue::Flow(v) | FieldValue::Valve(v) => Some(*v),
            FieldValue::Color(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Level(v) => write!(f, "{:.1} %", v * 100.0),
            FieldValue::Flow(v) => write!(f, "{v:.1} l/s"),
            FieldValue::Valve(v) => write!(f, "{v:.2}"),
            FieldValue::Color(hex) => f.write_str(hex),
        }
    }
}

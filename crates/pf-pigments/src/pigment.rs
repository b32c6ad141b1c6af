//! Base pigment definitions.

use crate::color::Rgb;
use crate::error::PigmentError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base pigments stocked by every mixing station, one per supply tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pigment {
    Cyan,
    Magenta,
    Yellow,
    /// Carbon black
    Black,
    /// Titanium white
    White,
}

impl Pigment {
    pub const COUNT: usize = 5;

    /// Supply order of a station: cyan, magenta, yellow, black, white.
    pub const ALL: [Pigment; Pigment::COUNT] = [
        Pigment::Cyan,
        Pigment::Magenta,
        Pigment::Yellow,
        Pigment::Black,
        Pigment::White,
    ];

    /// Position in [`Pigment::ALL`] and in fraction vectors.
    pub fn index(self) -> usize {
        match self {
            Pigment::Cyan => 0,
            Pigment::Magenta => 1,
            Pigment::Yellow => 2,
            Pigment::Black => 3,
            Pigment::White => 4,
        }
    }

    /// Canonical lowercase key, also used as the supply tank name.
    pub fn key(self) -> &'static str {
        match self {
            Pigment::Cyan => "cyan",
            Pigment::Magenta => "magenta",
            Pigment::Yellow => "yellow",
            Pigment::Black => "black",
            Pigment::White => "white",
        }
    }

    /// Diffuse reflectance of a full-strength layer, per RGB channel.
    ///
    /// These drive the Kubelka–Munk absorption/scattering ratios in
    /// [`crate::PigmentMix::to_rgb`].
    pub fn reflectance(self) -> Rgb {
        match self {
            Pigment::Cyan => Rgb::new(0.05, 0.75, 0.92),
            Pigment::Magenta => Rgb::new(0.85, 0.05, 0.55),
            Pigment::Yellow => Rgb::new(0.95, 0.88, 0.05),
            Pigment::Black => Rgb::new(0.03, 0.03, 0.03),
            Pigment::White => Rgb::new(0.95, 0.95, 0.95),
        }
    }
}

impl fmt::Display for Pigment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Pigment {
    type Err = PigmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cyan" | "c" => Ok(Pigment::Cyan),
            "magenta" | "m" => Ok(Pigment::Magenta),
            "yellow" | "y" => Ok(Pigment::Yellow),
            "black" | "k" => Ok(Pigment::Black),
            "white" | "w" => Ok(Pigment::White),
            _ => Err(PigmentError::UnknownPigment {
                name: s.to_string(),
            }),
        }
    }
}

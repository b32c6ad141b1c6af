//! Reflectance triples and the single-constant Kubelka–Munk transforms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower/upper reflectance bound; keeps K/S finite for ideal black/white.
const R_MIN: f64 = 1e-4;
const R_MAX: f64 = 1.0 - 1e-4;

/// Diffuse reflectance per channel, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Create a triple, clamping each channel into [0, 1].
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    pub fn channels(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    fn from_channels(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    /// `#rrggbb`, lowercase, as shown on the operator panels.
    pub fn to_hex(&self) -> String {
        let byte = |c: f64| (c * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Absorption/scattering ratio of an opaque layer with reflectance `r`.
///
/// ```text
/// K/S = (1 - R)^2 / (2 R)
/// ```
pub(crate) fn k_over_s(r: f64) -> f64 {
    let r = r.clamp(R_MIN, R_MAX);
    (1.0 - r).powi(2) / (2.0 * r)
}

/// Inverse of [`k_over_s`] for an opaque layer.
///
/// ```text
/// R = 1 + K/S - sqrt((K/S)^2 + 2 K/S)
/// ```
pub(crate) fn reflectance_from_ks(ks: f64) -> f64 {
    let ks = ks.max(0.0);
    (1.0 + ks - (ks * ks + 2.0 * ks).sqrt()).clamp(0.0, 1.0)
}

/// Render a set of `(reflectance, concentration)` layers mixed in one film.
///
/// K/S is additive in concentration, which is what makes the result
/// subtractive: cyan and yellow absorb red and blue respectively and the
/// mixture keeps only green.
pub(crate) fn kubelka_munk<I>(layers: I) -> Rgb
where
    I: IntoIterator<Item = (Rgb, f64)>,
{
    let mut ks = [0.0; 3];
    for (reflectance, concentration) in layers {
        for (acc, r) in ks.iter_mut().zip(reflectance.channels()) {
            *acc += concentration * k_over_s(r);
        }
    }
    Rgb::from_channels(ks.map(reflectance_from_ks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(Rgb::new(1.0, 0.0, 0.5).to_hex(), "#ff0080");
        assert_eq!(Rgb::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn kubelka_munk_inverse_round_trip() {
        for r in [0.05, 0.2, 0.5, 0.8, 0.95] {
            let back = reflectance_from_ks(k_over_s(r));
            assert!((back - r).abs() < 1e-12, "r={r} back={back}");
        }
    }

    #[test]
    fn no_absorber_is_white() {
        assert_eq!(kubelka_munk(std::iter::empty()), Rgb::WHITE);
    }

    #[test]
    fn new_clamps_channels() {
        let rgb = Rgb::new(-0.5, 2.0, 0.25);
        assert_eq!(rgb.channels(), [0.0, 1.0, 0.25]);
    }
}

//! Paint descriptor: a mixture of base pigments.

use crate::color::{Rgb, kubelka_munk};
use crate::error::{PigmentError, PigmentResult};
use crate::pigment::Pigment;
use pf_core::numeric::{Tolerances, nearly_equal};
use serde::{Deserialize, Serialize};

/// Fractions below this are dropped after normalization.
const NEGLIGIBLE: f64 = 1e-15;

/// Paint defined by normalized volume fractions of the base pigments.
///
/// A non-empty mix always sums to 1.0. The empty mix (no pigment at all)
/// stands for an unpainted vessel and renders as the white substrate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PigmentMix {
    fractions: [f64; Pigment::COUNT],
}

impl Default for PigmentMix {
    fn default() -> Self {
        Self::empty()
    }
}

impl PigmentMix {
    /// Mix with no pigment.
    pub fn empty() -> Self {
        Self {
            fractions: [0.0; Pigment::COUNT],
        }
    }

    /// Single-pigment paint, as stocked in a supply tank.
    pub fn pure(pigment: Pigment) -> Self {
        let mut fractions = [0.0; Pigment::COUNT];
        fractions[pigment.index()] = 1.0;
        Self { fractions }
    }

    /// Create a mix from volume fractions.
    ///
    /// Validates that all fractions are finite, non-negative, and have a positive sum,
    /// then normalizes to sum=1. Repeated pigments accumulate.
    pub fn new_fractions(fractions: Vec<(Pigment, f64)>) -> PigmentResult<Self> {
        if fractions.is_empty() {
            return Err(PigmentError::InvalidArg {
                what: "empty pigment list",
            });
        }

        let mut raw = [0.0; Pigment::COUNT];
        for (pigment, frac) in fractions {
            if !frac.is_finite() {
                return Err(PigmentError::NonPhysical {
                    what: "non-finite pigment fraction",
                });
            }
            if frac < 0.0 {
                return Err(PigmentError::NonPhysical {
                    what: "negative pigment fraction",
                });
            }
            raw[pigment.index()] += frac;
        }

        Self::normalized(raw).ok_or(PigmentError::NonPhysical {
            what: "pigment fractions sum to zero or non-finite",
        })
    }

    /// Normalize raw non-negative weights; `None` if nothing is left.
    pub(crate) fn normalized(raw: [f64; Pigment::COUNT]) -> Option<Self> {
        let sum: f64 = raw.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return None;
        }
        let mut fractions = raw.map(|f| f / sum);
        for f in &mut fractions {
            if *f <= NEGLIGIBLE {
                *f = 0.0;
            }
        }
        Some(Self { fractions })
    }

    /// Volume fraction of a pigment (0.0 if absent).
    pub fn fraction(&self, pigment: Pigment) -> f64 {
        self.fractions[pigment.index()]
    }

    /// Raw fraction vector in [`Pigment::ALL`] order.
    pub fn fractions(&self) -> &[f64; Pigment::COUNT] {
        &self.fractions
    }

    /// True for the pigment-free mix.
    pub fn is_empty(&self) -> bool {
        self.fractions.iter().all(|f| *f == 0.0)
    }

    /// Returns `Some(pigment)` if exactly one pigment has fraction ≈1.0.
    pub fn is_pure(&self) -> Option<Pigment> {
        let tol = Tolerances {
            abs: 1e-10,
            rel: 1e-10,
        };
        Pigment::ALL
            .into_iter()
            .find(|p| nearly_equal(self.fraction(*p), 1.0, tol))
    }

    /// Iterate over pigments with non-zero fraction.
    pub fn iter(&self) -> impl Iterator<Item = (Pigment, f64)> + '_ {
        Pigment::ALL
            .into_iter()
            .map(|p| (p, self.fraction(p)))
            .filter(|(_, f)| *f > 0.0)
    }

    /// Approximate equality within `tol`, pigment by pigment.
    pub fn approx_eq(&self, other: &Self, tol: Tolerances) -> bool {
        self.fractions
            .iter()
            .zip(other.fractions.iter())
            .all(|(a, b)| nearly_equal(*a, *b, tol))
    }

    /// Rendered colour of an opaque film of this paint.
    pub fn to_rgb(&self) -> Rgb {
        kubelka_munk(self.iter().map(|(p, f)| (p.reflectance(), f)))
    }

    /// `#rrggbb` of [`Self::to_rgb`].
    pub fn to_hex(&self) -> String {
        self.to_rgb().to_hex()
    }
}

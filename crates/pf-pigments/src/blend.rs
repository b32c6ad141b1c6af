//! Volume-weighted blending of paint portions.
//!
//! Blending averages pigment fraction vectors by volume. Contributions are
//! summed in a canonical order, so the result is bit-for-bit independent of
//! the order in which valves report their inflow.

use crate::mix::PigmentMix;
use crate::pigment::Pigment;
use std::cmp::Ordering;

/// A volume of paint of a given mix.
#[derive(Debug, Clone, Copy)]
pub struct Portion<'a> {
    pub mix: &'a PigmentMix,
    /// Volume in litres; non-positive or non-finite volumes carry no weight.
    pub volume: f64,
}

impl<'a> Portion<'a> {
    pub fn new(mix: &'a PigmentMix, volume: f64) -> Self {
        Self { mix, volume }
    }

    fn weight(&self) -> f64 {
        if self.volume.is_finite() && self.volume > 0.0 {
            self.volume
        } else {
            0.0
        }
    }
}

/// Total order over weighted contributions used to fix summation order.
fn canonical(a: &(f64, [f64; Pigment::COUNT]), b: &(f64, [f64; Pigment::COUNT])) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| {
        a.1.iter()
            .zip(b.1.iter())
            .map(|(x, y)| x.total_cmp(y))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Mix any number of portions into one descriptor.
///
/// Returns the empty mix when no portion carries both volume and pigment.
pub fn mix_portions(portions: &[Portion<'_>]) -> PigmentMix {
    let mut weighted: Vec<(f64, [f64; Pigment::COUNT])> = portions
        .iter()
        .map(|p| (p.weight(), *p.mix.fractions()))
        .filter(|(w, _)| *w > 0.0)
        .collect();
    weighted.sort_by(canonical);

    let mut acc = [0.0; Pigment::COUNT];
    for (w, fractions) in &weighted {
        for (a, f) in acc.iter_mut().zip(fractions.iter()) {
            *a += w * f;
        }
    }

    PigmentMix::normalized(acc).unwrap_or_default()
}

/// New colour of a vessel after `incoming` portions enter it.
///
/// `resident` is the paint already in the vessel, weighted by its pre-tick
/// level. With no incoming volume the resident mix is returned unchanged.
pub fn blend(resident: Portion<'_>, incoming: &[Portion<'_>]) -> PigmentMix {
    let incoming_volume: f64 = incoming.iter().map(Portion::weight).sum();
    if incoming_volume <= 0.0 {
        return resident.mix.clone();
    }

    let mut all = Vec::with_capacity(incoming.len() + 1);
    all.push(resident);
    all.extend_from_slice(incoming);
    mix_portions(&all)
}

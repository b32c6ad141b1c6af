// pf-core/src/units.rs

use uom::si::f64::{Volume as UomVolume, VolumeRate as UomVolumeRate};

// Public canonical unit types (SI, f64)
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn liters(v: f64) -> Volume {
    use uom::si::volume::liter;
    Volume::new::<liter>(v)
}

#[inline]
pub fn lps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::liter_per_second;
    VolumeRate::new::<liter_per_second>(v)
}

/// Plain litres, the storage unit of the simulation state.
#[inline]
pub fn as_liters(v: Volume) -> f64 {
    use uom::si::volume::liter;
    v.get::<liter>()
}

/// Plain litres per second.
#[inline]
pub fn as_lps(v: VolumeRate) -> f64 {
    use uom::si::volume_rate::liter_per_second;
    v.get::<liter_per_second>()
}

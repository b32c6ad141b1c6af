//! Core traits for outlet models.

use crate::error::ComponentResult;
use crate::pump::Pump;
use crate::valve::Valve;

/// A controllable outlet characterized by an open fraction and a maximum flow rate.
///
/// Outlets are deterministic functions of their setting: the flow they
/// request depends on nothing but `open_fraction` and `max_flow_lps`.
pub trait FlowControl: Send + Sync {
    /// Outlet name for debugging and identification.
    fn name(&self) -> &str;

    /// Current opening in [0, 1].
    fn open_fraction(&self) -> f64;

    /// Nominal flow when fully open (litres per second).
    fn max_flow_lps(&self) -> f64;

    /// Change the opening.
    ///
    /// Values outside [0, 1] are rejected with `InvalidCommand` and the
    /// previous setting is kept.
    fn set_open_fraction(&mut self, fraction: f64) -> ComponentResult<()>;

    /// Instantaneous flow rate for the current setting (litres per second).
    ///
    /// ```text
    /// q = open_fraction * max_flow
    /// ```
    fn instant_flow(&self) -> f64 {
        self.open_fraction() * self.max_flow_lps()
    }

    /// Volume the outlet would pass over `dt` seconds, ignoring supply.
    fn requested_volume(&self, dt: f64) -> f64 {
        if dt.is_finite() && dt > 0.0 {
            self.instant_flow() * dt
        } else {
            0.0
        }
    }
}

/// The outlet fitted to a tank: a valve on supply tanks, a pump on the mixer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outlet {
    Valve(Valve),
    Pump(Pump),
}

impl Outlet {
    fn inner(&self) -> &dyn FlowControl {
        match self {
            Outlet::Valve(v) => v,
            Outlet::Pump(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FlowControl {
        match self {
            Outlet::Valve(v) => v,
            Outlet::Pump(p) => p,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outlet::Valve(_) => "valve",
            Outlet::Pump(_) => "pump",
        }
    }
}

impl FlowControl for Outlet {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn open_fraction(&self) -> f64 {
        self.inner().open_fraction()
    }

    fn max_flow_lps(&self) -> f64 {
        self.inner().max_flow_lps()
    }

    fn set_open_fraction(&mut self, fraction: f64) -> ComponentResult<()> {
        self.inner_mut().set_open_fraction(fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::units::lps;

    #[test]
    fn outlet_delegates_to_inner() {
        let mut outlet = Outlet::Pump(Pump::new("drain", lps(4.0), 0.25).unwrap());
        assert_eq!(outlet.kind(), "pump");
        assert_eq!(outlet.name(), "drain");
        assert!((outlet.instant_flow() - 1.0).abs() < 1e-12);

        outlet.set_open_fraction(1.0).unwrap();
        assert!((outlet.instant_flow() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn requested_volume_ignores_bad_dt() {
        let valve = Valve::new("v", lps(1.0), 1.0).unwrap();
        assert!((valve.requested_volume(2.0) - 2.0).abs() < 1e-12);
        assert_eq!(valve.requested_volume(0.0), 0.0);
        assert_eq!(valve.requested_volume(f64::NAN), 0.0);
    }
}

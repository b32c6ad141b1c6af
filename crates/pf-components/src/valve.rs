//! Valve component with open-fraction control.

use crate::common::{check_command_fraction, check_finite};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::FlowControl;
use pf_core::units::{VolumeRate, as_lps};

/// Variable-opening valve on a supply tank outlet.
///
/// Flow is linear in the opening: a half-open valve passes half the nominal rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Valve {
    name: String,
    /// Flow when fully open (l/s)
    max_flow: f64,
    /// Valve position: 0.0 (closed) to 1.0 (fully open)
    open_fraction: f64,
}

impl Valve {
    /// Create a new valve.
    ///
    /// # Errors
    /// Returns error if `max_flow` is not positive or `open_fraction` is outside [0, 1].
    pub fn new(
        name: impl Into<String>,
        max_flow: VolumeRate,
        open_fraction: f64,
    ) -> ComponentResult<Self> {
        let max_flow = as_lps(max_flow);
        check_finite(max_flow, "valve max flow")?;
        if max_flow <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "valve max flow must be positive",
            });
        }
        let open_fraction = check_command_fraction(open_fraction, "valve open fraction")?;

        Ok(Self {
            name: name.into(),
            max_flow,
            open_fraction,
        })
    }
}

impl FlowControl for Valve {
    fn name(&self) -> &str {
        &self.name
    }

    fn open_fraction(&self) -> f64 {
        self.open_fraction
    }

    fn max_flow_lps(&self) -> f64 {
        self.max_flow
    }

    fn set_open_fraction(&mut self, fraction: f64) -> ComponentResult<()> {
        self.open_fraction = check_command_fraction(fraction, "valve open fraction")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::units::lps;

    #[test]
    fn valve_closed_zero_flow() {
        let valve = Valve::new("test", lps(3.0), 0.0).unwrap();
        assert_eq!(valve.instant_flow(), 0.0);
    }

    #[test]
    fn valve_position_monotonic() {
        let mut valve = Valve::new("test", lps(3.0), 0.0).unwrap();
        let mut prev = -1.0;
        for pos in [0.0, 0.25, 0.5, 0.75, 1.0] {
            valve.set_open_fraction(pos).unwrap();
            let q = valve.instant_flow();
            assert!(q > prev, "Flow should increase with position");
            prev = q;
        }
        assert!((prev - 3.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_command_keeps_previous_setting() {
        let mut valve = Valve::new("test", lps(1.0), 0.4).unwrap();
        let err = valve.set_open_fraction(1.5).unwrap_err();
        assert!(matches!(err, ComponentError::InvalidCommand { value, .. } if value == 1.5));
        assert_eq!(valve.open_fraction(), 0.4);

        assert!(valve.set_open_fraction(-0.1).is_err());
        assert!(valve.set_open_fraction(f64::NAN).is_err());
        assert_eq!(valve.open_fraction(), 0.4);
    }

    #[test]
    fn invalid_construction() {
        assert!(Valve::new("v", lps(0.0), 0.0).is_err());
        assert!(Valve::new("v", lps(-1.0), 0.0).is_err());
        assert!(Valve::new("v", lps(1.0), 2.0).is_err());
    }
}

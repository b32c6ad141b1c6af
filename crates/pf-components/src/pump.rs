//! Pump component model.

use crate::common::{check_command_fraction, check_finite};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::FlowControl;
use pf_core::units::{VolumeRate, as_lps};

/// Variable-speed drain pump on the mixing tank.
///
/// ## Model
///
/// The pump is a positive displacement unit: delivered flow is proportional
/// to the commanded speed fraction,
///
/// ```text
/// q = speed * max_flow
/// ```
///
/// and is limited downstream by whatever the tank actually holds. An on/off
/// pump is the special case of commanding only 0.0 or 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Pump {
    name: String,
    /// Delivered flow at full speed (l/s)
    max_flow: f64,
    /// Commanded speed fraction [0, 1]
    speed: f64,
}

impl Pump {
    /// Create a new pump.
    ///
    /// # Arguments
    /// * `name` - Component identifier
    /// * `max_flow` - Delivered flow at full speed
    /// * `speed` - Initial speed fraction (0 = stopped)
    ///
    /// # Errors
    /// Returns error if parameters are out of physical bounds.
    pub fn new(name: impl Into<String>, max_flow: VolumeRate, speed: f64) -> ComponentResult<Self> {
        let max_flow = as_lps(max_flow);
        check_finite(max_flow, "pump max flow")?;
        if max_flow <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "pump max flow must be positive",
            });
        }
        let speed = check_command_fraction(speed, "pump speed")?;

        Ok(Self {
            name: name.into(),
            max_flow,
            speed,
        })
    }

    pub fn is_running(&self) -> bool {
        self.speed > 0.0
    }
}

impl FlowControl for Pump {
    fn name(&self) -> &str {
        &self.name
    }

    fn open_fraction(&self) -> f64 {
        self.speed
    }

    fn max_flow_lps(&self) -> f64 {
        self.max_flow
    }

    fn set_open_fraction(&mut self, fraction: f64) -> ComponentResult<()> {
        self.speed = check_command_fraction(fraction, "pump speed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::units::lps;

    #[test]
    fn pump_flow_scales_with_speed() {
        let mut pump = Pump::new("drain", lps(5.0), 0.0).unwrap();
        assert!(!pump.is_running());
        assert_eq!(pump.instant_flow(), 0.0);

        pump.set_open_fraction(0.2).unwrap();
        assert!(pump.is_running());
        assert!((pump.instant_flow() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pump_rejects_overspeed() {
        let mut pump = Pump::new("drain", lps(5.0), 0.5).unwrap();
        assert!(pump.set_open_fraction(1.01).is_err());
        assert_eq!(pump.open_fraction(), 0.5);
    }

    #[test]
    fn pump_invalid_parameters() {
        assert!(Pump::new("p", lps(0.0), 0.0).is_err());
        assert!(Pump::new("p", lps(f64::INFINITY), 0.0).is_err());
        assert!(Pump::new("p", lps(1.0), -0.5).is_err());
    }
}

//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use pf_core::numeric::{ensure_finite, ensure_fraction};

/// Volumes below this are treated as empty (litres).
pub const EPSILON_VOLUME: f64 = 1e-12;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Validate an operator-supplied opening; out-of-range values are rejected, never clamped.
pub fn check_command_fraction(value: f64, what: &'static str) -> ComponentResult<f64> {
    ensure_fraction(value, what).map_err(|_| ComponentError::InvalidCommand { what, value })
}

/// Treat a non-finite or negative volume as nothing.
pub fn sanitize_volume(value: f64) -> f64 {
    if value.is_finite() && value > EPSILON_VOLUME {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn test_check_command_fraction() {
        assert_eq!(check_command_fraction(0.25, "v"), Ok(0.25));
        assert_eq!(
            check_command_fraction(1.5, "v"),
            Err(ComponentError::InvalidCommand {
                what: "v",
                value: 1.5
            })
        );
        assert!(check_command_fraction(f64::NAN, "v").is_err());
    }

    #[test]
    fn test_sanitize_volume() {
        assert_eq!(sanitize_volume(2.0), 2.0);
        assert_eq!(sanitize_volume(-1.0), 0.0);
        assert_eq!(sanitize_volume(f64::NAN), 0.0);
    }
}

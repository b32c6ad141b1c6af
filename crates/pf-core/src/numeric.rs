use crate::PfError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PfError::NonFinite { what, value: v })
    }
}

/// Accept `v` only if it is finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, PfError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(PfError::OutOfRange {
            what,
            value: v,
            min: Real::MIN_POSITIVE,
            max: Real::INFINITY,
        })
    }
}

/// Accept `v` only if it lies in the closed unit interval. Nothing is clamped.
pub fn ensure_fraction(v: Real, what: &'static str) -> Result<Real, PfError> {
    let v = ensure_finite(v, what)?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(PfError::OutOfRange {
            what,
            value: v,
            min: 0.0,
            max: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_fraction_bounds() {
        assert_eq!(ensure_fraction(0.0, "f"), Ok(0.0));
        assert_eq!(ensure_fraction(1.0, "f"), Ok(1.0));
        assert!(matches!(
            ensure_fraction(1.5, "f"),
            Err(PfError::OutOfRange { value, .. }) if value == 1.5
        ));
        assert!(ensure_fraction(-0.01, "f").is_err());
        assert!(ensure_fraction(Real::NAN, "f").is_err());
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "p").is_err());
        assert!(ensure_positive(-1.0, "p").is_err());
        assert_eq!(ensure_positive(2.5, "p"), Ok(2.5));
    }
}

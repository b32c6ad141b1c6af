//! Pigment model errors.

use pf_core::PfError;
use thiserror::Error;

/// Result type for pigment operations.
pub type PigmentResult<T> = Result<T, PigmentError>;

/// Errors that can occur while building or parsing paint descriptors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PigmentError {
    /// Non-physical values (negative or non-finite fractions).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Name that does not match any base pigment.
    #[error("Unknown pigment: {name}")]
    UnknownPigment { name: String },
}

impl From<PigmentError> for PfError {
    fn from(err: PigmentError) -> Self {
        match err {
            PigmentError::NonPhysical { what } => PfError::InvalidArg { what },
            PigmentError::InvalidArg { what } => PfError::InvalidArg { what },
            PigmentError::UnknownPigment { .. } => PfError::InvalidArg {
                what: "unknown pigment",
            },
        }
    }
}

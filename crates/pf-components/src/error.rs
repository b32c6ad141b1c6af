//! Error types for component operations.

use pf_core::error::PfError;
use thiserror::Error;

/// Errors that can occur while building or commanding components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// Operator command rejected; the component keeps its previous setting.
    #[error("Invalid command for {what}: {value}")]
    InvalidCommand { what: &'static str, value: f64 },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<PfError> for ComponentError {
    fn from(e: PfError) -> Self {
        match e {
            PfError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
            PfError::OutOfRange { what, .. } => ComponentError::InvalidArg { what },
            PfError::InvalidArg { what } => ComponentError::InvalidArg { what },
        }
    }
}

impl From<ComponentError> for PfError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::InvalidCommand { what, .. } => PfError::InvalidArg { what },
            ComponentError::NonPhysical { what } => PfError::InvalidArg { what },
            ComponentError::InvalidArg { what } => PfError::InvalidArg { what },
        }
    }
}

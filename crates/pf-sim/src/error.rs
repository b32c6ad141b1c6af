//! Error types for simulation operations.

use pf_components::ComponentError;
use pf_core::error::PfError;
use pf_pigments::PigmentError;
use thiserror::Error;

/// Errors encountered while building, commanding or reading the plant.
///
/// None of these is fatal to a running clock: a rejected command leaves every
/// tank exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Command rejected; the addressed outlet keeps its previous setting.
    #[error("Invalid command for {station}/{tank}: {reason}")]
    InvalidCommand {
        station: String,
        tank: String,
        reason: String,
    },

    /// No such station, or no such tank in an existing station.
    #[error("Unknown target: {station}/{tank}")]
    UnknownTarget { station: String, tank: String },

    #[error("Invalid address: {text}")]
    InvalidAddress { text: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid topology: {what}")]
    Topology { what: String },

    #[error("Clock thread failed: {what}")]
    Clock { what: &'static str },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<PfError> for SimError {
    fn from(e: PfError) -> Self {
        SimError::Component(e.into())
    }
}

impl From<PigmentError> for SimError {
    fn from(e: PigmentError) -> Self {
        SimError::Topology {
            what: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_target() {
        let err = SimError::UnknownTarget {
            station: "station1".into(),
            tank: "orange".into(),
        };
        assert_eq!(err.to_string(), "Unknown target: station1/orange");

        let err = SimError::InvalidCommand {
            station: "station2".into(),
            tank: "cyan".into(),
            reason: "open fraction 1.5 outside [0, 1]".into(),
        };
        assert!(err.to_string().contains("station2/cyan"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn component_errors_convert() {
        let err: SimError = ComponentError::InvalidArg { what: "x" }.into();
        assert!(matches!(err, SimError::Component(_)));
        let err: SimError = PfError::InvalidArg { what: "y" }.into();
        assert!(matches!(err, SimError::Component(_)));
    }
}

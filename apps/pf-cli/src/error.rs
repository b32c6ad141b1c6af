//! Error type for the command-line front end.

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Usage(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<pf_project::ProjectError> for AppError {
    fn from(err: pf_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<pf_sim::SimError> for AppError {
    fn from(err: pf_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

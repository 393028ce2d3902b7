//! Error types for planning-layer setup and evaluation.

use kp_dynamics::DynamicsError;
use kp_sim::SimError;
use kp_space::SpaceError;
use thiserror::Error;

pub type PlanResult<T> = Result<T, PlanError>;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid configuration: {what}")]
    Config { what: String },

    #[error("Space error: {0}")]
    Space(#[from] SpaceError),

    #[error("Simulation setup error: {0}")]
    Sim(#[from] SimError),

    #[error(transparent)]
    Dynamics(#[from] DynamicsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlanError {
    pub fn config(what: impl Into<String>) -> Self {
        PlanError::Config { what: what.into() }
    }
}

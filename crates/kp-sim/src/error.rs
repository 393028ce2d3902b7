//! Error types for simulation operations.

use kp_dynamics::OracleError;
use thiserror::Error;

/// Errors encountered while stepping the simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: String },

    #[error("Step limit exceeded: {steps} steps requested, limit {limit}")]
    StepLimit { steps: usize, limit: usize },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<kp_core::KpError> for SimError {
    fn from(e: kp_core::KpError) -> Self {
        SimError::NonPhysical {
            what: e.to_string(),
        }
    }
}

impl From<SimError> for OracleError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::NonPhysical { what } => OracleError::Diverged { what },
            SimError::InvalidArg { .. } | SimError::StepLimit { .. } => {
                OracleError::InvalidConfiguration {
                    what: e.to_string(),
                }
            }
        }
    }
}

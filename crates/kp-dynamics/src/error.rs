//! Error types for propagation.

use kp_core::{Control, KpError, State};
use thiserror::Error;

/// Failures reported by a dynamics backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Simulation diverged: {what}")]
    Diverged { what: String },

    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type OracleResult<T> = Result<T, OracleError>;

/// The oracle could not evaluate a requested (state, control) pair.
///
/// `state` is in the planner frame; `control` is the duration-scaled control that was
/// attempted, or `None` for a reset-only query.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Propagation failed from state {state:?} under control {control:?}: {source}")]
pub struct PropagationError {
    pub state: State,
    pub control: Option<Control>,
    #[source]
    pub source: OracleError,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DynamicsError {
    #[error("Contract violation: {what}")]
    ContractViolation { what: String },

    #[error(transparent)]
    Propagation(#[from] PropagationError),
}

pub type DynamicsResult<T> = Result<T, DynamicsError>;

impl DynamicsError {
    pub fn contract(what: impl Into<String>) -> Self {
        DynamicsError::ContractViolation { what: what.into() }
    }

    pub fn is_propagation(&self) -> bool {
        matches!(self, DynamicsError::Propagation(_))
    }
}

impl From<KpError> for DynamicsError {
    fn from(e: KpError) -> Self {
        DynamicsError::ContractViolation {
            what: e.to_string(),
        }
    }
}

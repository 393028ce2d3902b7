//! Error types for space construction.

use thiserror::Error;

/// Errors raised while building spaces. Feasibility queries never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpaceError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite bound in dimension {dim}: {value}")]
    NonFinite { dim: usize, value: f64 },

    #[error("Inverted bounds in dimension {dim}: min={min} > max={max}")]
    InvertedBounds { dim: usize, min: f64, max: f64 },
}

pub type SpaceResult<T> = Result<T, SpaceError>;

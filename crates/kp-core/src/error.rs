use thiserror::Error;

pub type KpResult<T> = Result<T, KpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KpError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Arity mismatch: {what} (expected={expected}, got={got})")]
    Arity {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}

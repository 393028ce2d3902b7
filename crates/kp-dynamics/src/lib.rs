//! Dynamics propagation for kinodynamic planning.
//!
//! Provides:
//! - the frame transform between the planner's and the oracle's axis conventions
//! - the `DynamicsOracle` trait every physics backend implements
//! - `Propagator`, one owned oracle session with a reset-before-use protocol
//!
//! A `Propagator` is mutable shared state. Give each worker its own instance.

pub mod error;
pub mod frame;
pub mod oracle;
pub mod propagator;

pub use error::{DynamicsError, DynamicsResult, OracleError, OracleResult, PropagationError};
pub use frame::FrameTransform;
pub use oracle::{ContactPoint, DynamicsOracle};
pub use propagator::{DEFAULT_CONTACT_MARGIN, Propagator};

#[cfg(any(test, feature = "testing"))]
pub mod testing;

//! kp-core: shared foundation for kinoplan.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - vector (state/control vectors and their slot layout)
//! - units (uom SI types + constructors for physical parameters)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;
pub mod vector;

pub use error::{KpError, KpResult};
pub use numeric::*;
pub use vector::*;

//! Continuous-time dynamics over the 10-slot state vector.

use crate::error::SimResult;
use kp_core::{Real, State};

/// A system `dx/dt = f(t, x)` that the integrators can step.
///
/// Inputs such as actuation live in the model and stay fixed across one step, which is
/// why `rhs` takes `&mut self`.
pub trait TransientModel {
    fn rhs(&mut self, t: Real, x: &State) -> SimResult<State>;
}

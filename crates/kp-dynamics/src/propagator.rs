//! One owned oracle session with an explicit reset-before-use protocol.

use crate::error::{DynamicsError, DynamicsResult, OracleError, PropagationError};
use crate::frame::FrameTransform;
use crate::oracle::DynamicsOracle;
use kp_core::{Control, Real, State, control_from_slice, duration, state_from_slice, with_duration};
use tracing::{debug, warn};

/// Bodies may sit this close to touching, but not interpenetrate further.
pub const DEFAULT_CONTACT_MARGIN: Real = -0.005;

/// Wraps a [`DynamicsOracle`] session.
///
/// Every query starts with an explicit reset from the caller's state, so no call observes
/// leftovers of a previous one. The reset/query pair is not atomic: a `Propagator` must
/// not be shared between threads without a lock.
#[derive(Clone, Debug)]
pub struct Propagator<O> {
    oracle: O,
    frame: FrameTransform,
    contact_margin: Real,
}

impl<O: DynamicsOracle> Propagator<O> {
    pub fn new(oracle: O, frame: FrameTransform) -> Self {
        Self {
            oracle,
            frame,
            contact_margin: DEFAULT_CONTACT_MARGIN,
        }
    }

    pub fn with_contact_margin(mut self, margin: Real) -> Self {
        self.contact_margin = margin;
        self
    }

    pub fn frame(&self) -> &FrameTransform {
        &self.frame
    }

    pub fn contact_margin(&self) -> Real {
        self.contact_margin
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_inner(self) -> O {
        self.oracle
    }

    /// Put the session at `x` without advancing time.
    pub fn reset_only(&mut self, x: &State) -> DynamicsResult<()> {
        let q = self.frame.to_internal(x);
        self.oracle
            .reset(&q)
            .map_err(|source| propagation_failure(x, None, source))
    }

    /// Reset to `x`, then advance once under `u` with its duration scaled by `fraction`.
    pub fn reset_and_advance(
        &mut self,
        x: &State,
        u: &Control,
        fraction: Real,
    ) -> DynamicsResult<State> {
        self.run(x, u, fraction, None)
    }

    /// Like [`Self::reset_and_advance`], also appending the oracle's sub-step states
    /// (planner frame) to `via_points`. The returned state is unaffected.
    pub fn reset_and_advance_recording(
        &mut self,
        x: &State,
        u: &Control,
        fraction: Real,
        via_points: &mut Vec<State>,
    ) -> DynamicsResult<State> {
        self.run(x, u, fraction, Some(via_points))
    }

    /// Full-duration successor of `x` under `u`.
    pub fn next_state(&mut self, x: &State, u: &Control) -> DynamicsResult<State> {
        self.reset_and_advance(x, u, 1.0)
    }

    /// Slice entry point; wrong arity is a contract violation.
    pub fn reset_and_advance_slices(
        &mut self,
        x: &[Real],
        u: &[Real],
        fraction: Real,
    ) -> DynamicsResult<State> {
        let x = state_from_slice(x)?;
        let u = control_from_slice(u)?;
        self.reset_and_advance(&x, &u, fraction)
    }

    /// True unless the two bodies interpenetrate deeper than the contact margin at `x`.
    pub fn collision_free_at(&mut self, x: &State) -> DynamicsResult<bool> {
        self.reset_only(x)?;
        let contacts = self
            .oracle
            .contacts(self.contact_margin)
            .map_err(|source| propagation_failure(x, None, source))?;
        if !contacts.is_empty() {
            debug!(
                count = contacts.len(),
                deepest = contacts
                    .iter()
                    .map(|c| c.distance)
                    .fold(Real::INFINITY, Real::min),
                "bodies interpenetrate"
            );
        }
        Ok(contacts.is_empty())
    }

    fn run(
        &mut self,
        x: &State,
        u: &Control,
        fraction: Real,
        via_points: Option<&mut Vec<State>>,
    ) -> DynamicsResult<State> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(DynamicsError::contract(format!(
                "duration fraction {fraction} outside [0, 1]"
            )));
        }
        let t = duration(u);
        if !(t.is_finite() && t >= 0.0) {
            return Err(DynamicsError::contract(format!(
                "control duration {t} must be finite and non-negative"
            )));
        }

        let scaled = with_duration(u, t * fraction);
        let q = self.frame.to_internal(x);
        let mu = self.frame.control_to_internal(&scaled);

        self.oracle
            .reset(&q)
            .map_err(|source| propagation_failure(x, Some(scaled), source))?;

        let q_new = match via_points {
            Some(out) => {
                let mut raw = Vec::new();
                let q_new = self
                    .oracle
                    .advance(&mu, Some(&mut raw))
                    .map_err(|source| propagation_failure(x, Some(scaled), source))?;
                out.extend(raw.iter().map(|q| self.frame.to_external(q)));
                q_new
            }
            None => self
                .oracle
                .advance(&mu, None)
                .map_err(|source| propagation_failure(x, Some(scaled), source))?,
        };

        Ok(self.frame.to_external(&q_new))
    }
}

fn propagation_failure(x: &State, control: Option<Control>, source: OracleError) -> DynamicsError {
    warn!(
        state = ?x.as_slice(),
        control = ?control.as_ref().map(|c| c.as_slice().to_vec()),
        error = %source,
        "dynamics oracle failed"
    );
    DynamicsError::Propagation(PropagationError {
        state: *x,
        control,
        source,
    })
}

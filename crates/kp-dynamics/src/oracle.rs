//! Interface to an external rigid-body physics integrator.

use crate::error::OracleResult;
use kp_core::{Control, Point2, Real, State};

/// A contact between the two tracked bodies reported by a proximity query.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactPoint {
    /// Contact location in the oracle frame.
    pub position: Point2,
    /// Signed separation; negative means interpenetration.
    pub distance: Real,
}

/// A physics session that advances the object + gripper system.
///
/// All vectors are in the oracle frame (see [`crate::FrameTransform`]). The session keeps
/// its own state between calls; callers must `reset` before every query.
pub trait DynamicsOracle {
    /// Overwrite the session state.
    fn reset(&mut self, q: &State) -> OracleResult<()>;

    /// Advance once by `mu[0]` seconds under the actuation `mu[1..]` and return the
    /// resulting state. When `via_points` is given, every internal sub-step state is
    /// appended to it.
    fn advance(&mut self, mu: &Control, via_points: Option<&mut Vec<State>>)
    -> OracleResult<State>;

    /// Contact points between object and gripper whose separation is at most `margin`.
    fn contacts(&mut self, margin: Real) -> OracleResult<Vec<ContactPoint>>;
}

impl<O: DynamicsOracle + ?Sized> DynamicsOracle for Box<O> {
    fn reset(&mut self, q: &State) -> OracleResult<()> {
        (**self).reset(q)
    }

    fn advance(
        &mut self,
        mu: &Control,
        via_points: Option<&mut Vec<State>>,
    ) -> OracleResult<State> {
        (**self).advance(mu, via_points)
    }

    fn contacts(&mut self, margin: Real) -> OracleResult<Vec<ContactPoint>> {
        (**self).contacts(margin)
    }
}

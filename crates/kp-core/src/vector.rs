//! State and control vectors.
//!
//! The state tracks two planar bodies, a free object and an actuated gripper:
//!
//! | slot | meaning |
//! |------|---------|
//! | 0, 1 | object position (x, y) |
//! | 2, 3 | object velocity (vx, vy) |
//! | 4, 5 | gripper position (x, y) |
//! | 6    | gripper angle |
//! | 7, 8 | gripper velocity (vx, vy) |
//! | 9    | gripper angular velocity |
//!
//! The control carries its duration in slot 0, followed by two planar thrust
//! components and one steering (angular acceleration) component.

use crate::error::{KpError, KpResult};
use crate::numeric::Real;
use nalgebra::{SVector, Vector2};

pub const STATE_DIM: usize = 10;
pub const CONTROL_DIM: usize = 4;

pub type State = SVector<Real, STATE_DIM>;
pub type Control = SVector<Real, CONTROL_DIM>;
pub type Point2 = Vector2<Real>;

/// Slot indices into [`State`].
pub mod slot {
    pub const OBJECT_X: usize = 0;
    pub const OBJECT_Y: usize = 1;
    pub const OBJECT_VX: usize = 2;
    pub const OBJECT_VY: usize = 3;
    pub const GRIPPER_X: usize = 4;
    pub const GRIPPER_Y: usize = 5;
    pub const GRIPPER_THETA: usize = 6;
    pub const GRIPPER_VX: usize = 7;
    pub const GRIPPER_VY: usize = 8;
    pub const GRIPPER_OMEGA: usize = 9;
}

/// Slot indices into [`Control`].
pub mod control_slot {
    pub const DURATION: usize = 0;
    pub const THRUST_X: usize = 1;
    pub const THRUST_Y: usize = 2;
    pub const ALPHA: usize = 3;
}

/// Build a state from a slice, rejecting the wrong arity.
pub fn state_from_slice(values: &[Real]) -> KpResult<State> {
    if values.len() != STATE_DIM {
        return Err(KpError::Arity {
            what: "state vector",
            expected: STATE_DIM,
            got: values.len(),
        });
    }
    Ok(State::from_column_slice(values))
}

/// Build a control from a slice, rejecting the wrong arity.
pub fn control_from_slice(values: &[Real]) -> KpResult<Control> {
    if values.len() != CONTROL_DIM {
        return Err(KpError::Arity {
            what: "control vector",
            expected: CONTROL_DIM,
            got: values.len(),
        });
    }
    Ok(Control::from_column_slice(values))
}

#[inline]
pub fn duration(u: &Control) -> Real {
    u[control_slot::DURATION]
}

/// Copy of `u` with its duration replaced.
#[inline]
pub fn with_duration(u: &Control, t: Real) -> Control {
    let mut out = *u;
    out[control_slot::DURATION] = t;
    out
}

#[inline]
pub fn object_position(x: &State) -> Point2 {
    Point2::new(x[slot::OBJECT_X], x[slot::OBJECT_Y])
}

#[inline]
pub fn object_velocity(x: &State) -> Point2 {
    Point2::new(x[slot::OBJECT_VX], x[slot::OBJECT_VY])
}

#[inline]
pub fn gripper_position(x: &State) -> Point2 {
    Point2::new(x[slot::GRIPPER_X], x[slot::GRIPPER_Y])
}

#[inline]
pub fn gripper_velocity(x: &State) -> Point2 {
    Point2::new(x[slot::GRIPPER_VX], x[slot::GRIPPER_VY])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_with_wrong_arity_are_rejected() {
        let err = state_from_slice(&[0.0; 9]).unwrap_err();
        assert_eq!(
            err,
            KpError::Arity {
                what: "state vector",
                expected: STATE_DIM,
                got: 9
            }
        );
        assert!(control_from_slice(&[1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn accessors_follow_slot_layout() {
        let x =
            state_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]).unwrap();
        assert_eq!(object_position(&x), Point2::new(1.0, 2.0));
        assert_eq!(object_velocity(&x), Point2::new(3.0, 4.0));
        assert_eq!(gripper_position(&x), Point2::new(5.0, 6.0));
        assert_eq!(gripper_velocity(&x), Point2::new(8.0, 9.0));
    }

    #[test]
    fn with_duration_only_touches_slot_zero() {
        let u = control_from_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let scaled = with_duration(&u, 0.25);
        assert_eq!(duration(&scaled), 0.25);
        assert_eq!(scaled.fixed_rows::<3>(1), u.fixed_rows::<3>(1));
    }
}

//! Axis convention shared with the dynamics oracle.
//!
//! The planner's vertical axis points down from the top of the workspace; the oracle's
//! points up from the bottom. Converting reflects both vertical positions about the
//! workspace height and negates the vertical velocities, the gripper angle and its
//! angular velocity. Controls keep their duration and horizontal thrust and negate the
//! vertical thrust and the steering component.
//!
//! Both directions apply the same map, so each is its own inverse.

use kp_core::{Control, Real, State, control_slot, slot};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTransform {
    y_range: Real,
}

impl FrameTransform {
    pub fn new(y_range: Real) -> Self {
        Self { y_range }
    }

    pub fn y_range(&self) -> Real {
        self.y_range
    }

    /// Planner frame to oracle frame.
    pub fn to_internal(&self, x: &State) -> State {
        self.flip_state(x)
    }

    /// Oracle frame to planner frame.
    pub fn to_external(&self, q: &State) -> State {
        self.flip_state(q)
    }

    pub fn control_to_internal(&self, u: &Control) -> Control {
        flip_control(u)
    }

    pub fn control_to_external(&self, mu: &Control) -> Control {
        flip_control(mu)
    }

    fn flip_state(&self, x: &State) -> State {
        let mut out = *x;
        out[slot::OBJECT_Y] = self.y_range - x[slot::OBJECT_Y];
        out[slot::OBJECT_VY] = -x[slot::OBJECT_VY];
        out[slot::GRIPPER_Y] = self.y_range - x[slot::GRIPPER_Y];
        out[slot::GRIPPER_THETA] = -x[slot::GRIPPER_THETA];
        out[slot::GRIPPER_VY] = -x[slot::GRIPPER_VY];
        out[slot::GRIPPER_OMEGA] = -x[slot::GRIPPER_OMEGA];
        out
    }
}

fn flip_control(u: &Control) -> Control {
    let mut out = *u;
    out[control_slot::THRUST_Y] = -u[control_slot::THRUST_Y];
    out[control_slot::ALPHA] = -u[control_slot::ALPHA];
    out
}

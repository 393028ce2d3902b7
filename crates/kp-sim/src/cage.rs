//! Planar object + gripper dynamics.
//!
//! The object is pushed only by gravity and by contact with the gripper. The gripper
//! follows the commanded thrust accelerations and angular acceleration, plus gravity and
//! the contact reaction. Contact is a frictionless penalty spring-damper.

use crate::bodies::{CageBodies, ContactParams};
use crate::error::SimResult;
use crate::model::TransientModel;
use kp_core::{Point2, Real, State, gripper_velocity, object_velocity, slot};
use nalgebra::Vector3;

#[derive(Clone, Debug)]
pub struct CageModel {
    bodies: CageBodies,
    contact: ContactParams,
    /// Held constant between `set_actuation` calls: thrust x, thrust y, alpha.
    actuation: Vector3<Real>,
}

impl CageModel {
    pub fn new(bodies: CageBodies, contact: ContactParams) -> Self {
        Self {
            bodies,
            contact,
            actuation: Vector3::zeros(),
        }
    }

    pub fn bodies(&self) -> &CageBodies {
        &self.bodies
    }

    pub fn contact_params(&self) -> &ContactParams {
        &self.contact
    }

    pub fn set_actuation(&mut self, thrust_x: Real, thrust_y: Real, alpha: Real) {
        self.actuation = Vector3::new(thrust_x, thrust_y, alpha);
    }

    /// Contact force on the object and the reaction torque on the gripper.
    pub fn contact_wrench(&self, q: &State) -> (Point2, Real) {
        let geom = self.bodies.contact_geometry(q);
        let depth = -geom.separation;
        if depth <= 0.0 {
            return (Point2::zeros(), 0.0);
        }

        let omega = q[slot::GRIPPER_OMEGA];
        let surface_velocity =
            gripper_velocity(q) + Point2::new(-omega * geom.lever.y, omega * geom.lever.x);
        let vn = (object_velocity(q) - surface_velocity).dot(&geom.normal);
        let magnitude = (self.contact.stiffness * depth - self.contact.damping * vn).max(0.0);
        let force = geom.normal * magnitude;

        // Reaction -force acts on the gripper at the contact point.
        let torque = -(geom.lever.x * force.y - geom.lever.y * force.x);
        (force, torque)
    }
}

impl TransientModel for CageModel {
    fn rhs(&mut self, _t: Real, x: &State) -> SimResult<State> {
        let (force, torque) = self.contact_wrench(x);
        let b = &self.bodies;
        let gravity = Point2::new(0.0, -b.gravity);

        let a_object = force / b.mass_object + gravity;
        let a_gripper = Point2::new(self.actuation.x, self.actuation.y) + gravity
            - force / b.mass_gripper;
        let alpha = self.actuation.z + torque / b.moment_gripper;

        let mut xdot = State::zeros();
        xdot[slot::OBJECT_X] = x[slot::OBJECT_VX];
        xdot[slot::OBJECT_Y] = x[slot::OBJECT_VY];
        xdot[slot::OBJECT_VX] = a_object.x;
        xdot[slot::OBJECT_VY] = a_object.y;
        xdot[slot::GRIPPER_X] = x[slot::GRIPPER_VX];
        xdot[slot::GRIPPER_Y] = x[slot::GRIPPER_VY];
        xdot[slot::GRIPPER_THETA] = x[slot::GRIPPER_OMEGA];
        xdot[slot::GRIPPER_VX] = a_gripper.x;
        xdot[slot::GRIPPER_VY] = a_gripper.y;
        xdot[slot::GRIPPER_OMEGA] = alpha;
        Ok(xdot)
    }
}

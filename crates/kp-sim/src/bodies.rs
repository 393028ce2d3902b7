//! Physical parameters of the object and gripper, and their contact geometry.

use crate::error::{SimError, SimResult};
use kp_core::units::{Accel, Inertia, Length, Mass};
use kp_core::{Point2, Real, State, gripper_position, object_position, slot};
use nalgebra::Rotation2;
use uom::si::acceleration::meter_per_second_squared;
use uom::si::length::meter;
use uom::si::mass::kilogram;
use uom::si::moment_of_inertia::kilogram_square_meter;

/// Object (a small disk) and gripper (a rigid rectangle) in SI base units.
#[derive(Clone, Debug, PartialEq)]
pub struct CageBodies {
    pub mass_object: Real,
    pub mass_gripper: Real,
    pub moment_gripper: Real,
    /// Gripper half extents along its own x and y axes.
    pub half_extents: Point2,
    pub radius_object: Real,
    /// Magnitude of gravity, acting along -y in the oracle frame.
    pub gravity: Real,
}

impl CageBodies {
    pub fn new(
        mass_object: Mass,
        mass_gripper: Mass,
        moment_gripper: Inertia,
        half_extents: [Length; 2],
        radius_object: Length,
        gravity: Accel,
    ) -> SimResult<Self> {
        let bodies = Self {
            mass_object: mass_object.get::<kilogram>(),
            mass_gripper: mass_gripper.get::<kilogram>(),
            moment_gripper: moment_gripper.get::<kilogram_square_meter>(),
            half_extents: Point2::new(
                half_extents[0].get::<meter>(),
                half_extents[1].get::<meter>(),
            ),
            radius_object: radius_object.get::<meter>(),
            gravity: gravity.get::<meter_per_second_squared>(),
        };
        bodies.validate()?;
        Ok(bodies)
    }

    fn validate(&self) -> SimResult<()> {
        if !(self.mass_object > 0.0 && self.mass_gripper > 0.0) {
            return Err(SimError::InvalidArg {
                what: "masses must be positive",
            });
        }
        if !(self.moment_gripper > 0.0) {
            return Err(SimError::InvalidArg {
                what: "gripper moment of inertia must be positive",
            });
        }
        if !(self.half_extents.x > 0.0 && self.half_extents.y > 0.0) {
            return Err(SimError::InvalidArg {
                what: "gripper half extents must be positive",
            });
        }
        if !(self.radius_object >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "object radius must be non-negative",
            });
        }
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "gravity must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Closest-feature relation between object and gripper at oracle-frame state `q`.
    pub fn contact_geometry(&self, q: &State) -> ContactGeometry {
        let center = gripper_position(q);
        let rot = Rotation2::new(q[slot::GRIPPER_THETA]);
        let p = rot.inverse() * (object_position(q) - center);
        let h = self.half_extents;
        let d = Point2::new(p.x.abs() - h.x, p.y.abs() - h.y);

        let (dist, normal_local) = if d.x > 0.0 || d.y > 0.0 {
            let outside = Point2::new(d.x.max(0.0), d.y.max(0.0));
            let dist = outside.norm();
            let n = Point2::new(outside.x * p.x.signum(), outside.y * p.y.signum()) / dist;
            (dist, n)
        } else if d.x > d.y {
            (d.x, Point2::new(p.x.signum(), 0.0))
        } else {
            (d.y, Point2::new(0.0, p.y.signum()))
        };

        let surface_local = p - normal_local * dist;
        let lever = rot * surface_local;
        ContactGeometry {
            separation: dist - self.radius_object,
            normal: rot * normal_local,
            point: center + lever,
            lever,
        }
    }
}

/// Penalty contact law: `f = max(k·δ - c·v_n, 0)` along the contact normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactParams {
    pub stiffness: Real,
    pub damping: Real,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            stiffness: 1.0e4,
            damping: 50.0,
        }
    }
}

/// Result of [`CageBodies::contact_geometry`].
#[derive(Clone, Debug, PartialEq)]
pub struct ContactGeometry {
    /// Signed gap between the object's rim and the gripper; negative when overlapping.
    pub separation: Real,
    /// Unit normal pointing from the gripper toward the object.
    pub normal: Point2,
    /// Closest point on the gripper surface.
    pub point: Point2,
    /// `point` relative to the gripper center.
    pub lever: Point2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kp_core::units::{kg, kgm2, m, mps2};

    fn bodies() -> CageBodies {
        CageBodies::new(kg(1.0), kg(10.0), kgm2(1.0), [m(0.5), m(0.1)], m(0.01), mps2(9.81))
            .unwrap()
    }

    fn resting() -> State {
        // Oracle frame: object sits on the gripper's top face.
        State::from_column_slice(&[2.0, 6.0, 0.0, 0.0, 2.0, 5.89, 0.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn resting_object_just_touches() {
        let g = bodies().contact_geometry(&resting());
        assert!(g.separation.abs() < 1e-12);
        assert!((g.normal - Point2::new(0.0, 1.0)).norm() < 1e-12);
        assert!((g.point - Point2::new(2.0, 5.99)).norm() < 1e-12);
    }

    #[test]
    fn overlap_is_negative_separation() {
        let mut q = resting();
        q[slot::OBJECT_Y] = 5.95;
        let g = bodies().contact_geometry(&q);
        assert!((g.separation - (-0.05)).abs() < 1e-12);
        assert!((g.normal - Point2::new(0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn corner_region_uses_euclidean_distance() {
        let mut q = resting();
        q[slot::OBJECT_X] = 2.8;
        q[slot::OBJECT_Y] = 5.89 + 0.5;
        let g = bodies().contact_geometry(&q);
        assert!((g.separation - (0.3f64.hypot(0.4) - 0.01)).abs() < 1e-12);
    }

    #[test]
    fn rotation_is_respected() {
        let mut q = resting();
        q[slot::GRIPPER_THETA] = std::f64::consts::FRAC_PI_2;
        // Long axis now vertical: top face is 0.5 above the center.
        let g = bodies().contact_geometry(&q);
        assert!(g.separation < 0.0);
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(
            CageBodies::new(kg(0.0), kg(10.0), kgm2(1.0), [m(0.5), m(0.1)], m(0.01), mps2(9.81))
                .is_err()
        );
        assert!(
            CageBodies::new(kg(1.0), kg(10.0), kgm2(1.0), [m(0.5), m(-0.1)], m(0.01), mps2(9.81))
                .is_err()
        );
    }
}

//! Configuration space of the object + gripper system.

use crate::bounds::BoxBounds;
use crate::error::{SpaceError, SpaceResult};
use crate::workspace::{Geometric2DWorkspace, OrientedBox, Workspace};
use kp_core::{Point2, Real, STATE_DIM, State, gripper_position, object_position, slot};
use std::f64::consts::PI;
use tracing::trace;

/// Feasibility predicate over full state vectors.
///
/// Implementations report bounds and collision violations as `false`; they never fail.
pub trait ConfigurationSpace {
    fn dimension(&self) -> usize {
        STATE_DIM
    }

    fn feasible(&self, x: &State) -> bool;
}

impl<C: ConfigurationSpace + ?Sized> ConfigurationSpace for &C {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn feasible(&self, x: &State) -> bool {
        (**self).feasible(x)
    }
}

/// Standard bounds: positions inside `[0, x_range] x [0, y_range]`, every velocity
/// within `±max_velocity`, gripper angle within `[-π, π]`.
pub fn standard_bounds(
    x_range: Real,
    y_range: Real,
    max_velocity: Real,
) -> SpaceResult<BoxBounds<STATE_DIM>> {
    let v = max_velocity;
    BoxBounds::from_arrays(
        [0.0, 0.0, -v, -v, 0.0, 0.0, -PI, -v, -v, -v],
        [x_range, y_range, v, v, x_range, y_range, PI, v, v, v],
    )
}

/// Box bounds on all ten state slots plus workspace checks for both bodies.
///
/// The object is checked as a point. The gripper's center must lie inside the workspace
/// extent and its rotated rectangular footprint must not overlap any obstacle.
#[derive(Clone, Debug)]
pub struct CageConfigurationSpace<W = Geometric2DWorkspace> {
    workspace: W,
    bounds: BoxBounds<STATE_DIM>,
    gripper_half_extents: Point2,
}

impl<W: Workspace> CageConfigurationSpace<W> {
    pub fn new(
        workspace: W,
        bounds: BoxBounds<STATE_DIM>,
        gripper_half_extents: Point2,
    ) -> SpaceResult<Self> {
        if gripper_half_extents.x < 0.0 || gripper_half_extents.y < 0.0 {
            return Err(SpaceError::InvalidArg {
                what: "gripper half extents must be non-negative",
            });
        }
        Ok(Self {
            workspace,
            bounds,
            gripper_half_extents,
        })
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    pub fn bounds(&self) -> &BoxBounds<STATE_DIM> {
        &self.bounds
    }

    pub fn gripper_half_extents(&self) -> &Point2 {
        &self.gripper_half_extents
    }

    /// Gripper footprint in workspace coordinates.
    pub fn gripper_footprint(&self, x: &State) -> OrientedBox {
        OrientedBox::new(
            gripper_position(x),
            x[slot::GRIPPER_THETA],
            self.gripper_half_extents,
        )
    }
}

impl<W: Workspace> ConfigurationSpace for CageConfigurationSpace<W> {
    fn feasible(&self, x: &State) -> bool {
        if let Some(dim) = self.bounds.first_violation(x) {
            trace!(dim, value = x[dim], "state out of bounds");
            return false;
        }
        if !self.workspace.feasible(&object_position(x)) {
            trace!("object outside free workspace");
            return false;
        }
        if !self.workspace.footprint_feasible(&self.gripper_footprint(x)) {
            trace!("gripper footprint outside free workspace");
            return false;
        }
        true
    }
}

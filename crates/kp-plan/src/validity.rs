//! Per-state validity used by the edge checker at every sampled point.

use kp_core::State;
use kp_dynamics::{DynamicsOracle, DynamicsResult, Propagator};
use kp_space::{CageConfigurationSpace, ConfigurationSpace};
use tracing::trace;

/// Judges one state. May need a simulation session, hence `&mut self`.
///
/// `Ok(false)` is a verdict; `Err` means the state could not be judged.
pub trait StateValidity {
    fn valid(&mut self, x: &State) -> DynamicsResult<bool>;
}

/// Pure configuration spaces never fail.
impl<C: ConfigurationSpace + ?Sized> StateValidity for &C {
    fn valid(&mut self, x: &State) -> DynamicsResult<bool> {
        Ok((**self).feasible(x))
    }
}

/// Bounds and obstacles, then the object/gripper penetration check on an owned session.
#[derive(Clone, Debug)]
pub struct ContactAwareSpace<O> {
    space: CageConfigurationSpace,
    propagator: Propagator<O>,
}

impl<O: DynamicsOracle> ContactAwareSpace<O> {
    pub fn new(space: CageConfigurationSpace, propagator: Propagator<O>) -> Self {
        Self { space, propagator }
    }

    pub fn space(&self) -> &CageConfigurationSpace {
        &self.space
    }

    pub fn propagator(&self) -> &Propagator<O> {
        &self.propagator
    }
}

impl<O: DynamicsOracle> StateValidity for ContactAwareSpace<O> {
    fn valid(&mut self, x: &State) -> DynamicsResult<bool> {
        if !self.space.feasible(x) {
            return Ok(false);
        }
        let free = self.propagator.collision_free_at(x)?;
        if !free {
            trace!("object and gripper interpenetrate");
        }
        Ok(free)
    }
}

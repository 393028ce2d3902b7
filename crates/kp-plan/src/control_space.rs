//! Control space of the cage problem: builds interpolators over one owned session.

use crate::interpolator::CageInterpolator;
use kp_core::{Control, Real, State};
use kp_dynamics::{DynamicsOracle, DynamicsResult, Propagator};
use kp_space::{CageConfigurationSpace, CageControlSet, ConfigurationSpace};
use rand::Rng;

#[derive(Clone, Debug)]
pub struct CageControlSpace<O> {
    propagator: Propagator<O>,
    cspace: CageConfigurationSpace,
    controls: CageControlSet,
    length_per_unit_time: Real,
}

impl<O: DynamicsOracle> CageControlSpace<O> {
    pub fn new(
        propagator: Propagator<O>,
        cspace: CageConfigurationSpace,
        controls: CageControlSet,
        length_per_unit_time: Real,
    ) -> Self {
        Self {
            propagator,
            cspace,
            controls,
            length_per_unit_time,
        }
    }

    pub fn configuration_space(&self) -> &CageConfigurationSpace {
        &self.cspace
    }

    pub fn control_set(&self) -> &CageControlSet {
        &self.controls
    }

    pub fn propagator(&self) -> &Propagator<O> {
        &self.propagator
    }

    pub fn propagator_mut(&mut self) -> &mut Propagator<O> {
        &mut self.propagator
    }

    pub fn sample_control<R: Rng>(&self, rng: &mut R) -> Control {
        self.controls.sample(rng)
    }

    pub fn control_feasible(&self, u: &Control) -> bool {
        self.controls.contains(u)
    }

    /// Successor of `x` after the full duration of `u`.
    pub fn next_state(&mut self, x: &State, u: &Control) -> DynamicsResult<State> {
        self.propagator.next_state(x, u)
    }

    /// Configuration-space feasibility plus the inter-body penetration check.
    pub fn state_feasible(&mut self, x: &State) -> DynamicsResult<bool> {
        if !self.cspace.feasible(x) {
            return Ok(false);
        }
        self.propagator.collision_free_at(x)
    }

    pub fn interpolator(&mut self, x: &State, u: &Control) -> CageInterpolator<'_, O> {
        CageInterpolator::new(&mut self.propagator, *x, *u, self.length_per_unit_time)
    }
}

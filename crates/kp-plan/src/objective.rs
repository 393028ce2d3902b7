//! Incremental edge cost.
//!
//! `cost = max(d(goal, next) - d(goal, current), floor) + time_weight * duration`
//!
//! The floor keeps every edge strictly positive, which penalizes edge count instead of
//! rewarding progress without bound. An energy-increase term is available but off by
//! default.

use kp_core::{Control, Point2, Real, State, duration, object_position, slot};
use kp_dynamics::{DynamicsOracle, DynamicsResult, Propagator};
use tracing::trace;

/// Incremental cost of an edge. Propagation failures are returned, never priced.
pub trait ObjectiveFunction {
    fn incremental(&mut self, x: &State, u: &Control) -> DynamicsResult<Real>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostWeights {
    /// Lower bound of the goal-progress term.
    pub progress_floor: Real,
    /// Cost per second of control duration.
    pub time_weight: Real,
    /// Weight of the energy-increase term; `None` disables it.
    pub energy_weight: Option<Real>,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            progress_floor: 0.01,
            time_weight: 0.001,
            energy_weight: None,
        }
    }
}

/// Total mechanical energy of both bodies in the planner frame (y down from `y_range`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyModel {
    pub mass_object: Real,
    pub mass_gripper: Real,
    pub moment_gripper: Real,
    pub gravity: Real,
    pub y_range: Real,
}

impl EnergyModel {
    pub fn total(&self, x: &State) -> Real {
        let g = self.gravity;
        let object = self.mass_object
            * (g * (self.y_range - x[slot::OBJECT_Y])
                + 0.5 * (x[slot::OBJECT_VX].powi(2) + x[slot::OBJECT_VY].powi(2)));
        let gripper = g * self.mass_gripper * (self.y_range - x[slot::GRIPPER_Y])
            + 0.5
                * (self.mass_gripper * (x[slot::GRIPPER_VX].powi(2) + x[slot::GRIPPER_VY].powi(2))
                    + self.moment_gripper * x[slot::GRIPPER_OMEGA].powi(2));
        object + gripper
    }

    /// Energy gained from `x` to `next`, floored at zero.
    pub fn increase(&self, x: &State, next: &State) -> Real {
        (self.total(next) - self.total(x)).max(0.0)
    }
}

/// Per-term view of one incremental cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostBreakdown {
    pub progress: Real,
    pub time: Real,
    /// Weighted energy term, when enabled.
    pub energy: Option<Real>,
}

impl CostBreakdown {
    pub fn total(&self) -> Real {
        self.progress + self.time + self.energy.unwrap_or(0.0)
    }
}

/// Cost accumulator for the cage problem. Owns its own propagation session.
#[derive(Clone, Debug)]
pub struct CageObjective<O> {
    propagator: Propagator<O>,
    goal: Point2,
    weights: CostWeights,
    energy: EnergyModel,
}

impl<O: DynamicsOracle> CageObjective<O> {
    pub fn new(
        propagator: Propagator<O>,
        goal: Point2,
        weights: CostWeights,
        energy: EnergyModel,
    ) -> Self {
        Self {
            propagator,
            goal,
            weights,
            energy,
        }
    }

    pub fn goal(&self) -> &Point2 {
        &self.goal
    }

    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    pub fn set_energy_weight(&mut self, weight: Option<Real>) {
        self.weights.energy_weight = weight;
    }

    pub fn propagator(&self) -> &Propagator<O> {
        &self.propagator
    }

    /// Propagate once at full duration and price each term.
    pub fn breakdown(&mut self, x: &State, u: &Control) -> DynamicsResult<CostBreakdown> {
        let next = self.propagator.next_state(x, u)?;

        let before = (self.goal - object_position(x)).norm();
        let after = (self.goal - object_position(&next)).norm();
        let progress = (after - before).max(self.weights.progress_floor);
        let time = self.weights.time_weight * duration(u);
        let energy = self
            .weights
            .energy_weight
            .map(|w| w * self.energy.increase(x, &next));

        let breakdown = CostBreakdown {
            progress,
            time,
            energy,
        };
        trace!(?breakdown, "edge cost");
        Ok(breakdown)
    }
}

impl<O: DynamicsOracle> ObjectiveFunction for CageObjective<O> {
    fn incremental(&mut self, x: &State, u: &Control) -> DynamicsResult<Real> {
        Ok(self.breakdown(x, u)?.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energy() -> EnergyModel {
        EnergyModel {
            mass_object: 1.0,
            mass_gripper: 10.0,
            moment_gripper: 1.0,
            gravity: 9.81,
            y_range: 10.0,
        }
    }

    fn rest() -> State {
        State::from_column_slice(&[2.0, 4.0, 0.0, 0.0, 2.0, 4.11, 0.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn energy_counts_height_from_bottom() {
        let e = energy();
        let x = rest();
        let expected = 9.81 * 6.0 + 9.81 * 10.0 * (10.0 - 4.11);
        assert!((e.total(&x) - expected).abs() < 1e-9);
    }

    #[test]
    fn energy_increase_is_floored() {
        let e = energy();
        let x = rest();
        let mut lower = x;
        lower[slot::OBJECT_Y] = 5.0;
        assert_eq!(e.increase(&x, &lower), 0.0);
        assert!((e.increase(&lower, &x) - 9.81).abs() < 1e-9);
    }

    #[test]
    fn spinning_gripper_adds_rotational_energy() {
        let e = energy();
        let x = rest();
        let mut spun = x;
        spun[slot::GRIPPER_OMEGA] = 2.0;
        assert!((e.increase(&x, &spun) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn breakdown_total_sums_enabled_terms() {
        let b = CostBreakdown {
            progress: 0.5,
            time: 0.001,
            energy: None,
        };
        assert!((b.total() - 0.501).abs() < 1e-12);
        let with_energy = CostBreakdown {
            energy: Some(2.0),
            ..b
        };
        assert!((with_energy.total() - 2.501).abs() < 1e-12);
    }
}

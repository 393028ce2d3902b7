//! Edge evaluation: control check, trajectory check including both endpoints, then cost.

use crate::control_space::CageControlSpace;
use crate::edge_checker::{EdgeChecker, EpsilonEdgeChecker};
use crate::interpolator::Interpolator;
use crate::objective::{CageObjective, CostBreakdown};
use kp_core::{Control, State};
use crate::validity::ContactAwareSpace;
use kp_dynamics::{DynamicsError, DynamicsOracle, DynamicsResult};
use rayon::prelude::*;
use tracing::{debug, warn};

/// A candidate edge: a start state and the control applied from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub state: State,
    pub control: Control,
}

impl Edge {
    pub fn new(state: State, control: Control) -> Self {
        Self { state, control }
    }
}

#[derive(Debug)]
pub enum EdgeOutcome {
    /// The control, the swept trajectory or the end state is infeasible.
    Infeasible,
    Feasible { end: State, cost: CostBreakdown },
    /// The oracle could not propagate; says nothing about feasibility.
    Unevaluable(DynamicsError),
}

impl EdgeOutcome {
    pub fn is_feasible(&self) -> bool {
        matches!(self, EdgeOutcome::Feasible { .. })
    }

    pub fn cost(&self) -> Option<f64> {
        match self {
            EdgeOutcome::Feasible { cost, .. } => Some(cost.total()),
            _ => None,
        }
    }
}

/// Everything one worker needs to judge and price edges.
///
/// The control space, the checker and the objective each own an independent oracle
/// session.
#[derive(Clone, Debug)]
pub struct EdgeEvaluator<O> {
    space: CageControlSpace<O>,
    checker: EpsilonEdgeChecker<ContactAwareSpace<O>>,
    objective: CageObjective<O>,
}

impl<O: DynamicsOracle> EdgeEvaluator<O> {
    pub fn new(
        space: CageControlSpace<O>,
        checker: EpsilonEdgeChecker<ContactAwareSpace<O>>,
        objective: CageObjective<O>,
    ) -> Self {
        Self {
            space,
            checker,
            objective,
        }
    }

    pub fn space(&self) -> &CageControlSpace<O> {
        &self.space
    }

    pub fn space_mut(&mut self) -> &mut CageControlSpace<O> {
        &mut self.space
    }

    pub fn checker(&self) -> &EpsilonEdgeChecker<ContactAwareSpace<O>> {
        &self.checker
    }

    pub fn objective(&self) -> &CageObjective<O> {
        &self.objective
    }

    pub fn objective_mut(&mut self) -> &mut CageObjective<O> {
        &mut self.objective
    }

    pub fn evaluate(&mut self, edge: &Edge) -> EdgeOutcome {
        match self.try_evaluate(edge) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "edge could not be evaluated");
                EdgeOutcome::Unevaluable(err)
            }
        }
    }

    fn try_evaluate(&mut self, edge: &Edge) -> DynamicsResult<EdgeOutcome> {
        if !self.space.control_feasible(&edge.control) {
            debug!(control = ?edge.control.as_slice(), "control outside control set");
            return Ok(EdgeOutcome::Infeasible);
        }

        let end = {
            let mut interp = self.space.interpolator(&edge.state, &edge.control);
            if !self.checker.feasible(&mut interp)? {
                return Ok(EdgeOutcome::Infeasible);
            }
            interp.end()?
        };

        let cost = self.objective.breakdown(&edge.state, &edge.control)?;
        Ok(EdgeOutcome::Feasible { end, cost })
    }
}

/// Evaluate `edges` in parallel. Each rayon worker clones `template` once, so no
/// oracle session is ever shared between threads. Outcomes keep the input order.
pub fn evaluate_edges<O>(template: &EdgeEvaluator<O>, edges: &[Edge]) -> Vec<EdgeOutcome>
where
    O: DynamicsOracle + Clone + Send + Sync,
{
    edges
        .par_iter()
        .map_init(|| template.clone(), |evaluator, edge| evaluator.evaluate(edge))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{CostWeights, EnergyModel};
    use kp_core::Point2;
    use kp_dynamics::testing::StubOracle;
    use kp_dynamics::{ContactPoint, FrameTransform, Propagator};
    use kp_space::{
        CageConfigurationSpace, CageControlSet, Geometric2DWorkspace, standard_bounds,
    };

    fn evaluator(oracle: StubOracle) -> EdgeEvaluator<StubOracle> {
        let cspace = CageConfigurationSpace::new(
            Geometric2DWorkspace::with_extent(10.0, 10.0),
            standard_bounds(10.0, 10.0, 10.0).unwrap(),
            Point2::new(0.5, 0.1),
        )
        .unwrap();
        let propagator = || Propagator::new(oracle.clone(), FrameTransform::new(10.0));
        let controls = CageControlSet::for_gripper(1.0, 10.0, 9.81, 0.1).unwrap();
        EdgeEvaluator::new(
            CageControlSpace::new(propagator(), cspace.clone(), controls, 10.0),
            EpsilonEdgeChecker::new(ContactAwareSpace::new(cspace, propagator()), 1.0).unwrap(),
            CageObjective::new(
                propagator(),
                Point2::new(8.0, 8.0),
                CostWeights::default(),
                EnergyModel {
                    mass_object: 1.0,
                    mass_gripper: 10.0,
                    moment_gripper: 1.0,
                    gravity: 9.81,
                    y_range: 10.0,
                },
            ),
        )
    }

    fn resting() -> State {
        State::from_column_slice(&[2.0, 4.0, 0.0, 0.0, 2.0, 4.11, 0.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn holding_edge_costs_floor_plus_time() {
        let mut ev = evaluator(StubOracle::hold());
        let edge = Edge::new(resting(), Control::new(1.0, 0.0, -9.81, 0.0));
        let outcome = ev.evaluate(&edge);
        let cost = outcome.cost().unwrap();
        assert!((cost - (0.01 + 0.001)).abs() < 1e-12);
    }

    #[test]
    fn control_outside_set_is_infeasible_without_propagating() {
        let mut ev = evaluator(StubOracle::hold());
        let edge = Edge::new(resting(), Control::new(1.0, 50.0, -9.81, 0.0));
        assert!(matches!(ev.evaluate(&edge), EdgeOutcome::Infeasible));
        assert_eq!(ev.space().propagator().oracle().advances, 0);
    }

    #[test]
    fn drifting_out_of_bounds_is_infeasible() {
        let mut ev = evaluator(StubOracle::drift(20.0));
        let edge = Edge::new(resting(), Control::new(1.0, 0.0, -9.81, 0.0));
        assert!(matches!(ev.evaluate(&edge), EdgeOutcome::Infeasible));
    }

    #[test]
    fn interpenetrating_start_is_infeasible() {
        let oracle = StubOracle::hold().with_contacts(vec![ContactPoint {
            position: Point2::zeros(),
            distance: -0.05,
        }]);
        let mut ev = evaluator(oracle);
        let edge = Edge::new(resting(), Control::new(1.0, 0.0, -9.81, 0.0));
        assert!(matches!(ev.evaluate(&edge), EdgeOutcome::Infeasible));
        assert_eq!(ev.checker().validity().propagator().oracle().contact_queries, 1);
    }

    #[test]
    fn oracle_failure_is_unevaluable() {
        let mut ev = evaluator(StubOracle::failing());
        let edge = Edge::new(resting(), Control::new(0.5, 0.0, -9.81, 0.0));
        match ev.evaluate(&edge) {
            EdgeOutcome::Unevaluable(err) => assert!(err.is_propagation()),
            other => panic!("expected Unevaluable, got {other:?}"),
        }
    }

    #[test]
    fn batch_matches_sequential() {
        let template = evaluator(StubOracle::drift(1.0));
        let edges: Vec<_> = (0..16)
            .map(|i| Edge::new(resting(), Control::new(0.05 * i as f64, 0.0, -9.81, 0.0)))
            .collect();
        let batch = evaluate_edges(&template, &edges);

        let mut seq = template.clone();
        for (edge, outcome) in edges.iter().zip(&batch) {
            assert_eq!(seq.evaluate(edge).cost(), outcome.cost());
        }
        assert_eq!(batch.len(), edges.len());
    }
}

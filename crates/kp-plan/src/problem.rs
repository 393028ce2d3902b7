//! Cage planning problem configuration.
//!
//! All parameters are plain numbers in SI units. `CageProblem::default()` is the
//! reference setup: an object resting on a gripper at (2, 4) that has to be carried to a
//! goal around (8, 8) in an empty 10 x 10 workspace.

use crate::batch::EdgeEvaluator;
use crate::control_space::CageControlSpace;
use crate::edge_checker::EpsilonEdgeChecker;
use crate::error::{PlanError, PlanResult};
use crate::objective::{CageObjective, CostWeights, EnergyModel};
use crate::validity::ContactAwareSpace;
use kp_core::units::{kg, kgm2, m, mps2};
use kp_core::{Point2, STATE_DIM, State, state_from_slice};
use kp_dynamics::{DEFAULT_CONTACT_MARGIN, FrameTransform, Propagator};
use kp_sim::{CageBodies, CageModel, ContactParams, ForwardSimulator, IntegratorType, SimOptions};
use kp_space::{
    Aabb, BoxBounds, CageConfigurationSpace, CageControlSet, Geometric2DWorkspace,
    standard_bounds,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CageProblem {
    pub x_range: f64,
    pub y_range: f64,
    pub max_velocity: f64,
    pub max_acceleration: f64,
    pub max_steering: f64,
    pub gravity: f64,
    /// Nominal upper bound of control durations (seconds).
    pub time_range: f64,
    pub bodies: BodiesDef,
    pub start_state: Vec<f64>,
    pub goal: GoalDef,
    /// Axis-aligned obstacles as `[x, y, width, height]`.
    pub obstacles: Vec<[f64; 4]>,
    pub planner: PlannerDef,
    pub simulation: SimulationDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodiesDef {
    pub mass_object: f64,
    pub mass_gripper: f64,
    pub moment_gripper: f64,
    pub half_extents_gripper: [f64; 2],
    pub radius_object: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GoalDef {
    pub position: [f64; 2],
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlannerDef {
    pub edge_resolution: f64,
    pub length_per_unit_time: f64,
    pub progress_floor: f64,
    pub time_weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_weight: Option<f64>,
    /// Separation below which object and gripper count as interpenetrating.
    pub contact_margin: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationDef {
    pub dt: f64,
    pub max_steps: usize,
    pub integrator: IntegratorDef,
    pub contact_stiffness: f64,
    pub contact_damping: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorDef {
    #[default]
    Rk4,
    ForwardEuler,
    SemiImplicitEuler,
}

impl Default for CageProblem {
    fn default() -> Self {
        let bodies = BodiesDef::default();
        let y0 = 4.0;
        Self {
            x_range: 10.0,
            y_range: 10.0,
            max_velocity: 10.0,
            max_acceleration: 10.0,
            max_steering: 0.1,
            gravity: 9.81,
            time_range: 1.0,
            start_state: vec![
                2.0,
                y0,
                0.0,
                0.0,
                2.0,
                y0 + bodies.radius_object + bodies.half_extents_gripper[1],
                0.0,
                0.0,
                0.0,
                0.0,
            ],
            bodies,
            goal: GoalDef::default(),
            obstacles: Vec::new(),
            planner: PlannerDef::default(),
            simulation: SimulationDef::default(),
        }
    }
}

impl Default for BodiesDef {
    fn default() -> Self {
        Self {
            mass_object: 1.0,
            mass_gripper: 10.0,
            moment_gripper: 1.0,
            half_extents_gripper: [0.5, 0.1],
            radius_object: 0.01,
        }
    }
}

impl Default for GoalDef {
    fn default() -> Self {
        Self {
            position: [8.0, 8.0],
            radius: 0.5,
        }
    }
}

impl Default for PlannerDef {
    fn default() -> Self {
        let weights = CostWeights::default();
        Self {
            edge_resolution: 1.0,
            length_per_unit_time: 10.0,
            progress_floor: weights.progress_floor,
            time_weight: weights.time_weight,
            energy_weight: weights.energy_weight,
            contact_margin: DEFAULT_CONTACT_MARGIN,
        }
    }
}

impl Default for SimulationDef {
    fn default() -> Self {
        let opts = SimOptions::default();
        let contact = ContactParams::default();
        Self {
            dt: opts.dt,
            max_steps: opts.max_steps,
            integrator: IntegratorDef::default(),
            contact_stiffness: contact.stiffness,
            contact_damping: contact.damping,
        }
    }
}

fn ensure(cond: bool, what: &str) -> PlanResult<()> {
    if cond { Ok(()) } else { Err(PlanError::config(what)) }
}

fn ensure_finite(values: impl IntoIterator<Item = f64>, what: &str) -> PlanResult<()> {
    ensure(values.into_iter().all(f64::is_finite), what)
}

impl CageProblem {
    /// Every numeric field must be finite before any range check applies.
    pub fn validate(&self) -> PlanResult<()> {
        self.validate_finite()?;
        ensure(self.x_range > 0.0 && self.y_range > 0.0, "workspace extent must be positive")?;
        ensure(self.max_velocity > 0.0, "max_velocity must be positive")?;
        ensure(self.max_acceleration > 0.0, "max_acceleration must be positive")?;
        ensure(self.max_steering >= 0.0, "max_steering must be non-negative")?;
        ensure(self.gravity >= 0.0, "gravity must be non-negative")?;
        ensure(self.time_range > 0.0, "time_range must be positive")?;
        ensure(
            self.start_state.len() == STATE_DIM,
            "start_state must have 10 components",
        )?;
        ensure(self.goal.radius >= 0.0, "goal radius must be non-negative")?;
        ensure(
            self.obstacles.iter().all(|o| o[2] >= 0.0 && o[3] >= 0.0),
            "obstacle width and height must be non-negative",
        )?;
        ensure(
            self.planner.edge_resolution > 0.0,
            "edge_resolution must be positive",
        )?;
        ensure(
            self.planner.length_per_unit_time > 0.0,
            "length_per_unit_time must be positive",
        )?;
        ensure(
            self.planner.progress_floor > 0.0,
            "progress_floor must be positive",
        )?;
        ensure(self.planner.time_weight >= 0.0, "time_weight must be non-negative")?;
        ensure(
            self.planner.energy_weight.is_none_or(|w| w >= 0.0),
            "energy_weight must be non-negative",
        )?;
        ensure(
            self.simulation.contact_stiffness > 0.0 && self.simulation.contact_damping >= 0.0,
            "contact stiffness must be positive and damping non-negative",
        )?;
        Ok(())
    }

    fn validate_finite(&self) -> PlanResult<()> {
        ensure_finite(
            [
                self.x_range,
                self.y_range,
                self.max_velocity,
                self.max_acceleration,
                self.max_steering,
                self.gravity,
                self.time_range,
            ],
            "workspace and actuation limits must be finite",
        )?;
        let b = &self.bodies;
        ensure_finite(
            [b.mass_object, b.mass_gripper, b.moment_gripper, b.radius_object]
                .into_iter()
                .chain(b.half_extents_gripper),
            "body parameters must be finite",
        )?;
        ensure_finite(self.start_state.iter().copied(), "start_state must be finite")?;
        ensure_finite(
            self.goal.position.into_iter().chain([self.goal.radius]),
            "goal must be finite",
        )?;
        ensure_finite(
            self.obstacles.iter().flatten().copied(),
            "obstacles must be finite",
        )?;
        let p = &self.planner;
        ensure_finite(
            [
                p.edge_resolution,
                p.length_per_unit_time,
                p.progress_floor,
                p.time_weight,
                p.contact_margin,
            ]
            .into_iter()
            .chain(p.energy_weight),
            "planner parameters must be finite",
        )?;
        let sim = &self.simulation;
        ensure_finite(
            [sim.dt, sim.contact_stiffness, sim.contact_damping],
            "simulation parameters must be finite",
        )
    }

    pub fn from_yaml_str(content: &str) -> PlanResult<Self> {
        let problem: CageProblem = serde_yaml::from_str(content)?;
        problem.validate()?;
        Ok(problem)
    }

    pub fn to_yaml_string(&self) -> PlanResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn start(&self) -> PlanResult<State> {
        state_from_slice(&self.start_state).map_err(|e| PlanError::config(e.to_string()))
    }

    pub fn workspace(&self) -> Geometric2DWorkspace {
        self.obstacles.iter().fold(
            Geometric2DWorkspace::with_extent(self.x_range, self.y_range),
            |ws, o| ws.with_obstacle(Aabb::from_xywh(o[0], o[1], o[2], o[3])),
        )
    }

    pub fn configuration_space(&self) -> PlanResult<CageConfigurationSpace> {
        let bounds = standard_bounds(self.x_range, self.y_range, self.max_velocity)?;
        let [hx, hy] = self.bodies.half_extents_gripper;
        Ok(CageConfigurationSpace::new(
            self.workspace(),
            bounds,
            Point2::new(hx, hy),
        )?)
    }

    pub fn control_set(&self) -> PlanResult<CageControlSet> {
        Ok(CageControlSet::for_gripper(
            self.time_range,
            self.max_acceleration,
            self.gravity,
            self.max_steering,
        )?)
    }

    /// Object within `goal.radius` of the goal along each axis; every other slot free
    /// within its bounds.
    pub fn goal_set(&self) -> PlanResult<BoxBounds<STATE_DIM>> {
        let [gx, gy] = self.goal.position;
        let r = self.goal.radius;
        let v = self.max_velocity;
        Ok(BoxBounds::from_arrays(
            [gx - r, gy - r, -v, -v, 0.0, 0.0, -PI, -v, -v, -v],
            [gx + r, gy + r, v, v, self.x_range, self.y_range, PI, v, v, v],
        )?)
    }

    pub fn goal_contains(&self, x: &State) -> PlanResult<bool> {
        Ok(self.goal_set()?.contains(x))
    }

    pub fn bodies(&self) -> PlanResult<CageBodies> {
        let b = &self.bodies;
        let [hx, hy] = b.half_extents_gripper;
        Ok(CageBodies::new(
            kg(b.mass_object),
            kg(b.mass_gripper),
            kgm2(b.moment_gripper),
            [m(hx), m(hy)],
            m(b.radius_object),
            mps2(self.gravity),
        )?)
    }

    /// A fresh, independent simulation session.
    pub fn simulator(&self) -> PlanResult<ForwardSimulator> {
        let sim = &self.simulation;
        let model = CageModel::new(
            self.bodies()?,
            ContactParams {
                stiffness: sim.contact_stiffness,
                damping: sim.contact_damping,
            },
        );
        let opts = SimOptions {
            dt: sim.dt,
            max_steps: sim.max_steps,
            integrator: match sim.integrator {
                IntegratorDef::Rk4 => IntegratorType::RK4,
                IntegratorDef::ForwardEuler => IntegratorType::ForwardEuler,
                IntegratorDef::SemiImplicitEuler => IntegratorType::SemiImplicitEuler,
            },
        };
        Ok(ForwardSimulator::new(model, opts)?)
    }

    pub fn propagator(&self) -> PlanResult<Propagator<ForwardSimulator>> {
        Ok(Propagator::new(self.simulator()?, FrameTransform::new(self.y_range))
            .with_contact_margin(self.planner.contact_margin))
    }

    pub fn control_space(&self) -> PlanResult<CageControlSpace<ForwardSimulator>> {
        Ok(CageControlSpace::new(
            self.propagator()?,
            self.configuration_space()?,
            self.control_set()?,
            self.planner.length_per_unit_time,
        ))
    }

    pub fn cost_weights(&self) -> CostWeights {
        CostWeights {
            progress_floor: self.planner.progress_floor,
            time_weight: self.planner.time_weight,
            energy_weight: self.planner.energy_weight,
        }
    }

    pub fn energy_model(&self) -> EnergyModel {
        EnergyModel {
            mass_object: self.bodies.mass_object,
            mass_gripper: self.bodies.mass_gripper,
            moment_gripper: self.bodies.moment_gripper,
            gravity: self.gravity,
            y_range: self.y_range,
        }
    }

    /// Objective with its own session, independent of the control space's.
    pub fn objective(&self) -> PlanResult<CageObjective<ForwardSimulator>> {
        let [gx, gy] = self.goal.position;
        Ok(CageObjective::new(
            self.propagator()?,
            Point2::new(gx, gy),
            self.cost_weights(),
            self.energy_model(),
        ))
    }

    /// Edge checker whose penetration checks run on their own session.
    pub fn edge_checker(
        &self,
    ) -> PlanResult<EpsilonEdgeChecker<ContactAwareSpace<ForwardSimulator>>> {
        let validity = ContactAwareSpace::new(self.configuration_space()?, self.propagator()?);
        EpsilonEdgeChecker::new(validity, self.planner.edge_resolution)
    }

    pub fn evaluator(&self) -> PlanResult<EdgeEvaluator<ForwardSimulator>> {
        Ok(EdgeEvaluator::new(
            self.control_space()?,
            self.edge_checker()?,
            self.objective()?,
        ))
    }
}

pub fn load_yaml(path: &Path) -> PlanResult<CageProblem> {
    let content = std::fs::read_to_string(path)?;
    CageProblem::from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, problem: &CageProblem) -> PlanResult<()> {
    problem.validate()?;
    std::fs::write(path, problem.to_yaml_string()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kp_space::ConfigurationSpace;

    #[test]
    fn defaults_validate() {
        let p = CageProblem::default();
        p.validate().unwrap();
        let start = p.start().unwrap();
        assert!((start[5] - 4.11).abs() < 1e-12);
        assert!(p.configuration_space().unwrap().feasible(&start));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let p = CageProblem::from_yaml_str(
            "obstacles:\n  - [4.0, 0.0, 1.0, 6.0]\nplanner:\n  energy_weight: 0.5\n",
        )
        .unwrap();
        assert_eq!(p.obstacles, vec![[4.0, 0.0, 1.0, 6.0]]);
        assert_eq!(p.planner.energy_weight, Some(0.5));
        assert_eq!(p.planner.edge_resolution, 1.0);
        assert_eq!(p.x_range, 10.0);
    }

    #[test]
    fn bad_start_state_rejected() {
        let err = CageProblem::from_yaml_str("start_state: [1.0, 2.0]\n").unwrap_err();
        assert!(matches!(err, PlanError::Config { .. }));
    }

    #[test]
    fn infinite_values_rejected() {
        for yaml in [
            "max_acceleration: .inf\n",
            "obstacles:\n  - [1.0, 1.0, .inf, 1.0]\n",
            "planner:\n  energy_weight: .inf\n",
            "simulation:\n  contact_damping: .inf\n",
        ] {
            let err = CageProblem::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, PlanError::Config { .. }), "{yaml}");
        }
    }

    #[test]
    fn goal_set_is_a_box_around_goal() {
        let p = CageProblem::default();
        let goal = p.goal_set().unwrap();
        let mut x = p.start().unwrap();
        assert!(!goal.contains(&x));
        x[0] = 8.4;
        x[1] = 7.6;
        assert!(goal.contains(&x));
        assert!(p.goal_contains(&x).unwrap());
    }

    #[test]
    fn yaml_round_trip() {
        let mut p = CageProblem::default();
        p.obstacles.push([1.0, 1.0, 0.5, 0.5]);
        let text = p.to_yaml_string().unwrap();
        assert_eq!(CageProblem::from_yaml_str(&text).unwrap(), p);
    }
}

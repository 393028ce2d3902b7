//! Edge evaluation for sampling-based kinodynamic planning.
//!
//! An outer planner picks a state and a control, asks the control space for an
//! interpolator, hands it to the edge checker and, when the edge is feasible, asks the
//! objective for its incremental cost.
//!
//! Provides:
//! - `CageInterpolator`: the trajectory swept by one control, evaluated at any progress
//! - `EpsilonEdgeChecker`: resolution-bounded feasibility of a whole trajectory
//! - `ContactAwareSpace`: per-state bounds, obstacle and inter-body penetration checks
//! - `CageObjective`: goal-progress + time (+ optional energy) incremental cost
//! - `CageProblem`: serde configuration that builds all of the above
//! - `evaluate_edges`: parallel batch evaluation, one oracle session per worker

pub mod batch;
pub mod control_space;
pub mod edge_checker;
pub mod error;
pub mod interpolator;
pub mod objective;
pub mod problem;
pub mod validity;

pub use batch::{Edge, EdgeEvaluator, EdgeOutcome, evaluate_edges};
pub use control_space::CageControlSpace;
pub use edge_checker::{EdgeChecker, EpsilonEdgeChecker};
pub use error::{PlanError, PlanResult};
pub use interpolator::{CageInterpolator, Interpolator};
pub use objective::{CageObjective, CostBreakdown, CostWeights, EnergyModel, ObjectiveFunction};
pub use problem::{
    BodiesDef, CageProblem, GoalDef, IntegratorDef, PlannerDef, SimulationDef, load_yaml,
    save_yaml,
};
pub use validity::{ContactAwareSpace, StateValidity};

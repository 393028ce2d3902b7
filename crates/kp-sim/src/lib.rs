//! Reference dynamics oracle for the cage problem.
//!
//! Provides:
//! - `TransientModel` trait for pluggable dynamic systems
//! - Fixed-step RK4, forward Euler and symplectic Euler integrators
//! - Planar object + box gripper model with penalty contact
//! - `ForwardSimulator`, a fixed-timestep session implementing `DynamicsOracle`

pub mod bodies;
pub mod cage;
pub mod error;
pub mod integrator;
pub mod model;
pub mod simulator;

pub use bodies::{CageBodies, ContactGeometry, ContactParams};
pub use cage::CageModel;
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, RK4, SemiImplicitEuler};
pub use model::TransientModel;
pub use simulator::{ForwardSimulator, IntegratorType, SimOptions};

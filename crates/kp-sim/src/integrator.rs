//! Fixed-step integrators over [`State`].

use crate::error::SimResult;
use crate::model::TransientModel;
use kp_core::{Real, State, slot};

/// (position, velocity) slot pairs: each position's derivative is its velocity slot.
const KINEMATIC_PAIRS: [(usize, usize); 5] = [
    (slot::OBJECT_X, slot::OBJECT_VX),
    (slot::OBJECT_Y, slot::OBJECT_VY),
    (slot::GRIPPER_X, slot::GRIPPER_VX),
    (slot::GRIPPER_Y, slot::GRIPPER_VY),
    (slot::GRIPPER_THETA, slot::GRIPPER_OMEGA),
];

pub trait Integrator {
    /// Advance `x` by one step of `dt` under `model`.
    fn step<M: TransientModel + ?Sized>(
        &self,
        model: &mut M,
        t: Real,
        x: &State,
        dt: Real,
    ) -> SimResult<State>;
}

/// Classical 4th-order Runge-Kutta.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel + ?Sized>(
        &self,
        model: &mut M,
        t: Real,
        x: &State,
        dt: Real,
    ) -> SimResult<State> {
        let half = 0.5 * dt;
        let k1 = model.rhs(t, x)?;
        let k2 = model.rhs(t + half, &(x + k1 * half))?;
        let k3 = model.rhs(t + half, &(x + k2 * half))?;
        let k4 = model.rhs(t + dt, &(x + k3 * dt))?;
        Ok(x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0))
    }
}

/// Explicit Euler. One `rhs` call per step.
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel + ?Sized>(
        &self,
        model: &mut M,
        t: Real,
        x: &State,
        dt: Real,
    ) -> SimResult<State> {
        Ok(x + model.rhs(t, x)? * dt)
    }
}

/// Symplectic Euler: velocities first, then positions from the updated velocities.
///
/// One `rhs` call per step, but contact springs stay bounded in energy where forward
/// Euler slowly pumps energy in.
#[derive(Clone, Debug)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn step<M: TransientModel + ?Sized>(
        &self,
        model: &mut M,
        t: Real,
        x: &State,
        dt: Real,
    ) -> SimResult<State> {
        let xdot = model.rhs(t, x)?;
        let mut next = *x;
        for (p, v) in KINEMATIC_PAIRS {
            next[v] = x[v] + xdot[v] * dt;
            next[p] = x[p] + next[v] * dt;
        }
        Ok(next)
    }
}

//! Fixed-timestep simulation session exposed as a dynamics oracle.

use crate::cage::CageModel;
use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, RK4, SemiImplicitEuler};
use kp_core::{Control, Real, State, ensure_all_finite};
use kp_dynamics::{ContactPoint, DynamicsOracle, OracleError, OracleResult};
use tracing::trace;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    ForwardEuler,
    /// Symplectic Euler (1st-order, 1 rhs call per step, stable contact springs).
    SemiImplicitEuler,
}

/// Options for the simulation session.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Fixed physical time step (seconds)
    pub dt: f64,
    /// Maximum number of steps in one `advance` (safety limit)
    pub max_steps: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1.0 / 240.0,
            max_steps: 100_000,
            integrator: IntegratorType::default(),
        }
    }
}

/// One simulation session. Holds the current state between calls.
#[derive(Clone, Debug)]
pub struct ForwardSimulator {
    model: CageModel,
    opts: SimOptions,
    q: State,
}

impl ForwardSimulator {
    pub fn new(model: CageModel, opts: SimOptions) -> SimResult<Self> {
        if !(opts.dt.is_finite() && opts.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if opts.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(Self {
            model,
            opts,
            q: State::zeros(),
        })
    }

    pub fn state(&self) -> &State {
        &self.q
    }

    pub fn model(&self) -> &CageModel {
        &self.model
    }

    pub fn options(&self) -> &SimOptions {
        &self.opts
    }

    /// Integrate the current state for `duration` seconds: whole `dt` steps followed by
    /// one shorter step for any remainder. Every step's state is appended to `record`.
    pub fn run(
        &mut self,
        duration: Real,
        mut record: Option<&mut Vec<State>>,
    ) -> SimResult<State> {
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "duration must be finite and non-negative",
            });
        }
        let dt = self.opts.dt;
        let full = (duration / dt).floor() as usize;
        let remainder = duration - full as Real * dt;
        let tail = remainder > dt * 1e-9;
        let steps = full + usize::from(tail);
        if steps > self.opts.max_steps {
            return Err(SimError::StepLimit {
                steps,
                limit: self.opts.max_steps,
            });
        }

        let mut t = 0.0;
        for i in 0..steps {
            let h = if i < full { dt } else { remainder };
            let (model, q) = (&mut self.model, &self.q);
            let next = match self.opts.integrator {
                IntegratorType::RK4 => RK4.step(model, t, q, h)?,
                IntegratorType::ForwardEuler => ForwardEuler.step(model, t, q, h)?,
                IntegratorType::SemiImplicitEuler => SemiImplicitEuler.step(model, t, q, h)?,
            };
            ensure_all_finite(next.as_slice(), "simulated state")?;
            self.q = next;
            t += h;
            if let Some(out) = record.as_deref_mut() {
                out.push(self.q);
            }
        }
        trace!(steps, duration, "advanced simulation");
        Ok(self.q)
    }
}

impl DynamicsOracle for ForwardSimulator {
    fn reset(&mut self, q: &State) -> OracleResult<()> {
        ensure_all_finite(q.as_slice(), "reset state").map_err(|e| {
            OracleError::InvalidConfiguration {
                what: e.to_string(),
            }
        })?;
        self.q = *q;
        Ok(())
    }

    fn advance(
        &mut self,
        mu: &Control,
        via_points: Option<&mut Vec<State>>,
    ) -> OracleResult<State> {
        self.model.set_actuation(mu[1], mu[2], mu[3]);
        Ok(self.run(mu[0], via_points)?)
    }

    fn contacts(&mut self, margin: Real) -> OracleResult<Vec<ContactPoint>> {
        let geom = self.model.bodies().contact_geometry(&self.q);
        if geom.separation <= margin {
            Ok(vec![ContactPoint {
                position: geom.point,
                distance: geom.separation,
            }])
        } else {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{CageBodies, ContactParams};
    use kp_core::units::{kg, kgm2, m, mps2};

    fn simulator(opts: SimOptions) -> ForwardSimulator {
        let bodies =
            CageBodies::new(kg(1.0), kg(10.0), kgm2(1.0), [m(0.5), m(0.1)], m(0.01), mps2(9.81))
                .unwrap();
        ForwardSimulator::new(CageModel::new(bodies, ContactParams::default()), opts).unwrap()
    }

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.dt, 1.0 / 240.0);
        assert_eq!(opts.max_steps, 100_000);
        assert_eq!(opts.integrator, IntegratorType::RK4);
    }

    #[test]
    fn invalid_options_rejected() {
        let bodies =
            CageBodies::new(kg(1.0), kg(10.0), kgm2(1.0), [m(0.5), m(0.1)], m(0.01), mps2(9.81))
                .unwrap();
        let model = CageModel::new(bodies, ContactParams::default());
        let zero_dt = SimOptions {
            dt: 0.0,
            ..SimOptions::default()
        };
        assert!(ForwardSimulator::new(model.clone(), zero_dt).is_err());
        let no_steps = SimOptions {
            max_steps: 0,
            ..SimOptions::default()
        };
        assert!(ForwardSimulator::new(model, no_steps).is_err());
    }

    #[test]
    fn remainder_step_covers_exact_duration() {
        let mut sim = simulator(SimOptions {
            dt: 0.25,
            ..SimOptions::default()
        });
        // Lone object in free fall, gripper far below and holding.
        let q0 = State::from_column_slice(&[1.0, 9.0, 0.0, 0.0, 8.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        sim.reset(&q0).unwrap();
        let mut via = Vec::new();
        let q = sim.run(0.6, Some(&mut via)).unwrap();
        assert_eq!(via.len(), 3);
        let expected_y = 9.0 - 0.5 * 9.81 * 0.6 * 0.6;
        assert!((q[1] - expected_y).abs() < 1e-9);
    }

    #[test]
    fn step_limit_is_enforced() {
        let mut sim = simulator(SimOptions {
            dt: 0.1,
            max_steps: 5,
            ..SimOptions::default()
        });
        let err = sim.run(1.0, None).unwrap_err();
        assert!(matches!(err, SimError::StepLimit { limit: 5, .. }));
    }

    #[test]
    fn non_finite_reset_rejected() {
        let mut sim = simulator(SimOptions::default());
        let mut q = State::zeros();
        q[3] = f64::NAN;
        assert!(matches!(
            sim.reset(&q),
            Err(OracleError::InvalidConfiguration { .. })
        ));
    }
}

//! Trajectory swept by one fixed control from one fixed start state.

use kp_core::{Control, Real, State, duration};
use kp_dynamics::{DynamicsOracle, DynamicsResult, Propagator};

/// A continuous trajectory segment parameterized by progress `s` in `[0, 1]`.
pub trait Interpolator {
    /// State at `s = 0`.
    fn start(&mut self) -> DynamicsResult<State>;

    /// State at `s = 1`.
    fn end(&mut self) -> DynamicsResult<State>;

    /// State at progress `s`.
    fn eval(&mut self, s: Real) -> DynamicsResult<State>;

    /// Size estimate used to pick a sampling resolution. Not an arc length.
    fn length(&self) -> Real;
}

impl<I: Interpolator + ?Sized> Interpolator for &mut I {
    fn start(&mut self) -> DynamicsResult<State> {
        (**self).start()
    }

    fn end(&mut self) -> DynamicsResult<State> {
        (**self).end()
    }

    fn eval(&mut self, s: Real) -> DynamicsResult<State> {
        (**self).eval(s)
    }

    fn length(&self) -> Real {
        (**self).length()
    }
}

/// Evaluates progress `s` by propagating `x0` under `u` with duration scaled by `s`.
///
/// Each evaluation restarts from `x0`; midpoints are never chained, since the oracle
/// re-integrates from `t = 0` on every call. Endpoints are cached after first use, so an
/// instance must stay on one thread.
pub struct CageInterpolator<'a, O> {
    propagator: &'a mut Propagator<O>,
    x0: State,
    u: Control,
    length_per_unit_time: Real,
    start: Option<State>,
    end: Option<State>,
}

impl<'a, O: DynamicsOracle> CageInterpolator<'a, O> {
    pub fn new(
        propagator: &'a mut Propagator<O>,
        x0: State,
        u: Control,
        length_per_unit_time: Real,
    ) -> Self {
        Self {
            propagator,
            x0,
            u,
            length_per_unit_time,
            start: None,
            end: None,
        }
    }

    pub fn start_state(&self) -> &State {
        &self.x0
    }

    pub fn control(&self) -> &Control {
        &self.u
    }

    /// Full-duration end state, also appending every oracle sub-step to `via_points`.
    ///
    /// Always propagates; the returned state equals [`Interpolator::end`].
    pub fn end_with_via_points(
        &mut self,
        via_points: &mut Vec<State>,
    ) -> DynamicsResult<State> {
        let x1 = self
            .propagator
            .reset_and_advance_recording(&self.x0, &self.u, 1.0, via_points)?;
        self.end.get_or_insert(x1);
        Ok(x1)
    }
}

impl<O: DynamicsOracle> Interpolator for CageInterpolator<'_, O> {
    fn start(&mut self) -> DynamicsResult<State> {
        if let Some(x) = self.start {
            return Ok(x);
        }
        let x = self.eval(0.0)?;
        self.start = Some(x);
        Ok(x)
    }

    fn end(&mut self) -> DynamicsResult<State> {
        if let Some(x) = self.end {
            return Ok(x);
        }
        let x = self.eval(1.0)?;
        self.end = Some(x);
        Ok(x)
    }

    fn eval(&mut self, s: Real) -> DynamicsResult<State> {
        self.propagator.reset_and_advance(&self.x0, &self.u, s)
    }

    fn length(&self) -> Real {
        duration(&self.u) * self.length_per_unit_time
    }
}

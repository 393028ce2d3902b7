//! Feasibility of a whole trajectory segment by discrete sampling.

use crate::error::{PlanError, PlanResult};
use crate::interpolator::Interpolator;
use crate::validity::StateValidity;
use kp_core::Real;
use kp_dynamics::{DynamicsError, DynamicsResult};
use tracing::{debug, trace};

/// Decides whether every point along an interpolator is feasible.
///
/// `Ok(false)` means the edge is known to be infeasible. A propagation failure is
/// returned as `Err`; it is not an infeasibility verdict.
pub trait EdgeChecker {
    fn feasible<I: Interpolator + ?Sized>(
        &mut self,
        interpolator: &mut I,
    ) -> DynamicsResult<bool>;
}

/// Checks both endpoints, then `k = ceil(length / resolution)` interior points at
/// `u = (i + 1) / (k + 2)`, every one of them against the same [`StateValidity`].
///
/// Interior samples never land on an endpoint, even for `k = 1`. Features narrower than
/// `resolution` between consecutive samples can be missed.
#[derive(Clone, Debug)]
pub struct EpsilonEdgeChecker<S> {
    validity: S,
    resolution: Real,
}

impl<S> EpsilonEdgeChecker<S> {
    pub fn new(validity: S, resolution: Real) -> PlanResult<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(PlanError::config(format!(
                "edge resolution must be positive and finite, got {resolution}"
            )));
        }
        Ok(Self {
            validity,
            resolution,
        })
    }

    pub fn validity(&self) -> &S {
        &self.validity
    }

    pub fn resolution(&self) -> Real {
        self.resolution
    }

    /// Number of interior samples for a trajectory of the given length.
    pub fn interior_samples(&self, length: Real) -> DynamicsResult<usize> {
        if !(length.is_finite() && length >= 0.0) {
            return Err(DynamicsError::contract(format!(
                "interpolator length {length} must be finite and non-negative"
            )));
        }
        Ok((length / self.resolution).ceil() as usize)
    }

    /// Progress values visited for `k` interior samples.
    pub fn sample_parameters(k: usize) -> impl Iterator<Item = Real> {
        (0..k).map(move |i| (i + 1) as Real / (k + 2) as Real)
    }
}

impl<S: StateValidity> EdgeChecker for EpsilonEdgeChecker<S> {
    fn feasible<I: Interpolator + ?Sized>(
        &mut self,
        interpolator: &mut I,
    ) -> DynamicsResult<bool> {
        let k = self.interior_samples(interpolator.length())?;

        if !self.validity.valid(&interpolator.start()?)? {
            debug!("edge rejected at start");
            return Ok(false);
        }
        if !self.validity.valid(&interpolator.end()?)? {
            debug!("edge rejected at end");
            return Ok(false);
        }

        for (i, u) in Self::sample_parameters(k).enumerate() {
            let x = interpolator.eval(u)?;
            if !self.validity.valid(&x)? {
                debug!(sample = i, progress = u, interior = k, "edge rejected inside");
                return Ok(false);
            }
        }
        trace!(interior = k, "edge feasible");
        Ok(true)
    }
}

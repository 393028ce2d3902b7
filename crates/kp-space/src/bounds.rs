//! Per-dimension `[min, max]` bounds over fixed-size vectors.

use crate::error::{SpaceError, SpaceResult};
use kp_core::Real;
use nalgebra::SVector;
use rand::Rng;

/// Axis-aligned box in `N` dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxBounds<const N: usize> {
    min: SVector<Real, N>,
    max: SVector<Real, N>,
}

impl<const N: usize> BoxBounds<N> {
    /// Create bounds; every `min[i] <= max[i]` and both finite.
    pub fn new(min: SVector<Real, N>, max: SVector<Real, N>) -> SpaceResult<Self> {
        for dim in 0..N {
            if let Some(value) = [min[dim], max[dim]].into_iter().find(|v| !v.is_finite()) {
                return Err(SpaceError::NonFinite { dim, value });
            }
            if min[dim] > max[dim] {
                return Err(SpaceError::InvertedBounds {
                    dim,
                    min: min[dim],
                    max: max[dim],
                });
            }
        }
        Ok(Self { min, max })
    }

    pub fn from_arrays(min: [Real; N], max: [Real; N]) -> SpaceResult<Self> {
        Self::new(SVector::from(min), SVector::from(max))
    }

    pub fn min(&self) -> &SVector<Real, N> {
        &self.min
    }

    pub fn max(&self) -> &SVector<Real, N> {
        &self.max
    }

    /// True iff every component lies in its closed interval. NaN is never contained.
    pub fn contains(&self, v: &SVector<Real, N>) -> bool {
        self.first_violation(v).is_none()
    }

    /// Index of the first dimension out of range, if any.
    pub fn first_violation(&self, v: &SVector<Real, N>) -> Option<usize> {
        (0..N).find(|&i| !(v[i] >= self.min[i] && v[i] <= self.max[i]))
    }

    /// Uniform sample.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> SVector<Real, N> {
        SVector::from_fn(|i, _| {
            if self.min[i] == self.max[i] {
                self.min[i]
            } else {
                rng.random_range(self.min[i]..=self.max[i])
            }
        })
    }
}

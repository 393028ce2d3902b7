use crate::KpError;
use nalgebra::SVector;

/// Floating point type used throughout the planner
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Component-wise `nearly_equal` over two fixed-size vectors.
pub fn vectors_nearly_equal<const N: usize>(
    a: &SVector<Real, N>,
    b: &SVector<Real, N>,
    tol: Tolerances,
) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| nearly_equal(*x, *y, tol))
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, KpError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(KpError::NonFinite { what, value: v })
    }
}

/// Fails on the first non-finite component.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), KpError> {
    for &v in values {
        ensure_finite(v, what)?;
    }
    Ok(())
}

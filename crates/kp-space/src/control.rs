//! Control set: a duration dimension followed by thrust and steering limits.
//!
//! The duration is sampled with a bias toward short controls; the planner uses the
//! samples, this crate only exposes the set and its bounds.

use crate::bounds::BoxBounds;
use crate::error::{SpaceError, SpaceResult};
use kp_core::{CONTROL_DIM, Control, Real};
use nalgebra::Vector3;
use rand::Rng;

/// Duration dimension on `[0, time_range]`, sampled as `time_range * r²`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeBiasSet {
    time_range: Real,
}

impl TimeBiasSet {
    pub fn new(time_range: Real) -> SpaceResult<Self> {
        if !(time_range.is_finite() && time_range > 0.0) {
            return Err(SpaceError::InvalidArg {
                what: "time_range must be positive and finite",
            });
        }
        Ok(Self { time_range })
    }

    pub fn time_range(&self) -> Real {
        self.time_range
    }

    pub fn contains(&self, t: Real) -> bool {
        (0.0..=self.time_range).contains(&t)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Real {
        let r: Real = rng.random();
        self.time_range * r * r
    }
}

/// Full control set: `[duration, thrust_x, thrust_y, alpha]`.
#[derive(Clone, Debug, PartialEq)]
pub struct CageControlSet {
    time: TimeBiasSet,
    actuation: BoxBounds<3>,
}

impl CageControlSet {
    pub fn new(time: TimeBiasSet, actuation: BoxBounds<3>) -> Self {
        Self { time, actuation }
    }

    /// Thrust in `[-a, a]` horizontally and `[-g - a, -g + a/10]` vertically (the
    /// vertical axis points down, so holding position needs `-g`), steering in
    /// `±max_steering`.
    pub fn for_gripper(
        time_range: Real,
        max_acceleration: Real,
        gravity: Real,
        max_steering: Real,
    ) -> SpaceResult<Self> {
        let a = max_acceleration;
        let actuation = BoxBounds::from_arrays(
            [-a, -gravity - a, -max_steering],
            [a, -gravity + a / 10.0, max_steering],
        )?;
        Ok(Self::new(TimeBiasSet::new(time_range)?, actuation))
    }

    pub fn time(&self) -> &TimeBiasSet {
        &self.time
    }

    pub fn actuation(&self) -> &BoxBounds<3> {
        &self.actuation
    }

    /// Bounds of the whole control vector, duration first.
    pub fn bounds(&self) -> SpaceResult<BoxBounds<CONTROL_DIM>> {
        let (lo, hi) = (self.actuation.min(), self.actuation.max());
        BoxBounds::from_arrays(
            [0.0, lo[0], lo[1], lo[2]],
            [self.time.time_range(), hi[0], hi[1], hi[2]],
        )
    }

    pub fn contains(&self, u: &Control) -> bool {
        let actuation = Vector3::new(u[1], u[2], u[3]);
        self.time.contains(u[0]) && self.actuation.contains(&actuation)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Control {
        let t = self.time.sample(rng);
        let a = self.actuation.sample(rng);
        Control::new(t, a[0], a[1], a[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cage_set() -> CageControlSet {
        CageControlSet::for_gripper(1.0, 10.0, 9.81, 0.1).unwrap()
    }

    #[test]
    fn bounds_put_duration_first() {
        let b = cage_set().bounds().unwrap();
        assert_eq!(b.min()[0], 0.0);
        assert_eq!(b.max()[0], 1.0);
        assert!((b.min()[2] - (-19.81)).abs() < 1e-12);
        assert!((b.max()[2] - (-8.81)).abs() < 1e-12);
        assert_eq!(b.max()[3], 0.1);
    }

    #[test]
    fn hover_control_is_contained() {
        let set = cage_set();
        assert!(set.contains(&Control::new(1.0, 0.0, -9.81, 0.0)));
        assert!(set.contains(&Control::new(0.0, 0.0, -9.81, 0.0)));
        assert!(!set.contains(&Control::new(-0.1, 0.0, -9.81, 0.0)));
        assert!(!set.contains(&Control::new(0.5, 0.0, -9.81, 0.2)));
    }

    #[test]
    fn samples_are_contained() {
        let set = cage_set();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            assert!(set.contains(&set.sample(&mut rng)));
        }
    }

    #[test]
    fn duration_sampling_biased_short() {
        let time = TimeBiasSet::new(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let n = 4000;
        let below_quarter = (0..n).filter(|_| time.sample(&mut rng) < 0.25).count();
        // P(r² < 1/4) = 1/2, versus 1/4 for a uniform draw.
        assert!(below_quarter as f64 / n as f64 > 0.4);
    }

    #[test]
    fn time_range_must_be_positive() {
        assert!(TimeBiasSet::new(0.0).is_err());
        assert!(TimeBiasSet::new(Real::INFINITY).is_err());
    }

    #[test]
    fn unbounded_thrust_is_rejected() {
        let err = CageControlSet::for_gripper(1.0, Real::INFINITY, 9.81, 0.1).unwrap_err();
        assert!(matches!(err, SpaceError::NonFinite { dim: 0, .. }));
    }
}

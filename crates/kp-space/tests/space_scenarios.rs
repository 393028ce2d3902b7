//! Scenario tests for cage configuration and control spaces.

use kp_core::{Point2, State, slot};
use kp_space::{
    Aabb, CageConfigurationSpace, CageControlSet, ConfigurationSpace, Geometric2DWorkspace,
    standard_bounds,
};
use proptest::prelude::*;

fn cage_space(ws: Geometric2DWorkspace) -> CageConfigurationSpace {
    CageConfigurationSpace::new(
        ws,
        standard_bounds(10.0, 10.0, 10.0).unwrap(),
        Point2::new(0.5, 0.1),
    )
    .unwrap()
}

fn resting_state() -> State {
    State::from_column_slice(&[2.0, 4.0, 0.0, 0.0, 2.0, 4.11, 0.0, 0.0, 0.0, 0.0])
}

#[test]
fn x_beyond_extent_infeasible_with_or_without_obstacles() {
    let mut x = resting_state();
    x[slot::OBJECT_X] = 11.0;

    let free = cage_space(Geometric2DWorkspace::with_extent(10.0, 10.0));
    let cluttered = cage_space(
        Geometric2DWorkspace::with_extent(10.0, 10.0)
            .with_obstacle(Aabb::from_xywh(5.0, 5.0, 1.0, 1.0)),
    );
    assert!(!free.feasible(&x));
    assert!(!cluttered.feasible(&x));
}

#[test]
fn obstacle_under_gripper_middle_is_caught() {
    // Sits between the gripper's corners, away from the object.
    let mut x = resting_state();
    x[slot::OBJECT_X] = 6.0;
    let ws = Geometric2DWorkspace::with_extent(10.0, 10.0)
        .with_obstacle(Aabb::from_xywh(1.9, 4.05, 0.2, 0.1));
    assert!(!cage_space(ws.clone()).feasible(&x));

    x[slot::GRIPPER_X] = 3.0;
    assert!(cage_space(ws).feasible(&x));
}

#[test]
fn descriptor_is_usable_by_reference() {
    let cs = cage_space(Geometric2DWorkspace::with_extent(10.0, 10.0));
    let by_ref: &dyn ConfigurationSpace = &cs;
    assert_eq!(by_ref.dimension(), 10);
    assert!(by_ref.feasible(&resting_state()));
}

proptest! {
    #[test]
    fn any_object_x_past_extent_is_rejected(x_obj in 10.000_001_f64..1e6, y_obj in 0.0_f64..10.0) {
        let cs = cage_space(Geometric2DWorkspace::with_extent(10.0, 10.0));
        let mut x = resting_state();
        x[slot::OBJECT_X] = x_obj;
        x[slot::OBJECT_Y] = y_obj;
        prop_assert!(!cs.feasible(&x));
    }

    #[test]
    fn obstacle_anywhere_in_gripper_footprint_is_rejected(
        gx in 1.0_f64..9.0,
        gy in 1.0_f64..9.0,
        theta in -3.1_f64..3.1,
        a in -0.9_f64..0.9,
        b in -0.9_f64..0.9,
    ) {
        let (s, c) = theta.sin_cos();
        let local = Point2::new(a * 0.5, b * 0.1);
        let px = gx + c * local.x - s * local.y;
        let py = gy + s * local.x + c * local.y;
        let ws = Geometric2DWorkspace::with_extent(10.0, 10.0)
            .with_obstacle(Aabb::from_xywh(px - 0.005, py - 0.005, 0.01, 0.01));
        let mut x = resting_state();
        x[slot::GRIPPER_X] = gx;
        x[slot::GRIPPER_Y] = gy;
        x[slot::GRIPPER_THETA] = theta;
        prop_assert!(!cage_space(ws).feasible(&x));
    }

    #[test]
    fn sampled_controls_respect_bounds(seed in any::<u64>()) {
        use rand::SeedableRng;
        let set = CageControlSet::for_gripper(1.0, 10.0, 9.81, 0.1).unwrap();
        let bounds = set.bounds().unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let u = set.sample(&mut rng);
        prop_assert!(bounds.contains(&u));
    }
}

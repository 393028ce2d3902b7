//! Configuration round trips and edges evaluated against the reference simulator.

use kp_core::{Control, State, slot};
use kp_plan::{
    CageProblem, Edge, EdgeOutcome, IntegratorDef, PlanError, evaluate_edges, load_yaml,
    save_yaml,
};

#[test]
fn roundtrip_yaml_default_problem() {
    let problem = CageProblem::default();
    let path = std::env::temp_dir().join("kp_plan_roundtrip_default.yaml");

    save_yaml(&path, &problem).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(problem, loaded);
}

#[test]
fn roundtrip_yaml_with_obstacles_and_energy() {
    let mut problem = CageProblem::default();
    problem.obstacles = vec![[4.0, 0.0, 1.0, 6.0], [6.0, 5.0, 2.0, 0.5]];
    problem.planner.energy_weight = Some(0.25);
    problem.simulation.integrator = IntegratorDef::ForwardEuler;
    let path = std::env::temp_dir().join("kp_plan_roundtrip_obstacles.yaml");

    save_yaml(&path, &problem).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(problem, loaded);
    assert_eq!(loaded.workspace().obstacles().len(), 2);
}

#[test]
fn invalid_problem_is_not_saved() {
    let mut problem = CageProblem::default();
    problem.planner.edge_resolution = 0.0;
    let path = std::env::temp_dir().join("kp_plan_invalid.yaml");
    let err = save_yaml(&path, &problem).unwrap_err();
    assert!(matches!(err, PlanError::Config { .. }));
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("kp_plan_does_not_exist.yaml");
    assert!(matches!(load_yaml(&path), Err(PlanError::Io(_))));
}

#[test]
fn hovering_edge_is_feasible_and_priced() {
    let problem = CageProblem::default();
    let mut evaluator = problem.evaluator().unwrap();
    let start = problem.start().unwrap();
    let edge = Edge::new(start, Control::new(0.5, 0.0, -9.81, 0.0));

    match evaluator.evaluate(&edge) {
        EdgeOutcome::Feasible { end, cost } => {
            assert!(cost.total() >= 0.01 + 0.001 * 0.5 - 1e-12);
            // object still rests on the gripper
            let gap = end[slot::GRIPPER_Y] - end[slot::OBJECT_Y];
            assert!((gap - 0.11).abs() < 5e-3, "gap {gap}");
            assert!((end[slot::OBJECT_X] - 2.0).abs() < 1e-6);
        }
        other => panic!("expected feasible edge, got {other:?}"),
    }
}

#[test]
fn sinking_into_obstacle_is_infeasible() {
    let mut problem = CageProblem::default();
    // slab just beneath the gripper (planner y points down)
    problem.obstacles = vec![[1.0, 4.25, 2.0, 2.0]];
    let start = problem.start().unwrap();

    let mut evaluator = problem.evaluator().unwrap();
    assert!(evaluator.space_mut().state_feasible(&start).unwrap());
    // thrust short of the pair's weight: both sink into the slab
    let edge = Edge::new(start, Control::new(1.0, 0.0, -9.5, 0.0));
    assert!(matches!(evaluator.evaluate(&edge), EdgeOutcome::Infeasible));
}

#[test]
fn object_bouncing_off_gripper_is_infeasible() {
    let mut problem = CageProblem::default();
    problem.planner.edge_resolution = 0.05;
    // Object 0.89 above its resting height, thrown down onto a hovering gripper.
    let start = State::from_column_slice(&[5.0, 4.0, 0.0, 9.0, 5.0, 5.0, 0.0, 0.0, 0.0, 0.0]);
    let u = Control::new(0.3, 0.0, -9.81, 0.0);

    let mut evaluator = problem.evaluator().unwrap();
    let space = evaluator.space_mut();
    assert!(space.state_feasible(&start).unwrap());
    let end = space.next_state(&start, &u).unwrap();
    assert!(space.state_feasible(&end).unwrap());

    // Both endpoints are clear; the bodies interpenetrate on impact in between.
    assert!(matches!(evaluator.evaluate(&Edge::new(start, u)), EdgeOutcome::Infeasible));
}

#[test]
fn batch_evaluation_keeps_order() {
    let problem = CageProblem::default();
    let template = problem.evaluator().unwrap();
    let start = problem.start().unwrap();
    let edges = vec![
        Edge::new(start, Control::new(0.25, 0.0, -9.81, 0.0)),
        Edge::new(start, Control::new(0.25, 50.0, -9.81, 0.0)),
        Edge::new(start, Control::new(0.1, 0.0, -9.81, 0.0)),
    ];

    let outcomes = evaluate_edges(&template, &edges);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_feasible());
    assert!(matches!(outcomes[1], EdgeOutcome::Infeasible));
    assert!(outcomes[2].is_feasible());
}

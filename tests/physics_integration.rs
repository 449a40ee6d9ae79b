//! Integration tests for the simulation core, covering the concrete
//! scenarios and boundary behaviors of spec §8.

use approx::assert_abs_diff_eq;
use lagrangian_sim::scenarios::presets;
use lagrangian_sim::{SimError, Simulation};

fn total_energy(sim: &Simulation) -> f64 {
    sim.bodies().map(|b| b.out_kinetic + b.out_potential).sum()
}

/// Scenario 1: free fall / single pendulum energy conservation over
/// `step(100, 1.0)`.
#[test]
fn free_fall_energy_conserved() {
    let (mut sim, _pendulum) = presets::single_pendulum(0.01);
    sim.compile().unwrap();

    sim.step(1, 1e-9).unwrap();
    let initial = total_energy(&sim);

    sim.step(100, 1.0).unwrap();
    let final_energy = total_energy(&sim);

    assert_abs_diff_eq!(final_energy, initial, epsilon = 1e-4);
}

/// Scenario 2: small-angle pendulum returns close to its initial state
/// after one approximate period.
#[test]
fn small_angle_pendulum_period() {
    let (mut sim, pendulum) = presets::single_pendulum(0.01);
    sim.compile().unwrap();

    sim.step(2000, 2.006).unwrap();

    let body = sim.body(pendulum).unwrap();
    assert!((body.coordinates[0].position - 0.01).abs() < 1e-3);
    assert!(body.coordinates[0].velocity.abs() < 1e-3);
}

/// Scenario 3: double pendulum energy drift over a short step stays
/// within 1% of the initial total energy.
#[test]
fn double_pendulum_energy_drift_bounded() {
    let (mut sim, _links) = presets::double_pendulum();
    sim.compile().unwrap();

    sim.step(1, 1e-9).unwrap();
    let initial = total_energy(&sim);

    sim.step(100, 1.0 / 24.0).unwrap();
    let final_energy = total_energy(&sim);

    let drift = (final_energy - initial).abs() / initial.abs();
    assert!(drift < 0.01, "energy drift {drift} exceeds 1%");
}

/// Scenario 4: recompiling after removing a body still succeeds, and a
/// subsequent step only touches the remaining body.
#[test]
fn recompile_after_removing_a_body() {
    let (mut sim, ids) = presets::double_pendulum();
    sim.compile().unwrap();
    sim.step(10, 0.01).unwrap();

    sim.remove_body(ids[1]).unwrap();
    assert!(!sim.is_compiled());

    sim.compile().unwrap();
    sim.step(10, 0.01).unwrap();

    assert!(sim.body(ids[0]).is_some());
    assert!(sim.body(ids[1]).is_none());
}

/// Scenario 5: bad step arguments are rejected and body state is
/// untouched.
#[test]
fn bad_step_arguments_rejected() {
    let (mut sim, pendulum) = presets::single_pendulum(0.3);
    sim.compile().unwrap();

    let before = sim.body(pendulum).unwrap().coordinates[0];

    let steps_err = sim.step(0, 1.0).unwrap_err();
    assert!(matches!(steps_err, SimError::InvalidArgument(_)));

    let span_err = sim.step(1, 0.0).unwrap_err();
    assert!(matches!(span_err, SimError::InvalidArgument(_)));

    let span_err_neg = sim.step(1, -1.0).unwrap_err();
    assert!(matches!(span_err_neg, SimError::InvalidArgument(_)));

    let after = sim.body(pendulum).unwrap().coordinates[0];
    assert_eq!(before, after);
}

/// `step` before any `compile` fails with `NotCompiled`.
#[test]
fn step_before_compile_fails() {
    let (mut sim, _pendulum) = presets::single_pendulum(0.1);
    let err = sim.step(1, 1.0).unwrap_err();
    assert!(matches!(err, SimError::NotCompiled));
}

/// A body with zero coordinates contributes only energy outputs and does
/// not widen the RK4 state vector.
#[test]
fn zero_coordinate_body_contributes_only_energy() {
    let mut sim = Simulation::new(1);
    sim.in_variables[0] = 9.81;

    let massless = sim.add_body(0, 1);
    sim.body_mut(massless).unwrap().in_variables[0] = 1.0;
    sim.set_body_kinetic(massless, lagrangian_sim::symbolic::zero()).unwrap();
    sim.set_body_potential(massless, lagrangian_sim::symbolic::zero()).unwrap();

    sim.compile().unwrap();
    sim.step(10, 1.0).unwrap();

    let body = sim.body(massless).unwrap();
    assert_eq!(body.coordinates_len(), 0);
    assert_eq!(body.out_kinetic, 0.0);
    assert_eq!(body.out_potential, 0.0);
}

/// Parameter passthrough: changing `in_variables` between steps is
/// reflected on the next step without recompiling.
#[test]
fn parameter_passthrough_without_recompile() {
    let (mut sim, pendulum) = presets::single_pendulum(0.2);
    sim.compile().unwrap();

    sim.step(10, 0.01).unwrap();
    let with_gravity = sim.body(pendulum).unwrap().coordinates[0].velocity;

    let (mut sim2, pendulum2) = presets::single_pendulum(0.2);
    sim2.compile().unwrap();
    sim2.in_variables[0] = 0.0; // zero gravity, no recompile needed
    assert!(sim2.is_compiled());
    sim2.step(10, 0.01).unwrap();
    let without_gravity = sim2.body(pendulum2).unwrap().coordinates[0].velocity;

    assert!((with_gravity - without_gravity).abs() > 1e-6);
}

/// Idempotent compile: compiling twice on an unchanged simulation yields
/// evaluators that agree on all inputs.
#[test]
fn idempotent_compile() {
    let (mut sim, pendulum) = presets::single_pendulum(0.15);
    sim.compile().unwrap();
    sim.step(50, 0.5).unwrap();
    let once = sim.body(pendulum).unwrap().coordinates[0];

    let (mut sim2, pendulum2) = presets::single_pendulum(0.15);
    sim2.compile().unwrap();
    sim2.compile().unwrap();
    sim2.step(50, 0.5).unwrap();
    let twice = sim2.body(pendulum2).unwrap().coordinates[0];

    assert_abs_diff_eq!(once.position, twice.position, epsilon = 1e-12);
    assert_abs_diff_eq!(once.velocity, twice.velocity, epsilon = 1e-12);
}

/// Step composition: `step(1, T)` twice matches `step(2, 2T)`.
#[test]
fn step_composition_matches_single_larger_step() {
    let (mut sim_twice, pendulum) = presets::single_pendulum(0.25);
    sim_twice.compile().unwrap();
    sim_twice.step(1, 0.1).unwrap();
    sim_twice.step(1, 0.1).unwrap();
    let twice = sim_twice.body(pendulum).unwrap().coordinates[0];

    let (mut sim_once, pendulum2) = presets::single_pendulum(0.25);
    sim_once.compile().unwrap();
    sim_once.step(2, 0.2).unwrap();
    let once = sim_once.body(pendulum2).unwrap().coordinates[0];

    assert_abs_diff_eq!(twice.position, once.position, epsilon = 1e-9);
    assert_abs_diff_eq!(twice.velocity, once.velocity, epsilon = 1e-9);
}

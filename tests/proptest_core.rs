//! Property-based tests over the compiled pendulum evaluators.

use lagrangian_sim::scenarios::presets;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Insertion-order determinism: two simulations built from identical
    /// API call sequences agree on compiled output for identical inputs.
    #[test]
    fn prop_insertion_order_determinism(angle in -1.0f64..1.0, angular_velocity in -1.0f64..1.0) {
        let (mut sim_a, body_a) = presets::single_pendulum(angle);
        sim_a.body_mut(body_a).unwrap().coordinates[0].velocity = angular_velocity;
        sim_a.compile().unwrap();
        sim_a.step(4, 0.05).unwrap();

        let (mut sim_b, body_b) = presets::single_pendulum(angle);
        sim_b.body_mut(body_b).unwrap().coordinates[0].velocity = angular_velocity;
        sim_b.compile().unwrap();
        sim_b.step(4, 0.05).unwrap();

        let a = sim_a.body(body_a).unwrap();
        let b = sim_b.body(body_b).unwrap();
        prop_assert_eq!(a.coordinates[0].position, b.coordinates[0].position);
        prop_assert_eq!(a.coordinates[0].velocity, b.coordinates[0].velocity);
        prop_assert_eq!(a.out_kinetic, b.out_kinetic);
        prop_assert_eq!(a.out_potential, b.out_potential);
    }

    /// Energy drift over a short step stays small across a range of
    /// starting angles and masses, for a single pendulum.
    #[test]
    fn prop_single_pendulum_energy_drift_small(
        angle in -1.5f64..1.5,
        mass in 0.1f64..10.0,
    ) {
        let mut sim = lagrangian_sim::Simulation::new(1);
        sim.in_variables[0] = 9.81;
        let body_id = sim.add_body(1, 2);
        {
            let body = sim.body_mut(body_id).unwrap();
            body.coordinates[0].position = angle;
            body.in_variables[0] = mass;
            body.in_variables[1] = 1.0;
        }
        let (kinetics, potentials) = {
            let angle_sym = sim.body(body_id).unwrap().coordinate_symbols()[0].position.expr().clone();
            let velocity_sym = sim.body(body_id).unwrap().coordinate_symbols()[0].velocity.expr().clone();
            let mass_sym = sim.body(body_id).unwrap().variable_symbols()[0].expr().clone();
            let length_sym = sim.body(body_id).unwrap().variable_symbols()[1].expr().clone();
            let gravity_sym = sim.variable_symbols()[0].expr().clone();

            let speed = lagrangian_sim::symbolic::mul(&length_sym, &velocity_sym);
            let speed_sq = lagrangian_sim::symbolic::mul(&speed, &speed);
            let half = lagrangian_sim::symbolic::rational(1, 2);
            let kinetic = lagrangian_sim::symbolic::mul(&lagrangian_sim::symbolic::mul(&speed_sq, &mass_sym), &half);

            let one = lagrangian_sim::symbolic::one();
            let height = lagrangian_sim::symbolic::mul(
                &lagrangian_sim::symbolic::sub(&one, &lagrangian_sim::symbolic::cos(&angle_sym)),
                &length_sym,
            );
            let potential = lagrangian_sim::symbolic::mul(&lagrangian_sim::symbolic::mul(&height, &gravity_sym), &mass_sym);
            (kinetic, potential)
        };
        sim.set_body_kinetic(body_id, kinetics).unwrap();
        sim.set_body_potential(body_id, potentials).unwrap();

        sim.compile().unwrap();
        sim.step(1, 1e-9).unwrap();
        let initial = {
            let b = sim.body(body_id).unwrap();
            b.out_kinetic + b.out_potential
        };

        sim.step(200, 1.0).unwrap();
        let final_energy = {
            let b = sim.body(body_id).unwrap();
            b.out_kinetic + b.out_potential
        };

        let drift = (final_energy - initial).abs();
        prop_assert!(drift < 1e-3, "drift {} too large for angle={} mass={}", drift, angle, mass);
    }
}

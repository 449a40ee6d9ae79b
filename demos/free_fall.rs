//! Single pendulum released at a small angle, printing its energy drift
//! over one step batch (spec §8 scenario 1).

use lagrangian_sim::scenarios::presets;

fn main() {
    let (mut sim, _pendulum) = presets::single_pendulum(0.01);
    sim.compile().expect("single pendulum compiles");

    // A negligible first step only to populate `out_kinetic`/`out_potential`
    // from the initial state, without perceptibly advancing it.
    sim.step(1, 1e-9).expect("step succeeds on a compiled simulation");
    let initial_energy: f64 = sim.bodies().map(|b| b.out_kinetic + b.out_potential).sum();

    sim.step(100, 1.0).expect("step succeeds on a compiled simulation");

    let final_energy: f64 = sim.bodies().map(|b| b.out_kinetic + b.out_potential).sum();

    println!("initial total energy: {initial_energy:.6} J");
    println!("final total energy:   {final_energy:.6} J");
    println!("drift:                {:.3e} J", (final_energy - initial_energy).abs());
}

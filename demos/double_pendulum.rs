//! The double pendulum of spec §8 scenario 3, stepped forward and
//! printed frame-by-frame the way `original_source/examples/
//! double-pendulum.c`'s `update_display_func` reports energy, minus the
//! terminal rendering (out of scope per spec §1).

use lagrangian_sim::scenarios::presets;

fn main() {
    let (mut sim, _links) = presets::double_pendulum();
    sim.compile().expect("double pendulum compiles");

    let steps_per_frame = 100;
    let frame_span = 1.0 / 24.0;

    for frame in 0..240 {
        sim.step(steps_per_frame, frame_span).expect("step succeeds on a compiled simulation");

        let kinetic: f64 = sim.bodies().map(|b| b.out_kinetic).sum();
        let potential: f64 = sim.bodies().map(|b| b.out_potential).sum();

        if frame % 24 == 0 {
            println!(
                "t={:6.2}s  kinetic={kinetic:10.4} J  potential={potential:10.4} J  total={:10.4} J",
                frame as f64 * frame_span,
                kinetic + potential
            );
        }
    }
}

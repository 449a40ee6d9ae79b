//! Named presets exercising [`super::build_pendulum_chain`], matching the
//! concrete scenarios of spec §8.

use crate::simulation::{BodyId, Simulation};

use super::{build_pendulum_chain, PendulumLink};

/// Standard gravitational acceleration, m/s².
pub const EARTH_GRAVITY: f64 = 9.81;

/// A single pendulum released from rest at `angle` radians from vertical,
/// with unit mass and unit length (spec §8 scenarios 1–2).
pub fn single_pendulum(angle: f64) -> (Simulation, BodyId) {
    let (sim, ids) = build_pendulum_chain(EARTH_GRAVITY, &[PendulumLink::at_rest(1.0, 1.0, angle)]);
    (sim, ids[0])
}

/// The double pendulum of spec §8 scenario 3: masses (1.5, 1.0), unit
/// lengths, released from rest at (2π/3, π/2).
pub fn double_pendulum() -> (Simulation, [BodyId; 2]) {
    let links = [
        PendulumLink::at_rest(1.5, 1.0, 2.0 * std::f64::consts::PI / 3.0),
        PendulumLink::at_rest(1.0, 1.0, std::f64::consts::PI / 2.0),
    ];
    let (sim, ids) = build_pendulum_chain(EARTH_GRAVITY, &links);
    (sim, [ids[0], ids[1]])
}

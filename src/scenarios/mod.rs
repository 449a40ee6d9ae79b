//! Scenario helpers: example construction of a chain of pendulum bodies,
//! exercising [`crate::Simulation`]'s public contract the way a real
//! caller would (spec §2 table, component H).
//!
//! Not part of the core's tested invariants — these are convenience
//! builders for the worked examples under `demos/`, grounded in
//! `original_source/examples/double-pendulum.c`'s `init_simulation`.

pub mod presets;

use crate::body::Body;
use crate::error::SimError;
use crate::simulation::{BodyId, Simulation};
use crate::symbolic::{self, Expr};

/// One link of a pendulum chain: a point mass on a massless rod, free to
/// swing about the preceding link's end (or the origin, for the first
/// link).
#[derive(Clone, Copy, Debug)]
pub struct PendulumLink {
    pub mass: f64,
    pub length: f64,
    pub initial_angle: f64,
    pub initial_angular_velocity: f64,
}

impl PendulumLink {
    pub fn at_rest(mass: f64, length: f64, initial_angle: f64) -> Self {
        PendulumLink {
            mass,
            length,
            initial_angle,
            initial_angular_velocity: 0.0,
        }
    }
}

/// Build a chain of `links.len()` pendulum bodies under uniform gravity
/// `gravity` and wire each body's kinetic/potential energy the way
/// `original_source/examples/double-pendulum.c` does: each body has one
/// coordinate (its angle from vertical) and two parameter variables
/// (mass, length).
///
/// The kinetic energy of link `i` is `½·mᵢ·|vᵢ|²`, where `vᵢ` is the
/// vector sum of every link's tangential velocity up to and including `i`
/// (a chain of pendula, not independent pendula). The potential energy
/// accumulates each link's vertical drop below the pivot into a running
/// `height` term before multiplying by `g` — the convention spec §9's
/// second Open Question leaves as the caller's responsibility, reproduced
/// here exactly as the reference source does it for a pendulum chain.
///
/// Returns the simulation (with one simulation-wide variable, gravity,
/// set to `gravity`) and the body handles in chain order. Does not call
/// `compile`; the caller is expected to set any additional state and
/// compile when ready.
pub fn build_pendulum_chain(gravity: f64, links: &[PendulumLink]) -> (Simulation, Vec<BodyId>) {
    let mut sim = Simulation::new(1);
    sim.in_variables[0] = gravity;

    let mut ids = Vec::with_capacity(links.len());
    for link in links {
        let id = sim.add_body(1, 2);
        {
            let body = sim.body_mut(id).expect("body was just inserted");
            body.coordinates[0].position = link.initial_angle;
            body.coordinates[0].velocity = link.initial_angular_velocity;
            body.in_variables[0] = link.mass;
            body.in_variables[1] = link.length;
        }
        ids.push(id);
    }

    let (kinetics, potentials) = pendulum_chain_energies(&sim, &ids);
    for (id, (kinetic, potential)) in ids.iter().zip(kinetics.into_iter().zip(potentials)) {
        sim.set_body_kinetic(*id, kinetic).expect("body handle from this simulation");
        sim.set_body_potential(*id, potential).expect("body handle from this simulation");
    }

    (sim, ids)
}

/// Derive the per-body kinetic and potential energy expressions for a
/// pendulum chain, following `double-pendulum.c`'s velocity/height
/// accumulation exactly: this is the algebraic heart of the example, kept
/// separate from body construction so it can be tested on its own.
fn pendulum_chain_energies(sim: &Simulation, ids: &[BodyId]) -> (Vec<Expr>, Vec<Expr>) {
    let mut vx = symbolic::zero();
    let mut vy = symbolic::zero();
    let mut height = symbolic::zero();
    let one = symbolic::one();
    let half = symbolic::rational(1, 2);

    let mut kinetics = Vec::with_capacity(ids.len());
    let mut potentials = Vec::with_capacity(ids.len());

    for id in ids {
        let body = sim.body(*id).expect("body handle from this simulation");
        let angle = body.coordinate_symbols()[0].position.expr().clone();
        let angular_velocity = body.coordinate_symbols()[0].velocity.expr().clone();
        let mass = body.variable_symbols()[0].expr().clone();
        let length = body.variable_symbols()[1].expr().clone();

        // v = r*omega, tangential to the rod.
        let speed = symbolic::mul(&length, &angular_velocity);
        let vlx = symbolic::mul(&symbolic::sin(&angle), &speed);
        let vly = symbolic::mul(&symbolic::cos(&angle), &speed);

        vx = symbolic::sub(&vx, &vlx);
        vy = symbolic::add(&vy, &vly);

        let speed_sq = symbolic::add(&symbolic::mul(&vx, &vx), &symbolic::mul(&vy, &vy));
        let kinetic = symbolic::mul(&symbolic::mul(&speed_sq, &mass), &half);
        kinetics.push(kinetic);

        // Vertical drop below the pivot for this link, added to the
        // running chain height before scaling by gravity and mass.
        let drop = symbolic::mul(&symbolic::sub(&one, &symbolic::cos(&angle)), &length);
        height = symbolic::add(&height, &drop);
        let gravity = sim.variable_symbols()[0].expr().clone();
        let potential = symbolic::mul(&symbolic::mul(&height, &gravity), &mass);
        potentials.push(potential);
    }

    (kinetics, potentials)
}

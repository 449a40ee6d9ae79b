//! Compilation pipeline (spec §4.3): derives equations of motion from
//! user-supplied kinetic/potential energies, solves for accelerations,
//! and JIT-compiles the derivative and energy evaluators.

use crate::error::SimError;
use crate::simulation::Simulation;
use crate::symbolic::evaluator::{CompileConfig, CompiledEvaluator};
use crate::symbolic::{self, Expr, SubstitutionMap, Var};

/// The simulation's compiled state: the derivative evaluator, the energy
/// evaluator, and the scratch argument buffer sized to their shared
/// arity (spec §3, "compiled state").
pub(crate) struct CompiledSystem {
    pub dydt: CompiledEvaluator,
    pub energy: CompiledEvaluator,
    /// Scratch buffer of length `arity`, reused across every `step` call.
    pub args: Vec<f64>,
    /// Index in `args` where the coordinate suffix begins; equal to
    /// `variables_len + Σ body.variables_len`.
    pub coordinates_start: usize,
    /// `Σ body.coordinates_len`, the RK4 state width divided by two.
    pub coordinate_count: usize,
}

/// Run the full pipeline of spec §4.3 steps 1–8 and return the compiled
/// system, or the first backend/argument error encountered. No partial
/// state is written back into `sim` by this function; the caller
/// (`Simulation::compile`) installs the result only on success.
pub(crate) fn compile(sim: &Simulation, config: CompileConfig) -> Result<CompiledSystem, SimError> {
    tracing::debug!(bodies = sim.body_count(), "compiling simulation");

    // Step 1: argument vector assembly.
    let mut arg_vars: Vec<Var> = Vec::new();
    arg_vars.extend(sim.sym_variables.iter().cloned());
    for body in sim.bodies_ordered() {
        arg_vars.extend(body.variable_symbols().iter().cloned());
    }
    let variables_len = arg_vars.len();

    let mut coordinate_count = 0usize;
    for body in sim.bodies_ordered() {
        for coord in body.coordinate_symbols() {
            arg_vars.push(coord.position.clone());
            arg_vars.push(coord.velocity.clone());
            coordinate_count += 1;
        }
    }
    let arg_exprs: Vec<Expr> = arg_vars.iter().map(|v| v.expr().clone()).collect();

    // Step 2: time-function substitution maps, one function-of-time
    // symbol per coordinate, plus the coordinate's acceleration symbol.
    let mut to_func = SubstitutionMap::new();
    let mut to_sym = SubstitutionMap::new();
    let mut acc_vars: Vec<Var> = Vec::with_capacity(coordinate_count);

    for body in sim.bodies_ordered() {
        for coord in body.coordinate_symbols() {
            let position_fn = symbolic::function_of("func", &[&sim.sym_time]);
            to_func.insert(coord.position.expr().clone(), position_fn.clone());
            to_sym.insert(position_fn.clone(), coord.position.expr().clone());

            let velocity_fn = symbolic::diff(&position_fn, &sim.sym_time);
            to_func.insert(coord.velocity.expr().clone(), velocity_fn.clone());
            to_sym.insert(velocity_fn.clone(), coord.velocity.expr().clone());

            let acc_var = symbolic::new_symbol("acc");
            let acceleration_fn = symbolic::diff(&velocity_fn, &sim.sym_time);
            to_func.insert(acc_var.expr().clone(), acceleration_fn.clone());
            to_sym.insert(acceleration_fn, acc_var.expr().clone());

            acc_vars.push(acc_var);
        }
    }

    // Step 3: Lagrangian, L = Σ(KE) - Σ(PE), summed per body in
    // insertion order (see SPEC_FULL.md §4.3).
    let mut lagrangian = symbolic::zero();
    for body in sim.bodies_ordered() {
        let (kinetic, potential) = body.require_energies()?;
        lagrangian = symbolic::add(&lagrangian, kinetic);
        lagrangian = symbolic::sub(&lagrangian, potential);
    }

    // Step 4: equations of motion, one Euler-Lagrange residual per
    // coordinate, in the same traversal order as `acc_vars` above.
    let mut equations: Vec<Expr> = Vec::with_capacity(coordinate_count);
    for body in sim.bodies_ordered() {
        for coord in body.coordinate_symbols() {
            let d_dq = symbolic::diff(&lagrangian, &coord.position); // ∂L/∂q
            let d_dqdot = symbolic::diff(&lagrangian, &coord.velocity); // ∂L/∂q̇, q̇ independent here

            let as_func = to_func.apply(&d_dqdot);
            let d_dt = symbolic::diff(&as_func, &sim.sym_time); // d/dt(∂L/∂q̇)
            let back_to_sym = to_sym.apply(&d_dt);

            let residual = symbolic::sub(&back_to_sym, &d_dq); // Euler-Lagrange residual
            equations.push(residual);
        }
    }

    // Step 5: linear solve for accelerations, in `acc_vars` order.
    let acc_solutions = symbolic::linsolve(&equations, &acc_vars)?;

    // Step 6: derivative evaluator output vector: [velocity, acceleration]
    // per coordinate, in insertion order.
    let mut dydt_output: Vec<Expr> = Vec::with_capacity(coordinate_count * 2);
    let mut solution_index = 0usize;
    for body in sim.bodies_ordered() {
        for coord in body.coordinate_symbols() {
            dydt_output.push(coord.velocity.expr().clone());
            dydt_output.push(acc_solutions[solution_index].clone());
            solution_index += 1;
        }
    }

    // Step 7: energy evaluator output vector: [kinetic, potential] per
    // body, in insertion order.
    let mut energy_output: Vec<Expr> = Vec::with_capacity(sim.body_count() * 2);
    for body in sim.bodies_ordered() {
        let (kinetic, potential) = body.require_energies()?;
        energy_output.push(kinetic.clone());
        energy_output.push(potential.clone());
    }

    // Step 8: JIT-compile both evaluators over the shared argument vector.
    let dydt = CompiledEvaluator::compile(&dydt_output, &arg_exprs, config)?;
    let energy = CompiledEvaluator::compile(&energy_output, &arg_exprs, config)?;

    Ok(CompiledSystem {
        dydt,
        energy,
        args: vec![0.0; arg_exprs.len()],
        coordinates_start: variables_len,
        coordinate_count,
    })
}

#[cfg(test)]
mod tests {
    use crate::simulation::Simulation;
    use crate::symbolic;

    /// Free particle: KE = ½·m·v², PE = m·g·h with `h` a fixed constant
    /// (not depending on the coordinate). The compiled derivative
    /// evaluator must yield acceleration = 0 at every state (spec §8,
    /// "Initial-acceleration correctness").
    #[test]
    fn free_particle_has_zero_acceleration() {
        let mut sim = Simulation::new(1);
        sim.in_variables[0] = 9.81; // gravity

        let body_id = sim.add_body(1, 1);
        sim.body_mut(body_id).unwrap().in_variables[0] = 2.0; // mass

        let velocity = sim.body(body_id).unwrap().coordinate_symbols()[0].velocity.expr().clone();
        let mass = sim.body(body_id).unwrap().variable_symbols()[0].expr().clone();
        let gravity = sim.variable_symbols()[0].expr().clone();

        let half = symbolic::rational(1, 2);
        let speed_sq = symbolic::mul(&velocity, &velocity);
        let kinetic = symbolic::mul(&symbolic::mul(&speed_sq, &mass), &half);

        let fixed_height = symbolic::one();
        let potential = symbolic::mul(&symbolic::mul(&mass, &gravity), &fixed_height);

        sim.set_body_kinetic(body_id, kinetic).unwrap();
        sim.set_body_potential(body_id, potential).unwrap();
        sim.compile().unwrap();

        for (position, velocity) in [(0.0, 0.0), (1.0, 2.0), (-3.0, -0.5)] {
            sim.body_mut(body_id).unwrap().coordinates[0].position = position;
            sim.body_mut(body_id).unwrap().coordinates[0].velocity = velocity;
            sim.step(1, 1e-6).unwrap();
            let observed_velocity = sim.body(body_id).unwrap().coordinates[0].velocity;
            assert!(
                (observed_velocity - velocity).abs() < 1e-6,
                "velocity changed ({} -> {}), acceleration should be zero",
                velocity,
                observed_velocity
            );
        }
    }
}

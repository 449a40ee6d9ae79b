//! Simulation container (spec §4.1): owns simulation-wide symbols and
//! state, an ordered sequence of bodies, and an ordered sequence of
//! constraint expressions.

use crate::body::{Body, Constraint};
use crate::compile::{self, CompiledSystem};
use crate::error::SimError;
use crate::rk4;
use crate::symbolic::evaluator::CompileConfig;
use crate::symbolic::{self, Expr, Var};

/// Stable handle to a body owned by a [`Simulation`]. Opaque and unique
/// within the simulation that issued it; using it with a different
/// simulation, or after the body has been removed, is an
/// [`SimError::InvalidArgument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(u64);

/// Stable handle to a constraint owned by a [`Simulation`]. Same
/// uniqueness rules as [`BodyId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintId(u64);

/// A generalized Lagrangian mechanics simulation: a collection of rigid
/// bodies, each with its own generalized coordinates and symbolic
/// energies, compiled once into native evaluators and then advanced
/// through time by repeated calls to [`Simulation::step`].
pub struct Simulation {
    next_id: u64,
    pub(crate) sym_variables: Vec<Var>,
    pub in_variables: Vec<f64>,
    pub(crate) sym_time: Var,
    /// Reserved per spec §3; declared but not read by `compile` in this
    /// revision (spec §9's first Open Question).
    #[allow(dead_code)]
    pub(crate) sym_lagrangian: Var,
    bodies: Vec<(BodyId, Body)>,
    constraints: Vec<(ConstraintId, Constraint)>,
    compiled: Option<CompiledSystem>,
}

impl Simulation {
    /// Create a new simulation with `variables_len` simulation-wide
    /// symbolic parameters (e.g. gravity), each initialized to `0.0`.
    pub fn new(variables_len: usize) -> Self {
        let sym_variables = (0..variables_len).map(|_| symbolic::new_symbol("sim_var")).collect();

        Simulation {
            next_id: 0,
            sym_variables,
            in_variables: vec![0.0; variables_len],
            sym_time: symbolic::named_symbol("t"),
            sym_lagrangian: symbolic::named_symbol("L"),
            bodies: Vec::new(),
            constraints: Vec::new(),
            compiled: None,
        }
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulation-wide parameter symbols, in creation order.
    pub fn variable_symbols(&self) -> &[Var] {
        &self.sym_variables
    }

    pub fn variables_len(&self) -> usize {
        self.sym_variables.len()
    }

    /// Append a new body to the tail of the insertion order.
    pub fn add_body(&mut self, coordinates_len: usize, variables_len: usize) -> BodyId {
        let id = BodyId(self.fresh_id());
        self.bodies.push((id, Body::new(coordinates_len, variables_len)));
        self.invalidate_compiled();
        id
    }

    /// Insert a new body immediately before `before` in the insertion
    /// order. Fails with [`SimError::InvalidArgument`] if `before` does
    /// not belong to this simulation.
    pub fn add_body_before(
        &mut self,
        coordinates_len: usize,
        variables_len: usize,
        before: BodyId,
    ) -> Result<BodyId, SimError> {
        let pos = self
            .bodies
            .iter()
            .position(|(id, _)| *id == before)
            .ok_or_else(|| SimError::InvalidArgument("insert_before body does not belong to this simulation".into()))?;
        let id = BodyId(self.fresh_id());
        self.bodies.insert(pos, (id, Body::new(coordinates_len, variables_len)));
        self.invalidate_compiled();
        Ok(id)
    }

    /// Remove and drop a body. Invalidates any compiled state: the
    /// caller must `compile` again before the next `step`.
    pub fn remove_body(&mut self, body: BodyId) -> Result<(), SimError> {
        let pos = self
            .bodies
            .iter()
            .position(|(id, _)| *id == body)
            .ok_or_else(|| SimError::InvalidArgument("remove_body called with a foreign handle".into()))?;
        self.bodies.remove(pos);
        self.invalidate_compiled();
        Ok(())
    }

    /// Deep-copy `expr` into a fresh constraint appended to the tail of
    /// the constraint sequence. Reserved; not consumed by `compile` in
    /// this revision (spec §3, §9).
    pub fn add_constraint(&mut self, expr: Expr) -> ConstraintId {
        let id = ConstraintId(self.fresh_id());
        self.constraints.push((id, Constraint::new(expr)));
        id
    }

    /// Insert a new constraint immediately before `before`.
    pub fn add_constraint_before(&mut self, expr: Expr, before: ConstraintId) -> Result<ConstraintId, SimError> {
        let pos = self
            .constraints
            .iter()
            .position(|(id, _)| *id == before)
            .ok_or_else(|| {
                SimError::InvalidArgument("insert_before constraint does not belong to this simulation".into())
            })?;
        let id = ConstraintId(self.fresh_id());
        self.constraints.insert(pos, (id, Constraint::new(expr)));
        Ok(id)
    }

    pub fn remove_constraint(&mut self, constraint: ConstraintId) -> Result<(), SimError> {
        let pos = self
            .constraints
            .iter()
            .position(|(id, _)| *id == constraint)
            .ok_or_else(|| SimError::InvalidArgument("remove_constraint called with a foreign handle".into()))?;
        self.constraints.remove(pos);
        Ok(())
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|(bid, _)| *bid == id).map(|(_, b)| b)
    }

    /// Mutable access to a body's numeric fields (`in_variables`,
    /// `coordinates`). Does **not** invalidate compiled state: per spec
    /// §4.2/§8 ("Parameter passthrough"), numeric mutation between steps
    /// never requires recompilation. Use [`Simulation::set_body_kinetic`]/
    /// [`Simulation::set_body_potential`] to change a body's energy
    /// expressions, which do invalidate.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|(bid, _)| *bid == id).map(|(_, b)| b)
    }

    /// Set a body's kinetic energy expression and invalidate any compiled
    /// state (spec §4.2: mutating energies after a successful `compile`
    /// requires a fresh `compile` before the next `step`).
    pub fn set_body_kinetic(&mut self, id: BodyId, expr: Expr) -> Result<(), SimError> {
        let body = self
            .bodies
            .iter_mut()
            .find(|(bid, _)| *bid == id)
            .map(|(_, b)| b)
            .ok_or_else(|| SimError::InvalidArgument("set_body_kinetic called with a foreign handle".into()))?;
        body.set_kinetic(expr);
        self.invalidate_compiled();
        Ok(())
    }

    /// Set a body's potential energy expression. Same rules as
    /// [`Simulation::set_body_kinetic`].
    pub fn set_body_potential(&mut self, id: BodyId, expr: Expr) -> Result<(), SimError> {
        let body = self
            .bodies
            .iter_mut()
            .find(|(bid, _)| *bid == id)
            .map(|(_, b)| b)
            .ok_or_else(|| SimError::InvalidArgument("set_body_potential called with a foreign handle".into()))?;
        body.set_potential(expr);
        self.invalidate_compiled();
        Ok(())
    }

    /// Bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().map(|(_, b)| b)
    }

    pub(crate) fn bodies_ordered(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().map(|(_, b)| b)
    }

    /// Number of bodies currently owned by this simulation.
    pub(crate) fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().map(|(_, c)| c)
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    fn invalidate_compiled(&mut self) {
        self.compiled = None;
    }

    /// Derive equations of motion and JIT-compile the derivative/energy
    /// evaluators (spec §4.3), using the default [`CompileConfig`].
    pub fn compile(&mut self) -> Result<(), SimError> {
        self.compile_with_config(CompileConfig::default())
    }

    /// Same as [`Simulation::compile`], with explicit JIT tunables.
    ///
    /// Any prior compiled state is released only after the new one is
    /// fully built: on failure the simulation is left exactly as it was
    /// before the call (spec §7).
    pub fn compile_with_config(&mut self, config: CompileConfig) -> Result<(), SimError> {
        let compiled = compile::compile(self, config)?;
        self.compiled = Some(compiled);
        Ok(())
    }

    /// Advance the simulation by `time_span` seconds, taking `steps`
    /// fixed-size RK4 steps, and refresh every body's output energy
    /// (spec §4.5).
    pub fn step(&mut self, steps: u32, time_span: f64) -> Result<(), SimError> {
        if steps < 1 {
            return Err(SimError::InvalidArgument("steps must be >= 1".into()));
        }
        if !(time_span > 0.0) {
            return Err(SimError::InvalidArgument("time_span must be > 0".into()));
        }
        let compiled = self.compiled.as_mut().ok_or(SimError::NotCompiled)?;

        let CompiledSystem {
            dydt,
            energy,
            args,
            coordinates_start,
            coordinate_count,
        } = compiled;
        let coordinates_start = *coordinates_start;
        let k = *coordinate_count * 2;

        // Populate the argument-vector prefix (simulation + body
        // variables) from current numeric parameters.
        let mut idx = 0;
        for value in &self.in_variables {
            args[idx] = *value;
            idx += 1;
        }
        for (_, body) in &self.bodies {
            for value in &body.in_variables {
                args[idx] = *value;
                idx += 1;
            }
        }

        // Populate the RK4 state vector from current body coordinates.
        let mut y = vec![0.0; k];
        let mut yi = 0;
        for (_, body) in &self.bodies {
            for c in &body.coordinates {
                y[yi] = c.position;
                y[yi + 1] = c.velocity;
                yi += 2;
            }
        }

        let mut dydt_out = vec![0.0; k];
        rk4::integrate(&mut y, steps, time_span, |_t, y_stage, out| {
            args[coordinates_start..].copy_from_slice(y_stage);
            dydt.evaluate(args, &mut dydt_out);
            out.copy_from_slice(&dydt_out);
        });

        // Write the final state back into the coordinate suffix and into
        // the bodies themselves.
        args[coordinates_start..].copy_from_slice(&y);
        let mut yi = 0;
        for (_, body) in &mut self.bodies {
            for c in &mut body.coordinates {
                c.position = y[yi];
                c.velocity = y[yi + 1];
                yi += 2;
            }
        }

        // Energy pass: one evaluation over the settled state.
        let mut energy_out = vec![0.0; energy.output_len()];
        energy.evaluate(args, &mut energy_out);
        let mut ei = 0;
        for (_, body) in &mut self.bodies {
            body.out_kinetic = energy_out[ei];
            body.out_potential = energy_out[ei + 1];
            ei += 2;
        }

        Ok(())
    }
}

//! Body entity: a rigid body's generalized coordinates, parameters, and
//! user-supplied energy expressions.

use crate::error::SimError;
use crate::symbolic::{self, Expr, Var};

/// A single generalized coordinate: a position symbol and its conjugate
/// velocity symbol.
#[derive(Clone, Debug)]
pub struct Coordinate {
    pub position: Var,
    pub velocity: Var,
}

/// Numeric state for one coordinate: current `(position, velocity)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinateState {
    pub position: f64,
    pub velocity: f64,
}

/// A rigid body contributing generalized coordinates, parameter
/// variables, and kinetic/potential energy expressions to a [`crate::Simulation`].
///
/// Mutating [`Body::set_kinetic`]/[`Body::set_potential`] is only
/// meaningful before the owning simulation's first `compile`, or again
/// between two `compile` calls (spec §4.2); the body itself does not
/// enforce this, since it has no reference back to the simulation that
/// owns it — `Simulation::compile` is the sole enforcement point.
#[derive(Clone, Debug)]
pub struct Body {
    pub(crate) sym_coordinates: Vec<Coordinate>,
    pub(crate) sym_variables: Vec<Var>,
    pub(crate) sym_kinetic: Option<Expr>,
    pub(crate) sym_potential: Option<Expr>,
    pub coordinates: Vec<CoordinateState>,
    pub in_variables: Vec<f64>,
    pub out_kinetic: f64,
    pub out_potential: f64,
}

impl Body {
    pub(crate) fn new(coordinates_len: usize, variables_len: usize) -> Self {
        let sym_coordinates = (0..coordinates_len)
            .map(|_| Coordinate {
                position: symbolic::new_symbol("pos"),
                velocity: symbolic::new_symbol("vel"),
            })
            .collect();
        let sym_variables = (0..variables_len).map(|_| symbolic::new_symbol("body_var")).collect();

        Body {
            sym_coordinates,
            sym_variables,
            sym_kinetic: None,
            sym_potential: None,
            coordinates: vec![CoordinateState::default(); coordinates_len],
            in_variables: vec![0.0; variables_len],
            out_kinetic: 0.0,
            out_potential: 0.0,
        }
    }

    /// This body's generalized coordinates, in insertion order.
    pub fn coordinate_symbols(&self) -> &[Coordinate] {
        &self.sym_coordinates
    }

    /// This body's parameter-variable symbols, in insertion order.
    pub fn variable_symbols(&self) -> &[Var] {
        &self.sym_variables
    }

    pub fn coordinates_len(&self) -> usize {
        self.sym_coordinates.len()
    }

    pub fn variables_len(&self) -> usize {
        self.sym_variables.len()
    }

    /// Set this body's kinetic energy expression. May reference any
    /// symbol visible in the simulation at call time: this body's own
    /// coordinates/variables, sibling bodies' symbols, or simulation-wide
    /// variables.
    pub fn set_kinetic(&mut self, expr: Expr) {
        self.sym_kinetic = Some(expr);
    }

    /// Set this body's potential energy expression. Same visibility rules
    /// as [`Body::set_kinetic`].
    pub fn set_potential(&mut self, expr: Expr) {
        self.sym_potential = Some(expr);
    }

    pub fn kinetic(&self) -> Option<&Expr> {
        self.sym_kinetic.as_ref()
    }

    pub fn potential(&self) -> Option<&Expr> {
        self.sym_potential.as_ref()
    }

    /// Validate that both energy expressions have been supplied, as
    /// `compile` requires (spec §7, InvalidArgument).
    pub(crate) fn require_energies(&self) -> Result<(&Expr, &Expr), SimError> {
        let kinetic = self
            .sym_kinetic
            .as_ref()
            .ok_or_else(|| SimError::InvalidArgument("body is missing a kinetic energy expression".into()))?;
        let potential = self
            .sym_potential
            .as_ref()
            .ok_or_else(|| SimError::InvalidArgument("body is missing a potential energy expression".into()))?;
        Ok((kinetic, potential))
    }
}

/// A constraint expression that should vanish. Declared per spec §3 but
/// not consumed by the compilation pipeline in this revision (spec §9's
/// first Open Question): the field exists so future revisions can wire
/// it in without an API break, but `compile` never reads `constraints`.
#[derive(Clone, Debug)]
pub struct Constraint {
    pub expr: Expr,
}

impl Constraint {
    pub(crate) fn new(expr: Expr) -> Self {
        Constraint { expr }
    }
}

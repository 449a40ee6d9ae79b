//! Thin typed adapter over the symbolic algebra backend.
//!
//! Nothing outside this module touches `symbolica` or `symjit_bridge`
//! types directly. The rest of the crate only ever sees [`Var`], [`Expr`],
//! [`SubstitutionMap`] and [`evaluator::CompiledEvaluator`] — swapping the
//! backend means rewriting this module, not the simulation logic it
//! supports.

pub mod evaluator;

use std::cell::Cell;

use symbolica::atom::{Atom, AtomCore, FunctionBuilder, Symbol as BackendSymbol};
use symbolica::id::Pattern;
use symbolica::state::State;

use crate::error::SimError;

/// A symbolic expression. Expressions are reference-counted internally by
/// the backend, so cloning is cheap and structural equality is exact.
pub type Expr = Atom;

/// A named symbol: a leaf expression with a backend-interned identity used
/// as the key for differentiation and substitution, plus its expression
/// form for use directly in arithmetic.
#[derive(Clone, Debug)]
pub struct Var {
    sym: BackendSymbol,
    expr: Expr,
}

impl Var {
    /// The symbol's expression form, usable directly in arithmetic.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The backend identity used for differentiation/substitution keys.
    pub fn symbol(&self) -> BackendSymbol {
        self.sym
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.sym == other.sym
    }
}

/// Monotonic per-process counter backing synthetic symbol names.
///
/// Spec §9 flags pointer-derived names as an implementation shortcut to
/// drop; any scheme yielding names unique within the backend's session is
/// equivalent, so a counter is used instead.
static NEXT_SYMBOL_ID: Cell<u64> = Cell::new(0);

fn fresh_name(prefix: &str) -> String {
    let id = NEXT_SYMBOL_ID.get();
    NEXT_SYMBOL_ID.set(id + 1);
    format!("{prefix}_{id}")
}

/// Create a new symbol bound to a name unique within this process,
/// prefixed for readability in diagnostics.
pub fn new_symbol(prefix: &str) -> Var {
    let name = fresh_name(prefix);
    let sym = State::get_symbol(&name);
    let expr = Atom::new_var(sym);
    Var { sym, expr }
}

/// Create a symbol bound to an exact, caller-chosen name (used for the
/// two fixed names the simulation contract requires: `t` for time and `L`
/// for the reserved Lagrangian symbol).
pub fn named_symbol(name: &str) -> Var {
    let sym = State::get_symbol(name);
    let expr = Atom::new_var(sym);
    Var { sym, expr }
}

/// Build `prefix_N(args...)`, a function-of symbol used for the
/// coordinate-as-function-of-time substitution trick (spec §9). The name
/// is made unique per call via the same counter [`new_symbol`] uses, so
/// each coordinate gets its own distinct function-of-time symbol rather
/// than every coordinate colliding on one interned name (spec §4.3 step
/// 2, §4.6: every symbol the core creates must be uniquely named).
pub fn function_of(prefix: &str, args: &[&Var]) -> Expr {
    let name = fresh_name(prefix);
    let sym = State::get_symbol(&name);
    let mut builder = FunctionBuilder::new(sym);
    for arg in args {
        builder = builder.add_arg(arg.expr());
    }
    builder.finish()
}

/// Differentiate `expr` with respect to `var`.
pub fn diff(expr: &Expr, var: &Var) -> Expr {
    expr.derivative(var.sym)
}

/// `a + b`.
pub fn add(a: &Expr, b: &Expr) -> Expr {
    a.clone() + b.clone()
}

/// `a - b`.
pub fn sub(a: &Expr, b: &Expr) -> Expr {
    a.clone() - b.clone()
}

/// `a * b`.
pub fn mul(a: &Expr, b: &Expr) -> Expr {
    a.clone() * b.clone()
}

/// `sin(expr)`.
pub fn sin(expr: &Expr) -> Expr {
    expr.sin()
}

/// `cos(expr)`.
pub fn cos(expr: &Expr) -> Expr {
    expr.cos()
}

/// The constant `1`.
pub fn one() -> Expr {
    Atom::new_num(1)
}

/// The rational constant `p/q`.
pub fn rational(p: i64, q: i64) -> Expr {
    Atom::new_num((p, q))
}

/// An ordered handle→handle substitution map, applied as a sequence of
/// structural replacements. Ordering is preserved (insertion order, linear
/// iteration) because the compilation pipeline relies on forward and
/// back substitution maps being applied consistently (spec §6).
#[derive(Clone, Debug, Default)]
pub struct SubstitutionMap {
    pairs: Vec<(Expr, Expr)>,
}

impl SubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` should be replaced by `to`.
    pub fn insert(&mut self, from: Expr, to: Expr) {
        self.pairs.push((from, to));
    }

    /// Apply every substitution in insertion order to `expr`, returning
    /// the fully substituted expression.
    pub fn apply(&self, expr: &Expr) -> Expr {
        let mut current = expr.clone();
        for (from, to) in &self.pairs {
            let pattern: Pattern = from.to_pattern();
            current = current.replace_all(&pattern, to.into_pattern(), None, None);
        }
        current
    }
}

/// Solve the linear system `equations[i] == 0` for `unknowns`, returning
/// solutions in the same order as `unknowns`.
///
/// This backs the Euler–Lagrange residual solve of spec §4.3 step 5.
pub fn linsolve(equations: &[Expr], unknowns: &[Var]) -> Result<Vec<Expr>, SimError> {
    let unknown_exprs: Vec<Expr> = unknowns.iter().map(|v| v.expr().clone()).collect();
    symbolica::solve::solve_linear_system(equations, &unknown_exprs).map_err(|e| {
        SimError::BackendError {
            code: crate::error::BACKEND_CODE_LINSOLVE,
            message: format!("linear solve failed: {e}"),
        }
    })
}

/// Constant zero, the identity element for the Lagrangian accumulation.
pub fn zero() -> Expr {
    Atom::new_num(0)
}

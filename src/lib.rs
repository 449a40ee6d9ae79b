//! Symbolic-to-numeric simulation core for generalized Lagrangian
//! mechanics.
//!
//! Given a user-declared collection of rigid bodies — each described by an
//! arbitrary number of generalized coordinates, symbolic parameter
//! variables, and user-supplied symbolic expressions for its kinetic and
//! potential energies — this crate derives the system's equations of
//! motion symbolically, compiles them into native evaluators, and advances
//! the system through time by fourth-order Runge–Kutta integration while
//! reporting per-body energy.
//!
//! The terminal/graphical renderer, the host application's event loop, and
//! any geometry helpers are external collaborators, not part of this
//! crate. See `demos/` for worked examples of driving the public contract.

pub mod body;
mod compile;
pub mod error;
pub mod rk4;
pub mod scenarios;
pub mod simulation;
pub mod symbolic;

pub use body::{Body, Constraint, Coordinate, CoordinateState};
pub use error::SimError;
pub use simulation::{BodyId, ConstraintId, Simulation};
pub use symbolic::Expr;

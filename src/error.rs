//! Error kinds surfaced by the simulation core.
//!
//! Every fallible operation in this crate returns `Result<_, SimError>`.
//! The four variants mirror the four error kinds of the simulation's
//! contract: allocation failure, a non-zero status from the symbolic
//! backend, a caller-supplied argument that violates a precondition, and
//! an operation attempted before a successful `compile`.

use thiserror::Error;

/// Errors produced by [`crate::Simulation`] and its components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// An allocation failed. Rust's global allocator aborts the process on
    /// allocation failure rather than returning an error, so this variant
    /// is reserved for backend allocation failures reported through the
    /// symbolic algebra library's own fallible paths.
    #[error("out of memory")]
    OutOfMemory,

    /// The symbolic backend reported a non-zero status: differentiation
    /// not implemented for some expression, substitution over an
    /// incompatible domain, a linear solve that could not produce a
    /// solution, and so on. The backend's own message is preserved.
    ///
    /// `symbolica`'s fallible operations surface only a descriptive
    /// message, not a numeric status of their own, so `code` cannot be
    /// propagated verbatim from the backend the way spec §7 describes for
    /// a backend that does report one (e.g. the C reference's SymEngine
    /// wrapper status codes). Instead `code` is one of the
    /// `BACKEND_CODE_*` constants below, a stable per-call-site
    /// discriminant identifying which pipeline operation failed; `message`
    /// always carries the backend's own text unchanged.
    #[error("symbolic backend error ({code}): {message}")]
    BackendError {
        /// One of the `BACKEND_CODE_*` constants, identifying which
        /// backend call failed.
        code: i32,
        /// Human-readable detail from the backend, if any.
        message: String,
    },

    /// A caller-supplied argument violated a documented precondition:
    /// `step` called with `steps < 1` or `time_span <= 0`, `compile`
    /// called with a body whose kinetic or potential energy is unset, or
    /// `remove_body`/`remove_constraint` called with a handle that does
    /// not belong to this simulation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `step` was called before any successful `compile`.
    #[error("simulation has not been compiled")]
    NotCompiled,
}

/// `BackendError::code` for a failed linear solve
/// ([`crate::symbolic::linsolve`]).
pub const BACKEND_CODE_LINSOLVE: i32 = 1;

/// `BackendError::code` for a failed evaluator construction
/// ([`crate::symbolic::evaluator::CompiledEvaluator::compile`]).
pub const BACKEND_CODE_EVALUATOR: i32 = 2;

//! Compiled evaluator: packs a fixed-arity symbolic vector function into
//! a callable numeric closure, optionally backed by native JIT code.

use symbolica::atom::Atom;
use symbolica::evaluate::{ExpressionEvaluator, FunctionMap, OptimizationSettings};

#[cfg(feature = "native-jit")]
use symjit_bridge::{CompiledRealRunner, Config as JitConfig};

use super::Expr;
use crate::error::SimError;

/// Tunables for the JIT compilation step (spec §4.3 step 8).
#[derive(Clone, Copy, Debug)]
pub struct CompileConfig {
    /// Request common-subexpression elimination across the output vector.
    pub common_subexpression_elimination: bool,
    /// Optimization level requested from the native code generator, when
    /// a native-code path is available. `0` skips native compilation and
    /// uses the bytecode interpreter directly.
    pub optimization_level: u8,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            common_subexpression_elimination: true,
            optimization_level: 2,
        }
    }
}

/// A pure function from a flat `f64` argument vector to a flat `f64`
/// output vector of fixed length, compiled once ahead of time.
///
/// Thread-compatible but not safe to invoke concurrently on the same
/// instance (spec §4.4): `evaluate` takes `&mut self` so callers sharing
/// one instance across threads must still serialize their own calls.
pub enum CompiledEvaluator {
    /// Bytecode-interpreted evaluator. Portable fallback used when the
    /// native path is disabled or unavailable for the host target.
    Interpreted {
        evaluator: ExpressionEvaluator<f64>,
        output_len: usize,
    },
    /// Native machine code compiled via symjit.
    #[cfg(feature = "native-jit")]
    Native { runner: CompiledRealRunner, output_len: usize },
}

impl CompiledEvaluator {
    /// Compile `outputs`, a vector-valued expression over `args`, into an
    /// evaluator. Always requests CSE per `config`; falls back to the
    /// interpreter if native compilation is unavailable or disabled.
    pub fn compile(outputs: &[Expr], args: &[Expr], config: CompileConfig) -> Result<Self, SimError> {
        let output_len = outputs.len();
        let fn_map = FunctionMap::new();
        let mut settings = OptimizationSettings::default();
        settings.cse = config.common_subexpression_elimination;

        // `evaluator_multiple` yields an evaluator over the backend's exact
        // (complex/rational) coefficient ring; `map_coeff` narrows it to
        // `f64` before use, matching the only attested workflow for this
        // API (see `symjit_bridge`'s own doc example:
        // `.evaluator(&f, &params, settings).unwrap().map_coeff(&|x| x.re.to_f64())`).
        let evaluator: ExpressionEvaluator<f64> = Atom::evaluator_multiple(outputs, &fn_map, args, settings)
            .map_err(|e| SimError::BackendError {
                code: crate::error::BACKEND_CODE_EVALUATOR,
                message: format!("evaluator construction failed: {e}"),
            })?
            .map_coeff(&|x| x.re.to_f64());

        #[cfg(feature = "native-jit")]
        {
            if config.optimization_level > 0 {
                let jit_config = JitConfig::default();
                match CompiledRealRunner::compile(&evaluator, jit_config) {
                    Ok(runner) => return Ok(CompiledEvaluator::Native { runner, output_len }),
                    Err(e) => {
                        tracing::warn!(error = %e, "native JIT compilation failed, falling back to interpreter");
                    }
                }
            }
        }

        Ok(CompiledEvaluator::Interpreted { evaluator, output_len })
    }

    /// Number of outputs this evaluator produces.
    pub fn output_len(&self) -> usize {
        match self {
            CompiledEvaluator::Interpreted { output_len, .. } => *output_len,
            #[cfg(feature = "native-jit")]
            CompiledEvaluator::Native { output_len, .. } => *output_len,
        }
    }

    /// Evaluate the compiled function over `args`, writing `output_len`
    /// results into `out`.
    pub fn evaluate(&mut self, args: &[f64], out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.output_len());
        match self {
            CompiledEvaluator::Interpreted { evaluator, .. } => evaluator.evaluate(args, out),
            #[cfg(feature = "native-jit")]
            CompiledEvaluator::Native { runner, .. } => runner.evaluate(args, out),
        }
    }
}

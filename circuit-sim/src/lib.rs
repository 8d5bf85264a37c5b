//! The rewrite engine and cycle-driven evaluator for the circuit algebra.

pub mod errors;
pub mod evaluator;
pub mod rewrite;

pub use errors::{BoxedEvalError, EvalError, EvalResult};
pub use evaluator::{CycleRecord, Evaluator, FunctionKind, OutputTerm};
pub use rewrite::rules::default_rules;
pub use rewrite::{run_to_fixpoint, RewriteContext, RewriteRule, TraversalElement};

//! Evaluation-time errors: per-cycle failures raised by the rewrite engine
//! and the evaluator, distinct from the construction-time errors in
//! `circuit_utils::Error`.

use thiserror::Error;

/// A type alias for a result with a [`BoxedEvalError`] as the error type;
/// used pervasively since `EvalError` itself carries enough payload to make
/// `Result` large on the stack otherwise.
pub type EvalResult<T> = Result<T, BoxedEvalError>;

/// A boxed [`EvalError`], kept small enough to return cheaply from deep
/// rewrite recursion.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct BoxedEvalError(#[from] Box<EvalError>);

impl<T: Into<EvalError>> From<T> for BoxedEvalError {
    fn from(value: T) -> Self {
        Self(Box::new(value.into()))
    }
}

impl std::ops::Deref for BoxedEvalError {
    type Target = EvalError;

    fn deref(&self) -> &EvalError {
        &self.0
    }
}

/// Per-cycle evaluation errors. Construction errors are never wrapped here;
/// [`EvalError::Construction`] exists only for failures that surface while
/// normalising/rewriting an already-built graph (e.g. a rewrite rule
/// splicing in a malformed replacement).
#[derive(Debug, Error)]
pub enum EvalError {
    /// A rewrite rule encountered a label it cannot interpret in context
    /// (e.g. a non-combinational label surviving into a completed Mealy
    /// core).
    #[error("expected {expected}, found {found}")]
    IncompatibleVariant { expected: String, found: String },

    /// The rewrite work queue did not reach a fixed point; a cycle was
    /// detected in the rewrite relation itself.
    #[error("rewrite did not terminate: {0}")]
    NonTerminatingRewrite(String),

    /// The per-cycle `step_budget` was exhausted before the rewrite queue
    /// reached a fixed point.
    #[error("step budget of {0} exceeded before the cycle converged")]
    StepBudgetExceeded(usize),

    /// A construction-time check failed while the evaluator was
    /// normalizing or splicing into the graph.
    #[error(transparent)]
    Construction(#[from] circuit_utils::Error),

    /// Cycle input did not match the graph's declared arity or port widths.
    #[error("{0}")]
    InvalidInput(String),
}

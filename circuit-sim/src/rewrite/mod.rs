//! The rewrite engine: a FIFO work-queue of graph elements, each offered in
//! turn to a fixed list of rules until the queue runs dry or a budget is
//! exceeded.

pub mod rules;

use crate::errors::{EvalError, EvalResult};
use ahash::AHashMap;
use circuit_ir::{CycleInput, EdgeId, Hypergraph, PrimitiveSymbol, Signature, Value, VertexId};
use std::collections::VecDeque;
use std::rc::Rc;

/// One item of rewrite work: either a vertex waiting for its cycle argument
/// to be attached, or an edge waiting to fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraversalElement {
    Edge(EdgeId),
    Vertex(VertexId),
}

/// Per-cycle state threaded through every rule invocation. Cleared and
/// repopulated at the start of each [`crate::evaluator::Evaluator::perform_cycle`].
pub struct RewriteContext<V: Value> {
    /// Cycle inputs not yet attached to their input-interface vertex, keyed
    /// by that vertex. [`rules::ArgumentRule`] drains this map as input
    /// vertices come up in the traversal.
    pub pending_arguments: AHashMap<VertexId, CycleInput<V>>,
    /// The tick counter used to sample raw `InfiniteWaveform` leaves that
    /// feed into this cycle's evaluation.
    pub current_tick: usize,
}

impl<V: Value> RewriteContext<V> {
    pub fn new(pending_arguments: AHashMap<VertexId, CycleInput<V>>, current_tick: usize) -> Self {
        RewriteContext {
            pending_arguments,
            current_tick,
        }
    }
}

/// One built-in rewrite rule. A rule either fires on `element` — mutating
/// `graph` and returning the follow-up work it unblocked — or declines by
/// returning `Ok(None)`, leaving `element` for the next rule in line.
pub trait RewriteRule<V: Value, G: PrimitiveSymbol> {
    fn name(&self) -> &'static str;

    fn fire(
        &self,
        graph: &mut Hypergraph<V, G>,
        signature: &Rc<Signature<V, G>>,
        ctx: &mut RewriteContext<V>,
        element: TraversalElement,
    ) -> EvalResult<Option<Vec<TraversalElement>>>;
}

/// Run the work queue to a fixed point: repeatedly pop the front element,
/// offer it to each rule in order until one fires, and enqueue whatever
/// follow-up work that rule returned. An element that every rule declines is
/// simply dropped (it is not "stuck" — it will be re-enqueued later if one
/// of its dependencies resolves).
///
/// `step_budget` bounds the number of successful rule firings the caller is
/// willing to pay for in a single cycle; exceeding it raises
/// [`EvalError::StepBudgetExceeded`]. `safety_cap` is a much larger internal
/// bound on total queue pops (successful or not) that exists purely to turn
/// a rewrite relation that never reaches a fixed point into a diagnosable
/// error instead of a hang.
pub fn run_to_fixpoint<V, G>(
    graph: &mut Hypergraph<V, G>,
    signature: &Rc<Signature<V, G>>,
    ctx: &mut RewriteContext<V>,
    rules: &[Box<dyn RewriteRule<V, G>>],
    initial: Vec<TraversalElement>,
    step_budget: usize,
) -> EvalResult<()>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let safety_cap = step_budget.saturating_mul(4).max(step_budget + 1024);
    let mut queue: VecDeque<TraversalElement> = initial.into_iter().collect();
    let mut steps = 0usize;
    let mut pops = 0usize;

    while let Some(element) = queue.pop_front() {
        pops += 1;
        if pops > safety_cap {
            return Err(EvalError::NonTerminatingRewrite(format!(
                "rewrite queue exceeded {safety_cap} pops without reaching a fixed point"
            ))
            .into());
        }

        let mut fired = false;
        for rule in rules {
            if let Some(follow_up) = rule.fire(graph, signature, ctx, element)? {
                log::debug!("rule `{}` fired on {element:?}", rule.name());
                queue.extend(follow_up);
                fired = true;
                break;
            }
        }

        if fired {
            steps += 1;
            if steps > step_budget {
                return Err(EvalError::StepBudgetExceeded(step_budget).into());
            }
        }
    }

    Ok(())
}

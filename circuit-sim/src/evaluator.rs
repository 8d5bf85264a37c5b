//! The cycle-driven Mealy-core evaluator.
//!
//! [`Evaluator::new`] normalizes a built graph once (fork discipline; see
//! [`normalize_forks`]) and extracts its delay state. Each
//! [`Evaluator::perform_cycle`] clones that normalized template, attaches
//! this cycle's arguments and the current delay state, rewrites to a fixed
//! point, harvests the next delay state, and walks backward from the output
//! interface to build an [`OutputTerm`] per output port.

use crate::errors::{EvalError, EvalResult};
use crate::rewrite::rules::default_rules;
use crate::rewrite::{run_to_fixpoint, RewriteContext, RewriteRule, TraversalElement};
use ahash::AHashMap;
use circuit_ir::construct::fork_bundler;
use circuit_ir::{
    CycleInput, EdgeId, EdgeLabel, Hypergraph, InterfacedHypergraph, PrimitiveSymbol, Signal,
    Signature, Value, VertexId, Waveform,
};
use circuit_utils::{CircuitResult, Id};
use std::collections::VecDeque;
use std::rc::Rc;

/// The unresolved shape of an output: a fully-resolved leaf, a still-open
/// `JOIN`, an unresolved `PRIMITIVE`/`ENHANCED_PRIMITIVE`/`BLACKBOX`/
/// `COMPOSITE` application, or an unresolved `BUNDLER`. `COMPOSITE` edges are
/// never applied by the rewrite engine (there is no registry of named
/// subgraphs to resolve them against), so a `Function(Composite(_), ...)`
/// reaching here is expected, not a bug.
#[derive(Clone)]
pub enum OutputTerm<V: Value, G: PrimitiveSymbol> {
    Base(CycleInput<V>),
    Join(Box<OutputTerm<V, G>>, Box<OutputTerm<V, G>>),
    Function(FunctionKind<G>, Vec<OutputTerm<V, G>>, usize),
    Bundle(Vec<OutputTerm<V, G>>, Vec<usize>, usize),
}

impl<V: Value, G: PrimitiveSymbol> OutputTerm<V, G> {
    /// `Some(signal)` if this term is a fully-resolved definite leaf.
    pub fn as_definite(&self) -> Option<&Signal<V>> {
        match self {
            OutputTerm::Base(CycleInput::Definite(s)) => Some(s),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum FunctionKind<G: PrimitiveSymbol> {
    Primitive(G),
    Enhanced(G),
    Blackbox(Id),
    Composite(Id),
}

/// One delay/register's state, threaded across cycles independently of the
/// per-cycle working graph (which is discarded after every
/// [`Evaluator::perform_cycle`]).
struct DelayState<V: Value> {
    edge_id: EdgeId,
    source_vertex: VertexId,
    output_vertex: VertexId,
    /// The value the output currently presents is `history.front()`; depth
    /// equals the `DELAY`'s `cycles` (1 for an ordinary register).
    history: VecDeque<Signal<V>>,
}

/// One cycle's recorded inputs and outputs.
#[derive(Clone)]
pub struct CycleRecord<V: Value, G: PrimitiveSymbol> {
    pub inputs: Vec<CycleInput<V>>,
    pub outputs: Vec<OutputTerm<V, G>>,
}

/// Ensures every wire feeds at most one consuming edge before any rewrite
/// rule runs, by inserting an explicit `fork_bundler` wherever the built
/// graph shares a wire across more than one edge. Run once, at construction.
///
/// This only needs to see the *static* sharing already present when the
/// graph was built: rewriting never grows a vertex's consumer set beyond
/// what the author's graph already fixed (an apply rule's outputs each land
/// on the pre-existing target vertex of the edge it replaced), so a single
/// up-front pass suffices for every cycle this evaluator will ever run.
fn normalize_forks<V, G>(graph: &mut Hypergraph<V, G>) -> CircuitResult<()>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let vertex_ids: Vec<VertexId> = graph.vertices().collect();
    for v in vertex_ids {
        let mut distinct_consumers: Vec<EdgeId> = Vec::new();
        for e in graph.vertex_out_edges(v) {
            if !distinct_consumers.contains(e) {
                distinct_consumers.push(*e);
            }
        }
        if distinct_consumers.len() <= 1 {
            continue;
        }

        let copies = fork_bundler(graph, v, distinct_consumers.len())?;
        for (copy, consumer) in copies.into_iter().zip(distinct_consumers) {
            let edge = graph.edge(consumer);
            let label = edge.label().clone();
            let sources: Vec<VertexId> = edge
                .sources()
                .iter()
                .map(|s| if *s == v { copy } else { *s })
                .collect();
            let targets = edge.targets().to_vec();
            let embedded = edge.embedded_subgraph();
            graph.remove_edge(consumer);
            graph.splice_edge(label, sources, targets, embedded)?;
        }
    }
    Ok(())
}

fn resolve_definite<V, G>(graph: &Hypergraph<V, G>, vertex: VertexId) -> EvalResult<Signal<V>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let in_edge = graph.vertex_in_edge(vertex).ok_or_else(|| EvalError::IncompatibleVariant {
        expected: "a resolved delay source".to_string(),
        found: "an unproduced wire".to_string(),
    })?;
    match graph.edge(in_edge).label() {
        EdgeLabel::Signal(s) => Ok(s.clone()),
        EdgeLabel::Value(v) => Ok(Signal::of(v.clone())),
        other => Err(EvalError::IncompatibleVariant {
            expected: "a definite SIGNAL or VALUE".to_string(),
            found: format!("{other:?}"),
        }
        .into()),
    }
}

/// Walk backward from `vertex` through its producing edge, memoizing shared
/// subterms (a forked wire's two consumers still share one term once walked
/// back past the fork). Fails if a surviving `DELAY`/`FEEDBACK` label is
/// reached: those are consumed by normalization and delay/feedback handling
/// respectively, and should never remain once a cycle's rewrite has run.
fn build_term<V, G>(
    graph: &Hypergraph<V, G>,
    vertex: VertexId,
    current_tick: usize,
    memo: &mut AHashMap<VertexId, OutputTerm<V, G>>,
) -> EvalResult<OutputTerm<V, G>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    if let Some(term) = memo.get(&vertex) {
        return Ok(term.clone());
    }

    let in_edge = graph.vertex_in_edge(vertex).ok_or_else(|| EvalError::IncompatibleVariant {
        expected: "a produced output wire".to_string(),
        found: "an unproduced wire".to_string(),
    })?;
    let edge = graph.edge(in_edge);
    let port_index = edge
        .targets()
        .iter()
        .position(|t| *t == vertex)
        .expect("vertex is a target of its own in-edge");
    let sources = edge.sources().to_vec();

    let term = match edge.label() {
        EdgeLabel::Argument(input) => OutputTerm::Base(input.clone()),
        EdgeLabel::Value(v) => OutputTerm::Base(CycleInput::Definite(Signal::of(v.clone()))),
        EdgeLabel::Signal(s) => OutputTerm::Base(CycleInput::Definite(s.clone())),
        EdgeLabel::Partial(vs) => OutputTerm::Base(CycleInput::Partial(vs.clone())),
        EdgeLabel::InfiniteWaveform(w) => {
            OutputTerm::Base(CycleInput::Definite(w.signal_at_tick(current_tick).clone()))
        }
        EdgeLabel::Join(_) => {
            let a = build_term(graph, sources[0], current_tick, memo)?;
            let b = build_term(graph, sources[1], current_tick, memo)?;
            OutputTerm::Join(Box::new(a), Box::new(b))
        }
        EdgeLabel::Primitive(g) => {
            let kind = FunctionKind::Primitive(g.clone());
            let children = build_children(graph, &sources, current_tick, memo)?;
            OutputTerm::Function(kind, children, port_index)
        }
        EdgeLabel::EnhancedPrimitive(g, _) => {
            let kind = FunctionKind::Enhanced(g.clone());
            let children = build_children(graph, &sources, current_tick, memo)?;
            OutputTerm::Function(kind, children, port_index)
        }
        EdgeLabel::Blackbox(bb) => {
            let kind = FunctionKind::Blackbox(bb.name());
            let children = build_children(graph, &sources, current_tick, memo)?;
            OutputTerm::Function(kind, children, port_index)
        }
        EdgeLabel::Composite(spec) => {
            let kind = FunctionKind::Composite(spec.name());
            let children = build_children(graph, &sources, current_tick, memo)?;
            OutputTerm::Function(kind, children, port_index)
        }
        EdgeLabel::Bundler { out_arities, .. } => {
            let arities = out_arities.to_vec();
            let children = build_children(graph, &sources, current_tick, memo)?;
            OutputTerm::Bundle(children, arities, port_index)
        }
        other @ (EdgeLabel::Delay { .. } | EdgeLabel::Feedback { .. }) => {
            return Err(EvalError::IncompatibleVariant {
                expected: "a combinational label".to_string(),
                found: format!("{other:?}"),
            }
            .into());
        }
    };

    memo.insert(vertex, term.clone());
    Ok(term)
}

fn build_children<V, G>(
    graph: &Hypergraph<V, G>,
    sources: &[VertexId],
    current_tick: usize,
    memo: &mut AHashMap<VertexId, OutputTerm<V, G>>,
) -> EvalResult<Vec<OutputTerm<V, G>>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    sources
        .iter()
        .map(|s| build_term(graph, *s, current_tick, memo))
        .collect()
}

/// A compiled, evaluable circuit: a normalized graph template, its extracted
/// delay state, and the cycle-by-cycle history recorded so far.
pub struct Evaluator<V: Value, G: PrimitiveSymbol> {
    signature: Rc<Signature<V, G>>,
    template: Hypergraph<V, G>,
    inputs: Vec<VertexId>,
    outputs: Vec<VertexId>,
    delays: Vec<DelayState<V>>,
    rules: Vec<Box<dyn RewriteRule<V, G>>>,
    tick: usize,
    history: Vec<CycleRecord<V, G>>,
}

impl<V, G> Evaluator<V, G>
where
    V: Value + 'static,
    G: PrimitiveSymbol + 'static,
{
    pub fn new(signature: Signature<V, G>, built: InterfacedHypergraph<V, G>) -> CircuitResult<Self> {
        let mut template = built.graph().clone();
        normalize_forks(&mut template)?;

        let inputs: Vec<VertexId> = built.input_vertices().collect();
        let outputs: Vec<VertexId> = built.output_vertices().collect();

        let mut delays = Vec::new();
        for edge_id in template.edges().collect::<Vec<_>>() {
            if let EdgeLabel::Delay { cycles, initial, .. } = template.edge(edge_id).label() {
                let depth = (*cycles).max(1);
                let source_vertex = template.edge(edge_id).sources()[0];
                let output_vertex = template.edge(edge_id).targets()[0];
                delays.push(DelayState {
                    edge_id,
                    source_vertex,
                    output_vertex,
                    history: VecDeque::from(vec![initial.clone(); depth]),
                });
            }
        }

        Ok(Evaluator {
            signature: Rc::new(signature),
            template,
            inputs,
            outputs,
            delays,
            rules: default_rules(),
            tick: 0,
            history: Vec::new(),
        })
    }

    pub fn signature(&self) -> &Signature<V, G> {
        &self.signature
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    pub fn coarity(&self) -> usize {
        self.outputs.len()
    }

    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn history(&self) -> &[CycleRecord<V, G>] {
        &self.history
    }

    /// The `port`-th input across every cycle recorded so far.
    pub fn input_history(&self, port: usize) -> Vec<CycleInput<V>> {
        self.history.iter().map(|r| r.inputs[port].clone()).collect()
    }

    /// The `port`-th output across every cycle recorded so far.
    pub fn output_history(&self, port: usize) -> Vec<OutputTerm<V, G>> {
        self.history.iter().map(|r| r.outputs[port].clone()).collect()
    }

    /// Run one cycle: attach `inputs` at the input interface and each
    /// delay's current state at its output, rewrite to a fixed point bounded
    /// by `step_budget`, harvest next-cycle delay state, and resolve an
    /// [`OutputTerm`] at every output-interface vertex.
    pub fn perform_cycle(
        &mut self,
        inputs: Vec<CycleInput<V>>,
        step_budget: usize,
    ) -> EvalResult<Vec<OutputTerm<V, G>>> {
        if inputs.len() != self.inputs.len() {
            return Err(EvalError::InvalidInput(format!(
                "expected {} cycle input(s), got {}",
                self.inputs.len(),
                inputs.len()
            ))
            .into());
        }
        for (i, (vertex, input)) in self.inputs.iter().zip(&inputs).enumerate() {
            let expected = self.template.vertex_width(*vertex);
            if input.width() != expected {
                return Err(EvalError::InvalidInput(format!(
                    "cycle input {i} has width {}, expected {expected}",
                    input.width()
                ))
                .into());
            }
        }

        let mut graph = self.template.clone();
        let mut pending_arguments = AHashMap::default();
        let mut initial_work = Vec::new();

        for (vertex, input) in self.inputs.iter().zip(inputs.iter().cloned()) {
            pending_arguments.insert(*vertex, input);
            initial_work.push(TraversalElement::Vertex(*vertex));
        }

        for delay in &self.delays {
            graph.remove_edge(delay.edge_id);
            let state = delay
                .history
                .front()
                .expect("a delay's history is never empty")
                .clone();
            graph.splice_edge(EdgeLabel::Signal(state), vec![], vec![delay.output_vertex], None)?;
            initial_work.extend(
                graph
                    .vertex_out_edges(delay.output_vertex)
                    .iter()
                    .copied()
                    .map(TraversalElement::Edge),
            );
        }

        let mut ctx = RewriteContext::new(pending_arguments, self.tick);
        run_to_fixpoint(&mut graph, &self.signature, &mut ctx, &self.rules, initial_work, step_budget)?;

        let mut next_states = Vec::with_capacity(self.delays.len());
        for delay in &self.delays {
            next_states.push(resolve_definite(&graph, delay.source_vertex)?);
        }
        for (delay, next) in self.delays.iter_mut().zip(next_states) {
            delay.history.push_back(next);
            delay.history.pop_front();
        }

        let mut memo = AHashMap::default();
        let mut output_terms = Vec::with_capacity(self.outputs.len());
        for v in &self.outputs {
            output_terms.push(build_term(&graph, *v, self.tick, &mut memo)?);
        }

        self.history.push(CycleRecord {
            inputs,
            outputs: output_terms.clone(),
        });
        self.tick += 1;
        Ok(output_terms)
    }

    /// Drive `inputs` (one [`Waveform`] per input port) through `ticks`
    /// cycles, sampling each waveform at the evaluator's current tick.
    pub fn run_waveform(
        &mut self,
        inputs: &[Waveform<V>],
        ticks: usize,
        step_budget: usize,
    ) -> EvalResult<Vec<Vec<OutputTerm<V, G>>>> {
        if inputs.len() != self.inputs.len() {
            return Err(EvalError::InvalidInput(format!(
                "expected {} input waveform(s), got {}",
                self.inputs.len(),
                inputs.len()
            ))
            .into());
        }
        let mut runs = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            let cycle_inputs: Vec<CycleInput<V>> = inputs
                .iter()
                .map(|w| CycleInput::Definite(w.signal_at_tick(self.tick).clone()))
                .collect();
            runs.push(self.perform_cycle(cycle_inputs, step_budget)?);
        }
        Ok(runs)
    }
}

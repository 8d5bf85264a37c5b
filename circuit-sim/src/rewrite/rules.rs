//! The built-in rewrite rules: argument attachment, bottom absorption, join,
//! generic primitive application, delay shift, and feedback resolution.
//!
//! Delay shift and the fork discipline that the other rules assume are both
//! handled once, up front, by `crate::evaluator::normalize_forks` rather than
//! reactively here — see that module for why. [`DelayShiftRule`] exists only
//! so the engine's rule list mentions it by name; it always declines.

use super::{RewriteContext, RewriteRule, TraversalElement};
use crate::errors::{EvalError, EvalResult};
use ahash::AHashSet;
use circuit_ir::{
    CycleInput, EdgeLabel, Hypergraph, PrimitiveSymbol, Signal, Signature, VarAssignment,
    VariableSignal, Value, VertexId, Waveform,
};
use std::rc::Rc;

/// A source vertex's resolved producer, classified by evaluation regime. A
/// vertex with no producer yet, or whose producer is some other
/// not-yet-resolved operation, is simply "not ready" (`None` from
/// [`classify_source`]) rather than a variant here.
enum ReadyArg<V: Value> {
    Definite(Signal<V>),
    Partial(VariableSignal<V>),
    Waveform(Waveform<V>),
}

fn classify_source<V, G>(graph: &Hypergraph<V, G>, vertex: VertexId) -> Option<ReadyArg<V>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let in_edge = graph.vertex_in_edge(vertex)?;
    match graph.edge(in_edge).label() {
        EdgeLabel::Argument(CycleInput::Definite(s)) => Some(ReadyArg::Definite(s.clone())),
        EdgeLabel::Argument(CycleInput::Partial(vs)) => Some(ReadyArg::Partial(vs.clone())),
        EdgeLabel::Value(v) => Some(ReadyArg::Definite(Signal::of(v.clone()))),
        EdgeLabel::Signal(s) => Some(ReadyArg::Definite(s.clone())),
        EdgeLabel::Partial(vs) => Some(ReadyArg::Partial(vs.clone())),
        EdgeLabel::InfiniteWaveform(w) => Some(ReadyArg::Waveform(w.clone())),
        _ => None,
    }
}

/// `true` if firing on an edge whose sources include `vertex` would not
/// violate the fork discipline established by `normalize_forks`: every
/// source must have exactly one *distinct* consuming edge. Raw
/// `vertex_out_edges` length over-counts a source read into more than one
/// argument position of the very same edge, which `normalize_forks` never
/// forks (it is already a single logical consumer).
fn single_consumer<V, G>(graph: &Hypergraph<V, G>, vertices: &[VertexId]) -> bool
where
    V: Value,
    G: PrimitiveSymbol,
{
    vertices.iter().all(|v| {
        let distinct: AHashSet<_> = graph.vertex_out_edges(*v).iter().copied().collect();
        distinct.len() == 1
    })
}

fn out_edges_of<V, G>(graph: &Hypergraph<V, G>, vertices: &[VertexId]) -> Vec<TraversalElement>
where
    V: Value,
    G: PrimitiveSymbol,
{
    vertices
        .iter()
        .flat_map(|v| graph.vertex_out_edges(*v).iter().copied())
        .map(TraversalElement::Edge)
        .collect()
}

/// Compute a `Join`/`Primitive`/`EnhancedPrimitive`/`Bundler`/`Blackbox`
/// label's outputs given concrete inputs. Shared by the definite, partial
/// (per-assignment), and waveform (per-tick) evaluation paths.
fn compute_definite<V, G>(
    label: &EdgeLabel<V, G>,
    signature: &Signature<V, G>,
    inputs: &[Signal<V>],
) -> EvalResult<Vec<Signal<V>>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    match label {
        EdgeLabel::Primitive(g) => Ok(signature.interpret(g, inputs)?),
        EdgeLabel::EnhancedPrimitive(g, _delays) => Ok(signature.interpret(g, inputs)?),
        EdgeLabel::Blackbox(bb) => Ok(bb.apply(inputs)),
        EdgeLabel::Join(width) => {
            let a = &inputs[0];
            let b = &inputs[1];
            if a.width() != *width || b.width() != *width {
                return Err(EvalError::InvalidInput(format!(
                    "JOIN(width={width}) given mismatched input widths {} and {}",
                    a.width(),
                    b.width()
                ))
                .into());
            }
            let bits: Vec<V> = (0..*width)
                .map(|i| signature.lattice().join(a.bit(i), b.bit(i)))
                .collect();
            Ok(vec![Signal::bits(bits)])
        }
        EdgeLabel::Bundler {
            out_arities,
            wiring,
            ..
        } => {
            let flat: Vec<V> = inputs.iter().flat_map(|s| s.as_slice().iter().cloned()).collect();
            let mut outputs = Vec::with_capacity(out_arities.len());
            let mut idx = 0usize;
            for &width in out_arities.iter() {
                let bits: Vec<V> = (0..width)
                    .map(|_| {
                        let bit = flat[wiring[idx]].clone();
                        idx += 1;
                        bit
                    })
                    .collect();
                outputs.push(Signal::bits(bits));
            }
            Ok(outputs)
        }
        other => Err(EvalError::IncompatibleVariant {
            expected: "PRIMITIVE, ENHANCED_PRIMITIVE, JOIN, BUNDLER, or BLACKBOX".to_string(),
            found: format!("{other:?}"),
        }
        .into()),
    }
}

/// Lift [`compute_definite`] across symbolic inputs: one output
/// `VariableSignal` per port, closing over the union of dependent variables.
/// Collapses a port to `SIGNAL` if every reachable assignment (drawn from
/// the signature's lattice, the only domain a free variable can range over)
/// produces the same concrete signal.
fn compute_partial<V, G>(
    label: &EdgeLabel<V, G>,
    signature: &Rc<Signature<V, G>>,
    args: Vec<VariableSignal<V>>,
) -> EvalResult<Vec<EdgeLabel<V, G>>>
where
    V: Value + 'static,
    G: PrimitiveSymbol + 'static,
{
    let coarity = label.output_widths().len();
    let mut vars: Vec<_> = args.iter().flat_map(|vs| vs.dependent_vars().iter().copied()).collect();
    vars.sort_unstable();
    vars.dedup();
    let domain: Vec<V> = signature.lattice().elements().to_vec();

    let mut results = Vec::with_capacity(coarity);
    for port in 0..coarity {
        let label = label.clone();
        let signature = Rc::clone(signature);
        let args = args.clone();
        let width = label.output_widths()[port];
        let eval = move |assignment: &VarAssignment<V>| {
            let signals: Vec<Signal<V>> = args.iter().map(|vs| vs.evaluate(assignment)).collect();
            compute_definite(&label, &signature, &signals)
                .expect("primitive interpretation was already validated at construction time")[port]
                .clone()
        };
        let vs = VariableSignal::new(width, vars.clone(), eval);
        let possible = vs.possible_signals(&domain);
        let collapsed = possible
            .first()
            .filter(|first| possible.iter().all(|s| s == *first));
        results.push(match collapsed {
            Some(single) => EdgeLabel::Signal(single.clone()),
            None => EdgeLabel::Partial(vs),
        });
    }
    Ok(results)
}

/// Lift [`compute_definite`] across waveform inputs, one tick at a time over
/// the lcm of the input periods.
fn compute_waveform<V, G>(
    label: &EdgeLabel<V, G>,
    signature: &Signature<V, G>,
    args: &[Waveform<V>],
) -> EvalResult<Vec<EdgeLabel<V, G>>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let coarity = label.output_widths().len();
    let mut results = Vec::with_capacity(coarity);
    for port in 0..coarity {
        let joined = Waveform::join_waveforms(args, |ticks| {
            let owned: Vec<Signal<V>> = ticks.iter().map(|s| (*s).clone()).collect();
            compute_definite(label, signature, &owned)
                .expect("primitive interpretation was already validated at construction time")[port]
                .clone()
        });
        results.push(EdgeLabel::InfiniteWaveform(joined));
    }
    Ok(results)
}

fn is_apply_label<V: Value, G: PrimitiveSymbol>(label: &EdgeLabel<V, G>) -> bool {
    matches!(
        label,
        EdgeLabel::Primitive(_)
            | EdgeLabel::EnhancedPrimitive(_, _)
            | EdgeLabel::Join(_)
            | EdgeLabel::Bundler { .. }
            | EdgeLabel::Blackbox(_)
    )
}

/// Attaches this cycle's `ARGUMENT(cycleInput)` to an input-interface
/// vertex, draining it from [`RewriteContext::pending_arguments`].
pub struct ArgumentRule;

impl<V: Value, G: PrimitiveSymbol> RewriteRule<V, G> for ArgumentRule {
    fn name(&self) -> &'static str {
        "argument"
    }

    fn fire(
        &self,
        graph: &mut Hypergraph<V, G>,
        _signature: &Rc<Signature<V, G>>,
        ctx: &mut RewriteContext<V>,
        element: TraversalElement,
    ) -> EvalResult<Option<Vec<TraversalElement>>> {
        let TraversalElement::Vertex(v) = element else {
            return Ok(None);
        };
        if graph.vertex_in_edge(v).is_some() {
            return Ok(None);
        }
        let Some(input) = ctx.pending_arguments.remove(&v) else {
            return Ok(None);
        };
        graph.splice_edge(EdgeLabel::Argument(input), vec![], vec![v], None)?;
        Ok(Some(out_edges_of(graph, &[v])))
    }
}

/// Forces every source to the signature's bottom element to a bottom output,
/// independent of what the primitive's own interpretation would otherwise
/// compute.
pub struct BottomAbsorptionRule;

impl<V: Value, G: PrimitiveSymbol> RewriteRule<V, G> for BottomAbsorptionRule {
    fn name(&self) -> &'static str {
        "bottom-absorption"
    }

    fn fire(
        &self,
        graph: &mut Hypergraph<V, G>,
        signature: &Rc<Signature<V, G>>,
        _ctx: &mut RewriteContext<V>,
        element: TraversalElement,
    ) -> EvalResult<Option<Vec<TraversalElement>>> {
        let TraversalElement::Edge(edge_id) = element else {
            return Ok(None);
        };
        if !graph.is_alive(edge_id) {
            return Ok(None);
        }
        let edge = graph.edge(edge_id);
        if !is_apply_label(edge.label()) {
            return Ok(None);
        }
        let sources = edge.sources().to_vec();
        if sources.is_empty() || !single_consumer(graph, &sources) {
            return Ok(None);
        }
        let Some(args): Option<Vec<ReadyArg<V>>> =
            sources.iter().map(|s| classify_source(graph, *s)).collect()
        else {
            return Ok(None);
        };
        let bottom = signature.bottom();
        let all_bottom = args.iter().all(|a| match a {
            ReadyArg::Definite(s) => s.as_slice().iter().all(|b| b == bottom),
            _ => false,
        });
        if !all_bottom {
            return Ok(None);
        }

        let out_widths = edge.label().output_widths();
        let targets = edge.targets().to_vec();
        graph.remove_edge(edge_id);
        for (t, width) in targets.iter().zip(out_widths) {
            graph.splice_edge(
                EdgeLabel::Signal(Signal::fill(bottom.clone(), width)),
                vec![],
                vec![*t],
                None,
            )?;
        }
        Ok(Some(out_edges_of(graph, &targets)))
    }
}

/// `JOIN(width)` with two `DEFINITE` sources: the fast, common-case path.
/// Partial or waveform sources fall through to [`PrimitiveApplyRule`], which
/// handles `JOIN` too (by lifting the same bitwise-join formula).
pub struct JoinRule;

impl<V: Value, G: PrimitiveSymbol> RewriteRule<V, G> for JoinRule {
    fn name(&self) -> &'static str {
        "join"
    }

    fn fire(
        &self,
        graph: &mut Hypergraph<V, G>,
        signature: &Rc<Signature<V, G>>,
        _ctx: &mut RewriteContext<V>,
        element: TraversalElement,
    ) -> EvalResult<Option<Vec<TraversalElement>>> {
        let TraversalElement::Edge(edge_id) = element else {
            return Ok(None);
        };
        if !graph.is_alive(edge_id) {
            return Ok(None);
        }
        let edge = graph.edge(edge_id);
        if !matches!(edge.label(), EdgeLabel::Join(_)) {
            return Ok(None);
        }
        let sources = edge.sources().to_vec();
        if !single_consumer(graph, &sources) {
            return Ok(None);
        }
        let Some(args): Option<Vec<ReadyArg<V>>> =
            sources.iter().map(|s| classify_source(graph, *s)).collect()
        else {
            return Ok(None);
        };
        if !args.iter().all(|a| matches!(a, ReadyArg::Definite(_))) {
            return Ok(None);
        }
        let signals: Vec<Signal<V>> = args
            .into_iter()
            .map(|a| match a {
                ReadyArg::Definite(s) => s,
                _ => unreachable!(),
            })
            .collect();
        let label = edge.label().clone();
        let targets = edge.targets().to_vec();
        let outputs = compute_definite(&label, signature, &signals)?;

        graph.remove_edge(edge_id);
        for (t, out) in targets.iter().zip(outputs) {
            graph.splice_edge(EdgeLabel::Signal(out), vec![], vec![*t], None)?;
        }
        Ok(Some(out_edges_of(graph, &targets)))
    }
}

/// The general apply rule: `PRIMITIVE`, `ENHANCED_PRIMITIVE`, `JOIN`,
/// `BUNDLER`, and `BLACKBOX`, across definite, partial, and waveform
/// arguments alike. A `DEFINITE` argument sharing an edge with a `PARTIAL`
/// one is lifted into a constant `VariableSignal` rather than stalling the
/// whole apply; `WAVEFORM` mixed with anything else still declines.
pub struct PrimitiveApplyRule;

impl<V: Value + 'static, G: PrimitiveSymbol + 'static> RewriteRule<V, G> for PrimitiveApplyRule {
    fn name(&self) -> &'static str {
        "primitive-apply"
    }

    fn fire(
        &self,
        graph: &mut Hypergraph<V, G>,
        signature: &Rc<Signature<V, G>>,
        _ctx: &mut RewriteContext<V>,
        element: TraversalElement,
    ) -> EvalResult<Option<Vec<TraversalElement>>> {
        let TraversalElement::Edge(edge_id) = element else {
            return Ok(None);
        };
        if !graph.is_alive(edge_id) {
            return Ok(None);
        }
        let edge = graph.edge(edge_id);
        if !is_apply_label(edge.label()) {
            return Ok(None);
        }
        let sources = edge.sources().to_vec();
        let targets = edge.targets().to_vec();
        if sources.is_empty() || !single_consumer(graph, &sources) {
            return Ok(None);
        }
        let Some(args): Option<Vec<ReadyArg<V>>> =
            sources.iter().map(|s| classify_source(graph, *s)).collect()
        else {
            return Ok(None);
        };
        let label = edge.label().clone();

        let new_labels: Vec<EdgeLabel<V, G>> = if args.iter().all(|a| matches!(a, ReadyArg::Definite(_))) {
            let signals: Vec<Signal<V>> = args
                .into_iter()
                .map(|a| match a {
                    ReadyArg::Definite(s) => s,
                    _ => unreachable!(),
                })
                .collect();
            compute_definite(&label, signature, &signals)?
                .into_iter()
                .map(EdgeLabel::Signal)
                .collect()
        } else if args.iter().any(|a| matches!(a, ReadyArg::Partial(_)))
            && !args.iter().any(|a| matches!(a, ReadyArg::Waveform(_)))
        {
            // A sibling DEFINITE argument (e.g. a constant) is lifted into a
            // constant VariableSignal so partial evaluation still propagates
            // through it, rather than stalling the whole apply forever.
            let vss: Vec<VariableSignal<V>> = args
                .into_iter()
                .map(|a| match a {
                    ReadyArg::Partial(vs) => vs,
                    ReadyArg::Definite(s) => VariableSignal::constant(s),
                    ReadyArg::Waveform(_) => unreachable!(),
                })
                .collect();
            compute_partial(&label, signature, vss)?
        } else if args.iter().all(|a| matches!(a, ReadyArg::Waveform(_))) {
            let ws: Vec<Waveform<V>> = args
                .into_iter()
                .map(|a| match a {
                    ReadyArg::Waveform(w) => w,
                    _ => unreachable!(),
                })
                .collect();
            compute_waveform(&label, signature, &ws)?
        } else {
            return Ok(None);
        };

        graph.remove_edge(edge_id);
        for (t, new_label) in targets.iter().zip(new_labels) {
            graph.splice_edge(new_label, vec![], vec![*t], None)?;
        }
        Ok(Some(out_edges_of(graph, &targets)))
    }
}

/// Always declines. A `DELAY` edge's target is resolved once per cycle by
/// `crate::evaluator::Evaluator::perform_cycle`, which splices in the
/// register's current state directly before the rewrite pass starts; it is
/// never migrated by a rewrite rule. This rule exists so the engine's rule
/// list still names all six built-ins.
pub struct DelayShiftRule;

impl<V: Value, G: PrimitiveSymbol> RewriteRule<V, G> for DelayShiftRule {
    fn name(&self) -> &'static str {
        "delay-shift"
    }

    fn fire(
        &self,
        _graph: &mut Hypergraph<V, G>,
        _signature: &Rc<Signature<V, G>>,
        _ctx: &mut RewriteContext<V>,
        _element: TraversalElement,
    ) -> EvalResult<Option<Vec<TraversalElement>>> {
        Ok(None)
    }
}

/// Once `source` has a resolved (leaf) producer, rebinds `target`'s
/// in-edge directly to that producer, bypassing the `FEEDBACK` edge. Used to
/// close same-cycle combinational loops in a `cyclic_combinational` graph.
pub struct FeedbackResolutionRule;

impl<V: Value, G: PrimitiveSymbol> RewriteRule<V, G> for FeedbackResolutionRule {
    fn name(&self) -> &'static str {
        "feedback-resolution"
    }

    fn fire(
        &self,
        graph: &mut Hypergraph<V, G>,
        _signature: &Rc<Signature<V, G>>,
        _ctx: &mut RewriteContext<V>,
        element: TraversalElement,
    ) -> EvalResult<Option<Vec<TraversalElement>>> {
        let TraversalElement::Edge(edge_id) = element else {
            return Ok(None);
        };
        if !graph.is_alive(edge_id) {
            return Ok(None);
        }
        let edge = graph.edge(edge_id);
        if !matches!(edge.label(), EdgeLabel::Feedback { .. }) {
            return Ok(None);
        }
        let source = edge.sources()[0];
        let target = edge.targets()[0];
        if classify_source(graph, source).is_none() {
            return Ok(None);
        }
        let producer = graph
            .vertex_in_edge(source)
            .expect("classify_source confirmed a producer");

        graph.remove_edge(edge_id);
        graph.rebind_in_edge(target, Some(producer));
        Ok(Some(out_edges_of(graph, &[target])))
    }
}

/// The six built-in rules, in firing-priority order: argument attachment
/// first, then the bottom-absorption override, then the `JOIN` fast path,
/// then the general apply rule, then delay shift (a no-op, see
/// [`DelayShiftRule`]), then feedback resolution last (it only ever fires on
/// what the earlier rules have already resolved).
pub fn default_rules<V, G>() -> Vec<Box<dyn RewriteRule<V, G>>>
where
    V: Value + 'static,
    G: PrimitiveSymbol + 'static,
{
    vec![
        Box::new(ArgumentRule),
        Box::new(BottomAbsorptionRule),
        Box::new(JoinRule),
        Box::new(PrimitiveApplyRule),
        Box::new(DelayShiftRule),
        Box::new(FeedbackResolutionRule),
    ]
}

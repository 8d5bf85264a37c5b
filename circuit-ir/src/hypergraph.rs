//! The interfaced-hypergraph data model: vertices (wires), hyperedges
//! (operations), and the streaming walker used by external serialisation.

use crate::arena::{Arena, EdgeId, VertexId};
use crate::port::Port;
use crate::primitive::PrimitiveSymbol;
use crate::signal::{Signal, Waveform};
use crate::value::Value;
use crate::variable::{CycleInput, VariableSignal};
use circuit_utils::{CircuitResult, Error, Id, ParamKind};
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU64, Ordering};

fn next_graph_id() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// An opaque, externally-specified operator: a name, fixed port shape, and an
/// interpretation closure not drawn from any [`crate::primitive::Signature`].
#[derive(Clone)]
pub struct Blackbox<V: Value> {
    name: Id,
    input_ports: Vec<Port>,
    output_ports: Vec<Port>,
    interpret: std::rc::Rc<dyn Fn(&[Signal<V>]) -> Vec<Signal<V>>>,
}

impl<V: Value> Blackbox<V> {
    pub fn new(
        name: impl Into<Id>,
        input_ports: Vec<Port>,
        output_ports: Vec<Port>,
        interpret: impl Fn(&[Signal<V>]) -> Vec<Signal<V>> + 'static,
    ) -> Self {
        Blackbox {
            name: name.into(),
            input_ports,
            output_ports,
            interpret: std::rc::Rc::new(interpret),
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn input_ports(&self) -> &[Port] {
        &self.input_ports
    }

    pub fn output_ports(&self) -> &[Port] {
        &self.output_ports
    }

    pub fn apply(&self, inputs: &[Signal<V>]) -> Vec<Signal<V>> {
        (self.interpret)(inputs)
    }
}

impl<V: Value> std::fmt::Debug for Blackbox<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Blackbox({:?})", self.name)
    }
}

/// A reference to a named subgraph. Per the ownership model, a composite
/// edge names the referenced subgraph and its interface widths; it does not
/// borrow the referenced graph's internals.
#[derive(Clone, Debug)]
pub struct CompositeSpec {
    name: Id,
    input_widths: Vec<usize>,
    output_widths: Vec<usize>,
}

impl CompositeSpec {
    pub fn new(name: impl Into<Id>, input_widths: Vec<usize>, output_widths: Vec<usize>) -> Self {
        CompositeSpec {
            name: name.into(),
            input_widths,
            output_widths,
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn input_widths(&self) -> &[usize] {
        &self.input_widths
    }

    pub fn output_widths(&self) -> &[usize] {
        &self.output_widths
    }
}

/// The tagged union of everything a hyperedge can mean.
#[derive(Clone)]
pub enum EdgeLabel<V: Value, G: PrimitiveSymbol> {
    Value(V),
    Signal(Signal<V>),
    Partial(VariableSignal<V>),
    InfiniteWaveform(Waveform<V>),
    Primitive(G),
    EnhancedPrimitive(G, SmallVec<[usize; 4]>),
    Join(usize),
    Bundler {
        in_arities: SmallVec<[usize; 4]>,
        out_arities: SmallVec<[usize; 4]>,
        /// For each output bit, flattened in declaration order across
        /// `out_arities`, the index into the flattened input bit-space
        /// (`0..sum(in_arities)`) it reads from. Repeats encode forking;
        /// a non-identity permutation encodes interleaving.
        wiring: std::rc::Rc<[usize]>,
    },
    Delay {
        width: usize,
        cycles: usize,
        /// State visible on the output before the delay has been fed
        /// anything; defaults to all-disconnected for a bare `DELAY(n)`, or
        /// an explicit reset value for a register built by
        /// [`crate::builder::register_guarded_feedback`].
        initial: Signal<V>,
    },
    Feedback {
        width: usize,
    },
    Blackbox(Blackbox<V>),
    Composite(CompositeSpec),
    Argument(CycleInput<V>),
}

impl<V: Value, G: PrimitiveSymbol> EdgeLabel<V, G> {
    /// Build a validated `BUNDLER` label: `wiring` must have one entry per
    /// flattened output bit, each indexing into the flattened input
    /// bit-space.
    pub fn bundler(
        in_arities: SmallVec<[usize; 4]>,
        out_arities: SmallVec<[usize; 4]>,
        wiring: Vec<usize>,
    ) -> CircuitResult<Self> {
        let total_in: usize = in_arities.iter().sum();
        let total_out: usize = out_arities.iter().sum();
        if wiring.len() != total_out {
            return Err(Error::incompatible_parameter(
                ParamKind::Outputs,
                format!(
                    "bundler wiring has {} entries, expected {total_out}",
                    wiring.len()
                ),
            ));
        }
        if let Some(bad) = wiring.iter().find(|i| **i >= total_in) {
            return Err(Error::incompatible_parameter(
                ParamKind::Inputs,
                format!("bundler wiring references input bit {bad}, but only {total_in} exist"),
            ));
        }
        Ok(EdgeLabel::Bundler {
            in_arities,
            out_arities,
            wiring: wiring.into(),
        })
    }

    pub fn input_widths(&self) -> Vec<usize> {
        use EdgeLabel::*;
        match self {
            Value(_) | Signal(_) | Partial(_) | InfiniteWaveform(_) | Argument(_) => vec![],
            Primitive(g) => g.input_ports().iter().map(Port::width).collect(),
            EnhancedPrimitive(g, _) => g.input_ports().iter().map(Port::width).collect(),
            Join(width) => vec![*width, *width],
            Bundler { in_arities, .. } => in_arities.to_vec(),
            Delay { width, .. } => vec![*width],
            Feedback { width } => vec![*width],
            Blackbox(bb) => bb.input_ports().iter().map(Port::width).collect(),
            Composite(spec) => spec.input_widths().to_vec(),
        }
    }

    pub fn output_widths(&self) -> Vec<usize> {
        use EdgeLabel::*;
        match self {
            Value(_) => vec![1],
            Signal(s) => vec![s.width()],
            Partial(vs) => vec![vs.width()],
            InfiniteWaveform(w) => vec![w.width()],
            Primitive(g) => g.output_ports().iter().map(Port::width).collect(),
            EnhancedPrimitive(g, _) => g.output_ports().iter().map(Port::width).collect(),
            Join(width) => vec![*width],
            Bundler { out_arities, .. } => out_arities.to_vec(),
            Delay { width, .. } => vec![*width],
            Feedback { width } => vec![*width],
            Blackbox(bb) => bb.output_ports().iter().map(Port::width).collect(),
            Composite(spec) => spec.output_widths().to_vec(),
            Argument(input) => vec![input.width()],
        }
    }

    pub fn is_combinational(&self) -> bool {
        !matches!(self, EdgeLabel::Delay { .. } | EdgeLabel::Feedback { .. })
    }
}

impl<V: Value, G: PrimitiveSymbol> std::fmt::Debug for EdgeLabel<V, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use EdgeLabel::*;
        match self {
            Value(v) => write!(f, "VALUE({v:?})"),
            Signal(s) => write!(f, "SIGNAL(width={})", s.width()),
            Partial(vs) => write!(f, "PARTIAL(width={})", vs.width()),
            InfiniteWaveform(w) => write!(f, "INFINITE_WAVEFORM(period={})", w.period()),
            Primitive(g) => write!(f, "PRIMITIVE({g:?})"),
            EnhancedPrimitive(g, delays) => write!(f, "ENHANCED_PRIMITIVE({g:?}, {delays:?})"),
            Join(width) => write!(f, "JOIN(width={width})"),
            Bundler {
                in_arities,
                out_arities,
                ..
            } => write!(f, "BUNDLER({in_arities:?} -> {out_arities:?})"),
            Delay { width, cycles, .. } => write!(f, "DELAY(width={width}, cycles={cycles})"),
            Feedback { width } => write!(f, "FEEDBACK(width={width})"),
            Blackbox(bb) => write!(f, "BLACKBOX({bb:?})"),
            Composite(spec) => write!(f, "COMPOSITE({:?})", spec.name()),
            Argument(_) => write!(f, "ARGUMENT"),
        }
    }
}

#[derive(Clone, Debug)]
struct VertexData {
    width: usize,
    in_edge: Option<EdgeId>,
    out_edges: Vec<EdgeId>,
}

/// One hyperedge: an operation with ordered source and target wires.
#[derive(Clone)]
pub struct Edge<V: Value, G: PrimitiveSymbol> {
    label: EdgeLabel<V, G>,
    sources: SmallVec<[VertexId; 4]>,
    targets: SmallVec<[VertexId; 4]>,
    embedded_subgraph: Option<Id>,
}

impl<V: Value, G: PrimitiveSymbol> Edge<V, G> {
    pub fn label(&self) -> &EdgeLabel<V, G> {
        &self.label
    }

    pub fn sources(&self) -> &[VertexId] {
        &self.sources
    }

    pub fn targets(&self) -> &[VertexId] {
        &self.targets
    }

    pub fn embedded_subgraph(&self) -> Option<Id> {
        self.embedded_subgraph
    }

    pub fn arity(&self) -> usize {
        self.sources.len()
    }

    pub fn coarity(&self) -> usize {
        self.targets.len()
    }
}

/// A hypergraph of wires (vertices) and operations (hyperedges), owned by an
/// arena; every cross-reference is a `Copy` integer handle rather than a
/// shared pointer. Cheaply `Clone`-able: the evaluator clones a normalized
/// template once per cycle rather than mutating shared state in place.
#[derive(Clone)]
pub struct Hypergraph<V: Value, G: PrimitiveSymbol> {
    id: u64,
    vertices: Arena<VertexId, VertexData>,
    edges: Arena<EdgeId, Option<Edge<V, G>>>,
    cyclic_combinational: bool,
}

impl<V: Value, G: PrimitiveSymbol> Hypergraph<V, G> {
    pub fn new(cyclic_combinational: bool) -> Self {
        Hypergraph {
            id: next_graph_id(),
            vertices: Arena::new(),
            edges: Arena::new(),
            cyclic_combinational,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_cyclic_combinational(&self) -> bool {
        self.cyclic_combinational
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex_width(&self, v: VertexId) -> usize {
        self.vertices[v].width
    }

    pub fn vertex_in_edge(&self, v: VertexId) -> Option<EdgeId> {
        self.vertices[v].in_edge
    }

    pub fn vertex_out_edges(&self, v: VertexId) -> &[EdgeId] {
        &self.vertices[v].out_edges
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().filter_map(|(id, e)| e.as_ref().map(|_| id))
    }

    pub fn edge(&self, e: EdgeId) -> &Edge<V, G> {
        self.edges[e]
            .as_ref()
            .expect("edge handle used after removal")
    }

    pub fn is_alive(&self, e: EdgeId) -> bool {
        matches!(self.edges.get(e), Some(Some(_)))
    }

    /// Allocate a free wire with no producing edge.
    pub fn use_wire(&mut self, width: usize) -> CircuitResult<VertexId> {
        if width == 0 {
            return Err(Error::incompatible_parameter(
                ParamKind::Width,
                "wire width must be >= 1",
            ));
        }
        Ok(self.vertices.push(VertexData {
            width,
            in_edge: None,
            out_edges: Vec::new(),
        }))
    }

    fn check_widths(
        &self,
        expected: &[usize],
        actual: &[usize],
        kind: ParamKind,
        what: &str,
    ) -> CircuitResult<()> {
        if expected.len() != actual.len() {
            return Err(Error::incompatible_parameter(
                kind,
                format!(
                    "{what}: expected {} port(s), got {}",
                    expected.len(),
                    actual.len()
                ),
            ));
        }
        for (i, (e, a)) in expected.iter().zip(actual).enumerate() {
            if e != a {
                return Err(Error::incompatible_parameter(
                    ParamKind::Width,
                    format!("{what}[{i}]: expected width {e}, got {a}"),
                ));
            }
        }
        Ok(())
    }

    /// Create fresh output vertices for `label` given `sources`, and link
    /// them. Returns the edge and its freshly allocated target vertices.
    pub fn use_edge(
        &mut self,
        label: EdgeLabel<V, G>,
        sources: Vec<VertexId>,
        embedded_subgraph: Option<Id>,
    ) -> CircuitResult<(EdgeId, Vec<VertexId>)> {
        let source_widths: Vec<usize> = sources.iter().map(|v| self.vertices[*v].width).collect();
        self.check_widths(&label.input_widths(), &source_widths, ParamKind::Inputs, "sources")?;

        let output_widths = label.output_widths();
        let targets: Vec<VertexId> = output_widths
            .iter()
            .map(|w| {
                self.vertices.push(VertexData {
                    width: *w,
                    in_edge: None,
                    out_edges: Vec::new(),
                })
            })
            .collect();

        let edge_id = self.link_edge(label, sources, targets.clone(), embedded_subgraph)?;
        Ok((edge_id, targets))
    }

    /// Like [`Hypergraph::use_edge`], but lands on pre-existing target
    /// vertices rather than allocating new ones. Used by the rewrite engine
    /// to replace an edge in place.
    pub fn splice_edge(
        &mut self,
        label: EdgeLabel<V, G>,
        sources: Vec<VertexId>,
        targets: Vec<VertexId>,
        embedded_subgraph: Option<Id>,
    ) -> CircuitResult<EdgeId> {
        let source_widths: Vec<usize> = sources.iter().map(|v| self.vertices[*v].width).collect();
        self.check_widths(&label.input_widths(), &source_widths, ParamKind::Inputs, "sources")?;
        let target_widths: Vec<usize> = targets.iter().map(|v| self.vertices[*v].width).collect();
        self.check_widths(&label.output_widths(), &target_widths, ParamKind::Outputs, "targets")?;
        for t in &targets {
            if self.vertices[*t].in_edge.is_some() {
                return Err(Error::incompatible_parameter(
                    ParamKind::InEdges,
                    format!("vertex {:?} already has a producing edge", t),
                ));
            }
        }
        self.link_edge(label, sources, targets, embedded_subgraph)
    }

    fn link_edge(
        &mut self,
        label: EdgeLabel<V, G>,
        sources: Vec<VertexId>,
        targets: Vec<VertexId>,
        embedded_subgraph: Option<Id>,
    ) -> CircuitResult<EdgeId> {
        let edge = Edge {
            label,
            sources: sources.iter().copied().collect(),
            targets: targets.iter().copied().collect(),
            embedded_subgraph,
        };
        let edge_id = self.edges.push(Some(edge));
        for s in &sources {
            self.vertices[*s].out_edges.push(edge_id);
        }
        for t in &targets {
            self.vertices[*t].in_edge = Some(edge_id);
        }
        Ok(edge_id)
    }

    /// Remove an edge, detaching it from its sources and clearing its
    /// targets' in-edge (callers splicing in a replacement must relink those
    /// targets themselves).
    pub fn remove_edge(&mut self, id: EdgeId) -> Edge<V, G> {
        let edge = self.edges[id].take().expect("double removal of an edge");
        for s in &edge.sources {
            self.vertices[*s].out_edges.retain(|e| *e != id);
        }
        for t in &edge.targets {
            if self.vertices[*t].in_edge == Some(id) {
                self.vertices[*t].in_edge = None;
            }
        }
        edge
    }

    /// Rebind a vertex's producing edge directly, without touching that
    /// edge's own `targets` list. Used only by feedback resolution, which
    /// bypasses a consumed `FEEDBACK` edge by pointing its target straight at
    /// whatever now produces the feedback's source.
    pub fn rebind_in_edge(&mut self, vertex: VertexId, producer: Option<EdgeId>) {
        self.vertices[vertex].in_edge = producer;
    }

    /// Register a feedback edge from `source` to `target`. `target` must not
    /// already have a producing edge. Fails with `UnguardedFeedback` unless
    /// every forward path from `target` back to `source` crosses a `DELAY`
    /// edge, unless the graph is cyclic-combinational.
    pub fn feedback(&mut self, source: VertexId, target: VertexId) -> CircuitResult<EdgeId> {
        let width = self.vertices[source].width;
        if self.vertices[target].width != width {
            return Err(Error::incompatible_parameter(
                ParamKind::Width,
                "feedback source and target widths must match",
            ));
        }
        if self.vertices[target].in_edge.is_some() {
            return Err(Error::incompatible_parameter(
                ParamKind::InEdges,
                format!("feedback target {:?} already has a producing edge", target),
            ));
        }
        if !self.cyclic_combinational && !self.path_crosses_delay(source, target) {
            return Err(Error::unguarded_feedback(format!(
                "no delay guards the path from {:?} to {:?}",
                target, source
            )));
        }
        self.link_edge(EdgeLabel::Feedback { width }, vec![source], vec![target], None)
    }

    /// `true` if every forward path from `to` that reaches `from` crosses a
    /// `DELAY` edge (i.e. feeding `from` into `to` via a new feedback edge
    /// cannot close a same-cycle combinational loop).
    fn path_crosses_delay(&self, from: VertexId, to: VertexId) -> bool {
        let mut stack = vec![(to, false)];
        let mut visited_clean = ahash::AHashSet::default();
        let mut visited_dirty = ahash::AHashSet::default();
        while let Some((v, crossed_delay)) = stack.pop() {
            if v == from && !crossed_delay {
                return false;
            }
            let fresh = if crossed_delay {
                visited_dirty.insert(v)
            } else {
                visited_clean.insert(v)
            };
            if !fresh {
                continue;
            }
            for out_edge in &self.vertices[v].out_edges {
                if let Some(edge) = self.edges[*out_edge].as_ref() {
                    let crosses = crossed_delay || matches!(edge.label, EdgeLabel::Delay { .. });
                    for t in &edge.targets {
                        stack.push((*t, crosses));
                    }
                }
            }
        }
        true
    }

    /// A streaming walk suitable for external serialisation: every vertex
    /// and every live edge, as `(node_id, label_text, in_ids, out_ids,
    /// subgraph_id)` tuples.
    pub fn walk(&self) -> impl Iterator<Item = WalkNode> + '_ {
        let vertex_nodes = self.vertices.iter().map(|(vid, vdata)| WalkNode {
            node_id: WalkNodeId::Vertex(vid),
            label_text: format!("wire[{}]", vdata.width),
            in_ids: vdata.in_edge.into_iter().map(WalkNodeId::Edge).collect(),
            out_ids: vdata.out_edges.iter().map(|e| WalkNodeId::Edge(*e)).collect(),
            subgraph_id: None,
        });
        let edge_nodes = self.edges.iter().filter_map(|(eid, slot)| {
            slot.as_ref().map(|edge| WalkNode {
                node_id: WalkNodeId::Edge(eid),
                label_text: format!("{:?}", edge.label),
                in_ids: edge.sources.iter().map(|v| WalkNodeId::Vertex(*v)).collect(),
                out_ids: edge.targets.iter().map(|v| WalkNodeId::Vertex(*v)).collect(),
                subgraph_id: edge.embedded_subgraph,
            })
        });
        vertex_nodes.chain(edge_nodes)
    }
}

/// Identifies a node in a [`Hypergraph::walk`] stream: either a wire or an
/// operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WalkNodeId {
    Vertex(VertexId),
    Edge(EdgeId),
}

/// One entry of a [`Hypergraph::walk`] stream.
#[derive(Clone, Debug)]
pub struct WalkNode {
    pub node_id: WalkNodeId,
    pub label_text: String,
    pub in_ids: Vec<WalkNodeId>,
    pub out_ids: Vec<WalkNodeId>,
    pub subgraph_id: Option<Id>,
}

/// A hypergraph plus an ordered, named input and output interface.
pub struct InterfacedHypergraph<V: Value, G: PrimitiveSymbol> {
    graph: Hypergraph<V, G>,
    inputs: Vec<(VertexId, Id)>,
    outputs: Vec<(VertexId, Id)>,
    name: Id,
}

impl<V: Value, G: PrimitiveSymbol> InterfacedHypergraph<V, G> {
    pub fn new(graph: Hypergraph<V, G>, name: impl Into<Id>) -> Self {
        InterfacedHypergraph {
            graph,
            inputs: Vec::new(),
            outputs: Vec::new(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn graph(&self) -> &Hypergraph<V, G> {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Hypergraph<V, G> {
        &mut self.graph
    }

    pub fn add_input(&mut self, vertex: VertexId, name: impl Into<Id>) {
        self.inputs.push((vertex, name.into()));
    }

    pub fn add_output(&mut self, vertex: VertexId, name: impl Into<Id>) {
        self.outputs.push((vertex, name.into()));
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    pub fn coarity(&self) -> usize {
        self.outputs.len()
    }

    pub fn input_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.inputs.iter().map(|(v, _)| *v)
    }

    pub fn output_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.outputs.iter().map(|(v, _)| *v)
    }

    pub fn input_name(&self, index: usize) -> Id {
        self.inputs[index].1
    }

    pub fn output_name(&self, index: usize) -> Id {
        self.outputs[index].1
    }

    pub fn input_widths(&self) -> Vec<usize> {
        self.inputs
            .iter()
            .map(|(v, _)| self.graph.vertex_width(*v))
            .collect()
    }

    pub fn output_widths(&self) -> Vec<usize> {
        self.outputs
            .iter()
            .map(|(v, _)| self.graph.vertex_width(*v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Port;
    use circuit_utils::Id as CId;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Bit {
        Z,
        Zero,
        One,
    }

    impl Value for Bit {
        fn disconnected() -> Self {
            Bit::Z
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    enum G {
        Buf,
    }

    impl PrimitiveSymbol for G {
        fn name(&self) -> CId {
            CId::new("buf")
        }
        fn input_ports(&self) -> &[Port] {
            static PORTS: std::sync::OnceLock<[Port; 1]> = std::sync::OnceLock::new();
            PORTS.get_or_init(|| [Port::new(1)])
        }
        fn output_ports(&self) -> &[Port] {
            static PORTS: std::sync::OnceLock<[Port; 1]> = std::sync::OnceLock::new();
            PORTS.get_or_init(|| [Port::new(1)])
        }
    }

    #[test]
    fn use_edge_allocates_targets_and_links_sources() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let w = g.use_wire(1).unwrap();
        let (edge, targets) = g
            .use_edge(EdgeLabel::Primitive(G::Buf), vec![w], None)
            .unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(g.vertex_in_edge(targets[0]), Some(edge));
        assert_eq!(g.vertex_out_edges(w), &[edge]);
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let w = g.use_wire(4).unwrap();
        let err = g.use_edge(EdgeLabel::Primitive(G::Buf), vec![w], None);
        assert!(err.is_err());
    }

    #[test]
    fn feedback_without_delay_is_unguarded() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let b = g.use_wire(1).unwrap();
        let (_edge, produced) = g
            .use_edge(EdgeLabel::Primitive(G::Buf), vec![b], None)
            .unwrap();
        let a = produced[0];
        // b feeds a combinationally with no delay in between, so feeding a
        // back into b would close a same-cycle loop.
        assert!(g.feedback(a, b).is_err());
    }

    #[test]
    fn feedback_guarded_by_delay_succeeds() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let a = g.use_wire(1).unwrap();
        let (_delay_edge, delayed) = g
            .use_edge(
                EdgeLabel::Delay {
                    width: 1,
                    cycles: 1,
                    initial: Signal::disconnected(1),
                },
                vec![a],
                None,
            )
            .unwrap();
        let b = g.use_wire(1).unwrap();
        assert!(g.feedback(delayed[0], b).is_ok());
    }

    #[test]
    fn remove_edge_clears_linkage() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let w = g.use_wire(1).unwrap();
        let (edge, targets) = g
            .use_edge(EdgeLabel::Primitive(G::Buf), vec![w], None)
            .unwrap();
        g.remove_edge(edge);
        assert_eq!(g.vertex_in_edge(targets[0]), None);
        assert!(g.vertex_out_edges(w).is_empty());
        assert!(!g.is_alive(edge));
    }
}

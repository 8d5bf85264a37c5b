//! Whole-circuit construction: free-standing subcircuits, registers, and
//! composite instantiation on top of the low-level [`Hypergraph`] API.

use crate::arena::VertexId;
use crate::hypergraph::{CompositeSpec, EdgeLabel, Hypergraph, InterfacedHypergraph};
use crate::primitive::PrimitiveSymbol;
use crate::signal::Signal;
use crate::value::{Decimal, Value};
use circuit_utils::{CircuitResult, Error, ParamKind};

/// Insert an enhanced delay seeded with `initial` and a feedback edge from
/// `new_value` into `prev_wire`, the combined effect of a one-cycle register:
/// on the first cycle `prev_wire` reads as `initial`, thereafter as whatever
/// `new_value` carried the previous cycle.
pub fn register_guarded_feedback<V, G>(
    graph: &mut Hypergraph<V, G>,
    new_value: VertexId,
    prev_wire: VertexId,
    initial: i64,
    signed: bool,
) -> CircuitResult<()>
where
    V: Value + Decimal,
    G: PrimitiveSymbol,
{
    let width = graph.vertex_width(new_value);
    if graph.vertex_width(prev_wire) != width {
        return Err(Error::incompatible_parameter(
            ParamKind::Width,
            "register feedback: new_value and prev_wire widths must match",
        ));
    }
    let initial_signal = if signed {
        Signal::signed_from_int(initial, width)
    } else {
        Signal::unsigned_from_int(initial as u64, width)
    };

    let (_delay_edge, delayed) = graph.use_edge(
        EdgeLabel::Delay {
            width,
            cycles: 1,
            initial: initial_signal,
        },
        vec![new_value],
        None,
    )?;
    graph.feedback(delayed[0], prev_wire)?;
    Ok(())
}

/// Close `graph` off as a reusable named component with the given ordered
/// interface wires.
pub fn make_subcircuit<V, G>(
    graph: Hypergraph<V, G>,
    name: impl Into<circuit_utils::Id>,
    input_wires: Vec<(VertexId, circuit_utils::Id)>,
    output_wires: Vec<(VertexId, circuit_utils::Id)>,
) -> InterfacedHypergraph<V, G>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let mut sub = InterfacedHypergraph::new(graph, name);
    for (v, name) in input_wires {
        sub.add_input(v, name);
    }
    for (v, name) in output_wires {
        sub.add_output(v, name);
    }
    sub
}

/// Instantiate `sub` as a `COMPOSITE` edge at `inputs`, returning freshly
/// allocated output wires of the subcircuit's output widths.
pub fn use_subcircuit<V, G>(
    graph: &mut Hypergraph<V, G>,
    sub: &InterfacedHypergraph<V, G>,
    inputs: Vec<VertexId>,
) -> CircuitResult<Vec<VertexId>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let spec = CompositeSpec::new(sub.name(), sub.input_widths(), sub.output_widths());
    let (_edge, outputs) = graph.use_edge(EdgeLabel::Composite(spec), inputs, Some(sub.name()))?;
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Port;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Bit {
        Zero,
        One,
    }

    impl Value for Bit {
        fn disconnected() -> Self {
            Bit::Zero
        }
    }

    impl Decimal for Bit {
        fn low() -> Self {
            Bit::Zero
        }
        fn high() -> Self {
            Bit::One
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    enum G {
        Buf,
    }

    impl PrimitiveSymbol for G {
        fn name(&self) -> circuit_utils::Id {
            circuit_utils::Id::new("buf")
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
    fn register_guarded_feedback_seeds_initial_and_links_feedback() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let new_value = g.use_wire(4).unwrap();
        let prev_wire = g.use_wire(4).unwrap();
        register_guarded_feedback(&mut g, new_value, prev_wire, 0, false).unwrap();
        assert!(g.vertex_in_edge(prev_wire).is_some());
    }

    #[test]
    fn make_and_use_subcircuit_round_trips_widths() {
        let mut inner: Hypergraph<Bit, G> = Hypergraph::new(false);
        let in_wire = inner.use_wire(1).unwrap();
        let (_e, outs) = inner
            .use_edge(EdgeLabel::Primitive(G::Buf), vec![in_wire], None)
            .unwrap();
        let sub = make_subcircuit(
            inner,
            "buf1",
            vec![(in_wire, circuit_utils::Id::new("in"))],
            vec![(outs[0], circuit_utils::Id::new("out"))],
        );

        let mut outer: Hypergraph<Bit, G> = Hypergraph::new(false);
        let outer_wire = outer.use_wire(1).unwrap();
        let result = use_subcircuit(&mut outer, &sub, vec![outer_wire]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(outer.vertex_width(result[0]), 1);
    }
}

mod common;

use circuit_algebra::construct::{make_ripple_map, Direction};
use circuit_algebra::{make_subcircuit, CycleInput, EdgeLabel, Evaluator, Hypergraph, Signal, VertexId};
use common::{belnap_signature, Belnap, Gate};

/// `cin, a, b -> cout, sum`, built from the Belnap gate set.
fn full_adder(
    graph: &mut Hypergraph<Belnap, Gate>,
    cin: VertexId,
    a: VertexId,
    b: VertexId,
) -> (VertexId, VertexId) {
    let (_e, ab_xor) = graph.use_edge(EdgeLabel::Primitive(Gate::Xor), vec![a, b], None).unwrap();
    let (_e, sum) = graph
        .use_edge(EdgeLabel::Primitive(Gate::Xor), vec![ab_xor[0], cin], None)
        .unwrap();
    let (_e, ab_and) = graph.use_edge(EdgeLabel::Primitive(Gate::And), vec![a, b], None).unwrap();
    let (_e, cin_and) = graph
        .use_edge(EdgeLabel::Primitive(Gate::And), vec![ab_xor[0], cin], None)
        .unwrap();
    let (_e, cout) = graph
        .use_edge(EdgeLabel::Primitive(Gate::Or), vec![ab_and[0], cin_and[0]], None)
        .unwrap();
    (cout[0], sum[0])
}

#[test]
fn four_bit_ripple_adder_5_plus_3_is_8() {
    let mut graph: Hypergraph<Belnap, Gate> = Hypergraph::new(false);
    let cin = graph.use_wire(1).unwrap();
    let a_bits: Vec<VertexId> = (0..4).map(|_| graph.use_wire(1).unwrap()).collect();
    let b_bits: Vec<VertexId> = (0..4).map(|_| graph.use_wire(1).unwrap()).collect();

    let mut data = Vec::with_capacity(8);
    for i in 0..4 {
        data.push(a_bits[i]);
        data.push(b_bits[i]);
    }

    let (cout, sum_bits) = make_ripple_map(
        &mut graph,
        4,
        2,
        Direction::TopToBottom,
        vec![cin],
        data,
        |graph, acc, cur| {
            let (cout, sum) = full_adder(graph, acc[0], cur[0], cur[1]);
            Ok((vec![cout], vec![sum]))
        },
    )
    .unwrap();

    let mut input_wires = vec![(cin, "cin".into())];
    for (i, w) in a_bits.iter().enumerate() {
        input_wires.push((*w, format!("a{i}").into()));
    }
    for (i, w) in b_bits.iter().enumerate() {
        input_wires.push((*w, format!("b{i}").into()));
    }
    let mut output_wires = Vec::new();
    for (i, outs) in sum_bits.iter().enumerate() {
        output_wires.push((outs[0], format!("s{i}").into()));
    }
    output_wires.push((cout[0], "cout".into()));

    let built = make_subcircuit(graph, "ripple_adder4", input_wires, output_wires);
    let mut evaluator = Evaluator::new(belnap_signature(), built).unwrap();

    let mut inputs = vec![CycleInput::Definite(Signal::of(Belnap::False))];
    for bit in Signal::<Belnap>::unsigned_from_int(5, 4).as_slice() {
        inputs.push(CycleInput::Definite(Signal::of(*bit)));
    }
    for bit in Signal::<Belnap>::unsigned_from_int(3, 4).as_slice() {
        inputs.push(CycleInput::Definite(Signal::of(*bit)));
    }

    let outputs = evaluator.perform_cycle(inputs, 10_000).unwrap();

    let sum_signal = Signal::bits((0..4).map(|i| {
        *outputs[i]
            .as_definite()
            .expect("sum bit should resolve to a definite signal")
            .bit(0)
    }));
    assert_eq!(sum_signal.unsigned_to_int(), Some(8));
    assert_eq!(outputs[4].as_definite(), Some(&Signal::of(Belnap::False)));
}

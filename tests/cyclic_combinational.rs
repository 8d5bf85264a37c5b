mod common;

use circuit_algebra::{
    make_subcircuit, register_guarded_feedback, CycleInput, EdgeLabel, Evaluator, Hypergraph, Signal,
    VertexId,
};
use common::{belnap_signature, Belnap, Gate};

/// `OR(AND(NOT(c), d0), AND(c, d1))`: selects `d0` when `c` is false-like,
/// `d1` otherwise.
fn mux(graph: &mut Hypergraph<Belnap, Gate>, c: VertexId, d0: VertexId, d1: VertexId) -> VertexId {
    let (_e, not_c) = graph.use_edge(EdgeLabel::Primitive(Gate::Not), vec![c], None).unwrap();
    let (_e, low) = graph.use_edge(EdgeLabel::Primitive(Gate::And), vec![not_c[0], d0], None).unwrap();
    let (_e, high) = graph.use_edge(EdgeLabel::Primitive(Gate::And), vec![c, d1], None).unwrap();
    let (_e, z) = graph.use_edge(EdgeLabel::Primitive(Gate::Or), vec![low[0], high[0]], None).unwrap();
    z[0]
}

/// Two muxes cross-feed each other's registered state: `R1`'s next value
/// picks between `X` and `R2`'s current value, `R2`'s next value picks
/// between `R1`'s current value and `X`, both gated by the same select `C`.
/// Each register is guarded by a one-cycle delay, so a change on `X` only
/// reaches the tapped output `Z = R1` one tick after it was latched.
#[test]
fn cross_fed_muxes_resolve_one_tick_after_the_guarding_delay() {
    let mut graph: Hypergraph<Belnap, Gate> = Hypergraph::new(false);
    let c = graph.use_wire(1).unwrap();
    let x = graph.use_wire(1).unwrap();
    let r1 = graph.use_wire(1).unwrap();
    let r2 = graph.use_wire(1).unwrap();

    let next1 = mux(&mut graph, c, x, r2);
    let next2 = mux(&mut graph, c, r1, x);

    register_guarded_feedback(&mut graph, next1, r1, 0, false).unwrap();
    register_guarded_feedback(&mut graph, next2, r2, 0, false).unwrap();

    let built = make_subcircuit(
        graph,
        "cross_fed_muxes",
        vec![(c, "c".into()), (x, "x".into())],
        vec![(r1, "z".into())],
    );
    let mut evaluator = Evaluator::new(belnap_signature(), built).unwrap();

    let c_false = CycleInput::Definite(Signal::of(Belnap::False));
    let x_true = CycleInput::Definite(Signal::of(Belnap::True));

    let tick0 = evaluator.perform_cycle(vec![c_false.clone(), x_true.clone()], 10_000).unwrap();
    assert_eq!(
        tick0[0].as_definite(),
        Some(&Signal::of(Belnap::False)),
        "R1 still reads its initial state on tick 0, before the delay carries X's effect through"
    );

    let tick1 = evaluator.perform_cycle(vec![c_false, x_true], 10_000).unwrap();
    assert_eq!(
        tick1[0].as_definite(),
        Some(&Signal::of(Belnap::True)),
        "by tick 1 the delay has latched X into R1"
    );
}

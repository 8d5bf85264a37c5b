mod common;

use circuit_algebra::{make_subcircuit, CycleInput, EdgeLabel, Evaluator, Hypergraph, Signal};
use common::{belnap_signature, Belnap, Gate};

#[test]
fn or_of_two_bottoms_is_bottom_but_mixed_bottom_defers_to_interpretation() {
    let mut graph: Hypergraph<Belnap, Gate> = Hypergraph::new(false);
    let a = graph.use_wire(1).unwrap();
    let b = graph.use_wire(1).unwrap();
    let (_e, out) = graph.use_edge(EdgeLabel::Primitive(Gate::Or), vec![a, b], None).unwrap();

    let built = make_subcircuit(graph, "or2", vec![(a, "a".into()), (b, "b".into())], vec![(out[0], "z".into())]);
    let mut evaluator = Evaluator::new(belnap_signature(), built).unwrap();

    let all_bottom = evaluator
        .perform_cycle(
            vec![
                CycleInput::Definite(Signal::of(Belnap::None)),
                CycleInput::Definite(Signal::of(Belnap::None)),
            ],
            1_000,
        )
        .unwrap();
    assert_eq!(all_bottom[0].as_definite(), Some(&Signal::of(Belnap::None)));

    let mixed = evaluator
        .perform_cycle(
            vec![
                CycleInput::Definite(Signal::of(Belnap::None)),
                CycleInput::Definite(Signal::of(Belnap::True)),
            ],
            1_000,
        )
        .unwrap();
    assert_eq!(mixed[0].as_definite(), Some(&Signal::of(Belnap::True)));
}

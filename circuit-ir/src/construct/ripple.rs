//! `Ripple`, `RippleMap`, and their bitwise variants: thread an accumulator
//! through `n` instances of an operation.

use super::bitwise::{combine_bitwise, split_bitwise};
use super::Direction;
use crate::arena::VertexId;
use crate::hypergraph::Hypergraph;
use crate::primitive::PrimitiveSymbol;
use crate::value::Value;
use circuit_utils::{CircuitResult, Error, ParamKind};

/// `TopToBottom` places the accumulator before the data bundle at both
/// interfaces and threads instances low-to-high; `BottomToUp` places it
/// after, and threads high-to-low. Returns `(input_acc_first,
/// output_acc_first)`.
pub fn ripple_bundle_positions(direction: Direction) -> (bool, bool) {
    match direction {
        Direction::TopToBottom => (true, true),
        Direction::BottomToUp => (false, false),
    }
}

fn step_order(direction: Direction, n: usize) -> Vec<usize> {
    match direction {
        Direction::TopToBottom => (0..n).collect(),
        Direction::BottomToUp => (0..n).rev().collect(),
    }
}

/// `f: (acc, cur) -> acc'`. Threads `initial_acc` through `n` steps, each
/// consuming one `cur_arity`-wide chunk of `data` (chunked contiguously, in
/// `direction` order). `n = 2` needs no special-casing: the loop below is
/// already a single pair of calls with no wrapper.
pub fn make_ripple<V, G>(
    graph: &mut Hypergraph<V, G>,
    n: usize,
    cur_arity: usize,
    direction: Direction,
    initial_acc: Vec<VertexId>,
    data: Vec<VertexId>,
    mut f: impl FnMut(&mut Hypergraph<V, G>, Vec<VertexId>, Vec<VertexId>) -> CircuitResult<Vec<VertexId>>,
) -> CircuitResult<Vec<VertexId>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    if data.len() != cur_arity * n {
        return Err(Error::incompatible_parameter(
            ParamKind::Inputs,
            format!(
                "make_ripple: expected {} data wires ({cur_arity} x {n}), got {}",
                cur_arity * n,
                data.len()
            ),
        ));
    }
    let chunks: Vec<&[VertexId]> = data.chunks(cur_arity).collect();
    let mut acc = initial_acc;
    for step in step_order(direction, n) {
        acc = f(graph, acc, chunks[step].to_vec())?;
    }
    Ok(acc)
}

/// `f: (acc, cur) -> (acc', out)`. Like [`make_ripple`], but also collects
/// each step's `out` bundle, in the same step order the data was consumed.
pub fn make_ripple_map<V, G>(
    graph: &mut Hypergraph<V, G>,
    n: usize,
    cur_arity: usize,
    direction: Direction,
    initial_acc: Vec<VertexId>,
    data: Vec<VertexId>,
    mut f: impl FnMut(
        &mut Hypergraph<V, G>,
        Vec<VertexId>,
        Vec<VertexId>,
    ) -> CircuitResult<(Vec<VertexId>, Vec<VertexId>)>,
) -> CircuitResult<(Vec<VertexId>, Vec<Vec<VertexId>>)>
where
    V: Value,
    G: PrimitiveSymbol,
{
    if data.len() != cur_arity * n {
        return Err(Error::incompatible_parameter(
            ParamKind::Inputs,
            format!(
                "make_ripple_map: expected {} data wires ({cur_arity} x {n}), got {}",
                cur_arity * n,
                data.len()
            ),
        ));
    }
    let chunks: Vec<&[VertexId]> = data.chunks(cur_arity).collect();
    let mut acc = initial_acc;
    let mut outs_per_step = Vec::with_capacity(n);
    for step in step_order(direction, n) {
        let (new_acc, out) = f(graph, acc, chunks[step].to_vec())?;
        acc = new_acc;
        outs_per_step.push((step, out));
    }
    outs_per_step.sort_by_key(|(step, _)| *step);
    Ok((acc, outs_per_step.into_iter().map(|(_, out)| out).collect()))
}

/// How the accumulator for a bitwise ripple construction is obtained.
pub enum InitialMode {
    /// The accumulator is an explicit external input.
    WithInitial(Vec<VertexId>),
    /// The first bit-interleaved group of each data wire becomes the
    /// initial accumulator; requires each data port's width to equal the
    /// corresponding accumulator port's width times `n`.
    WithoutInitial,
}

/// [`make_ripple`] combined with bit-interleaved splitting of the data
/// bundle: `data` is one wire per data port (not chunked), each split into
/// `n` bit-interleaved groups that are then threaded through the ripple.
pub fn make_bitwise_ripple<V, G>(
    graph: &mut Hypergraph<V, G>,
    n: usize,
    direction: Direction,
    initial: InitialMode,
    data: Vec<VertexId>,
    mut f: impl FnMut(&mut Hypergraph<V, G>, Vec<VertexId>, Vec<VertexId>) -> CircuitResult<Vec<VertexId>>,
) -> CircuitResult<Vec<VertexId>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let mut per_port_groups: Vec<Vec<VertexId>> = Vec::with_capacity(data.len());
    for wire in data {
        per_port_groups.push(split_bitwise(graph, wire, n)?);
    }

    let (mut acc, skip_first) = match initial {
        InitialMode::WithInitial(acc) => (acc, false),
        InitialMode::WithoutInitial => {
            let first: Vec<VertexId> = per_port_groups.iter().map(|g| g[0]).collect();
            (first, true)
        }
    };

    let steps = step_order(direction, n);
    let steps = if skip_first { &steps[1..] } else { &steps[..] };
    for &step in steps {
        let cur: Vec<VertexId> = per_port_groups.iter().map(|g| g[step]).collect();
        acc = f(graph, acc, cur)?;
    }
    Ok(acc)
}

/// [`make_ripple_map`] combined with bit-interleaved splitting of the data
/// bundle and recombination of the per-step outputs.
pub fn make_bitwise_ripple_map<V, G>(
    graph: &mut Hypergraph<V, G>,
    n: usize,
    direction: Direction,
    initial: InitialMode,
    data: Vec<VertexId>,
    mut f: impl FnMut(
        &mut Hypergraph<V, G>,
        Vec<VertexId>,
        Vec<VertexId>,
    ) -> CircuitResult<(Vec<VertexId>, Vec<VertexId>)>,
) -> CircuitResult<(Vec<VertexId>, Vec<VertexId>)>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let mut per_port_groups: Vec<Vec<VertexId>> = Vec::with_capacity(data.len());
    for wire in data {
        per_port_groups.push(split_bitwise(graph, wire, n)?);
    }

    let (mut acc, skip_first) = match initial {
        InitialMode::WithInitial(acc) => (acc, false),
        InitialMode::WithoutInitial => {
            let first: Vec<VertexId> = per_port_groups.iter().map(|g| g[0]).collect();
            (first, true)
        }
    };

    let steps = step_order(direction, n);
    let steps: Vec<usize> = if skip_first {
        steps[1..].to_vec()
    } else {
        steps
    };
    let mut outs_by_step: Vec<(usize, Vec<VertexId>)> = Vec::with_capacity(steps.len());
    for step in steps {
        let cur: Vec<VertexId> = per_port_groups.iter().map(|g| g[step]).collect();
        let (new_acc, out) = f(graph, acc, cur)?;
        acc = new_acc;
        outs_by_step.push((step, out));
    }
    outs_by_step.sort_by_key(|(step, _)| *step);

    let out_arity = outs_by_step.first().map(|(_, o)| o.len()).unwrap_or(0);
    let mut combined = Vec::with_capacity(out_arity);
    for idx in 0..out_arity {
        let parts: Vec<VertexId> = outs_by_step.iter().map(|(_, o)| o[idx]).collect();
        combined.push(combine_bitwise(graph, parts)?);
    }
    Ok((acc, combined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypergraph::EdgeLabel;
    use crate::port::Port;
    use crate::value::Decimal;

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
        HalfAdd,
    }

    impl PrimitiveSymbol for G {
        fn name(&self) -> circuit_utils::Id {
            circuit_utils::Id::new("half_add")
        }
        fn input_ports(&self) -> &[Port] {
            static PORTS: std::sync::OnceLock<[Port; 2]> = std::sync::OnceLock::new();
            PORTS.get_or_init(|| [Port::new(1), Port::new(1)])
        }
        fn output_ports(&self) -> &[Port] {
            static PORTS: std::sync::OnceLock<[Port; 1]> = std::sync::OnceLock::new();
            PORTS.get_or_init(|| [Port::new(1)])
        }
    }

    #[test]
    fn ripple_bundle_positions_match_direction() {
        assert_eq!(
            ripple_bundle_positions(Direction::TopToBottom),
            (true, true)
        );
        assert_eq!(
            ripple_bundle_positions(Direction::BottomToUp),
            (false, false)
        );
    }

    #[test]
    fn make_ripple_threads_accumulator_through_n_steps() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let acc0 = g.use_wire(1).unwrap();
        let data: Vec<VertexId> = (0..4).map(|_| g.use_wire(1).unwrap()).collect();
        let final_acc = make_ripple(
            &mut g,
            4,
            1,
            Direction::TopToBottom,
            vec![acc0],
            data,
            |graph, acc, cur| {
                let mut ins = acc;
                ins.extend(cur);
                let (_e, outs) = graph.use_edge(EdgeLabel::Primitive(G::HalfAdd), ins, None)?;
                Ok(outs)
            },
        )
        .unwrap();
        assert_eq!(final_acc.len(), 1);
    }

    #[test]
    fn make_ripple_rejects_wrong_data_length() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let acc0 = g.use_wire(1).unwrap();
        let data: Vec<VertexId> = (0..3).map(|_| g.use_wire(1).unwrap()).collect();
        let result = make_ripple(
            &mut g,
            4,
            1,
            Direction::TopToBottom,
            vec![acc0],
            data,
            |graph, acc, cur| {
                let mut ins = acc;
                ins.extend(cur);
                let (_e, outs) = graph.use_edge(EdgeLabel::Primitive(G::HalfAdd), ins, None)?;
                Ok(outs)
            },
        );
        assert!(result.is_err());
    }
}

//! Bit-level reshaping built from the general `BUNDLER` wiring primitive:
//! forking a wire, and splitting/recombining a wire bit-interleaved across
//! `n` groups.

use crate::arena::VertexId;
use crate::hypergraph::{EdgeLabel, Hypergraph};
use crate::primitive::PrimitiveSymbol;
use crate::value::Value;
use circuit_utils::{CircuitResult, Error, ParamKind};
use smallvec::smallvec;

/// Broadcast `wire` into `copies` identical wires of the same width.
pub fn fork_bundler<V, G>(
    graph: &mut Hypergraph<V, G>,
    wire: VertexId,
    copies: usize,
) -> CircuitResult<Vec<VertexId>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let width = graph.vertex_width(wire);
    let wiring: Vec<usize> = (0..copies).flat_map(|_| 0..width).collect();
    let label = EdgeLabel::bundler(smallvec![width], smallvec![width; copies], wiring)?;
    let (_edge, outs) = graph.use_edge(label, vec![wire], None)?;
    Ok(outs)
}

/// Split a `width`-bit wire into `n` bit-interleaved groups: group `j` reads
/// bits `j, j+n, j+2n, ...`. Requires `width % n == 0`.
pub fn split_bitwise<V, G>(
    graph: &mut Hypergraph<V, G>,
    wire: VertexId,
    n: usize,
) -> CircuitResult<Vec<VertexId>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let width = graph.vertex_width(wire);
    if width % n != 0 {
        return Err(Error::incompatible_parameter(
            ParamKind::Width,
            format!("split_bitwise: width {width} is not divisible by {n}"),
        ));
    }
    let group_width = width / n;
    let mut wiring = Vec::with_capacity(width);
    for j in 0..n {
        for k in 0..group_width {
            wiring.push(k * n + j);
        }
    }
    let label = EdgeLabel::bundler(smallvec![width], smallvec![group_width; n], wiring)?;
    let (_edge, outs) = graph.use_edge(label, vec![wire], None)?;
    Ok(outs)
}

/// The inverse of [`split_bitwise`]: recombine `n` equal-width groups into a
/// single wire whose bits are laid out the way [`split_bitwise`] would have
/// read them back out.
pub fn combine_bitwise<V, G>(
    graph: &mut Hypergraph<V, G>,
    groups: Vec<VertexId>,
) -> CircuitResult<VertexId>
where
    V: Value,
    G: PrimitiveSymbol,
{
    let n = groups.len();
    let group_width = graph.vertex_width(groups[0]);
    for g in &groups {
        if graph.vertex_width(*g) != group_width {
            return Err(Error::incompatible_parameter(
                ParamKind::Width,
                "combine_bitwise: all groups must share a width",
            ));
        }
    }
    let total = n * group_width;
    let mut wiring = Vec::with_capacity(total);
    for p in 0..total {
        let group = p % n;
        let k = p / n;
        wiring.push(group * group_width + k);
    }
    let label = EdgeLabel::bundler(smallvec![group_width; n], smallvec![total], wiring)?;
    let (_edge, outs) = graph.use_edge(label, groups, None)?;
    Ok(outs[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Port;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Bit {
        Z,
    }

    impl Value for Bit {
        fn disconnected() -> Self {
            Bit::Z
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    enum G {}

    impl PrimitiveSymbol for G {
        fn name(&self) -> circuit_utils::Id {
            unreachable!()
        }
        fn input_ports(&self) -> &[Port] {
            &[]
        }
        fn output_ports(&self) -> &[Port] {
            &[]
        }
    }

    #[test]
    fn fork_then_split_then_combine_round_trips_width() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let w = g.use_wire(4).unwrap();
        let groups = split_bitwise(&mut g, w, 2).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(g.vertex_width(groups[0]), 2);
        let combined = combine_bitwise(&mut g, groups).unwrap();
        assert_eq!(g.vertex_width(combined), 4);
    }

    #[test]
    fn fork_bundler_broadcasts_width() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let w = g.use_wire(3).unwrap();
        let copies = fork_bundler(&mut g, w, 3).unwrap();
        assert_eq!(copies.len(), 3);
        assert!(copies.iter().all(|c| g.vertex_width(*c) == 3));
    }

    #[test]
    fn split_bitwise_rejects_indivisible_width() {
        let mut g: Hypergraph<Bit, G> = Hypergraph::new(false);
        let w = g.use_wire(3).unwrap();
        assert!(split_bitwise(&mut g, w, 2).is_err());
    }
}

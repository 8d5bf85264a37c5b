//! `Map` and `BitwiseMap`: replicate an operation `n` times across width.

use super::bitwise::{combine_bitwise, fork_bundler, split_bitwise};
use crate::arena::VertexId;
use crate::hypergraph::Hypergraph;
use crate::primitive::PrimitiveSymbol;
use crate::value::Value;
use circuit_utils::{CircuitResult, Error, ParamKind};

/// Place `n` copies of `f` side by side. `inputs` is `n` contiguous blocks of
/// `arity` wires each, one block per copy; outputs are concatenated in the
/// same per-copy order. `n = 1` returns `f` unchanged.
pub fn make_map<V, G>(
    graph: &mut Hypergraph<V, G>,
    n: usize,
    arity: usize,
    inputs: Vec<VertexId>,
    mut f: impl FnMut(&mut Hypergraph<V, G>, Vec<VertexId>) -> CircuitResult<Vec<VertexId>>,
) -> CircuitResult<Vec<VertexId>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    if inputs.len() != arity * n {
        return Err(Error::incompatible_parameter(
            ParamKind::Inputs,
            format!(
                "make_map: expected {} inputs ({arity} x {n}), got {}",
                arity * n,
                inputs.len()
            ),
        ));
    }
    if n == 1 {
        return f(graph, inputs);
    }
    let mut outputs = Vec::new();
    for chunk in inputs.chunks(arity) {
        outputs.extend(f(graph, chunk.to_vec())?);
    }
    Ok(outputs)
}

/// Bit-interleaved variant of [`make_map`]: `inputs` has one wire per
/// *original* port (not per copy). A port whose index is in `shared` is
/// forked (broadcast) to every copy; every other port's width must be
/// divisible by `n` and is split bit-interleaved, with each copy's outputs
/// recombined the same way.
pub fn make_bitwise_map<V, G>(
    graph: &mut Hypergraph<V, G>,
    n: usize,
    shared: &[usize],
    inputs: Vec<VertexId>,
    mut f: impl FnMut(&mut Hypergraph<V, G>, Vec<VertexId>) -> CircuitResult<Vec<VertexId>>,
) -> CircuitResult<Vec<VertexId>>
where
    V: Value,
    G: PrimitiveSymbol,
{
    // n = 1 subsumes the "width = 1" edge case: a width-1 port can only be
    // bit-split when n = 1, at which point this is a single call to `f`.
    if n == 1 {
        return f(graph, inputs);
    }

    let mut per_port_groups: Vec<Vec<VertexId>> = Vec::with_capacity(inputs.len());
    for (i, wire) in inputs.into_iter().enumerate() {
        if shared.contains(&i) {
            per_port_groups.push(fork_bundler(graph, wire, n)?);
        } else {
            per_port_groups.push(split_bitwise(graph, wire, n)?);
        }
    }

    let mut per_copy_outputs: Vec<Vec<VertexId>> = Vec::with_capacity(n);
    for c in 0..n {
        let copy_inputs: Vec<VertexId> = per_port_groups.iter().map(|group| group[c]).collect();
        per_copy_outputs.push(f(graph, copy_inputs)?);
    }

    let out_arity = per_copy_outputs[0].len();
    let mut result = Vec::with_capacity(out_arity);
    for out_idx in 0..out_arity {
        let parts: Vec<VertexId> = per_copy_outputs
            .iter()
            .map(|outs| outs[out_idx])
            .collect();
        result.push(combine_bitwise(graph, parts)?);
    }
    Ok(result)
}

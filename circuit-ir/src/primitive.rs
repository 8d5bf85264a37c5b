//! Primitive symbols and the signature that gives them meaning.

use crate::lattice::FiniteLattice;
use crate::port::Port;
use crate::signal::Signal;
use crate::value::Value;
use circuit_utils::{CircuitResult, Error, GetName, Id, ParamKind};

/// An atomic operator symbol in a signature. `G` is typically a small enum
/// (e.g. `AND`, `OR`, `XOR`, ...) owned by the signature's user.
pub trait PrimitiveSymbol: Clone + Eq + std::hash::Hash + std::fmt::Debug {
    fn name(&self) -> Id;
    fn input_ports(&self) -> &[Port];
    fn output_ports(&self) -> &[Port];

    fn arity(&self) -> usize {
        self.input_ports().len()
    }

    fn coarity(&self) -> usize {
        self.output_ports().len()
    }
}

impl<G: PrimitiveSymbol> GetName for G {
    fn name(&self) -> Id {
        PrimitiveSymbol::name(self)
    }
}

type Interpretation<V, G> = Box<dyn Fn(&G, &[Signal<V>]) -> Vec<Signal<V>>>;

/// A finite lattice of values plus an interpreted set of primitive symbols.
/// Immutable after construction; shareable (by reference) across any number
/// of hypergraphs.
pub struct Signature<V: Value, G: PrimitiveSymbol> {
    name: Id,
    lattice: FiniteLattice<V>,
    primitives: Vec<G>,
    interpret: Interpretation<V, G>,
}

impl<V: Value, G: PrimitiveSymbol> Signature<V, G> {
    pub fn new(
        name: impl Into<Id>,
        lattice: FiniteLattice<V>,
        primitives: Vec<G>,
        interpret: impl Fn(&G, &[Signal<V>]) -> Vec<Signal<V>> + 'static,
    ) -> Self {
        Signature {
            name: name.into(),
            lattice,
            primitives,
            interpret: Box::new(interpret),
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn lattice(&self) -> &FiniteLattice<V> {
        &self.lattice
    }

    pub fn primitives(&self) -> &[G] {
        &self.primitives
    }

    /// The lattice minimum, used by the evaluator as the disconnected value
    /// and by the bottom-absorption rewrite rule.
    pub fn bottom(&self) -> &V {
        self.lattice.bottom()
    }

    /// Apply `g`'s interpretation to `inputs`, checking arity and per-port
    /// width before and after the call.
    pub fn interpret(&self, g: &G, inputs: &[Signal<V>]) -> CircuitResult<Vec<Signal<V>>> {
        if inputs.len() != g.arity() {
            return Err(Error::incompatible_parameter(
                ParamKind::Inputs,
                format!(
                    "primitive {:?} expects {} input(s), got {}",
                    g.name(),
                    g.arity(),
                    inputs.len()
                ),
            ));
        }
        for (port, signal) in g.input_ports().iter().zip(inputs) {
            if port.width() != signal.width() {
                return Err(Error::incompatible_parameter(
                    ParamKind::Width,
                    format!(
                        "primitive {:?} input port expects width {}, got {}",
                        g.name(),
                        port.width(),
                        signal.width()
                    ),
                ));
            }
        }

        let outputs = (self.interpret)(g, inputs);

        if outputs.len() != g.coarity() {
            return Err(Error::incompatible_parameter(
                ParamKind::Outputs,
                format!(
                    "primitive {:?} interpretation returned {} output(s), expected {}",
                    g.name(),
                    outputs.len(),
                    g.coarity()
                ),
            ));
        }
        for (port, signal) in g.output_ports().iter().zip(&outputs) {
            if port.width() != signal.width() {
                return Err(Error::incompatible_parameter(
                    ParamKind::Width,
                    format!(
                        "primitive {:?} output port expects width {}, got {}",
                        g.name(),
                        port.width(),
                        signal.width()
                    ),
                ));
            }
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
        And,
    }

    impl PrimitiveSymbol for G {
        fn name(&self) -> Id {
            Id::new("and")
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

    fn signature() -> Signature<Bit, G> {
        let lattice = FiniteLattice::new(vec![Bit::Zero, Bit::One], |x, y| x == y || *x == Bit::Zero).unwrap();
        Signature::new("test", lattice, vec![G::And], |g, inputs| match g {
            G::And => {
                let out = if inputs[0].bit(0) == &Bit::One && inputs[1].bit(0) == &Bit::One {
                    Bit::One
                } else {
                    Bit::Zero
                };
                vec![Signal::of(out)]
            }
        })
    }

    #[test]
    fn interpret_checks_arity_and_width() {
        let sig = signature();
        let out = sig
            .interpret(&G::And, &[Signal::of(Bit::One), Signal::of(Bit::One)])
            .unwrap();
        assert_eq!(out[0], Signal::of(Bit::One));

        let err = sig.interpret(&G::And, &[Signal::of(Bit::One)]);
        assert!(err.is_err());
    }
}

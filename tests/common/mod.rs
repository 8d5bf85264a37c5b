//! A four-valued (Belnap) signature, shared by the integration tests. Not a
//! shipped module: this is test fixture only, mirroring how an adjacent
//! garbled-circuits crate keeps its shared eval helpers under `tests/common`.

#![allow(dead_code)]

use circuit_algebra::{Decimal, FiniteLattice, Id, Port, Signal, Signature, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Belnap {
    None,
    False,
    True,
    Both,
}

impl Value for Belnap {
    fn disconnected() -> Self {
        Belnap::None
    }
}

impl Decimal for Belnap {
    fn low() -> Self {
        Belnap::False
    }
    fn high() -> Self {
        Belnap::True
    }
}

fn belnap_leq(x: &Belnap, y: &Belnap) -> bool {
    matches!(
        (x, y),
        (Belnap::None, _) | (_, Belnap::Both) | (Belnap::False, Belnap::False) | (Belnap::True, Belnap::True)
    )
}

/// `(believed_true, believed_false)`: the two independent bits Belnap's four
/// values are built from. `None` believes neither; `Both` believes both.
fn beliefs(v: Belnap) -> (bool, bool) {
    match v {
        Belnap::None => (false, false),
        Belnap::False => (false, true),
        Belnap::True => (true, false),
        Belnap::Both => (true, true),
    }
}

fn from_beliefs(t: bool, f: bool) -> Belnap {
    match (t, f) {
        (false, false) => Belnap::None,
        (false, true) => Belnap::False,
        (true, false) => Belnap::True,
        (true, true) => Belnap::Both,
    }
}

fn belnap_not(v: Belnap) -> Belnap {
    let (t, f) = beliefs(v);
    from_beliefs(f, t)
}

fn belnap_and(a: Belnap, b: Belnap) -> Belnap {
    let (ta, fa) = beliefs(a);
    let (tb, fb) = beliefs(b);
    from_beliefs(ta && tb, fa || fb)
}

fn belnap_or(a: Belnap, b: Belnap) -> Belnap {
    let (ta, fa) = beliefs(a);
    let (tb, fb) = beliefs(b);
    from_beliefs(ta || tb, fa && fb)
}

fn belnap_xor(a: Belnap, b: Belnap) -> Belnap {
    belnap_and(belnap_or(a, b), belnap_not(belnap_and(a, b)))
}

/// The gate set named in the concrete end-to-end scenarios: `BUF`, `NOT`,
/// `AND`, `OR`, `NAND`, `NOR`, `XOR`, `XNOR`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    Buf,
    Not,
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl Gate {
    fn arity(self) -> usize {
        match self {
            Gate::Buf | Gate::Not => 1,
            _ => 2,
        }
    }
}

impl circuit_algebra::PrimitiveSymbol for Gate {
    fn name(&self) -> Id {
        match self {
            Gate::Buf => Id::new("buf"),
            Gate::Not => Id::new("not"),
            Gate::And => Id::new("and"),
            Gate::Or => Id::new("or"),
            Gate::Nand => Id::new("nand"),
            Gate::Nor => Id::new("nor"),
            Gate::Xor => Id::new("xor"),
            Gate::Xnor => Id::new("xnor"),
        }
    }

    fn input_ports(&self) -> &[Port] {
        static ONE: std::sync::OnceLock<[Port; 1]> = std::sync::OnceLock::new();
        static TWO: std::sync::OnceLock<[Port; 2]> = std::sync::OnceLock::new();
        if self.arity() == 1 {
            ONE.get_or_init(|| [Port::new(1)])
        } else {
            TWO.get_or_init(|| [Port::new(1), Port::new(1)])
        }
    }

    fn output_ports(&self) -> &[Port] {
        static PORTS: std::sync::OnceLock<[Port; 1]> = std::sync::OnceLock::new();
        PORTS.get_or_init(|| [Port::new(1)])
    }
}

pub fn belnap_signature() -> Signature<Belnap, Gate> {
    let lattice = FiniteLattice::new(
        vec![Belnap::None, Belnap::False, Belnap::True, Belnap::Both],
        belnap_leq,
    )
    .expect("belnap truth values form a lattice");

    Signature::new(
        "belnap",
        lattice,
        vec![
            Gate::Buf,
            Gate::Not,
            Gate::And,
            Gate::Or,
            Gate::Nand,
            Gate::Nor,
            Gate::Xor,
            Gate::Xnor,
        ],
        |g, inputs| {
            let a = *inputs[0].bit(0);
            let out = match g {
                Gate::Buf => a,
                Gate::Not => belnap_not(a),
                Gate::And => belnap_and(a, *inputs[1].bit(0)),
                Gate::Or => belnap_or(a, *inputs[1].bit(0)),
                Gate::Nand => belnap_not(belnap_and(a, *inputs[1].bit(0))),
                Gate::Nor => belnap_not(belnap_or(a, *inputs[1].bit(0))),
                Gate::Xor => belnap_xor(a, *inputs[1].bit(0)),
                Gate::Xnor => belnap_not(belnap_xor(a, *inputs[1].bit(0))),
            };
            vec![Signal::of(out)]
        },
    )
}

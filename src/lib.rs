//! The circuit algebra: interfaced hypergraphs as a model of digital
//! circuits, with a finite-lattice signal domain, structural constructions
//! (map, bitwise map, ripple, ripple-map), a rewrite-rule engine, and a
//! cycle-driven symbolic evaluator.
//!
//! This crate is a thin facade over its three members:
//! - [`circuit_utils`] — shared identifiers and the construction-time error
//!   type.
//! - [`circuit_ir`] — the signature/lattice layer, signal/waveform algebra,
//!   the hypergraph IR itself, the builder API, and structural
//!   constructions.
//! - [`circuit_sim`] — the rewrite engine and the [`circuit_sim::Evaluator`].

pub use circuit_ir::{
    make_subcircuit, register_guarded_feedback, use_subcircuit, Arena, Blackbox, CompositeSpec,
    CycleInput, Decimal, Direction, Edge, EdgeId, EdgeLabel, FiniteLattice, Hypergraph, IndexRef,
    InterfacedHypergraph, Port, PrimitiveSymbol, Signal, Signature, VarAssignment, VarId, Value,
    VariableSignal, VertexId, WalkNode, WalkNodeId, Waveform,
};
pub use circuit_sim::{
    default_rules, BoxedEvalError, CycleRecord, EvalError, EvalResult, Evaluator, FunctionKind,
    OutputTerm, RewriteContext, RewriteRule, TraversalElement,
};
pub use circuit_utils::{CircuitResult, Error as CircuitError, GetName, Id, ParamKind};

pub mod construct {
    //! Structural constructions over hypergraphs: map, bitwise map, ripple,
    //! ripple-map, and the fork/split/combine primitives they're built from.
    pub use circuit_ir::construct::*;
}

//! Interfaced-hypergraph circuit IR: the signature layer, signal/waveform
//! algebra, hypergraph data model, builder API, and structural
//! constructions. Evaluation lives in the `circuit-sim` crate.

pub mod arena;
pub mod builder;
pub mod construct;
pub mod hypergraph;
pub mod lattice;
pub mod port;
pub mod primitive;
pub mod signal;
pub mod value;
pub mod variable;

pub use arena::{Arena, EdgeId, IndexRef, VertexId};
pub use builder::{make_subcircuit, register_guarded_feedback, use_subcircuit};
pub use construct::Direction;
pub use hypergraph::{
    Blackbox, CompositeSpec, Edge, EdgeLabel, Hypergraph, InterfacedHypergraph, WalkNode,
    WalkNodeId,
};
pub use lattice::FiniteLattice;
pub use port::Port;
pub use primitive::{PrimitiveSymbol, Signature};
pub use signal::{Signal, Waveform};
pub use value::{Decimal, Value};
pub use variable::{CycleInput, VarAssignment, VarId, VariableSignal};

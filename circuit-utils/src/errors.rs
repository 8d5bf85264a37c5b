//! Build-time errors produced while constructing signatures and hypergraphs.

/// Convenience wrapper for a result that may fail with a construction [`Error`].
pub type CircuitResult<T> = std::result::Result<T, Error>;

/// The kind of parameter that failed a well-formedness check during
/// construction. Matches the taxonomy in the `IncompatibleParameter` family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Width,
    Inputs,
    Outputs,
    Wires,
    InEdges,
    OutEdges,
    Owner,
    Values,
    Signals,
    InstantFeedback,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParamKind::Width => "width",
            ParamKind::Inputs => "inputs",
            ParamKind::Outputs => "outputs",
            ParamKind::Wires => "wires",
            ParamKind::InEdges => "in-edges",
            ParamKind::OutEdges => "out-edges",
            ParamKind::Owner => "owner",
            ParamKind::Values => "values",
            ParamKind::Signals => "signals",
            ParamKind::InstantFeedback => "instant-feedback",
        };
        write!(f, "{s}")
    }
}

/// Construction-time errors for the circuit algebra.
#[derive(Clone)]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl Error {
    pub fn incompatible_parameter<S: ToString>(kind: ParamKind, msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::IncompatibleParameter(kind, msg.to_string())),
        }
    }

    pub fn not_a_lattice<S: ToString>(msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::NotALattice(msg.to_string())),
        }
    }

    pub fn unguarded_feedback<S: ToString>(msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::UnguardedFeedback(msg.to_string())),
        }
    }

    pub fn missing_in_edge<S: ToString>(msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::MissingInEdge(msg.to_string())),
        }
    }

    pub fn todo_not_implemented<S: ToString>(msg: S) -> Self {
        Self {
            kind: Box::new(ErrorKind::TodoNotImplemented(msg.to_string())),
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn param_kind(&self) -> Option<ParamKind> {
        match &*self.kind {
            ErrorKind::IncompatibleParameter(kind, _) => Some(*kind),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for Error {}

#[derive(Clone)]
enum ErrorKind {
    /// A width/arity/ownership mismatch detected while building structure.
    IncompatibleParameter(ParamKind, String),
    /// The supplied partial order does not admit unique join/meet or a top/bottom.
    NotALattice(String),
    /// A feedback edge has no delay on every source-to-target path.
    UnguardedFeedback(String),
    /// A non-interface vertex has no producing edge.
    MissingInEdge(String),
    /// An explicitly unimplemented feature gap.
    TodoNotImplemented(String),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ErrorKind::*;
        match self {
            IncompatibleParameter(kind, msg) => {
                write!(f, "[IncompatibleParameter:{kind}] {msg}")
            }
            NotALattice(msg) => write!(f, "[NotALattice] {msg}"),
            UnguardedFeedback(msg) => write!(f, "[UnguardedFeedback] {msg}"),
            MissingInEdge(msg) => write!(f, "[MissingInEdge] {msg}"),
            TodoNotImplemented(msg) => write!(f, "[TodoNotImplemented] {msg}"),
        }
    }
}

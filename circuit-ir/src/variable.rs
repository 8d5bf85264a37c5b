//! Symbolic signals used for partial/variable evaluation.

use crate::signal::Signal;
use crate::value::Value;
use ahash::AHashMap;
use std::rc::Rc;

/// Identifies a free variable introduced by a `PARTIAL` cycle input.
pub type VarId = u32;

/// A concrete assignment of values to a set of free variables.
#[derive(Clone, Debug, Default)]
pub struct VarAssignment<V: Value>(AHashMap<VarId, V>);

impl<V: Value> VarAssignment<V> {
    pub fn empty() -> Self {
        VarAssignment(AHashMap::default())
    }

    pub fn get(&self, id: VarId) -> Option<&V> {
        self.0.get(&id)
    }

    pub fn with(&self, id: VarId, value: V) -> Self {
        let mut next = self.0.clone();
        next.insert(id, value);
        VarAssignment(next)
    }
}

/// A signal whose bits are a function of an assignment to a finite set of
/// free variables. Evaluating at a concrete [`VarAssignment`] always
/// produces a definite [`Signal`].
///
/// The closure retains an owned reference to whatever state it closes over
/// (e.g. the interpretation function of the primitive that produced it) so
/// that a `VariableSignal` can outlive the rewrite step that created it.
#[derive(Clone)]
pub struct VariableSignal<V: Value> {
    width: usize,
    vars: Vec<VarId>,
    eval: Rc<dyn Fn(&VarAssignment<V>) -> Signal<V>>,
}

impl<V: Value> VariableSignal<V> {
    pub fn new(
        width: usize,
        mut vars: Vec<VarId>,
        eval: impl Fn(&VarAssignment<V>) -> Signal<V> + 'static,
    ) -> Self {
        vars.sort_unstable();
        vars.dedup();
        VariableSignal {
            width,
            vars,
            eval: Rc::new(eval),
        }
    }

    /// A `VariableSignal` that depends on nothing and always evaluates to
    /// `signal`. Used to lift a concrete constant into symbolic position.
    pub fn constant(signal: Signal<V>) -> Self {
        let width = signal.width();
        VariableSignal::new(width, vec![], move |_| signal.clone())
    }

    /// A fresh width-1 variable signal: evaluating it returns whatever value
    /// the assignment binds to `var`.
    pub fn free_value(var: VarId) -> Self {
        VariableSignal::new(1, vec![var], move |a| {
            Signal::of(
                a.get(var)
                    .cloned()
                    .unwrap_or_else(V::disconnected),
            )
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn dependent_vars(&self) -> &[VarId] {
        &self.vars
    }

    pub fn evaluate(&self, assignment: &VarAssignment<V>) -> Signal<V> {
        let signal = (self.eval)(assignment);
        debug_assert_eq!(signal.width(), self.width);
        signal
    }

    /// Every signal reachable by assigning each dependent variable a value
    /// drawn from `domain`. Used by the primitive-apply rewrite rule to
    /// decide whether a `PARTIAL` result has collapsed to a single
    /// `DEFINITE` signal.
    pub fn possible_signals(&self, domain: &[V]) -> Vec<Signal<V>> {
        if self.vars.is_empty() {
            return vec![self.evaluate(&VarAssignment::empty())];
        }
        let mut results = Vec::new();
        let mut assignment = VarAssignment::empty();
        enumerate_assignments(&self.vars, domain, &mut assignment, &mut |a| {
            results.push(self.evaluate(a));
        });
        results
    }
}

fn enumerate_assignments<V: Value>(
    remaining: &[VarId],
    domain: &[V],
    current: &mut VarAssignment<V>,
    visit: &mut impl FnMut(&VarAssignment<V>),
) {
    match remaining.split_first() {
        None => visit(current),
        Some((var, rest)) => {
            for value in domain {
                let mut next = current.with(*var, value.clone());
                enumerate_assignments(rest, domain, &mut next, visit);
            }
        }
    }
}

/// A per-tick value at a hypergraph's input interface: either a concrete
/// signal, or a symbolic one still depending on free variables.
#[derive(Clone)]
pub enum CycleInput<V: Value> {
    Definite(Signal<V>),
    Partial(VariableSignal<V>),
}

impl<V: Value> CycleInput<V> {
    pub fn width(&self) -> usize {
        match self {
            CycleInput::Definite(s) => s.width(),
            CycleInput::Partial(vs) => vs.width(),
        }
    }
}

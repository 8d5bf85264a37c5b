//! Finite lattices over a signature's value set.

use crate::value::Value;
use ahash::{AHashMap, AHashSet};
use circuit_utils::{CircuitResult, Error};

/// A finite partial order with a derived join (least upper bound) and meet
/// (greatest lower bound) table, a unique minimum (`bottom`) and a unique
/// maximum (`top`).
///
/// Construction is the only place order-theoretic validation happens: once
/// built, `join`/`meet`/`leq` are total, infallible operations backed by
/// cached tables.
#[derive(Clone)]
pub struct FiniteLattice<V: Value> {
    elements: Vec<V>,
    leq: AHashSet<(V, V)>,
    join: AHashMap<(V, V), V>,
    meet: AHashMap<(V, V), V>,
    bottom: V,
    top: V,
}

impl<V: Value> FiniteLattice<V> {
    /// Build a lattice from an explicit value set and a partial order
    /// predicate `leq(x, y)` meaning `x <= y`.
    ///
    /// Fails with [`Error::not_a_lattice`] unless:
    /// - `leq` is reflexive and transitive over `elements` (antisymmetry is
    ///   assumed of a sane order but not separately checked, since it cannot
    ///   affect join/meet uniqueness below),
    /// - every pair has a unique least upper bound and greatest lower bound,
    /// - there is a unique global minimum and a unique global maximum.
    pub fn new<F>(elements: Vec<V>, leq: F) -> CircuitResult<Self>
    where
        F: Fn(&V, &V) -> bool,
    {
        let mut dedup: Vec<V> = Vec::with_capacity(elements.len());
        for v in elements {
            if !dedup.contains(&v) {
                dedup.push(v);
            }
        }
        let elements = dedup;

        if elements.is_empty() {
            return Err(Error::not_a_lattice("lattice must have at least one value"));
        }

        let mut leq_set = AHashSet::default();
        for x in &elements {
            for y in &elements {
                if leq(x, y) {
                    leq_set.insert((x.clone(), y.clone()));
                }
            }
        }
        for x in &elements {
            if !leq_set.contains(&(x.clone(), x.clone())) {
                return Err(Error::not_a_lattice(format!(
                    "supplied order is not reflexive at {x:?}"
                )));
            }
        }

        let is_leq = |a: &V, b: &V| leq_set.contains(&(a.clone(), b.clone()));

        let mut join = AHashMap::default();
        let mut meet = AHashMap::default();
        for x in &elements {
            for y in &elements {
                let upper: Vec<&V> = elements
                    .iter()
                    .filter(|z| is_leq(x, z) && is_leq(y, z))
                    .collect();
                let lub = least_element(&upper, &is_leq).ok_or_else(|| {
                    Error::not_a_lattice(format!(
                        "no unique least upper bound for {x:?} and {y:?}"
                    ))
                })?;
                join.insert((x.clone(), y.clone()), lub.clone());

                let lower: Vec<&V> = elements
                    .iter()
                    .filter(|z| is_leq(z, x) && is_leq(z, y))
                    .collect();
                let glb = greatest_element(&lower, &is_leq).ok_or_else(|| {
                    Error::not_a_lattice(format!(
                        "no unique greatest lower bound for {x:?} and {y:?}"
                    ))
                })?;
                meet.insert((x.clone(), y.clone()), glb.clone());
            }
        }

        let bottom = least_element(&elements.iter().collect::<Vec<_>>(), &is_leq)
            .ok_or_else(|| Error::not_a_lattice("no unique minimum element"))?
            .clone();
        let top = greatest_element(&elements.iter().collect::<Vec<_>>(), &is_leq)
            .ok_or_else(|| Error::not_a_lattice("no unique maximum element"))?
            .clone();

        log::debug!(
            "built lattice with {} elements, bottom={bottom:?}, top={top:?}",
            elements.len()
        );

        Ok(Self {
            elements,
            leq: leq_set,
            join,
            meet,
            bottom,
            top,
        })
    }

    /// Least upper bound of `x` and `y`.
    pub fn join(&self, x: &V, y: &V) -> V {
        self.join
            .get(&(x.clone(), y.clone()))
            .cloned()
            .expect("join is total over the lattice's elements")
    }

    /// Greatest lower bound of `x` and `y`.
    pub fn meet(&self, x: &V, y: &V) -> V {
        self.meet
            .get(&(x.clone(), y.clone()))
            .cloned()
            .expect("meet is total over the lattice's elements")
    }

    /// `x <= y` under the lattice's order.
    pub fn leq(&self, x: &V, y: &V) -> bool {
        self.leq.contains(&(x.clone(), y.clone()))
    }

    /// The unique minimum element ("disconnected"/bottom).
    pub fn bottom(&self) -> &V {
        &self.bottom
    }

    /// The unique maximum element.
    pub fn top(&self) -> &V {
        &self.top
    }

    /// All values in the lattice, in construction order.
    pub fn elements(&self) -> &[V] {
        &self.elements
    }
}

fn least_element<'a, V: Value>(
    candidates: &[&'a V],
    is_leq: &impl Fn(&V, &V) -> bool,
) -> Option<&'a V> {
    candidates
        .iter()
        .copied()
        .find(|&c| candidates.iter().all(|&o| is_leq(c, o)))
}

fn greatest_element<'a, V: Value>(
    candidates: &[&'a V],
    is_leq: &impl Fn(&V, &V) -> bool,
) -> Option<&'a V> {
    candidates
        .iter()
        .copied()
        .find(|&c| candidates.iter().all(|&o| is_leq(o, c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Belnap {
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

    fn belnap_leq(x: &Belnap, y: &Belnap) -> bool {
        use Belnap::*;
        x == y
            || matches!((x, y), (None, _) | (_, Both) | (False, False) | (True, True))
    }

    fn belnap_lattice() -> FiniteLattice<Belnap> {
        FiniteLattice::new(
            vec![Belnap::None, Belnap::False, Belnap::True, Belnap::Both],
            belnap_leq,
        )
        .unwrap()
    }

    #[test]
    fn join_is_commutative_and_idempotent() {
        let l = belnap_lattice();
        for x in l.elements() {
            for y in l.elements() {
                assert_eq!(l.join(x, y), l.join(y, x));
            }
            assert_eq!(l.join(x, x), *x);
        }
    }

    #[test]
    fn absorption_holds() {
        let l = belnap_lattice();
        for x in l.elements() {
            for y in l.elements() {
                assert_eq!(l.meet(&l.join(x, y), x), *x);
            }
        }
    }

    #[test]
    fn bottom_and_top_are_unique() {
        let l = belnap_lattice();
        assert_eq!(*l.bottom(), Belnap::None);
        assert_eq!(*l.top(), Belnap::Both);
    }

    #[test]
    fn non_lattice_order_is_rejected() {
        // Two incomparable maxima -> no unique top.
        let values = vec![Belnap::False, Belnap::True];
        let err = FiniteLattice::new(values, |x, y| x == y);
        assert!(err.is_err());
    }
}

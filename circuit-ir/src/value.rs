//! The per-bit value capability required of a signature's value type `V`.

use std::fmt::Debug;
use std::hash::Hash;

/// Capability bound for a signature's value type.
///
/// A value must be equatable, hashable, printable, carry a partial order
/// (exposed through [`Lattice`](crate::lattice::FiniteLattice) rather than
/// here, since the order is a property of the whole value set, not a single
/// value), and name a disconnected/bottom-like sentinel used before any
/// driver has run. The optional numeric waveform level is consumed only by
/// external visualisation tooling; the core only needs it to exist.
pub trait Value: Clone + Eq + Hash + Debug {
    /// The value used for wires that carry no meaningful signal yet.
    fn disconnected() -> Self;

    /// A numeric level used by external waveform/DOT renderers to place this
    /// value on an axis. Returning `None` means "not orderable for display".
    fn waveform_level(&self) -> Option<i64> {
        None
    }
}

/// Optional capability: conversion between a [`Value`] set and machine
/// integers, used by the evaluator's decimal I/O convenience methods and by
/// `Signal`'s unsigned/signed codec.
pub trait Decimal: Value {
    /// The value representing a logical `0` bit.
    fn low() -> Self;
    /// The value representing a logical `1` bit.
    fn high() -> Self;

    /// `true` iff this value is exactly `low()` or `high()` (i.e.
    /// unambiguous for decimal decoding).
    fn is_binary(&self) -> bool {
        *self == Self::low() || *self == Self::high()
    }

    /// `true` iff this value is `high()`. Only meaningful when
    /// [`Decimal::is_binary`] holds.
    fn is_high(&self) -> bool {
        *self == Self::high()
    }
}

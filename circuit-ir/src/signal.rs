//! Finite bit-vectors ([`Signal`]) and periodic streams of them ([`Waveform`]).

use crate::value::{Decimal, Value};
use smallvec::SmallVec;

/// A finite, ordered sequence of values with `width >= 1`. Bit 0 is the
/// least-significant bit. A width-1 signal is called a *value* throughout
/// the rest of the crate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signal<V: Value> {
    bits: SmallVec<[V; 8]>,
}

impl<V: Value> Signal<V> {
    /// A width-1 signal carrying `v`.
    pub fn of(v: V) -> Self {
        Signal {
            bits: SmallVec::from_elem(v, 1),
        }
    }

    /// A signal of `width` copies of `v`.
    pub fn fill(v: V, width: usize) -> Self {
        assert!(width >= 1, "signal width must be >= 1");
        Signal {
            bits: SmallVec::from_elem(v, width),
        }
    }

    /// A signal entirely disconnected.
    pub fn disconnected(width: usize) -> Self {
        Self::fill(V::disconnected(), width)
    }

    /// Build a signal from explicit bits, LSB first.
    pub fn bits<I: IntoIterator<Item = V>>(bits: I) -> Self {
        let bits: SmallVec<[V; 8]> = bits.into_iter().collect();
        assert!(!bits.is_empty(), "signal width must be >= 1");
        Signal { bits }
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn bit(&self, i: usize) -> &V {
        &self.bits[i]
    }

    pub fn as_slice(&self) -> &[V] {
        &self.bits
    }

    /// `[start, end)`, half-open, bit 0 is LSB.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        assert!(start < end && end <= self.width());
        Signal::bits(self.bits[start..end].iter().cloned())
    }

    /// `(lsb, rest)` — peel off bit 0, returning the remaining `width - 1`
    /// bits as a signal. Panics on a width-1 signal (there are no "msbs").
    pub fn lsb_and_msbs(&self) -> (&V, Self) {
        assert!(self.width() > 1, "a value has no msbs");
        (&self.bits[0], Signal::bits(self.bits[1..].iter().cloned()))
    }

    pub fn msb(&self) -> &V {
        &self.bits[self.width() - 1]
    }

    /// Concatenate `self` (low bits) with `other` (high bits).
    pub fn concat(&self, other: &Self) -> Self {
        let mut bits = self.bits.clone();
        bits.extend(other.bits.iter().cloned());
        Signal { bits }
    }
}

impl<V: Value + Decimal> Signal<V> {
    /// Encode `x` as an unsigned `width`-bit signal. `x` is reduced mod
    /// `2^width` the way an ordinary bit-vector truncates.
    pub fn unsigned_from_int(x: u64, width: usize) -> Self {
        let bits = (0..width).map(|i| {
            if (x >> i) & 1 == 1 {
                V::high()
            } else {
                V::low()
            }
        });
        Signal::bits(bits)
    }

    /// Encode `x` as a two's-complement `width`-bit signal.
    pub fn signed_from_int(x: i64, width: usize) -> Self {
        Self::unsigned_from_int(x as u64, width)
    }

    /// Decode as unsigned. Returns `None` if any bit is not unambiguously
    /// `low()`/`high()` (e.g. disconnected or over-driven).
    pub fn unsigned_to_int(&self) -> Option<u64> {
        let mut acc: u64 = 0;
        for (i, b) in self.bits.iter().enumerate() {
            if !b.is_binary() {
                return None;
            }
            if b.is_high() {
                acc |= 1 << i;
            }
        }
        Some(acc)
    }

    /// Decode as two's-complement signed. Returns `None` under the same
    /// conditions as [`Signal::unsigned_to_int`].
    pub fn signed_to_int(&self) -> Option<i64> {
        let unsigned = self.unsigned_to_int()?;
        let width = self.width();
        if width == 64 {
            return Some(unsigned as i64);
        }
        let sign_bit = 1u64 << (width - 1);
        if unsigned & sign_bit != 0 {
            Some((unsigned as i64) - (1i64 << width))
        } else {
            Some(unsigned as i64)
        }
    }
}

/// A finite, non-empty sequence of equal-width [`Signal`]s, interpreted as
/// infinite by repetition: `period = signals.len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Waveform<V: Value> {
    signals: Vec<Signal<V>>,
}

impl<V: Value> Waveform<V> {
    pub fn new(signals: Vec<Signal<V>>) -> Self {
        assert!(!signals.is_empty(), "a waveform must have at least one tick");
        let width = signals[0].width();
        assert!(
            signals.iter().all(|s| s.width() == width),
            "all ticks of a waveform must share a width"
        );
        Waveform { signals }
    }

    pub fn width(&self) -> usize {
        self.signals[0].width()
    }

    pub fn period(&self) -> usize {
        self.signals.len()
    }

    pub fn signal_at_tick(&self, t: usize) -> &Signal<V> {
        &self.signals[t % self.period()]
    }

    pub fn signals(&self) -> &[Signal<V>] {
        &self.signals
    }

    /// Join `n` waveforms tick-by-tick, repeating each to the lcm of all
    /// periods, via `combine` applied to the per-tick tuple of signals.
    pub fn join_waveforms<F>(waveforms: &[Waveform<V>], combine: F) -> Waveform<V>
    where
        F: Fn(&[&Signal<V>]) -> Signal<V>,
    {
        assert!(!waveforms.is_empty());
        let period = waveforms
            .iter()
            .map(|w| w.period())
            .fold(1usize, lcm);
        let signals = (0..period)
            .map(|t| {
                let ticks: Vec<&Signal<V>> =
                    waveforms.iter().map(|w| w.signal_at_tick(t)).collect();
                combine(&ticks)
            })
            .collect();
        Waveform::new(signals)
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: usize, b: usize) -> usize {
    if a == 0 || b == 0 {
        0
    } else {
        a / gcd(a, b) * b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Bit {
        Z,
        Zero,
        One,
    }

    impl Value for Bit {
        fn disconnected() -> Self {
            Bit::Z
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

    #[test]
    fn decimal_round_trips_unsigned() {
        for x in 0..16u64 {
            let s = Signal::<Bit>::unsigned_from_int(x, 4);
            assert_eq!(s.unsigned_to_int(), Some(x));
        }
    }

    #[test]
    fn decimal_round_trips_signed() {
        for x in -8..8i64 {
            let s = Signal::<Bit>::signed_from_int(x, 4);
            assert_eq!(s.signed_to_int(), Some(x));
        }
    }

    #[test]
    fn disconnected_bits_fail_decimal_decode() {
        let s = Signal::<Bit>::disconnected(4);
        assert_eq!(s.unsigned_to_int(), None);
    }

    #[test]
    fn waveform_signal_at_tick_wraps() {
        let w = Waveform::new(vec![
            Signal::of(Bit::Zero),
            Signal::of(Bit::One),
        ]);
        assert_eq!(*w.signal_at_tick(0), Signal::of(Bit::Zero));
        assert_eq!(*w.signal_at_tick(1), Signal::of(Bit::One));
        assert_eq!(*w.signal_at_tick(2), Signal::of(Bit::Zero));
        assert_eq!(*w.signal_at_tick(5), Signal::of(Bit::One));
    }

    #[test]
    fn join_waveforms_uses_lcm_period() {
        let a = Waveform::new(vec![Signal::of(Bit::Zero), Signal::of(Bit::One)]);
        let b = Waveform::new(vec![
            Signal::of(Bit::One),
            Signal::of(Bit::One),
            Signal::of(Bit::Zero),
        ]);
        let joined = Waveform::join_waveforms(&[a, b], |ticks| ticks[0].clone());
        assert_eq!(joined.period(), 6);
    }
}

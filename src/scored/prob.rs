// src/scored/prob.rs
//
// Probabilities and weighted alternatives.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Mul;

/// A probability in `(0, 1]`.
///
/// No normalization is ever performed: only the relative order of two
/// probabilities matters. `Prob::ZERO` exists only as the upper bound of an
/// exhausted stream and is never attached to an alternative.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Prob(f64);

impl Prob {
    pub const CERTAIN: Prob = Prob(1.0);
    pub const ZERO: Prob = Prob(0.0);

    pub fn new(p: f64) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&p),
            "probability out of range: {p}"
        );
        Prob(p)
    }

    /// For compile-time heuristics; the caller guarantees the range.
    pub const fn constant(p: f64) -> Self {
        Prob(p)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Total order used when ranking; probabilities are never NaN.
    pub fn total_cmp(&self, other: &Prob) -> Ordering {
        self.0.total_cmp(&other.0)
    }

    pub fn max(self, other: Prob) -> Prob {
        if self >= other { self } else { other }
    }

    /// `1 - p`, the probability of the complementary event.
    pub fn complement(self) -> Prob {
        Prob(1.0 - self.0)
    }
}

impl Mul for Prob {
    type Output = Prob;

    fn mul(self, rhs: Prob) -> Prob {
        Prob(self.0 * rhs.0)
    }
}

impl fmt::Debug for Prob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

impl fmt::Display for Prob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// One candidate interpretation and its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Alt<A> {
    pub p: Prob,
    pub x: A,
}

impl<A> Alt<A> {
    pub fn new(p: Prob, x: A) -> Self {
        Self { p, x }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplication_combines_independent_events() {
        let p = Prob::new(0.5) * Prob::new(0.25);
        assert_eq!(p, Prob::new(0.125));
        assert_eq!(Prob::CERTAIN * p, p);
    }

    #[test]
    fn complement_and_max() {
        assert_eq!(Prob::new(0.75).complement(), Prob::new(0.25));
        assert_eq!(Prob::new(0.2).max(Prob::new(0.3)), Prob::new(0.3));
        assert_eq!(Prob::ZERO.max(Prob::CERTAIN), Prob::CERTAIN);
    }
}

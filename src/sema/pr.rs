// src/sema/pr.rs
//! Named probability heuristics used while resolving.
//!
//! Only the relative order of these matters. Each one discounts an
//! interpretation that needs the user to have made a specific mistake.

use crate::fuzzy::NoiseModel;
use crate::scored::Prob;

/// An exact, unambiguous choice.
pub const CERTAIN: Prob = Prob::CERTAIN;

/// Weight of an exact name hit against the chance that the name is a typo.
pub const EXACT: Prob = Prob::constant(0.9);

/// What an exact hit on `typed` is worth once the noise model has had its
/// say. An unambiguous fragment made only of exact hits scores this per name
/// and nothing less.
pub fn exact_hit(noise: &NoiseModel, typed: &str) -> Prob {
    EXACT * noise.distance_probability(typed, 0)
}

/// A call written without its parentheses (`f x`, `s.length`).
pub const MISSING_PARENS: Prob = Prob::constant(0.2);

/// A bare member name that needs a receiver the user did not write.
pub const IMPLICIT_RECEIVER: Prob = Prob::constant(0.3);

/// A static member reached through an instance expression.
pub const STATIC_VIA_INSTANCE: Prob = Prob::constant(0.5);

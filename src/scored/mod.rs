// src/scored/mod.rs
//! Probability-ordered, lazily evaluated alternatives.
//!
//! A [`Scored`] value is a stream of `(probability, value)` pairs in
//! non-increasing probability order. Everything past the head lives behind a
//! [`LazyScored`] suspension whose upper bound is known eagerly, which lets
//! unions, binds and products interleave streams correctly while forcing only
//! what the consumer reads.

mod build;
mod error;
mod lazy;
mod prob;
#[allow(clippy::module_inception)]
mod scored;

#[cfg(test)]
mod prop_tests;

pub use build::{fail, known, multiple, multiples, product_all, single, uniform};
pub use error::Error;
pub use lazy::LazyScored;
pub use prob::{Alt, Prob};
pub use scored::{Alts, Scored};

// src/fuzzy/mod.rs
//! Fuzzy name lookup: a trie with pruned edit-distance search and the noise
//! model that decides how far to search and how to weigh each distance.

pub mod noise;
pub mod trie;

pub use noise::{NoiseModel, poisson_pdf, poisson_quantile};
pub use trie::Trie;

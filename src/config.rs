// src/config.rs
//! Process-wide settings fixed at build time.

/// Whether failed searches keep a diagnostic (`Scored::Bad`) or collapse to
/// `Scored::Empty`. Selected by the `track-errors` cargo feature so that the
/// disabled path never builds error values.
pub const TRACK_ERRORS: bool = cfg!(feature = "track-errors");

/// Default per-character typing error rate for the noise model.
pub const DEFAULT_ERROR_RATE: f64 = 0.05;

/// Alternatives below this probability are never generated by fuzzy lookup.
pub const DEFAULT_MINIMUM_PROBABILITY: f64 = 1e-3;

/// Default number of ranked interpretations reported by the CLI.
pub const DEFAULT_LIMIT: usize = 5;

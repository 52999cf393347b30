// src/fuzzy/noise.rs
//
// Typing-noise model: how likely a typed string is to be a given number of
// edits away from what the user meant.

use crate::config::{DEFAULT_ERROR_RATE, DEFAULT_MINIMUM_PROBABILITY};
use crate::scored::Prob;

/// Per-character error rate plus the probability floor below which
/// alternatives are not worth generating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseModel {
    pub error_rate: f64,
    pub minimum_probability: Prob,
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self {
            error_rate: DEFAULT_ERROR_RATE,
            minimum_probability: Prob::new(DEFAULT_MINIMUM_PROBABILITY),
        }
    }
}

impl NoiseModel {
    pub fn new(error_rate: f64, minimum_probability: Prob) -> Self {
        Self {
            error_rate,
            minimum_probability,
        }
    }

    /// Expected number of errors in `typed`.
    pub fn expected_errors(&self, typed: &str) -> f64 {
        typed.chars().count() as f64 * self.error_rate
    }

    /// Probability that `typed` contains exactly `distance` errors.
    pub fn distance_probability(&self, typed: &str, distance: usize) -> Prob {
        Prob::new(poisson_pdf(self.expected_errors(typed), distance))
    }

    /// Largest edit distance still worth searching for `typed`.
    pub fn max_distance(&self, typed: &str) -> usize {
        poisson_quantile(
            self.expected_errors(typed),
            self.minimum_probability.value(),
        )
    }
}

/// Probability of exactly `d` events under a Poisson distribution with mean `e`.
pub fn poisson_pdf(e: f64, d: usize) -> f64 {
    if e <= 0.0 {
        return if d == 0 { 1.0 } else { 0.0 };
    }
    let log_factorial: f64 = (2..=d).map(|i| (i as f64).ln()).sum();
    (d as f64 * e.ln() - e - log_factorial).exp()
}

/// Largest `d` with `poisson_pdf(e, d) > min_prob`, or 0 if there is none.
pub fn poisson_quantile(e: f64, min_prob: f64) -> usize {
    // The pdf rises up to the mode and falls after it.
    let mode = e.max(0.0).floor() as usize;
    if poisson_pdf(e, mode) <= min_prob {
        return 0;
    }
    let mut d = mode;
    while poisson_pdf(e, d + 1) > min_prob {
        d += 1;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_matches_closed_form() {
        assert!((poisson_pdf(0.5, 0) - (-0.5f64).exp()).abs() < 1e-12);
        assert!((poisson_pdf(0.5, 1) - 0.5 * (-0.5f64).exp()).abs() < 1e-12);
        assert!((poisson_pdf(2.0, 3) - 8.0 / 6.0 * (-2.0f64).exp()).abs() < 1e-12);
        assert_eq!(poisson_pdf(0.0, 0), 1.0);
        assert_eq!(poisson_pdf(0.0, 2), 0.0);
    }

    #[test]
    fn quantile_is_largest_distance_above_threshold() {
        let e = 0.05;
        let k = poisson_quantile(e, 1e-3);
        assert_eq!(k, 2);
        assert!(poisson_pdf(e, k) > 1e-3);
        assert!(poisson_pdf(e, k + 1) <= 1e-3);
    }

    #[test]
    fn quantile_grows_with_length() {
        let model = NoiseModel::default();
        assert!(model.max_distance("averyveryverylongidentifier") > model.max_distance("x"));
    }

    #[test]
    fn empty_string_has_no_errors() {
        let model = NoiseModel::default();
        assert_eq!(model.max_distance(""), 0);
        assert_eq!(model.distance_probability("", 0), Prob::CERTAIN);
    }
}

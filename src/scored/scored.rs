// src/scored/scored.rs

use std::rc::Rc;

use super::error::Error;
use super::lazy::{
    LazyScored, bind_scored, filter_scored, map_scored, merge, product_scored,
};
use super::prob::{Alt, Prob};

/// Zero or more alternatives in non-increasing probability order.
#[derive(Debug, Clone)]
pub enum Scored<A> {
    /// No alternatives and no reason kept.
    Empty,
    /// No alternatives; only built when error tracking is enabled.
    Bad(Error),
    /// The best remaining alternative and a suspension of the rest.
    Best(Prob, A, LazyScored<A>),
}

impl<A> Scored<A> {
    /// Probability of the head alternative, zero on failure.
    pub fn p(&self) -> Prob {
        match self {
            Scored::Best(p, _, _) => *p,
            Scored::Empty | Scored::Bad(_) => Prob::ZERO,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Scored::Best(..))
    }
}

impl<A: Clone + 'static> Scored<A> {
    /// The highest probability alternative, forcing nothing beyond it.
    pub fn best(&self) -> Result<A, Error> {
        match self {
            Scored::Best(_, x, _) => Ok(x.clone()),
            Scored::Bad(e) => Err(e.clone()),
            Scored::Empty => Err(Error::one("no interpretation found")),
        }
    }

    /// Every alternative in order, or the reason there are none.
    pub fn all(self) -> Result<Alts<A>, Error> {
        match self {
            Scored::Bad(e) => Err(e),
            Scored::Empty => Err(Error::one("no interpretation found")),
            best => Ok(Alts::starting_at(LazyScored::known(best))),
        }
    }

    /// Every alternative in order; failures become an empty sequence.
    pub fn stream(self) -> Alts<A> {
        Alts::starting_at(LazyScored::known(self))
    }

    pub fn lazy(self) -> LazyScored<A> {
        LazyScored::known(self)
    }

    pub fn map<B: Clone + 'static>(self, f: impl Fn(A) -> B + 'static) -> Scored<B> {
        map_scored(self, Rc::new(f))
    }

    pub fn bias(self, q: Prob) -> Scored<A> {
        match self {
            Scored::Best(p, x, rest) => Scored::Best(p * q, x, rest.bias(q)),
            failed => failed,
        }
    }

    /// Ordered merge with a suspended stream; ties favor `self`.
    pub fn union(self, other: LazyScored<A>) -> LazyScored<A> {
        self.lazy().union(other)
    }

    /// Eager form of [`Scored::union`] for two computed values.
    pub fn either(self, other: Scored<A>) -> Scored<A> {
        merge(self.lazy(), other.lazy())
    }

    /// For each alternative `(p, x)`, `f(x)` biased by `p`, all merged into
    /// one stream ordered by joint probability.
    pub fn bind<B: Clone + 'static>(self, f: impl Fn(A) -> Scored<B> + 'static) -> Scored<B> {
        bind_scored(self, Rc::new(f))
    }

    pub fn product_with<B, C>(self, other: Scored<B>, f: impl Fn(A, B) -> C + 'static) -> Scored<C>
    where
        B: Clone + 'static,
        C: Clone + 'static,
    {
        product_scored(&self.lazy(), &other.lazy(), Rc::new(f))
    }

    pub fn product<B: Clone + 'static>(self, other: Scored<B>) -> Scored<(A, B)> {
        self.product_with(other, |a, b| (a, b))
    }

    /// Drop alternatives failing `pred`. If none survive the result fails
    /// with `error`.
    pub fn filter(
        self,
        pred: impl Fn(&A) -> bool + 'static,
        error: impl Fn() -> String + 'static,
    ) -> Scored<A> {
        filter_scored(self.lazy(), Rc::new(pred), Some(Rc::new(error)))
    }

    /// [`Scored::filter`] with a generic diagnostic.
    pub fn filter_by(self, pred: impl Fn(&A) -> bool + 'static) -> Scored<A> {
        self.filter(pred, || "no alternative satisfied the filter".to_string())
    }
}

/// Iterator over the alternatives of a stream, forcing one node per step.
///
/// Dropping it early is always safe.
pub struct Alts<A> {
    next: Option<LazyScored<A>>,
}

impl<A: Clone + 'static> Alts<A> {
    pub(super) fn starting_at(start: LazyScored<A>) -> Self {
        Self { next: Some(start) }
    }
}

impl<A: Clone + 'static> Iterator for Alts<A> {
    type Item = Alt<A>;

    fn next(&mut self) -> Option<Alt<A>> {
        let current = self.next.take()?;
        match current.force() {
            Scored::Best(p, x, rest) => {
                self.next = Some(rest.clone());
                Some(Alt::new(*p, x.clone()))
            }
            Scored::Empty | Scored::Bad(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TRACK_ERRORS;
    use crate::scored::{fail, known, multiple, single, uniform};

    fn probs<A: Clone + 'static>(s: Scored<A>) -> Vec<f64> {
        s.stream().map(|alt| alt.p.value()).collect()
    }

    fn alts(pairs: &[(f64, u32)]) -> Scored<u32> {
        multiple(
            pairs.iter().map(|&(p, x)| Alt::new(Prob::new(p), x)).collect(),
            || "empty".to_string(),
        )
    }

    #[test]
    fn best_of_failure_reports_error() {
        let s: Scored<u32> = fail(|| "no such name".to_string());
        let err = s.best().unwrap_err();
        if TRACK_ERRORS {
            assert_eq!(err.message(), "no such name");
        } else {
            assert!(matches!(s, Scored::Empty));
        }
    }

    #[test]
    fn all_on_success_yields_everything() {
        let s = alts(&[(0.2, 2), (0.8, 8), (0.5, 5)]);
        let values: Vec<u32> = s.all().unwrap().map(|alt| alt.x).collect();
        assert_eq!(values, vec![8, 5, 2]);
    }

    #[test]
    fn map_preserves_probabilities() {
        let s = alts(&[(0.9, 1), (0.4, 2)]).map(|x| x + 100);
        let got: Vec<(f64, u32)> = s.stream().map(|a| (a.p.value(), a.x)).collect();
        assert_eq!(got, vec![(0.9, 101), (0.4, 102)]);
    }

    #[test]
    fn bias_one_is_identity() {
        let s = alts(&[(0.9, 1), (0.4, 2)]);
        assert_eq!(probs(s.clone().bias(Prob::CERTAIN)), probs(s));
    }

    #[test]
    fn bind_multiplies_conditional_probabilities() {
        let s = alts(&[(0.8, 1), (0.5, 2)]);
        let bound = s.bind(|x| {
            multiple(
                vec![
                    Alt::new(Prob::new(0.5), x * 10),
                    Alt::new(Prob::new(0.25), x * 100),
                ],
                || "inner".to_string(),
            )
        });
        let got: Vec<(f64, u32)> = bound.stream().map(|a| (a.p.value(), a.x)).collect();
        assert_eq!(got, vec![(0.4, 10), (0.25, 20), (0.2, 100), (0.125, 200)]);
    }

    #[test]
    fn bind_with_failing_branch_keeps_successes() {
        let s = alts(&[(0.8, 1), (0.5, 2)]);
        let bound = s.bind(|x| {
            if x == 1 {
                fail(|| "odd".to_string())
            } else {
                known(x)
            }
        });
        let got: Vec<u32> = bound.stream().map(|a| a.x).collect();
        assert_eq!(got, vec![2]);
    }

    #[test]
    fn product_enumerates_in_joint_order() {
        let a = alts(&[(0.9, 1), (0.3, 2)]);
        let b = alts(&[(0.5, 10), (0.4, 20)]);
        let got: Vec<(f64, u32)> = a
            .product_with(b, |x, y| x + y)
            .stream()
            .map(|alt| (alt.p.value(), alt.x))
            .collect();
        let expected = [(0.45, 11), (0.36, 21), (0.15, 12), (0.12, 22)];
        assert_eq!(got.len(), expected.len());
        for ((gp, gx), (ep, ex)) in got.iter().zip(expected.iter()) {
            assert!((gp - ep).abs() < 1e-12);
            assert_eq!(gx, ex);
        }
    }

    #[test]
    fn product_with_failure_fails() {
        let a = alts(&[(0.9, 1)]);
        let b: Scored<u32> = fail(|| "nothing".to_string());
        assert!(!a.product(b).succeeded());
    }

    #[test]
    fn filter_keeps_order_and_fails_when_all_dropped() {
        let s = alts(&[(0.9, 1), (0.7, 2), (0.5, 3), (0.1, 4)]);
        let evens: Vec<u32> = s.clone().filter_by(|x| x % 2 == 0).stream().map(|a| a.x).collect();
        assert_eq!(evens, vec![2, 4]);

        let none = s.filter(|x| *x > 10, || "too small".to_string());
        match none {
            Scored::Bad(e) => {
                assert!(TRACK_ERRORS);
                assert_eq!(e.message(), "too small");
            }
            Scored::Empty => assert!(!TRACK_ERRORS),
            Scored::Best(..) => panic!("filter kept a rejected alternative"),
        }
    }

    #[test]
    fn either_of_two_failures_nests_when_tracking() {
        let a: Scored<u32> = fail(|| "left".to_string());
        let b: Scored<u32> = fail(|| "right".to_string());
        match a.either(b) {
            Scored::Bad(e) => {
                let children: Vec<&str> = e.children().iter().map(|c| c.message()).collect();
                assert_eq!(children, vec!["left", "right"]);
            }
            Scored::Empty => assert!(!TRACK_ERRORS),
            Scored::Best(..) => panic!("union of failures succeeded"),
        }
    }

    #[test]
    fn either_drops_failure_when_other_side_succeeds() {
        let a: Scored<u32> = fail(|| "left".to_string());
        let b = single(4u32, Prob::new(0.3));
        assert_eq!(a.either(b).best().unwrap(), 4);
    }

    #[test]
    fn uniform_preserves_caller_order() {
        let s = uniform(Prob::new(0.5), vec!["a", "b", "c"], || "none".to_string());
        let got: Vec<&str> = s.stream().map(|a| a.x).collect();
        assert_eq!(got, vec!["a", "b", "c"]);
    }
}

// src/scored/build.rs
//
// Constructors for scored streams.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::error::Error;
use super::lazy::LazyScored;
use super::prob::{Alt, Prob};
use super::scored::Scored;
use crate::config::TRACK_ERRORS;

/// A failure. `message` only runs when error tracking is on.
pub fn fail<A>(message: impl FnOnce() -> String) -> Scored<A> {
    if TRACK_ERRORS {
        Scored::Bad(Error::one(message()))
    } else {
        Scored::Empty
    }
}

/// A single certain alternative.
pub fn known<A: Clone + 'static>(x: A) -> Scored<A> {
    Scored::Best(Prob::CERTAIN, x, LazyScored::empty())
}

pub fn single<A: Clone + 'static>(x: A, p: Prob) -> Scored<A> {
    Scored::Best(p, x, LazyScored::empty())
}

/// One alternative per value, all at `p`, in the given order.
pub fn uniform<A: Clone + 'static>(
    p: Prob,
    values: Vec<A>,
    error: impl FnOnce() -> String,
) -> Scored<A> {
    let mut values = values.into_iter();
    match values.next() {
        Some(x) => Scored::Best(p, x, uniform_rest(p, values)),
        None => fail(error),
    }
}

fn uniform_rest<A: Clone + 'static>(p: Prob, values: std::vec::IntoIter<A>) -> LazyScored<A> {
    if values.len() == 0 {
        return LazyScored::empty();
    }
    LazyScored::new(p, move || {
        let mut values = values;
        match values.next() {
            Some(x) => Scored::Best(p, x, uniform_rest(p, values)),
            None => Scored::Empty,
        }
    })
}

/// Heap entry: higher probability first, then earlier insertion.
struct Ranked<A> {
    p: Prob,
    seq: usize,
    x: A,
}

impl<A> PartialEq for Ranked<A> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<A> Eq for Ranked<A> {}

impl<A> PartialOrd for Ranked<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Ranked<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.p
            .total_cmp(&other.p)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Order an unsorted list of alternatives.
///
/// The list is heapified up front and each alternative is extracted only when
/// the stream is forced that far, so consuming the best `k` of `n` costs
/// `O(n + k log n)`.
pub fn multiple<A: Clone + 'static>(alts: Vec<Alt<A>>, error: impl FnOnce() -> String) -> Scored<A> {
    let heap: BinaryHeap<Ranked<A>> = alts
        .into_iter()
        .enumerate()
        .map(|(seq, alt)| Ranked {
            p: alt.p,
            seq,
            x: alt.x,
        })
        .collect();
    match pop_best(heap) {
        Some(best) => best,
        None => fail(error),
    }
}

/// Like [`multiple`], but `fallback` is computed and used only when `first`
/// is empty.
pub fn multiples<A: Clone + 'static>(
    first: Vec<Alt<A>>,
    fallback: impl FnOnce() -> Vec<Alt<A>>,
    error: impl FnOnce() -> String,
) -> Scored<A> {
    if first.is_empty() {
        multiple(fallback(), error)
    } else {
        multiple(first, error)
    }
}

fn pop_best<A: Clone + 'static>(mut heap: BinaryHeap<Ranked<A>>) -> Option<Scored<A>> {
    let top = heap.pop()?;
    Some(Scored::Best(top.p, top.x, heap_rest(heap)))
}

fn heap_rest<A: Clone + 'static>(heap: BinaryHeap<Ranked<A>>) -> LazyScored<A> {
    let Some(bound) = heap.peek().map(|top| top.p) else {
        return LazyScored::empty();
    };
    LazyScored::new(bound, move || pop_best(heap).unwrap_or(Scored::Empty))
}

/// Independent product of a list of streams, in list order.
pub fn product_all<A: Clone + 'static>(items: Vec<Scored<A>>) -> Scored<Vec<A>> {
    items.into_iter().fold(known(Vec::new()), |acc, item| {
        acc.product_with(item, |mut values, x| {
            values.push(x);
            values
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alt(p: f64, x: &'static str) -> Alt<&'static str> {
        Alt::new(Prob::new(p), x)
    }

    #[test]
    fn multiple_sorts_descending_with_stable_ties() {
        let s = multiple(
            vec![alt(0.1, "d"), alt(0.5, "b"), alt(0.9, "a"), alt(0.5, "c")],
            || "none".to_string(),
        );
        let got: Vec<&str> = s.stream().map(|a| a.x).collect();
        assert_eq!(got, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn multiple_of_nothing_fails() {
        let s: Scored<u32> = multiple(Vec::new(), || "nothing".to_string());
        assert!(!s.succeeded());
    }

    #[test]
    fn multiples_only_consults_fallback_when_first_is_empty() {
        let s = multiples(
            vec![alt(0.4, "exact")],
            || panic!("fallback computed"),
            || "none".to_string(),
        );
        assert_eq!(s.best().unwrap(), "exact");

        let s = multiples(Vec::new(), || vec![alt(0.1, "typo")], || "none".to_string());
        assert_eq!(s.best().unwrap(), "typo");
    }

    #[test]
    fn multiple_rest_bounds_are_tight() {
        let s = multiple(vec![alt(0.9, "a"), alt(0.3, "b")], || "none".to_string());
        let Scored::Best(_, _, rest) = s else {
            panic!("expected alternatives");
        };
        assert_eq!(rest.bound(), Prob::new(0.3));
        assert!(!rest.is_forced());
    }

    #[test]
    fn product_all_combines_lists() {
        let items = vec![
            uniform(Prob::new(0.5), vec![1, 2], || "a".to_string()),
            known(3),
        ];
        let got: Vec<Vec<i32>> = product_all(items).stream().map(|a| a.x).collect();
        assert_eq!(got, vec![vec![1, 3], vec![2, 3]]);
    }

    #[test]
    fn product_all_of_nothing_is_certain_empty_list() {
        let s: Scored<Vec<u8>> = product_all(Vec::new());
        assert_eq!(s.p(), Prob::CERTAIN);
        assert_eq!(s.best().unwrap(), Vec::<u8>::new());
    }
}

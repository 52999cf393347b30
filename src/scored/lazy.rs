// src/scored/lazy.rs
//
// Suspended scored streams and the combinators that merge them without
// forcing more than the consumer asks for.

use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::Rc;

use super::error::Error;
use super::prob::Prob;
use super::scored::{Alts, Scored};
use crate::config::TRACK_ERRORS;

type Thunk<A> = Box<dyn FnOnce() -> Scored<A>>;
pub(super) type MapFn<A, B> = Rc<dyn Fn(A) -> B>;
pub(super) type BindFn<A, B> = Rc<dyn Fn(A) -> Scored<B>>;
pub(super) type Pred<A> = Rc<dyn Fn(&A) -> bool>;
pub(super) type ErrorFn = Rc<dyn Fn() -> String>;
pub(super) type PairFn<A, B, C> = Rc<dyn Fn(A, B) -> C>;

struct Node<A> {
    value: OnceCell<Scored<A>>,
    thunk: Cell<Option<Thunk<A>>>,
}

/// A `Scored<A>` that has not necessarily been computed yet, together with an
/// eagerly known upper bound on the probability of everything it will yield.
///
/// Clones share the memo cell: forcing any clone forces them all, and the
/// suspended computation runs at most once.
pub struct LazyScored<A> {
    bound: Prob,
    node: Rc<Node<A>>,
}

impl<A> Clone for LazyScored<A> {
    fn clone(&self) -> Self {
        Self {
            bound: self.bound,
            node: Rc::clone(&self.node),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for LazyScored<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node.value.get() {
            Some(value) => f
                .debug_struct("LazyScored")
                .field("bound", &self.bound)
                .field("value", value)
                .finish(),
            None => f
                .debug_struct("LazyScored")
                .field("bound", &self.bound)
                .finish_non_exhaustive(),
        }
    }
}

impl<A: Clone + 'static> LazyScored<A> {
    /// Suspend `thunk`. `bound` must be at least the probability of every
    /// alternative the thunk will produce.
    pub fn new(bound: Prob, thunk: impl FnOnce() -> Scored<A> + 'static) -> Self {
        Self {
            bound,
            node: Rc::new(Node {
                value: OnceCell::new(),
                thunk: Cell::new(Some(Box::new(thunk))),
            }),
        }
    }

    /// Wrap an already computed value; the bound is its head probability.
    pub fn known(value: Scored<A>) -> Self {
        let bound = value.p();
        Self {
            bound,
            node: Rc::new(Node {
                value: OnceCell::from(value),
                thunk: Cell::new(None),
            }),
        }
    }

    pub fn empty() -> Self {
        Self::known(Scored::Empty)
    }

    pub fn bound(&self) -> Prob {
        self.bound
    }

    pub fn is_forced(&self) -> bool {
        self.node.value.get().is_some()
    }

    /// Compute (once) and return the suspended value.
    pub fn force(&self) -> &Scored<A> {
        self.node.value.get_or_init(|| match self.node.thunk.take() {
            Some(thunk) => thunk(),
            None => unreachable!("lazy scored node forced while it was being computed"),
        })
    }

    /// Same node, with a tighter bound. Only valid once the node is known to
    /// yield nothing above `bound`.
    fn tightened(&self, bound: Prob) -> Self {
        debug_assert!(bound <= self.bound);
        Self {
            bound,
            node: Rc::clone(&self.node),
        }
    }

    pub fn best(&self) -> Result<A, Error> {
        self.force().best()
    }

    pub fn all(&self) -> Result<Alts<A>, Error> {
        self.force().clone().all()
    }

    pub fn stream(&self) -> Alts<A> {
        Alts::starting_at(self.clone())
    }

    // ===== Combinators =====

    /// Ordered merge of two streams. Neither side is forced until its bound
    /// makes it a candidate for the next alternative; ties favor `self`.
    pub fn union(self, other: LazyScored<A>) -> LazyScored<A> {
        if other.is_forced() && !matches!(other.force(), Scored::Best(..)) && !TRACK_ERRORS {
            return self;
        }
        let bound = self.bound.max(other.bound);
        LazyScored::new(bound, move || merge(self, other))
    }

    pub fn map<B: Clone + 'static>(self, f: impl Fn(A) -> B + 'static) -> LazyScored<B> {
        map_lazy(self, Rc::new(f))
    }

    /// Multiply every probability by `q`.
    pub fn bias(self, q: Prob) -> LazyScored<A> {
        if q == Prob::CERTAIN {
            return self;
        }
        let bound = self.bound * q;
        LazyScored::new(bound, move || self.force().clone().bias(q))
    }

    /// Monadic composition; `f` yields probabilities conditional on its input.
    pub fn bind<B: Clone + 'static>(
        self,
        f: impl Fn(A) -> Scored<B> + 'static,
    ) -> LazyScored<B> {
        bind_lazy(self, Rc::new(f))
    }

    pub fn filter(
        self,
        pred: impl Fn(&A) -> bool + 'static,
        error: impl Fn() -> String + 'static,
    ) -> LazyScored<A> {
        filter_lazy(self, Rc::new(pred), Some(Rc::new(error)))
    }

    /// Combine with an independent stream; the joint probability is the
    /// product of the two.
    pub fn product_with<B, C>(
        self,
        other: LazyScored<B>,
        f: impl Fn(A, B) -> C + 'static,
    ) -> LazyScored<C>
    where
        B: Clone + 'static,
        C: Clone + 'static,
    {
        product_lazy(self, other, Rc::new(f))
    }
}

/// Force the ordered merge of `left` and `right`.
pub(super) fn merge<A: Clone + 'static>(
    mut left: LazyScored<A>,
    mut right: LazyScored<A>,
) -> Scored<A> {
    loop {
        let left_first = left.bound >= right.bound;
        let (hi, lo) = if left_first {
            (&left, &right)
        } else {
            (&right, &left)
        };
        let head = match hi.force() {
            Scored::Best(p, x, rest) => {
                // Equal probabilities go to the left operand.
                let ahead = if left_first {
                    *p >= lo.bound
                } else {
                    *p > lo.bound
                };
                if ahead {
                    let tail = if left_first {
                        rest.clone().union(lo.clone())
                    } else {
                        lo.clone().union(rest.clone())
                    };
                    return Scored::Best(*p, x.clone(), tail);
                }
                *p
            }
            _ => return merge_after_failure(&left, &right),
        };
        // The forced side fell below the other's bound: retry with its real head.
        if left_first {
            left = left.tightened(head);
        } else {
            right = right.tightened(head);
        }
    }
}

fn merge_after_failure<A: Clone + 'static>(left: &LazyScored<A>, right: &LazyScored<A>) -> Scored<A> {
    match (left.force(), right.force()) {
        (best @ Scored::Best(..), _) | (_, best @ Scored::Best(..)) => best.clone(),
        (Scored::Bad(a), Scored::Bad(b)) => Scored::Bad(Error::nest(
            "no alternative on either side",
            vec![a.clone(), b.clone()],
        )),
        (Scored::Bad(e), _) | (_, Scored::Bad(e)) => Scored::Bad(e.clone()),
        _ => Scored::Empty,
    }
}

pub(super) fn map_lazy<A, B>(s: LazyScored<A>, f: MapFn<A, B>) -> LazyScored<B>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let bound = s.bound;
    LazyScored::new(bound, move || map_scored(s.force().clone(), f))
}

pub(super) fn map_scored<A, B>(s: Scored<A>, f: MapFn<A, B>) -> Scored<B>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    match s {
        Scored::Best(p, x, rest) => {
            let y = f(x);
            Scored::Best(p, y, map_lazy(rest, f))
        }
        Scored::Empty => Scored::Empty,
        Scored::Bad(e) => Scored::Bad(e),
    }
}

pub(super) fn bind_lazy<A, B>(s: LazyScored<A>, f: BindFn<A, B>) -> LazyScored<B>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let bound = s.bound;
    LazyScored::new(bound, move || bind_scored(s.force().clone(), f))
}

pub(super) fn bind_scored<A, B>(s: Scored<A>, f: BindFn<A, B>) -> Scored<B>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    match s {
        Scored::Best(p, x, rest) => {
            let head = LazyScored::known(f(x)).bias(p);
            merge(head, bind_lazy(rest, f))
        }
        Scored::Empty => Scored::Empty,
        Scored::Bad(e) => Scored::Bad(e),
    }
}

pub(super) fn filter_lazy<A: Clone + 'static>(
    s: LazyScored<A>,
    pred: Pred<A>,
    error: Option<ErrorFn>,
) -> LazyScored<A> {
    let bound = s.bound;
    LazyScored::new(bound, move || filter_scored(s, pred, error))
}

/// Skip rejected alternatives iteratively. `error` is only present until the
/// first alternative is kept; after that an exhausted tail is plain `Empty`.
pub(super) fn filter_scored<A: Clone + 'static>(
    mut s: LazyScored<A>,
    pred: Pred<A>,
    error: Option<ErrorFn>,
) -> Scored<A> {
    loop {
        let next = match s.force() {
            Scored::Best(p, x, rest) => {
                if pred(x) {
                    return Scored::Best(*p, x.clone(), filter_lazy(rest.clone(), pred, None));
                }
                rest.clone()
            }
            Scored::Empty => {
                return match error {
                    Some(error) if TRACK_ERRORS => Scored::Bad(Error::one(error())),
                    _ => Scored::Empty,
                };
            }
            Scored::Bad(inner) => {
                return match error {
                    Some(error) => Scored::Bad(Error::nest(error(), vec![inner.clone()])),
                    None => Scored::Bad(inner.clone()),
                };
            }
        };
        s = next;
    }
}

pub(super) fn product_lazy<A, B, C>(
    a: LazyScored<A>,
    b: LazyScored<B>,
    f: PairFn<A, B, C>,
) -> LazyScored<C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let bound = a.bound * b.bound;
    LazyScored::new(bound, move || product_scored(&a, &b, f))
}

/// `(x, y)` first, then the union of `xs × y`, `x × ys` and `xs × ys`.
pub(super) fn product_scored<A, B, C>(
    a: &LazyScored<A>,
    b: &LazyScored<B>,
    f: PairFn<A, B, C>,
) -> Scored<C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    match (a.force(), b.force()) {
        (Scored::Best(p, x, xs), Scored::Best(q, y, ys)) => {
            let head = f(x.clone(), y.clone());

            let fy = Rc::clone(&f);
            let y = y.clone();
            let first_rest = map_lazy(xs.clone(), Rc::new(move |x2: A| fy(x2, y.clone()))).bias(*q);

            let fx = Rc::clone(&f);
            let x = x.clone();
            let second_rest = map_lazy(ys.clone(), Rc::new(move |y2: B| fx(x.clone(), y2))).bias(*p);

            let both_rest = product_lazy(xs.clone(), ys.clone(), f);
            Scored::Best(
                *p * *q,
                head,
                first_rest.union(second_rest).union(both_rest),
            )
        }
        (Scored::Bad(e), _) | (_, Scored::Bad(e)) => Scored::Bad(e.clone()),
        _ => Scored::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scored::{known, single};
    use std::cell::Cell;

    fn counted(bound: f64, p: f64, value: u32, forces: Rc<Cell<usize>>) -> LazyScored<u32> {
        LazyScored::new(Prob::new(bound), move || {
            forces.set(forces.get() + 1);
            single(value, Prob::new(p))
        })
    }

    #[test]
    fn force_is_memoized() {
        let forces = Rc::new(Cell::new(0));
        let lazy = counted(0.5, 0.5, 7, forces.clone());
        let alias = lazy.clone();
        assert_eq!(lazy.best().unwrap(), 7);
        assert_eq!(alias.best().unwrap(), 7);
        assert_eq!(forces.get(), 1);
    }

    #[test]
    fn union_does_not_force_dominated_side() {
        let forces = Rc::new(Cell::new(0));
        let a = LazyScored::known(single(1u32, Prob::new(0.9)));
        let b = counted(0.5, 0.5, 2, forces.clone());
        let merged = a.union(b).map(|x| x * 10);
        assert_eq!(merged.best().unwrap(), 10);
        assert_eq!(forces.get(), 0);
    }

    #[test]
    fn union_forces_other_side_once_head_drops_below_bound() {
        let forces = Rc::new(Cell::new(0));
        let a = counted(0.9, 0.3, 1, forces.clone());
        let b = LazyScored::known(single(2u32, Prob::new(0.6)));
        let alts: Vec<u32> = a.union(b).stream().map(|alt| alt.x).collect();
        assert_eq!(alts, vec![2, 1]);
        assert_eq!(forces.get(), 1);
    }

    #[test]
    fn union_prefers_left_on_ties() {
        let a = LazyScored::known(single("left", Prob::new(0.5)));
        let b = LazyScored::known(single("right", Prob::new(0.5)));
        assert_eq!(a.clone().union(b.clone()).best().unwrap(), "left");
        assert_eq!(b.union(a).best().unwrap(), "right");
    }

    #[test]
    fn union_prefers_left_on_ties_behind_loose_bounds() {
        let a = LazyScored::new(Prob::CERTAIN, || single("left", Prob::new(0.5)));
        let b = LazyScored::new(Prob::CERTAIN, || single("right", Prob::new(0.5)));
        let order: Vec<&str> = a.union(b).stream().map(|alt| alt.x).collect();
        assert_eq!(order, vec!["left", "right"]);
    }

    #[test]
    fn bias_scales_the_bound() {
        let lazy = LazyScored::known(known(3u32)).bias(Prob::new(0.25));
        assert_eq!(lazy.bound(), Prob::new(0.25));
        assert!(!lazy.is_forced());
        let alt = lazy.stream().next().unwrap();
        assert_eq!(alt.p, Prob::new(0.25));
    }
}

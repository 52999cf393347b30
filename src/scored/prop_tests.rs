//! Property tests for the scored algebra using proptest.
//!
//! Every combinator must keep streams in non-increasing probability order and
//! must neither lose nor duplicate alternatives.

use super::*;
use proptest::prelude::*;

fn arb_alts() -> impl Strategy<Value = Vec<(u32, u16)>> {
    // (probability in thousandths, payload)
    prop::collection::vec((1u32..=1000, any::<u16>()), 0..12)
}

fn build(pairs: &[(u32, u16)]) -> Scored<u16> {
    multiple(
        pairs
            .iter()
            .map(|&(p, x)| Alt::new(Prob::new(f64::from(p) / 1000.0), x))
            .collect(),
        || "empty".to_string(),
    )
}

fn assert_sorted<A: Clone + 'static>(s: Scored<A>) -> Result<(), TestCaseError> {
    let probs: Vec<f64> = s.stream().map(|alt| alt.p.value()).collect();
    for pair in probs.windows(2) {
        prop_assert!(pair[0] >= pair[1], "out of order: {:?}", probs);
    }
    Ok(())
}

fn multiset(s: Scored<u16>) -> Vec<(u64, u16)> {
    let mut items: Vec<(u64, u16)> = s.stream().map(|alt| (alt.p.value().to_bits(), alt.x)).collect();
    items.sort();
    items
}

proptest! {
    #[test]
    fn multiple_is_sorted(pairs in arb_alts()) {
        assert_sorted(build(&pairs))?;
    }

    #[test]
    fn union_is_sorted_and_total(a in arb_alts(), b in arb_alts()) {
        let merged = Scored::union(build(&a), build(&b).lazy()).force().clone();
        assert_sorted(merged.clone())?;

        let mut expected = multiset(build(&a));
        expected.extend(multiset(build(&b)));
        expected.sort();
        prop_assert_eq!(multiset(merged), expected);
    }

    #[test]
    fn bias_scales_every_probability(pairs in arb_alts(), q in 1u32..=1000) {
        let q = Prob::new(f64::from(q) / 1000.0);
        let original: Vec<f64> = build(&pairs).stream().map(|alt| alt.p.value()).collect();
        let biased: Vec<f64> = build(&pairs).bias(q).stream().map(|alt| alt.p.value()).collect();
        prop_assert_eq!(original.len(), biased.len());
        for (o, b) in original.iter().zip(biased.iter()) {
            prop_assert_eq!(o * q.value(), *b);
        }
    }

    #[test]
    fn bind_is_sorted_and_conditional(outer in arb_alts(), inner in arb_alts()) {
        let inner_probs: Vec<f64> = build(&inner).stream().map(|alt| alt.p.value()).collect();
        let inner_for_bind = inner.clone();
        let bound = build(&outer).bind(move |x| build(&inner_for_bind).map(move |y| (x, y)));
        assert_sorted(bound.clone())?;

        // Each output probability is an outer probability times an inner one.
        let outer_probs: Vec<f64> = build(&outer).stream().map(|alt| alt.p.value()).collect();
        let produced: Vec<f64> = bound.stream().map(|alt| alt.p.value()).collect();
        prop_assert_eq!(produced.len(), outer_probs.len() * inner_probs.len());
        for p in produced {
            let explained = outer_probs
                .iter()
                .any(|o| inner_probs.iter().any(|i| o * i == p));
            prop_assert!(explained, "{} is not a product of conditional probabilities", p);
        }
    }

    #[test]
    fn product_is_sorted_and_complete(a in arb_alts(), b in arb_alts()) {
        let product = build(&a).product(build(&b));
        assert_sorted(product.clone())?;
        prop_assert_eq!(product.stream().count(), a.len() * b.len());
    }

    #[test]
    fn filter_is_sorted_subsequence(pairs in arb_alts()) {
        let kept: Vec<u16> = build(&pairs).filter_by(|x| x % 3 == 0).stream().map(|alt| alt.x).collect();
        let expected: Vec<u16> = build(&pairs).stream().map(|alt| alt.x).filter(|x| x % 3 == 0).collect();
        prop_assert_eq!(kept, expected);
        assert_sorted(build(&pairs).filter_by(|x| x % 2 == 1))?;
    }
}

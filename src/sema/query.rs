// src/sema/query.rs
//! Weighted name queries against an environment.
//!
//! Every query has the same shape: exact hits for the typed name, weighted by
//! the chance that there is no typo, and, only if no exact hit survives the
//! role filter, fuzzy hits weighted by the noise model.

use crate::scored::{Alt, Prob, Scored, multiples};
use crate::sema::env::Env;
use crate::sema::items::Item;
use crate::sema::pr;

/// Candidates for `typed` that `filter` accepts, in probability order.
///
/// Exact hits get `exact_prob * P(0 errors)`; a hit `d > 0` edits away gets
/// `(1 - exact_prob) * P(d errors)` and is dropped when that falls below the
/// noise model's minimum probability.
pub fn combined_query<A: Clone + 'static>(
    env: &Env,
    typed: &str,
    exact_prob: Prob,
    filter: impl Fn(&Item) -> Option<A>,
    error: impl FnOnce() -> String,
) -> Scored<A> {
    let noise = env.noise();
    let exact_weight = exact_prob * noise.distance_probability(typed, 0);
    let exact: Vec<Alt<A>> = env
        .things(typed)
        .iter()
        .filter_map(&filter)
        .map(|x| Alt::new(exact_weight, x))
        .collect();
    let fuzzy = || {
        let max = noise.max_distance(typed);
        let miss = exact_prob.complement();
        let floor = noise.minimum_probability;
        let found: Vec<Alt<A>> = env
            .typos(typed, max)
            .into_iter()
            .filter(|(d, _)| *d > 0)
            .map(|(d, item)| (miss * noise.distance_probability(typed, d), item))
            .filter(|(p, _)| *p >= floor)
            .filter_map(|(p, item)| filter(&item).map(|x| Alt::new(p, x)))
            .collect();
        tracing::trace!(typed, max, candidates = found.len(), "fuzzy query");
        found
    };
    multiples(exact, fuzzy, error)
}

/// Classes, interfaces and enums nameable here.
pub fn type_query(env: &Env, typed: &str) -> Scored<Item> {
    combined_query(
        env,
        typed,
        pr::EXACT,
        |item| (item.is_type() && env.visible(item)).then(|| item.clone()),
        || format!("no type named '{typed}'"),
    )
}

/// Packages nameable here.
pub fn package_query(env: &Env, typed: &str) -> Scored<Item> {
    combined_query(
        env,
        typed,
        pr::EXACT,
        |item| (item.is_package() && env.visible(item)).then(|| item.clone()),
        || format!("no package named '{typed}'"),
    )
}

/// Whether an unqualified use of `item` is legal given the place's static
/// context.
fn usable_unqualified(env: &Env, item: &Item) -> bool {
    !(env.place().is_static && item.is_instance_member())
}

/// Methods callable by bare name here.
pub fn callable_query(env: &Env, typed: &str) -> Scored<Item> {
    combined_query(
        env,
        typed,
        pr::EXACT,
        |item| {
            (item.is_method() && env.visible(item) && usable_unqualified(env, item))
                .then(|| item.clone())
        },
        || format!("no method named '{typed}'"),
    )
}

/// Locals, fields and enum constants nameable by bare name here.
pub fn value_query(env: &Env, typed: &str) -> Scored<Item> {
    combined_query(
        env,
        typed,
        pr::EXACT,
        |item| {
            (item.is_value() && env.visible(item) && usable_unqualified(env, item))
                .then(|| item.clone())
        },
        || format!("no value named '{typed}'"),
    )
}

/// Fields and methods reachable through a value of class `ty`, static or not.
pub fn member_query(env: &Env, ty: &Item, typed: &str) -> Scored<Item> {
    combined_query(
        env,
        typed,
        pr::EXACT,
        |item| {
            ((item.is_field() || item.is_method()) && item.is_member_of(ty)).then(|| item.clone())
        },
        || format!("'{ty}' has no member named '{typed}'"),
    )
}

/// Static fields, static methods and enum constants reachable through the
/// type name `ty`.
pub fn static_member_query(env: &Env, ty: &Item, typed: &str) -> Scored<Item> {
    combined_query(
        env,
        typed,
        pr::EXACT,
        |item| {
            let member = item.is_field() || item.is_method() || item.is_value();
            (member && !item.is_local() && item.is_static() && !item.is_type() && item.is_member_of(ty))
                .then(|| item.clone())
        },
        || format!("'{ty}' has no static member named '{typed}'"),
    )
}

/// Types nested in `ty` or in one of its supertypes, and classes of a package.
pub fn type_member_query(env: &Env, ty: &Item, typed: &str) -> Scored<Item> {
    combined_query(
        env,
        typed,
        pr::EXACT,
        |item| (item.is_type() && item.is_member_of(ty)).then(|| item.clone()),
        || format!("'{ty}' has no type named '{typed}'"),
    )
}

/// Constructors of `class`, in declaration order, all certain.
pub fn constructors_of(env: &Env, class: &Item) -> Vec<Item> {
    env.things(class.name())
        .into_iter()
        .filter(|item| item.is_constructor() && item.parent() == Some(class))
        .collect()
}

/// In-scope values that could serve as the missing receiver of `member`.
pub fn implicit_receivers(env: &Env, member: &Item) -> Vec<Item> {
    let Some(owner) = member.parent().filter(|p| p.is_type()) else {
        return Vec::new();
    };
    env.values_of_type(owner)
        .into_iter()
        .filter(|value| env.visible(value) && usable_unqualified(env, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::poisson_pdf;
    use crate::sema::env::EnvBuilder;
    use crate::sema::place::Place;
    use crate::sema::types::Type;

    fn world() -> (Env, Item, Item) {
        let object = Item::class("Object", None, None, Vec::new());
        let main = Item::class("Main", None, Some(object.clone()), Vec::new());
        let eval = Item::static_method("eval", &main, Vec::new(), Type::Void);
        let xyz = Item::field("xyz", &main, Type::Int, true, false);
        let width = Item::field("width", &main, Type::Int, false, false);
        let env = EnvBuilder::new(Place::new(eval.clone(), true))
            .items([object, main.clone()])
            .in_scope(eval, 1)
            .in_scope(xyz.clone(), 1)
            .in_scope(width, 1)
            .in_scope(main.clone(), 2)
            .build()
            .unwrap();
        (env, main, xyz)
    }

    #[test]
    fn exact_hit_gets_exact_weight() {
        let (env, _, xyz) = world();
        let alts: Vec<_> = value_query(&env, "xyz").stream().collect();
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0].x, xyz);
        let e = 3.0 * env.noise().error_rate;
        let expected = pr::EXACT.value() * poisson_pdf(e, 0);
        assert!((alts[0].p.value() - expected).abs() < 1e-12);
    }

    #[test]
    fn fuzzy_hits_respect_minimum_probability() {
        let (env, _, xyz) = world();
        let alts: Vec<_> = value_query(&env, "xyy").stream().collect();
        assert_eq!(alts.iter().map(|a| a.x.clone()).collect::<Vec<_>>(), vec![xyz]);
        let floor = env.noise().minimum_probability;
        assert!(alts.iter().all(|a| a.p >= floor));
    }

    #[test]
    fn static_context_hides_instance_fields() {
        let (env, _, _) = world();
        assert!(!value_query(&env, "width").succeeded());
    }

    #[test]
    fn unknown_name_fails() {
        let (env, _, _) = world();
        assert!(!callable_query(&env, "f").succeeded());
        assert!(callable_query(&env, "eval").succeeded());
    }

    #[test]
    fn members_follow_supertypes() {
        let (env, main, _) = world();
        let hits: Vec<_> = static_member_query(&env, &main, "xyz").stream().collect();
        assert_eq!(hits.len(), 1);
        assert!(!static_member_query(&env, &main, "width").succeeded());
        assert!(member_query(&env, &main, "width").succeeded());
    }
}

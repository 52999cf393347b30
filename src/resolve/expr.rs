// src/resolve/expr.rs
//! Denotation of expressions.
//!
//! Each function maps one syntactic form to every well-typed meaning it can
//! have in an environment, ranked by the probability that it is what the user
//! meant. Name ambiguity comes from the queries in [`crate::sema::query`];
//! the combinators in [`crate::scored`] keep the joint ranking ordered.

use std::sync::Arc;

use crate::frontend::{AssignOp, BinOp, Expr, PrimType, TypeExpr};
use crate::resolve::denote::{Exp, Lit};
use crate::scored::{LazyScored, Prob, Scored, fail, known, product_all, single, uniform};
use crate::sema::query::{
    callable_query, combined_query, constructors_of, implicit_receivers, member_query,
    package_query, static_member_query, type_member_query, type_query, value_query,
};
use crate::sema::{Env, Item, Type, pr};

/// What the left side of a `.` can denote.
#[derive(Debug, Clone)]
pub(crate) enum Prefix {
    Value(Exp),
    Type(Item),
    Package(Item),
}

/// A method together with the receiver it is called on.
#[derive(Debug, Clone)]
struct Callee {
    receiver: Option<Exp>,
    method: Item,
}

/// Every meaning of `expr` in `env`.
pub fn denote_exp(env: &Env, expr: &Expr) -> Scored<Exp> {
    match expr {
        Expr::Int(n) => known(Exp::Lit(Lit::Int(*n), Type::Int)),
        Expr::Long(n) => known(Exp::Lit(Lit::Long(*n), Type::Long)),
        Expr::Double(x) => known(Exp::Lit(Lit::Double(*x), Type::Double)),
        Expr::Bool(b) => known(Exp::Lit(Lit::Bool(*b), Type::Boolean)),
        Expr::Null => known(Exp::Lit(Lit::Null, Type::Null)),
        Expr::Str(s) => match env.string_class() {
            Some(class) => known(Exp::Lit(Lit::Str(Arc::from(s.as_str())), Type::Class(class.clone()))),
            None => fail(|| "string literals need a string class".to_string()),
        },
        Expr::Paren(inner) => denote_exp(env, inner),
        Expr::Name(name) => denote_name(env, name),
        Expr::Field { target, name } => denote_prefix(env, target).bind({
            let env = env.clone();
            let name = name.clone();
            move |prefix| value_member(&env, prefix, &name)
        }),
        Expr::Call {
            callee,
            args,
            parens,
        } => denote_call(env, callee, args, *parens),
        Expr::New { ty, args, parens } => denote_new(env, ty, args, *parens),
        Expr::Binary { op, lhs, rhs } => denote_binary(env, *op, lhs, rhs),
        Expr::Assign { op, target, value } => denote_assign(env, *op, target, value),
    }
}

fn suspend<A: Clone + 'static>(bound: Prob, f: impl FnOnce() -> Scored<A> + 'static) -> LazyScored<A> {
    LazyScored::new(bound, f)
}

// ===== Names =====

/// A bare name as a value: a visible value item, or a field of some other
/// class reached through an implicit receiver.
fn denote_name(env: &Env, name: &str) -> Scored<Exp> {
    let direct = value_query(env, name).map(Exp::of_value);
    let implicit = suspend(pr::IMPLICIT_RECEIVER, {
        let env = env.clone();
        let name = name.to_string();
        move || {
            foreign_members(&env, &name, |item| item.is_field())
                .bind(move |field| {
                    let receivers = implicit_receivers(&env, &field);
                    let field_name = field.name().to_string();
                    uniform(
                        pr::CERTAIN,
                        receivers
                            .into_iter()
                            .map(|value| Exp::Field {
                                receiver: Some(Box::new(Exp::of_value(value))),
                                field: field.clone(),
                            })
                            .collect(),
                        move || format!("nothing in scope has a field '{field_name}'"),
                    )
                })
                .bias(pr::IMPLICIT_RECEIVER)
        }
    });
    direct.union(implicit).force().clone()
}

/// Instance members named `name` that are not nameable here on their own.
fn foreign_members(env: &Env, name: &str, keep: impl Fn(&Item) -> bool) -> Scored<Item> {
    combined_query(
        env,
        name,
        pr::EXACT,
        |item| (keep(item) && item.is_instance_member() && !env.in_scope(item)).then(|| item.clone()),
        || format!("no member named '{name}'"),
    )
}

/// The left side of a `.`: a value, a type or a package.
pub(crate) fn denote_prefix(env: &Env, expr: &Expr) -> Scored<Prefix> {
    match expr {
        Expr::Name(name) => {
            let values = denote_name(env, name).map(Prefix::Value);
            let types = suspend(pr::EXACT, {
                let env = env.clone();
                let name = name.clone();
                move || {
                    let types = type_query(&env, &name).map(Prefix::Type);
                    let packages = suspend(pr::EXACT, move || package_query(&env, &name).map(Prefix::Package));
                    types.union(packages).force().clone()
                }
            });
            values.union(types).force().clone()
        }
        Expr::Field { target, name } => denote_prefix(env, target).bind({
            let env = env.clone();
            let name = name.clone();
            move |prefix| {
                let nested = match &prefix {
                    Prefix::Type(owner) | Prefix::Package(owner) => {
                        type_member_query(&env, owner, &name).map(Prefix::Type)
                    }
                    Prefix::Value(_) => fail(|| format!("a value has no nested type '{name}'")),
                };
                value_member(&env, prefix, &name)
                    .map(Prefix::Value)
                    .either(nested)
            }
        }),
        other => denote_exp(env, other).map(Prefix::Value),
    }
}

/// `prefix.name` read as a value. A method with no parameters counts as a
/// call missing its parentheses.
fn value_member(env: &Env, prefix: Prefix, name: &str) -> Scored<Exp> {
    let (receiver, members) = match prefix {
        Prefix::Value(receiver) => match receiver.ty() {
            Type::Class(class) => (Some(receiver), member_query(env, &class, name)),
            other => return fail(|| format!("'{other}' has no members")),
        },
        Prefix::Type(owner) => (None, static_member_query(env, &owner, name)),
        Prefix::Package(package) => {
            return fail(|| format!("package '{package}' is not a value"));
        }
    };
    members.bind(move |member| {
        let through_instance = receiver.is_some() && member.is_static();
        let q = if through_instance {
            pr::STATIC_VIA_INSTANCE
        } else {
            pr::CERTAIN
        };
        let receiver = receiver.clone().map(Box::new);
        if member.is_method() {
            if !member.params().is_empty() {
                return fail(|| format!("'{member}' needs arguments"));
            }
            let call = Exp::Call {
                receiver,
                method: member,
                args: Vec::new(),
            };
            return single(call, q * pr::MISSING_PARENS);
        }
        single(
            Exp::Field {
                receiver,
                field: member,
            },
            q,
        )
    })
}

// ===== Calls =====

fn denote_callee(env: &Env, callee: &Expr) -> Scored<Callee> {
    match callee {
        Expr::Name(name) => {
            let direct = callable_query(env, name).map(|method| Callee {
                receiver: None,
                method,
            });
            let implicit = suspend(pr::IMPLICIT_RECEIVER, {
                let env = env.clone();
                let name = name.clone();
                move || {
                    foreign_members(&env, &name, |item| item.is_method())
                        .bind(move |method| {
                            let method_name = method.name().to_string();
                            uniform(
                                pr::CERTAIN,
                                implicit_receivers(&env, &method)
                                    .into_iter()
                                    .map(|value| Callee {
                                        receiver: Some(Exp::of_value(value)),
                                        method: method.clone(),
                                    })
                                    .collect(),
                                move || format!("nothing in scope has a method '{method_name}'"),
                            )
                        })
                        .bias(pr::IMPLICIT_RECEIVER)
                }
            });
            direct.union(implicit).force().clone()
        }
        Expr::Field { target, name } => denote_prefix(env, target).bind({
            let env = env.clone();
            let name = name.clone();
            move |prefix| {
                let (receiver, members) = match prefix {
                    Prefix::Value(receiver) => match receiver.ty() {
                        Type::Class(class) => (Some(receiver), member_query(&env, &class, &name)),
                        other => return fail(|| format!("'{other}' has no methods")),
                    },
                    Prefix::Type(owner) => (None, static_member_query(&env, &owner, &name)),
                    Prefix::Package(package) => {
                        return fail(|| format!("package '{package}' has no methods"));
                    }
                };
                members.bind(move |method| {
                    if !method.is_method() {
                        return fail(|| format!("'{method}' is not a method"));
                    }
                    let q = if receiver.is_some() && method.is_static() {
                        pr::STATIC_VIA_INSTANCE
                    } else {
                        pr::CERTAIN
                    };
                    single(
                        Callee {
                            receiver: receiver.clone(),
                            method,
                        },
                        q,
                    )
                })
            }
        }),
        Expr::Paren(inner) => denote_callee(env, inner),
        other => fail(|| format!("'{other}' cannot be called")),
    }
}

fn denote_args(env: &Env, args: &[Expr]) -> Scored<Vec<Exp>> {
    product_all(args.iter().map(|arg| denote_exp(env, arg)).collect())
}

/// Whether `args` fit the parameter list `params`.
fn applicable(params: &[Type], args: &[Exp]) -> bool {
    params.len() == args.len()
        && params
            .iter()
            .zip(args)
            .all(|(param, arg)| arg.ty().assignable_to(param))
}

fn denote_call(env: &Env, callee: &Expr, args: &[Expr], parens: bool) -> Scored<Exp> {
    let arity = args.len();
    let calls = denote_callee(env, callee)
        .product(denote_args(env, args))
        .filter(
            |(callee, args)| applicable(callee.method.params(), args),
            move || format!("no method accepts these {arity} argument(s)"),
        )
        .map(|(callee, args)| Exp::Call {
            receiver: callee.receiver.map(Box::new),
            method: callee.method,
            args,
        });
    if parens {
        calls
    } else {
        calls.bias(pr::MISSING_PARENS)
    }
}

// ===== Types and instance creation =====

/// Classes a possibly qualified type name can denote.
pub fn denote_class(env: &Env, path: &[String]) -> Scored<Item> {
    let Some((first, rest)) = path.split_first() else {
        return fail(|| "empty type name".to_string());
    };
    let head = if rest.is_empty() {
        type_query(env, first)
    } else {
        type_query(env, first).either(package_query(env, first))
    };
    rest.iter()
        .fold(head, |owners, segment| {
            let env = env.clone();
            let segment = segment.clone();
            owners.bind(move |owner| type_member_query(&env, &owner, &segment))
        })
        .filter(Item::is_type, {
            let path = path.join(".");
            move || format!("'{path}' is not a type")
        })
}

pub fn denote_type(env: &Env, ty: &TypeExpr) -> Scored<Type> {
    match ty {
        TypeExpr::Prim(prim) => known(match prim {
            PrimType::Boolean => Type::Boolean,
            PrimType::Char => Type::Char,
            PrimType::Int => Type::Int,
            PrimType::Long => Type::Long,
            PrimType::Float => Type::Float,
            PrimType::Double => Type::Double,
        }),
        TypeExpr::Named(path) => denote_class(env, path).map(Type::Class),
        TypeExpr::Array(element) => denote_type(env, element).map(Type::array_of),
    }
}

fn denote_new(env: &Env, ty: &TypeExpr, args: &[Expr], parens: bool) -> Scored<Exp> {
    let TypeExpr::Named(path) = ty else {
        return fail(|| format!("cannot instantiate '{ty}'"));
    };
    let constructors = denote_class(env, path).bind({
        let env = env.clone();
        move |class| {
            let name = class.name().to_string();
            uniform(pr::CERTAIN, constructors_of(&env, &class), move || {
                format!("'{name}' has no constructors")
            })
        }
    });
    let created = constructors
        .product(denote_args(env, args))
        .filter(
            |(constructor, args)| applicable(constructor.params(), args),
            || "no constructor accepts these arguments".to_string(),
        )
        .map(|(constructor, args)| Exp::New { constructor, args });
    if parens {
        created
    } else {
        created.bias(pr::MISSING_PARENS)
    }
}

// ===== Operators =====

fn is_string(env: &Env, ty: &Type) -> bool {
    matches!((ty.class_item(), env.string_class()), (Some(a), Some(b)) if a == b)
}

/// Result type of `lhs op rhs`, or `None` if the operator does not apply.
pub fn binary_type(env: &Env, op: BinOp, lhs: &Type, rhs: &Type) -> Option<Type> {
    match op {
        BinOp::Add if is_string(env, lhs) || is_string(env, rhs) => {
            let string = if is_string(env, lhs) { lhs } else { rhs };
            (*lhs != Type::Void && *rhs != Type::Void).then(|| string.clone())
        }
        _ if op.is_arithmetic() => Type::promote(lhs, rhs),
        _ if op.is_comparison() => Type::promote(lhs, rhs).map(|_| Type::Boolean),
        _ if op.is_equality() => {
            let numeric = lhs.is_numeric() && rhs.is_numeric();
            let boolean = *lhs == Type::Boolean && *rhs == Type::Boolean;
            let reference = lhs.is_reference()
                && rhs.is_reference()
                && (lhs.assignable_to(rhs) || rhs.assignable_to(lhs));
            (numeric || boolean || reference).then_some(Type::Boolean)
        }
        _ => (*lhs == Type::Boolean && *rhs == Type::Boolean).then_some(Type::Boolean),
    }
}

fn denote_binary(env: &Env, op: BinOp, lhs: &Expr, rhs: &Expr) -> Scored<Exp> {
    let env = env.clone();
    denote_exp(&env, lhs)
        .product(denote_exp(&env, rhs))
        .bind(move |(lhs, rhs)| match binary_type(&env, op, &lhs.ty(), &rhs.ty()) {
            Some(ty) => known(Exp::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                ty,
            }),
            None => fail(|| {
                format!(
                    "'{}' cannot be applied to '{}' and '{}'",
                    op.as_str(),
                    lhs.ty(),
                    rhs.ty()
                )
            }),
        })
}

/// Whether `value` may be stored into `target` by `op`.
fn assignable(env: &Env, op: AssignOp, target: &Type, value: &Type) -> bool {
    match op.binary() {
        None => value.assignable_to(target),
        Some(bin) => binary_type(env, bin, target, value)
            .is_some_and(|result| target.is_numeric() || result.assignable_to(target)),
    }
}

fn denote_assign(env: &Env, op: AssignOp, target: &Expr, value: &Expr) -> Scored<Exp> {
    let env = env.clone();
    let targets = denote_exp(&env, target).filter(Exp::is_lvalue, || "cannot assign to this".to_string());
    targets
        .product(denote_exp(&env, value))
        .filter(
            move |(target, value)| assignable(&env, op, &target.ty(), &value.ty()),
            move || format!("incompatible types in '{}'", op.as_str()),
        )
        .map(move |(target, value)| Exp::Assign {
            op,
            target: Box::new(target),
            value: Box::new(value),
        })
}

// src/resolve/stmt.rs
//
// Denotation of statements. A statement may change the environment (a
// declaration adds a local), so every denotation carries the environment the
// next statement sees.

use std::sync::Arc;

use crate::frontend::{self as ast, Expr, TypeExpr};
use crate::resolve::denote::{Exp, Stmt};
use crate::resolve::expr::{denote_exp, denote_type};
use crate::scored::{Scored, fail, known};
use crate::sema::{Env, Type};

/// Every meaning of `stmt` in `env`, with the environment after it.
pub fn denote_stmt(env: &Env, stmt: &ast::Stmt) -> Scored<(Env, Stmt)> {
    match stmt {
        ast::Stmt::Empty => known((env.clone(), Stmt::Empty)),
        ast::Stmt::Expr(expr) => {
            let env = env.clone();
            denote_exp(&env, expr)
                .filter(Exp::is_statement_expression, || {
                    "not a statement: only assignments, calls and creation stand alone".to_string()
                })
                .map(move |e| (env.clone(), Stmt::Expr(e)))
        }
        ast::Stmt::Decl {
            is_final,
            ty,
            name,
            init,
        } => denote_decl(env, *is_final, ty, name, init.as_ref()),
        ast::Stmt::Return(value) => denote_return(env, value.as_ref()),
        ast::Stmt::Break(label) => denote_jump(env, label.as_deref(), false),
        ast::Stmt::Continue(label) => denote_jump(env, label.as_deref(), true),
        ast::Stmt::Block(body) => denote_stmts(&env.push_scope(), body)
            .map(|(inner, stmts)| (inner.pop_scope(), Stmt::Block(stmts))),
    }
}

/// Denote a statement list left to right, threading the environment.
pub fn denote_stmts(env: &Env, stmts: &[ast::Stmt]) -> Scored<(Env, Vec<Stmt>)> {
    stmts
        .iter()
        .fold(known((env.clone(), Vec::new())), |acc, stmt| {
            let stmt = stmt.clone();
            acc.bind(move |(env, done)| {
                denote_stmt(&env, &stmt).map(move |(env, s)| {
                    let mut done = done.clone();
                    done.push(s);
                    (env, done)
                })
            })
        })
}

fn denote_decl(
    env: &Env,
    is_final: bool,
    ty: &TypeExpr,
    name: &str,
    init: Option<&Expr>,
) -> Scored<(Env, Stmt)> {
    let typed = denote_type(env, ty).filter(|ty| *ty != Type::Void, || "variables cannot be void".to_string());
    let with_init: Scored<(Type, Option<Exp>)> = match init {
        None => typed.map(|ty| (ty, None)),
        Some(init) => typed
            .product(denote_exp(env, init))
            .filter(
                |(ty, init)| init.ty().assignable_to(ty),
                || "initializer does not match the declared type".to_string(),
            )
            .map(|(ty, init)| (ty, Some(init))),
    };
    let env = env.clone();
    let name = name.to_string();
    with_init.bind(move |(ty, init)| {
        env.new_variable(&name, ty, is_final)
            .map(move |(env, item)| {
                (
                    env,
                    Stmt::Var {
                        item,
                        init: init.clone(),
                    },
                )
            })
    })
}

fn denote_return(env: &Env, value: Option<&Expr>) -> Scored<(Env, Stmt)> {
    let Some(expected) = env.place().return_type() else {
        return fail(|| "return outside of a method".to_string());
    };
    let after = env.clone();
    match value {
        None if expected == Type::Void => known((after, Stmt::Return(None))),
        None => fail(|| format!("missing return value of type '{expected}'")),
        Some(_) if expected == Type::Void => fail(|| "cannot return a value from a void method".to_string()),
        Some(value) => denote_exp(env, value)
            .filter(
                move |e| e.ty().assignable_to(&expected),
                || "returned value does not match the return type".to_string(),
            )
            .map(move |e| (after.clone(), Stmt::Return(Some(e)))),
    }
}

fn denote_jump(env: &Env, label: Option<&str>, is_continue: bool) -> Scored<(Env, Stmt)> {
    let flow = env.flow();
    let keyword = if is_continue { "continue" } else { "break" };
    if let Some(label) = label {
        if !flow.has_label(label) {
            return fail(|| format!("no enclosing statement is labeled '{label}'"));
        }
    } else if is_continue && !flow.can_continue {
        return fail(|| format!("'{keyword}' outside of a loop"));
    } else if !is_continue && !flow.can_break {
        return fail(|| format!("'{keyword}' outside of a loop or switch"));
    }
    let label: Option<Arc<str>> = label.map(Arc::from);
    let stmt = if is_continue {
        Stmt::Continue(label)
    } else {
        Stmt::Break(label)
    };
    known((env.clone(), stmt))
}

// src/resolve/driver.rs
//! Whole-fragment resolution.
//!
//! The parser hands back every plausible tree for a token stream. Each tree is
//! denoted lazily behind a certain bound and the suspensions are unioned in
//! the order the parser produced them, so equal-probability meanings keep
//! source order and trees nobody reads are never denoted.

use crate::config::DEFAULT_LIMIT;
use crate::errors::{DriverError, ParserError};
use crate::frontend::{Parser, Token, Tree, TreeSource};
use crate::resolve::denote::Stmt;
use crate::resolve::stmt::denote_stmts;
use crate::scored::{Alt, LazyScored, Prob, Scored, fail};
use crate::sema::Env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// How many alternatives [`Resolution::top`] yields.
    pub limit: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

/// The ranked meanings of one fragment.
pub struct Resolution {
    /// Every meaning, best first, with the environment after the fragment.
    pub scored: Scored<(Env, Vec<Stmt>)>,
    /// Distinct trees the parser produced.
    pub trees: Vec<Tree>,
    /// Parser defects noticed along the way. They never abort resolution.
    pub defects: Vec<DriverError>,
    limit: usize,
}

impl Resolution {
    pub fn succeeded(&self) -> bool {
        self.scored.succeeded()
    }

    /// The best `limit` meanings, forcing only as much as needed.
    pub fn top(&self) -> Vec<Alt<Vec<Stmt>>> {
        self.scored
            .clone()
            .stream()
            .take(self.limit)
            .map(|alt| Alt::new(alt.p, alt.x.1))
            .collect()
    }
}

pub struct Resolver<S = Parser> {
    source: S,
    options: ResolveOptions,
}

impl Default for Resolver<Parser> {
    fn default() -> Self {
        Self::new(Parser::new())
    }
}

impl<S: TreeSource> Resolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: ResolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve a token stream in `env`.
    ///
    /// Fails only when the tokens admit no parse at all. A fragment that
    /// parses but means nothing yields a failed [`Resolution::scored`].
    #[tracing::instrument(skip_all, fields(tokens = tokens.len()))]
    pub fn resolve(&self, tokens: &[Token], env: &Env) -> Result<Resolution, ParserError> {
        let parsed = self.source.trees(tokens)?;
        let (trees, defects) = dedup_trees(parsed);
        tracing::debug!(trees = trees.len(), "parsed fragment");

        let scored = trees
            .iter()
            .rev()
            .fold(None, |rest: Option<LazyScored<_>>, tree| {
                let env = env.clone();
                let tree = tree.clone();
                let this = LazyScored::new(Prob::CERTAIN, move || denote_stmts(&env, &tree));
                Some(match rest {
                    Some(rest) => this.union(rest),
                    None => this,
                })
            })
            .map(|all| all.force().clone())
            .unwrap_or_else(|| fail(|| "the fragment has no parse".to_string()));

        Ok(Resolution {
            scored,
            trees,
            defects,
            limit: self.options.limit,
        })
    }
}

/// Drop repeated trees, keeping the first of each, and report the repeats.
fn dedup_trees(parsed: Vec<Tree>) -> (Vec<Tree>, Vec<DriverError>) {
    let mut trees: Vec<Tree> = Vec::with_capacity(parsed.len());
    let mut first_index: Vec<usize> = Vec::with_capacity(parsed.len());
    let mut defects = Vec::new();
    for (index, tree) in parsed.into_iter().enumerate() {
        match trees.iter().position(|seen| *seen == tree) {
            Some(at) => {
                let first = first_index[at];
                tracing::error!(first, duplicate = index, "parser produced a duplicate tree");
                defects.push(DriverError::DuplicateTree {
                    first,
                    duplicate: index,
                });
            }
            None => {
                trees.push(tree);
                first_index.push(index);
            }
        }
    }
    (trees, defects)
}

/// Resolve with the default parser and options.
pub fn resolve(tokens: &[Token], env: &Env) -> Result<Resolution, ParserError> {
    Resolver::new(Parser::new()).resolve(tokens, env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{Expr, Stmt as Syntax, lex};
    use crate::sema::prelude::{PreludeOptions, environment};
    use crate::sema::Type;

    fn env() -> Env {
        environment(&PreludeOptions {
            locals: vec![("x".to_string(), Type::Int), ("y".to_string(), Type::Int)],
            ..PreludeOptions::default()
        })
        .unwrap()
    }

    #[test]
    fn duplicates_are_reported_and_dropped() {
        let tree = vec![Syntax::Empty];
        let (trees, defects) = dedup_trees(vec![tree.clone(), vec![], tree]);
        assert_eq!(trees.len(), 2);
        assert_eq!(
            defects,
            vec![DriverError::DuplicateTree {
                first: 0,
                duplicate: 2
            }]
        );
    }

    #[test]
    fn no_trees_means_failure() {
        let none = |_: &[Token]| -> Result<Vec<Tree>, ParserError> { Ok(Vec::new()) };
        let resolution = Resolver::new(none).resolve(&[], &env()).unwrap();
        assert!(!resolution.succeeded());
        assert!(resolution.top().is_empty());
    }

    #[test]
    fn limit_caps_the_listing() {
        let tokens = lex("x = 1").unwrap();
        let resolution = Resolver::new(Parser::new())
            .with_options(ResolveOptions { limit: 0 })
            .resolve(&tokens, &env())
            .unwrap();
        assert!(resolution.succeeded());
        assert!(resolution.top().is_empty());
    }

    #[test]
    fn equally_likely_trees_keep_source_order() {
        let assign = |name: &str| {
            vec![Syntax::Expr(Expr::Assign {
                op: crate::frontend::AssignOp::Assign,
                target: Box::new(Expr::Name(name.to_string())),
                value: Box::new(Expr::Int(1)),
            })]
        };
        let trees = vec![assign("x"), assign("y")];
        let source = move |_: &[Token]| -> Result<Vec<Tree>, ParserError> { Ok(trees.clone()) };
        let resolution = Resolver::new(source).resolve(&[], &env()).unwrap();
        let best = resolution.scored.best().unwrap();
        assert_eq!(best.1[0].to_string(), "x = 1;");
    }
}

// src/commands/resolve.rs

use std::process::ExitCode;

use rustc_hash::FxHashSet;

use super::common::{TermColors, render, render_in_fragment};
use crate::cli::{ColorMode, ResolveArgs};
use crate::errors::UsageError;
use crate::frontend::{Parser, lex};
use crate::resolve::{ResolveOptions, Resolver};
use crate::scored::Scored;
use crate::sema::{Flow, Prelude, PreludeOptions};

/// Translate command-line context flags into prelude options.
pub fn prelude_options(prelude: &Prelude, args: &ResolveArgs) -> Result<PreludeOptions, UsageError> {
    let mut seen = FxHashSet::default();
    let mut locals = Vec::with_capacity(args.locals.len());
    for binding in &args.locals {
        if !seen.insert(binding.name.as_str()) {
            return Err(UsageError::LocalRejected {
                name: binding.name.clone(),
            });
        }
        locals.push((binding.name.clone(), prelude.parse_type(&binding.ty)?));
    }

    let mut flow = if args.in_loop {
        Flow::in_loop()
    } else if args.in_switch {
        Flow::in_switch()
    } else {
        Flow::default()
    };
    for label in &args.labels {
        flow = flow.with_label(label);
    }

    Ok(PreludeOptions {
        is_static: args.is_static,
        returns: prelude.parse_type(&args.returns)?,
        flow,
        locals,
    })
}

/// Resolve a fragment against the prelude and print its best meanings.
pub fn resolve_fragment(args: &ResolveArgs, color: ColorMode) -> ExitCode {
    let prelude = Prelude::new();
    let options = match prelude_options(&prelude, args) {
        Ok(options) => options,
        Err(e) => {
            render(&e, color);
            return ExitCode::FAILURE;
        }
    };
    let env = match prelude.environment(&options) {
        Ok(env) => env,
        Err(e) => {
            render(&e, color);
            return ExitCode::FAILURE;
        }
    };

    let tokens = match lex(&args.fragment) {
        Ok(tokens) => tokens,
        Err(errors) => {
            render_in_fragment(errors, &args.fragment, color);
            return ExitCode::FAILURE;
        }
    };

    let resolver = Resolver::new(Parser::new()).with_options(ResolveOptions { limit: args.limit });
    let resolution = match resolver.resolve(&tokens, &env) {
        Ok(resolution) => resolution,
        Err(e) => {
            render_in_fragment([e], &args.fragment, color);
            return ExitCode::FAILURE;
        }
    };
    for defect in &resolution.defects {
        render(defect, color);
    }

    if !resolution.succeeded() {
        eprintln!("error: no meaning found for '{}'", args.fragment);
        if let Scored::Bad(e) = &resolution.scored {
            render(e, color);
        }
        return ExitCode::FAILURE;
    }

    let colors = TermColors::new(color);
    for (rank, alt) in resolution.top().into_iter().enumerate() {
        let text = alt
            .x
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let (start, end) = if rank == 0 {
            (colors.green(), colors.reset())
        } else {
            ("", "")
        };
        println!("{}{}{}  {start}{text}{end}", colors.dim(), alt.p, colors.reset());
    }
    ExitCode::SUCCESS
}

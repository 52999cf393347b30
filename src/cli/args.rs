// src/cli/args.rs

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::commands::version::version_string;
use crate::config::DEFAULT_LIMIT;
use crate::errors::UsageError;

/// Color output mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Ranked resolution of broken code fragments
#[derive(Parser)]
#[command(name = "rankfix")]
#[command(version = version_string())]
#[command(about = "Rank the likely meanings of a broken code fragment", long_about = None)]
pub struct Cli {
    /// Color output: auto, always, never
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a fragment and print its most likely meanings
    #[command(visible_alias = "r")]
    Resolve(ResolveArgs),
    /// Print version information
    Version,
}

/// A local variable in scope where the fragment is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub ty: String,
}

impl std::str::FromStr for Binding {
    type Err = UsageError;

    fn from_str(binding: &str) -> Result<Self, Self::Err> {
        let malformed = || UsageError::MalformedBinding {
            binding: binding.to_string(),
        };
        let (name, ty) = binding.split_once(':').ok_or_else(malformed)?;
        let (name, ty) = (name.trim(), ty.trim());
        let is_ident = name
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_alphanumeric() || c == '_');
        if !is_ident || ty.is_empty() {
            return Err(malformed());
        }
        Ok(Binding {
            name: name.to_string(),
            ty: ty.to_string(),
        })
    }
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// The fragment to resolve, e.g. 'x = 1' or 'print x'
    #[arg(value_name = "FRAGMENT")]
    pub fragment: String,

    /// Local variable in scope, as NAME:TYPE (repeatable)
    #[arg(long = "local", value_name = "NAME:TYPE")]
    pub locals: Vec<Binding>,

    /// Resolve inside a static method
    #[arg(long = "static")]
    pub is_static: bool,

    /// Resolve inside a loop (allows break and continue)
    #[arg(long = "loop", conflicts_with = "in_switch")]
    pub in_loop: bool,

    /// Resolve inside a switch (allows break)
    #[arg(long = "switch")]
    pub in_switch: bool,

    /// Label of an enclosing statement (repeatable)
    #[arg(long = "label", value_name = "NAME")]
    pub labels: Vec<String>,

    /// Return type of the enclosing method
    #[arg(long, value_name = "TYPE", default_value = "void")]
    pub returns: String,

    /// Number of meanings to print
    #[arg(long, value_name = "N", default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_resolve_flags() {
        let cli = Cli::try_parse_from([
            "rankfix", "resolve", "x = 1", "--local", "x:int", "--local", "s:String", "--loop",
            "--label", "outer", "--returns", "int", "--limit", "3",
        ])
        .unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.fragment, "x = 1");
        assert_eq!(args.locals.len(), 2);
        assert_eq!(args.locals[1].ty, "String");
        assert!(args.in_loop && !args.in_switch && !args.is_static);
        assert_eq!(args.labels, vec!["outer".to_string()]);
        assert_eq!(args.returns, "int");
        assert_eq!(args.limit, 3);
    }

    #[test]
    fn malformed_bindings_are_rejected() {
        assert!("x".parse::<Binding>().is_err());
        assert!("1x:int".parse::<Binding>().is_err());
        assert!("x:".parse::<Binding>().is_err());
        assert_eq!(
            "n : int[]".parse::<Binding>().unwrap(),
            Binding {
                name: "n".to_string(),
                ty: "int[]".to_string()
            }
        );
    }

    #[test]
    fn loop_and_switch_conflict() {
        assert!(Cli::try_parse_from(["rankfix", "resolve", "break", "--loop", "--switch"]).is_err());
    }
}

// src/cli/mod.rs
pub mod args;

pub use args::{Binding, Cli, ColorMode, Commands, ResolveArgs};

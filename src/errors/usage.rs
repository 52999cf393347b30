// src/errors/usage.rs
//! Command-line input errors (E4xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("malformed binding '{binding}'")]
    #[diagnostic(code(E4001), help("bindings are written NAME:TYPE, for example 'x:int'"))]
    MalformedBinding { binding: String },

    #[error("unknown type '{name}'")]
    #[diagnostic(code(E4002))]
    UnknownType { name: String },

    #[error("cannot declare local '{name}'")]
    #[diagnostic(code(E4003), help("a local with this name is already in scope"))]
    LocalRejected { name: String },
}

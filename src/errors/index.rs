// src/errors/index.rs
//! Environment consistency errors (E1xxx).
//!
//! These are broken invariants in an environment handed over by an indexer,
//! never ambiguity in user input.

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("place '{place}' is not indexed under its own name")]
    #[diagnostic(
        code(E1001),
        help("every item enclosing the place must be added to the environment")
    )]
    PlaceNotIndexed { place: String },

    #[error("'{item}' is declared in '{parent}', which is not indexed")]
    #[diagnostic(code(E1002))]
    MissingParent { item: String, parent: String },

    #[error("'{class}' extends '{supertype}', which is not indexed")]
    #[diagnostic(code(E1003))]
    MissingSupertype { class: String, supertype: String },

    #[error("'{place}' cannot be a place")]
    #[diagnostic(
        code(E1004),
        help("only packages, classes, methods and constructors can enclose code")
    )]
    ImpossiblePlace { place: String },
}

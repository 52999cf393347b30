// src/errors/driver.rs
//! Defects detected while driving resolution (E3xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("parser produced tree #{duplicate} twice (first as #{first})")]
    #[diagnostic(
        code(E3001),
        severity(Warning),
        help("this is a parser defect; the duplicate tree was ignored")
    )]
    DuplicateTree { first: usize, duplicate: usize },
}

// src/errors/parser.rs
//! Parser errors (E2xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("expected {expected}, found '{found}'")]
    #[diagnostic(code(E2001))]
    Unexpected {
        expected: String,
        found: String,
        #[label("no reading of the fragment gets past this point")]
        span: SourceSpan,
    },

    #[error("trailing input after a complete fragment")]
    #[diagnostic(code(E2002), help("only statements and expressions can be resolved"))]
    Trailing {
        #[label("unexpected here")]
        span: SourceSpan,
    },
}

impl ParserError {
    /// Where parsing stopped.
    pub fn offset(&self) -> usize {
        match self {
            ParserError::Unexpected { span, .. } | ParserError::Trailing { span } => span.offset(),
        }
    }
}

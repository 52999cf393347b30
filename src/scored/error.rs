// src/scored/error.rs
//! Diagnostics kept by failed searches.

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic;
use thiserror::Error as ThisError;

/// Why a search produced no alternatives.
///
/// Only built when [`crate::config::TRACK_ERRORS`] is on.
#[derive(ThisError, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A leaf diagnostic.
    #[error("{0}")]
    One(String),

    /// Several failing branches, reported together.
    #[error("{message}")]
    Nest {
        message: String,
        #[related]
        children: Vec<Error>,
    },
}

impl Error {
    pub fn one(message: impl Into<String>) -> Self {
        Error::One(message.into())
    }

    pub fn nest(message: impl Into<String>, children: Vec<Error>) -> Self {
        Error::Nest {
            message: message.into(),
            children,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Error::One(message) | Error::Nest { message, .. } => message,
        }
    }

    pub fn children(&self) -> &[Error] {
        match self {
            Error::One(_) => &[],
            Error::Nest { children, .. } => children,
        }
    }

    /// Indented multi-line rendering of the whole tree.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(self.message());
        out.push('\n');
        for child in self.children() {
            child.render_into(out, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nest_keeps_both_children() {
        let e = Error::nest(
            "either failed",
            vec![Error::one("no type x"), Error::one("no value x")],
        );
        assert_eq!(e.message(), "either failed");
        assert_eq!(e.children().len(), 2);
        assert_eq!(e.to_string(), "either failed");
    }

    #[test]
    fn render_tree_indents_children() {
        let e = Error::nest(
            "outer",
            vec![Error::nest("inner", vec![Error::one("leaf")])],
        );
        assert_eq!(e.render_tree(), "outer\n  inner\n    leaf\n");
    }

    #[test]
    fn related_exposes_children() {
        let e = Error::nest("outer", vec![Error::one("a"), Error::one("b")]);
        let related: Vec<String> = e
            .related()
            .map(|it| it.map(|d| d.to_string()).collect())
            .unwrap_or_default();
        assert_eq!(related, vec!["a".to_string(), "b".to_string()]);
    }
}

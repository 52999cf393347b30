// src/errors/mod.rs
//! Structured error reporting.
//!
//! Ambiguity failures stay inside the scored algebra; the types here cover
//! lexing, parsing, broken environment invariants, driver defects and CLI
//! input, all rendered through miette.

pub mod driver;
pub mod index;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod usage;

pub use driver::DriverError;
pub use index::IndexError;
pub use lexer::LexerError;
pub use parser::ParserError;
pub use report::{render_to_stderr, render_to_string, render_to_writer};
pub use usage::UsageError;

// src/resolve/mod.rs
//! Turning candidate parse trees into ranked, type-checked meanings.

pub mod denote;
pub mod driver;
pub mod expr;
pub mod stmt;

pub use denote::{Exp, Lit, Stmt};
pub use driver::{ResolveOptions, Resolution, Resolver, resolve};
pub use expr::{binary_type, denote_class, denote_exp, denote_type};
pub use stmt::{denote_stmt, denote_stmts};

// src/frontend/mod.rs
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{AssignOp, BinOp, Expr, PrimType, Stmt, Tree, TypeExpr};
pub use lexer::{Lexer, lex};
pub use parser::{MAX_TREES, Parser, TreeSource};
pub use token::{Span, Token, TokenType};

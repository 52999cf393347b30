// src/frontend/ast.rs
//
// Surface syntax of a fragment. Trees carry no spans: two parses that read
// the same are equal.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self, Self::Lt | Self::Gt | Self::Le | Self::Ge)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
        }
    }

    /// The arithmetic a compound assignment performs.
    pub fn binary(&self) -> Option<BinOp> {
        match self {
            Self::Assign => None,
            Self::Add => Some(BinOp::Add),
            Self::Sub => Some(BinOp::Sub),
            Self::Mul => Some(BinOp::Mul),
            Self::Div => Some(BinOp::Div),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimType {
    Boolean,
    Char,
    Int,
    Long,
    Float,
    Double,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Prim(PrimType),
    /// A possibly qualified name: `String`, `lang.String`.
    Named(Vec<String>),
    Array(Box<TypeExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(String),
    Int(i64),
    Long(i64),
    Double(f64),
    Str(String),
    Bool(bool),
    Null,
    Field {
        target: Box<Expr>,
        name: String,
    },
    /// `parens` is false for juxtaposition: `f x`.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        parens: bool,
    },
    New {
        ty: TypeExpr,
        args: Vec<Expr>,
        parens: bool,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Decl {
        is_final: bool,
        ty: TypeExpr,
        name: String,
        init: Option<Expr>,
    },
    Return(Option<Expr>),
    Break(Option<String>),
    Continue(Option<String>),
    Empty,
    Block(Vec<Stmt>),
}

/// One candidate parse of a whole fragment.
pub type Tree = Vec<Stmt>;

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Prim(prim) => write!(f, "{}", format!("{prim:?}").to_lowercase()),
            TypeExpr::Named(path) => write!(f, "{}", path.join(".")),
            TypeExpr::Array(element) => write!(f, "{element}[]"),
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Expr], sep: &str) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(name) => f.write_str(name),
            Expr::Int(n) => write!(f, "{n}"),
            Expr::Long(n) => write!(f, "{n}L"),
            Expr::Double(x) => write!(f, "{x:?}"),
            Expr::Str(s) => write!(f, "{s:?}"),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Null => f.write_str("null"),
            Expr::Field { target, name } => write!(f, "{target}.{name}"),
            Expr::Call {
                callee,
                args,
                parens: true,
            } => {
                write!(f, "{callee}(")?;
                write_args(f, args, ", ")?;
                f.write_str(")")
            }
            Expr::Call { callee, args, .. } => {
                write!(f, "{callee} ")?;
                write_args(f, args, " ")
            }
            Expr::New { ty, args, parens } => {
                write!(f, "new {ty}")?;
                if *parens {
                    f.write_str("(")?;
                    write_args(f, args, ", ")?;
                    f.write_str(")")?;
                }
                Ok(())
            }
            Expr::Binary { op, lhs, rhs } => write!(f, "{lhs} {} {rhs}", op.as_str()),
            Expr::Assign { op, target, value } => write!(f, "{target} {} {value}", op.as_str()),
            Expr::Paren(inner) => write!(f, "({inner})"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expr(e) => write!(f, "{e};"),
            Stmt::Decl {
                is_final,
                ty,
                name,
                init,
            } => {
                if *is_final {
                    f.write_str("final ")?;
                }
                write!(f, "{ty} {name}")?;
                if let Some(init) = init {
                    write!(f, " = {init}")?;
                }
                f.write_str(";")
            }
            Stmt::Return(None) => f.write_str("return;"),
            Stmt::Return(Some(e)) => write!(f, "return {e};"),
            Stmt::Break(None) => f.write_str("break;"),
            Stmt::Break(Some(label)) => write!(f, "break {label};"),
            Stmt::Continue(None) => f.write_str("continue;"),
            Stmt::Continue(Some(label)) => write!(f, "continue {label};"),
            Stmt::Empty => f.write_str(";"),
            Stmt::Block(stmts) => {
                f.write_str("{ ")?;
                for stmt in stmts {
                    write!(f, "{stmt} ")?;
                }
                f.write_str("}")
            }
        }
    }
}

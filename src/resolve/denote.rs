// src/resolve/denote.rs
//
// Resolved, type-checked meanings of fragments.

use std::fmt;
use std::sync::Arc;

use crate::frontend::{AssignOp, BinOp};
use crate::sema::{Item, Type};

#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Int(i64),
    Long(i64),
    Double(f64),
    Str(Arc<str>),
    Bool(bool),
    Null,
}

/// A resolved expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Exp {
    Lit(Lit, Type),
    Local(Item),
    /// A field or enum constant. No receiver means a static access or a
    /// field of `this`.
    Field {
        receiver: Option<Box<Exp>>,
        field: Item,
    },
    Call {
        receiver: Option<Box<Exp>>,
        method: Item,
        args: Vec<Exp>,
    },
    New {
        constructor: Item,
        args: Vec<Exp>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Exp>,
        rhs: Box<Exp>,
        ty: Type,
    },
    Assign {
        op: AssignOp,
        target: Box<Exp>,
        value: Box<Exp>,
    },
}

impl Exp {
    /// The expression a value item denotes when named directly.
    pub fn of_value(item: Item) -> Exp {
        if item.is_local() {
            Exp::Local(item)
        } else {
            Exp::Field {
                receiver: None,
                field: item,
            }
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Exp::Lit(_, ty) | Exp::Binary { ty, .. } => ty.clone(),
            Exp::Local(item) | Exp::Field { field: item, .. } => item.value_type().unwrap_or(Type::Void),
            Exp::Call { method, .. } => method.return_type().unwrap_or(Type::Void),
            Exp::New { constructor, .. } => constructor.return_type().unwrap_or(Type::Void),
            Exp::Assign { target, .. } => target.ty(),
        }
    }

    /// Whether this can be assigned to.
    pub fn is_lvalue(&self) -> bool {
        match self {
            Exp::Local(item) | Exp::Field { field: item, .. } => !item.is_final(),
            _ => false,
        }
    }

    /// Only assignments, calls and instance creation stand alone as statements.
    pub fn is_statement_expression(&self) -> bool {
        matches!(self, Exp::Assign { .. } | Exp::Call { .. } | Exp::New { .. })
    }
}

/// A resolved statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Exp),
    Var { item: Item, init: Option<Exp> },
    Return(Option<Exp>),
    Break(Option<Arc<str>>),
    Continue(Option<Arc<str>>),
    Empty,
    Block(Vec<Stmt>),
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lit::Int(n) => write!(f, "{n}"),
            Lit::Long(n) => write!(f, "{n}L"),
            Lit::Double(x) => write!(f, "{x:?}"),
            Lit::Str(s) => write!(f, "{s:?}"),
            Lit::Bool(b) => write!(f, "{b}"),
            Lit::Null => f.write_str("null"),
        }
    }
}

/// Operands that would change meaning without parentheses.
fn write_operand(f: &mut fmt::Formatter<'_>, e: &Exp) -> fmt::Result {
    match e {
        Exp::Binary { .. } | Exp::Assign { .. } => write!(f, "({e})"),
        _ => write!(f, "{e}"),
    }
}

fn write_member(f: &mut fmt::Formatter<'_>, receiver: &Option<Box<Exp>>, member: &Item) -> fmt::Result {
    match (receiver, member.parent()) {
        (Some(receiver), _) => {
            write_operand(f, receiver)?;
            write!(f, ".{member}")
        }
        (None, Some(owner)) if member.is_static() && owner.is_type() => write!(f, "{owner}.{member}"),
        (None, _) => write!(f, "{member}"),
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Exp]) -> fmt::Result {
    f.write_str("(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exp::Lit(lit, _) => write!(f, "{lit}"),
            Exp::Local(item) => write!(f, "{item}"),
            Exp::Field { receiver, field } => write_member(f, receiver, field),
            Exp::Call {
                receiver,
                method,
                args,
            } => {
                write_member(f, receiver, method)?;
                write_args(f, args)
            }
            Exp::New { constructor, args } => {
                write!(f, "new {constructor}")?;
                write_args(f, args)
            }
            Exp::Binary { op, lhs, rhs, .. } => {
                write_operand(f, lhs)?;
                write!(f, " {} ", op.as_str())?;
                write_operand(f, rhs)
            }
            Exp::Assign { op, target, value } => write!(f, "{target} {} {value}", op.as_str()),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expr(e) => write!(f, "{e};"),
            Stmt::Var { item, init } => {
                if item.is_final() {
                    f.write_str("final ")?;
                }
                let ty = item.value_type().unwrap_or(Type::Void);
                write!(f, "{ty} {item}")?;
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
                f.write_str("{")?;
                for stmt in stmts {
                    write!(f, " {stmt}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

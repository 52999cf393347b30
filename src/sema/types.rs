// src/sema/types.rs
//
// Semantic types of resolved values.

use std::fmt;
use std::sync::Arc;

use crate::sema::items::Item;

/// The type of a resolved expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Boolean,
    Char,
    Int,
    Long,
    Float,
    Double,
    /// The type of `null`, assignable to every reference type.
    Null,
    /// A class, interface or enum.
    Class(Item),
    Array(Arc<Type>),
}

impl Type {
    pub fn array_of(element: Type) -> Type {
        Type::Array(Arc::new(element))
    }

    /// Position in the widening chain `char/int < long < float < double`.
    fn numeric_rank(&self) -> Option<u8> {
        match self {
            Type::Char => Some(0),
            Type::Int => Some(1),
            Type::Long => Some(2),
            Type::Float => Some(3),
            Type::Double => Some(4),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Null | Type::Class(_) | Type::Array(_))
    }

    pub fn class_item(&self) -> Option<&Item> {
        match self {
            Type::Class(item) => Some(item),
            _ => None,
        }
    }

    /// Whether a value of type `self` may be stored where `target` is expected.
    pub fn assignable_to(&self, target: &Type) -> bool {
        if self == target {
            return true;
        }
        match (self, target) {
            (Type::Char, Type::Int | Type::Long | Type::Float | Type::Double) => true,
            (a, b) if a.is_numeric() && b.is_numeric() => {
                // char is not a target of widening from the other numerics
                !matches!(b, Type::Char) && a.numeric_rank() < b.numeric_rank()
            }
            (Type::Null, t) => t.is_reference(),
            (Type::Class(a), Type::Class(b)) => b.is_root_class() || a.is_subtype_of(b),
            (Type::Array(_), Type::Class(b)) => b.is_root_class(),
            (Type::Array(a), Type::Array(b)) => a.is_reference() && a.assignable_to(b),
            _ => false,
        }
    }

    /// Binary numeric promotion: the wider operand type, at least `int`.
    pub fn promote(a: &Type, b: &Type) -> Option<Type> {
        let rank = a.numeric_rank()?.max(b.numeric_rank()?);
        Some(match rank {
            0 | 1 => Type::Int,
            2 => Type::Long,
            3 => Type::Float,
            _ => Type::Double,
        })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Boolean => write!(f, "boolean"),
            Type::Char => write!(f, "char"),
            Type::Int => write!(f, "int"),
            Type::Long => write!(f, "long"),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::Null => write!(f, "null"),
            Type::Class(item) => write!(f, "{}", item.name()),
            Type::Array(element) => write!(f, "{element}[]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_widening() {
        assert!(Type::Int.assignable_to(&Type::Long));
        assert!(Type::Char.assignable_to(&Type::Int));
        assert!(Type::Long.assignable_to(&Type::Double));
        assert!(!Type::Long.assignable_to(&Type::Int));
        assert!(!Type::Int.assignable_to(&Type::Char));
        assert!(!Type::Boolean.assignable_to(&Type::Int));
    }

    #[test]
    fn class_subtyping() {
        let object = Item::class("Object", None, None, Vec::new());
        let shape = Item::class("Shape", None, Some(object.clone()), Vec::new());
        let circle = Item::class("Circle", None, Some(shape.clone()), Vec::new());

        let circle_t = Type::Class(circle);
        assert!(circle_t.assignable_to(&Type::Class(shape.clone())));
        assert!(circle_t.assignable_to(&Type::Class(object.clone())));
        assert!(!Type::Class(shape).assignable_to(&circle_t));
        assert!(Type::Null.assignable_to(&circle_t));
        assert!(!Type::Null.assignable_to(&Type::Int));
        assert!(Type::array_of(Type::Int).assignable_to(&Type::Class(object)));
    }

    #[test]
    fn promotion() {
        assert_eq!(Type::promote(&Type::Char, &Type::Char), Some(Type::Int));
        assert_eq!(Type::promote(&Type::Int, &Type::Double), Some(Type::Double));
        assert_eq!(Type::promote(&Type::Boolean, &Type::Int), None);
    }
}

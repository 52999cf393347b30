// src/sema/place.rs
//
// Syntactic context of a resolution point.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::sema::items::{Item, ItemKind};
use crate::sema::types::Type;

/// The enclosing package, class, method or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub item: Item,
    /// Inside a static method or static initializer: no `this`.
    pub is_static: bool,
}

impl Place {
    pub fn new(item: Item, is_static: bool) -> Self {
        Self { item, is_static }
    }

    /// Whether `item` may enclose code at all.
    pub fn possible(item: &Item) -> bool {
        matches!(
            item.kind(),
            ItemKind::Package
                | ItemKind::Class(_)
                | ItemKind::Method { .. }
                | ItemKind::Constructor { .. }
        )
    }

    pub fn enclosing_class(&self) -> Option<Item> {
        self.item.enclosing_class()
    }

    /// The method or constructor we are inside, if any.
    pub fn callable(&self) -> Option<&Item> {
        (self.item.is_method() || self.item.is_constructor()).then_some(&self.item)
    }

    /// What a `return` here must produce; `None` outside any callable.
    pub fn return_type(&self) -> Option<Type> {
        match self.item.kind() {
            ItemKind::Method { ret, .. } => Some(ret.clone()),
            ItemKind::Constructor { .. } => Some(Type::Void),
            _ => None,
        }
    }

    pub fn allows_locals(&self) -> bool {
        self.callable().is_some()
    }

    pub fn allows_fields(&self) -> bool {
        self.item.is_type()
    }
}

/// Which jumps are legal at this point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flow {
    pub can_break: bool,
    pub can_continue: bool,
    pub labels: SmallVec<[Arc<str>; 2]>,
}

impl Flow {
    /// Inside a loop body.
    pub fn in_loop() -> Self {
        Self {
            can_break: true,
            can_continue: true,
            labels: SmallVec::new(),
        }
    }

    /// Inside a switch: `break` only.
    pub fn in_switch() -> Self {
        Self {
            can_break: true,
            can_continue: false,
            labels: SmallVec::new(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.labels.push(Arc::from(label));
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| &**l == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_type_follows_callable() {
        let main = Item::class("Main", None, None, Vec::new());
        let eval = Item::method("eval", &main, Vec::new(), Type::Int);
        let ctor = Item::constructor(&main, Vec::new());

        assert_eq!(Place::new(eval.clone(), false).return_type(), Some(Type::Int));
        assert_eq!(Place::new(ctor, false).return_type(), Some(Type::Void));
        assert_eq!(Place::new(main.clone(), false).return_type(), None);
        assert!(Place::new(eval, false).allows_locals());
        assert!(Place::new(main, false).allows_fields());
    }

    #[test]
    fn flow_labels() {
        let flow = Flow::in_loop().with_label("outer");
        assert!(flow.has_label("outer"));
        assert!(!flow.has_label("inner"));
        assert!(!Flow::in_switch().can_continue);
    }
}

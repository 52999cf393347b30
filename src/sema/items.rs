// src/sema/items.rs
//
// Named entities an environment can resolve to.
//
// Items form an acyclic graph: each item points at its declaring parent and,
// for classes, at its supertypes. Nothing points back into a live index.

use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::FxHashSet;

use crate::sema::types::Type;

/// Unique identity of an item for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

impl ItemId {
    fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        ItemId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassFlavor {
    Class,
    Interface,
    Enum,
}

#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub flavor: ClassFlavor,
    /// Direct superclass; `None` only for the root class and interfaces.
    pub base: Option<Item>,
    pub interfaces: Vec<Item>,
}

#[derive(Debug, Clone)]
pub enum ItemKind {
    Package,
    Class(ClassInfo),
    Method {
        params: Vec<Type>,
        ret: Type,
        is_static: bool,
    },
    /// Stored under its class's name.
    Constructor { params: Vec<Type> },
    Field {
        ty: Type,
        is_static: bool,
        is_final: bool,
    },
    EnumConstant,
    Local { ty: Type, is_final: bool },
}

#[derive(Debug)]
pub struct ItemDef {
    id: ItemId,
    name: Arc<str>,
    parent: Option<Item>,
    kind: ItemKind,
}

/// Shared handle to an item; equality and hashing go by identity.
#[derive(Clone)]
pub struct Item(Arc<ItemDef>);

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.id.cmp(&other.0.id)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}({})", self.kind_name(), self.0.id.0, self.qualified())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl Item {
    pub fn new(name: &str, parent: Option<Item>, kind: ItemKind) -> Self {
        Item(Arc::new(ItemDef {
            id: ItemId::fresh(),
            name: Arc::from(name),
            parent,
            kind,
        }))
    }

    // ===== Constructors =====

    pub fn package(name: &str) -> Self {
        Self::new(name, None, ItemKind::Package)
    }

    pub fn class(name: &str, parent: Option<Item>, base: Option<Item>, interfaces: Vec<Item>) -> Self {
        Self::new(
            name,
            parent,
            ItemKind::Class(ClassInfo {
                flavor: ClassFlavor::Class,
                base,
                interfaces,
            }),
        )
    }

    pub fn interface(name: &str, parent: Option<Item>, extends: Vec<Item>) -> Self {
        Self::new(
            name,
            parent,
            ItemKind::Class(ClassInfo {
                flavor: ClassFlavor::Interface,
                base: None,
                interfaces: extends,
            }),
        )
    }

    pub fn enumeration(name: &str, parent: Option<Item>, base: Item) -> Self {
        Self::new(
            name,
            parent,
            ItemKind::Class(ClassInfo {
                flavor: ClassFlavor::Enum,
                base: Some(base),
                interfaces: Vec::new(),
            }),
        )
    }

    pub fn method(name: &str, parent: &Item, params: Vec<Type>, ret: Type) -> Self {
        let kind = ItemKind::Method {
            params,
            ret,
            is_static: false,
        };
        Self::new(name, Some(parent.clone()), kind)
    }

    pub fn static_method(name: &str, parent: &Item, params: Vec<Type>, ret: Type) -> Self {
        let kind = ItemKind::Method {
            params,
            ret,
            is_static: true,
        };
        Self::new(name, Some(parent.clone()), kind)
    }

    pub fn constructor(class: &Item, params: Vec<Type>) -> Self {
        Self::new(class.name(), Some(class.clone()), ItemKind::Constructor { params })
    }

    pub fn field(name: &str, parent: &Item, ty: Type, is_static: bool, is_final: bool) -> Self {
        let kind = ItemKind::Field {
            ty,
            is_static,
            is_final,
        };
        Self::new(name, Some(parent.clone()), kind)
    }

    pub fn enum_constant(name: &str, parent: &Item) -> Self {
        Self::new(name, Some(parent.clone()), ItemKind::EnumConstant)
    }

    /// A local variable declared inside the callable `parent`.
    pub fn local(name: &str, parent: &Item, ty: Type, is_final: bool) -> Self {
        Self::new(name, Some(parent.clone()), ItemKind::Local { ty, is_final })
    }

    // ===== Accessors =====

    pub fn id(&self) -> ItemId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&Item> {
        self.0.parent.as_ref()
    }

    pub fn kind(&self) -> &ItemKind {
        &self.0.kind
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind() {
            ItemKind::Package => "package",
            ItemKind::Class(info) => match info.flavor {
                ClassFlavor::Class => "class",
                ClassFlavor::Interface => "interface",
                ClassFlavor::Enum => "enum",
            },
            ItemKind::Method { .. } => "method",
            ItemKind::Constructor { .. } => "constructor",
            ItemKind::Field { .. } => "field",
            ItemKind::EnumConstant => "enum constant",
            ItemKind::Local { .. } => "local",
        }
    }

    /// Dotted name through every enclosing item.
    pub fn qualified(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{}.{}", parent.qualified(), self.name()),
            None => self.name().to_string(),
        }
    }

    // ===== Roles =====

    pub fn is_package(&self) -> bool {
        matches!(self.kind(), ItemKind::Package)
    }

    pub fn is_type(&self) -> bool {
        matches!(self.kind(), ItemKind::Class(_))
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind(), ItemKind::Method { .. })
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.kind(), ItemKind::Constructor { .. })
    }

    pub fn is_value(&self) -> bool {
        matches!(
            self.kind(),
            ItemKind::Field { .. } | ItemKind::EnumConstant | ItemKind::Local { .. }
        )
    }

    pub fn is_local(&self) -> bool {
        matches!(self.kind(), ItemKind::Local { .. })
    }

    pub fn is_field(&self) -> bool {
        matches!(self.kind(), ItemKind::Field { .. })
    }

    /// Members that need no receiver. Locals, packages and constructors are
    /// neither static nor instance members.
    pub fn is_static(&self) -> bool {
        match self.kind() {
            ItemKind::Method { is_static, .. } | ItemKind::Field { is_static, .. } => *is_static,
            ItemKind::EnumConstant | ItemKind::Class(_) => true,
            _ => false,
        }
    }

    /// Fields and methods that need a receiver.
    pub fn is_instance_member(&self) -> bool {
        matches!(
            self.kind(),
            ItemKind::Method { is_static: false, .. } | ItemKind::Field { is_static: false, .. }
        )
    }

    pub fn is_final(&self) -> bool {
        match self.kind() {
            ItemKind::Field { is_final, .. } | ItemKind::Local { is_final, .. } => *is_final,
            ItemKind::EnumConstant => true,
            _ => false,
        }
    }

    /// Whether two items compete for the same name when shadowing.
    pub fn same_namespace(&self, other: &Item) -> bool {
        (self.is_value() && other.is_value())
            || (self.is_type() && other.is_type())
            || (self.is_method() && other.is_method())
            || (self.is_package() && other.is_package())
    }

    // ===== Types =====

    /// The type of the value this item denotes, if it is a value.
    pub fn value_type(&self) -> Option<Type> {
        match self.kind() {
            ItemKind::Field { ty, .. } | ItemKind::Local { ty, .. } => Some(ty.clone()),
            ItemKind::EnumConstant => self.parent().map(|p| Type::Class(p.clone())),
            _ => None,
        }
    }

    pub fn params(&self) -> &[Type] {
        match self.kind() {
            ItemKind::Method { params, .. } | ItemKind::Constructor { params } => params,
            _ => &[],
        }
    }

    /// Result type of calling this item; constructors produce their class.
    pub fn return_type(&self) -> Option<Type> {
        match self.kind() {
            ItemKind::Method { ret, .. } => Some(ret.clone()),
            ItemKind::Constructor { .. } => self.parent().map(|p| Type::Class(p.clone())),
            _ => None,
        }
    }

    pub fn class_info(&self) -> Option<&ClassInfo> {
        match self.kind() {
            ItemKind::Class(info) => Some(info),
            _ => None,
        }
    }

    /// The class with no superclass.
    pub fn is_root_class(&self) -> bool {
        self.class_info()
            .is_some_and(|info| info.flavor == ClassFlavor::Class && info.base.is_none())
    }

    /// Direct supertypes: base class first, then interfaces.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &Item> {
        self.class_info()
            .into_iter()
            .flat_map(|info| info.base.iter().chain(info.interfaces.iter()))
    }

    /// Every transitive supertype, nearest first, without repeats.
    pub fn supertypes(&self) -> Vec<Item> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        let mut work: VecDeque<Item> = self.direct_supertypes().cloned().collect();
        while let Some(next) = work.pop_front() {
            if seen.insert(next.id()) {
                work.extend(next.direct_supertypes().cloned());
                order.push(next);
            }
        }
        order
    }

    pub fn is_subtype_of(&self, other: &Item) -> bool {
        self == other || self.supertypes().iter().any(|s| s == other)
    }

    /// Whether this member is reachable from `ty`: its declaring parent is
    /// `ty` or one of `ty`'s supertypes.
    pub fn is_member_of(&self, ty: &Item) -> bool {
        match self.parent() {
            Some(parent) => ty.is_subtype_of(parent),
            None => false,
        }
    }

    /// Nearest enclosing class, including the item itself.
    pub fn enclosing_class(&self) -> Option<Item> {
        if self.is_type() {
            return Some(self.clone());
        }
        self.parent().and_then(Item::enclosing_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_equality() {
        let a = Item::package("lang");
        let b = Item::package("lang");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn qualified_names_follow_parents() {
        let lang = Item::package("lang");
        let object = Item::class("Object", Some(lang.clone()), None, Vec::new());
        let hash = Item::method("hashCode", &object, Vec::new(), Type::Int);
        assert_eq!(hash.qualified(), "lang.Object.hashCode");
        assert_eq!(hash.enclosing_class(), Some(object));
    }

    #[test]
    fn supertypes_walk_bases_and_interfaces() {
        let object = Item::class("Object", None, None, Vec::new());
        let seq = Item::interface("CharSequence", None, Vec::new());
        let string = Item::class("String", None, Some(object.clone()), vec![seq.clone()]);
        assert_eq!(string.supertypes(), vec![object.clone(), seq.clone()]);
        assert!(string.is_subtype_of(&seq));
        assert!(!seq.is_subtype_of(&string));

        let length = Item::method("length", &seq, Vec::new(), Type::Int);
        assert!(length.is_member_of(&string));
        assert!(!length.is_member_of(&object));
    }

    #[test]
    fn roles_and_types() {
        let object = Item::class("Object", None, None, Vec::new());
        let color = Item::enumeration("Color", None, object.clone());
        let red = Item::enum_constant("RED", &color);
        assert!(red.is_value() && red.is_static() && red.is_final());
        assert_eq!(red.value_type(), Some(Type::Class(color.clone())));

        let ctor = Item::constructor(&object, Vec::new());
        assert_eq!(ctor.name(), "Object");
        assert_eq!(ctor.return_type(), Some(Type::Class(object.clone())));

        let count = Item::field("count", &object, Type::Int, false, false);
        assert!(count.is_instance_member());
        assert!(count.same_namespace(&red));
        assert!(!count.same_namespace(&color));
    }
}

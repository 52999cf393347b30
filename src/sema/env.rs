// src/sema/env.rs
//! Immutable name-resolution environments.
//!
//! An [`Env`] is an indexed base shared by every environment derived from it,
//! plus a persistent chain of small layers for names introduced while
//! resolving (locals, fields). Every operation returns a new `Env`; nothing is
//! ever mutated after construction, so an `Env` can be shared freely between
//! threads and alternatives.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::errors::IndexError;
use crate::fuzzy::{NoiseModel, Trie};
use crate::scored::{Scored, fail, known};
use crate::sema::items::Item;
use crate::sema::place::{Flow, Place};
use crate::sema::types::Type;

/// Shadowing priority: lower is more local and wins.
pub type Priority = i32;

/// Everything the indexer knew when the environment was built.
#[derive(Debug, Default)]
pub struct Index {
    trie: Trie<Item>,
    in_scope: FxHashMap<Item, Priority>,
    values_by_type: FxHashMap<Item, Vec<Item>>,
    string_class: Option<Item>,
}

impl Index {
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}

/// Names added on top of the base at one scope level.
#[derive(Debug)]
struct Layer {
    level: u32,
    items: SmallVec<[(Item, Priority); 2]>,
    trie: Trie<Item>,
    parent: Option<Arc<Layer>>,
}

struct Layers<'a> {
    next: Option<&'a Layer>,
}

impl<'a> Iterator for Layers<'a> {
    type Item = &'a Layer;

    fn next(&mut self) -> Option<&'a Layer> {
        let layer = self.next?;
        self.next = layer.parent.as_deref();
        Some(layer)
    }
}

#[derive(Debug, Clone)]
pub struct Env {
    index: Arc<Index>,
    layers: Option<Arc<Layer>>,
    level: u32,
    place: Place,
    flow: Flow,
    noise: NoiseModel,
}

impl Env {
    pub fn place(&self) -> &Place {
        &self.place
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn noise(&self) -> &NoiseModel {
        &self.noise
    }

    /// Current block nesting depth.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn string_class(&self) -> Option<&Item> {
        self.index.string_class.as_ref()
    }

    fn layers(&self) -> Layers<'_> {
        Layers {
            next: self.layers.as_deref(),
        }
    }

    // ===== Lookup =====

    /// Every item stored under exactly `name`, innermost layer first.
    pub fn things(&self, name: &str) -> Vec<Item> {
        let mut found: Vec<Item> = self
            .layers()
            .flat_map(|layer| layer.trie.exact(name).iter().cloned())
            .collect();
        found.extend(self.index.trie.exact(name).iter().cloned());
        found
    }

    /// Every item whose name is within `max_distance` edits of `typed`.
    pub fn typos(&self, typed: &str, max_distance: usize) -> Vec<(usize, Item)> {
        let mut found: Vec<(usize, Item)> = self
            .layers()
            .flat_map(|layer| layer.trie.within(typed, max_distance))
            .collect();
        found.extend(self.index.trie.within(typed, max_distance));
        found
    }

    pub fn is_indexed(&self, item: &Item) -> bool {
        self.things(item.name()).contains(item)
    }

    pub fn priority(&self, item: &Item) -> Option<Priority> {
        self.layers()
            .find_map(|layer| {
                layer
                    .items
                    .iter()
                    .find(|(candidate, _)| candidate == item)
                    .map(|(_, p)| *p)
            })
            .or_else(|| self.index.in_scope.get(item).copied())
    }

    pub fn in_scope(&self, item: &Item) -> bool {
        self.priority(item).is_some()
    }

    /// Whether a strictly more local item of the same name and namespace
    /// hides `item`.
    pub fn shadowed(&self, item: &Item) -> bool {
        let Some(p) = self.priority(item) else {
            return false;
        };
        self.things(item.name()).iter().any(|other| {
            other != item
                && other.same_namespace(item)
                && self.priority(other).is_some_and(|q| q < p)
        })
    }

    /// Nameable without qualification at this point.
    pub fn visible(&self, item: &Item) -> bool {
        self.in_scope(item) && !self.shadowed(item)
    }

    /// Every value whose type is `class` or a subtype of it. The root class is
    /// never indexed.
    pub fn values_of_type(&self, class: &Item) -> Vec<Item> {
        if class.is_root_class() {
            return Vec::new();
        }
        let mut found: Vec<Item> = self
            .layers()
            .flat_map(|layer| layer.items.iter().map(|(item, _)| item))
            .filter(|item| {
                matches!(item.value_type(), Some(Type::Class(c)) if c.is_subtype_of(class))
            })
            .cloned()
            .collect();
        if let Some(values) = self.index.values_by_type.get(class) {
            found.extend(values.iter().cloned());
        }
        found
    }

    // ===== Extension =====

    /// Add items at the current scope level.
    pub fn add_objects(&self, items: &[(Item, Priority)]) -> Env {
        if items.is_empty() {
            return self.clone();
        }
        let layer = Layer {
            level: self.level,
            items: items.iter().cloned().collect(),
            trie: items.iter().map(|(item, _)| (item.name(), item.clone())).collect(),
            parent: self.layers.clone(),
        };
        Env {
            layers: Some(Arc::new(layer)),
            ..self.clone()
        }
    }

    pub fn push_scope(&self) -> Env {
        Env {
            level: self.level + 1,
            ..self.clone()
        }
    }

    /// Leave a block, forgetting everything declared inside it.
    pub fn pop_scope(&self) -> Env {
        let level = self.level.saturating_sub(1);
        let mut layers = self.layers.as_ref();
        while let Some(layer) = layers.filter(|layer| layer.level > level) {
            layers = layer.parent.as_ref();
        }
        Env {
            layers: layers.cloned(),
            level,
            ..self.clone()
        }
    }

    fn local_priority(&self) -> Priority {
        -Priority::try_from(self.level).unwrap_or(Priority::MAX)
    }

    /// Declare a local variable. Fails outside a callable, or when a local of
    /// the same name is already in scope.
    pub fn new_variable(&self, name: &str, ty: Type, is_final: bool) -> Scored<(Env, Item)> {
        let Some(callable) = self.place.callable() else {
            return fail(|| format!("cannot declare local '{name}' outside a method"));
        };
        let clash = self
            .things(name)
            .into_iter()
            .any(|item| item.is_local() && self.in_scope(&item));
        if clash {
            return fail(|| format!("variable '{name}' is already defined"));
        }
        let item = Item::local(name, callable, ty, is_final);
        let env = self.add_objects(&[(item.clone(), self.local_priority())]);
        tracing::trace!(name, level = self.level, "new local");
        known((env, item))
    }

    /// Declare a field of the class we are in.
    pub fn new_field(&self, name: &str, ty: Type, is_static: bool) -> Scored<(Env, Item)> {
        if !self.place.allows_fields() {
            return fail(|| format!("cannot declare field '{name}' outside a class"));
        }
        let class = &self.place.item;
        let clash = self
            .things(name)
            .into_iter()
            .any(|item| item.is_field() && item.parent() == Some(class));
        if clash {
            return fail(|| format!("field '{name}' is already defined in '{class}'"));
        }
        let item = Item::field(name, class, ty, is_static, false);
        let env = self.add_objects(&[(item.clone(), self.local_priority())]);
        known((env, item))
    }

    /// The same environment seen from another place.
    ///
    /// Locals of the old callable are dropped when the callable changes. Flow
    /// resets: no loop or label encloses the start of a new place.
    pub fn move_to(&self, place: Place) -> Result<Env, IndexError> {
        self.check_place(&place)?;
        let (layers, level) = if place.callable() == self.place.callable() {
            (self.layers.clone(), self.level)
        } else {
            let kept: SmallVec<[(Item, Priority); 2]> = self
                .layers()
                .flat_map(|layer| layer.items.iter())
                .filter(|(item, _)| !item.is_local())
                .cloned()
                .collect();
            let base = Env {
                layers: None,
                level: 0,
                ..self.clone()
            };
            (base.add_objects(&kept).layers, 0)
        };
        Ok(Env {
            index: Arc::clone(&self.index),
            layers,
            level,
            place,
            flow: Flow::default(),
            noise: self.noise,
        })
    }

    fn check_place(&self, place: &Place) -> Result<(), IndexError> {
        if !Place::possible(&place.item) {
            return Err(IndexError::ImpossiblePlace {
                place: place.item.qualified(),
            });
        }
        let mut next = Some(&place.item);
        while let Some(item) = next {
            let top_level_package = item.is_package() && item.parent().is_none();
            if !top_level_package && !self.is_indexed(item) {
                return Err(IndexError::PlaceNotIndexed {
                    place: item.qualified(),
                });
            }
            next = item.parent();
        }
        Ok(())
    }
}

/// Builds the base environment handed over by an indexer, checking the
/// invariants the resolver relies on.
#[derive(Debug, Clone)]
pub struct EnvBuilder {
    place: Place,
    items: Vec<Item>,
    in_scope: Vec<(Item, Priority)>,
    flow: Flow,
    noise: NoiseModel,
    string_class: Option<Item>,
}

impl EnvBuilder {
    pub fn new(place: Place) -> Self {
        Self {
            place,
            items: Vec::new(),
            in_scope: Vec::new(),
            flow: Flow::default(),
            noise: NoiseModel::default(),
            string_class: None,
        }
    }

    pub fn item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items.extend(items);
        self
    }

    /// Make `item` nameable without qualification.
    pub fn in_scope(mut self, item: Item, priority: Priority) -> Self {
        self.in_scope.push((item, priority));
        self
    }

    pub fn flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }

    pub fn noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }

    /// The class string literals belong to.
    pub fn string_class(mut self, class: Item) -> Self {
        self.string_class = Some(class);
        self
    }

    pub fn build(self) -> Result<Env, IndexError> {
        let mut seen = FxHashSet::default();
        let items: Vec<Item> = self
            .items
            .into_iter()
            .chain(self.in_scope.iter().map(|(item, _)| item.clone()))
            .chain(self.string_class.iter().cloned())
            .filter(|item| seen.insert(item.id()))
            .collect();

        for item in &items {
            if let Some(parent) = item.parent().filter(|p| !seen.contains(&p.id())) {
                return Err(IndexError::MissingParent {
                    item: item.qualified(),
                    parent: parent.qualified(),
                });
            }
            if let Some(missing) = item.direct_supertypes().find(|s| !seen.contains(&s.id())) {
                return Err(IndexError::MissingSupertype {
                    class: item.qualified(),
                    supertype: missing.qualified(),
                });
            }
        }

        let mut values_by_type: FxHashMap<Item, Vec<Item>> = FxHashMap::default();
        for item in items.iter().filter(|item| item.is_value()) {
            let Some(Type::Class(class)) = item.value_type() else {
                continue;
            };
            let supers = std::iter::once(class.clone()).chain(class.supertypes());
            for ty in supers.filter(|ty| !ty.is_root_class()) {
                values_by_type.entry(ty).or_default().push(item.clone());
            }
        }

        let index = Index {
            trie: items.iter().map(|item| (item.name(), item.clone())).collect(),
            in_scope: self.in_scope.into_iter().collect(),
            values_by_type,
            string_class: self.string_class,
        };
        tracing::debug!(
            items = index.len(),
            in_scope = index.in_scope.len(),
            place = %self.place.item.qualified(),
            "built environment"
        );

        let env = Env {
            index: Arc::new(index),
            layers: None,
            level: 0,
            place: self.place.clone(),
            flow: self.flow,
            noise: self.noise,
        };
        env.check_place(&self.place)?;
        Ok(env)
    }
}

// src/sema/mod.rs
pub mod env;
pub mod items;
pub mod place;
pub mod pr;
pub mod prelude;
pub mod query;
pub mod snapshot;
pub mod types;

pub use env::{Env, EnvBuilder, Index, Priority};
pub use items::{ClassFlavor, ClassInfo, Item, ItemId, ItemKind};
pub use place::{Flow, Place};
pub use prelude::{Prelude, PreludeOptions};
pub use snapshot::{EnvStore, Snapshot};
pub use types::Type;

// src/sema/prelude.rs
//! A small base library and a default place to resolve in.
//!
//! Stands in for an indexer: the `lang` package with a handful of core
//! classes, and an `app.Main` class whose `eval` method is where fragments
//! are resolved.

use crate::errors::{IndexError, UsageError};
use crate::sema::env::{Env, EnvBuilder};
use crate::sema::items::Item;
use crate::sema::place::{Flow, Place};
use crate::sema::types::Type;

/// Context of the `eval` method fragments are resolved in.
#[derive(Debug, Clone)]
pub struct PreludeOptions {
    pub is_static: bool,
    pub returns: Type,
    pub flow: Flow,
    pub locals: Vec<(String, Type)>,
}

impl Default for PreludeOptions {
    fn default() -> Self {
        Self {
            is_static: false,
            returns: Type::Void,
            flow: Flow::default(),
            locals: Vec::new(),
        }
    }
}

/// The base library's items, kept apart so callers can name its classes
/// before building an environment.
#[derive(Debug, Clone)]
pub struct Prelude {
    lang: Item,
    app: Item,
    pub object: Item,
    pub string: Item,
    pub main: Item,
    classes: Vec<Item>,
    /// Members of `lang` classes; never in scope unqualified.
    library: Vec<Item>,
    /// Members of `Main`, in scope inside it.
    own: Vec<Item>,
}

impl Default for Prelude {
    fn default() -> Self {
        Self::new()
    }
}

impl Prelude {
    pub fn new() -> Self {
        let lang = Item::package("lang");
        let app = Item::package("app");
        let pkg = Some(lang.clone());

        let object = Item::class("Object", pkg.clone(), None, Vec::new());
        let base = Some(object.clone());
        let char_seq = Item::interface("CharSequence", pkg.clone(), Vec::new());
        let string = Item::class("String", pkg.clone(), base.clone(), vec![char_seq.clone()]);
        let math = Item::class("Math", pkg.clone(), base.clone(), Vec::new());
        let integer = Item::class("Integer", pkg.clone(), base.clone(), Vec::new());
        let print_stream = Item::class("PrintStream", pkg.clone(), base.clone(), Vec::new());
        let system = Item::class("System", pkg.clone(), base.clone(), Vec::new());
        let builder = Item::class("StringBuilder", pkg.clone(), base.clone(), vec![char_seq.clone()]);

        let string_t = Type::Class(string.clone());
        let object_t = Type::Class(object.clone());
        let builder_t = Type::Class(builder.clone());

        let library = vec![
            Item::constructor(&object, Vec::new()),
            Item::method("toString", &object, Vec::new(), string_t.clone()),
            Item::method("hashCode", &object, Vec::new(), Type::Int),
            Item::method("equals", &object, vec![object_t], Type::Boolean),
            Item::method("length", &char_seq, Vec::new(), Type::Int),
            Item::method("charAt", &char_seq, vec![Type::Int], Type::Char),
            Item::constructor(&string, Vec::new()),
            Item::constructor(&string, vec![string_t.clone()]),
            Item::method("concat", &string, vec![string_t.clone()], string_t.clone()),
            Item::method("substring", &string, vec![Type::Int, Type::Int], string_t.clone()),
            Item::method("isEmpty", &string, Vec::new(), Type::Boolean),
            Item::static_method("valueOf", &string, vec![Type::Int], string_t.clone()),
            Item::static_method("abs", &math, vec![Type::Int], Type::Int),
            Item::static_method("max", &math, vec![Type::Int, Type::Int], Type::Int),
            Item::static_method("min", &math, vec![Type::Int, Type::Int], Type::Int),
            Item::static_method("sqrt", &math, vec![Type::Double], Type::Double),
            Item::field("PI", &math, Type::Double, true, true),
            Item::static_method("parseInt", &integer, vec![string_t.clone()], Type::Int),
            Item::field("MAX_VALUE", &integer, Type::Int, true, true),
            Item::field("MIN_VALUE", &integer, Type::Int, true, true),
            Item::method("println", &print_stream, vec![string_t.clone()], Type::Void),
            Item::method("println", &print_stream, vec![Type::Int], Type::Void),
            Item::method("print", &print_stream, vec![string_t.clone()], Type::Void),
            Item::field("out", &system, Type::Class(print_stream.clone()), true, true),
            Item::constructor(&builder, Vec::new()),
            Item::constructor(&builder, vec![string_t.clone()]),
            Item::method("append", &builder, vec![string_t.clone()], builder_t.clone()),
            Item::method("append", &builder, vec![Type::Int], builder_t),
        ];

        let main = Item::class("Main", Some(app.clone()), base, Vec::new());
        let mode = Item::enumeration("Mode", Some(app.clone()), object.clone());
        let own = vec![
            Item::field("count", &main, Type::Int, false, false),
            Item::field("limit", &main, Type::Int, true, true),
            Item::field("name", &main, string_t.clone(), false, false),
            Item::method("helper", &main, vec![Type::Int], Type::Int),
            Item::static_method("log", &main, vec![string_t], Type::Void),
            Item::constructor(&main, Vec::new()),
            Item::enum_constant("FAST", &mode),
            Item::enum_constant("SLOW", &mode),
        ];

        let classes = vec![
            object.clone(),
            char_seq,
            string.clone(),
            math,
            integer,
            print_stream,
            system,
            builder,
            main.clone(),
            mode,
        ];

        Self {
            lang,
            app,
            object,
            string,
            main,
            classes,
            library,
            own,
        }
    }

    pub fn classes(&self) -> &[Item] {
        &self.classes
    }

    /// Parse a type as written on the command line: a primitive or a prelude
    /// class name, with any number of `[]` suffixes.
    pub fn parse_type(&self, name: &str) -> Result<Type, UsageError> {
        let name = name.trim();
        if let Some(element) = name.strip_suffix("[]") {
            return Ok(Type::array_of(self.parse_type(element)?));
        }
        let ty = match name {
            "void" => Type::Void,
            "boolean" => Type::Boolean,
            "char" => Type::Char,
            "int" => Type::Int,
            "long" => Type::Long,
            "float" => Type::Float,
            "double" => Type::Double,
            _ => self
                .classes
                .iter()
                .find(|class| class.name() == name || class.qualified() == name)
                .map(|class| Type::Class(class.clone()))
                .ok_or_else(|| UsageError::UnknownType {
                    name: name.to_string(),
                })?,
        };
        Ok(ty)
    }

    /// Build an environment positioned in `Main.eval`.
    pub fn environment(&self, options: &PreludeOptions) -> Result<Env, IndexError> {
        let eval = if options.is_static {
            Item::static_method("eval", &self.main, Vec::new(), options.returns.clone())
        } else {
            Item::method("eval", &self.main, Vec::new(), options.returns.clone())
        };

        let mut builder = EnvBuilder::new(Place::new(eval.clone(), options.is_static))
            .items([self.lang.clone(), self.app.clone()])
            .items(self.library.iter().cloned())
            .flow(options.flow.clone())
            .string_class(self.string.clone())
            .in_scope(self.lang.clone(), 3)
            .in_scope(self.app.clone(), 3);
        for class in &self.classes {
            builder = builder.in_scope(class.clone(), 2);
        }

        // Inherited members of Object are in scope inside Main too.
        let inherited = self
            .library
            .iter()
            .filter(|item| item.parent() == Some(&self.object) && item.is_method());
        for member in self.own.iter().chain(inherited).chain([&eval]) {
            builder = builder.in_scope(member.clone(), 1);
        }

        for (name, ty) in &options.locals {
            let local = Item::local(name, &eval, ty.clone(), false);
            builder = builder.in_scope(local, 0);
        }
        builder.build()
    }
}

/// Build the default base environment.
pub fn environment(options: &PreludeOptions) -> Result<Env, IndexError> {
    Prelude::new().environment(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::query::{static_member_query, type_query, value_query};

    #[test]
    fn parse_type_names() {
        let prelude = Prelude::new();
        assert_eq!(prelude.parse_type("int").unwrap(), Type::Int);
        assert_eq!(
            prelude.parse_type("String[]").unwrap(),
            Type::array_of(Type::Class(prelude.string.clone()))
        );
        assert_eq!(
            prelude.parse_type("lang.String").unwrap(),
            Type::Class(prelude.string.clone())
        );
        assert!(matches!(
            prelude.parse_type("Strang"),
            Err(UsageError::UnknownType { .. })
        ));
    }

    #[test]
    fn environment_sees_locals_and_classes() {
        let prelude = Prelude::new();
        let options = PreludeOptions {
            locals: vec![("x".to_string(), Type::Int)],
            ..PreludeOptions::default()
        };
        let env = prelude.environment(&options).unwrap();
        assert!(value_query(&env, "x").succeeded());
        assert!(value_query(&env, "count").succeeded());
        assert_eq!(type_query(&env, "String").best().unwrap(), prelude.string);
        assert_eq!(env.string_class(), Some(&prelude.string));
    }

    #[test]
    fn static_members_of_library_classes() {
        let prelude = Prelude::new();
        let env = prelude.environment(&PreludeOptions::default()).unwrap();
        let math = type_query(&env, "Math").best().unwrap();
        let pi = static_member_query(&env, &math, "PI").best().unwrap();
        assert_eq!(pi.value_type(), Some(Type::Double));
    }
}

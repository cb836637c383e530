//! Behavior attributes attached to members and classes.

use crate::Visibility;
use magic_core::{MagicResult, Value};
use std::fmt;
use std::sync::Arc;

/// A value transformer: a named instance method or builtin function, or a closure.
#[derive(Clone)]
pub enum Transformer {
    Named(String),
    Func(Arc<dyn Fn(Value) -> MagicResult<Value> + Send + Sync>),
}

impl Transformer {
    pub fn func(f: impl Fn(Value) -> MagicResult<Value> + Send + Sync + 'static) -> Self {
        Transformer::Func(Arc::new(f))
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformer::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Transformer::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&str> for Transformer {
    fn from(name: &str) -> Self {
        Transformer::Named(name.to_string())
    }
}

impl From<String> for Transformer {
    fn from(name: String) -> Self {
        Transformer::Named(name)
    }
}

fn transformers<T: Into<Transformer>>(list: impl IntoIterator<Item = T>) -> Vec<Transformer> {
    list.into_iter().map(Into::into).collect()
}

fn strings<S: Into<String>>(list: impl IntoIterator<Item = S>) -> Vec<String> {
    list.into_iter().map(Into::into).collect()
}

/// Read/write access mode of a magic property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    Read,
    Write,
    #[default]
    ReadWrite,
}

impl Access {
    pub fn readable(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

/// Exposes a method as a computed property under its aliases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Getter {
    pub aliases: Vec<String>,
    pub use_cache: bool,
}

impl Getter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aliases<S: Into<String>>(mut self, aliases: impl IntoIterator<Item = S>) -> Self {
        self.aliases = strings(aliases);
        self
    }

    pub fn cached(mut self) -> Self {
        self.use_cache = true;
        self
    }
}

/// Exposes a non-public property, or a method as a computed property.
#[derive(Debug, Clone, Default)]
pub struct MagicProperty {
    pub aliases: Vec<String>,
    pub on_get: Vec<Transformer>,
    pub on_set: Vec<Transformer>,
    pub disable_cache: bool,
    pub access: Access,
}

impl MagicProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access(access: Access) -> Self {
        Self {
            access,
            ..Self::default()
        }
    }

    pub fn aliases<S: Into<String>>(mut self, aliases: impl IntoIterator<Item = S>) -> Self {
        self.aliases = strings(aliases);
        self
    }

    pub fn on_get<T: Into<Transformer>>(mut self, list: impl IntoIterator<Item = T>) -> Self {
        self.on_get = transformers(list);
        self
    }

    pub fn on_set<T: Into<Transformer>>(mut self, list: impl IntoIterator<Item = T>) -> Self {
        self.on_set = transformers(list);
        self
    }

    pub fn disable_cache(mut self) -> Self {
        self.disable_cache = true;
        self
    }

    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Names to register: the aliases, or the member's own name.
    pub fn names<'a>(&'a self, own: &'a str) -> Vec<&'a str> {
        alias_names(&self.aliases, own)
    }
}

/// Pipes a property through transformers on get and set.
#[derive(Debug, Clone, Default)]
pub struct Transform {
    pub on_get: Vec<Transformer>,
    pub on_set: Vec<Transformer>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get<T: Into<Transformer>>(mut self, list: impl IntoIterator<Item = T>) -> Self {
        self.on_get = transformers(list);
        self
    }

    pub fn on_set<T: Into<Transformer>>(mut self, list: impl IntoIterator<Item = T>) -> Self {
        self.on_set = transformers(list);
        self
    }
}

/// Records the history of a property, or of every protected property when
/// attached to the class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackChanges;

/// Maps a method onto an overloaded magic method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overloaded {
    pub name: String,
}

impl Overloaded {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Turns properties of the listed visibilities into fluent get/set methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fluent {
    pub visibility: Vec<Visibility>,
}

impl Default for Fluent {
    fn default() -> Self {
        Self {
            visibility: vec![Visibility::Public],
        }
    }
}

impl Fluent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(visibility: impl IntoIterator<Item = Visibility>) -> Self {
        Self {
            visibility: visibility.into_iter().collect(),
        }
    }

    pub fn includes(&self, visibility: Visibility) -> bool {
        self.visibility.contains(&visibility)
    }
}

pub(crate) fn alias_names<'a>(aliases: &'a [String], own: &'a str) -> Vec<&'a str> {
    if aliases.is_empty() {
        vec![own]
    } else {
        aliases.iter().map(String::as_str).collect()
    }
}

impl Getter {
    /// Names to register: the aliases, or the method's own name.
    pub fn names<'a>(&'a self, own: &'a str) -> Vec<&'a str> {
        alias_names(&self.aliases, own)
    }
}

/// Any attribute that can be attached to a member or a class.
#[derive(Debug, Clone)]
pub enum Attribute {
    Getter(Getter),
    MagicProperty(MagicProperty),
    Transform(Transform),
    TrackChanges(TrackChanges),
    Overloaded(Overloaded),
    Fluent(Fluent),
}

/// Typed access to one attribute variant.
pub trait AttributeKind: Sized + 'static {
    fn from_attribute(attribute: &Attribute) -> Option<&Self>;
}

macro_rules! attribute_kind {
    ($($kind:ident),+ $(,)?) => {
        $(
            impl AttributeKind for $kind {
                fn from_attribute(attribute: &Attribute) -> Option<&Self> {
                    match attribute {
                        Attribute::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$kind> for Attribute {
                fn from(inner: $kind) -> Self {
                    Attribute::$kind(inner)
                }
            }
        )+
    };
}

attribute_kind!(Getter, MagicProperty, Transform, TrackChanges, Overloaded, Fluent);

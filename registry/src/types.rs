//! Member definition types.

use magic_core::Value;
use std::fmt;

/// Member visibility. Public members are never intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// A declared parameter or property type.
///
/// Union members are kept in declaration order. A `?T` prefix or a `null`
/// member makes the hint nullable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeHint {
    /// No declared type, or `mixed`.
    #[default]
    Any,
    Named { types: Vec<String>, nullable: bool },
}

impl TypeHint {
    /// Parse a hint such as `int`, `?string`, `int|string` or `Item|null`.
    pub fn parse(hint: &str) -> Self {
        let hint = hint.trim();
        let (hint, mut nullable) = match hint.strip_prefix('?') {
            Some(rest) => (rest, true),
            None => (hint, false),
        };

        let mut types = Vec::new();
        for part in hint.split('|').map(str::trim).filter(|p| !p.is_empty()) {
            match part {
                "mixed" => return TypeHint::Any,
                "null" => nullable = true,
                other => types.push(other.to_string()),
            }
        }

        if types.is_empty() && !nullable {
            return TypeHint::Any;
        }
        TypeHint::Named { types, nullable }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            TypeHint::Any => true,
            TypeHint::Named { nullable, .. } => *nullable,
        }
    }

    /// The declared type names, empty for `Any`.
    pub fn types(&self) -> &[String] {
        match self {
            TypeHint::Any => &[],
            TypeHint::Named { types, .. } => types,
        }
    }

    /// Strict check that a value satisfies this hint.
    ///
    /// Scalars must match exactly (an int is not a float), class names match
    /// objects of that class, and unions accept a value matching any member.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            TypeHint::Any => true,
            TypeHint::Named { types, nullable } => {
                if value.is_null() {
                    return *nullable;
                }
                types.iter().any(|name| type_accepts(name, value))
            }
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Any => write!(f, "mixed"),
            TypeHint::Named { types, nullable } => {
                if *nullable && types.len() == 1 {
                    write!(f, "?")?;
                }
                write!(f, "{}", types.join("|"))?;
                if *nullable && types.len() > 1 {
                    write!(f, "|null")?;
                }
                Ok(())
            }
        }
    }
}

fn type_accepts(name: &str, value: &Value) -> bool {
    match (name, value) {
        ("mixed", _) => true,
        ("int" | "integer", Value::Int(_)) => true,
        ("float" | "double", Value::Float(_)) => true,
        ("string", Value::String(_)) => true,
        ("bool" | "boolean", Value::Bool(_)) => true,
        ("true", Value::Bool(b)) => *b,
        ("false", Value::Bool(b)) => !*b,
        ("array" | "iterable", Value::List(_) | Value::Map(_)) => true,
        ("list", Value::List(_)) => true,
        ("object", Value::Object(_)) => true,
        ("self" | "static", Value::Host) => true,
        (class, Value::Object(obj)) => obj.class() == class,
        _ => false,
    }
}

/// A declared method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    pub name: String,
    pub type_hint: TypeHint,
    /// Has a default value.
    pub optional: bool,
    /// Collects all remaining arguments.
    pub variadic: bool,
}

impl ParamDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: TypeHint::Any,
            optional: false,
            variadic: false,
        }
    }

    pub fn typed(name: impl Into<String>, hint: &str) -> Self {
        Self::new(name).with_type(hint)
    }

    pub fn with_type(mut self, hint: &str) -> Self {
        self.type_hint = TypeHint::parse(hint);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Whether the parameter accepts `value`. Null is accepted by optional
    /// and nullable parameters.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.optional || self.type_hint.is_nullable();
        }
        self.type_hint.accepts(value)
    }
}

/// Doc tag kinds understood by the properties behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocTagKind {
    /// `@property`: read-write.
    Property,
    /// `@property-read`
    PropertyRead,
    /// `@property-write`
    PropertyWrite,
    /// `@method`
    Method,
}

/// A parsed class doc tag.
///
/// For property tags `type_name` is the property type; for method tags it is
/// the return type and `params` is the parameter count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    pub kind: DocTagKind,
    pub name: String,
    pub type_name: Option<String>,
    pub params: usize,
}

impl DocTag {
    fn new(kind: DocTagKind, name: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            type_name,
            params: 0,
        }
    }

    /// `@property <type> $name`
    pub fn property(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(DocTagKind::Property, name, Some(type_name.into()))
    }

    /// `@property-read <type> $name`
    pub fn property_read(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(DocTagKind::PropertyRead, name, Some(type_name.into()))
    }

    /// `@property-write <type> $name`
    pub fn property_write(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(DocTagKind::PropertyWrite, name, Some(type_name.into()))
    }

    /// `@method <return> name(<params>)`
    pub fn method(name: impl Into<String>, params: usize) -> Self {
        Self {
            params,
            ..Self::new(DocTagKind::Method, name, None)
        }
    }

    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Access mode for property tags. `None` for method tags.
    pub fn access(&self) -> Option<crate::Access> {
        match self.kind {
            DocTagKind::Property => Some(crate::Access::ReadWrite),
            DocTagKind::PropertyRead => Some(crate::Access::Read),
            DocTagKind::PropertyWrite => Some(crate::Access::Write),
            DocTagKind::Method => None,
        }
    }
}

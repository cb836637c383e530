//! Magic Registry
//!
//! Static class tables. Single source of truth for the members a host type
//! declares and the behavior configuration attached to them.
//! A table is immutable after construction via ClassMetaBuilder.
//!
//! Responsibilities:
//! - Describe properties and methods (visibility, type hints, accessors)
//! - Attach behavior attributes to members and to the class
//! - Carry parsed doc tags and behavior installers
//! - Hold the class-scope static call registry

mod attributes;
mod builder;
mod config;
mod installer;
mod meta;
mod types;

pub use attributes::*;
pub use builder::{ClassMetaBuilder, MethodBuilder, PropertyBuilder, RegistryError};
pub use config::MagicConfig;
pub use installer::{Installer, Priority};
pub use meta::{ClassMeta, MetaCell, MethodBody, MethodDef, PropertyDef, Reader, StaticHandler, Writer};
pub use types::*;

/// Build a `(reader, writer)` accessor pair for a host struct field.
///
/// The field type must convert into `Value` and back with `TryFrom<Value>`.
#[macro_export]
macro_rules! field {
    ($host:ty, $field:ident) => {
        (
            |host: &$host| $crate::__private::Value::from(host.$field.clone()),
            |host: &mut $host,
             value: $crate::__private::Value|
             -> $crate::__private::MagicResult<()> {
                host.$field = ::std::convert::TryFrom::try_from(value)?;
                Ok(())
            },
        )
    };
}

#[doc(hidden)]
pub mod __private {
    pub use magic_core::{MagicResult, Value};
}

//! The caster trait and the ordered caster list.

use crate::{
    BuiltinCaster, CastError, CastResult, ClassCaster, IntRangeCaster, TypedArrayCaster,
};
use magic_core::Value;
use std::fmt;
use std::sync::OnceLock;

/// A converter for a family of doc types.
pub trait CastsType: Send + Sync {
    /// Whether this caster understands `type_name`.
    fn supports(&self, type_name: &str) -> bool;

    /// Convert `value` to `type_name`.
    ///
    /// `caster` is the list this caster runs in, used to cast nested types.
    fn cast(&self, caster: &TypeCaster, type_name: &str, value: Value) -> CastResult<Value>;
}

/// `mixed` accepts any value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixedCaster;

impl CastsType for MixedCaster {
    fn supports(&self, type_name: &str) -> bool {
        type_name == "mixed"
    }

    fn cast(&self, _caster: &TypeCaster, _type_name: &str, value: Value) -> CastResult<Value> {
        Ok(value)
    }
}

/// An ordered list of casters. The first caster that supports a type wins.
pub struct TypeCaster {
    casters: Vec<Box<dyn CastsType>>,
}

impl Default for TypeCaster {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCaster {
    /// The standard list: mixed, builtin, ranged int, typed array, class.
    pub fn new() -> Self {
        Self {
            casters: vec![
                Box::new(MixedCaster),
                Box::new(BuiltinCaster),
                Box::new(IntRangeCaster),
                Box::new(TypedArrayCaster),
                Box::new(ClassCaster),
            ],
        }
    }

    /// A list with no casters at all.
    pub fn empty() -> Self {
        Self {
            casters: Vec::new(),
        }
    }

    /// Add a caster with the lowest precedence.
    pub fn append(&mut self, caster: impl CastsType + 'static) -> &mut Self {
        self.casters.push(Box::new(caster));
        self
    }

    /// Add a caster with the highest precedence.
    pub fn prepend(&mut self, caster: impl CastsType + 'static) -> &mut Self {
        self.casters.insert(0, Box::new(caster));
        self
    }

    pub fn len(&self) -> usize {
        self.casters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.casters.is_empty()
    }

    pub fn supports(&self, type_name: &str) -> bool {
        self.casters.iter().any(|c| c.supports(type_name))
    }

    pub fn cast(&self, type_name: &str, value: Value) -> CastResult<Value> {
        let type_name = type_name.trim();
        let caster = self
            .casters
            .iter()
            .find(|c| c.supports(type_name))
            .ok_or_else(|| CastError::UnsupportedType(type_name.to_string()))?;

        tracing::trace!(target: "magic::types", type_name, "casting value");
        caster.cast(self, type_name, value)
    }
}

impl fmt::Debug for TypeCaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCaster")
            .field("casters", &self.casters.len())
            .finish()
    }
}

/// Cast with the standard caster list.
pub fn cast(type_name: &str, value: Value) -> CastResult<Value> {
    static STANDARD: OnceLock<TypeCaster> = OnceLock::new();
    STANDARD.get_or_init(TypeCaster::new).cast(type_name, value)
}

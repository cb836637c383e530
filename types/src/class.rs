//! Class-typed values.

use crate::{CastError, CastResult, CastsType, TypeCaster};
use magic_core::{Object, Value};

/// Casts to a named class.
///
/// Any identifier the earlier casters do not claim is treated as a class
/// name. Objects of that class pass through and maps become instances with
/// the map's entries as fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassCaster;

fn is_class_name(type_name: &str) -> bool {
    let mut chars = type_name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '\\')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '\\')
}

impl CastsType for ClassCaster {
    fn supports(&self, type_name: &str) -> bool {
        is_class_name(type_name)
    }

    fn cast(&self, _caster: &TypeCaster, type_name: &str, value: Value) -> CastResult<Value> {
        match value {
            Value::Object(object) if object.class() == type_name => Ok(Value::Object(object)),
            Value::Object(object) => Ok(Value::Object(Object::from_fields(
                type_name,
                object.fields().clone(),
            ))),
            Value::Map(fields) => Ok(Value::Object(Object::from_fields(type_name, fields))),
            Value::Null => Ok(Value::Object(Object::new(type_name))),
            other => Err(CastError::invalid_value(
                type_name,
                format!("cannot construct from {}", other.type_name()),
            )),
        }
    }
}

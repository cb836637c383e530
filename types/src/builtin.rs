//! Lenient conversion for builtin scalar and container types.

use crate::{CastError, CastResult, CastsType, TypeCaster};
use magic_core::{Object, Value};
use regex_lite::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const BUILTIN_TYPES: &[&str] = &[
    "int", "integer", "float", "double", "string", "bool", "boolean", "array", "object", "null",
];

/// Casts to `int`, `float`, `string`, `bool`, `array`, `object` and `null`.
///
/// Strings convert by their leading numeric prefix, so `"1.1"` is `1` as an
/// int and `"a"` is `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCaster;

impl CastsType for BuiltinCaster {
    fn supports(&self, type_name: &str) -> bool {
        BUILTIN_TYPES.contains(&type_name)
    }

    fn cast(&self, _caster: &TypeCaster, type_name: &str, value: Value) -> CastResult<Value> {
        match type_name {
            "int" | "integer" => to_int(type_name, &value).map(Value::Int),
            "float" | "double" => to_float(type_name, &value).map(Value::Float),
            "string" => to_string(type_name, &value).map(Value::String),
            "bool" | "boolean" => Ok(Value::Bool(to_bool(&value))),
            "array" => Ok(to_array(value)),
            "object" => Ok(Value::Object(to_object(value))),
            "null" => Ok(Value::Null),
            _ => Err(CastError::UnsupportedType(type_name.to_string())),
        }
    }
}

fn numeric_prefix(s: &str) -> Option<&str> {
    static PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = PREFIX
        .get_or_init(|| Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").ok())
        .as_ref()?;
    regex.find(s).map(|m| m.as_str().trim_start())
}

fn not_scalar(type_name: &str, value: &Value) -> CastError {
    CastError::invalid_value(type_name, format!("cannot convert {}", value.type_name()))
}

pub(crate) fn to_int(type_name: &str, value: &Value) -> CastResult<i64> {
    match value {
        Value::Null => Ok(0),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Int(i) => Ok(*i),
        Value::Float(f) => Ok(*f as i64),
        Value::String(s) => Ok(match numeric_prefix(s) {
            Some(prefix) => prefix
                .parse::<i64>()
                .unwrap_or_else(|_| prefix.parse::<f64>().map(|f| f as i64).unwrap_or(0)),
            None => 0,
        }),
        _ => Err(not_scalar(type_name, value)),
    }
}

pub(crate) fn to_float(type_name: &str, value: &Value) -> CastResult<f64> {
    match value {
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        Value::String(s) => Ok(numeric_prefix(s)
            .and_then(|prefix| prefix.parse::<f64>().ok())
            .unwrap_or(0.0)),
        _ => Err(not_scalar(type_name, value)),
    }
}

pub(crate) fn to_string(type_name: &str, value: &Value) -> CastResult<String> {
    match value {
        Value::Null | Value::Bool(false) => Ok(String::new()),
        Value::Bool(true) => Ok("1".to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(float_to_string(*f)),
        Value::String(s) => Ok(s.clone()),
        _ => Err(not_scalar(type_name, value)),
    }
}

fn float_to_string(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

pub(crate) fn to_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::List(items) => !items.is_empty(),
        Value::Map(map) => !map.is_empty(),
        Value::Object(_) | Value::Host => true,
    }
}

/// Collections pass through, objects become maps of their fields, `null`
/// becomes an empty list and any other value is wrapped.
pub(crate) fn to_array(value: Value) -> Value {
    match value {
        Value::Null => Value::List(Vec::new()),
        Value::List(_) | Value::Map(_) => value,
        Value::Object(object) => Value::Map(object.fields().clone()),
        other => Value::List(vec![other]),
    }
}

fn to_object(value: Value) -> Object {
    match value {
        Value::Object(object) => object,
        Value::Null => Object::new("stdClass"),
        Value::Map(fields) => Object::from_fields("stdClass", fields),
        Value::List(items) => {
            let fields: BTreeMap<String, Value> = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect();
            Object::from_fields("stdClass", fields)
        }
        other => Object::new("stdClass").with("scalar", other),
    }
}

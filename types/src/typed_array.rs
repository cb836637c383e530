//! Typed arrays and collections.

use crate::builtin::{to_array, to_string};
use crate::{CastError, CastResult, CastsType, TypeCaster};
use magic_core::Value;
use regex_lite::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// A parsed array type.
///
/// Accepted shapes: `T[]`, `Container<V>` and `Container<K, V>`, where the
/// value type may itself be generic (`array<string, array<int>>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedArrayType {
    pub full_type: String,
    pub key_type: String,
    pub value_type: Option<String>,
    pub non_empty: bool,
}

fn generic_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^([A-Za-z_][\w-]*)<(.+)>$").ok())
        .as_ref()
}

/// Split on the first comma that is not nested inside angle brackets.
fn split_top_level(inner: &str) -> (Option<&str>, &str) {
    let mut depth = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return (Some(inner[..i].trim()), inner[i + 1..].trim()),
            _ => {}
        }
    }
    (None, inner.trim())
}

impl TypedArrayType {
    pub fn parse(full_type: &str) -> Self {
        let full_type = full_type.trim();
        let mut parsed = Self {
            full_type: full_type.to_string(),
            key_type: "int".to_string(),
            value_type: None,
            non_empty: full_type.starts_with("non-empty"),
        };

        if let Some(value_type) = full_type.strip_suffix("[]") {
            if !value_type.is_empty() {
                parsed.value_type = Some(value_type.trim().to_string());
            }
            return parsed;
        }

        let Some(captures) = generic_pattern().and_then(|p| p.captures(full_type)) else {
            return parsed;
        };
        // `int<0, 100>` is a ranged int, not a container
        if &captures[1] == "int" {
            return parsed;
        }

        let (key_type, value_type) = split_top_level(captures.get(2).map_or("", |m| m.as_str()));
        if let Some(key_type) = key_type.filter(|k| !k.is_empty()) {
            parsed.key_type = key_type.to_string();
        }
        if !value_type.is_empty() {
            parsed.value_type = Some(value_type.to_string());
        }
        parsed
    }

    pub fn is_valid(&self) -> bool {
        self.value_type.is_some()
    }
}

/// Casts every key and item of an array to the declared types.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedArrayCaster;

impl CastsType for TypedArrayCaster {
    fn supports(&self, type_name: &str) -> bool {
        TypedArrayType::parse(type_name).is_valid()
    }

    fn cast(&self, caster: &TypeCaster, type_name: &str, value: Value) -> CastResult<Value> {
        let parsed = TypedArrayType::parse(type_name);
        let value_type = parsed
            .value_type
            .as_deref()
            .ok_or_else(|| CastError::UnsupportedType(type_name.to_string()))?;

        let entries: Vec<(Value, Value)> = match to_array(value) {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (Value::Int(i as i64), item))
                .collect(),
            Value::Map(map) => map.into_iter().map(|(k, v)| (Value::String(k), v)).collect(),
            other => {
                return Err(CastError::invalid_value(
                    type_name,
                    format!("{} is not an array", other.type_name()),
                ))
            }
        };

        if parsed.non_empty && entries.is_empty() {
            return Err(CastError::out_of_range(type_name, "[]"));
        }

        let sequential = parsed.key_type == "int"
            && entries
                .iter()
                .enumerate()
                .all(|(i, (key, _))| key.as_int() == Some(i as i64));

        if sequential {
            let items = entries
                .into_iter()
                .map(|(_, item)| caster.cast(value_type, item))
                .collect::<CastResult<Vec<_>>>()?;
            return Ok(Value::List(items));
        }

        let mut converted = BTreeMap::new();
        for (key, item) in entries {
            let key = caster.cast(&parsed.key_type, key)?;
            let key = to_string(&parsed.key_type, &key)?;
            converted.insert(key, caster.cast(value_type, item)?);
        }
        Ok(Value::Map(converted))
    }
}

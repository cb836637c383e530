//! Ranged integer types.

use crate::builtin::to_int;
use crate::{CastError, CastResult, CastsType, TypeCaster};
use magic_core::Value;
use regex_lite::Regex;
use std::sync::OnceLock;

/// Casts to an int, then checks it against the type's range.
///
/// Supports `non-zero-int`, `positive-int`, `non-negative-int`,
/// `negative-int`, `non-positive-int` and `int<min|N, max|N>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntRangeCaster;

fn range_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^int<\s*(-?\d+|min)\s*,\s*(-?\d+|max)\s*>$").ok())
        .as_ref()
}

/// Inclusive bounds for a ranged int type.
fn bounds(type_name: &str) -> Option<(i64, i64)> {
    match type_name {
        "non-zero-int" => None,
        "positive-int" => Some((1, i64::MAX)),
        "non-negative-int" => Some((0, i64::MAX)),
        "negative-int" => Some((i64::MIN, -1)),
        "non-positive-int" => Some((i64::MIN, 0)),
        _ => {
            let captures = range_pattern()?.captures(type_name)?;
            let min = match &captures[1] {
                "min" => i64::MIN,
                n => n.parse().ok()?,
            };
            let max = match &captures[2] {
                "max" => i64::MAX,
                n => n.parse().ok()?,
            };
            Some((min, max))
        }
    }
}

impl CastsType for IntRangeCaster {
    fn supports(&self, type_name: &str) -> bool {
        type_name == "non-zero-int" || bounds(type_name).is_some()
    }

    fn cast(&self, _caster: &TypeCaster, type_name: &str, value: Value) -> CastResult<Value> {
        let int = to_int(type_name, &value)?;
        let passes = match bounds(type_name) {
            Some((min, max)) => (min..=max).contains(&int),
            None if type_name == "non-zero-int" => int != 0,
            None => return Err(CastError::UnsupportedType(type_name.to_string())),
        };

        if passes {
            Ok(Value::Int(int))
        } else {
            Err(CastError::out_of_range(type_name, int.to_string()))
        }
    }
}

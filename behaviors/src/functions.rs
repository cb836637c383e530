//! Builtin transformer functions and transformer resolution.

use magic_core::{MagicError, MagicResult, Object, Value};
use magic_dispatch::Magic;
use magic_registry::{ClassMeta, Transformer};

/// A builtin transformer.
pub type Function = fn(Value) -> MagicResult<Value>;

/// Look up a builtin transformer by name.
pub fn builtin(name: &str) -> Option<Function> {
    let function: Function = match name {
        "trim" => trim,
        "strtoupper" => strtoupper,
        "strtolower" => strtolower,
        "ucfirst" => ucfirst,
        "json_encode" => json_encode,
        "json_decode" => json_decode,
        "intval" => |value| cast("int", value),
        "floatval" => |value| cast("float", value),
        "strval" => |value| cast("string", value),
        "boolval" => |value| cast("bool", value),
        _ => return None,
    };
    Some(function)
}

fn cast(type_name: &str, value: Value) -> MagicResult<Value> {
    Ok(magic_types::cast(type_name, value)?)
}

fn string_of(value: Value) -> MagicResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Ok(magic_types::cast("string", other)?
            .as_str()
            .unwrap_or_default()
            .to_string()),
    }
}

fn trim(value: Value) -> MagicResult<Value> {
    Ok(Value::from(string_of(value)?.trim()))
}

fn strtoupper(value: Value) -> MagicResult<Value> {
    Ok(Value::from(string_of(value)?.to_uppercase()))
}

fn strtolower(value: Value) -> MagicResult<Value> {
    Ok(Value::from(string_of(value)?.to_lowercase()))
}

fn ucfirst(value: Value) -> MagicResult<Value> {
    let s = string_of(value)?;
    let mut chars = s.chars();
    Ok(Value::from(match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    }))
}

fn json_encode(value: Value) -> MagicResult<Value> {
    serde_json::to_string(&value.to_json())
        .map(Value::from)
        .map_err(|err| MagicError::invalid_value("json", err.to_string()))
}

/// JSON objects decode to `stdClass` objects, arrays to lists.
fn json_decode(value: Value) -> MagicResult<Value> {
    let text = string_of(value)?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .map_err(|err| MagicError::invalid_value("json", err.to_string()))?;
    Ok(objects_to_std_class(Value::from(json)))
}

fn objects_to_std_class(value: Value) -> Value {
    match value {
        Value::Map(map) => Value::Object(Object::from_fields(
            "stdClass",
            map.into_iter()
                .map(|(k, v)| (k, objects_to_std_class(v)))
                .collect(),
        )),
        Value::List(items) => Value::List(items.into_iter().map(objects_to_std_class).collect()),
        other => other,
    }
}

/// Fail unless every named transformer resolves to a method of the class or
/// a builtin function.
pub(crate) fn validate<H>(meta: &ClassMeta<H>, transformers: &[Transformer]) -> MagicResult<()> {
    for transformer in transformers {
        if let Transformer::Named(name) = transformer {
            if !meta.has_method(name) && builtin(name).is_none() {
                return Err(MagicError::configuration(format!(
                    "Transformer {} is not callable on {}",
                    name,
                    meta.name()
                )));
            }
        }
    }
    Ok(())
}

/// Pipe a value through transformers in order.
///
/// Named transformers resolve to a host method first, then a builtin.
pub fn apply_transformers<H: Magic>(
    host: &mut H,
    transformers: &[Transformer],
    value: Value,
) -> MagicResult<Value> {
    let meta = H::meta()?;
    let mut value = value;
    for transformer in transformers {
        value = match transformer {
            Transformer::Func(f) => f(value)?,
            Transformer::Named(name) => match meta.method(name) {
                Some(method) => method.invoke(host, vec![value])?,
                None => {
                    let function = builtin(name).ok_or_else(|| {
                        MagicError::configuration(format!("Transformer {} is not callable", name))
                    })?;
                    function(value)?
                }
            },
        };
    }
    Ok(value)
}

//! Typed variable values and their string encoding.

use serde_json::{Number, Value};

use crate::error::VariablesError;

/// A variable value, classified by kind.
///
/// Numbers keep the token they were read from (`1.50` stays `1.50`, `1e3`
/// stays `1e3`), so integers wider than `i64` and exact decimals survive
/// encoding. `Unsupported` keeps the original JSON so it can be reported
/// back to the caller; it is never stringified.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Integer(Number),
    Float(Number),
    Boolean(bool),
    Text(String),
    Unsupported(Value),
}

impl From<Value> for VariableValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => Self::from(n),
            Value::String(s) => Self::Text(s),
            Value::Bool(b) => Self::Boolean(b),
            other @ (Value::Null | Value::Array(_) | Value::Object(_)) => Self::Unsupported(other),
        }
    }
}

impl From<Number> for VariableValue {
    fn from(n: Number) -> Self {
        if n.is_i64() || n.is_u64() {
            Self::Integer(n)
        } else {
            Self::Float(n)
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for VariableValue {
                fn from(v: $t) -> Self {
                    Self::Integer(Number::from(v))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl TryFrom<f64> for VariableValue {
    type Error = VariablesError;

    /// # Errors
    ///
    /// `NonFiniteNumber` for NaN and infinities.
    fn try_from(v: f64) -> Result<Self, Self::Error> {
        Number::from_f64(v)
            .map(Self::Float)
            .ok_or(VariablesError::NonFiniteNumber { value: v })
    }
}

impl TryFrom<f32> for VariableValue {
    type Error = VariablesError;

    fn try_from(v: f32) -> Result<Self, Self::Error> {
        Self::try_from(f64::from(v))
    }
}

impl From<bool> for VariableValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for VariableValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for VariableValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// Encode a value in its stored string form.
///
/// Numbers are emitted as their JSON token, unchanged. Booleans become
/// `true`/`false` and text is wrapped in double quotes as-is. Quotes inside
/// the text are not escaped; callers must not pass text containing them.
///
/// # Errors
///
/// Returns `UnsupportedValueKind` for objects, arrays and nulls.
pub fn stringify_value(value: &VariableValue) -> Result<String, VariablesError> {
    match value {
        VariableValue::Integer(n) | VariableValue::Float(n) => Ok(n.to_string()),
        VariableValue::Boolean(b) => Ok(b.to_string()),
        VariableValue::Text(s) => Ok(format!("\"{s}\"")),
        VariableValue::Unsupported(v) => Err(VariablesError::unsupported(v.to_string())),
    }
}

/// Decode a stored string into the most specific value it parses as.
///
/// Tries integer, then float, then boolean; anything else is returned as
/// text with one layer of surrounding double quotes removed. Never fails.
/// `NaN` and `inf` parse as floats but have no JSON form, so they fall
/// through to text.
#[must_use]
pub fn destringify_value(data: &str) -> VariableValue {
    if let Ok(i) = data.parse::<i64>() {
        return VariableValue::from(i);
    }
    if let Some(n) = data.parse::<f64>().ok().and_then(Number::from_f64) {
        return VariableValue::Float(n);
    }
    if let Some(b) = parse_bool(data) {
        return VariableValue::Boolean(b);
    }
    let trimmed = data.strip_prefix('"').unwrap_or(data);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    VariableValue::Text(trimmed.to_owned())
}

fn parse_bool(data: &str) -> Option<bool> {
    match data {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Numbers of any width and booleans.
#[must_use]
pub fn is_primitive_type(value: &VariableValue) -> bool {
    match value {
        VariableValue::Integer(_) | VariableValue::Float(_) | VariableValue::Boolean(_) => true,
        VariableValue::Text(_) | VariableValue::Unsupported(_) => false,
    }
}

#[must_use]
pub fn is_string_type(value: &VariableValue) -> bool {
    matches!(value, VariableValue::Text(_))
}

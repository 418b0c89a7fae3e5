//! Shape checks for JSON and YAML documents.
//!
//! Both checks accept only mapping documents. Scalars and sequences are
//! rejected even when they are syntactically valid.

use serde_json::{Map, Value};

/// `true` when `input` parses as a JSON object.
#[must_use]
pub fn is_valid_json(input: &str) -> bool {
    serde_json::from_str::<Map<String, Value>>(input).is_ok()
}

/// `true` when `input` parses as YAML and its JSON form is an object.
///
/// Scalar keys such as `1` or `true` are accepted and become their string
/// form in the JSON document.
#[must_use]
pub fn is_valid_yaml(input: &str) -> bool {
    let Ok(document) = serde_saphyr::from_str::<Value>(input) else {
        return false;
    };
    serde_json::to_string(&document).is_ok_and(|json| is_valid_json(&json))
}

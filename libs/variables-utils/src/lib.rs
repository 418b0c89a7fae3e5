#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Variable value helpers
//!
//! Converts scoped-variable values between their typed form and the string
//! form they are stored in, and performs cheap shape checks on JSON/YAML
//! documents before they are accepted as variable payloads.
//!
//! - [`VariableValue`] - closed set of value kinds a variable can carry
//! - [`stringify_value`] / [`destringify_value`] - string encoding and best-effort decoding
//! - [`is_valid_json`] / [`is_valid_yaml`] - "is this a mapping document" checks
//! - [`is_primitive_type`] / [`is_string_type`] - kind classification
//!
//! ## Round trips
//!
//! `destringify_value(stringify_value(v)?)` returns `v` for booleans and
//! integers. It is not a strict round trip for every text: an unquoted
//! `"07"` decodes as the integer `7`, so the leading zero is lost.
//! Numbers read from JSON keep their token, so `1.50` encodes as `1.50`.

pub mod error;
pub mod shape;
pub mod value;

pub use error::VariablesError;
pub use shape::{is_valid_json, is_valid_yaml};
pub use value::{
    VariableValue, destringify_value, is_primitive_type, is_string_type, stringify_value,
};

//! Helpers referenced by code generated from `#[tool]`. Not a stable API.

use serde::Serialize;
use serde_json::Value;

use crate::error::{BoxError, CallError, CallResult};

pub use serde_json;

/// Converts a plain return value into a tool result.
///
/// # Errors
///
/// Returns [`CallError::Native`] when the value cannot be serialized.
pub fn into_value<T: Serialize>(output: T) -> CallResult<Value> {
    serde_json::to_value(output).map_err(CallError::native)
}

/// Converts a fallible return value into a tool result, passing the
/// function's own error through as [`CallError::Native`].
///
/// # Errors
///
/// Returns the function's error or a serialization failure.
pub fn from_result<T, E>(output: Result<T, E>) -> CallResult<Value>
where
    T: Serialize,
    E: Into<BoxError>,
{
    output.map_err(CallError::native).and_then(into_value)
}

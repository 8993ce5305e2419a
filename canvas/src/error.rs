//! Error taxonomy for canvas mutations.
//!
//! Every fallible operation validates first and commits second, so an `Err`
//! always means the engine is still in its last valid state.

use serde_json::Value;

/// Error returned when a proposed value is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    /// A shape list or style record is malformed.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The value has the wrong kind (e.g. a boolean alpha, a bool pixel buffer).
    #[error("unsupported type: {0}")]
    Type(String),
    /// The value has the right kind but lies outside the accepted domain.
    #[error("invalid value: {0}")]
    Value(String),
}

impl CanvasError {
    /// Wrap any error as a [`CanvasError::Validation`] with a context prefix.
    #[must_use]
    pub fn context(self, what: &str) -> Self {
        match self {
            Self::Validation(msg) => Self::Validation(format!("{what}: {msg}")),
            Self::Type(msg) | Self::Value(msg) => Self::Validation(format!("{what}: {msg}")),
        }
    }
}

/// Short name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

//! Alpha codec: every user-supplied fill alpha passes through [`decode`].
//!
//! Accepted inputs are hex strings (lenient: only the last two characters are
//! kept, shorter strings are left-padded), integers in `0..=255`, and floats in
//! `0.0..=1.0`. The canonical form is a two-digit lowercase hex string.

#[cfg(test)]
#[path = "alpha_test.rs"]
mod alpha_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::MAX_SAMPLE;
use crate::error::{CanvasError, json_kind};

/// A canonical fill alpha in `0..=255`, displayed as `"00"`..`"ff"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Alpha(u8);

impl Alpha {
    pub const TRANSPARENT: Self = Self(0);
    pub const OPAQUE: Self = Self(u8::MAX);

    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Two-digit lowercase hex form, e.g. `"0a"`.
    #[must_use]
    pub fn hex(self) -> String {
        format!("{:02x}", self.0)
    }
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

/// An alpha value as supplied by a caller, before canonicalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlphaInput {
    /// Integer alpha in `0..=255`.
    Int(i64),
    /// Fractional alpha in `0.0..=1.0`.
    Float(f64),
    /// Hex string such as `"80"` or `"#1f77b480"`.
    Hex(String),
}

impl AlphaInput {
    /// Classify a JSON value as an alpha input.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Type`] for anything that is not a string or a
    /// number, and [`CanvasError::Value`] for integers too large for `i64`.
    pub fn from_json(value: &Value) -> Result<Self, CanvasError> {
        match value {
            Value::String(s) => Ok(Self::Hex(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if n.is_u64() {
                    Err(CanvasError::Value(format!("alpha should be between 0 and 255 [{n}]")))
                } else {
                    n.as_f64()
                        .map(Self::Float)
                        .ok_or_else(|| CanvasError::Value(format!("alpha is not a finite number [{n}]")))
                }
            }
            other => Err(CanvasError::Type(format!(
                "alpha should be a hex string, integer or float [{}]",
                json_kind(other)
            ))),
        }
    }
}

impl From<&str> for AlphaInput {
    fn from(value: &str) -> Self {
        Self::Hex(value.to_owned())
    }
}

impl From<String> for AlphaInput {
    fn from(value: String) -> Self {
        Self::Hex(value)
    }
}

impl From<i64> for AlphaInput {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u8> for AlphaInput {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for AlphaInput {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Canonicalize an alpha input.
///
/// # Errors
///
/// Returns [`CanvasError::Value`] when an integer is outside `0..=255`, a float
/// is outside `0.0..=1.0` (NaN included), or the retained string characters
/// are not hex digits.
pub fn decode(input: &AlphaInput) -> Result<Alpha, CanvasError> {
    match input {
        AlphaInput::Hex(raw) => decode_hex(raw),
        AlphaInput::Int(v) => u8::try_from(*v)
            .map(Alpha)
            .map_err(|_| CanvasError::Value(format!("alpha should be between 0 and 255 [{v}]"))),
        AlphaInput::Float(v) => {
            if !(0.0..=1.0).contains(v) {
                return Err(CanvasError::Value(format!("alpha should be between 0 and 1 [{v}]")));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let scaled = (v * MAX_SAMPLE).round() as u8;
            Ok(Alpha(scaled))
        }
    }
}

/// Canonicalize an alpha straight from JSON.
///
/// # Errors
///
/// See [`AlphaInput::from_json`] and [`decode`].
pub fn decode_json(value: &Value) -> Result<Alpha, CanvasError> {
    decode(&AlphaInput::from_json(value)?)
}

fn decode_hex(raw: &str) -> Result<Alpha, CanvasError> {
    let chars: Vec<char> = raw.chars().collect();
    let tail: String = match chars.len() {
        0 => return Ok(Alpha::TRANSPARENT),
        1 => ['0', chars[0]].iter().collect(),
        n => chars[n - 2..].iter().collect(),
    };

    if !tail.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CanvasError::Value(format!("alpha should be a hex string [{raw}]")));
    }
    u8::from_str_radix(&tail, 16)
        .map(Alpha)
        .map_err(|_| CanvasError::Value(format!("alpha should be a hex string [{raw}]")))
}

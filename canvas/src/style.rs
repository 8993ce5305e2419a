//! Style scopes and their precedence.
//!
//! A shape's effective style is built by layering, lowest precedence first:
//! the engine default, the shape's own overrides, the hover override (when the
//! shape is hovered), and the click override (when the shape is clicked).

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alpha::{self, Alpha, AlphaInput};
use crate::color::Rgb;
use crate::consts::{DEFAULT_ALPHA, DEFAULT_COLOR, DEFAULT_SIZE};
use crate::error::{CanvasError, json_kind};

/// A fully resolved style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Stroke color; also the fill color.
    pub color: Rgb,
    /// Fill alpha.
    pub alpha: Alpha,
    /// Border thickness in viewport pixels. Zero disables the stroke.
    pub size: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self { color: DEFAULT_COLOR, alpha: DEFAULT_ALPHA, size: DEFAULT_SIZE }
    }
}

impl Style {
    /// Return this style with every field set in `over` replaced.
    #[must_use]
    pub fn apply(self, over: &StyleOverride) -> Self {
        Self {
            color: over.color.unwrap_or(self.color),
            alpha: over.alpha.unwrap_or(self.alpha),
            size: over.size.unwrap_or(self.size),
        }
    }
}

/// A partial style. Unset fields leave the underlying style untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleOverride {
    pub color: Option<Rgb>,
    pub alpha: Option<Alpha>,
    pub size: Option<u32>,
}

impl StyleOverride {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.alpha.is_none() && self.size.is_none()
    }

    /// Read the optional `color`, `alpha`, and `size` keys of a JSON mapping.
    ///
    /// Other keys are ignored. JSON `null` for a key counts as unset.
    ///
    /// # Errors
    ///
    /// Returns the field-level [`CanvasError::Type`] / [`CanvasError::Value`]
    /// of the first bad field.
    pub fn from_fields(map: &serde_json::Map<String, Value>) -> Result<Self, CanvasError> {
        let color = match map.get("color") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(Rgb::parse(s)?),
            Some(other) => {
                return Err(CanvasError::Type(format!("color should be an RGB string [{}]", json_kind(other))));
            }
        };
        let alpha = match map.get("alpha") {
            None | Some(Value::Null) => None,
            Some(v) => Some(alpha::decode_json(v)?),
        };
        let size = match map.get("size") {
            None | Some(Value::Null) => None,
            Some(v) => Some(parse_size(v)?),
        };
        Ok(Self { color, alpha, size })
    }

    /// Parse a style record (`{color?, alpha?, size?}`) from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] when the value is not a mapping or
    /// any field is malformed.
    pub fn from_json(value: &Value) -> Result<Self, CanvasError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Self::from_fields(map).map_err(|e| e.context("style record")),
            other => Err(CanvasError::Validation(format!("style record should be a mapping [{}]", json_kind(other)))),
        }
    }
}

/// A style record as written in configuration files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<AlphaInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

impl StyleInput {
    /// Validate every present field.
    ///
    /// # Errors
    ///
    /// Returns the field-level error of the first bad field.
    pub fn validate(&self) -> Result<StyleOverride, CanvasError> {
        let color = self.color.as_deref().map(Rgb::parse).transpose()?;
        let alpha = self.alpha.as_ref().map(alpha::decode).transpose()?;
        let size = self.size.map(size_from_i64).transpose()?;
        Ok(StyleOverride { color, alpha, size })
    }
}

/// The three style scopes held by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleSet {
    pub default: Style,
    pub hover: StyleOverride,
    pub click: StyleOverride,
}

impl StyleSet {
    /// Effective style of a shape given its overrides and selection state.
    ///
    /// Click takes precedence over hover when both apply.
    #[must_use]
    pub fn resolve(&self, shape: &StyleOverride, hovered: bool, clicked: bool) -> Style {
        let mut style = self.default.apply(shape);
        if hovered {
            style = style.apply(&self.hover);
        }
        if clicked {
            style = style.apply(&self.click);
        }
        style
    }
}

fn parse_size(value: &Value) -> Result<u32, CanvasError> {
    match value.as_i64() {
        Some(raw) => size_from_i64(raw),
        None if value.is_u64() => Err(CanvasError::Value(format!("border size is too large [{value}]"))),
        None => Err(CanvasError::Type(format!("border size should be an integer [{}]", json_kind(value)))),
    }
}

fn size_from_i64(raw: i64) -> Result<u32, CanvasError> {
    if raw < 0 {
        return Err(CanvasError::Value(format!("border size should be bigger or equal than zero [{raw}]")));
    }
    u32::try_from(raw).map_err(|_| CanvasError::Value(format!("border size is too large [{raw}]")))
}

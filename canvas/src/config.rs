//! Engine configuration.
//!
//! Every field is optional in the serialized form and falls back to the
//! engine defaults. Raw values are kept as written so that a bad config is
//! reported through the same codecs as a bad runtime update.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::alpha::AlphaInput;
use crate::consts::{DEFAULT_COLOR, DEFAULT_SIZE, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use crate::error::CanvasError;
use crate::hit::HitPolicy;
use crate::style::{Style, StyleInput, StyleOverride, StyleSet};
use crate::transform::Size;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub color: String,
    pub alpha: AlphaInput,
    pub size: i64,
    /// Scale small images up to fill the viewport.
    pub enlarge: bool,
    /// Clear shapes whenever the image is replaced.
    pub auto_clear: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_style: Option<StyleInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_style: Option<StyleInput>,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub hit_policy: HitPolicy,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.hex(),
            alpha: AlphaInput::Hex("00".into()),
            size: i64::from(DEFAULT_SIZE),
            enlarge: true,
            auto_clear: true,
            hover_style: None,
            click_style: None,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            hit_policy: HitPolicy::Topmost,
        }
    }
}

/// A config whose style fields have been decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidConfig {
    pub styles: StyleSet,
    pub enlarge: bool,
    pub auto_clear: bool,
    pub viewport: Size,
    pub hit_policy: HitPolicy,
}

impl CanvasConfig {
    /// Parse a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] when the document is not valid JSON
    /// or a field has the wrong shape.
    pub fn from_json_str(raw: &str) -> Result<Self, CanvasError> {
        serde_json::from_str(raw).map_err(|e| CanvasError::Validation(format!("config: {e}")))
    }

    /// Decode every style field.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] naming the first bad field.
    pub fn validate(&self) -> Result<ValidConfig, CanvasError> {
        let default = StyleInput {
            color: Some(self.color.clone()),
            alpha: Some(self.alpha.clone()),
            size: Some(self.size),
        }
        .validate()
        .map_err(|e| e.context("default style"))?;

        Ok(ValidConfig {
            styles: StyleSet {
                default: Style::default().apply(&default),
                hover: scope(self.hover_style.as_ref(), "hover style")?,
                click: scope(self.click_style.as_ref(), "click style")?,
            },
            enlarge: self.enlarge,
            auto_clear: self.auto_clear,
            viewport: Size::new(self.viewport_width, self.viewport_height),
            hit_policy: self.hit_policy,
        })
    }
}

fn scope(input: Option<&StyleInput>, what: &str) -> Result<StyleOverride, CanvasError> {
    input
        .map(StyleInput::validate)
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(|e| e.context(what))
}

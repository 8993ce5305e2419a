//! RGB color parsing for shape and style colors.
//!
//! Colors arrive as CSS-like strings: `#RGB`, `#RRGGBB`, or `rgb(r, g, b)`.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::fmt;

use crate::error::CanvasError;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color string.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Value`] when the string is not `#RGB`,
    /// `#RRGGBB`, or `rgb(r, g, b)`.
    pub fn parse(raw: &str) -> Result<Self, CanvasError> {
        parse_hex_rgb(raw)
            .or_else(|| parse_rgb_function(raw))
            .map(|(r, g, b)| Self { r, g, b })
            .ok_or_else(|| CanvasError::Value(format!("color should be an RGB string [{raw}]")))
    }

    /// Canonical lowercase `#rrggbb`.
    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let (r, g, b) = match hex.len() {
        3 => (hex[0..1].repeat(2), hex[1..2].repeat(2), hex[2..3].repeat(2)),
        6 => (hex[0..2].to_owned(), hex[2..4].to_owned(), hex[4..6].to_owned()),
        _ => return None,
    };
    Some((byte(&r, 16)?, byte(&g, 16)?, byte(&b, 16)?))
}

/// Parse `rgb(r, g, b)` with integer channels in `0..=255`.
#[must_use]
pub fn parse_rgb_function(raw: &str) -> Option<(u8, u8, u8)> {
    let inner = raw
        .trim()
        .strip_prefix("rgb")?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let mut channels = inner.split(',').map(str::trim);
    let r = byte(channels.next()?, 10)?;
    let g = byte(channels.next()?, 10)?;
    let b = byte(channels.next()?, 10)?;
    if channels.next().is_some() {
        return None;
    }
    Some((r, g, b))
}

fn byte(digits: &str, radix: u32) -> Option<u8> {
    if digits.starts_with('+') {
        return None;
    }
    match u8::from_str_radix(digits, radix) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

//! Shared constants for the canvas crate.

use crate::alpha::Alpha;
use crate::color::Rgb;

// ── Default style ───────────────────────────────────────────────

/// Default stroke/fill color (`#1F77B4`).
pub const DEFAULT_COLOR: Rgb = Rgb::new(0x1f, 0x77, 0xb4);

/// Default fill alpha: fully transparent, so shapes render as outlines.
pub const DEFAULT_ALPHA: Alpha = Alpha::TRANSPARENT;

/// Default border thickness in viewport pixels.
pub const DEFAULT_SIZE: u32 = 2;

// ── Viewport ────────────────────────────────────────────────────

pub const DEFAULT_VIEWPORT_WIDTH: u32 = 600;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 400;

// ── Pixels ──────────────────────────────────────────────────────

/// Largest sample value of the canonical 8-bit format.
pub const MAX_SAMPLE: f64 = 255.0;

/// Channels per pixel in the canonical RGBA buffer.
pub const RGBA_CHANNELS: usize = 4;

//! Image buffer normalization.
//!
//! Callers hand over a [`RawImage`]: a dense, row-major, channel-last sample
//! buffer of any supported element type. [`normalize`] turns it into the
//! single pixel format the renderer handles, an 8-bit RGBA [`Image`].
//!
//! Rules, checked in order:
//! 1. `None` is valid and means "no image".
//! 2. The buffer must be 2-D (grayscale) or 3-D (channel-last).
//! 3. Integer samples must lie in `0..=255`.
//! 4. Float samples are read as `0.0..=1.0` and scaled by 255.
//!
//! Grayscale is broadcast to three channels and 3-channel input gains an
//! opaque alpha channel; 4-channel input passes through.

#[cfg(test)]
#[path = "image_test.rs"]
mod image_test;

use crate::consts::{MAX_SAMPLE, RGBA_CHANNELS};
use crate::error::CanvasError;
use crate::transform::Size;

/// Typed sample storage for a raw buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    /// Boolean masks are not images; kept so callers can hand them over and
    /// get a type error back.
    Bool(Vec<bool>),
}

impl Samples {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name, for error messages.
    #[must_use]
    pub fn dtype(&self) -> &'static str {
        match self {
            Self::U8(_) => "uint8",
            Self::U16(_) => "uint16",
            Self::I32(_) => "int32",
            Self::I64(_) => "int64",
            Self::F32(_) => "float32",
            Self::F64(_) => "float64",
            Self::Bool(_) => "bool",
        }
    }
}

/// A caller-supplied pixel buffer: `dims` is `[height, width]` or
/// `[height, width, channels]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub dims: Vec<usize>,
    pub samples: Samples,
}

impl RawImage {
    #[must_use]
    pub fn new(dims: Vec<usize>, samples: Samples) -> Self {
        Self { dims, samples }
    }

    /// Height in pixels (first dimension), or 0 for a dimensionless buffer.
    #[must_use]
    pub fn height(&self) -> usize {
        self.dims.first().copied().unwrap_or(0)
    }

    /// Width in pixels (second dimension), or 0.
    #[must_use]
    pub fn width(&self) -> usize {
        self.dims.get(1).copied().unwrap_or(0)
    }

    /// Samples per pixel: 1 for a 2-D buffer.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.dims.get(2).copied().unwrap_or(1)
    }

    /// Copy the window `[x0, x1) × [y0, y1)`, clipped to the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Value`] when the buffer shape is inconsistent
    /// with its sample count.
    pub fn crop(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> Result<Self, CanvasError> {
        check_layout(self)?;
        let (w, h, c) = (self.width(), self.height(), self.channels());
        let (x1, y1) = (x1.min(w), y1.min(h));
        let (x0, y0) = (x0.min(x1), y0.min(y1));

        let window = Window { width: w, channels: c, x0, y0, x1, y1 };
        let samples = match &self.samples {
            Samples::U8(v) => Samples::U8(window.copy(v)),
            Samples::U16(v) => Samples::U16(window.copy(v)),
            Samples::I32(v) => Samples::I32(window.copy(v)),
            Samples::I64(v) => Samples::I64(window.copy(v)),
            Samples::F32(v) => Samples::F32(window.copy(v)),
            Samples::F64(v) => Samples::F64(window.copy(v)),
            Samples::Bool(v) => Samples::Bool(window.copy(v)),
        };

        let mut dims = vec![y1 - y0, x1 - x0];
        if self.dims.len() == 3 {
            dims.push(c);
        }
        Ok(Self { dims, samples })
    }
}

struct Window {
    width: usize,
    channels: usize,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl Window {
    fn copy<T: Copy>(&self, data: &[T]) -> Vec<T> {
        let row_len = self.width * self.channels;
        if row_len == 0 {
            return Vec::new();
        }
        let mut out = Vec::with_capacity((self.x1 - self.x0) * (self.y1 - self.y0) * self.channels);
        for row in data.chunks_exact(row_len).skip(self.y0).take(self.y1 - self.y0) {
            out.extend_from_slice(&row[self.x0 * self.channels..self.x1 * self.channels]);
        }
        out
    }
}

/// A canonical 8-bit RGBA image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    /// Wrap an existing RGBA8 buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Value`] when `data` is not `width * height * 4`
    /// bytes or the image is empty.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CanvasError> {
        let expected = width as usize * height as usize * RGBA_CHANNELS;
        if width == 0 || height == 0 {
            return Err(CanvasError::Value(format!("image is empty [{height}x{width}]")));
        }
        if data.len() != expected {
            return Err(CanvasError::Value(format!(
                "buffer holds {} bytes, expected {expected} for {height}x{width}x4",
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA of the pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    #[must_use]
    pub fn into_rgba8(self) -> Vec<u8> {
        self.data
    }
}

/// Normalize a raw buffer into the canonical RGBA8 form.
///
/// # Errors
///
/// - [`CanvasError::Value`] for unsupported shapes (not 2-D/3-D, channel
///   count other than 1, 3, 4), sample counts that do not match `dims`, empty
///   images, and integer samples outside `0..=255`.
/// - [`CanvasError::Type`] for unsupported element types.
pub fn normalize(raw: Option<&RawImage>) -> Result<Option<Image>, CanvasError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    check_layout(raw)?;

    let pixels = raw.width() * raw.height();
    let channels = raw.channels();
    let data = match &raw.samples {
        Samples::U8(v) => expand(v, channels, pixels, |s| s),
        Samples::U16(v) => expand(&narrow(v, raw)?, channels, pixels, |s| s),
        Samples::I32(v) => expand(&narrow(v, raw)?, channels, pixels, |s| s),
        Samples::I64(v) => expand(&narrow(v, raw)?, channels, pixels, |s| s),
        Samples::F32(v) => expand(v, channels, pixels, |s| unit_to_u8(f64::from(s))),
        Samples::F64(v) => expand(v, channels, pixels, unit_to_u8),
        Samples::Bool(_) => {
            return Err(CanvasError::Type(format!("image type not supported [{}]", raw.samples.dtype())));
        }
    };

    let width = u32::try_from(raw.width()).map_err(|_| CanvasError::Value("image too wide".into()))?;
    let height = u32::try_from(raw.height()).map_err(|_| CanvasError::Value("image too tall".into()))?;
    Image::from_rgba8(width, height, data).map(Some)
}

fn check_layout(raw: &RawImage) -> Result<(), CanvasError> {
    let unsupported = || CanvasError::Value(format!("image shape not supported [{:?}, {}]", raw.dims, raw.samples.dtype()));
    match raw.dims.as_slice() {
        [_, _] | [_, _, 1 | 3 | 4] => {}
        _ => return Err(unsupported()),
    }
    let expected: usize = raw.dims.iter().product();
    if expected != raw.samples.len() {
        return Err(CanvasError::Value(format!(
            "image shape {:?} needs {expected} samples, got {}",
            raw.dims,
            raw.samples.len()
        )));
    }
    Ok(())
}

fn narrow<T>(samples: &[T], raw: &RawImage) -> Result<Vec<u8>, CanvasError>
where
    T: Copy + TryInto<u8> + std::fmt::Display,
{
    samples
        .iter()
        .map(|&s| {
            s.try_into()
                .map_err(|_| CanvasError::Value(format!("{} sample outside 0-255 [{s}]", raw.samples.dtype())))
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_u8(sample: f64) -> u8 {
    // `as` saturates: out-of-range samples clamp and NaN becomes 0.
    (sample * MAX_SAMPLE).round() as u8
}

fn expand<T: Copy>(samples: &[T], channels: usize, pixels: usize, to_u8: impl Fn(T) -> u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels * RGBA_CHANNELS);
    for px in samples.chunks_exact(channels) {
        match px {
            [g] => {
                let g = to_u8(*g);
                out.extend_from_slice(&[g, g, g, u8::MAX]);
            }
            [r, g, b] => out.extend_from_slice(&[to_u8(*r), to_u8(*g), to_u8(*b), u8::MAX]),
            [r, g, b, a] => out.extend_from_slice(&[to_u8(*r), to_u8(*g), to_u8(*b), to_u8(*a)]),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};

/// A point in either image or viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Width × height in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Mapping between image pixel space and viewport pixel space.
///
/// The image is scaled uniformly by `scale` and centered, leaving
/// `offset_x` / `offset_y` pixels of margin on the left / top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    image: Size,
}

impl Transform {
    /// Fit `image` into `viewport` preserving aspect ratio.
    ///
    /// With `enlarge` the image always fills the viewport along its limiting
    /// axis; without it the image is only ever shrunk. Margins are floored to
    /// whole pixels.
    #[must_use]
    pub fn fit(image: Size, viewport: Size, enlarge: bool) -> Self {
        if image.is_empty() {
            return Self { scale: 0.0, offset_x: 0.0, offset_y: 0.0, image };
        }

        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        let (vw, vh) = (f64::from(viewport.width), f64::from(viewport.height));

        let fit = (vw / iw).min(vh / ih);
        let scale = if enlarge { fit } else { fit.min(1.0) };

        Self {
            scale,
            offset_x: ((vw - iw * scale) / 2.0).floor(),
            offset_y: ((vh - ih * scale) / 2.0).floor(),
            image,
        }
    }

    /// Identity mapping over `area`; used when no image is loaded.
    #[must_use]
    pub fn identity(area: Size) -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0, image: area }
    }

    /// Size of the image space this transform was built for.
    #[must_use]
    pub fn image_size(&self) -> Size {
        self.image
    }

    /// Size of the rendered image in viewport pixels.
    #[must_use]
    pub fn rendered_size(&self) -> (f64, f64) {
        (f64::from(self.image.width) * self.scale, f64::from(self.image.height) * self.scale)
    }

    /// Convert an image-space point to viewport coordinates.
    #[must_use]
    pub fn image_to_viewport(&self, image: Point) -> Point {
        Point {
            x: image.x * self.scale + self.offset_x,
            y: image.y * self.scale + self.offset_y,
        }
    }

    /// Convert a viewport point to image coordinates.
    ///
    /// Returns `None` when the point falls outside the rendered image area.
    #[must_use]
    pub fn viewport_to_image(&self, viewport: Point) -> Option<Point> {
        if self.scale <= 0.0 || !self.scale.is_finite() {
            return None;
        }
        let p = Point {
            x: (viewport.x - self.offset_x) / self.scale,
            y: (viewport.y - self.offset_y) / self.scale,
        };
        let inside = p.x >= 0.0
            && p.y >= 0.0
            && p.x < f64::from(self.image.width)
            && p.y < f64::from(self.image.height);
        inside.then_some(p)
    }
}

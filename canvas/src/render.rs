//! Rendering: rasterizes the image and shapes into a viewport-sized frame.
//!
//! This module is the only place that touches `tiny_skia`. It receives
//! read-only views of engine state and produces pixels; it does not mutate
//! any engine state.
//!
//! Layers, bottom first:
//! 1. transparent background;
//! 2. the image, scaled by the fit transform;
//! 3. shapes in ascending index order, each stroked then filled.
//!
//! Shape paths are built in viewport space so border thickness stays in
//! viewport pixels regardless of image scale.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use tiny_skia::{
    ColorU8, FillRule, FilterQuality, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform as SkTransform,
};

use crate::consts::RGBA_CHANNELS;
use crate::image::Image;
use crate::shape::Shape;
use crate::style::{Style, StyleSet};
use crate::transform::{Point, Size, Transform};

/// A rendered frame: straight (non-premultiplied) RGBA8, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// A fully transparent frame.
    #[must_use]
    pub fn blank(size: Size) -> Self {
        let len = size.width as usize * size.height as usize * RGBA_CHANNELS;
        Self { width: size.width, height: size.height, data: vec![0; len] }
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
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA of the pixel at `(x, y)`, or `None` outside the frame.
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

/// Read-only view of everything needed to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub viewport: Size,
    pub transform: Transform,
    pub image: Option<&'a Image>,
    pub shapes: &'a [Shape],
    pub styles: &'a StyleSet,
    pub hovered: Option<usize>,
    pub clicked: Option<usize>,
}

impl Scene<'_> {
    /// Effective style of shape `index`.
    #[must_use]
    pub fn style_of(&self, index: usize) -> Option<Style> {
        let shape = self.shapes.get(index)?;
        Some(self.styles.resolve(&shape.style, self.hovered == Some(index), self.clicked == Some(index)))
    }
}

/// Draw the full scene.
///
/// An empty viewport yields an empty frame.
#[must_use]
pub fn draw(scene: &Scene<'_>) -> Frame {
    let Some(mut pixmap) = Pixmap::new(scene.viewport.width, scene.viewport.height) else {
        return Frame::blank(scene.viewport);
    };

    if let Some(image) = scene.image {
        draw_image(&mut pixmap, image, &scene.transform);
    }

    for (index, shape) in scene.shapes.iter().enumerate() {
        if let Some(style) = scene.style_of(index) {
            draw_shape(&mut pixmap, shape, style, &scene.transform);
        }
    }

    to_frame(&pixmap)
}

// =============================================================
// Layers
// =============================================================

fn draw_image(pixmap: &mut Pixmap, image: &Image, transform: &Transform) {
    if transform.scale <= 0.0 {
        return;
    }
    let Some(source) = image_pixmap(image) else {
        return;
    };

    let quality = if (transform.scale - 1.0).abs() < f64::EPSILON {
        FilterQuality::Nearest
    } else {
        FilterQuality::Bilinear
    };
    let paint = PixmapPaint { quality, ..PixmapPaint::default() };
    let placement = SkTransform::from_scale(to_f32(transform.scale), to_f32(transform.scale))
        .post_translate(to_f32(transform.offset_x), to_f32(transform.offset_y));

    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, placement, None);
}

fn draw_shape(pixmap: &mut Pixmap, shape: &Shape, style: Style, transform: &Transform) {
    let ring: Vec<Point> = shape
        .geometry
        .to_polygon()
        .into_iter()
        .map(|p| transform.image_to_viewport(p))
        .collect();
    let Some((first, rest)) = ring.split_first() else {
        return;
    };

    let mut pb = PathBuilder::new();
    pb.move_to(to_f32(first.x), to_f32(first.y));
    for p in rest {
        pb.line_to(to_f32(p.x), to_f32(p.y));
    }
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };

    let Style { color, alpha, size } = style;
    let mut paint = Paint { anti_alias: true, ..Paint::default() };

    if size > 0 {
        paint.set_color_rgba8(color.r, color.g, color.b, u8::MAX);
        #[allow(clippy::cast_precision_loss)]
        let stroke = Stroke { width: size as f32, ..Stroke::default() };
        pixmap.stroke_path(&path, &paint, &stroke, SkTransform::identity(), None);
    }

    if alpha.value() > 0 {
        paint.set_color_rgba8(color.r, color.g, color.b, alpha.value());
        pixmap.fill_path(&path, &paint, FillRule::EvenOdd, SkTransform::identity(), None);
    }
}

// =============================================================
// Pixel conversion
// =============================================================

fn image_pixmap(image: &Image) -> Option<Pixmap> {
    let mut data = Vec::with_capacity(image.data().len());
    for px in image.data().chunks_exact(RGBA_CHANNELS) {
        let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Pixmap::from_vec(data, IntSize::from_wh(image.width(), image.height())?)
}

fn to_frame(pixmap: &Pixmap) -> Frame {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Frame { width: pixmap.width(), height: pixmap.height(), data }
}

#[allow(clippy::cast_possible_truncation)]
fn to_f32(v: f64) -> f32 {
    v as f32
}

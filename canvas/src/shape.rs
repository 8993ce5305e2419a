//! Shape model: rectangles and polygons with per-shape style overrides.
//!
//! Shapes are positional: index in the list is z-order, hit-test priority, and
//! the identity reported to observers. Replacing the list invalidates every
//! index handed out before.
//!
//! Validation is structural only. A shape list must be `null` or a list of
//! mappings; rectangles need `x`, `y`, `width`, `height`; polygons need
//! `coords` as a list of numeric pairs. Coordinate ranges are the caller's
//! responsibility.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CanvasError, json_kind};
use crate::hit;
use crate::style::StyleOverride;
use crate::transform::Point;

const RECT_FIELDS: [&str; 4] = ["x", "y", "width", "height"];

/// Geometry of a drawable shape, in image pixel units.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned rectangle from its top-left corner.
    Rect { x: f64, y: f64, width: f64, height: f64 },
    /// Closed polygon; the last point connects back to the first.
    Polygon { coords: Vec<Point> },
}

impl Geometry {
    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect { x, y, width, height }
    }

    #[must_use]
    pub fn polygon(coords: Vec<Point>) -> Self {
        Self::Polygon { coords }
    }

    /// Vertex ring of this geometry. Rectangles yield four points clockwise
    /// from the top-left corner.
    #[must_use]
    pub fn to_polygon(&self) -> Vec<Point> {
        match self {
            Self::Rect { x, y, width, height } => vec![
                Point::new(*x, *y),
                Point::new(x + width, *y),
                Point::new(x + width, y + height),
                Point::new(*x, y + height),
            ],
            Self::Polygon { coords } => coords.clone(),
        }
    }

    /// Whether the image-space point lies inside (even-odd rule for polygons).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Rect { x, y, width, height } => hit::point_in_rect(p, *x, *y, *width, *height),
            Self::Polygon { coords } => hit::point_in_polygon(p, coords),
        }
    }

    /// Unsigned area (shoelace formula for polygons).
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Self::Rect { width, height, .. } => (width * height).abs(),
            Self::Polygon { coords } => {
                let n = coords.len();
                let twice: f64 = (0..n)
                    .map(|i| {
                        let a = coords[(i + n - 1) % n];
                        let b = coords[i];
                        a.x * b.y - a.y * b.x
                    })
                    .sum();
                (twice / 2.0).abs()
            }
        }
    }

    /// Mean of the vertices; the rectangle center for rectangles.
    #[must_use]
    pub fn centroid(&self) -> Point {
        let ring = self.to_polygon();
        if ring.is_empty() {
            return Point::new(0.0, 0.0);
        }
        #[allow(clippy::cast_precision_loss)]
        let n = ring.len() as f64;
        let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }
}

/// A drawable annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub geometry: Geometry,
    pub style: StyleOverride,
    /// Free-form caption carried for collaborators; never rendered here.
    pub label: Option<String>,
}

impl Shape {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry, style: StyleOverride::default(), label: None }
    }

    #[must_use]
    pub fn with_style(mut self, style: StyleOverride) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Segmentation geometry of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaskGeometry {
    /// A single boundary ring.
    Ring(Vec<Point>),
    /// A polygon with holes; only the exterior is drawn.
    WithHoles {
        exterior: Vec<Point>,
        #[serde(default)]
        interiors: Vec<Vec<Point>>,
    },
}

/// Boundary ring of a mask, exterior only. A closing point that repeats the
/// first one is dropped.
#[must_use]
pub fn polygon_from_mask(mask: &MaskGeometry) -> Vec<Point> {
    let ring = match mask {
        MaskGeometry::Ring(ring) => ring,
        MaskGeometry::WithHoles { exterior, .. } => exterior,
    };
    let mut coords = ring.clone();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    coords
}

/// Validate a JSON shape list.
///
/// `null` clears (returns `Ok(None)`).
///
/// # Errors
///
/// Returns [`CanvasError::Validation`] naming the first offending shape.
pub fn shapes_from_json(value: &Value) -> Result<Option<Vec<Shape>>, CanvasError> {
    let list = match value {
        Value::Null => return Ok(None),
        Value::Array(list) => list,
        other => {
            return Err(CanvasError::Validation(format!(
                "shapes should be a list of mappings [{}]",
                json_kind(other)
            )));
        }
    };

    list.iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => shape_from_map(map).map_err(|e| e.context(&format!("shape {index}"))),
            other => Err(CanvasError::Validation(format!("shape {index} should be a mapping [{}]", json_kind(other)))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn shape_from_map(map: &Map<String, Value>) -> Result<Shape, CanvasError> {
    let geometry = match map.get("coords") {
        Some(coords) => Geometry::Polygon { coords: parse_coords(coords)? },
        None => {
            let [x, y, width, height] = RECT_FIELDS.map(|field| rect_field(map, field));
            Geometry::Rect { x: x?, y: y?, width: width?, height: height? }
        }
    };

    let style = StyleOverride::from_fields(map)?;
    let label = match map.get("label") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => return Err(CanvasError::Type(format!("label should be a string [{}]", json_kind(other)))),
    };

    Ok(Shape { geometry, style, label })
}

fn rect_field(map: &Map<String, Value>, field: &str) -> Result<f64, CanvasError> {
    let value = map
        .get(field)
        .ok_or_else(|| CanvasError::Validation(format!("rectangle missing `{field}`")))?;
    value
        .as_f64()
        .ok_or_else(|| CanvasError::Type(format!("rectangle `{field}` should be a number [{}]", json_kind(value))))
}

fn parse_coords(value: &Value) -> Result<Vec<Point>, CanvasError> {
    let bad = || CanvasError::Validation("polygon coords should be a list of numeric pairs".into());
    let Value::Array(items) = value else {
        return Err(bad());
    };
    items
        .iter()
        .map(|item| match item.as_array().map(Vec::as_slice) {
            Some([x, y]) => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => Ok(Point::new(x, y)),
                _ => Err(bad()),
            },
            _ => Err(bad()),
        })
        .collect()
}

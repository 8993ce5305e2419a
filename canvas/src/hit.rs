#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::shape::Shape;
use crate::transform::Point;

/// How overlapping candidates are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// The last-drawn (highest index) containing shape wins.
    #[default]
    Topmost,
    /// The containing shape with the smallest area wins; equal areas fall
    /// back to the centroid nearest the point, then to the highest index.
    SmallestArea,
}

/// Point-in-rectangle over the half-open box `[x, x+w) × [y, y+h)`.
///
/// Negative extents are normalized.
#[must_use]
pub fn point_in_rect(p: Point, x: f64, y: f64, width: f64, height: f64) -> bool {
    let (x0, x1) = if width < 0.0 { (x + width, x) } else { (x, x + width) };
    let (y0, y1) = if height < 0.0 { (y + height, y) } else { (y, y + height) };
    p.x >= x0 && p.x < x1 && p.y >= y0 && p.y < y1
}

/// Even-odd point-in-polygon (ray casting).
///
/// Self-intersecting rings follow the even-odd rule, so doubly covered
/// regions count as outside. Rings with fewer than three points contain
/// nothing.
#[must_use]
pub fn point_in_polygon(p: Point, coords: &[Point]) -> bool {
    if coords.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = coords.len() - 1;
    for i in 0..coords.len() {
        let (a, b) = (coords[i], coords[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Index of the shape under the image-space point `p`, if any.
#[must_use]
pub fn hit_test(p: Point, shapes: &[Shape], policy: HitPolicy) -> Option<usize> {
    let mut candidates = shapes
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, shape)| shape.geometry.contains(p));

    match policy {
        HitPolicy::Topmost => candidates.next().map(|(index, _)| index),
        HitPolicy::SmallestArea => {
            let mut best: Option<(usize, f64, f64)> = None;
            for (index, shape) in candidates {
                let area = shape.geometry.area();
                let c = shape.geometry.centroid();
                let dist = (p.x - c.x).hypot(p.y - c.y);
                let better = match best {
                    None => true,
                    Some((_, best_area, best_dist)) => area < best_area || (area == best_area && dist < best_dist),
                };
                if better {
                    best = Some((index, area, dist));
                }
            }
            best.map(|(index, _, _)| index)
        }
    }
}

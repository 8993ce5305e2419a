#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_serializes_as_pair() {
    let p: Point = serde_json::from_str("[1.5, 2.0]").unwrap();
    assert_eq!(p, Point::new(1.5, 2.0));
    assert_eq!(serde_json::to_string(&p).unwrap(), "[1.5,2.0]");
}

// --- fit ---

#[test]
fn fit_enlarges_wide_image() {
    let t = Transform::fit(Size::new(100, 50), Size::new(200, 200), true);
    assert_eq!(t.scale, 2.0);
    assert_eq!(t.rendered_size(), (200.0, 100.0));
    assert_eq!(t.offset_x, 0.0);
    assert_eq!(t.offset_y, 50.0);
}

#[test]
fn fit_without_enlarge_never_upscales() {
    let t = Transform::fit(Size::new(100, 50), Size::new(200, 200), false);
    assert_eq!(t.scale, 1.0);
    assert_eq!(t.offset_x, 50.0);
    assert_eq!(t.offset_y, 75.0);
}

#[test]
fn fit_without_enlarge_still_shrinks() {
    let t = Transform::fit(Size::new(400, 100), Size::new(200, 200), false);
    assert_eq!(t.scale, 0.5);
    assert_eq!(t.rendered_size(), (200.0, 50.0));
    assert_eq!(t.offset_y, 75.0);
}

#[test]
fn fit_floors_odd_margins() {
    let t = Transform::fit(Size::new(10, 10), Size::new(15, 10), false);
    assert_eq!(t.offset_x, 2.0);
}

#[test]
fn fit_exact_size_has_no_margin() {
    let t = Transform::fit(Size::new(10, 10), Size::new(10, 10), false);
    assert_eq!(t.scale, 1.0);
    assert_eq!(t.offset_x, 0.0);
    assert_eq!(t.offset_y, 0.0);
}

// --- mappings ---

#[test]
fn forward_mapping_applies_scale_then_margin() {
    let t = Transform::fit(Size::new(100, 50), Size::new(200, 200), true);
    let v = t.image_to_viewport(Point::new(10.0, 10.0));
    assert!(point_approx_eq(v, Point::new(20.0, 70.0)));
}

#[test]
fn inverse_mapping_undoes_forward() {
    let t = Transform::fit(Size::new(100, 50), Size::new(200, 200), true);
    let img = Point::new(33.0, 12.5);
    let back = t.viewport_to_image(t.image_to_viewport(img)).unwrap();
    assert!(point_approx_eq(back, img));
}

#[test]
fn inverse_mapping_in_top_margin_misses() {
    let t = Transform::fit(Size::new(100, 50), Size::new(200, 200), true);
    assert!(t.viewport_to_image(Point::new(50.0, 49.0)).is_none());
    assert!(t.viewport_to_image(Point::new(50.0, 50.0)).is_some());
}

#[test]
fn inverse_mapping_in_bottom_margin_misses() {
    let t = Transform::fit(Size::new(100, 50), Size::new(200, 200), true);
    assert!(t.viewport_to_image(Point::new(50.0, 150.0)).is_none());
    assert!(t.viewport_to_image(Point::new(50.0, 149.9)).is_some());
}

#[test]
fn zero_viewport_always_misses() {
    let t = Transform::fit(Size::new(10, 10), Size::new(0, 0), true);
    assert_eq!(t.scale, 0.0);
    assert!(t.viewport_to_image(Point::new(0.0, 0.0)).is_none());
}

#[test]
fn empty_image_always_misses() {
    let t = Transform::fit(Size::new(0, 10), Size::new(100, 100), true);
    assert!(t.viewport_to_image(Point::new(1.0, 1.0)).is_none());
}

#[test]
fn identity_covers_area() {
    let t = Transform::identity(Size::new(10, 10));
    assert!(point_approx_eq(t.viewport_to_image(Point::new(4.0, 4.0)).unwrap(), Point::new(4.0, 4.0)));
    assert!(t.viewport_to_image(Point::new(10.0, 4.0)).is_none());
}

#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use super::*;
use crate::alpha::Alpha;
use crate::color::Rgb;
use crate::image::Samples;
use crate::shape::Geometry;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn black_rgb(width: usize, height: usize) -> RawImage {
    RawImage::new(vec![height, width, 3], Samples::U8(vec![0; width * height * 3]))
}

/// 10×10 black image, one 4×4 box at (2, 2), viewport 10×10, no enlarge.
fn scenario() -> EngineCore {
    let mut core = EngineCore::new();
    core.set_viewport(10, 10);
    core.set_enlarge(false);
    core.try_set_image(Some(&black_rgb(10, 10))).unwrap();
    core.try_set_shapes(&json!([{"x": 2, "y": 2, "width": 4, "height": 4}])).unwrap();
    core
}

fn overlapping() -> EngineCore {
    let mut core = scenario();
    core.set_shapes(Some(vec![
        Shape::new(Geometry::rect(0.0, 0.0, 10.0, 10.0)),
        Shape::new(Geometry::rect(2.0, 2.0, 4.0, 4.0)),
    ]));
    core
}

fn recorded(core: &mut EngineCore) -> Rc<RefCell<Vec<Event>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    core.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    seen
}

// =============================================================
// End-to-end scenario
// =============================================================

#[test]
fn hover_click_and_reset_scenario() {
    let mut core = scenario();
    let t = core.transform();
    assert_eq!(t.scale, 1.0);
    assert_eq!((t.offset_x, t.offset_y), (0.0, 0.0));

    core.pointer_move(pt(4.0, 4.0));
    assert_eq!(core.hovered(), Some(0));
    core.pointer_move(pt(0.0, 0.0));
    assert_eq!(core.hovered(), None);

    core.pointer_click(pt(4.0, 4.0));
    assert_eq!(core.clicked(), Some(0));
    core.try_set_shapes(&json!([])).unwrap();
    assert_eq!(core.clicked(), None);
}

// =============================================================
// Image
// =============================================================

#[test]
fn new_engine_has_defaults() {
    let core = EngineCore::new();
    assert!(core.image().is_none());
    assert!(core.shapes().is_empty());
    assert_eq!(core.viewport(), Size::new(600, 400));
    assert!(core.enlarge());
    assert!(core.auto_clear());
    assert!(!core.save_requested());
    assert_eq!(core.styles().default, Style::default());
}

#[test]
fn image_with_auto_clear_clears_shapes() {
    let mut core = scenario();
    core.pointer_click(pt(4.0, 4.0));
    let events = core.try_set_image(Some(&black_rgb(10, 10))).unwrap();

    assert!(core.shapes().is_empty());
    assert_eq!(core.clicked(), None);
    assert_eq!(
        events,
        vec![
            Event::ImageChanged,
            Event::ShapesChanged { count: 0 },
            Event::ClickedChanged { previous: Some(0), current: None },
            Event::RenderNeeded,
        ]
    );
}

#[test]
fn image_without_auto_clear_keeps_shapes() {
    let mut core = scenario();
    core.set_auto_clear(false);
    core.pointer_move(pt(4.0, 4.0));

    let events = core.try_set_image(Some(&black_rgb(10, 10))).unwrap();

    assert_eq!(core.shapes().len(), 1);
    assert_eq!(core.hovered(), None);
    assert!(!events.contains(&Event::ShapesChanged { count: 0 }));
}

#[test]
fn rejected_image_leaves_state_untouched() {
    let mut core = scenario();
    core.pointer_move(pt(4.0, 4.0));
    let bad = RawImage::new(vec![2, 2, 2], Samples::U8(vec![0; 8]));

    assert!(matches!(core.try_set_image(Some(&bad)), Err(CanvasError::Value(_))));
    assert_eq!(core.image().map(Image::size), Some(Size::new(10, 10)));
    assert_eq!(core.shapes().len(), 1);
    assert_eq!(core.hovered(), Some(0));
}

#[test]
fn clearing_image_falls_back_to_identity() {
    let mut core = EngineCore::new();
    core.set_viewport(100, 100);
    core.try_set_image(Some(&black_rgb(10, 10))).unwrap();
    assert_eq!(core.transform().scale, 10.0);

    core.try_set_image(None).unwrap();
    assert!(core.image().is_none());
    assert_eq!(core.transform(), Transform::identity(Size::new(100, 100)));
}

// =============================================================
// Shapes
// =============================================================

#[test]
fn identical_shapes_still_reset_selection() {
    let mut core = scenario();
    core.pointer_move(pt(4.0, 4.0));
    core.pointer_click(pt(4.0, 4.0));

    let same = core.shapes().to_vec();
    let events = core.set_shapes(Some(same));

    assert_eq!(core.hovered(), None);
    assert_eq!(core.clicked(), None);
    assert_eq!(
        events,
        vec![
            Event::ShapesChanged { count: 1 },
            Event::HoveredChanged { previous: Some(0), current: None },
            Event::ClickedChanged { previous: Some(0), current: None },
            Event::RenderNeeded,
        ]
    );
}

#[test]
fn rejected_shapes_keep_previous_list() {
    let mut core = scenario();
    core.pointer_click(pt(4.0, 4.0));

    let err = core.try_set_shapes(&json!([{"x": 1, "y": 1, "width": 2}])).unwrap_err();

    assert!(matches!(err, CanvasError::Validation(_)));
    assert_eq!(core.shapes().len(), 1);
    assert_eq!(core.clicked(), Some(0));
}

#[test]
fn null_and_empty_shapes_are_equivalent() {
    let mut core = scenario();
    core.try_set_shapes(&json!(null)).unwrap();
    assert!(core.shapes().is_empty());
    assert_eq!(core.hit_at(pt(4.0, 4.0)), None);

    core.try_set_shapes(&json!([])).unwrap();
    assert!(core.shapes().is_empty());
    assert_eq!(core.hit_at(pt(4.0, 4.0)), None);
}

// =============================================================
// Pointer
// =============================================================

#[test]
fn overlap_resolves_to_topmost() {
    let mut core = overlapping();
    core.pointer_move(pt(3.0, 3.0));
    assert_eq!(core.hovered(), Some(1));
    core.pointer_move(pt(8.0, 8.0));
    assert_eq!(core.hovered(), Some(0));
}

#[test]
fn smallest_area_policy_is_configurable() {
    let mut core = overlapping();
    core.set_shapes(Some(vec![
        Shape::new(Geometry::rect(2.0, 2.0, 4.0, 4.0)),
        Shape::new(Geometry::rect(0.0, 0.0, 10.0, 10.0)),
    ]));
    core.set_hit_policy(HitPolicy::SmallestArea);
    assert_eq!(core.hit_at(pt(3.0, 3.0)), Some(0));
}

#[test]
fn move_emits_only_on_change() {
    let mut core = scenario();
    let events = core.pointer_move(pt(4.0, 4.0));
    assert_eq!(events, vec![Event::HoveredChanged { previous: None, current: Some(0) }, Event::RenderNeeded]);

    assert!(core.pointer_move(pt(5.0, 5.0)).is_empty());
    assert!(core.pointer_move(pt(0.0, 0.0)).len() == 2);
    assert!(core.pointer_move(pt(9.0, 9.0)).is_empty());
}

#[test]
fn click_on_background_clears_selection() {
    let mut core = scenario();
    core.pointer_click(pt(4.0, 4.0));
    let events = core.pointer_click(pt(9.0, 9.0));
    assert_eq!(core.clicked(), None);
    assert_eq!(events[0], Event::ClickedChanged { previous: Some(0), current: None });
}

#[test]
fn pointer_in_margin_misses() {
    let mut core = EngineCore::new();
    core.set_viewport(200, 200);
    let raw = RawImage::new(vec![50, 100], Samples::U8(vec![0; 5000]));
    core.try_set_image(Some(&raw)).unwrap();
    core.set_shapes(Some(vec![Shape::new(Geometry::rect(0.0, 0.0, 100.0, 50.0))]));

    assert_eq!(core.hit_at(pt(50.0, 49.0)), None);
    assert_eq!(core.hit_at(pt(50.0, 50.0)), Some(0));
    assert_eq!(core.hit_at(pt(199.0, 149.0)), Some(0));
    assert_eq!(core.hit_at(pt(100.0, 150.0)), None);
}

#[test]
fn pointer_leave_clears_hover() {
    let mut core = scenario();
    core.pointer_move(pt(4.0, 4.0));
    let events = core.pointer_leave();
    assert_eq!(core.hovered(), None);
    assert_eq!(events[0], Event::HoveredChanged { previous: Some(0), current: None });
    assert!(core.pointer_leave().is_empty());
}

#[test]
fn set_clicked_validates_index() {
    let mut core = scenario();
    assert!(matches!(core.set_clicked(Some(1)), Err(CanvasError::Value(_))));
    assert_eq!(core.clicked(), None);

    core.set_clicked(Some(0)).unwrap();
    assert_eq!(core.clicked(), Some(0));
    core.set_clicked(None).unwrap();
    assert_eq!(core.clicked(), None);
}

// =============================================================
// Viewport / transform cache
// =============================================================

#[test]
fn viewport_change_recomputes_transform() {
    let mut core = scenario();
    assert_eq!(core.transform().scale, 1.0);

    let events = core.set_viewport(20, 20);
    assert_eq!(events, vec![Event::ViewportChanged, Event::RenderNeeded]);
    // Enlarge is off, so a bigger viewport only re-centers.
    let t = core.transform();
    assert_eq!(t.scale, 1.0);
    assert_eq!((t.offset_x, t.offset_y), (5.0, 5.0));

    core.set_enlarge(true);
    assert_eq!(core.transform().scale, 2.0);
    core.pointer_move(pt(10.0, 10.0));
    assert_eq!(core.hovered(), Some(0));
}

#[test]
fn unchanged_viewport_emits_nothing() {
    let mut core = scenario();
    assert!(core.set_viewport(10, 10).is_empty());
    assert!(core.set_enlarge(false).is_empty());
}

#[test]
fn zero_viewport_misses_everything() {
    let mut core = scenario();
    core.set_viewport(0, 0);
    assert_eq!(core.hit_at(pt(0.0, 0.0)), None);
    assert_eq!(core.render().width(), 0);
}

// =============================================================
// Styles
// =============================================================

#[test]
fn default_style_json_merges_fields() {
    let mut core = EngineCore::new();
    let events = core.try_set_default_style_json(&json!({"color": "#ff0000"})).unwrap();
    assert_eq!(events[0], Event::StyleChanged(StyleScope::Default));
    assert_eq!(core.styles().default.color, Rgb::new(255, 0, 0));
    assert_eq!(core.styles().default.size, 2);
}

#[test]
fn hover_style_json_replaces_and_null_clears() {
    let mut core = EngineCore::new();
    core.try_set_hover_style_json(&json!({"alpha": 0.5})).unwrap();
    assert_eq!(core.styles().hover.alpha, Some(Alpha::new(128)));

    core.try_set_hover_style_json(&json!(null)).unwrap();
    assert!(core.styles().hover.is_empty());
}

#[test]
fn bad_style_json_is_rejected() {
    let mut core = EngineCore::new();
    core.try_set_click_style_json(&json!({"size": 4})).unwrap();

    assert!(matches!(core.try_set_click_style_json(&json!({"size": -4})), Err(CanvasError::Validation(_))));
    assert!(matches!(core.try_set_click_style_json(&json!([1])), Err(CanvasError::Validation(_))));
    assert_eq!(core.styles().click.size, Some(4));
}

#[test]
fn config_seeds_engine() {
    let config = CanvasConfig {
        size: 5,
        enlarge: false,
        viewport_width: 32,
        viewport_height: 16,
        ..CanvasConfig::default()
    };
    let core = EngineCore::with_config(&config).unwrap();
    assert_eq!(core.styles().default.size, 5);
    assert!(!core.enlarge());
    assert_eq!(core.viewport(), Size::new(32, 16));
}

// =============================================================
// Render
// =============================================================

#[test]
fn render_reflects_click_style() {
    let mut core = scenario();
    core.set_click_style(StyleOverride { color: Some(Rgb::new(255, 0, 0)), alpha: Some(Alpha::OPAQUE), size: None });

    assert_eq!(core.render().pixel(4, 4), Some([0, 0, 0, 255]));
    core.pointer_click(pt(4.0, 4.0));
    assert_eq!(core.render().pixel(4, 4), Some([255, 0, 0, 255]));
}

#[test]
fn render_emits_no_events() {
    let mut core = scenario();
    let seen = recorded(&mut core);
    core.render();
    assert!(seen.borrow().is_empty());
}

// =============================================================
// Save flag
// =============================================================

#[test]
fn save_request_is_edge_triggered() {
    let mut core = EngineCore::new();
    assert_eq!(core.request_save(), vec![Event::SaveRequested]);
    assert!(core.save_requested());
    assert!(core.request_save().is_empty());

    assert_eq!(core.complete_save(), vec![Event::SaveCompleted]);
    assert!(!core.save_requested());
    assert!(core.complete_save().is_empty());
}

// =============================================================
// Listeners
// =============================================================

#[test]
fn listeners_see_returned_events_in_order() {
    let mut core = scenario();
    let seen = recorded(&mut core);

    let mut expected = core.pointer_move(pt(4.0, 4.0));
    expected.extend(core.pointer_click(pt(4.0, 4.0)));
    expected.extend(core.try_set_shapes(&json!([])).unwrap());

    assert_eq!(*seen.borrow(), expected);
}

#[test]
fn unsubscribed_listener_is_silent() {
    let mut core = scenario();
    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    let id = core.subscribe(move |_| *sink.borrow_mut() += 1);

    core.pointer_move(pt(4.0, 4.0));
    assert!(core.unsubscribe(id));
    core.pointer_move(pt(0.0, 0.0));

    assert_eq!(*seen.borrow(), 2);
}

//! Canvas engine: owns image, shapes, styles, and selection state.
//!
//! Every mutating call validates first and commits second. Calls that change
//! observable state return the [`Event`]s they caused, in order, after
//! delivering them to subscribed listeners.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::CanvasConfig;
use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use crate::error::CanvasError;
use crate::event::{Event, ListenerId, Listeners, StyleScope};
use crate::hit::{self, HitPolicy};
use crate::image::{self, Image, RawImage};
use crate::render::{self, Frame, Scene};
use crate::shape::{self, Shape};
use crate::style::{Style, StyleOverride, StyleSet};
use crate::transform::{Point, Size, Transform};

/// Inputs the fit transform depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TransformKey {
    image: Option<Size>,
    viewport: Size,
    enlarge: bool,
}

/// Core engine state.
///
/// Indices reported through `hovered` / `clicked` refer to the current shape
/// list and are reset whenever that list is replaced.
#[derive(Debug)]
pub struct EngineCore {
    image: Option<Image>,
    shapes: Vec<Shape>,
    styles: StyleSet,
    hovered: Option<usize>,
    clicked: Option<usize>,
    enlarge: bool,
    auto_clear: bool,
    save_requested: bool,
    viewport: Size,
    hit_policy: HitPolicy,
    cached: Option<(TransformKey, Transform)>,
    listeners: Listeners,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            image: None,
            shapes: Vec::new(),
            styles: StyleSet::default(),
            hovered: None,
            clicked: None,
            enlarge: true,
            auto_clear: true,
            save_requested: false,
            viewport: Size::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
            hit_policy: HitPolicy::default(),
            cached: None,
            listeners: Listeners::new(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] when a style field is malformed.
    pub fn with_config(config: &CanvasConfig) -> Result<Self, CanvasError> {
        let valid = config.validate()?;
        Ok(Self {
            styles: valid.styles,
            enlarge: valid.enlarge,
            auto_clear: valid.auto_clear,
            viewport: valid.viewport,
            hit_policy: valid.hit_policy,
            ..Self::default()
        })
    }

    // --- Listeners ---

    /// Register a callback that receives every emitted event.
    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // --- Image ---

    /// Normalize and install a raw image buffer; `None` clears the image.
    ///
    /// # Errors
    ///
    /// Returns the normalization error; engine state is left untouched.
    pub fn try_set_image(&mut self, raw: Option<&RawImage>) -> Result<Vec<Event>, CanvasError> {
        match image::normalize(raw) {
            Ok(image) => Ok(self.set_image(image)),
            Err(e) => {
                warn!(error = %e, "image rejected");
                Err(e)
            }
        }
    }

    /// Install an already-normalized image.
    ///
    /// Hover and click always reset. With auto-clear on, the shape list is
    /// cleared too, even when the new image equals the old one.
    pub fn set_image(&mut self, image: Option<Image>) -> Vec<Event> {
        debug!(size = ?image.as_ref().map(Image::size), auto_clear = self.auto_clear, "set image");
        self.image = image;

        let mut events = vec![Event::ImageChanged];
        if self.auto_clear {
            self.shapes.clear();
            events.push(Event::ShapesChanged { count: 0 });
        }
        self.reset_selection(&mut events);
        events.push(Event::RenderNeeded);
        self.emit(events)
    }

    // --- Shapes ---

    /// Validate and install a JSON shape list; `null` clears.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`]; the previous shapes are kept.
    pub fn try_set_shapes(&mut self, value: &Value) -> Result<Vec<Event>, CanvasError> {
        match shape::shapes_from_json(value) {
            Ok(shapes) => Ok(self.set_shapes(shapes)),
            Err(e) => {
                warn!(error = %e, "shapes rejected");
                Err(e)
            }
        }
    }

    /// Replace the shape list. `None` and an empty list are equivalent.
    ///
    /// Hover and click always reset, since old indices no longer apply.
    pub fn set_shapes(&mut self, shapes: Option<Vec<Shape>>) -> Vec<Event> {
        self.shapes = shapes.unwrap_or_default();
        debug!(count = self.shapes.len(), "set shapes");

        let mut events = vec![Event::ShapesChanged { count: self.shapes.len() }];
        self.reset_selection(&mut events);
        events.push(Event::RenderNeeded);
        self.emit(events)
    }

    // --- Pointer ---

    /// Update `hovered` from a viewport-space pointer position.
    pub fn pointer_move(&mut self, at: Point) -> Vec<Event> {
        let hit = self.hit_at(at);
        self.update_hovered(hit)
    }

    /// Update `clicked` from a viewport-space pointer position.
    pub fn pointer_click(&mut self, at: Point) -> Vec<Event> {
        let hit = self.hit_at(at);
        self.update_clicked(hit)
    }

    /// The pointer left the viewport: nothing is hovered.
    pub fn pointer_leave(&mut self) -> Vec<Event> {
        self.update_hovered(None)
    }

    /// Select a shape programmatically.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Value`] when `index` is past the end of the
    /// shape list.
    pub fn set_clicked(&mut self, index: Option<usize>) -> Result<Vec<Event>, CanvasError> {
        if let Some(i) = index {
            if i >= self.shapes.len() {
                let err = CanvasError::Value(format!("shape index out of range [{i} >= {}]", self.shapes.len()));
                warn!(error = %err, "selection rejected");
                return Err(err);
            }
        }
        Ok(self.update_clicked(index))
    }

    /// Index of the shape under a viewport-space point, if any.
    pub fn hit_at(&mut self, at: Point) -> Option<usize> {
        let transform = self.transform();
        let hit = transform
            .viewport_to_image(at)
            .and_then(|p| hit::hit_test(p, &self.shapes, self.hit_policy));
        trace!(x = at.x, y = at.y, ?hit, "hit test");
        hit
    }

    // --- Viewport ---

    pub fn set_viewport(&mut self, width: u32, height: u32) -> Vec<Event> {
        let viewport = Size::new(width, height);
        if viewport == self.viewport {
            return Vec::new();
        }
        debug!(width, height, "set viewport");
        self.viewport = viewport;
        self.emit(vec![Event::ViewportChanged, Event::RenderNeeded])
    }

    /// Allow scaling small images up to fill the viewport.
    pub fn set_enlarge(&mut self, enlarge: bool) -> Vec<Event> {
        if enlarge == self.enlarge {
            return Vec::new();
        }
        self.enlarge = enlarge;
        self.emit(vec![Event::ViewportChanged, Event::RenderNeeded])
    }

    /// Whether replacing the image clears the shape list.
    pub fn set_auto_clear(&mut self, auto_clear: bool) {
        self.auto_clear = auto_clear;
    }

    pub fn set_hit_policy(&mut self, policy: HitPolicy) {
        self.hit_policy = policy;
    }

    /// The fit transform for the current image and viewport.
    ///
    /// Recomputed only when the image size, viewport size, or enlarge flag
    /// changed since the last call. Without an image the identity over the
    /// viewport is used.
    pub fn transform(&mut self) -> Transform {
        let key = TransformKey {
            image: self.image.as_ref().map(Image::size),
            viewport: self.viewport,
            enlarge: self.enlarge,
        };
        if let Some((cached_key, transform)) = self.cached {
            if cached_key == key {
                return transform;
            }
        }
        let transform = match key.image {
            Some(size) => Transform::fit(size, key.viewport, key.enlarge),
            None => Transform::identity(key.viewport),
        };
        trace!(scale = transform.scale, offset_x = transform.offset_x, offset_y = transform.offset_y, "transform recomputed");
        self.cached = Some((key, transform));
        transform
    }

    // --- Styles ---

    pub fn set_default_style(&mut self, style: Style) -> Vec<Event> {
        self.styles.default = style;
        self.emit(vec![Event::StyleChanged(StyleScope::Default), Event::RenderNeeded])
    }

    pub fn set_hover_style(&mut self, style: StyleOverride) -> Vec<Event> {
        self.styles.hover = style;
        self.emit(vec![Event::StyleChanged(StyleScope::Hover), Event::RenderNeeded])
    }

    pub fn set_click_style(&mut self, style: StyleOverride) -> Vec<Event> {
        self.styles.click = style;
        self.emit(vec![Event::StyleChanged(StyleScope::Click), Event::RenderNeeded])
    }

    /// Merge a JSON style record into the default style.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`]; the default style is kept.
    pub fn try_set_default_style_json(&mut self, value: &Value) -> Result<Vec<Event>, CanvasError> {
        let over = Self::parse_style(value, StyleScope::Default)?;
        let style = self.styles.default.apply(&over);
        Ok(self.set_default_style(style))
    }

    /// Replace the hover override from a JSON style record; `null` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`]; the hover override is kept.
    pub fn try_set_hover_style_json(&mut self, value: &Value) -> Result<Vec<Event>, CanvasError> {
        let over = Self::parse_style(value, StyleScope::Hover)?;
        Ok(self.set_hover_style(over))
    }

    /// Replace the click override from a JSON style record; `null` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`]; the click override is kept.
    pub fn try_set_click_style_json(&mut self, value: &Value) -> Result<Vec<Event>, CanvasError> {
        let over = Self::parse_style(value, StyleScope::Click)?;
        Ok(self.set_click_style(over))
    }

    fn parse_style(value: &Value, scope: StyleScope) -> Result<StyleOverride, CanvasError> {
        StyleOverride::from_json(value).inspect_err(|e| warn!(error = %e, ?scope, "style rejected"))
    }

    // --- Render / save ---

    /// Draw the current state into a viewport-sized frame.
    pub fn render(&mut self) -> Frame {
        let transform = self.transform();
        let scene = Scene {
            viewport: self.viewport,
            transform,
            image: self.image.as_ref(),
            shapes: &self.shapes,
            styles: &self.styles,
            hovered: self.hovered,
            clicked: self.clicked,
        };
        render::draw(&scene)
    }

    /// Ask the host to persist the next rendered frame.
    pub fn request_save(&mut self) -> Vec<Event> {
        if self.save_requested {
            return Vec::new();
        }
        debug!("save requested");
        self.save_requested = true;
        self.emit(vec![Event::SaveRequested])
    }

    /// Clear a pending save request after the frame was persisted.
    pub fn complete_save(&mut self) -> Vec<Event> {
        if !self.save_requested {
            return Vec::new();
        }
        debug!("save completed");
        self.save_requested = false;
        self.emit(vec![Event::SaveCompleted])
    }

    // --- Queries ---

    #[must_use]
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    #[must_use]
    pub fn clicked(&self) -> Option<usize> {
        self.clicked
    }

    #[must_use]
    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn enlarge(&self) -> bool {
        self.enlarge
    }

    #[must_use]
    pub fn auto_clear(&self) -> bool {
        self.auto_clear
    }

    #[must_use]
    pub fn hit_policy(&self) -> HitPolicy {
        self.hit_policy
    }

    #[must_use]
    pub fn save_requested(&self) -> bool {
        self.save_requested
    }

    // --- Internals ---

    fn update_hovered(&mut self, current: Option<usize>) -> Vec<Event> {
        let previous = self.hovered;
        if previous == current {
            return Vec::new();
        }
        self.hovered = current;
        self.emit(vec![Event::HoveredChanged { previous, current }, Event::RenderNeeded])
    }

    fn update_clicked(&mut self, current: Option<usize>) -> Vec<Event> {
        let previous = self.clicked;
        if previous == current {
            return Vec::new();
        }
        debug!(?previous, ?current, "clicked changed");
        self.clicked = current;
        self.emit(vec![Event::ClickedChanged { previous, current }, Event::RenderNeeded])
    }

    /// Drop hover/click, recording a change event for each that was set.
    fn reset_selection(&mut self, events: &mut Vec<Event>) {
        if let Some(previous) = self.hovered.take() {
            events.push(Event::HoveredChanged { previous: Some(previous), current: None });
        }
        if let Some(previous) = self.clicked.take() {
            events.push(Event::ClickedChanged { previous: Some(previous), current: None });
        }
    }

    fn emit(&mut self, events: Vec<Event>) -> Vec<Event> {
        self.listeners.dispatch(&events);
        events
    }
}

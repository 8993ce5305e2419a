//! Image canvas rendering and hit-testing engine.
//!
//! The engine holds one image and an ordered list of annotation shapes
//! (rectangles and polygons), fits the image into a viewport, renders image
//! and shapes into an RGBA frame, and maps pointer positions back to shape
//! indices. It performs no I/O; hosts feed it pixels and pointer events and
//! persist frames through [`persist::FrameSink`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: state, validated setters, pointer handling |
//! | [`image`] | Raw buffer normalization to canonical RGBA8 |
//! | [`shape`] | Shape model and JSON shape-list validation |
//! | [`transform`] | Fit-to-viewport transform and its inverse |
//! | [`hit`] | Point-in-shape tests and hit policy |
//! | [`render`] | Rasterization into a [`render::Frame`] |
//! | [`style`] | Style scopes and precedence |
//! | [`alpha`] / [`color`] | Alpha and RGB codecs |
//! | [`event`] | Change events and the listener registry |
//! | [`persist`] | Save requests and frame sinks |
//! | [`config`] | Serializable engine configuration |
//! | [`consts`] | Defaults |

pub mod alpha;
pub mod color;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod event;
pub mod hit;
pub mod image;
pub mod persist;
pub mod render;
pub mod shape;
pub mod style;
pub mod transform;

pub use config::CanvasConfig;
pub use engine::EngineCore;
pub use error::CanvasError;
pub use event::{Event, ListenerId, StyleScope};
pub use hit::HitPolicy;
pub use image::{Image, RawImage, Samples};
pub use persist::{FrameSink, MemorySink, flush_save};
pub use render::Frame;
pub use shape::{Geometry, MaskGeometry, Shape};
pub use style::{Style, StyleInput, StyleOverride, StyleSet};
pub use transform::{Point, Size, Transform};

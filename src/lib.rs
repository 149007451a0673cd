//! labelcanvas - interactive annotation canvas engine
//!
//! The editing core of an image-annotation tool: shapes drawn over an image,
//! a create/edit state machine driven by pointer and keyboard input, bounded
//! dragging, vertex editing, and snapshot-based undo. Rendering and the
//! surrounding application are left to the caller.

pub mod canvas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod selection;
pub mod undo;

pub use canvas::{
    Canvas, CanvasEvent, CursorShape, Key, Mode, Modifiers, PointerButton, PointerButtons,
};
pub use config::{CanvasConfig, DoubleClickAction, LogLevel};
pub use error::{CanvasError, Result};
pub use geometry::{ImageBounds, Point, Rect};
pub use model::{HighlightMode, Shape, ShapeId, ShapeKind, ShapePath, ShapeRecord};

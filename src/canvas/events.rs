//! Notifications the canvas emits towards the UI and persistence layers.

use crate::model::ShapeId;

/// Something the surrounding application should react to.
///
/// Events are queued while an input is processed and handed out by
/// [`Canvas::take_events`](super::Canvas::take_events).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasEvent {
    /// A shape was finalized and appended to the collection
    NewShape(ShapeId),
    /// The selection changed; carries the new selection in order
    SelectionChanged(Vec<ShapeId>),
    /// One or more shapes were moved or reshaped and a snapshot was stored
    ShapesMoved,
    /// A shape creation started (`true`) or ended (`false`)
    DrawingChanged(bool),
    /// A vertex became highlighted (`true`) or no vertex is highlighted anymore
    VertexSelected(bool),
    /// A right click was released; the UI should offer its context menu.
    /// With a shadow copy present, the menu offers "copy here" / "move here"
    /// and answers through `end_move` or `cancel_move`.
    EditMenuRequested { has_shadow_copy: bool },
}

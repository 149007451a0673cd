//! Create mode: building a new shape from clicks.

use super::{Canvas, CanvasEvent, CursorShape, Key, Modifiers};
use crate::config::DoubleClickAction;
use crate::geometry::{Point, clamp_to_bounds};
use crate::model::{HighlightMode, Shape, ShapeId, ShapeKind};

impl Canvas {
    /// Whether the shape being drawn has enough points to be finished.
    pub fn can_close_shape(&self) -> bool {
        self.is_drawing() && self.current.as_ref().is_some_and(|c| c.len() > 2)
    }

    /// Close the shape being drawn and append it to the collection.
    pub fn finalise(&mut self) {
        let Some(mut shape) = self.current.take() else {
            log::warn!("finalise called with no shape in progress");
            return;
        };
        shape.close();
        shape.highlight_clear();
        let id = shape.id();
        log::info!("Finished {} {} with {} points", shape.kind(), id, shape.len());

        self.shapes.push(shape);
        self.store_shapes();
        self.line.set_points(Vec::new());
        self.push_event(CanvasEvent::NewShape(id));
        self.push_event(CanvasEvent::DrawingChanged(false));
    }

    /// Abandon the shape being drawn.
    pub fn cancel_drawing(&mut self) {
        if self.current.take().is_some() {
            self.line.set_points(Vec::new());
            self.push_event(CanvasEvent::DrawingChanged(false));
            log::debug!("Drawing cancelled");
        }
    }

    /// Reopen the most recently finished shape for further drawing.
    ///
    /// Used when labelling a new shape is cancelled. The shape's snapshot is
    /// dropped as well, so the history looks as if it was never finished.
    /// A point shape has nothing to resume and is discarded.
    pub fn undo_last_line(&mut self) -> Option<ShapeId> {
        let Some(mut shape) = self.shapes.pop() else {
            log::warn!("No shape to reopen");
            return None;
        };
        self.backups.pop_latest();
        self.drop_dead_references();

        let id = shape.id();
        let kind = shape.kind();
        shape.set_open();
        shape.selected = false;
        shape.fill = false;
        shape.highlight_clear();

        self.create_mode = kind;
        self.line = Shape::new(kind);
        let (Some(first), Some(last)) = (shape.first_point(), shape.last_point()) else {
            return Some(id);
        };
        match kind {
            ShapeKind::Polygon | ShapeKind::LineStrip => self.line.set_points(vec![last, first]),
            ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Line => {
                self.line.set_points(shape.points().to_vec())
            }
            ShapeKind::Point => {
                log::debug!("Discarded point shape {}", id);
                return Some(id);
            }
        }

        log::debug!("Reopened {} {}", kind, id);
        self.current = Some(shape);
        self.push_event(CanvasEvent::DrawingChanged(true));
        Some(id)
    }

    /// Remove the last point of the shape being drawn. Removing the only
    /// point abandons the shape.
    pub fn undo_last_point(&mut self) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        if current.is_closed() {
            return;
        }
        current.pop_point();
        match current.last_point() {
            Some(last) => {
                let mut points = self.line.points().to_vec();
                if let Some(start) = points.first_mut() {
                    *start = last;
                }
                self.line.set_points(points);
            }
            None => {
                self.current = None;
                self.line.set_points(Vec::new());
                self.push_event(CanvasEvent::DrawingChanged(false));
            }
        }
    }

    /// Filled outline of the polygon in progress, closed through the cursor.
    pub fn drawing_preview(&self) -> Option<Shape> {
        if !self.fill_drawing {
            return None;
        }
        let current = self.current.as_ref()?;
        if current.kind() != ShapeKind::Polygon || current.len() < 2 {
            return None;
        }
        let mut preview = current.clone();
        if let Some(cursor) = self.line.last_point() {
            preview.add_point(cursor);
        }
        preview.fill = true;
        Some(preview)
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Track the cursor: clamp it to the image, snap it onto the start
    /// point, and update the rubber band.
    pub(super) fn drawing_move(&mut self, pos: Point) {
        self.cursor = CursorShape::Draw;
        let epsilon = self.epsilon();
        let Some(current) = self.current.as_mut() else {
            return;
        };
        current.highlight_clear();
        let (Some(first), Some(last)) = (current.first_point(), current.last_point()) else {
            return;
        };

        let mut pos = pos;
        if !self.bounds.contains(&pos) {
            pos = clamp_to_bounds(last, pos, &self.bounds);
        } else if self.snapping
            && current.kind() == ShapeKind::Polygon
            && current.len() > 1
            && pos.distance_to(&first) < epsilon
        {
            pos = first;
            current.highlight_vertex(0, HighlightMode::NearVertex);
            self.cursor = CursorShape::Point;
        }

        let points = match current.kind() {
            ShapeKind::Polygon | ShapeKind::LineStrip => vec![last, pos],
            ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Line => vec![first, pos],
            ShapeKind::Point => vec![first],
        };
        self.line.set_points(points);
    }

    pub(super) fn drawing_press(&mut self, pos: Point, modifiers: Modifiers) {
        if self.current.is_none() {
            self.start_drawing(pos);
            return;
        }

        self.drawing_move(pos);
        let Some(target) = self.line.last_point() else {
            return;
        };
        let Some(current) = self.current.as_mut() else {
            return;
        };
        let finished = match current.kind() {
            ShapeKind::Polygon => {
                current.add_point(target);
                current.is_closed()
            }
            ShapeKind::LineStrip => {
                current.add_point(target);
                current.is_closed() || modifiers.ctrl
            }
            ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Line => {
                current.set_points(self.line.points().to_vec());
                true
            }
            ShapeKind::Point => true,
        };
        let last = current.last_point();

        if finished {
            self.finalise();
        } else if let Some(last) = last {
            self.line.set_points(vec![last, target]);
        }
    }

    fn start_drawing(&mut self, pos: Point) {
        if !self.bounds.contains(&pos) {
            log::debug!("Ignoring click outside the image at ({:.1}, {:.1})", pos.x, pos.y);
            return;
        }
        let kind = self.create_mode;
        let mut shape = Shape::new(kind);
        shape.id = self.next_shape_id();
        shape.add_point(pos);
        self.current = Some(shape);
        self.line = Shape::new(kind);
        self.push_event(CanvasEvent::DrawingChanged(true));
        log::debug!("Started {} at ({:.1}, {:.1})", kind, pos.x, pos.y);

        if kind == ShapeKind::Point {
            self.finalise();
        } else {
            self.line.set_points(vec![pos, pos]);
        }
    }

    /// The preceding press already added a point at the double-click
    /// position, so it is dropped before closing.
    pub(super) fn drawing_double_click(&mut self, _pos: Point) {
        if self.config.double_click != DoubleClickAction::Close {
            return;
        }
        if self.can_close_shape() && self.current.as_ref().is_some_and(|c| c.len() > 3) {
            if let Some(current) = self.current.as_mut() {
                current.pop_point();
            }
            self.finalise();
        }
    }

    pub(super) fn drawing_key_press(&mut self, key: Key, modifiers: Modifiers) {
        match key {
            Key::Escape if self.current.is_some() => self.cancel_drawing(),
            Key::Enter if self.can_close_shape() => self.finalise(),
            _ => {}
        }
        if modifiers.alt {
            self.snapping = false;
        }
    }
}

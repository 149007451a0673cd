//! Edit mode: hovering, selecting, dragging, and reshaping finished shapes.

use super::{Canvas, CanvasEvent, CursorShape, Key, Modifiers};
use crate::geometry::{Point, Rect, clamp_to_bounds};
use crate::model::{HighlightMode, Shape, ShapeId};
use crate::selection::{Hover, SelectionHit, shift_fits, union_rect};

/// Keyboard nudge distance in image pixels.
pub const MOVE_SPEED: f64 = 5.0;

/// Offset applied to duplicated shapes.
const DUPLICATE_OFFSET: Point = Point { x: 2.0, y: 2.0 };

/// What the pointer found while scanning shapes top-down.
#[derive(Debug, Clone, Copy)]
enum HoverTarget {
    Vertex(ShapeId, usize),
    Edge(ShapeId, usize),
    Inside(ShapeId),
}

impl Canvas {
    // ========================================================================
    // Hover and Selection
    // ========================================================================

    /// Scan shapes from the topmost down for a vertex, an insertable edge,
    /// or an interior under the pointer.
    pub(super) fn hover_move(&mut self, pos: Point) {
        let epsilon = self.epsilon();
        let target = self
            .shapes
            .iter()
            .rev()
            .filter(|s| self.is_visible(s.id()))
            .find_map(|shape| {
                if let Some(index) = shape.nearest_vertex(&pos, epsilon) {
                    return Some(HoverTarget::Vertex(shape.id(), index));
                }
                if shape.can_add_point() {
                    if let Some(edge) = shape.nearest_edge(&pos, epsilon) {
                        return Some(HoverTarget::Edge(shape.id(), edge));
                    }
                }
                shape
                    .contains_point(&pos)
                    .then_some(HoverTarget::Inside(shape.id()))
            });

        if let Some(previous) = self.selection.hover().shape {
            if let Some(shape) = self.shape_mut(previous) {
                shape.highlight_clear();
            }
        }

        match target {
            Some(HoverTarget::Vertex(id, index)) => {
                self.selection.hover_vertex(id, index);
                if let Some(shape) = self.shape_mut(id) {
                    shape.highlight_vertex(index, HighlightMode::MoveVertex);
                }
                self.cursor = CursorShape::Point;
            }
            Some(HoverTarget::Edge(id, edge)) => {
                self.selection.hover_edge(id, edge);
                self.cursor = CursorShape::Point;
            }
            Some(HoverTarget::Inside(id)) => {
                self.selection.hover_shape(id);
                self.cursor = CursorShape::Grab;
            }
            None => self.unhighlight(),
        }
        self.sync_flags();
        self.notify_vertex_selected();
    }

    /// Resolve a click: keep a hovered vertex, otherwise select the topmost
    /// shape containing `pos`, otherwise clear the selection.
    pub fn select_shape_point(&mut self, pos: Point, group_mode: bool) {
        if let Some((id, index)) = self.selection.hovered_vertex() {
            if let Some(shape) = self.shape_mut(id).filter(|s| index < s.len()) {
                shape.highlight_vertex(index, HighlightMode::MoveVertex);
            }
            if !self.selection.is_empty() {
                self.calculate_offsets(pos);
            }
            return;
        }

        let hit = self
            .shapes
            .iter()
            .rev()
            .find(|s| self.is_visible(s.id()) && s.contains_point(&pos))
            .map(Shape::id);
        let Some(id) = hit else {
            self.deselect_shape();
            return;
        };

        let hit = self.selection.click(id, group_mode);
        self.calculate_offsets(pos);
        if hit != SelectionHit::Retargeted {
            self.sync_flags();
            self.emit_selection();
        }
    }

    fn calculate_offsets(&mut self, anchor: Point) {
        let rects: Vec<Rect> = self
            .selected_shapes()
            .into_iter()
            .map(Shape::bounding_rect)
            .collect();
        self.selection
            .calculate_offsets(rects, anchor, &self.bounds);
    }

    pub(super) fn edit_press(&mut self, pos: Point, modifiers: Modifiers) {
        if self.selection.hovered_edge().is_some() {
            self.add_point_to_edge();
        } else if self.selection.hovered_vertex().is_some() && modifiers.shift {
            self.remove_selected_point();
        }
        self.select_shape_point(pos, modifiers.ctrl);
        self.prev_point = Some(pos);
    }

    /// Right press: select what is under the pointer unless it is already
    /// part of the selection, then anchor a possible shadow drag.
    pub(super) fn context_press(&mut self, pos: Point, modifiers: Modifiers) {
        let hovered_unselected = self
            .selection
            .hover()
            .shape
            .is_some_and(|id| !self.selection.is_selected(id));
        if self.selection.is_empty() || hovered_unselected {
            self.select_shape_point(pos, modifiers.ctrl);
        }
        self.calculate_offsets(pos);
        self.prev_point = Some(pos);
    }

    // ========================================================================
    // Dragging
    // ========================================================================

    /// Left-button drag: move the hovered vertex or the whole selection.
    pub(super) fn drag(&mut self, pos: Point) {
        if let Some((id, index)) = self.selection.hovered_vertex() {
            self.bounded_move_vertex(id, index, pos);
            self.moving_shape = true;
        } else if !self.selection.is_empty() && self.prev_point.is_some() {
            self.cursor = CursorShape::Move;
            self.bounded_move_shapes(pos);
            self.moving_shape = true;
        }
    }

    /// Right-button drag: the first sample copies the selection into the
    /// shadow, later samples move the copies.
    pub(super) fn shadow_drag(&mut self, pos: Point) {
        if !self.shadow.is_empty() {
            self.cursor = CursorShape::Move;
            if let Some(delta) = self.clamped_drag_delta(pos) {
                for shape in &mut self.shadow {
                    shape.move_by(delta);
                }
            }
        } else if !self.selection.is_empty() {
            self.start_shadow();
            log::debug!("Created {} shadow copies", self.shadow.len());
        }
    }

    fn bounded_move_vertex(&mut self, id: ShapeId, index: usize, pos: Point) {
        let bounds = self.bounds;
        let Some(shape) = self.shape_mut(id) else {
            return;
        };
        if index >= shape.len() {
            return;
        }
        let point = shape[index];
        let target = if bounds.contains(&pos) {
            pos
        } else {
            clamp_to_bounds(point, pos, &bounds)
        };
        shape.move_vertex_by(index, target - point);
        log::trace!("Moved vertex {} of {} to ({:.1}, {:.1})", index, id, target.x, target.y);
    }

    /// Move the selection towards `pos`, holding its bounding box inside the
    /// image. Returns whether anything moved.
    fn bounded_move_shapes(&mut self, pos: Point) -> bool {
        let Some(delta) = self.clamped_drag_delta(pos) else {
            return false;
        };
        let ids = self.selection.selected().to_vec();
        for id in ids {
            if let Some(shape) = self.shape_mut(id) {
                shape.move_by(delta);
            }
        }
        log::trace!("Moved selection by ({:.1}, {:.1})", delta.x, delta.y);
        true
    }

    /// Translation from the drag anchor to the clamped `pos`. Advances the anchor.
    fn clamped_drag_delta(&mut self, pos: Point) -> Option<Point> {
        let target = self.selection.clamp_drag(pos, &self.bounds)?;
        let delta = target - self.prev_point?;
        if delta.is_zero() {
            return None;
        }
        self.prev_point = Some(target);
        Some(delta)
    }

    /// Copy the selection into the shadow, remembering where each copy came from.
    fn start_shadow(&mut self) {
        let copies: Vec<Shape> = self.selected_shapes().into_iter().cloned().collect();
        self.shadow_sources = copies.iter().map(Shape::id).collect();
        self.shadow = copies.into_iter().map(|s| self.adopt(s)).collect();
    }

    pub(super) fn clear_shadow(&mut self) {
        self.shadow.clear();
        self.shadow_sources.clear();
    }

    // ========================================================================
    // Shadow Copies
    // ========================================================================

    /// Answer the edit menu after a right-drag.
    ///
    /// With `copy` the shadow copies join the collection and take their
    /// sources' places in the selection. Otherwise each source takes its
    /// copy's geometry. Either way a snapshot is stored.
    ///
    /// Copies are matched to the shapes they were taken from, so a selection
    /// change in between cannot redirect them.
    pub fn end_move(&mut self, copy: bool) -> bool {
        let shadow = std::mem::take(&mut self.shadow);
        let sources = std::mem::take(&mut self.shadow_sources);
        if shadow.is_empty() {
            log::warn!("end_move without shadow copies");
            return false;
        }

        let count = shadow.len();
        if copy {
            let mut selection_changed = false;
            for (source, shape) in sources.iter().zip(shadow) {
                let position = self.selection.selected().iter().position(|id| id == source);
                if let Some(index) = position {
                    self.selection.replace_at(index, shape.id());
                    selection_changed = true;
                }
                self.shapes.push(shape);
            }
            if selection_changed {
                self.sync_flags();
                self.emit_selection();
            }
            log::info!("Copied {} shapes", count);
        } else {
            for (source, moved) in sources.iter().zip(shadow) {
                match self.shape_mut(*source) {
                    Some(shape) => shape.set_points(moved.points().to_vec()),
                    None => log::warn!("Shadow source {} no longer exists", source),
                }
            }
            self.push_event(CanvasEvent::ShapesMoved);
            log::info!("Moved {} shapes", count);
        }
        self.store_shapes();
        true
    }

    /// Drop the shadow copies, leaving the originals untouched.
    pub fn cancel_move(&mut self) {
        if !self.shadow.is_empty() {
            log::debug!("Discarded {} shadow copies", self.shadow.len());
            self.clear_shadow();
        }
    }

    /// Copy the selection, offset the copies slightly, and select them.
    ///
    /// Returns the ids of the copies.
    pub fn duplicate_selected_shapes(&mut self) -> Vec<ShapeId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.start_shadow();
        self.bounded_shift_shadow();
        if !self.end_move(true) {
            return Vec::new();
        }
        self.selection.selected().to_vec()
    }

    /// Shift the shadow copies by the duplicate offset, or against it when
    /// that would leave the image.
    fn bounded_shift_shadow(&mut self) {
        let Some(rect) = union_rect(self.shadow.iter().map(Shape::bounding_rect)) else {
            return;
        };
        let delta = if shift_fits(&rect, DUPLICATE_OFFSET, &self.bounds) {
            DUPLICATE_OFFSET
        } else if shift_fits(&rect, -DUPLICATE_OFFSET, &self.bounds) {
            -DUPLICATE_OFFSET
        } else {
            log::debug!("Duplicate offset does not fit, copies stay in place");
            return;
        };
        for shape in &mut self.shadow {
            shape.move_by(delta);
        }
    }

    // ========================================================================
    // Vertex Editing
    // ========================================================================

    /// Insert the last pointer position into the hovered edge and start
    /// dragging the new vertex.
    pub fn add_point_to_edge(&mut self) -> bool {
        let previous = self.selection.previous_hover();
        let (Some(id), Some(edge)) = (previous.shape, previous.edge) else {
            return false;
        };
        let Some(point) = self.prev_move_point else {
            return false;
        };
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        if !shape.can_add_point() || edge > shape.len() {
            return false;
        }
        shape.insert_point(edge, point);
        shape.highlight_vertex(edge, HighlightMode::MoveVertex);

        self.selection.set_hover(Hover {
            shape: Some(id),
            vertex: Some(edge),
            edge: None,
        });
        self.moving_shape = true;
        self.notify_vertex_selected();
        log::debug!("Inserted vertex {} into {}", edge, id);
        true
    }

    /// Remove the hovered vertex and return its shape.
    ///
    /// A shape left without points stays in the collection; deleting it is
    /// up to the caller.
    pub fn remove_selected_point(&mut self) -> Option<ShapeId> {
        let previous = self.selection.previous_hover();
        let (Some(id), Some(index)) = (previous.shape, previous.vertex) else {
            return None;
        };
        let shape = self.shape_mut(id)?;
        if index >= shape.len() {
            log::warn!("Stale vertex {} for {} with {} points", index, id, shape.len());
            return None;
        }
        shape.remove_point(index);
        shape.highlight_clear();

        self.selection.forget_previous_vertex();
        self.selection.set_hover(Hover {
            shape: Some(id),
            vertex: None,
            edge: None,
        });
        self.moving_shape = true;
        self.notify_vertex_selected();
        log::debug!("Removed vertex {} from {}", index, id);
        Some(id)
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub(super) fn edit_key_press(&mut self, key: Key) {
        let offset = match key {
            Key::Up => Point::new(0.0, -MOVE_SPEED),
            Key::Down => Point::new(0.0, MOVE_SPEED),
            Key::Left => Point::new(-MOVE_SPEED, 0.0),
            Key::Right => Point::new(MOVE_SPEED, 0.0),
            _ => return,
        };
        self.move_by_keyboard(offset);
    }

    /// Nudge the selection. Without a drag anchor from a click the center of
    /// the selection's bounding box is used.
    fn move_by_keyboard(&mut self, offset: Point) {
        if self.selection.is_empty() {
            return;
        }
        let anchor = match self.prev_point {
            Some(anchor) => anchor,
            None => {
                let rects: Vec<Rect> = self
                    .selected_shapes()
                    .into_iter()
                    .map(Shape::bounding_rect)
                    .collect();
                let Some(rect) = union_rect(rects) else {
                    return;
                };
                let center = Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
                self.prev_point = Some(center);
                center
            }
        };
        // Vertex edits since the last press may have reshaped the selection
        self.calculate_offsets(anchor);
        if self.bounded_move_shapes(anchor + offset) {
            self.moving_shape = true;
        }
    }
}

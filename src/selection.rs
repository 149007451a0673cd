//! Selection and hover bookkeeping for the canvas.
//!
//! Everything here refers to shapes by [`ShapeId`] only. The canvas owns the
//! shapes and is responsible for dropping ids that no longer resolve.

use crate::geometry::{ImageBounds, Point, Rect};
use crate::model::ShapeId;

/// What the pointer is currently over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hover {
    /// Shape under the pointer
    pub shape: Option<ShapeId>,
    /// Highlighted vertex of `shape`
    pub vertex: Option<usize>,
    /// Highlighted insertable edge of `shape`
    pub edge: Option<usize>,
}

/// Outcome of clicking on a shape in edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionHit {
    /// The shape was not selected and now is
    Selected,
    /// The shape was already selected; the selection is kept as is
    Retargeted,
    /// The shape was already selected and a group click removed it
    Deselected,
}

/// Corner offsets of the selection's bounding box relative to the drag anchor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragOffsets {
    /// Top-left corner minus the anchor point
    pub top_left: Point,
    /// Bottom-right corner minus the anchor point
    pub bottom_right: Point,
}

/// Tracks selected shapes, hover state, and drag clamping offsets.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: Vec<ShapeId>,
    hover: Hover,
    /// Hover state before the last change, used after the pointer has moved on
    previous: Hover,
    offsets: DragOffsets,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn selected(&self) -> &[ShapeId] {
        &self.selected
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Replace the selection. Returns whether it changed.
    pub fn set_selection(&mut self, ids: Vec<ShapeId>) -> bool {
        let mut deduped: Vec<ShapeId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        if deduped == self.selected {
            return false;
        }
        log::debug!("Selection changed: {:?}", deduped);
        self.selected = deduped;
        true
    }

    /// Clear the selection. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        self.set_selection(Vec::new())
    }

    /// Keep only ids accepted by `is_live`. Returns whether any were dropped.
    pub fn retain(&mut self, mut is_live: impl FnMut(ShapeId) -> bool) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| is_live(*id));
        before != self.selected.len()
    }

    /// Swap the id at position `index` of the selection, keeping its order.
    pub fn replace_at(&mut self, index: usize, id: ShapeId) {
        self.selected[index] = id;
    }

    /// Apply a click on `id`, as resolved by the canvas hit-test.
    pub fn click(&mut self, id: ShapeId, group_mode: bool) -> SelectionHit {
        let hit = if self.is_selected(id) {
            if group_mode {
                self.selected.retain(|s| *s != id);
                SelectionHit::Deselected
            } else {
                SelectionHit::Retargeted
            }
        } else {
            if group_mode {
                self.selected.push(id);
            } else {
                self.selected = vec![id];
            }
            SelectionHit::Selected
        };
        log::debug!("Click on shape {}: {:?}", id, hit);
        hit
    }

    // ------------------------------------------------------------------------
    // Hover
    // ------------------------------------------------------------------------

    pub fn hover(&self) -> Hover {
        self.hover
    }

    pub fn previous_hover(&self) -> Hover {
        self.previous
    }

    pub fn hovered_vertex(&self) -> Option<(ShapeId, usize)> {
        Some((self.hover.shape?, self.hover.vertex?))
    }

    pub fn hovered_edge(&self) -> Option<(ShapeId, usize)> {
        Some((self.hover.shape?, self.hover.edge?))
    }

    /// Pointer is over vertex `index` of `shape`.
    pub fn hover_vertex(&mut self, shape: ShapeId, index: usize) {
        self.previous = Hover {
            shape: Some(shape),
            vertex: Some(index),
            edge: self.hover.edge,
        };
        self.hover = Hover {
            shape: Some(shape),
            vertex: Some(index),
            edge: None,
        };
    }

    /// Pointer is over edge `index` of `shape`, where a vertex can be inserted.
    pub fn hover_edge(&mut self, shape: ShapeId, index: usize) {
        self.previous = Hover {
            shape: Some(shape),
            vertex: self.hover.vertex,
            edge: Some(index),
        };
        self.hover = Hover {
            shape: Some(shape),
            vertex: None,
            edge: Some(index),
        };
    }

    /// Pointer is inside `shape` but away from its vertices and edges.
    pub fn hover_shape(&mut self, shape: ShapeId) {
        self.previous = Hover {
            shape: Some(shape),
            vertex: self.hover.vertex,
            edge: self.hover.edge,
        };
        self.hover = Hover {
            shape: Some(shape),
            vertex: None,
            edge: None,
        };
    }

    /// Set the hovered vertex directly, e.g. after inserting it.
    pub fn set_hover(&mut self, hover: Hover) {
        self.hover = hover;
    }

    /// Forget the vertex remembered in the previous-hover shadow.
    pub fn forget_previous_vertex(&mut self) {
        self.previous.vertex = None;
    }

    /// Move the hover into the shadow and clear it.
    ///
    /// Returns the shape that was hovered so its vertex highlight can be cleared.
    pub fn unhighlight(&mut self) -> Option<ShapeId> {
        self.previous = self.hover;
        std::mem::take(&mut self.hover).shape
    }

    /// Drop hover references to shapes that no longer exist.
    pub fn forget_hover(&mut self) {
        self.hover = Hover::default();
        self.previous = Hover::default();
    }

    // ------------------------------------------------------------------------
    // Drag clamping
    // ------------------------------------------------------------------------

    pub fn offsets(&self) -> DragOffsets {
        self.offsets
    }

    pub fn reset_offsets(&mut self) {
        self.offsets = DragOffsets::default();
    }

    /// Cache the selection's bounding box relative to `anchor`.
    ///
    /// The box starts from the image extent collapsed to a point so that an
    /// empty selection yields offsets that keep the anchor itself in bounds.
    pub fn calculate_offsets(
        &mut self,
        rects: impl IntoIterator<Item = Rect>,
        anchor: Point,
        bounds: &ImageBounds,
    ) {
        let mut left = bounds.max_x();
        let mut right = 0.0_f64;
        let mut top = bounds.max_y();
        let mut bottom = 0.0_f64;
        for rect in rects {
            left = left.min(rect.left());
            right = right.max(rect.right());
            top = top.min(rect.top());
            bottom = bottom.max(rect.bottom());
        }
        self.offsets = DragOffsets {
            top_left: Point::new(left - anchor.x, top - anchor.y),
            bottom_right: Point::new(right - anchor.x, bottom - anchor.y),
        };
    }

    /// Adjust a drag target so the cached bounding box stays inside the image.
    ///
    /// Returns `None` when the pointer itself is outside the image, in which
    /// case nothing should move.
    pub fn clamp_drag(&self, pos: Point, bounds: &ImageBounds) -> Option<Point> {
        if !bounds.contains(&pos) {
            return None;
        }
        let mut pos = pos;

        let o1 = pos + self.offsets.top_left;
        if !bounds.contains(&o1) {
            pos -= Point::new(o1.x.min(0.0), o1.y.min(0.0));
        }
        let o2 = pos + self.offsets.bottom_right;
        if !bounds.contains(&o2) {
            pos += Point::new(
                (bounds.max_x() - o2.x).min(0.0),
                (bounds.max_y() - o2.y).min(0.0),
            );
        }
        Some(pos)
    }
}

/// Whether `rect` shifted by `delta` still lies entirely inside the image.
pub fn shift_fits(rect: &Rect, delta: Point, bounds: &ImageBounds) -> bool {
    let moved = rect.translated(delta);
    bounds.contains(&moved.top_left()) && bounds.contains(&moved.bottom_right())
}

/// Union of all rectangles, `None` when there are none.
pub fn union_rect(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(&r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> ShapeId {
        ShapeId(n)
    }

    #[test]
    fn test_click_replaces_or_appends() {
        let mut sel = SelectionController::new();
        assert_eq!(sel.click(id(1), false), SelectionHit::Selected);
        assert_eq!(sel.click(id(2), false), SelectionHit::Selected);
        assert_eq!(sel.selected(), &[id(2)]);

        assert_eq!(sel.click(id(3), true), SelectionHit::Selected);
        assert_eq!(sel.selected(), &[id(2), id(3)]);
    }

    #[test]
    fn test_click_on_selected_keeps_group() {
        let mut sel = SelectionController::new();
        sel.set_selection(vec![id(1), id(2)]);

        assert_eq!(sel.click(id(1), false), SelectionHit::Retargeted);
        assert_eq!(sel.selected(), &[id(1), id(2)]);

        assert_eq!(sel.click(id(1), true), SelectionHit::Deselected);
        assert_eq!(sel.selected(), &[id(2)]);
    }

    #[test]
    fn test_set_selection_dedups_and_reports_change() {
        let mut sel = SelectionController::new();
        assert!(sel.set_selection(vec![id(4), id(4), id(5)]));
        assert_eq!(sel.selected(), &[id(4), id(5)]);
        assert!(!sel.set_selection(vec![id(4), id(5)]));
        assert!(sel.clear());
        assert!(!sel.clear());
    }

    #[test]
    fn test_retain_drops_dead_ids() {
        let mut sel = SelectionController::new();
        sel.set_selection(vec![id(1), id(2), id(3)]);
        assert!(sel.retain(|s| s != id(2)));
        assert_eq!(sel.selected(), &[id(1), id(3)]);
    }

    #[test]
    fn test_hover_shadow_tracks_previous_state() {
        let mut sel = SelectionController::new();
        sel.hover_edge(id(7), 2);
        assert_eq!(sel.hovered_edge(), Some((id(7), 2)));

        sel.hover_vertex(id(7), 1);
        assert_eq!(sel.hovered_vertex(), Some((id(7), 1)));
        assert_eq!(sel.hovered_edge(), None);
        assert_eq!(sel.previous_hover().edge, Some(2));

        assert_eq!(sel.unhighlight(), Some(id(7)));
        assert_eq!(sel.hover(), Hover::default());
        assert_eq!(sel.previous_hover().vertex, Some(1));
    }

    #[test]
    fn test_clamp_drag_stops_group_at_left_border() {
        let bounds = ImageBounds::new(200, 200);
        let mut sel = SelectionController::new();
        sel.calculate_offsets(
            [Rect::new(0.0, 0.0, 50.0, 100.0), Rect::new(40.0, 0.0, 60.0, 100.0)],
            Point::new(50.0, 50.0),
            &bounds,
        );
        assert_eq!(sel.offsets().top_left, Point::new(-50.0, -50.0));
        assert_eq!(sel.offsets().bottom_right, Point::new(50.0, 50.0));

        // Pointer leaves the image: no movement at all
        assert_eq!(sel.clamp_drag(Point::new(-100.0, 50.0), &bounds), None);

        // Pointer inside, box would cross x = 0: held at the anchor
        assert_eq!(
            sel.clamp_drag(Point::new(20.0, 50.0), &bounds),
            Some(Point::new(50.0, 50.0))
        );
    }

    #[test]
    fn test_clamp_drag_moves_box_flush_to_border() {
        let bounds = ImageBounds::new(200, 200);
        let mut sel = SelectionController::new();
        sel.calculate_offsets([Rect::new(10.0, 10.0, 100.0, 100.0)], Point::new(60.0, 60.0), &bounds);

        let pos = sel.clamp_drag(Point::new(30.0, 60.0), &bounds).unwrap();
        assert_eq!(pos, Point::new(50.0, 60.0));

        let pos = sel.clamp_drag(Point::new(180.0, 190.0), &bounds).unwrap();
        // Bottom-right corner ends on (199, 199)
        assert_eq!(pos + sel.offsets().bottom_right, Point::new(199.0, 199.0));
    }

    #[test]
    fn test_shift_fits() {
        let bounds = ImageBounds::new(100, 100);
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(shift_fits(&rect, Point::new(2.0, 2.0), &bounds));
        assert!(!shift_fits(&rect, Point::new(-2.0, -2.0), &bounds));
    }

    #[test]
    fn test_union_rect() {
        assert_eq!(union_rect(Vec::new()), None);
        let u = union_rect([Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, 5.0, 5.0, 5.0)]);
        assert_eq!(u, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }
}

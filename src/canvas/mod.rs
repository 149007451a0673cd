//! The interactive annotation canvas.
//!
//! [`Canvas`] owns the shape collection and turns pointer and keyboard input
//! into shape creation, selection, dragging, vertex editing, and undo
//! snapshots. It never draws anything itself: the renderer reads the shapes,
//! the preview line, the shadow copies, and the cursor hint after each input.
//!
//! Input handling is split by mode:
//! - `create`: building a new shape point by point
//! - `edit`: hovering, selecting, dragging, vertex insertion and removal

mod create;
mod edit;
mod events;
mod input;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

pub use edit::MOVE_SPEED;
pub use events::CanvasEvent;
pub use input::{CursorShape, Key, Modifiers, PointerButton, PointerButtons};

use crate::config::CanvasConfig;
use crate::geometry::{ImageBounds, Point};
use crate::model::{Shape, ShapeId, ShapeKind};
use crate::selection::{Hover, SelectionController};
use crate::undo::SnapshotStack;

/// Interaction mode of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Clicks add points to a new shape
    Create,
    /// Clicks select, drag, and reshape existing shapes
    #[default]
    Edit,
}

/// Annotation canvas state machine.
#[derive(Debug)]
pub struct Canvas {
    config: CanvasConfig,
    mode: Mode,
    create_mode: ShapeKind,

    /// Finished shapes, in drawing order
    shapes: Vec<Shape>,
    /// Shape under construction
    current: Option<Shape>,
    /// Rubber band from the last placed point to the cursor
    line: Shape,
    /// Temporary copies dragged with the right button
    shadow: Vec<Shape>,
    /// Shape each shadow copy was taken from, index for index
    shadow_sources: Vec<ShapeId>,
    hidden: HashSet<ShapeId>,
    next_id: u64,

    selection: SelectionController,
    backups: SnapshotStack<Vec<Shape>>,

    bounds: ImageBounds,
    scale: f64,
    /// Drag anchor of the last press
    prev_point: Option<Point>,
    /// Last pointer position seen
    prev_move_point: Option<Point>,
    moving_shape: bool,
    snapping: bool,
    fill_drawing: bool,
    vertex_selected: bool,
    cursor: CursorShape,

    events: Vec<CanvasEvent>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        let backups = SnapshotStack::new(config.num_backups);
        let create_mode = ShapeKind::Polygon;
        Self {
            config,
            mode: Mode::default(),
            create_mode,
            shapes: Vec::new(),
            current: None,
            line: Shape::new(create_mode),
            shadow: Vec::new(),
            shadow_sources: Vec::new(),
            hidden: HashSet::new(),
            next_id: 1,
            selection: SelectionController::new(),
            backups,
            bounds: ImageBounds::default(),
            scale: 1.0,
            prev_point: None,
            prev_move_point: None,
            moving_shape: false,
            snapping: true,
            fill_drawing: false,
            vertex_selected: false,
            cursor: CursorShape::Default,
            events: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Finished shapes in drawing order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Mutable access for label and flag edits. Geometry changes go through
    /// the canvas operations so undo snapshots stay consistent.
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// Shape being drawn, if any.
    pub fn current(&self) -> Option<&Shape> {
        self.current.as_ref()
    }

    /// Rubber band shown while a shape is being drawn.
    pub fn preview_line(&self) -> Option<&Shape> {
        self.current.as_ref().map(|_| &self.line)
    }

    /// Copies being dragged with the right button.
    pub fn shadow_shapes(&self) -> &[Shape] {
        &self.shadow
    }

    pub fn selected_ids(&self) -> &[ShapeId] {
        self.selection.selected()
    }

    pub fn selected_shapes(&self) -> Vec<&Shape> {
        self.selection
            .selected()
            .iter()
            .filter_map(|&id| self.shape(id))
            .collect()
    }

    pub fn hover(&self) -> Hover {
        self.selection.hover()
    }

    pub fn hovered_shape(&self) -> Option<ShapeId> {
        self.selection.hover().shape
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn create_mode(&self) -> ShapeKind {
        self.create_mode
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == Mode::Create
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Edit
    }

    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    pub fn bounds(&self) -> ImageBounds {
        self.bounds
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_snapping(&self) -> bool {
        self.snapping
    }

    pub fn fill_drawing(&self) -> bool {
        self.fill_drawing
    }

    pub fn set_fill_drawing(&mut self, value: bool) {
        self.fill_drawing = value;
    }

    /// Whether a vertex is currently highlighted for editing.
    pub fn has_selected_vertex(&self) -> bool {
        self.selection.hovered_vertex().is_some()
    }

    /// Hit-test radius in image coordinates.
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon / self.scale
    }

    /// Whether a full-canvas crosshair should be drawn at the cursor.
    pub fn crosshair_visible(&self) -> bool {
        self.is_drawing()
            && self.config.crosshair_for(self.create_mode)
            && self
                .prev_move_point
                .is_some_and(|p| self.bounds.contains(&p))
    }

    pub fn is_visible(&self, id: ShapeId) -> bool {
        !self.hidden.contains(&id)
    }

    /// Hide or show a shape. Hidden shapes are skipped by hover and hit-tests.
    pub fn set_shape_visible(&mut self, id: ShapeId, visible: bool) {
        if visible {
            self.hidden.remove(&id);
        } else {
            self.hidden.insert(id);
        }
    }

    /// Hand out the events queued since the last call.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Modes
    // ========================================================================

    /// Switch between edit mode (`true`) and create mode (`false`).
    ///
    /// Entering edit mode keeps an unfinished shape around untouched so that
    /// drawing resumes when create mode comes back. Entering create mode
    /// drops the hover and the selection.
    pub fn set_editing(&mut self, value: bool) {
        self.mode = if value { Mode::Edit } else { Mode::Create };
        if value {
            if let Some(current) = self.current.as_mut() {
                current.highlight_clear();
            }
        } else {
            self.unhighlight();
            self.deselect_shape();
        }
        self.cursor = CursorShape::Default;
        log::debug!("Canvas mode: {:?}", self.mode);
    }

    /// Choose the kind of shape created by the next clicks.
    ///
    /// An unfinished shape of another kind is discarded.
    pub fn set_create_mode(&mut self, kind: ShapeKind) {
        if kind == self.create_mode {
            return;
        }
        if self.current.as_ref().is_some_and(|c| c.kind() != kind) {
            log::debug!("Discarding unfinished {} for {}", self.create_mode, kind);
            self.cancel_drawing();
        }
        self.create_mode = kind;
        self.line = Shape::new(kind);
    }

    /// Set the display scale used to convert the pixel epsilon.
    pub fn set_scale(&mut self, scale: f64) {
        if !scale.is_finite() || scale <= 0.0 {
            log::warn!("Ignoring invalid canvas scale {}", scale);
            return;
        }
        self.scale = scale;
    }

    // ========================================================================
    // Image and Collection
    // ========================================================================

    /// Set the image extent. With `clear_shapes` the collection is emptied.
    pub fn load_image(&mut self, width: u32, height: u32, clear_shapes: bool) {
        self.bounds = ImageBounds::new(width, height);
        if clear_shapes {
            self.shapes.clear();
            self.clear_shadow();
            self.hidden.clear();
            self.current = None;
            self.line = Shape::new(self.create_mode);
            self.selection.forget_hover();
            if self.selection.clear() {
                self.emit_selection();
            }
        }
        log::info!("Canvas image set to {}x{}", width, height);
    }

    /// Forget the image and the undo history.
    pub fn reset_state(&mut self) {
        self.bounds = ImageBounds::default();
        self.backups.clear();
        self.prev_point = None;
        self.prev_move_point = None;
        self.cursor = CursorShape::Default;
        log::debug!("Canvas state reset");
    }

    /// Load shapes, replacing or extending the collection, and store a snapshot.
    ///
    /// Each shape gets a fresh id. Returns the ids in load order.
    pub fn load_shapes(&mut self, shapes: Vec<Shape>, replace: bool) -> Vec<ShapeId> {
        let loaded: Vec<Shape> = shapes.into_iter().map(|s| self.adopt(s)).collect();
        let ids = loaded.iter().map(Shape::id).collect();
        let count = loaded.len();
        if replace {
            self.shapes = loaded;
        } else {
            self.shapes.extend(loaded);
        }
        self.store_shapes();
        self.current = None;
        self.selection.forget_hover();
        self.drop_dead_references();
        log::info!(
            "Loaded {} shapes ({} total, replace: {})",
            count,
            self.shapes.len(),
            replace
        );
        ids
    }

    // ========================================================================
    // Undo
    // ========================================================================

    /// Store a snapshot of the current collection.
    pub fn store_shapes(&mut self) {
        self.backups.push(self.shapes.clone());
    }

    pub fn is_shape_restorable(&self) -> bool {
        self.backups.is_restorable()
    }

    /// Number of snapshots held.
    pub fn backup_count(&self) -> usize {
        self.backups.len()
    }

    /// Replace the collection with the previous snapshot.
    ///
    /// The adopted state is not pushed back; use [`Canvas::undo`] for the
    /// usual edit-menu behaviour.
    pub fn restore_shape(&mut self) -> bool {
        let Some(previous) = self.backups.restore() else {
            log::warn!("Nothing to undo");
            return false;
        };
        self.shapes = previous;
        self.clear_shadow();
        self.selection.forget_hover();
        self.moving_shape = false;
        for shape in &mut self.shapes {
            shape.highlight_clear();
        }
        if self.selection.clear() {
            self.emit_selection();
        }
        self.sync_flags();
        self.notify_vertex_selected();
        log::info!("Restored previous shapes ({} shapes)", self.shapes.len());
        true
    }

    /// Undo the last structural change and make the result the live snapshot.
    pub fn undo(&mut self) -> bool {
        if !self.restore_shape() {
            return false;
        }
        self.store_shapes();
        true
    }

    /// Label the most recently finished shape, replacing its snapshot.
    pub fn set_last_label(
        &mut self,
        label: impl Into<String>,
        flags: std::collections::BTreeMap<String, bool>,
    ) -> Option<ShapeId> {
        let Some(shape) = self.shapes.last_mut() else {
            log::warn!("No shape to label");
            return None;
        };
        shape.label = label.into();
        shape.flags = flags;
        let id = shape.id();
        log::info!("Labelled shape {} as '{}'", id, shape.label);
        self.backups.pop_latest();
        self.store_shapes();
        Some(id)
    }

    // ========================================================================
    // Selection and Deletion
    // ========================================================================

    /// Replace the selection, e.g. from a label list. Unknown ids are dropped.
    pub fn select_shapes(&mut self, ids: &[ShapeId]) {
        let live: Vec<ShapeId> = ids
            .iter()
            .copied()
            .filter(|&id| self.shape(id).is_some())
            .collect();
        self.prev_point = None;
        if self.selection.set_selection(live) {
            self.sync_flags();
            self.emit_selection();
        }
    }

    /// Clear the selection.
    pub fn deselect_shape(&mut self) {
        if self.selection.clear() {
            self.sync_flags();
            self.emit_selection();
        }
    }

    /// Remove all selected shapes and store a snapshot. Returns the removed shapes.
    pub fn delete_selected(&mut self) -> Vec<Shape> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let selected: HashSet<ShapeId> = self.selection.selected().iter().copied().collect();
        let (deleted, kept): (Vec<Shape>, Vec<Shape>) = std::mem::take(&mut self.shapes)
            .into_iter()
            .partition(|s| selected.contains(&s.id()));
        self.shapes = kept;
        self.store_shapes();
        self.selection.clear();
        self.drop_dead_references();
        self.emit_selection();
        log::info!("Deleted {} selected shapes", deleted.len());
        deleted
    }

    /// Remove one shape and store a snapshot.
    pub fn delete_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        let shape = self.shapes.remove(index);
        self.store_shapes();
        self.drop_dead_references();
        log::info!("Deleted shape {}", id);
        Some(shape)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn push_event(&mut self, event: CanvasEvent) {
        log::trace!("Canvas event: {:?}", event);
        self.events.push(event);
    }

    fn emit_selection(&mut self) {
        let selected = self.selection.selected().to_vec();
        self.push_event(CanvasEvent::SelectionChanged(selected));
    }

    /// Report a change of the highlighted-vertex state.
    fn notify_vertex_selected(&mut self) {
        let now = self.has_selected_vertex();
        if now != self.vertex_selected {
            self.vertex_selected = now;
            self.push_event(CanvasEvent::VertexSelected(now));
        }
    }

    fn next_shape_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Give a shape entering the canvas a fresh id and clear engine state.
    fn adopt(&mut self, mut shape: Shape) -> Shape {
        shape.id = self.next_shape_id();
        shape.selected = false;
        shape.fill = false;
        shape.highlight_clear();
        shape
    }

    /// Mirror selection and hover into the per-shape render flags.
    fn sync_flags(&mut self) {
        let hovered = self.selection.hover().shape;
        for shape in &mut self.shapes {
            shape.selected = self.selection.is_selected(shape.id());
            shape.fill = shape.selected || hovered == Some(shape.id());
        }
    }

    /// Drop selection, hover, and visibility entries for shapes that are gone.
    fn drop_dead_references(&mut self) {
        let live: HashSet<ShapeId> = self.shapes.iter().map(Shape::id).collect();
        if self.selection.retain(|id| live.contains(&id)) {
            self.emit_selection();
        }
        let hover = self.selection.hover();
        let previous = self.selection.previous_hover();
        let is_dead = |h: Hover| h.shape.is_some_and(|id| !live.contains(&id));
        if is_dead(hover) || is_dead(previous) {
            self.selection.forget_hover();
            self.notify_vertex_selected();
        }
        self.hidden.retain(|id| live.contains(id));
        self.sync_flags();
    }

    /// Clear the hover and its vertex highlight.
    fn unhighlight(&mut self) {
        if let Some(id) = self.selection.unhighlight() {
            if let Some(shape) = self.shape_mut(id) {
                shape.highlight_clear();
            }
        }
        self.sync_flags();
        self.notify_vertex_selected();
    }

    /// Store a snapshot if any shape changed since the latest one.
    fn commit_move(&mut self) {
        self.moving_shape = false;
        if !self.shapes_changed_since_backup() {
            return;
        }
        self.store_shapes();
        self.push_event(CanvasEvent::ShapesMoved);
        log::info!("Committed shape edit");
    }

    fn shapes_changed_since_backup(&self) -> bool {
        let Some(latest) = self.backups.latest() else {
            return true;
        };
        latest.len() != self.shapes.len()
            || latest
                .iter()
                .zip(&self.shapes)
                .any(|(a, b)| a.id() != b.id() || a.points() != b.points())
    }

    // ========================================================================
    // Input Dispatch
    // ========================================================================

    /// Pointer moved to `pos` (image coordinates) with `buttons` held.
    pub fn mouse_move(&mut self, pos: Point, buttons: PointerButtons) {
        self.prev_move_point = Some(pos);
        self.cursor = CursorShape::Default;
        log::trace!("Pointer move to ({:.1}, {:.1})", pos.x, pos.y);

        if self.is_drawing() {
            self.drawing_move(pos);
        } else if buttons.right {
            self.shadow_drag(pos);
        } else if buttons.left {
            self.drag(pos);
        } else {
            self.hover_move(pos);
        }
    }

    /// Button pressed at `pos`.
    pub fn mouse_press(&mut self, pos: Point, button: PointerButton, modifiers: Modifiers) {
        self.prev_move_point = Some(pos);
        match (button, self.mode) {
            (PointerButton::Left, Mode::Create) => self.drawing_press(pos, modifiers),
            (PointerButton::Left, Mode::Edit) => self.edit_press(pos, modifiers),
            (PointerButton::Right, Mode::Edit) => self.context_press(pos, modifiers),
            _ => {}
        }
    }

    /// Button released at `pos`.
    pub fn mouse_release(&mut self, pos: Point, button: PointerButton) {
        log::trace!("Pointer release at ({:.1}, {:.1})", pos.x, pos.y);
        if button == PointerButton::Right && self.is_editing() {
            let has_shadow_copy = !self.shadow.is_empty();
            self.push_event(CanvasEvent::EditMenuRequested { has_shadow_copy });
            self.cursor = CursorShape::Default;
        }
        if self.moving_shape {
            self.commit_move();
        }
    }

    /// Double click at `pos`.
    pub fn mouse_double_click(&mut self, pos: Point, button: PointerButton) {
        if button == PointerButton::Left && self.is_drawing() {
            self.drawing_double_click(pos);
        }
    }

    /// Pointer left the canvas.
    pub fn mouse_leave(&mut self) {
        self.unhighlight();
        self.prev_move_point = None;
    }

    pub fn key_press(&mut self, key: Key, modifiers: Modifiers) {
        if self.is_drawing() {
            self.drawing_key_press(key, modifiers);
        } else {
            self.edit_key_press(key);
        }
    }

    pub fn key_release(&mut self, key: Key, modifiers: Modifiers) {
        log::trace!("Key release {:?}", key);
        if self.is_drawing() {
            if modifiers.is_empty() {
                self.snapping = true;
            }
        } else if self.moving_shape && !self.selection.is_empty() {
            self.commit_move();
        }
    }
}

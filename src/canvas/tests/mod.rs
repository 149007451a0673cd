//! Scenario tests driving the canvas through pointer and keyboard input.


use super::{Canvas, Modifiers, PointerButton, PointerButtons};
use crate::config::CanvasConfig;
use crate::geometry::Point;
use crate::model::{Shape, ShapeId, ShapeKind};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// A finished shape as it would come out of a loaded file.
fn closed_shape(kind: ShapeKind, points: &[(f64, f64)]) -> Shape {
    let mut shape = Shape::new(kind).with_points(points.iter().map(|&(x, y)| pt(x, y)));
    shape.close();
    shape
}

fn square(x: f64, y: f64, size: f64) -> Shape {
    closed_shape(
        ShapeKind::Polygon,
        &[(x, y), (x + size, y), (x + size, y + size), (x, y + size)],
    )
}

fn canvas_with_config(config: CanvasConfig, width: u32, height: u32) -> Canvas {
    let mut canvas = Canvas::new(config);
    canvas.load_image(width, height, true);
    canvas.take_events();
    canvas
}

/// Edit-mode canvas holding `shapes`, with the event queue drained.
fn editing_canvas(width: u32, height: u32, shapes: Vec<Shape>) -> (Canvas, Vec<ShapeId>) {
    let mut canvas = canvas_with_config(CanvasConfig::default(), width, height);
    let ids = canvas.load_shapes(shapes, true);
    canvas.take_events();
    (canvas, ids)
}

/// Create-mode canvas for `kind`, with the event queue drained.
fn drawing_canvas(kind: ShapeKind, config: CanvasConfig) -> Canvas {
    let mut canvas = canvas_with_config(config, 100, 100);
    canvas.set_editing(false);
    canvas.set_create_mode(kind);
    canvas.take_events();
    canvas
}

fn click(canvas: &mut Canvas, x: f64, y: f64) {
    click_with(canvas, x, y, Modifiers::NONE);
}

fn click_with(canvas: &mut Canvas, x: f64, y: f64, modifiers: Modifiers) {
    canvas.mouse_press(pt(x, y), PointerButton::Left, modifiers);
    canvas.mouse_release(pt(x, y), PointerButton::Left);
}

fn hover(canvas: &mut Canvas, x: f64, y: f64) {
    canvas.mouse_move(pt(x, y), PointerButtons::NONE);
}

/// Press, drag through `path`, and release at its last point.
fn left_drag(canvas: &mut Canvas, from: (f64, f64), path: &[(f64, f64)]) {
    canvas.mouse_press(pt(from.0, from.1), PointerButton::Left, Modifiers::NONE);
    let mut last = from;
    for &(x, y) in path {
        canvas.mouse_move(pt(x, y), PointerButtons::LEFT);
        last = (x, y);
    }
    canvas.mouse_release(pt(last.0, last.1), PointerButton::Left);
}

fn assert_near(actual: Point, expected: Point) {
    assert!(
        actual.distance_to(&expected) < 1e-9,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

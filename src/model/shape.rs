//! Annotation shape types and per-kind geometry.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CanvasError;
use crate::geometry::{
    Point, Rect, circle_rect_from_two_points, distance_to_line, rect_from_two_points,
    ring_contains,
};

/// Stable handle for a shape owned by the canvas.
///
/// Handles are never reused while the canvas lives, so a stale handle simply
/// fails to resolve instead of pointing at a different shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of an annotation shape. Fixed when the shape is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Polygon,
    Rectangle,
    Circle,
    Line,
    Point,
    LineStrip,
}

impl ShapeKind {
    /// Name used in shape records and configuration keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Line => "line",
            ShapeKind::Point => "point",
            ShapeKind::LineStrip => "linestrip",
        }
    }

    /// Get all shape kinds.
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Polygon,
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Line,
            ShapeKind::Point,
            ShapeKind::LineStrip,
        ]
    }

    /// Maximum number of points, `None` for open-ended kinds.
    pub fn max_points(&self) -> Option<usize> {
        match self {
            ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Line => Some(2),
            ShapeKind::Point => Some(1),
            ShapeKind::Polygon | ShapeKind::LineStrip => None,
        }
    }

    /// Kinds drawn by clicking any number of vertices.
    pub fn is_multi_point(&self) -> bool {
        self.max_points().is_none()
    }

    /// Kinds defined by exactly two anchor points.
    pub fn is_two_point(&self) -> bool {
        self.max_points() == Some(2)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CanvasError::invalid_shape_type(s))
    }
}

/// How a highlighted vertex should be emphasised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightMode {
    /// The handle that would move if dragging
    MoveVertex,
    /// Generic proximity, e.g. the start point attracting the cursor
    #[default]
    NearVertex,
}

/// Geometry handed to the renderer, also used for hit-testing and bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapePath {
    /// Not enough points to draw anything
    Empty,
    /// Axis-aligned rectangle
    Rect(Rect),
    /// Circle given by center and radius
    Ellipse { center: Point, radius: f64 },
    /// Straight segments through the points, with an optional closing edge
    Polyline { points: Vec<Point>, closed: bool },
    /// Zero-area marker at a single point
    Marker(Point),
}

impl ShapePath {
    /// Fill-based containment. Outlines enclose their implicitly closed ring,
    /// zero-area paths contain nothing.
    pub fn contains(&self, point: &Point) -> bool {
        match self {
            ShapePath::Empty | ShapePath::Marker(_) => false,
            ShapePath::Rect(rect) => rect.width > 0.0 && rect.height > 0.0 && rect.contains(point),
            ShapePath::Ellipse { center, radius } => {
                *radius > 0.0 && center.distance_to(point) <= *radius
            }
            ShapePath::Polyline { points, .. } => ring_contains(points, point),
        }
    }

    /// Axis-aligned bounds. An empty path reports a zero rectangle at the origin.
    pub fn bounding_rect(&self) -> Rect {
        match self {
            ShapePath::Empty => Rect::default(),
            ShapePath::Rect(rect) => *rect,
            ShapePath::Ellipse { center, radius } => {
                Rect::new(center.x - radius, center.y - radius, 2.0 * radius, 2.0 * radius)
            }
            ShapePath::Polyline { points, .. } => Rect::enclosing(points).unwrap_or_default(),
            ShapePath::Marker(p) => Rect::new(p.x, p.y, 0.0, 0.0),
        }
    }
}

/// A single annotated region drawn over the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub(crate) id: ShapeId,
    kind: ShapeKind,
    points: Vec<Point>,
    closed: bool,
    /// Label text assigned by the user
    pub label: String,
    /// Optional group, `None` when ungrouped
    pub group_id: Option<i32>,
    /// Named boolean flags
    pub flags: BTreeMap<String, bool>,
    /// Opaque data carried through loading and saving untouched
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// Whether the shape is part of the selection
    pub selected: bool,
    /// Whether the renderer should fill the shape
    pub fill: bool,
    highlight_index: Option<usize>,
    highlight_mode: HighlightMode,
}

impl Shape {
    /// Create an empty, unlabelled shape of the given kind.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            id: ShapeId::default(),
            kind,
            points: Vec::new(),
            closed: false,
            label: String::new(),
            group_id: None,
            flags: BTreeMap::new(),
            extra: serde_json::Map::new(),
            selected: false,
            fill: false,
            highlight_index: None,
            highlight_mode: HighlightMode::default(),
        }
    }

    /// Create a shape from a type name as found in shape records.
    pub fn with_type_name(
        label: impl Into<String>,
        shape_type: &str,
        flags: BTreeMap<String, bool>,
        group_id: Option<i32>,
    ) -> Result<Self, CanvasError> {
        let kind = shape_type.parse()?;
        let mut shape = Self::new(kind);
        shape.label = label.into();
        shape.flags = flags;
        shape.group_id = group_id;
        Ok(shape)
    }

    /// Builder-style points setter, used when loading finished shapes.
    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.set_points(points.into_iter().collect());
        self
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_point(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Replace every point at once.
    pub(crate) fn set_points(&mut self, points: Vec<Point>) {
        if let Some(max) = self.kind.max_points() {
            assert!(
                points.len() <= max,
                "{} shape cannot hold {} points",
                self.kind,
                points.len()
            );
        }
        self.points = points;
        if self.highlight_index.is_some_and(|i| i >= self.points.len()) {
            self.highlight_clear();
        }
    }

    /// Append a point. Revisiting the first point exactly closes the shape instead.
    pub fn add_point(&mut self, point: Point) {
        if self.points.first() == Some(&point) {
            self.closed = true;
            return;
        }
        if let Some(max) = self.kind.max_points() {
            assert!(
                self.points.len() < max,
                "{} shape already has {} points",
                self.kind,
                max
            );
        }
        self.points.push(point);
    }

    /// Remove and return the last point.
    pub fn pop_point(&mut self) -> Option<Point> {
        let point = self.points.pop();
        if self.highlight_index.is_some_and(|i| i >= self.points.len()) {
            self.highlight_clear();
        }
        point
    }

    /// Insert a point before index `i`. `i == len()` appends.
    pub fn insert_point(&mut self, i: usize, point: Point) {
        assert!(
            i <= self.points.len(),
            "insert index {i} out of range for {} points",
            self.points.len()
        );
        self.points.insert(i, point);
    }

    pub fn remove_point(&mut self, i: usize) {
        assert!(
            i < self.points.len(),
            "remove index {i} out of range for {} points",
            self.points.len()
        );
        self.points.remove(i);
        if self.highlight_index.is_some_and(|h| h >= self.points.len()) {
            self.highlight_clear();
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn set_open(&mut self) {
        self.closed = false;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Only polygons and line strips accept new vertices on their edges.
    pub fn can_add_point(&self) -> bool {
        self.kind.is_multi_point()
    }

    /// Index of the closest vertex within `epsilon`, if any.
    pub fn nearest_vertex(&self, point: &Point, epsilon: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let dist = p.distance_to(point);
            if dist <= epsilon && best.is_none_or(|(_, min)| dist < min) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Index `i` of the closest edge `(points[i - 1], points[i])` within `epsilon`.
    ///
    /// Edge 0 joins the last point back to the first.
    pub fn nearest_edge(&self, point: &Point, epsilon: f64) -> Option<usize> {
        let n = self.points.len();
        let mut best: Option<(usize, f64)> = None;
        for i in 0..n {
            let prev = self.points[(i + n - 1) % n];
            let dist = distance_to_line(*point, prev, self.points[i]);
            if dist <= epsilon && best.is_none_or(|(_, min)| dist < min) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Path for this shape's kind.
    pub fn path(&self) -> ShapePath {
        match (self.kind, self.points.as_slice()) {
            (_, []) => ShapePath::Empty,
            (ShapeKind::Rectangle, [p1, p2]) => ShapePath::Rect(rect_from_two_points(*p1, *p2)),
            (ShapeKind::Circle, [center, edge]) => {
                let rect = circle_rect_from_two_points(*center, *edge);
                ShapePath::Ellipse {
                    center: *center,
                    radius: rect.width / 2.0,
                }
            }
            (ShapeKind::Rectangle | ShapeKind::Circle, _) => ShapePath::Empty,
            (ShapeKind::Point, [p, ..]) => ShapePath::Marker(*p),
            (ShapeKind::Line | ShapeKind::LineStrip, points) => ShapePath::Polyline {
                points: points.to_vec(),
                closed: false,
            },
            (ShapeKind::Polygon, points) => ShapePath::Polyline {
                points: points.to_vec(),
                closed: self.closed,
            },
        }
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        self.path().contains(point)
    }

    pub fn bounding_rect(&self) -> Rect {
        self.path().bounding_rect()
    }

    /// Translate every point.
    pub fn move_by(&mut self, offset: Point) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Translate a single vertex.
    pub fn move_vertex_by(&mut self, i: usize, offset: Point) {
        assert!(
            i < self.points.len(),
            "vertex index {i} out of range for {} points",
            self.points.len()
        );
        self.points[i] += offset;
    }

    pub fn highlight_vertex(&mut self, i: usize, mode: HighlightMode) {
        assert!(
            i < self.points.len(),
            "highlight index {i} out of range for {} points",
            self.points.len()
        );
        self.highlight_index = Some(i);
        self.highlight_mode = mode;
    }

    pub fn highlight_clear(&mut self) {
        self.highlight_index = None;
    }

    pub fn highlight_index(&self) -> Option<usize> {
        self.highlight_index
    }

    pub fn highlight_mode(&self) -> HighlightMode {
        self.highlight_mode
    }
}

impl Index<usize> for Shape {
    type Output = Point;

    fn index(&self, i: usize) -> &Point {
        &self.points[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn polygon(points: &[(f64, f64)]) -> Shape {
        let mut shape = Shape::new(ShapeKind::Polygon)
            .with_points(points.iter().map(|&(x, y)| Point::new(x, y)));
        shape.close();
        shape
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("linestrip".parse::<ShapeKind>().unwrap(), ShapeKind::LineStrip);
        assert_eq!("circle".parse::<ShapeKind>().unwrap(), ShapeKind::Circle);

        let err = "hexagon".parse::<ShapeKind>().unwrap_err();
        assert!(matches!(err, CanvasError::InvalidShapeType { value } if value == "hexagon"));
    }

    #[test]
    fn test_with_type_name_rejects_unknown_kind() {
        assert!(Shape::with_type_name("cat", "blob", BTreeMap::new(), None).is_err());

        let shape = Shape::with_type_name("cat", "rectangle", BTreeMap::new(), Some(3)).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        assert_eq!(shape.label, "cat");
        assert_eq!(shape.group_id, Some(3));
    }

    #[test]
    fn test_add_point_auto_closes_on_start() {
        let mut shape = Shape::new(ShapeKind::Polygon);
        shape.add_point(Point::new(0.0, 0.0));
        shape.add_point(Point::new(10.0, 0.0));
        shape.add_point(Point::new(10.0, 10.0));
        assert!(!shape.is_closed());

        shape.add_point(Point::new(0.0, 0.0));
        assert!(shape.is_closed());
        assert_eq!(shape.len(), 3);
    }

    #[test]
    fn test_pop_point_on_empty_shape() {
        let mut shape = Shape::new(ShapeKind::LineStrip);
        assert_eq!(shape.pop_point(), None);

        shape.add_point(Point::new(1.0, 2.0));
        assert_eq!(shape.pop_point(), Some(Point::new(1.0, 2.0)));
        assert!(shape.is_empty());
    }

    #[test]
    #[should_panic(expected = "already has 2 points")]
    fn test_two_point_kinds_reject_third_point() {
        let mut shape = Shape::new(ShapeKind::Line);
        shape.add_point(Point::new(0.0, 0.0));
        shape.add_point(Point::new(1.0, 1.0));
        shape.add_point(Point::new(2.0, 2.0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_remove_point_out_of_range_panics() {
        let mut shape = polygon(&[(0.0, 0.0), (1.0, 0.0)]);
        shape.remove_point(5);
    }

    #[test]
    fn test_can_add_point_only_for_multi_point_kinds() {
        assert!(Shape::new(ShapeKind::Polygon).can_add_point());
        assert!(Shape::new(ShapeKind::LineStrip).can_add_point());
        assert!(!Shape::new(ShapeKind::Rectangle).can_add_point());
        assert!(!Shape::new(ShapeKind::Point).can_add_point());
    }

    #[test]
    fn test_nearest_vertex_picks_closest() {
        let shape = polygon(&[(0.0, 0.0), (4.0, 0.0), (5.0, 0.0)]);
        assert_eq!(shape.nearest_vertex(&Point::new(4.8, 0.0), 2.0), Some(2));
        assert_eq!(shape.nearest_vertex(&Point::new(4.1, 0.0), 2.0), Some(1));
        assert_eq!(shape.nearest_vertex(&Point::new(20.0, 0.0), 2.0), None);
    }

    #[test]
    fn test_nearest_edge_wraps_to_closing_edge() {
        let shape = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        // Left side joins the last point back to the first
        assert_eq!(shape.nearest_edge(&Point::new(0.5, 5.0), 1.0), Some(0));
        assert_eq!(shape.nearest_edge(&Point::new(5.0, 0.5), 1.0), Some(1));
        assert_eq!(shape.nearest_edge(&Point::new(5.0, 5.0), 1.0), None);
    }

    #[test]
    fn test_rectangle_bounding_rect() {
        let shape = Shape::new(ShapeKind::Rectangle)
            .with_points([Point::new(10.0, 10.0), Point::new(50.0, 40.0)]);
        assert_eq!(shape.len(), 2);
        assert_eq!(shape.bounding_rect(), Rect::new(10.0, 10.0, 40.0, 30.0));
    }

    #[test]
    fn test_circle_corners_are_outside() {
        let shape = Shape::new(ShapeKind::Circle)
            .with_points([Point::new(50.0, 50.0), Point::new(60.0, 50.0)]);
        let rect = shape.bounding_rect();
        assert_eq!(rect, Rect::new(40.0, 40.0, 20.0, 20.0));
        for corner in rect.corners() {
            assert!(!shape.contains_point(&corner));
        }
        assert!(shape.contains_point(&Point::new(55.0, 55.0)));
    }

    #[test]
    fn test_rectangle_corners_are_inside() {
        let shape = Shape::new(ShapeKind::Rectangle)
            .with_points([Point::new(0.0, 0.0), Point::new(8.0, 6.0)]);
        for corner in shape.bounding_rect().corners() {
            assert_eq!(shape.contains_point(&corner), shape.path().contains(&corner));
            assert!(shape.contains_point(&corner));
        }
    }

    #[test]
    fn test_degenerate_shapes_have_no_area() {
        let line = Shape::new(ShapeKind::Line)
            .with_points([Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        assert!(!line.contains_point(&Point::new(5.0, 5.0)));

        let circle = Shape::new(ShapeKind::Circle)
            .with_points([Point::new(3.0, 3.0), Point::new(3.0, 3.0)]);
        assert!(!circle.contains_point(&Point::new(3.0, 3.0)));

        let point = Shape::new(ShapeKind::Point).with_points([Point::new(3.0, 3.0)]);
        assert!(!point.contains_point(&Point::new(3.0, 3.0)));
        assert_eq!(point.bounding_rect(), Rect::new(3.0, 3.0, 0.0, 0.0));
    }

    #[test]
    fn test_move_by_and_move_vertex_by() {
        let mut shape = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        shape.move_by(Point::new(1.0, 2.0));
        assert_eq!(shape[0], Point::new(1.0, 2.0));

        shape.move_vertex_by(2, Point::new(-1.0, 0.0));
        assert_eq!(shape[2], Point::new(10.0, 12.0));
        assert_eq!(shape[1], Point::new(11.0, 2.0));
    }

    #[test]
    fn test_highlight_dropped_when_vertex_removed() {
        let mut shape = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        shape.highlight_vertex(2, HighlightMode::MoveVertex);
        assert_eq!(shape.highlight_mode(), HighlightMode::MoveVertex);

        shape.remove_point(2);
        assert_eq!(shape.highlight_index(), None);
    }

    #[test]
    fn test_concave_polygon_notch_is_outside() {
        // U-shape opening upwards, notch between x = 4 and x = 6 above y = 3
        let shape = polygon(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (6.0, 10.0),
            (6.0, 3.0),
            (4.0, 3.0),
            (4.0, 10.0),
            (0.0, 10.0),
        ]);
        let cases = [
            ((5.0, 1.5), true),
            ((2.0, 8.0), true),
            ((8.0, 8.0), true),
            ((5.0, 6.0), false),
            ((5.0, 9.9), false),
            ((5.0, 11.0), false),
            ((-1.0, 5.0), false),
        ];
        for ((x, y), expected) in cases {
            assert_eq!(shape.contains_point(&Point::new(x, y)), expected, "at ({x}, {y})");
        }
    }

    #[test]
    fn test_linestrip_encloses_implicit_ring() {
        let shape = Shape::new(ShapeKind::LineStrip).with_points([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        assert!(shape.contains_point(&Point::new(8.0, 2.0)));
        assert!(!shape.contains_point(&Point::new(2.0, 8.0)));
    }

    /// Winding number of `ring` around `q`, independent of the even-odd test.
    fn winding_number(ring: &[Point], q: &Point) -> i32 {
        let is_left = |a: &Point, b: &Point| (b.x - a.x) * (q.y - a.y) - (q.x - a.x) * (b.y - a.y);
        let mut wn = 0;
        for (i, a) in ring.iter().enumerate() {
            let b = &ring[(i + 1) % ring.len()];
            if a.y <= q.y {
                if b.y > q.y && is_left(a, b) > 0.0 {
                    wn += 1;
                }
            } else if b.y <= q.y && is_left(a, b) < 0.0 {
                wn -= 1;
            }
        }
        wn
    }

    /// Simple, generally concave polygon: vertices at increasing angles
    /// around the origin with random radii.
    fn star_polygon() -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec((0.0..1.0f64, 1.0..50.0f64), 3..10).prop_filter_map(
            "angular gaps must stay below half a turn",
            |mut spokes| {
                spokes.sort_by(|a, b| a.0.total_cmp(&b.0));
                let turn = std::f64::consts::TAU;
                let gaps_ok = spokes
                    .iter()
                    .zip(spokes.iter().cycle().skip(1))
                    .map(|(a, b)| (b.0 - a.0).rem_euclid(1.0))
                    .all(|gap| gap > 1e-3 && gap < 0.45);
                gaps_ok.then(|| {
                    spokes
                        .iter()
                        .map(|&(t, r)| Point::new(r * (t * turn).cos(), r * (t * turn).sin()))
                        .collect::<Vec<Point>>()
                })
            },
        )
    }

    fn any_points() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64), 0..12)
    }

    proptest! {
        #[test]
        fn nearest_vertex_is_global_minimum(
            points in any_points(),
            qx in -100.0..100.0f64,
            qy in -100.0..100.0f64,
            epsilon in 0.0..50.0f64,
        ) {
            let shape = Shape::new(ShapeKind::Polygon)
                .with_points(points.iter().map(|&(x, y)| Point::new(x, y)));
            let query = Point::new(qx, qy);
            let within: Vec<f64> = shape
                .points()
                .iter()
                .map(|p| p.distance_to(&query))
                .filter(|d| *d <= epsilon)
                .collect();

            match shape.nearest_vertex(&query, epsilon) {
                None => prop_assert!(within.is_empty()),
                Some(i) => {
                    let best = shape[i].distance_to(&query);
                    prop_assert!(best <= epsilon);
                    for d in within {
                        prop_assert!(best <= d);
                    }
                }
            }
        }

        #[test]
        fn star_polygon_containment_matches_winding_number(
            ring in star_polygon(),
            qx in -55.0..55.0f64,
            qy in -55.0..55.0f64,
        ) {
            let q = Point::new(qx, qy);
            let on_boundary = (0..ring.len()).any(|i| {
                distance_to_line(q, ring[i], ring[(i + 1) % ring.len()]) < 1e-6
            });
            prop_assume!(!on_boundary);

            let mut shape = Shape::new(ShapeKind::Polygon).with_points(ring.iter().copied());
            shape.close();
            prop_assert_eq!(shape.contains_point(&q), winding_number(&ring, &q) != 0);
        }

        #[test]
        fn convex_polygon_containment_matches_half_planes(
            qx in -5.0..15.0f64,
            qy in -5.0..15.0f64,
        ) {
            // Counter-clockwise triangle
            let shape = polygon(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
            let q = Point::new(qx, qy);
            let strictly_inside = qx > 1e-9 && qy > 1e-9 && qx + qy < 10.0 - 1e-9;
            let strictly_outside = qx < -1e-9 || qy < -1e-9 || qx + qy > 10.0 + 1e-9;

            if strictly_inside {
                prop_assert!(shape.contains_point(&q));
            }
            if strictly_outside {
                prop_assert!(!shape.contains_point(&q));
            }
        }
    }
}

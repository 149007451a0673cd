//! Stateless geometry helpers shared by shapes and the canvas engine.
//!
//! All coordinates are image-pixel coordinates. Display pan/zoom never
//! reaches this module.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

// ============================================================================
// Core Geometry Types
// ============================================================================

/// A 2D point (or vector) in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        distance(*self - *other)
    }

    /// Whether both components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner X coordinate
    pub x: f64,
    /// Top-left corner Y coordinate
    pub y: f64,
    /// Width of the rectangle
    pub width: f64,
    /// Height of the rectangle
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a normalized rectangle from two opposite corners.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        let width = (p1.x - p2.x).abs();
        let height = (p1.y - p2.y).abs();
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing every point, `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self::from_corners(min, max))
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left(), self.top())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// The four corners, clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left(),
            Point::new(self.right(), self.top()),
            self.bottom_right(),
            Point::new(self.left(), self.bottom()),
        ]
    }

    /// Whether the point lies inside or on the border.
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    pub fn translated(&self, offset: Point) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

/// Pixel extent of the loaded image.
///
/// Valid positions span `[0, width - 1] x [0, height - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageBounds {
    pub width: u32,
    pub height: u32,
}

impl ImageBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn max_x(&self) -> f64 {
        f64::from(self.width) - 1.0
    }

    pub fn max_y(&self) -> f64 {
        f64::from(self.height) - 1.0
    }

    pub fn contains(&self, p: &Point) -> bool {
        (0.0..=self.max_x()).contains(&p.x) && (0.0..=self.max_y()).contains(&p.y)
    }

    /// Clockwise corners of the valid pixel rectangle, starting at the origin.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(self.max_x(), 0.0),
            Point::new(self.max_x(), self.max_y()),
            Point::new(0.0, self.max_y()),
        ]
    }

    /// Project a point onto the valid pixel rectangle.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.min(self.max_x()).max(0.0), p.y.min(self.max_y()).max(0.0))
    }
}

// ============================================================================
// Distance Queries
// ============================================================================

/// Euclidean norm of a vector.
pub fn distance(v: Point) -> f64 {
    v.x.hypot(v.y)
}

/// Distance from `point` to the closed segment `p1`-`p2`.
pub fn distance_to_line(point: Point, p1: Point, p2: Point) -> f64 {
    let seg = p2 - p1;
    if (point - p1).dot(seg) < 0.0 {
        return distance(point - p1);
    }
    if (point - p2).dot(p1 - p2) < 0.0 {
        return distance(point - p2);
    }
    let len = distance(seg);
    if len == 0.0 {
        return distance(point - p1);
    }
    seg.cross(p1 - point).abs() / len
}

// ============================================================================
// Shape Construction
// ============================================================================

/// Axis-aligned rectangle with `p1` and `p2` as opposite corners.
pub fn rect_from_two_points(p1: Point, p2: Point) -> Rect {
    Rect::from_corners(p1, p2)
}

/// Bounding square of the circle centred on `center` passing through `edge`.
pub fn circle_rect_from_two_points(center: Point, edge: Point) -> Rect {
    let r = center.distance_to(&edge);
    Rect::new(center.x - r, center.y - r, 2.0 * r, 2.0 * r)
}

/// Even-odd containment test against the ring through `points`.
///
/// The ring is implicitly closed. Fewer than three points enclose nothing.
pub fn ring_contains(points: &[Point], point: &Point) -> bool {
    if points.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let vi = &points[i];
        let vj = &points[j];
        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// ============================================================================
// Boundary Clamping
// ============================================================================

/// Intersection of a segment with one edge of a quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeIntersection {
    /// Distance from the intersection to the segment's end point
    pub distance: f64,
    /// Index of the edge `(corners[i], corners[(i + 1) % 4])`
    pub edge: usize,
    /// Where the segment meets the edge
    pub point: Point,
}

/// Every edge of `corners` crossed by the segment `p1`-`p2`.
///
/// Edges parallel to (or coincident with) the segment are skipped.
pub fn intersecting_edges(p1: Point, p2: Point, corners: &[Point; 4]) -> Vec<EdgeIntersection> {
    let (x1, y1, x2, y2) = (p1.x, p1.y, p2.x, p2.y);
    let mut hits = Vec::with_capacity(2);

    for i in 0..4 {
        let (x3, y3) = (corners[i].x, corners[i].y);
        let (x4, y4) = (corners[(i + 1) % 4].x, corners[(i + 1) % 4].y);
        let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
        if denom == 0.0 {
            continue;
        }
        let nua = (x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3);
        let nub = (x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3);
        let ua = nua / denom;
        let ub = nub / denom;
        if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
            let point = Point::new(x1 + ua * (x2 - x1), y1 + ua * (y2 - y1));
            hits.push(EdgeIntersection {
                distance: point.distance_to(&p2),
                edge: i,
                point,
            });
        }
    }
    hits
}

/// Project `outside` back onto the image border along the segment from `inside`.
///
/// When the crossing coincides with `inside` itself (the inside point already
/// sits on the border), the result slides along that border edge instead.
pub fn clamp_to_bounds(inside: Point, outside: Point, bounds: &ImageBounds) -> Point {
    let corners = bounds.corners();
    let start = bounds.clamp(inside);

    let best = intersecting_edges(start, outside, &corners)
        .into_iter()
        .min_by(|a, b| a.distance.total_cmp(&b.distance));

    let Some(hit) = best else {
        return bounds.clamp(outside);
    };

    if hit.point == start {
        let c3 = corners[hit.edge];
        let c4 = corners[(hit.edge + 1) % 4];
        let snapped = if c3.x == c4.x {
            Point::new(c3.x, outside.y.max(0.0).min(c3.y.max(c4.y)))
        } else {
            Point::new(outside.x.max(0.0).min(c3.x.max(c4.x)), c3.y)
        };
        return bounds.clamp(snapped);
    }
    bounds.clamp(hit.point)
}

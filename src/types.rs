//! Value types shared by every stage: points, boxes, commands and shape records.
//!
//! All coordinates are plain `f64` user-space units. Values are created per
//! conversion call and never shared between calls.

use std::fmt;

use glam::{DVec2, dvec2};

/// A 2D point in user space.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// True when neither coordinate is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        dvec2(self.x, self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        self.to_dvec2().distance(other.to_dvec2())
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Linear interpolation, `t = 0` gives `self`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self.to_dvec2().lerp(other.to_dvec2(), t).into()
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn approx_eq(self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        p.to_dvec2()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Axis-aligned box stored as top-left corner plus extent.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    /// Box spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Rect::new(min_x, min_y, a.x.max(b.x) - min_x, a.y.max(b.y) - min_y)
    }

    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max = self.max();
        let other_max = other.max();
        Rect::new(
            min_x,
            min_y,
            max.x.max(other_max.x) - min_x,
            max.y.max(other_max.y) - min_y,
        )
    }

    /// Non-strict containment: a box contains itself.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        let max = self.max();
        let other_max = other.max();
        self.x <= other.x && self.y <= other.y && max.x >= other_max.x && max.y >= other_max.y
    }

    /// `(x, y, w, h)` tuple form.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.width, self.height)
    }
}

impl From<(f64, f64, f64, f64)> for Rect {
    fn from((x, y, width, height): (f64, f64, f64, f64)) -> Self {
        Rect::new(x, y, width, height)
    }
}

/// Running min/max accumulator used to build a [`Rect`] from many points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min: DVec2,
    max: DVec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// An empty accumulator (will expand on first point).
    pub fn new() -> Self {
        Bounds {
            min: DVec2::splat(f64::MAX),
            max: DVec2::splat(f64::MIN),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_point(&mut self, p: Point) {
        let v = p.to_dvec2();
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    pub fn expand_rect(&mut self, r: &Rect) {
        self.expand_point(r.min());
        self.expand_point(r.max());
    }

    /// The accumulated box, or `None` if nothing was added.
    pub fn to_rect(&self) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }
        Some(Rect::new(
            self.min.x,
            self.min.y,
            self.max.x - self.min.x,
            self.max.y - self.min.y,
        ))
    }
}

impl FromIterator<Point> for Bounds {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut bounds = Bounds::new();
        for p in iter {
            bounds.expand_point(p);
        }
        bounds
    }
}

/// One normalized path operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Two control points, then the end point.
    CubicCurveTo(Point, Point, Point),
    ClosePath,
}

impl PathCommand {
    /// The pen position after this command, if the command carries one.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicCurveTo(_, _, p) => Some(p),
            PathCommand::ClosePath => None,
        }
    }

    /// Every point carried by the command, control points included.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let (buf, n) = match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => ([p, p, p], 1),
            PathCommand::CubicCurveTo(c1, c2, p) => ([c1, c2, p], 3),
            PathCommand::ClosePath => ([Point::ORIGIN; 3], 0),
        };
        buf.into_iter().take(n)
    }

    /// Apply `f` to every point carried by the command.
    pub fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> PathCommand {
        match *self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(f(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(f(p)),
            PathCommand::CubicCurveTo(c1, c2, p) => PathCommand::CubicCurveTo(f(c1), f(c2), f(p)),
            PathCommand::ClosePath => PathCommand::ClosePath,
        }
    }
}

/// The parametric shape families the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Ellipse,
    Polygon,
    Polyline,
    Line,
}

impl ShapeKind {
    /// Minimum number of input points for point-based kinds.
    pub fn min_points(self) -> usize {
        match self {
            ShapeKind::Polygon | ShapeKind::Polyline | ShapeKind::Line => 2,
            ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Ellipse => 0,
        }
    }

    pub fn is_round(self) -> bool {
        matches!(self, ShapeKind::Circle | ShapeKind::Ellipse)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Line => "line",
        };
        f.write_str(name)
    }
}

/// Canonical geometry for one shape.
///
/// `parameters` layout per kind:
/// - Rectangle: `[rx, ry]`, already clamped to half the side
/// - Circle: `[r]`
/// - Ellipse: `[rx, ry]`
/// - Polygon / Polyline: `[point_count, closed]` with `closed` as `1.0` or `0.0`
/// - Line: `[sign(dx), sign(dy)]`
///
/// `dimensions` is never clamped; zero extents survive until emission.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeGeometry {
    pub kind: ShapeKind,
    /// Top-left of the bounding box.
    pub position: Point,
    /// `(width, height)`, both `>= 0`.
    pub dimensions: (f64, f64),
    pub parameters: Vec<f64>,
    pub bounding_box: Rect,
    /// Original, untransformed vertices (polygon and polyline only).
    pub points: Vec<Point>,
}

impl ShapeGeometry {
    pub(crate) fn from_box(kind: ShapeKind, bounding_box: Rect, parameters: Vec<f64>) -> Self {
        ShapeGeometry {
            kind,
            position: bounding_box.min(),
            dimensions: (bounding_box.width, bounding_box.height),
            parameters,
            bounding_box,
            points: Vec::new(),
        }
    }

    pub fn center(&self) -> Point {
        self.bounding_box.center()
    }

    fn param(&self, i: usize) -> f64 {
        self.parameters.get(i).copied().unwrap_or(0.0)
    }

    /// Clamped corner radii of a rectangle.
    pub fn corner_radii(&self) -> Option<(f64, f64)> {
        (self.kind == ShapeKind::Rectangle).then(|| (self.param(0), self.param(1)))
    }

    /// Radius of a circle.
    pub fn radius(&self) -> Option<f64> {
        (self.kind == ShapeKind::Circle).then(|| self.param(0))
    }

    /// `(rx, ry)` of a circle or ellipse.
    pub fn radii(&self) -> Option<(f64, f64)> {
        match self.kind {
            ShapeKind::Circle => Some((self.param(0), self.param(0))),
            ShapeKind::Ellipse => Some((self.param(0), self.param(1))),
            _ => None,
        }
    }

    /// Whether a point-based shape is closed.
    pub fn is_closed(&self) -> bool {
        match self.kind {
            ShapeKind::Polygon | ShapeKind::Polyline => self.param(1) != 0.0,
            ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Ellipse => true,
            ShapeKind::Line => false,
        }
    }

    /// `(sign(dx), sign(dy))` of a line.
    pub fn direction(&self) -> Option<(f64, f64)> {
        (self.kind == ShapeKind::Line).then(|| (self.param(0), self.param(1)))
    }
}

//! Resolve parsed path segments into absolute raw commands.
//!
//! Relative coordinates become absolute, shorthand segments (`H`, `V`, `S`,
//! `T`) are expanded and arcs are replaced with cubic chains, so the
//! normalizer only ever sees moveTo, lineTo, curveTo, qCurveTo and closePath.

use crate::errors::GeometryError;
use crate::geometry::arc::EndpointArc;
use crate::normalize::{RawCommand, RawOp};
use crate::parse::PathSegment;
use crate::types::{PathCommand, Point};

/// The control point a smooth segment may reflect.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LastControl {
    None,
    Cubic(Point),
    Quadratic(Point),
}

/// Walks segments while tracking the pen, the subpath start and the last
/// control point.
#[derive(Debug)]
pub struct PathDataReader {
    current: Option<Point>,
    start: Point,
    last_control: LastControl,
    /// Set after `Z`; the next drawing segment reopens at `start`.
    closed: bool,
    out: Vec<RawCommand>,
}

impl Default for PathDataReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PathDataReader {
    pub fn new() -> Self {
        Self {
            current: None,
            start: Point::ORIGIN,
            last_control: LastControl::None,
            closed: false,
            out: Vec::new(),
        }
    }

    /// Resolve a whole segment list.
    pub fn read(segments: &[PathSegment]) -> Result<Vec<RawCommand>, GeometryError> {
        let mut reader = Self::new();
        for (index, segment) in segments.iter().enumerate() {
            reader.push(index, segment)?;
        }
        Ok(reader.out)
    }

    fn resolve(&self, abs: bool, x: f64, y: f64) -> Point {
        match (abs, self.current) {
            (false, Some(c)) => Point::new(c.x + x, c.y + y),
            _ => Point::new(x, y),
        }
    }

    fn emit(&mut self, op: RawOp, coords: Vec<Point>) {
        self.out.push(RawCommand::new(op, coords));
    }

    /// Current point for a drawing segment; reopens a closed subpath.
    fn pen(&mut self, index: usize) -> Result<Point, GeometryError> {
        let current = self.current.ok_or(GeometryError::MissingCurrentPoint { index })?;
        if self.closed {
            self.closed = false;
            self.emit(RawOp::MoveTo, vec![self.start]);
        }
        Ok(current)
    }

    fn push(&mut self, index: usize, segment: &PathSegment) -> Result<(), GeometryError> {
        let mut control = LastControl::None;

        match *segment {
            PathSegment::MoveTo { abs, x, y } => {
                let p = self.resolve(abs, x, y);
                self.emit(RawOp::MoveTo, vec![p]);
                self.start = p;
                self.closed = false;
                self.current = Some(p);
            }
            PathSegment::LineTo { abs, x, y } => {
                self.pen(index)?;
                let p = self.resolve(abs, x, y);
                self.emit(RawOp::LineTo, vec![p]);
                self.current = Some(p);
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let c = self.pen(index)?;
                let p = Point::new(if abs { x } else { c.x + x }, c.y);
                self.emit(RawOp::LineTo, vec![p]);
                self.current = Some(p);
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let c = self.pen(index)?;
                let p = Point::new(c.x, if abs { y } else { c.y + y });
                self.emit(RawOp::LineTo, vec![p]);
                self.current = Some(p);
            }
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                self.pen(index)?;
                let c1 = self.resolve(abs, x1, y1);
                let c2 = self.resolve(abs, x2, y2);
                let p = self.resolve(abs, x, y);
                self.emit(RawOp::CurveTo, vec![c1, c2, p]);
                control = LastControl::Cubic(c2);
                self.current = Some(p);
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let c = self.pen(index)?;
                let c1 = match self.last_control {
                    LastControl::Cubic(prev) => reflect(prev, c),
                    _ => c,
                };
                let c2 = self.resolve(abs, x2, y2);
                let p = self.resolve(abs, x, y);
                self.emit(RawOp::CurveTo, vec![c1, c2, p]);
                control = LastControl::Cubic(c2);
                self.current = Some(p);
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                self.pen(index)?;
                let q = self.resolve(abs, x1, y1);
                let p = self.resolve(abs, x, y);
                self.emit(RawOp::QCurveTo, vec![q, p]);
                control = LastControl::Quadratic(q);
                self.current = Some(p);
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let c = self.pen(index)?;
                let q = match self.last_control {
                    LastControl::Quadratic(prev) => reflect(prev, c),
                    _ => c,
                };
                let p = self.resolve(abs, x, y);
                self.emit(RawOp::QCurveTo, vec![q, p]);
                control = LastControl::Quadratic(q);
                self.current = Some(p);
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let from = self.pen(index)?;
                let to = self.resolve(abs, x, y);
                let arc = EndpointArc {
                    from,
                    to,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                };
                for cmd in arc.to_commands() {
                    match cmd {
                        PathCommand::CubicCurveTo(c1, c2, p) => {
                            self.emit(RawOp::CurveTo, vec![c1, c2, p])
                        }
                        PathCommand::LineTo(p) => self.emit(RawOp::LineTo, vec![p]),
                        PathCommand::MoveTo(_) | PathCommand::ClosePath => {}
                    }
                }
                self.current = Some(to);
            }
            PathSegment::ClosePath { .. } => {
                if self.current.is_some() && !self.closed {
                    self.emit(RawOp::ClosePath, Vec::new());
                    self.current = Some(self.start);
                    self.closed = true;
                }
            }
        }

        self.last_control = control;
        Ok(())
    }
}

/// Reflection of `control` about `about`.
fn reflect(control: Point, about: Point) -> Point {
    Point::new(2.0 * about.x - control.x, 2.0 * about.y - control.y)
}

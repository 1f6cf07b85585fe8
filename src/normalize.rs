//! Path command normalizer.
//!
//! Turns heterogeneous outline data (parsed path data or glyph outlines) into
//! a command list that only uses moveTo, lineTo, cubic curveTo and closePath.
//!
//! # Pen state
//!
//! Quadratic segments are degree-elevated against the current pen position,
//! so the normalizer threads a [`Pen`] through the command list:
//!
//! - `moveTo` sets both the current point and the contour start
//! - drawing commands advance the current point
//! - `closePath` returns the current point to the contour start
//! - `endPath` ends an open contour; the next contour needs a `moveTo`

use crate::errors::GeometryError;
use crate::log::{debug, warn};
use crate::types::{PathCommand, Point};

/// Operation name of a raw outline command.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOp {
    MoveTo,
    LineTo,
    /// Cubic with three points, or quadratic with two.
    CurveTo,
    /// Quadratic run: off-curve points followed by one on-curve point.
    QCurveTo,
    ClosePath,
    /// Ends a contour without closing it.
    EndPath,
    /// Anything else; ignored by the normalizer.
    Other(String),
}

impl RawOp {
    /// Map an outline pen operation name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "moveTo" => RawOp::MoveTo,
            "lineTo" => RawOp::LineTo,
            "curveTo" => RawOp::CurveTo,
            "qCurveTo" => RawOp::QCurveTo,
            "closePath" => RawOp::ClosePath,
            "endPath" => RawOp::EndPath,
            other => RawOp::Other(other.to_string()),
        }
    }
}

/// One upstream command: an operation plus its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommand {
    pub op: RawOp,
    pub coords: Vec<Point>,
}

impl RawCommand {
    pub fn new(op: RawOp, coords: Vec<Point>) -> Self {
        Self { op, coords }
    }

    /// Build from an outline pen operation name.
    pub fn named(name: &str, coords: Vec<Point>) -> Self {
        Self::new(RawOp::from_name(name), coords)
    }
}

/// Current pen position and contour start.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pen {
    current: Option<Point>,
    start: Option<Point>,
}

impl Pen {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last emitted point, if a contour is open.
    pub fn current(&self) -> Option<Point> {
        self.current
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn move_to(&mut self, p: Point) {
        self.current = Some(p);
        self.start = Some(p);
    }

    pub fn advance(&mut self, p: Point) {
        self.current = Some(p);
    }

    pub fn close(&mut self) {
        self.current = self.start;
    }

    pub fn end(&mut self) {
        self.current = None;
        self.start = None;
    }

    /// Update the pen from an already-normalized command.
    pub fn follow(&mut self, command: &PathCommand) {
        match *command {
            PathCommand::MoveTo(p) => self.move_to(p),
            PathCommand::LineTo(p) | PathCommand::CubicCurveTo(_, _, p) => self.advance(p),
            PathCommand::ClosePath => self.close(),
        }
    }
}

/// Exact degree elevation of the quadratic `p0, q, end`.
///
/// Returns the two cubic control points `p0 + 2/3 (q - p0)` and
/// `end + 2/3 (q - end)`.
pub fn quad_to_cubic(p0: Point, q: Point, end: Point) -> (Point, Point) {
    let (p0, q, end) = (p0.to_dvec2(), q.to_dvec2(), end.to_dvec2());
    let c1 = p0 + (q - p0) * (2.0 / 3.0);
    let c2 = end + (q - end) * (2.0 / 3.0);
    (c1.into(), c2.into())
}

/// Normalize a raw command list.
///
/// Commands with no usable coordinates are dropped, as is any command other
/// than `lineTo` with a non-finite coordinate. A curve with no current
/// point fails the whole list with [`GeometryError::MissingCurrentPoint`].
pub fn normalize(raw: &[RawCommand]) -> Result<Vec<PathCommand>, GeometryError> {
    let mut pen = Pen::new();
    let mut out = Vec::with_capacity(raw.len());

    for (index, cmd) in raw.iter().enumerate() {
        let coords: Vec<Point> = cmd.coords.iter().copied().filter(|p| p.is_finite()).collect();
        if coords.len() != cmd.coords.len() {
            // Points are positional everywhere except in a lineTo run.
            if cmd.op != RawOp::LineTo {
                warn!(index, "command with non-finite coordinates dropped");
                continue;
            }
            warn!(index, "dropping non-finite lineTo points");
        }

        match &cmd.op {
            RawOp::MoveTo => {
                let Some((&first, rest)) = coords.split_first() else {
                    warn!(index, "moveTo without coordinates dropped");
                    continue;
                };
                pen.move_to(first);
                out.push(PathCommand::MoveTo(first));
                for &p in rest {
                    pen.advance(p);
                    out.push(PathCommand::LineTo(p));
                }
            }
            RawOp::LineTo => {
                if coords.is_empty() {
                    warn!(index, "lineTo without coordinates dropped");
                    continue;
                }
                for &p in &coords {
                    if pen.current().is_none() {
                        warn!(index, "lineTo with no current point starts a contour");
                        pen.move_to(p);
                        out.push(PathCommand::MoveTo(p));
                    } else {
                        pen.advance(p);
                        out.push(PathCommand::LineTo(p));
                    }
                }
            }
            RawOp::CurveTo => {
                let p0 = pen.current().ok_or(GeometryError::MissingCurrentPoint { index })?;
                match coords.as_slice() {
                    &[c1, c2, end] => {
                        out.push(PathCommand::CubicCurveTo(c1, c2, end));
                        pen.advance(end);
                    }
                    &[q, end] => {
                        let (c1, c2) = quad_to_cubic(p0, q, end);
                        out.push(PathCommand::CubicCurveTo(c1, c2, end));
                        pen.advance(end);
                    }
                    other => {
                        warn!(index, count = other.len(), "curveTo needs 2 or 3 points, dropped");
                    }
                }
            }
            RawOp::QCurveTo => {
                let p0 = pen.current().ok_or(GeometryError::MissingCurrentPoint { index })?;
                match coords.as_slice() {
                    &[] => {
                        warn!(index, "qCurveTo without coordinates dropped");
                    }
                    &[end] => {
                        out.push(PathCommand::LineTo(end));
                        pen.advance(end);
                    }
                    &[ref off_curve @ .., end] => {
                        let end_pt = emit_quadratic_run(p0, off_curve, end, &mut out);
                        pen.advance(end_pt);
                    }
                }
            }
            RawOp::ClosePath => {
                if pen.current().is_some() {
                    out.push(PathCommand::ClosePath);
                    pen.close();
                }
            }
            RawOp::EndPath => pen.end(),
            RawOp::Other(name) => {
                warn!(index, op = name.as_str(), "ignoring unknown outline operation");
            }
        }
    }

    debug!(input = raw.len(), output = out.len(), "normalized commands");
    Ok(out)
}

/// Expand a TrueType-style quadratic run and degree-elevate each piece.
///
/// Between two consecutive off-curve points lies an implied on-curve point
/// at their midpoint.
fn emit_quadratic_run(
    mut p0: Point,
    off_curve: &[Point],
    end: Point,
    out: &mut Vec<PathCommand>,
) -> Point {
    for (i, &q) in off_curve.iter().enumerate() {
        let on = match off_curve.get(i + 1) {
            Some(&next) => q.midpoint(next),
            None => end,
        };
        let (c1, c2) = quad_to_cubic(p0, q, on);
        out.push(PathCommand::CubicCurveTo(c1, c2, on));
        p0 = on;
    }
    p0
}

/// Split a normalized list into contours, one per `MoveTo`.
pub fn split_contours(commands: &[PathCommand]) -> Vec<Vec<PathCommand>> {
    let mut contours: Vec<Vec<PathCommand>> = Vec::new();
    for cmd in commands {
        match cmd {
            PathCommand::MoveTo(_) => contours.push(vec![*cmd]),
            _ => match contours.last_mut() {
                Some(contour) => contour.push(*cmd),
                None => contours.push(vec![*cmd]),
            },
        }
    }
    contours
}

//! Path emission into the integer path coordinate space.
//!
//! Every coordinate is rescaled so the shape's own bounding box spans
//! `[0, target_scale]` on each axis independently. An axis with zero extent
//! keeps a scale of `1.0`, so its coordinates are offsets from the box edge.
//!
//! Degenerate extents are floored to [`MIN_EXTENT`] here and nowhere else;
//! stored geometry keeps its true size.

use std::fmt;

use glam::{DVec2, dvec2};

use crate::defaults::{EMU_PER_PX, MIN_EXTENT};
use crate::log::debug;
use crate::types::{PathCommand, Point, Rect};

/// Integer point in path or device space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntPoint {
    pub x: i64,
    pub y: i64,
}

impl IntPoint {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for IntPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// One emitted path operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathOp {
    MoveTo(IntPoint),
    LineTo(IntPoint),
    CubicCurveTo(IntPoint, IntPoint, IntPoint),
    Close,
}

/// Bounding box in device units, with width and height at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EmittedBounds {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// A shape's path ready for the document writer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutputPath {
    pub ops: Vec<PathOp>,
    /// Extent of the path coordinate space on each axis.
    pub path_width: i64,
    pub path_height: i64,
    pub bounds: EmittedBounds,
}

impl fmt::Display for OutputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match op {
                PathOp::MoveTo(p) => write!(f, "M {p}")?,
                PathOp::LineTo(p) => write!(f, "L {p}")?,
                PathOp::CubicCurveTo(c1, c2, p) => write!(f, "C {c1} {c2} {p}")?,
                PathOp::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Coordinate mapping
// ============================================================================

/// User space to device units, supplied by the caller per conversion.
pub trait CoordinateMapper {
    fn map(&self, p: Point) -> (i64, i64);
}

/// Device units equal user units, rounded to the nearest integer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UserSpace;

impl CoordinateMapper for UserSpace {
    fn map(&self, p: Point) -> (i64, i64) {
        (p.x.round() as i64, p.y.round() as i64)
    }
}

/// Scales user units to EMU and shifts by a device-space offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmuMapper {
    pub emu_per_unit: f64,
    pub offset: (i64, i64),
}

impl Default for EmuMapper {
    fn default() -> Self {
        Self {
            emu_per_unit: EMU_PER_PX,
            offset: (0, 0),
        }
    }
}

impl EmuMapper {
    pub fn with_offset(mut self, x: i64, y: i64) -> Self {
        self.offset = (x, y);
        self
    }
}

impl CoordinateMapper for EmuMapper {
    fn map(&self, p: Point) -> (i64, i64) {
        (
            ((p.x * self.emu_per_unit).round() as i64).saturating_add(self.offset.0),
            ((p.y * self.emu_per_unit).round() as i64).saturating_add(self.offset.1),
        )
    }
}

impl<F> CoordinateMapper for F
where
    F: Fn(Point) -> (i64, i64),
{
    fn map(&self, p: Point) -> (i64, i64) {
        self(p)
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit with device bounds in rounded user units.
pub fn emit(commands: &[PathCommand], bounding_box: Rect, target_scale: i64) -> OutputPath {
    emit_with(commands, bounding_box, target_scale, &UserSpace)
}

/// Emit with device bounds computed by `mapper`.
pub fn emit_with(
    commands: &[PathCommand],
    bounding_box: Rect,
    target_scale: i64,
    mapper: &dyn CoordinateMapper,
) -> OutputPath {
    let DVec2 { x: sx, y: sy } = axis_scales(bounding_box, target_scale);
    let to_path = |p: Point| {
        IntPoint::new(
            ((p.x - bounding_box.x) * sx).round() as i64,
            ((p.y - bounding_box.y) * sy).round() as i64,
        )
    };

    let ops: Vec<PathOp> = commands
        .iter()
        .map(|cmd| match *cmd {
            PathCommand::MoveTo(p) => PathOp::MoveTo(to_path(p)),
            PathCommand::LineTo(p) => PathOp::LineTo(to_path(p)),
            PathCommand::CubicCurveTo(c1, c2, p) => {
                PathOp::CubicCurveTo(to_path(c1), to_path(c2), to_path(p))
            }
            PathCommand::ClosePath => PathOp::Close,
        })
        .collect();

    let out = OutputPath {
        ops,
        path_width: path_extent(bounding_box.width, target_scale),
        path_height: path_extent(bounding_box.height, target_scale),
        bounds: device_bounds(bounding_box, mapper),
    };
    debug!(ops = out.ops.len(), width = out.bounds.width, height = out.bounds.height, "emitted path");
    out
}

/// Per-axis factor from user units to path units for `bounding_box`.
pub fn axis_scales(bounding_box: Rect, target_scale: i64) -> DVec2 {
    let target = target_scale as f64;
    let axis = |extent: f64| if extent == 0.0 { 1.0 } else { target / extent };
    dvec2(axis(bounding_box.width), axis(bounding_box.height))
}

fn path_extent(extent: f64, target_scale: i64) -> i64 {
    if extent == 0.0 { MIN_EXTENT } else { target_scale }
}

/// Distance between two device coordinates, saturating at `i64::MAX`.
fn extent(a: i64, b: i64) -> i64 {
    i64::try_from(a.abs_diff(b)).unwrap_or(i64::MAX).max(MIN_EXTENT)
}

/// Map both box corners and floor the extent to [`MIN_EXTENT`].
pub fn device_bounds(bounding_box: Rect, mapper: &dyn CoordinateMapper) -> EmittedBounds {
    let (x0, y0) = mapper.map(bounding_box.min());
    let (x1, y1) = mapper.map(bounding_box.max());
    EmittedBounds {
        x: x0.min(x1),
        y: y0.min(y1),
        width: extent(x0, x1),
        height: extent(y0, y1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::PATH_SCALE;

    #[test]
    fn horizontal_line_floors_height() {
        let cmds = [
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            PathCommand::LineTo(Point::new(100.0, 0.0)),
        ];
        let out = emit(&cmds, Rect::new(0.0, 0.0, 100.0, 0.0), PATH_SCALE);
        insta::assert_snapshot!(out.to_string(), @"M 0 0 L 21600 0");
        assert_eq!(out.bounds.height, 1);
        assert_eq!(out.bounds.width, 100);
        assert_eq!(out.path_width, PATH_SCALE);
        assert_eq!(out.path_height, 1);
    }

    #[test]
    fn axes_scale_independently() {
        let cmds = [
            PathCommand::MoveTo(Point::new(10.0, 20.0)),
            PathCommand::LineTo(Point::new(14.0, 21.0)),
            PathCommand::ClosePath,
        ];
        let out = emit(&cmds, Rect::new(10.0, 20.0, 4.0, 1.0), 1000);
        insta::assert_snapshot!(out.to_string(), @"M 0 0 L 1000 1000 Z");
    }

    #[test]
    fn zero_width_keeps_offsets() {
        let cmds = [
            PathCommand::MoveTo(Point::new(5.0, 0.0)),
            PathCommand::LineTo(Point::new(5.0, 50.0)),
        ];
        let out = emit(&cmds, Rect::new(5.0, 0.0, 0.0, 50.0), 100);
        assert_eq!(out.ops[1], PathOp::LineTo(IntPoint::new(0, 100)));
        assert_eq!(out.path_width, 1);
        assert_eq!(out.bounds.width, 1);
    }

    #[test]
    fn emu_mapper_bounds() {
        let mapper = EmuMapper::default().with_offset(100, 0);
        let b = device_bounds(Rect::new(1.0, 2.0, 3.0, 0.0), &mapper);
        assert_eq!(
            b,
            EmittedBounds {
                x: 9625,
                y: 19050,
                width: 28575,
                height: 1
            }
        );
    }

    #[test]
    fn huge_box_saturates() {
        let b = device_bounds(Rect::new(-1e30, 0.0, 2e30, 10.0), &UserSpace);
        assert_eq!((b.x, b.width), (i64::MIN, i64::MAX));
        assert_eq!(b.height, 10);

        let shifted = EmuMapper::default().with_offset(i64::MAX, i64::MIN);
        let b = device_bounds(Rect::new(0.0, -1.0, 1e20, 1.0), &shifted);
        assert_eq!(b.x, i64::MAX);
        assert_eq!(b.y, i64::MIN);
        assert_eq!(b.width, 1);
    }

    #[test]
    fn closure_mapper() {
        let flip = |p: Point| (p.x as i64, -(p.y as i64));
        let b = device_bounds(Rect::new(0.0, 0.0, 10.0, 5.0), &flip);
        assert_eq!((b.x, b.y, b.width, b.height), (0, -5, 10, 5));
    }

    #[test]
    fn curves_render_all_points() {
        let cmds = [
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            PathCommand::CubicCurveTo(Point::new(0.0, 1.0), Point::new(1.0, 1.0), Point::new(1.0, 0.0)),
        ];
        let out = emit(&cmds, Rect::new(0.0, 0.0, 1.0, 1.0), 10);
        insta::assert_snapshot!(out.to_string(), @"M 0 0 C 0 10 10 10 10 0");
    }
}

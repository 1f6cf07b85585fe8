//! Spatial queries over shape records: intersection, union bounds, area and
//! coverage masks.

use std::f64::consts::PI;

use enum_dispatch::enum_dispatch;

use crate::errors::{GeometryError, check_lengths};
use crate::log::debug;
use crate::types::{Bounds, Point, Rect, ShapeGeometry, ShapeKind};

// ============================================================================
// Intersection
// ============================================================================

/// Whether two shapes overlap.
///
/// Two circles compare center distance against the radius sum and count
/// touching as overlap. Every other pair uses a strict box test, so boxes
/// that only share an edge do not overlap.
pub fn intersects(a: &ShapeGeometry, b: &ShapeGeometry) -> bool {
    match (a.kind, b.kind) {
        (ShapeKind::Circle, ShapeKind::Circle) => {
            let ra = a.radius().unwrap_or(a.dimensions.0 / 2.0);
            let rb = b.radius().unwrap_or(b.dimensions.0 / 2.0);
            a.center().distance(b.center()) <= ra + rb
        }
        _ => boxes_overlap(&a.bounding_box, &b.bounding_box),
    }
}

fn boxes_overlap(a: &Rect, b: &Rect) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());
    a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
}

/// Element-wise [`intersects`] over two equal-length lists.
pub fn intersects_batch(
    a: &[ShapeGeometry],
    b: &[ShapeGeometry],
) -> Result<Vec<bool>, GeometryError> {
    check_lengths(&[a.len(), b.len()])?;
    Ok(a.iter().zip(b).map(|(a, b)| intersects(a, b)).collect())
}

// ============================================================================
// Union and area
// ============================================================================

/// Smallest box containing every shape's box; `(0, 0, 0, 0)` for no shapes.
pub fn union_bounds(shapes: &[ShapeGeometry]) -> Rect {
    let mut bounds = Bounds::new();
    for shape in shapes {
        bounds.expand_rect(&shape.bounding_box);
    }
    bounds.to_rect().unwrap_or(Rect::ZERO)
}

/// Area in square user units.
///
/// Rectangles use `w * h` regardless of corner radii. Polylines are measured
/// as if closed; lines have no area.
pub fn area(shape: &ShapeGeometry) -> f64 {
    match shape.kind {
        ShapeKind::Rectangle => shape.dimensions.0 * shape.dimensions.1,
        ShapeKind::Circle | ShapeKind::Ellipse => {
            let (rx, ry) = shape.radii().unwrap_or((0.0, 0.0));
            PI * rx * ry
        }
        ShapeKind::Polygon | ShapeKind::Polyline => shoelace(&shape.points),
        ShapeKind::Line => 0.0,
    }
}

/// `0.5 * |Σ (x_i y_{i+1} - x_{i+1} y_i)|` with the last point wrapping to
/// the first.
fn shoelace(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let p = points[i];
            let q = points[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum();
    0.5 * twice.abs()
}

// ============================================================================
// Coverage masks
// ============================================================================

/// Point membership test for one shape.
#[enum_dispatch]
pub trait Contains {
    fn contains(&self, p: Point) -> bool;
}

/// Box with optional elliptical corners.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedBox {
    pub rect: Rect,
    pub rx: f64,
    pub ry: f64,
}

impl Contains for RoundedBox {
    fn contains(&self, p: Point) -> bool {
        let (min, max) = (self.rect.min(), self.rect.max());
        if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y {
            return false;
        }
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return true;
        }
        // Distance past the straight part of each side, zero inside it.
        let dx = (min.x + self.rx - p.x).max(p.x - (max.x - self.rx)).max(0.0);
        let dy = (min.y + self.ry - p.y).max(p.y - (max.y - self.ry)).max(0.0);
        (dx / self.rx).powi(2) + (dy / self.ry).powi(2) <= 1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipseRegion {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
}

impl Contains for EllipseRegion {
    fn contains(&self, p: Point) -> bool {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return false;
        }
        let dx = (p.x - self.center.x) / self.rx;
        let dy = (p.y - self.center.y) / self.ry;
        dx * dx + dy * dy <= 1.0
    }
}

/// Even-odd fill of a closed vertex ring.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRegion {
    pub points: Vec<Point>,
}

impl Contains for PolygonRegion {
    fn contains(&self, p: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (self.points[i], self.points[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Covers nothing. Lines have no interior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmptyRegion;

impl Contains for EmptyRegion {
    fn contains(&self, _p: Point) -> bool {
        false
    }
}

#[enum_dispatch(Contains)]
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    RoundedBox,
    EllipseRegion,
    PolygonRegion,
    EmptyRegion,
}

impl Region {
    pub fn for_shape(shape: &ShapeGeometry) -> Region {
        match shape.kind {
            ShapeKind::Rectangle => {
                let (rx, ry) = shape.corner_radii().unwrap_or((0.0, 0.0));
                RoundedBox {
                    rect: shape.bounding_box,
                    rx,
                    ry,
                }
                .into()
            }
            ShapeKind::Circle | ShapeKind::Ellipse => {
                let (rx, ry) = shape.radii().unwrap_or((0.0, 0.0));
                EllipseRegion {
                    center: shape.center(),
                    rx,
                    ry,
                }
                .into()
            }
            ShapeKind::Polygon | ShapeKind::Polyline => PolygonRegion {
                points: shape.points.clone(),
            }
            .into(),
            ShapeKind::Line => EmptyRegion.into(),
        }
    }
}

/// Row-major inside/outside grid for one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMask {
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<bool>,
}

impl CoverageMask {
    pub fn get(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.cells[row * self.cols + col]
    }

    /// Number of covered cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// Sample every shape on a `cols × rows` grid spanning a `width × height`
/// canvas, testing the center of each cell. No anti-aliasing.
pub fn coverage_masks(
    shapes: &[ShapeGeometry],
    canvas: (f64, f64),
    resolution: (usize, usize),
) -> Vec<CoverageMask> {
    let (cols, rows) = resolution;
    let cell_w = if cols > 0 { canvas.0 / cols as f64 } else { 0.0 };
    let cell_h = if rows > 0 { canvas.1 / rows as f64 } else { 0.0 };
    let samples: Vec<Point> = (0..rows)
        .flat_map(|r| {
            (0..cols).map(move |c| {
                Point::new((c as f64 + 0.5) * cell_w, (r as f64 + 0.5) * cell_h)
            })
        })
        .collect();

    debug!(shapes = shapes.len(), cols, rows, "sampling coverage masks");
    shapes
        .iter()
        .map(|shape| {
            let region = Region::for_shape(shape);
            CoverageMask {
                cols,
                rows,
                cells: samples.iter().map(|&p| region.contains(p)).collect(),
            }
        })
        .collect()
}

//! Batch construction of [`ShapeGeometry`] records.
//!
//! Each batch function takes parallel columns, one entry per shape, and
//! returns one result per shape in input order. The outer `Result` fails
//! only when the columns disagree in length; a bad shape fails its own
//! entry and the rest of the batch is still built.

use crate::errors::{GeometryError, check_lengths};
use crate::log::{debug, warn};
use crate::types::{Bounds, Point, Rect, ShapeGeometry, ShapeKind};

/// Outcome for a single shape of a batch.
pub type ShapeResult = Result<ShapeGeometry, GeometryError>;

fn finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// `-1`, `0` or `1`. Unlike `f64::signum`, zero maps to zero.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// A usable corner radius: negative or non-finite becomes 0.
fn corner_radius(r: f64) -> f64 {
    if r.is_finite() && r > 0.0 { r } else { 0.0 }
}

// ============================================================================
// Single shapes
// ============================================================================

/// Rectangle with corner radii clamped to half of each side.
pub fn rectangle(x: f64, y: f64, w: f64, h: f64, rx: f64, ry: f64) -> ShapeResult {
    if !finite(&[x, y, w, h]) {
        return Err(GeometryError::malformed("rectangle with non-finite position or size"));
    }
    if w < 0.0 || h < 0.0 {
        return Err(GeometryError::malformed(format!(
            "rectangle with negative size {w}x{h}"
        )));
    }
    let rx = corner_radius(rx).min(w / 2.0);
    let ry = corner_radius(ry).min(h / 2.0);
    Ok(ShapeGeometry::from_box(
        ShapeKind::Rectangle,
        Rect::new(x, y, w, h),
        vec![rx, ry],
    ))
}

/// Circle of radius `r`; the radius must be positive.
pub fn circle(cx: f64, cy: f64, r: f64) -> ShapeResult {
    if !finite(&[cx, cy, r]) || r <= 0.0 {
        return Err(GeometryError::malformed(format!("circle radius {r}")));
    }
    Ok(ShapeGeometry::from_box(
        ShapeKind::Circle,
        Rect::new(cx - r, cy - r, 2.0 * r, 2.0 * r),
        vec![r],
    ))
}

/// Ellipse with radii `rx`, `ry`. Zero radii give a degenerate box.
pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64) -> ShapeResult {
    if !finite(&[cx, cy, rx, ry]) || rx < 0.0 || ry < 0.0 {
        return Err(GeometryError::malformed(format!("ellipse radii {rx},{ry}")));
    }
    Ok(ShapeGeometry::from_box(
        ShapeKind::Ellipse,
        Rect::new(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry),
        vec![rx, ry],
    ))
}

fn point_shape(kind: ShapeKind, points: &[Point]) -> ShapeResult {
    let kept: Vec<Point> = points.iter().copied().filter(|p| p.is_finite()).collect();
    if kept.len() != points.len() {
        warn!(%kind, dropped = points.len() - kept.len(), "dropping non-finite points");
    }
    let required = kind.min_points();
    if kept.len() < required {
        return Err(GeometryError::InsufficientPoints {
            kind,
            required,
            found: kept.len(),
        });
    }

    let bounds: Bounds = kept.iter().copied().collect();
    let Some(bbox) = bounds.to_rect() else {
        return Err(GeometryError::InsufficientPoints {
            kind,
            required,
            found: 0,
        });
    };
    let closed = if kind == ShapeKind::Polygon { 1.0 } else { 0.0 };
    let mut geometry = ShapeGeometry::from_box(kind, bbox, vec![kept.len() as f64, closed]);
    geometry.points = kept;
    Ok(geometry)
}

/// Closed point shape.
pub fn polygon(points: &[Point]) -> ShapeResult {
    point_shape(ShapeKind::Polygon, points)
}

/// Open point shape.
pub fn polyline(points: &[Point]) -> ShapeResult {
    point_shape(ShapeKind::Polyline, points)
}

/// Line segment. Only the box and the direction signs are kept; the
/// segment runs along the box diagonal they select.
pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> ShapeResult {
    if !finite(&[x1, y1, x2, y2]) {
        return Err(GeometryError::malformed("line with non-finite endpoint"));
    }
    let from = Point::new(x1, y1);
    let to = Point::new(x2, y2);
    Ok(ShapeGeometry::from_box(
        ShapeKind::Line,
        Rect::from_corners(from, to),
        vec![sign(x2 - x1), sign(y2 - y1)],
    ))
}

// ============================================================================
// Batches
// ============================================================================

pub fn rectangles(
    x: &[f64],
    y: &[f64],
    w: &[f64],
    h: &[f64],
    rx: &[f64],
    ry: &[f64],
) -> Result<Vec<ShapeResult>, GeometryError> {
    let n = check_lengths(&[x.len(), y.len(), w.len(), h.len(), rx.len(), ry.len()])?;
    debug!(count = n, "building rectangles");
    Ok((0..n)
        .map(|i| rectangle(x[i], y[i], w[i], h[i], rx[i], ry[i]))
        .collect())
}

pub fn circles(cx: &[f64], cy: &[f64], r: &[f64]) -> Result<Vec<ShapeResult>, GeometryError> {
    let n = check_lengths(&[cx.len(), cy.len(), r.len()])?;
    debug!(count = n, "building circles");
    Ok((0..n).map(|i| circle(cx[i], cy[i], r[i])).collect())
}

pub fn ellipses(
    cx: &[f64],
    cy: &[f64],
    rx: &[f64],
    ry: &[f64],
) -> Result<Vec<ShapeResult>, GeometryError> {
    let n = check_lengths(&[cx.len(), cy.len(), rx.len(), ry.len()])?;
    debug!(count = n, "building ellipses");
    Ok((0..n).map(|i| ellipse(cx[i], cy[i], rx[i], ry[i])).collect())
}

/// One record per point set; sets may differ in length.
pub fn polygons(point_sets: &[Vec<Point>]) -> Result<Vec<ShapeResult>, GeometryError> {
    debug!(count = point_sets.len(), "building polygons");
    Ok(point_sets.iter().map(|pts| polygon(pts)).collect())
}

pub fn polylines(point_sets: &[Vec<Point>]) -> Result<Vec<ShapeResult>, GeometryError> {
    debug!(count = point_sets.len(), "building polylines");
    Ok(point_sets.iter().map(|pts| polyline(pts)).collect())
}

pub fn lines(
    x1: &[f64],
    y1: &[f64],
    x2: &[f64],
    y2: &[f64],
) -> Result<Vec<ShapeResult>, GeometryError> {
    let n = check_lengths(&[x1.len(), y1.len(), x2.len(), y2.len()])?;
    debug!(count = n, "building lines");
    Ok((0..n).map(|i| line(x1[i], y1[i], x2[i], y2[i])).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_points;

    #[test]
    fn rectangle_radii_clamp_to_half_side() {
        let out = rectangles(&[0.0], &[0.0], &[10.0], &[10.0], &[20.0], &[20.0]).unwrap();
        let rect = out[0].as_ref().unwrap();
        assert_eq!(rect.corner_radii(), Some((5.0, 5.0)));
        assert_eq!(rect.bounding_box, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn negative_radii_become_square_corners() {
        let rect = rectangle(0.0, 0.0, 4.0, 2.0, -1.0, f64::NAN).unwrap();
        assert_eq!(rect.corner_radii(), Some((0.0, 0.0)));
    }

    #[test]
    fn circle_box() {
        let c = circle(5.0, 5.0, 3.0).unwrap();
        assert_eq!(c.bounding_box.as_tuple(), (2.0, 2.0, 6.0, 6.0));
        assert_eq!(c.dimensions.0, c.dimensions.1);
        assert_eq!(c.radius(), Some(3.0));
    }

    #[test]
    fn circle_rejects_non_positive_radius() {
        let out = circles(&[0.0, 0.0], &[0.0, 0.0], &[0.0, -1.0]).unwrap();
        assert!(out.iter().all(|r| matches!(r, Err(GeometryError::MalformedInput { .. }))));
    }

    #[test]
    fn ellipse_box() {
        let e = ellipse(10.0, 20.0, 4.0, 2.0).unwrap();
        assert_eq!(e.bounding_box.as_tuple(), (6.0, 18.0, 8.0, 4.0));
        assert_eq!(e.radii(), Some((4.0, 2.0)));
    }

    #[test]
    fn polygon_box_and_parameters() {
        let p = polygon(&parse_points("0,0 10,0 10,10 0,10")).unwrap();
        assert_eq!(p.bounding_box.as_tuple(), (0.0, 0.0, 10.0, 10.0));
        assert_eq!(p.parameters, vec![4.0, 1.0]);
        assert!(p.is_closed());
        assert_eq!(p.points.len(), 4);

        let open = polyline(&p.points).unwrap();
        assert!(!open.is_closed());
    }

    #[test]
    fn collinear_polygon_keeps_zero_height() {
        let p = polygon(&[Point::new(0.0, 3.0), Point::new(8.0, 3.0)]).unwrap();
        assert_eq!(p.dimensions, (8.0, 0.0));
    }

    #[test]
    fn too_few_points() {
        let out = polygons(&[vec![Point::new(1.0, 1.0)], vec![Point::new(f64::NAN, 0.0), Point::ORIGIN]])
            .unwrap();
        for r in out {
            assert_eq!(
                r.unwrap_err(),
                GeometryError::InsufficientPoints {
                    kind: ShapeKind::Polygon,
                    required: 2,
                    found: 1
                }
            );
        }
    }

    #[test]
    fn line_direction_signs() {
        let out = lines(&[10.0, 0.0], &[0.0, 0.0], &[0.0, 100.0], &[5.0, 0.0]).unwrap();
        let a = out[0].as_ref().unwrap();
        assert_eq!(a.direction(), Some((-1.0, 1.0)));
        assert_eq!(a.bounding_box.as_tuple(), (0.0, 0.0, 10.0, 5.0));

        let flat = out[1].as_ref().unwrap();
        assert_eq!(flat.direction(), Some((1.0, 0.0)));
        assert_eq!(flat.dimensions.1, 0.0);
    }

    #[test]
    fn batch_columns_must_agree() {
        assert_eq!(
            circles(&[0.0, 1.0], &[0.0], &[1.0, 1.0]).unwrap_err(),
            GeometryError::LengthMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn batch_preserves_order() {
        let out = circles(&[0.0, 10.0, 20.0], &[0.0; 3], &[1.0, -1.0, 2.0]).unwrap();
        assert_eq!(out[0].as_ref().unwrap().center(), Point::new(0.0, 0.0));
        assert!(out[1].is_err());
        assert_eq!(out[2].as_ref().unwrap().center(), Point::new(20.0, 0.0));
    }
}

//! Shape outlines and exact path bounds.

use glam::DVec2;

use crate::defaults::KAPPA;
use crate::types::{Bounds, PathCommand, Point, Rect, ShapeGeometry, ShapeKind};

/// Path for a parametric shape, in user space.
///
/// Rounded rectangle corners and ellipse quadrants are quarter-ellipse
/// cubics. Polygons are closed, polylines and lines are left open.
pub fn outline(shape: &ShapeGeometry) -> Vec<PathCommand> {
    let bbox = shape.bounding_box;
    match shape.kind {
        ShapeKind::Rectangle => {
            let (rx, ry) = shape.corner_radii().unwrap_or((0.0, 0.0));
            rounded_rect(bbox, rx, ry)
        }
        ShapeKind::Circle | ShapeKind::Ellipse => {
            let (rx, ry) = shape.radii().unwrap_or((bbox.width / 2.0, bbox.height / 2.0));
            ellipse(bbox.center(), rx, ry)
        }
        ShapeKind::Polygon | ShapeKind::Polyline => polyline(&shape.points, shape.is_closed()),
        ShapeKind::Line => {
            let (sx, sy) = shape.direction().unwrap_or((1.0, 1.0));
            let (min, max) = (bbox.min(), bbox.max());
            let start = Point::new(
                if sx < 0.0 { max.x } else { min.x },
                if sy < 0.0 { max.y } else { min.y },
            );
            let end = Point::new(
                if sx < 0.0 { min.x } else { max.x },
                if sy < 0.0 { min.y } else { max.y },
            );
            vec![PathCommand::MoveTo(start), PathCommand::LineTo(end)]
        }
    }
}

fn polyline(points: &[Point], closed: bool) -> Vec<PathCommand> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(points.len() + 1);
    out.push(PathCommand::MoveTo(first));
    out.extend(rest.iter().map(|&p| PathCommand::LineTo(p)));
    if closed {
        out.push(PathCommand::ClosePath);
    }
    out
}

fn rounded_rect(r: Rect, rx: f64, ry: f64) -> Vec<PathCommand> {
    let (x0, y0) = (r.x, r.y);
    let (x1, y1) = (r.x + r.width, r.y + r.height);
    let p = Point::new;

    if rx <= 0.0 || ry <= 0.0 {
        return vec![
            PathCommand::MoveTo(p(x0, y0)),
            PathCommand::LineTo(p(x1, y0)),
            PathCommand::LineTo(p(x1, y1)),
            PathCommand::LineTo(p(x0, y1)),
            PathCommand::ClosePath,
        ];
    }

    let kx = rx * KAPPA;
    let ky = ry * KAPPA;
    vec![
        PathCommand::MoveTo(p(x0 + rx, y0)),
        PathCommand::LineTo(p(x1 - rx, y0)),
        PathCommand::CubicCurveTo(p(x1 - rx + kx, y0), p(x1, y0 + ry - ky), p(x1, y0 + ry)),
        PathCommand::LineTo(p(x1, y1 - ry)),
        PathCommand::CubicCurveTo(p(x1, y1 - ry + ky), p(x1 - rx + kx, y1), p(x1 - rx, y1)),
        PathCommand::LineTo(p(x0 + rx, y1)),
        PathCommand::CubicCurveTo(p(x0 + rx - kx, y1), p(x0, y1 - ry + ky), p(x0, y1 - ry)),
        PathCommand::LineTo(p(x0, y0 + ry)),
        PathCommand::CubicCurveTo(p(x0, y0 + ry - ky), p(x0 + rx - kx, y0), p(x0 + rx, y0)),
        PathCommand::ClosePath,
    ]
}

/// Four quarter arcs starting at the rightmost point, clockwise on a
/// y-down canvas.
fn ellipse(c: Point, rx: f64, ry: f64) -> Vec<PathCommand> {
    let kx = rx * KAPPA;
    let ky = ry * KAPPA;
    let p = Point::new;
    vec![
        PathCommand::MoveTo(p(c.x + rx, c.y)),
        PathCommand::CubicCurveTo(p(c.x + rx, c.y + ky), p(c.x + kx, c.y + ry), p(c.x, c.y + ry)),
        PathCommand::CubicCurveTo(p(c.x - kx, c.y + ry), p(c.x - rx, c.y + ky), p(c.x - rx, c.y)),
        PathCommand::CubicCurveTo(p(c.x - rx, c.y - ky), p(c.x - kx, c.y - ry), p(c.x, c.y - ry)),
        PathCommand::CubicCurveTo(p(c.x + kx, c.y - ry), p(c.x + rx, c.y - ky), p(c.x + rx, c.y)),
        PathCommand::ClosePath,
    ]
}

/// Tight bounding box of a command list, or `None` when it has no points.
///
/// Cubic segments contribute their endpoints and any interior extrema, not
/// their control points.
pub fn path_bounds(commands: &[PathCommand]) -> Option<Rect> {
    let mut bounds = Bounds::new();
    let mut current: Option<Point> = None;
    let mut start: Option<Point> = None;

    for cmd in commands {
        match *cmd {
            PathCommand::MoveTo(p) => {
                bounds.expand_point(p);
                current = Some(p);
                start = Some(p);
            }
            PathCommand::LineTo(p) => {
                bounds.expand_point(p);
                current = Some(p);
            }
            PathCommand::CubicCurveTo(c1, c2, end) => {
                match current {
                    Some(p0) => {
                        for t in cubic_extrema(p0, c1, c2, end) {
                            bounds.expand_point(cubic_point(p0, c1, c2, end, t));
                        }
                    }
                    None => {
                        bounds.expand_point(c1);
                        bounds.expand_point(c2);
                    }
                }
                bounds.expand_point(end);
                current = Some(end);
            }
            PathCommand::ClosePath => current = start,
        }
    }
    bounds.to_rect()
}

fn cubic_point(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let v = p0.to_dvec2() * (mt * mt * mt)
        + c1.to_dvec2() * (3.0 * mt * mt * t)
        + c2.to_dvec2() * (3.0 * mt * t * t)
        + p3.to_dvec2() * (t * t * t);
    v.into()
}

/// Parameters in `(0, 1)` where the derivative vanishes on either axis.
fn cubic_extrema(p0: Point, c1: Point, c2: Point, p3: Point) -> Vec<f64> {
    let (p0, c1, c2, p3) = (p0.to_dvec2(), c1.to_dvec2(), c2.to_dvec2(), p3.to_dvec2());
    let a = p3 - 3.0 * c2 + 3.0 * c1 - p0;
    let b = 2.0 * (p0 - 2.0 * c1 + c2);
    let c = c1 - p0;

    let mut ts = Vec::with_capacity(4);
    for axis in 0..2 {
        let pick = |v: DVec2| if axis == 0 { v.x } else { v.y };
        solve_quadratic(pick(a), pick(b), pick(c), &mut ts);
    }
    ts.retain(|t| *t > 0.0 && *t < 1.0);
    ts
}

/// Real roots of `a t² + b t + c`, pushed onto `out`.
fn solve_quadratic(a: f64, b: f64, c: f64, out: &mut Vec<f64>) {
    const EPS: f64 = 1e-12;
    if a.abs() < EPS {
        if b.abs() >= EPS {
            out.push(-c / b);
        }
        return;
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return;
    }
    let sq = disc.sqrt();
    out.push((-b + sq) / (2.0 * a));
    if sq > 0.0 {
        out.push((-b - sq) / (2.0 * a));
    }
}

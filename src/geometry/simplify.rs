//! Path simplification: duplicate removal, near-straight curve flattening
//! and polygon point reduction.
//!
//! Commands stay in user space. Tolerances are compared in emitted path
//! units: every delta is multiplied by the per-axis `scale` first.

use glam::DVec2;

use crate::log::debug;
use crate::options::ConversionOptions;
use crate::types::{PathCommand, Point};

/// Drop a `MoveTo` or `LineTo` that targets the point the previous
/// `MoveTo`/`LineTo` already reached.
pub fn remove_duplicates(commands: &[PathCommand], tolerance: f64, scale: DVec2) -> Vec<PathCommand> {
    let mut out: Vec<PathCommand> = Vec::with_capacity(commands.len());
    for cmd in commands {
        let duplicate = match (out.last(), cmd) {
            (Some(PathCommand::MoveTo(prev)), PathCommand::MoveTo(p))
            | (Some(PathCommand::MoveTo(prev)), PathCommand::LineTo(p))
            | (Some(PathCommand::LineTo(prev)), PathCommand::LineTo(p)) => {
                let delta = (p.to_dvec2() - prev.to_dvec2()) * scale;
                delta.abs().max_element() <= tolerance
            }
            _ => false,
        };
        if !duplicate {
            out.push(*cmd);
        }
    }
    out
}

/// Distance from `p` to the infinite line through `a` and `b`, or to `a`
/// when the two coincide.
fn perpendicular_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let chord = b - a;
    let len = chord.length();
    if len == 0.0 {
        return p.distance(a);
    }
    chord.perp_dot(p - a).abs() / len
}

/// Replace cubics whose control points both lie within `tolerance` of the
/// chord with a `LineTo` to the same end point.
pub fn flatten_curves(commands: &[PathCommand], tolerance: f64, scale: DVec2) -> Vec<PathCommand> {
    let mut out = Vec::with_capacity(commands.len());
    let mut current: Option<Point> = None;
    let mut start: Option<Point> = None;

    for cmd in commands {
        let replaced = match (*cmd, current) {
            (PathCommand::CubicCurveTo(c1, c2, end), Some(p0)) => {
                let (a, b) = (p0.to_dvec2() * scale, end.to_dvec2() * scale);
                let straight = perpendicular_distance(c1.to_dvec2() * scale, a, b) <= tolerance
                    && perpendicular_distance(c2.to_dvec2() * scale, a, b) <= tolerance;
                if straight { PathCommand::LineTo(end) } else { *cmd }
            }
            _ => *cmd,
        };
        match replaced {
            PathCommand::MoveTo(p) => {
                current = Some(p);
                start = Some(p);
            }
            PathCommand::LineTo(p) | PathCommand::CubicCurveTo(_, _, p) => current = Some(p),
            PathCommand::ClosePath => current = start,
        }
        out.push(replaced);
    }
    out
}

/// Keep the `max_points` vertices with the longest edge to their successor
/// (the last vertex's successor is the first), in their original order.
///
/// This is a greedy single-pass heuristic, not Douglas-Peucker: it ranks
/// vertices once and never revisits the choice, so it can change topology
/// on dense or self-intersecting outlines. Ties keep the earlier vertex.
pub fn reduce_points(points: &[Point], max_points: usize) -> Vec<Point> {
    let n = points.len();
    if n <= max_points {
        return points.to_vec();
    }

    let edge = |i: usize| points[i].distance(points[(i + 1) % n]);
    let mut ranked: Vec<usize> = (0..n).collect();
    ranked.sort_by(|&a, &b| edge(b).total_cmp(&edge(a)));
    ranked.truncate(max_points);
    ranked.sort_unstable();

    debug!(from = n, to = ranked.len(), "reduced polygon points");
    ranked.into_iter().map(|i| points[i]).collect()
}

/// Run the enabled simplification passes from `options`. `scale` maps user
/// units to path units per axis, as returned by [`axis_scales`].
///
/// [`axis_scales`]: crate::emit::axis_scales
pub fn simplify(
    commands: &[PathCommand],
    options: &ConversionOptions,
    scale: DVec2,
) -> Vec<PathCommand> {
    if !options.simplify {
        return commands.to_vec();
    }
    let deduped = remove_duplicates(commands, options.duplicate_tolerance, scale);
    let out = flatten_curves(&deduped, options.flatten_tolerance, scale);
    debug!(before = commands.len(), after = out.len(), "simplified path");
    out
}

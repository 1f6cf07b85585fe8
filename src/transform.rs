//! Affine transform pipeline.
//!
//! A transform is a homogeneous 3×3 matrix acting on column vectors
//! `(x, y, 1)`. Points are remapped only; nothing is clipped.

use glam::{DMat3, DVec2, dvec2};

use crate::errors::GeometryError;
use crate::log::debug;
use crate::types::{PathCommand, Point};

/// 2D affine transform in homogeneous form. Identity by default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform(pub DMat3);

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform(DMat3::IDENTITY);

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self(DMat3::from_translation(dvec2(tx, ty)))
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self(DMat3::from_scale(dvec2(sx, sy)))
    }

    /// Rotation about the origin, in degrees. Positive angles turn +x toward
    /// +y, which is clockwise on a y-down canvas.
    pub fn rotate(degrees: f64) -> Self {
        Self(DMat3::from_angle(degrees.to_radians()))
    }

    /// Rotation about `center`, in degrees.
    pub fn rotate_about(degrees: f64, center: Point) -> Self {
        Self::translate(-center.x, -center.y)
            .then(&Self::rotate(degrees))
            .then(&Self::translate(center.x, center.y))
    }

    /// The SVG `matrix(a b c d e f)` form.
    pub fn from_svg_matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self(DMat3::from_cols_array(&[a, b, 0.0, c, d, 0.0, e, f, 1.0]))
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &AffineTransform) -> Self {
        Self(next.0 * self.0)
    }

    /// The inverse transform, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.0.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Self(self.0.inverse()))
    }

    /// Structural identity check: exact equality with the identity matrix.
    pub fn is_identity(&self) -> bool {
        self.0 == DMat3::IDENTITY
    }

    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        self.0.transform_point2(DVec2::from(p)).into()
    }
}

/// Transform `points` in place. The identity leaves them untouched.
pub fn apply(points: &mut [Point], m: &AffineTransform) {
    if m.is_identity() {
        return;
    }
    for p in points.iter_mut() {
        *p = m.transform_point(*p);
    }
}

/// Apply `matrices[i]` to `point_sets[i]`.
pub fn apply_batch(
    point_sets: &[Vec<Point>],
    matrices: &[AffineTransform],
) -> Result<Vec<Vec<Point>>, GeometryError> {
    if point_sets.len() != matrices.len() {
        return Err(GeometryError::ArityMismatch {
            sets: point_sets.len(),
            matrices: matrices.len(),
        });
    }
    debug!(sets = point_sets.len(), "applying transforms");
    Ok(point_sets
        .iter()
        .zip(matrices)
        .map(|(set, m)| {
            let mut out = set.clone();
            apply(&mut out, m);
            out
        })
        .collect())
}

/// Transform every point carried by a command list, control points included.
pub fn apply_commands(commands: &mut [PathCommand], m: &AffineTransform) {
    if m.is_identity() {
        return;
    }
    for cmd in commands.iter_mut() {
        *cmd = cmd.map_points(|p| m.transform_point(p));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.approx_eq(b, 1e-9)
    }

    #[test]
    fn identity_is_a_no_op() {
        let mut pts = vec![Point::new(1.5, -2.0), Point::new(f64::MAX, 0.0)];
        let before = pts.clone();
        apply(&mut pts, &AffineTransform::identity());
        assert_eq!(pts, before);
    }

    #[test]
    fn translate_then_scale() {
        let m = AffineTransform::translate(10.0, 5.0).then(&AffineTransform::scale(2.0, 3.0));
        assert_eq!(m.transform_point(Point::new(1.0, 1.0)), Point::new(22.0, 18.0));
    }

    #[test]
    fn rotation_quarter_turn() {
        let p = AffineTransform::rotate(90.0).transform_point(Point::new(1.0, 0.0));
        assert!(close(p, Point::new(0.0, 1.0)), "{p:?}");

        let about = AffineTransform::rotate_about(180.0, Point::new(5.0, 5.0));
        assert!(close(about.transform_point(Point::new(0.0, 5.0)), Point::new(10.0, 5.0)));
    }

    #[test]
    fn svg_matrix_layout() {
        let m = AffineTransform::from_svg_matrix(1.0, 0.0, 0.0, 1.0, 7.0, -3.0);
        assert_eq!(m, AffineTransform::translate(7.0, -3.0));

        // skewX(45deg): c = tan(45deg)
        let skew = AffineTransform::from_svg_matrix(1.0, 0.0, 1.0, 1.0, 0.0, 0.0);
        assert!(close(skew.transform_point(Point::new(0.0, 2.0)), Point::new(2.0, 2.0)));
    }

    #[test]
    fn inverse_round_trips() {
        let m = AffineTransform::rotate_about(30.0, Point::new(2.0, 3.0))
            .then(&AffineTransform::scale(2.0, 0.5));
        let inv = m.inverse().unwrap();
        let p = Point::new(-4.0, 9.0);
        assert!(close(inv.transform_point(m.transform_point(p)), p));

        assert_eq!(AffineTransform::scale(0.0, 1.0).inverse(), None);
    }

    #[test]
    fn batch_arity_must_match() {
        let sets = vec![vec![Point::ORIGIN], vec![Point::ORIGIN]];
        let err = apply_batch(&sets, &[AffineTransform::identity()]).unwrap_err();
        assert_eq!(err, GeometryError::ArityMismatch { sets: 2, matrices: 1 });
    }

    #[test]
    fn batch_applies_one_matrix_per_set() {
        let sets = vec![vec![Point::new(1.0, 1.0)], vec![Point::new(1.0, 1.0)]];
        let out = apply_batch(
            &sets,
            &[AffineTransform::translate(1.0, 0.0), AffineTransform::scale(3.0, 3.0)],
        )
        .unwrap();
        assert_eq!(out, vec![vec![Point::new(2.0, 1.0)], vec![Point::new(3.0, 3.0)]]);
    }

    #[test]
    fn commands_transform_control_points() {
        let mut cmds = vec![
            PathCommand::MoveTo(Point::ORIGIN),
            PathCommand::CubicCurveTo(Point::new(1.0, 0.0), Point::new(1.0, 1.0), Point::new(0.0, 1.0)),
            PathCommand::ClosePath,
        ];
        apply_commands(&mut cmds, &AffineTransform::translate(5.0, 5.0));
        assert_eq!(cmds[0], PathCommand::MoveTo(Point::new(5.0, 5.0)));
        assert_eq!(
            cmds[1],
            PathCommand::CubicCurveTo(Point::new(6.0, 5.0), Point::new(6.0, 6.0), Point::new(5.0, 6.0))
        );
        assert_eq!(cmds[2], PathCommand::ClosePath);
    }
}

//! Elliptical arc to cubic Bézier conversion.
//!
//! The endpoint form used by path data is converted to center form, the sweep
//! is split into pieces of at most 90°, and each piece becomes one cubic.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DVec2, dvec2};

use crate::types::{PathCommand, Point};

/// Arc from `from` to `to` in endpoint parameterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointArc {
    pub from: Point,
    pub to: Point,
    pub rx: f64,
    pub ry: f64,
    /// Degrees.
    pub x_axis_rotation: f64,
    pub large_arc: bool,
    pub sweep: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CenterArc {
    center: DVec2,
    radii: DVec2,
    /// Radians.
    phi: f64,
    theta1: f64,
    delta_theta: f64,
}

impl EndpointArc {
    /// Replacement commands for this arc: nothing when the endpoints
    /// coincide, a line when a radius is zero, cubics otherwise.
    pub fn to_commands(&self) -> Vec<PathCommand> {
        if self.from.approx_eq(self.to, 0.0) {
            return Vec::new();
        }
        if self.rx == 0.0 || self.ry == 0.0 {
            return vec![PathCommand::LineTo(self.to)];
        }
        match self.to_center() {
            Some(arc) => arc.to_cubics(self.to),
            None => vec![PathCommand::LineTo(self.to)],
        }
    }

    fn to_center(&self) -> Option<CenterArc> {
        let p1 = self.from.to_dvec2();
        let p2 = self.to.to_dvec2();
        let phi = self.x_axis_rotation.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let mut rx = self.rx.abs();
        let mut ry = self.ry.abs();

        // Move the origin to the chord midpoint and align axes with the ellipse.
        let mid = (p1 - p2) / 2.0;
        let x1 = cos_phi * mid.x + sin_phi * mid.y;
        let y1 = -sin_phi * mid.x + cos_phi * mid.y;

        // Radii too small to span the chord are scaled up uniformly.
        let lambda = (x1 / rx).powi(2) + (y1 / ry).powi(2);
        if lambda > 1.0 {
            rx *= lambda.sqrt();
            ry *= lambda.sqrt();
        }

        let d = (rx * y1).powi(2) + (ry * x1).powi(2);
        if d == 0.0 {
            return None;
        }
        let mut k = ((rx * ry).powi(2) / d - 1.0).abs().sqrt();
        if self.sweep == self.large_arc {
            k = -k;
        }
        let cx1 = k * rx * y1 / ry;
        let cy1 = -k * ry * x1 / rx;

        let center = dvec2(
            cos_phi * cx1 - sin_phi * cy1 + (p1.x + p2.x) / 2.0,
            sin_phi * cx1 + cos_phi * cy1 + (p1.y + p2.y) / 2.0,
        );

        let u = dvec2((x1 - cx1) / rx, (y1 - cy1) / ry);
        let v = dvec2((-x1 - cx1) / rx, (-y1 - cy1) / ry);
        if u.length() == 0.0 || v.length() == 0.0 {
            return None;
        }

        let theta1 = angle_between(DVec2::X, u);
        let mut delta_theta = angle_between(u, v);
        if self.sweep && delta_theta < 0.0 {
            delta_theta += TAU;
        } else if !self.sweep && delta_theta > 0.0 {
            delta_theta -= TAU;
        }

        Some(CenterArc {
            center,
            radii: dvec2(rx, ry),
            phi,
            theta1,
            delta_theta,
        })
    }
}

impl CenterArc {
    fn to_cubics(&self, end: Point) -> Vec<PathCommand> {
        let pieces = (self.delta_theta.abs() / FRAC_PI_2 - 1e-9).ceil().max(1.0) as usize;
        let step = self.delta_theta / pieces as f64;

        let mut commands = Vec::with_capacity(pieces);
        let mut th0 = self.theta1;
        for i in 0..pieces {
            let th1 = th0 + step;
            let (c1, c2, mut to) = self.segment(th0, th1);
            // Land exactly on the requested endpoint.
            if i + 1 == pieces {
                to = end;
            }
            commands.push(PathCommand::CubicCurveTo(c1, c2, to));
            th0 = th1;
        }
        commands
    }

    /// One cubic for the sweep `th0..th1` (at most a quarter turn).
    fn segment(&self, th0: f64, th1: f64) -> (Point, Point, Point) {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin0, cos0) = th0.sin_cos();
        let (sin1, cos1) = th1.sin_cos();
        let half = 0.5 * (th1 - th0);
        let t = (8.0 / 3.0) * (half * 0.5).sin().powi(2) / half.sin();
        let (rx, ry) = (self.radii.x, self.radii.y);

        let local = [
            dvec2(rx * (cos0 - t * sin0), ry * (sin0 + t * cos0)),
            dvec2(rx * (cos1 + t * sin1), ry * (sin1 - t * cos1)),
            dvec2(rx * cos1, ry * sin1),
        ];
        let [a, b, c] = local.map(|p| {
            Point::from(
                self.center + dvec2(cos_phi * p.x - sin_phi * p.y, sin_phi * p.x + cos_phi * p.y),
            )
        });
        (a, b, c)
    }
}

/// Signed angle from `u` to `v`, in `[-PI, PI]`.
fn angle_between(u: DVec2, v: DVec2) -> f64 {
    let cos = (u.dot(v) / (u.length() * v.length())).clamp(-1.0, 1.0);
    let angle = cos.acos();
    if u.perp_dot(v) < 0.0 { -angle } else { angle }
}
